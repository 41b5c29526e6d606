//! Day/night bucketing of the forecast samples inside a weekend window

use serde::{Deserialize, Serialize};

use super::window::WeekendWindow;
use crate::models::{ForecastSample, ForecastSeries};

/// Local-hour thresholds separating day from night.
///
/// A sample is a day sample when `day_start_hour <= hour < day_end_hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaypartConfig {
    pub day_start_hour: u32,
    pub day_end_hour: u32,
}

impl Default for DaypartConfig {
    fn default() -> Self {
        Self {
            day_start_hour: 8,
            day_end_hour: 19,
        }
    }
}

impl DaypartConfig {
    #[must_use]
    pub fn is_day(&self, local_hour: u32) -> bool {
        local_hour >= self.day_start_hour && local_hour < self.day_end_hour
    }
}

/// In-window samples split by daypart, each bucket in source order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketedForecast {
    pub day_entries: Vec<ForecastSample>,
    pub night_entries: Vec<ForecastSample>,
    /// Timestamp of the last sample of the unfiltered series
    pub last_source_timestamp: Option<i64>,
}

impl BucketedForecast {
    /// Every in-window sample, day bucket first
    pub fn filtered(&self) -> impl Iterator<Item = &ForecastSample> {
        self.day_entries.iter().chain(self.night_entries.iter())
    }

    #[must_use]
    pub fn filtered_len(&self) -> usize {
        self.day_entries.len() + self.night_entries.len()
    }
}

/// Keep the samples inside `window` (inclusive on both ends) and split them
/// into day and night buckets by local hour.
///
/// Duplicate timestamps are kept and counted independently. An empty series
/// yields two empty buckets.
#[must_use]
pub fn bucket(series: &ForecastSeries, window: &WeekendWindow, dayparts: &DaypartConfig) -> BucketedForecast {
    let mut bucketed = BucketedForecast {
        last_source_timestamp: series.last_timestamp(),
        ..BucketedForecast::default()
    };

    for sample in series.samples() {
        if !window.contains(sample.timestamp_utc) {
            continue;
        }

        if dayparts.is_day(sample.local_hour(series.offset_seconds)) {
            bucketed.day_entries.push(sample.clone());
        } else {
            bucketed.night_entries.push(sample.clone());
        }
    }

    tracing::debug!(
        total = series.samples().len(),
        day = bucketed.day_entries.len(),
        night = bucketed.night_entries.len(),
        "Bucketed forecast samples"
    );

    bucketed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forecast::sample;
    use crate::weekend::time::SECONDS_PER_HOUR;
    use crate::weekend::window::WeekendPhase;

    // Saturday 2024-03-16 00:00:00 UTC
    const SATURDAY: i64 = 1_710_547_200;

    fn window() -> WeekendWindow {
        // Friday 18:00 to Sunday 21:00 UTC
        WeekendWindow {
            begin: SATURDAY - 6 * SECONDS_PER_HOUR,
            end: SATURDAY + 45 * SECONDS_PER_HOUR,
            phase: WeekendPhase::Upcoming,
        }
    }

    fn hour(h: i64) -> i64 {
        SATURDAY + h * SECONDS_PER_HOUR
    }

    #[test]
    fn test_day_start_is_inclusive() {
        let series = ForecastSeries::new(
            0,
            vec![
                sample(hour(6), 5.0, "Clear", "clear sky"),
                sample(hour(8), 9.0, "Clear", "clear sky"),
            ],
        );
        let bucketed = bucket(&series, &window(), &DaypartConfig::default());
        assert_eq!(bucketed.night_entries.len(), 1);
        assert_eq!(bucketed.night_entries[0].timestamp_utc, hour(6));
        assert_eq!(bucketed.day_entries.len(), 1);
        assert_eq!(bucketed.day_entries[0].timestamp_utc, hour(8));
    }

    #[test]
    fn test_day_end_is_exclusive() {
        let series = ForecastSeries::new(0, vec![sample(hour(19), 12.0, "Clouds", "few clouds")]);
        let bucketed = bucket(&series, &window(), &DaypartConfig::default());
        assert!(bucketed.day_entries.is_empty());
        assert_eq!(bucketed.night_entries.len(), 1);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let w = window();
        let series = ForecastSeries::new(
            0,
            vec![
                sample(w.begin - 1, 1.0, "Clear", "clear sky"),
                sample(w.begin, 2.0, "Clear", "clear sky"),
                sample(w.end, 3.0, "Clear", "clear sky"),
                sample(w.end + 1, 4.0, "Clear", "clear sky"),
            ],
        );
        let bucketed = bucket(&series, &w, &DaypartConfig::default());
        let kept: Vec<i64> = bucketed.filtered().map(|s| s.timestamp_utc).collect();
        assert_eq!(bucketed.filtered_len(), 2);
        assert!(kept.contains(&w.begin));
        assert!(kept.contains(&w.end));
        assert_eq!(bucketed.last_source_timestamp, Some(w.end + 1));
    }

    #[test]
    fn test_local_hour_follows_offset() {
        // 06:00 UTC is 08:00 at UTC+2
        let series = ForecastSeries::new(7200, vec![sample(hour(6), 5.0, "Clear", "clear sky")]);
        let bucketed = bucket(&series, &window(), &DaypartConfig::default());
        assert_eq!(bucketed.day_entries.len(), 1);
    }

    #[test]
    fn test_every_sample_lands_in_exactly_one_place() {
        let w = window();
        let samples: Vec<ForecastSample> = (-12..60)
            .step_by(3)
            .map(|h| sample(hour(h), h as f64, "Clouds", "broken clouds"))
            .chain(std::iter::once(sample(hour(12), 99.0, "Rain", "light rain")))
            .collect();
        let series = ForecastSeries::new(0, samples.clone());
        let bucketed = bucket(&series, &w, &DaypartConfig::default());

        let inside = samples.iter().filter(|s| w.contains(s.timestamp_utc)).count();
        assert_eq!(bucketed.filtered_len(), inside);
        for s in &bucketed.day_entries {
            assert!(!bucketed.night_entries.contains(s));
        }
        // duplicate timestamp at 12:00 is kept
        let noon = bucketed
            .day_entries
            .iter()
            .filter(|s| s.timestamp_utc == hour(12))
            .count();
        assert_eq!(noon, 2);
    }

    #[test]
    fn test_empty_series_yields_empty_buckets() {
        let bucketed = bucket(&ForecastSeries::new(0, Vec::new()), &window(), &DaypartConfig::default());
        assert!(bucketed.day_entries.is_empty());
        assert!(bucketed.night_entries.is_empty());
        assert_eq!(bucketed.last_source_timestamp, None);
    }
}
