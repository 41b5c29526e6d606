//! Weekend forecast pipeline
//!
//! Time conversion, weekend window calculation, day/night bucketing and
//! aggregation. Everything here is pure and synchronous.

pub mod aggregate;
pub mod bucket;
pub mod time;
pub mod window;

pub use aggregate::{AggregateSummary, TemperatureRange, aggregate};
pub use bucket::{BucketedForecast, DaypartConfig, bucket};
pub use time::{LocalTime, to_local};
pub use window::{WeekendPhase, WeekendWindow, WindowConfig, compute_window};

use serde::Serialize;

use crate::models::ForecastSeries;

/// Window, buckets and summary for one location and instant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekendReport {
    pub window: WeekendWindow,
    pub forecast: BucketedForecast,
    pub summary: AggregateSummary,
}

/// Run the whole pipeline for `now_utc` over `series`.
///
/// The window is computed at the series' own offset.
#[must_use]
pub fn weekend_report(
    now_utc: i64,
    series: &ForecastSeries,
    window_config: &WindowConfig,
    dayparts: &DaypartConfig,
) -> WeekendReport {
    let window = compute_window(now_utc, series.offset_seconds, window_config);
    let forecast = bucket(series, &window, dayparts);
    let summary = aggregate(&forecast, &window);

    WeekendReport {
        window,
        forecast,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forecast::sample;
    use crate::weekend::time::{SECONDS_PER_DAY, SECONDS_PER_HOUR};

    // Monday 2024-03-11 00:00:00 UTC
    const MONDAY: i64 = 1_710_115_200;

    #[test]
    fn test_report_over_three_hourly_forecast() {
        // 3-hourly samples from Wednesday 00:00 UTC for five days, UTC+1
        let samples = (0..40)
            .map(|i| {
                let ts = MONDAY + 2 * SECONDS_PER_DAY + i * 3 * SECONDS_PER_HOUR;
                let (group, description) = if i % 2 == 0 {
                    ("Clouds", "scattered clouds")
                } else {
                    ("Rain", "light rain")
                };
                sample(ts, i as f64, group, description)
            })
            .collect();
        let series = ForecastSeries::new(3600, samples);

        // Wednesday 12:00 UTC
        let report = weekend_report(
            MONDAY + 2 * SECONDS_PER_DAY + 12 * SECONDS_PER_HOUR,
            &series,
            &WindowConfig::default(),
            &DaypartConfig::default(),
        );

        assert!(report.window.is_upcoming());
        // Friday 18:00 local is 17:00 UTC
        assert_eq!(report.window.begin, MONDAY + 4 * SECONDS_PER_DAY + 17 * SECONDS_PER_HOUR);
        // Last sample is Sunday 21:00 UTC, past Sunday 20:00 UTC
        assert!(report.summary.covers_entire_window);
        assert!(report.summary.has_data());
        assert_eq!(report.summary.unique_condition_groups, vec!["Clouds", "Rain"]);
        assert_eq!(
            report.forecast.filtered_len(),
            report.summary.day_count + report.summary.night_count
        );
    }
}
