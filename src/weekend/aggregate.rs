//! Summary statistics over a bucketed weekend forecast

use std::collections::BTreeSet;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::bucket::BucketedForecast;
use super::window::WeekendWindow;
use crate::models::ForecastSample;

/// Temperature extremes across the in-window samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
}

impl TemperatureRange {
    /// e.g. `"4.5°C to 12.0°C"`
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{:.1}°C to {:.1}°C", self.min, self.max)
    }
}

/// Reduced statistics of a weekend forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    /// `None` when no sample fell inside the window
    pub temperature_range: Option<TemperatureRange>,
    /// Sorted ascending
    pub unique_condition_groups: Vec<String>,
    /// Sorted ascending
    pub unique_condition_descriptions: Vec<String>,
    /// Mean day temperature rounded to 2 places, 0 for an empty bucket
    pub average_day_temp: f64,
    /// Mean night temperature rounded to 2 places, 0 for an empty bucket
    pub average_night_temp: f64,
    pub day_count: usize,
    pub night_count: usize,
    /// The provider's forecast reaches the end of the window
    pub covers_entire_window: bool,
}

impl AggregateSummary {
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.temperature_range.is_some()
    }

    /// Condition groups joined for display
    #[must_use]
    pub fn overall_main(&self) -> String {
        self.unique_condition_groups.join(", ")
    }

    /// Condition descriptions joined for display
    #[must_use]
    pub fn overall_description(&self) -> String {
        self.unique_condition_descriptions.join(", ")
    }
}

/// Aggregate the in-window samples of `bucketed`.
///
/// Never fails: an empty filtered set yields no temperature range and zero
/// averages.
#[must_use]
pub fn aggregate(bucketed: &BucketedForecast, window: &WeekendWindow) -> AggregateSummary {
    let temperature_range = bucketed.filtered().fold(None, |range: Option<TemperatureRange>, sample| {
        Some(match range {
            Some(range) => TemperatureRange {
                min: range.min.min(sample.temp_min),
                max: range.max.max(sample.temp_max),
            },
            None => TemperatureRange {
                min: sample.temp_min,
                max: sample.temp_max,
            },
        })
    });

    let (groups, descriptions): (BTreeSet<&str>, BTreeSet<&str>) =
        bucketed.filtered().flat_map(|sample| sample.conditions()).unzip();

    let covers_entire_window = bucketed
        .last_source_timestamp
        .is_some_and(|last| last >= window.end);

    AggregateSummary {
        temperature_range,
        unique_condition_groups: groups.into_iter().map(str::to_owned).collect(),
        unique_condition_descriptions: descriptions.into_iter().map(str::to_owned).collect(),
        average_day_temp: average_temperature(&bucketed.day_entries),
        average_night_temp: average_temperature(&bucketed.night_entries),
        day_count: bucketed.day_entries.len(),
        night_count: bucketed.night_entries.len(),
        covers_entire_window,
    }
}

fn average_temperature(samples: &[ForecastSample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let total: f64 = samples.iter().map(|sample| sample.temperature).sum();
    round_to_hundredths(total / samples.len() as f64)
}

/// Two decimal places, half away from zero.
///
/// Binary noise is dropped first so a mean stored as 1.00499.. still counts
/// as the midpoint 1.005.
fn round_to_hundredths(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|exact| {
            exact
                .round_dp_with_strategy(12, RoundingStrategy::MidpointNearestEven)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        })
        .and_then(|rounded| rounded.to_f64())
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SampleCondition;
    use crate::models::forecast::sample;
    use crate::weekend::window::WeekendPhase;
    use rstest::rstest;

    fn window() -> WeekendWindow {
        WeekendWindow {
            begin: 1_000,
            end: 2_000,
            phase: WeekendPhase::Upcoming,
        }
    }

    fn bucketed(day: Vec<ForecastSample>, night: Vec<ForecastSample>, last: Option<i64>) -> BucketedForecast {
        BucketedForecast {
            day_entries: day,
            night_entries: night,
            last_source_timestamp: last,
        }
    }

    #[test]
    fn test_temperature_range_spans_both_buckets() {
        let summary = aggregate(
            &bucketed(
                vec![sample(1_100, 14.0, "Clear", "clear sky")],
                vec![sample(1_200, 3.0, "Clouds", "overcast clouds")],
                Some(2_100),
            ),
            &window(),
        );
        let range = summary.temperature_range.unwrap();
        assert_eq!(range.min, 2.0);
        assert_eq!(range.max, 15.0);
        assert_eq!(range.describe(), "2.0°C to 15.0°C");
    }

    #[test]
    fn test_unique_sets_are_sorted_and_case_sensitive() {
        let summary = aggregate(
            &bucketed(
                vec![
                    sample(1_100, 10.0, "Rain", "light rain"),
                    sample(1_200, 11.0, "Clouds", "broken clouds"),
                    sample(1_300, 12.0, "Rain", "light rain"),
                ],
                vec![sample(1_400, 4.0, "clouds", "Broken clouds")],
                Some(1_400),
            ),
            &window(),
        );
        assert_eq!(summary.unique_condition_groups, vec!["Clouds", "Rain", "clouds"]);
        assert_eq!(
            summary.unique_condition_descriptions,
            vec!["Broken clouds", "broken clouds", "light rain"]
        );
        assert_eq!(summary.overall_main(), "Clouds, Rain, clouds");
    }

    #[test]
    fn test_averages_round_half_away_from_zero() {
        let summary = aggregate(
            &bucketed(
                vec![
                    sample(1_100, 10.0, "Clear", "clear sky"),
                    sample(1_200, 10.25, "Clear", "clear sky"),
                ],
                vec![
                    sample(1_300, -1.0, "Clear", "clear sky"),
                    sample(1_400, -2.0, "Clear", "clear sky"),
                    sample(1_500, -2.0, "Clear", "clear sky"),
                ],
                Some(1_500),
            ),
            &window(),
        );
        assert_eq!(summary.average_day_temp, 10.13);
        assert_eq!(summary.average_night_temp, -1.67);
        assert_eq!(summary.day_count, 2);
        assert_eq!(summary.night_count, 3);
    }

    #[rstest]
    #[case(1.005, 1.01)]
    #[case(-1.005, -1.01)]
    #[case(2.675, 2.68)]
    #[case(10.125, 10.13)]
    #[case(-1.666_666, -1.67)]
    #[case(0.0, 0.0)]
    fn test_round_to_hundredths(#[case] value: f64, #[case] expected: f64) {
        assert_eq!(round_to_hundredths(value), expected);
    }

    #[test]
    fn test_half_cent_means_round_away_from_zero() {
        let summary = aggregate(
            &bucketed(
                vec![
                    sample(1_100, 1.0, "Clear", "clear sky"),
                    sample(1_200, 1.01, "Clear", "clear sky"),
                ],
                vec![
                    sample(1_300, -1.0, "Clear", "clear sky"),
                    sample(1_400, -1.01, "Clear", "clear sky"),
                ],
                Some(1_400),
            ),
            &window(),
        );
        assert_eq!(summary.average_day_temp, 1.01);
        assert_eq!(summary.average_night_temp, -1.01);
    }

    #[test]
    fn test_secondary_conditions_join_the_sets() {
        let mut rainy = sample(1_100, 10.0, "Rain", "light rain");
        rainy.additional_conditions.push(SampleCondition {
            group: "Mist".to_string(),
            description: "mist".to_string(),
        });
        let summary = aggregate(
            &bucketed(vec![rainy], vec![sample(1_200, 4.0, "Clear", "clear sky")], Some(1_200)),
            &window(),
        );
        assert_eq!(summary.unique_condition_groups, vec!["Clear", "Mist", "Rain"]);
        assert_eq!(
            summary.unique_condition_descriptions,
            vec!["clear sky", "light rain", "mist"]
        );
    }

    #[test]
    fn test_empty_bucket_averages_zero() {
        let summary = aggregate(
            &bucketed(vec![sample(1_100, 7.5, "Clear", "clear sky")], Vec::new(), Some(1_100)),
            &window(),
        );
        assert_eq!(summary.average_day_temp, 7.5);
        assert_eq!(summary.average_night_temp, 0.0);
    }

    #[test]
    fn test_empty_input_has_no_data() {
        let summary = aggregate(&BucketedForecast::default(), &window());
        assert!(!summary.has_data());
        assert!(summary.temperature_range.is_none());
        assert_eq!(summary.average_day_temp, 0.0);
        assert_eq!(summary.average_night_temp, 0.0);
        assert!(summary.unique_condition_groups.is_empty());
        assert!(!summary.covers_entire_window);
    }

    #[test]
    fn test_coverage_uses_last_source_sample() {
        let day = vec![sample(1_100, 7.5, "Clear", "clear sky")];
        assert!(aggregate(&bucketed(day.clone(), Vec::new(), Some(2_000)), &window()).covers_entire_window);
        assert!(aggregate(&bucketed(day.clone(), Vec::new(), Some(5_000)), &window()).covers_entire_window);
        assert!(!aggregate(&bucketed(day, Vec::new(), Some(1_999)), &window()).covers_entire_window);
    }

    #[test]
    fn test_aggregation_is_repeatable() {
        let input = bucketed(
            vec![sample(1_100, 9.0, "Snow", "light snow")],
            vec![sample(1_200, -3.0, "Snow", "snow")],
            Some(2_500),
        );
        let before = input.clone();
        assert_eq!(aggregate(&input, &window()), aggregate(&input, &window()));
        assert_eq!(input, before);
    }
}
