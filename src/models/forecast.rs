//! Forecast samples and the time-ordered series they arrive in

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::weekend::time::to_local;

/// One forecast entry as received from the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSample {
    /// UTC unix timestamp the forecast applies to
    pub timestamp_utc: i64,
    /// Temperature in Celsius
    pub temperature: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Condition group, e.g. "Rain"
    pub condition_group: String,
    /// Condition description, e.g. "light rain"
    pub condition_description: String,
    /// Further conditions reported for the same slot, e.g. "mist" next to rain
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_conditions: Vec<SampleCondition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCondition {
    pub group: String,
    pub description: String,
}

impl ForecastSample {
    /// Every `(group, description)` of this sample, primary condition first
    pub fn conditions(&self) -> impl Iterator<Item = (&str, &str)> {
        std::iter::once((self.condition_group.as_str(), self.condition_description.as_str())).chain(
            self.additional_conditions
                .iter()
                .map(|condition| (condition.group.as_str(), condition.description.as_str())),
        )
    }

    /// Hour of day (0-23) at the location
    #[must_use]
    pub fn local_hour(&self, offset_seconds: i64) -> u32 {
        to_local(self.timestamp_utc, offset_seconds).hour
    }
}

/// Forecast samples in ascending timestamp order for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSeries {
    /// Fixed UTC offset of the location in seconds
    pub offset_seconds: i64,
    samples: Vec<ForecastSample>,
}

impl ForecastSeries {
    /// Build a series, restoring ascending time order if the provider broke it.
    ///
    /// The sort is stable, so samples sharing a timestamp keep their source
    /// order and are all retained.
    #[must_use]
    pub fn new(offset_seconds: i64, mut samples: Vec<ForecastSample>) -> Self {
        let ordered = samples
            .windows(2)
            .all(|pair| pair[0].timestamp_utc <= pair[1].timestamp_utc);
        if !ordered {
            warn!(
                count = samples.len(),
                "Forecast samples arrived out of order, sorting by timestamp"
            );
            samples.sort_by_key(|sample| sample.timestamp_utc);
        }

        Self {
            offset_seconds,
            samples,
        }
    }

    /// The same samples read at another UTC offset
    #[must_use]
    pub fn at_offset(self, offset_seconds: i64) -> Self {
        Self { offset_seconds, ..self }
    }

    #[must_use]
    pub fn samples(&self) -> &[ForecastSample] {
        &self.samples
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Timestamp of the latest sample
    #[must_use]
    pub fn last_timestamp(&self) -> Option<i64> {
        self.samples.last().map(|sample| sample.timestamp_utc)
    }
}

#[cfg(test)]
pub(crate) fn sample(timestamp_utc: i64, temperature: f64, group: &str, description: &str) -> ForecastSample {
    ForecastSample {
        timestamp_utc,
        temperature,
        temp_min: temperature - 1.0,
        temp_max: temperature + 1.0,
        condition_group: group.to_string(),
        condition_description: description.to_string(),
        additional_conditions: Vec::new(),
    }
}
