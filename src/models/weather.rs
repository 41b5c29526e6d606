//! Current weather condition as presented to the widget

use serde::{Deserialize, Serialize};

use super::openweathermap::CurrentWeatherResponse;
use crate::cache::CacheStatus;
use crate::weekend::time::{to_local, to_local_iso8601};

/// Observed conditions at a location, in local time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherCondition {
    /// Temperature in the configured units
    pub temperature: f64,
    /// Condition group, e.g. "Clouds"
    pub group: String,
    /// Condition description, e.g. "broken clouds"
    pub condition: String,
    /// Relative humidity in percent
    pub humidity: u8,
    pub icon_url: String,
    pub is_cached: bool,
    /// Seconds since the payload was fetched, 0 when fresh
    pub cache_age: u64,
    /// Observation time, UTC unix timestamp
    pub epoch: i64,
    /// e.g. `2024-03-15T18:30:00+01:00`
    pub local_date_time: Option<String>,
    /// e.g. `18:30`
    pub local_time: String,
}

impl WeatherCondition {
    /// Condition from a current-weather payload, `None` when the payload
    /// carries no condition entry.
    #[must_use]
    pub fn from_current(response: &CurrentWeatherResponse, cache_status: CacheStatus) -> Option<Self> {
        let condition = response.weather.first()?;

        Some(Self {
            temperature: response.main.temp,
            group: condition.main.clone(),
            condition: condition.description.clone(),
            humidity: response.main.humidity,
            icon_url: condition.icon_url(),
            is_cached: cache_status.is_hit(),
            cache_age: cache_status.age_seconds(),
            epoch: response.dt,
            local_date_time: to_local_iso8601(response.dt, response.timezone),
            local_time: to_local(response.dt, response.timezone).format_hm(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::openweathermap::fixtures::current_weather_json;

    #[test]
    fn test_condition_from_cached_payload() {
        let response: CurrentWeatherResponse =
            serde_json::from_value(current_weather_json(1_710_523_800, 3600)).unwrap();
        let condition =
            WeatherCondition::from_current(&response, CacheStatus::Hit { age_seconds: 42 }).unwrap();

        assert_eq!(condition.group, "Clouds");
        assert_eq!(condition.condition, "broken clouds");
        assert_eq!(condition.humidity, 71);
        assert!(condition.is_cached);
        assert_eq!(condition.cache_age, 42);
        assert_eq!(condition.local_time, "18:30");
        assert_eq!(condition.local_date_time.as_deref(), Some("2024-03-15T18:30:00+01:00"));
    }

    #[test]
    fn test_condition_requires_weather_entry() {
        let mut value = current_weather_json(1_710_523_800, 0);
        value["weather"] = serde_json::json!([]);
        let response: CurrentWeatherResponse = serde_json::from_value(value).unwrap();
        assert!(WeatherCondition::from_current(&response, CacheStatus::Miss).is_none());
    }
}
