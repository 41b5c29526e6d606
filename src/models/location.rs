//! Location characteristics served by the `current` endpoint

use serde::{Deserialize, Serialize};

use super::openweathermap::CurrentWeatherResponse;
use super::weather::WeatherCondition;
use crate::astronomy::{AstronomicalData, astronomical_data};
use crate::cache::CacheStatus;
use crate::weekend::time::to_local_iso8601;
use crate::weekend::{WeekendWindow, WindowConfig, compute_window};

/// Identity and position of a provider city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInfo {
    pub name: String,
    /// ISO 3166-1 alpha-2, empty when the provider omits it
    pub country_code: String,
    pub city_id: u64,
    pub timezone_offset: i64,
    pub lat: f64,
    pub lon: f64,
}

impl LocationInfo {
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// Weekend window with both phase flags spelled out for clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekendBounds {
    pub begin: i64,
    pub end: i64,
    pub begin_local: Option<String>,
    pub end_local: Option<String>,
    pub is_currently_weekend: bool,
    pub is_upcoming: bool,
}

impl WeekendBounds {
    #[must_use]
    pub fn new(window: &WeekendWindow, offset_seconds: i64) -> Self {
        Self {
            begin: window.begin,
            end: window.end,
            begin_local: to_local_iso8601(window.begin, offset_seconds),
            end_local: to_local_iso8601(window.end, offset_seconds),
            is_currently_weekend: window.is_currently_weekend(),
            is_upcoming: window.is_upcoming(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCharacteristics {
    pub location: LocationInfo,
    pub astronomical_data: AstronomicalData,
    /// Absent when the payload carries no weather condition
    pub weather: Option<WeatherCondition>,
    pub weekend: WeekendBounds,
}

impl LocationCharacteristics {
    /// Derive everything from one current-weather payload.
    ///
    /// The payload's observation time stands in for "now", so a cached payload
    /// yields the same characteristics as when it was fetched.
    #[must_use]
    pub fn from_current(
        response: &CurrentWeatherResponse,
        cache_status: CacheStatus,
        window_config: &WindowConfig,
    ) -> Self {
        let offset = response.timezone;
        let window = compute_window(response.dt, offset, window_config);

        Self {
            location: LocationInfo {
                name: response.name.clone(),
                country_code: response.sys.country.clone().unwrap_or_default(),
                city_id: response.id,
                timezone_offset: offset,
                lat: response.coord.lat,
                lon: response.coord.lon,
            },
            astronomical_data: astronomical_data(
                response.dt,
                offset,
                response.coord.lat,
                response.coord.lon,
                response.sys.sunrise,
                response.sys.sunset,
            ),
            weather: WeatherCondition::from_current(response, cache_status),
            weekend: WeekendBounds::new(&window, offset),
        }
    }
}
