//! OpenWeatherMap 2.5 response schema
//!
//! Only the `/weather` and `/forecast` endpoints are modelled. Fields the
//! provider may omit are `Option`s; everything else is required and a payload
//! missing it fails to deserialize.

use serde::{Deserialize, Serialize};

use tracing::warn;

use super::forecast::{ForecastSample, ForecastSeries, SampleCondition};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

/// One weather condition entry (`weather[]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: u32,
    /// Condition group, e.g. "Clouds"
    pub main: String,
    pub description: String,
    pub icon: String,
}

impl Condition {
    #[must_use]
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}.png", self.icon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: u8,
    pub sea_level: Option<f64>,
    pub grnd_level: Option<f64>,
    pub temp_kf: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: u16,
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    pub all: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sys {
    #[serde(rename = "type")]
    pub kind: Option<u32>,
    pub id: Option<u64>,
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    /// Part of day, "d" or "n" (forecast only)
    pub pod: Option<String>,
}

/// `/weather` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeatherResponse {
    pub coord: Coordinates,
    pub weather: Vec<Condition>,
    pub base: Option<String>,
    pub main: MainReadings,
    pub visibility: Option<u32>,
    pub wind: Wind,
    pub clouds: Clouds,
    /// Observation time, UTC unix timestamp
    pub dt: i64,
    #[serde(default)]
    pub sys: Sys,
    /// Shift from UTC in seconds
    pub timezone: i64,
    pub id: u64,
    pub name: String,
}

/// One entry of the `/forecast` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastItem {
    pub dt: i64,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
    pub wind: Wind,
    pub clouds: Clouds,
    pub visibility: Option<u32>,
    /// Probability of precipitation
    #[serde(default)]
    pub pop: f64,
    #[serde(default)]
    pub sys: Sys,
    pub dt_txt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: u64,
    pub name: String,
    pub coord: Coordinates,
    pub country: Option<String>,
    pub population: Option<u64>,
    pub timezone: i64,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

/// `/forecast` response (5 days, 3-hour steps)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub cnt: u32,
    pub list: Vec<ForecastItem>,
    pub city: City,
}

impl ForecastItem {
    /// Sample for this slot, `None` when the provider sent no weather condition.
    ///
    /// The first condition becomes the primary one, the rest are carried along.
    #[must_use]
    pub fn to_sample(&self) -> Option<ForecastSample> {
        let (primary, rest) = self.weather.split_first()?;

        Some(ForecastSample {
            timestamp_utc: self.dt,
            temperature: self.main.temp,
            temp_min: self.main.temp_min,
            temp_max: self.main.temp_max,
            condition_group: primary.main.clone(),
            condition_description: primary.description.clone(),
            additional_conditions: rest
                .iter()
                .map(|condition| SampleCondition {
                    group: condition.main.clone(),
                    description: condition.description.clone(),
                })
                .collect(),
        })
    }
}

impl ForecastResponse {
    /// Convert into a time-ordered series at the city's offset.
    ///
    /// Entries without a weather condition are dropped with a warning.
    #[must_use]
    pub fn to_series(&self) -> ForecastSeries {
        let samples = self
            .list
            .iter()
            .filter_map(|item| {
                let sample = item.to_sample();
                if sample.is_none() {
                    warn!(dt = item.dt, dt_txt = %item.dt_txt, "Skipping forecast entry without weather condition");
                }
                sample
            })
            .collect();
        ForecastSeries::new(self.city.timezone, samples)
    }
}
