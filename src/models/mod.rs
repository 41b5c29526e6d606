//! Data models for the `WeekendCast` backend
//!
//! - Forecast: samples and time-ordered series fed into the weekend pipeline
//! - Location: characteristics served for a city
//! - Weather: current conditions
//! - OpenWeatherMap: provider response schema

pub mod forecast;
pub mod location;
pub mod openweathermap;
pub mod weather;

pub use forecast::{ForecastSample, ForecastSeries, SampleCondition};
pub use location::{LocationCharacteristics, LocationInfo, WeekendBounds};
pub use openweathermap::{CurrentWeatherResponse, ForecastResponse};
pub use weather::WeatherCondition;
