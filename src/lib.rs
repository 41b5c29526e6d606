//! `WeekendCast` - weather proxy backend for a frontend weather widget
//!
//! Fetches current weather and forecasts from OpenWeatherMap, caches them on
//! disk, and derives the weekend window, day/night forecast buckets, summary
//! statistics and solar times for a location.

pub mod api;
pub mod astronomy;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod suggestions;
pub mod telemetry;
pub mod weather;
pub mod web;
pub mod weekend;

// Re-export core types for public API
pub use cache::{CacheStatus, Cached, ResponseCache};
pub use config::WeekendCastConfig;
pub use error::WeekendCastError;
pub use models::{ForecastSample, ForecastSeries, LocationCharacteristics};
pub use weather::{OpenWeatherMapClient, WeatherService, WeatherSource};
pub use weekend::{AggregateSummary, BucketedForecast, WeekendReport, WeekendWindow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeekendCastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
