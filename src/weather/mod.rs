//! Weather data access
//!
//! [`WeatherSource`] is the provider seam; [`WeatherService`] puts the
//! response cache in front of it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
use crate::cache::{Cached, ClearReport, ResponseCache};
use crate::models::{CurrentWeatherResponse, ForecastResponse};

pub mod openweathermap;

pub use openweathermap::OpenWeatherMapClient;

/// A provider of current weather and forecasts by city id
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current_weather(&self, city_id: u64) -> Result<CurrentWeatherResponse>;

    async fn forecast(&self, city_id: u64) -> Result<ForecastResponse>;
}

#[must_use]
pub fn current_weather_cache_key(city_id: u64) -> String {
    format!("v2_weather_{city_id}")
}

#[must_use]
pub fn forecast_cache_key(city_id: u64) -> String {
    format!("v2_forecast_{city_id}")
}

/// Cache-or-fetch access to a [`WeatherSource`]
#[derive(Clone)]
pub struct WeatherService {
    source: Arc<dyn WeatherSource>,
    cache: ResponseCache,
}

impl WeatherService {
    pub fn new(source: Arc<dyn WeatherSource>, cache: ResponseCache) -> Self {
        Self { source, cache }
    }

    #[must_use]
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub async fn current_weather(&self, city_id: u64) -> Result<Cached<CurrentWeatherResponse>> {
        self.cache
            .get_or_fetch(&current_weather_cache_key(city_id), || {
                self.source.current_weather(city_id)
            })
            .await
    }

    pub async fn forecast(&self, city_id: u64) -> Result<Cached<ForecastResponse>> {
        self.cache
            .get_or_fetch(&forecast_cache_key(city_id), || self.source.forecast(city_id))
            .await
    }

    pub async fn clear_cache(&self) -> Result<ClearReport> {
        self.cache.clear().await
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::WeekendCastError;

    /// In-memory source serving fixed payloads and counting calls
    #[derive(Default)]
    pub struct FakeSource {
        pub current: Option<CurrentWeatherResponse>,
        pub forecast: Option<ForecastResponse>,
        pub calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherSource for FakeSource {
        async fn current_weather(&self, _city_id: u64) -> Result<CurrentWeatherResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.current
                .clone()
                .ok_or_else(|| WeekendCastError::upstream("OpenWeatherMap", 404))
        }

        async fn forecast(&self, _city_id: u64) -> Result<ForecastResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.forecast
                .clone()
                .ok_or_else(|| WeekendCastError::upstream("OpenWeatherMap", 404))
        }
    }
}
