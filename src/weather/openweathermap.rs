//! OpenWeatherMap 2.5 client
//!
//! Fetches current weather and the 5 day / 3 hour forecast for a city id.
//! Transient failures are retried with exponential backoff.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

use super::WeatherSource;
use crate::config::WeatherConfig;
use crate::models::{CurrentWeatherResponse, ForecastResponse};
use crate::{Result, WeekendCastError};

const SERVICE_NAME: &str = "OpenWeatherMap";
const SLOW_RESPONSE: Duration = Duration::from_secs(5);

pub struct OpenWeatherMapClient {
    client: ClientWithMiddleware,
    base_url: String,
    units: String,
    api_key: String,
}

impl OpenWeatherMapClient {
    /// Create a client from the weather configuration.
    ///
    /// Fails when no API key is configured.
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| WeekendCastError::config("OpenWeatherMap API key is missing"))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("WeekendCast/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            units: config.units.clone(),
            api_key,
        })
    }

    fn url(&self, endpoint: &str, city_id: u64) -> String {
        format!(
            "{}/{endpoint}?id={city_id}&units={}&appid={}",
            self.base_url,
            urlencoding::encode(&self.units),
            urlencoding::encode(&self.api_key)
        )
    }

    /// GET `endpoint` for `city_id` and decode the JSON body
    #[instrument(skip(self), fields(service = SERVICE_NAME))]
    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str, city_id: u64) -> Result<T> {
        let start_time = Instant::now();
        debug!(base_url = %self.base_url, units = %self.units, "Requesting {endpoint}");

        let response = self.client.get(self.url(endpoint, city_id)).send().await.map_err(|err| {
            error!(error = %err, "Request to {SERVICE_NAME} failed");
            WeekendCastError::from(err)
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "{SERVICE_NAME} returned an error status");
            return Err(WeekendCastError::upstream(SERVICE_NAME, status.as_u16()));
        }

        let parse_start = Instant::now();
        let payload = response.json::<T>().await.map_err(|err| {
            error!(error = %err, "Failed to parse {endpoint} response");
            WeekendCastError::api(format!("Invalid {endpoint} data received from {SERVICE_NAME}: {err}"))
        })?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved {endpoint} in {:.3}s (parse: {:.3}s)",
            total_duration.as_secs_f64(),
            parse_start.elapsed().as_secs_f64()
        );
        if total_duration > SLOW_RESPONSE {
            warn!("Slow API response detected: {:.3}s", total_duration.as_secs_f64());
        }

        Ok(payload)
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherMapClient {
    async fn current_weather(&self, city_id: u64) -> Result<CurrentWeatherResponse> {
        self.fetch("weather", city_id).await
    }

    async fn forecast(&self, city_id: u64) -> Result<ForecastResponse> {
        self.fetch("forecast", city_id).await
    }
}
