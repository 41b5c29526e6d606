//! Configuration management for the `WeekendCast` backend
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Weekday;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::WeekendCastError;
use crate::weekend::{DaypartConfig, WindowConfig};

/// Environment variable read when no API key is configured
pub const LEGACY_API_KEY_VAR: &str = "OPENWEATHERMAP_APIKEY";

/// Root configuration structure for the `WeekendCast` backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekendCastConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Response cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Weekend window and day/night thresholds
    #[serde(default)]
    pub weekend: WeekendConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Whole-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// PEM certificate chain, TLS is enabled when both paths are set
    pub tls_cert_path: Option<PathBuf>,
    /// PEM private key
    pub tls_key_path: Option<PathBuf>,
    /// Directory holding `api_specs/<version>/openapi_spec.json`
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: Option<String>,
    /// Base URL for weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Units requested from the provider (standard, metric, imperial)
    #[serde(default = "default_weather_units")]
    pub units: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_weather_max_retries")]
    pub max_retries: u32,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Freshness window of a cached response in seconds
    #[serde(default = "default_cache_lifetime")]
    pub lifetime_seconds: u64,
    /// Cache directory location
    #[serde(default = "default_cache_directory")]
    pub directory: PathBuf,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// OTLP/HTTP collector endpoint, export is off when unset
    pub otlp_endpoint: Option<String>,
}

/// Weekend window and day/night thresholds, all in local time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekendConfig {
    #[serde(default = "default_start_day")]
    pub start_day: Weekday,
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    #[serde(default = "default_end_day")]
    pub end_day: Weekday,
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u32,
    #[serde(default = "default_day_end_hour")]
    pub day_end_hour: u32,
}

// Default value functions
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_weather_units() -> String {
    "metric".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_weather_max_retries() -> u32 {
    3
}

fn default_cache_lifetime() -> u64 {
    602
}

fn default_cache_directory() -> PathBuf {
    PathBuf::from("cache")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_start_day() -> Weekday {
    WindowConfig::default().start_day
}

fn default_start_hour() -> u32 {
    WindowConfig::default().start_hour
}

fn default_end_day() -> Weekday {
    WindowConfig::default().end_day
}

fn default_end_hour() -> u32 {
    WindowConfig::default().end_hour
}

fn default_day_start_hour() -> u32 {
    DaypartConfig::default().day_start_hour
}

fn default_day_end_hour() -> u32 {
    DaypartConfig::default().day_end_hour
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            request_timeout_seconds: default_request_timeout(),
            tls_cert_path: None,
            tls_key_path: None,
            assets_dir: default_assets_dir(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            units: default_weather_units(),
            timeout_seconds: default_weather_timeout(),
            max_retries: default_weather_max_retries(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            lifetime_seconds: default_cache_lifetime(),
            directory: default_cache_directory(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            otlp_endpoint: None,
        }
    }
}

impl Default for WeekendConfig {
    fn default() -> Self {
        Self {
            start_day: default_start_day(),
            start_hour: default_start_hour(),
            end_day: default_end_day(),
            end_hour: default_end_hour(),
            day_start_hour: default_day_start_hour(),
            day_end_hour: default_day_end_hour(),
        }
    }
}

impl WeekendConfig {
    #[must_use]
    pub fn window(&self) -> WindowConfig {
        WindowConfig {
            start_day: self.start_day,
            start_hour: self.start_hour,
            end_day: self.end_day,
            end_hour: self.end_hour,
        }
    }

    #[must_use]
    pub fn dayparts(&self) -> DaypartConfig {
        DaypartConfig {
            day_start_hour: self.day_start_hour,
            day_end_hour: self.day_end_hour,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(self.lifetime_seconds)
    }
}

impl WeekendCastConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. WEEKENDCAST_WEATHER__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("WEEKENDCAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeekendCastConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to deserialize configuration from {}", config_file.display()))?;

        config.apply_legacy_api_key(std::env::var(LEGACY_API_KEY_VAR).ok());

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weekendcast").join("config.toml"))
    }

    /// Use `legacy_key` when no API key is configured
    pub fn apply_legacy_api_key(&mut self, legacy_key: Option<String>) {
        let configured = self
            .weather
            .api_key
            .as_ref()
            .is_some_and(|key| !key.trim().is_empty());
        if !configured {
            if let Some(key) = legacy_key.filter(|key| !key.trim().is_empty()) {
                self.weather.api_key = Some(key);
            }
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.server.port == 0 {
            self.server.port = default_server_port();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.units.is_empty() {
            self.weather.units = default_weather_units();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.cache.lifetime_seconds == 0 {
            self.cache.lifetime_seconds = default_cache_lifetime();
        }
        if self.cache.directory.as_os_str().is_empty() {
            self.cache.directory = default_cache_directory();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self
            .logging
            .otlp_endpoint
            .as_ref()
            .is_some_and(|endpoint| endpoint.trim().is_empty())
        {
            self.logging.otlp_endpoint = None;
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_weekend()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        match self.weather.api_key.as_deref().map(str::trim) {
            None | Some("") => Err(WeekendCastError::config(format!(
                "OpenWeatherMap API key is missing. Set weather.api_key, WEEKENDCAST_WEATHER__API_KEY or {LEGACY_API_KEY_VAR}."
            ))
            .into()),
            Some(_) => Ok(()),
        }
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(WeekendCastError::config("Weather API timeout cannot exceed 300 seconds").into());
        }

        if self.weather.max_retries > 10 {
            return Err(WeekendCastError::config("Weather API max retries cannot exceed 10").into());
        }

        if self.server.request_timeout_seconds > 300 {
            return Err(WeekendCastError::config("Request timeout cannot exceed 300 seconds").into());
        }

        if self.cache.lifetime_seconds == 0 || self.cache.lifetime_seconds > 86_400 {
            return Err(WeekendCastError::config(
                "Cache lifetime must be between 1 second and 86400 seconds (1 day)",
            )
            .into());
        }

        Ok(())
    }

    /// Validate the weekend window and day/night thresholds
    fn validate_weekend(&self) -> Result<()> {
        let weekend = &self.weekend;
        for (name, hour) in [
            ("start_hour", weekend.start_hour),
            ("end_hour", weekend.end_hour),
            ("day_start_hour", weekend.day_start_hour),
            ("day_end_hour", weekend.day_end_hour),
        ] {
            if hour > 23 {
                return Err(WeekendCastError::config(format!(
                    "weekend.{name} must be between 0 and 23, got {hour}"
                ))
                .into());
            }
        }

        let window = weekend.window();
        if window.start_of_week_offset() >= window.end_of_week_offset() {
            return Err(WeekendCastError::config(format!(
                "Weekend must start before it ends within a Monday-based week ({} {}:00 is not before {} {}:00)",
                weekend.start_day, weekend.start_hour, weekend.end_day, weekend.end_hour
            ))
            .into());
        }

        if weekend.day_start_hour >= weekend.day_end_hour {
            return Err(WeekendCastError::config(
                "weekend.day_start_hour must be before weekend.day_end_hour",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeekendCastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeekendCastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let valid_units = ["standard", "metric", "imperial"];
        if !valid_units.contains(&self.weather.units.as_str()) {
            return Err(WeekendCastError::config(format!(
                "Invalid units '{}'. Must be one of: {}",
                self.weather.units,
                valid_units.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://") && !self.weather.base_url.starts_with("https://") {
            return Err(
                WeekendCastError::config("Weather API base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        Ok(())
    }
}
