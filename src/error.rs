//! Error types and handling for the `WeekendCast` backend

use axum::http::StatusCode;
use thiserror::Error;

/// Main error type for the `WeekendCast` backend
#[derive(Error, Debug)]
pub enum WeekendCastError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// The upstream service answered with a non-success status
    #[error("{service} responded with HTTP {status}")]
    Upstream { service: String, status: u16 },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Requested resource does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON encoding or decoding errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl WeekendCastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new upstream status error
    pub fn upstream<S: Into<String>>(service: S, status: u16) -> Self {
        Self::Upstream {
            service: service.into(),
            status,
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// HTTP status this error is reported with
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            WeekendCastError::Validation { .. } => StatusCode::BAD_REQUEST,
            WeekendCastError::NotFound { .. } => StatusCode::NOT_FOUND,
            WeekendCastError::Api { .. } | WeekendCastError::Upstream { .. } => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeekendCastError::Config { .. } => {
                "Configuration error. Please check the server configuration and API keys.".to_string()
            }
            WeekendCastError::Api { .. } => {
                "Unable to fetch data from OpenWeatherMap.".to_string()
            }
            WeekendCastError::Upstream { service, status } => {
                format!("Unable to fetch data from {service} (HTTP {status}).")
            }
            WeekendCastError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            WeekendCastError::NotFound { message } => message.clone(),
            WeekendCastError::Cache { .. } => {
                "Cache operation failed. You may need to clear the cache.".to_string()
            }
            WeekendCastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            WeekendCastError::Json { .. } => "Malformed data encountered.".to_string(),
            WeekendCastError::General { message } => message.clone(),
        }
    }
}

impl From<reqwest::Error> for WeekendCastError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => WeekendCastError::upstream("OpenWeatherMap", status.as_u16()),
            None => WeekendCastError::api(err.to_string()),
        }
    }
}

impl From<reqwest_middleware::Error> for WeekendCastError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(err) => err.into(),
            reqwest_middleware::Error::Middleware(err) => WeekendCastError::api(err.to_string()),
        }
    }
}
