//! JSON response envelopes shared by every endpoint

use axum::Json;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use rand::RngExt;
use serde::Serialize;

use crate::WeekendCastError;
use crate::cache::CacheStatus;

pub const X_CACHE: &str = "x-cache";
pub const X_CACHE_AGE: &str = "x-cache-age";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub request_id: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_status: Option<&'static str>,
}

impl Meta {
    fn new(cache_status: Option<CacheStatus>) -> Self {
        Self {
            request_id: format!("req_{:016x}", rand::rng().random::<u64>()),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            cache_status: cache_status.map(|status| status.as_str()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessEnvelope<T> {
    pub status: &'static str,
    pub code: u16,
    pub message: String,
    pub data: T,
    pub meta: Meta,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub status: &'static str,
    pub code: u16,
    pub message: String,
    pub errors: Vec<String>,
    pub meta: Meta,
}

/// 200 response wrapping `data`; cached data also gets `X-Cache` headers.
pub fn success<T: Serialize>(message: &str, data: T, cache_status: Option<CacheStatus>) -> Response {
    let envelope = SuccessEnvelope {
        status: "success",
        code: StatusCode::OK.as_u16(),
        message: message.to_string(),
        data,
        meta: Meta::new(cache_status),
    };

    let mut response = (StatusCode::OK, Json(envelope)).into_response();
    if let Some(cache_status) = cache_status {
        let headers = response.headers_mut();
        headers.insert(X_CACHE, HeaderValue::from_static(cache_status.as_str()));
        headers.insert(X_CACHE_AGE, HeaderValue::from(cache_status.age_seconds()));
    }
    response
}

/// Error response with an explicit status
pub fn failure(code: StatusCode, message: impl Into<String>, errors: Vec<String>) -> Response {
    let envelope = ErrorEnvelope {
        status: "error",
        code: code.as_u16(),
        message: message.into(),
        errors,
        meta: Meta::new(None),
    };
    (code, Json(envelope)).into_response()
}

/// Handler error rendered as an error envelope
#[derive(Debug)]
pub struct ApiError(pub WeekendCastError);

impl From<WeekendCastError> for ApiError {
    fn from(err: WeekendCastError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.status_code();
        if code.is_server_error() {
            tracing::error!(error = %self.0, status = code.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self.0, status = code.as_u16(), "Request rejected");
        }

        // internal details stay in the logs
        let errors = match &self.0 {
            WeekendCastError::Validation { .. }
            | WeekendCastError::NotFound { .. }
            | WeekendCastError::Upstream { .. }
            | WeekendCastError::Api { .. } => vec![self.0.to_string()],
            _ => Vec::new(),
        };
        failure(code, self.0.user_message(), errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_success_sets_headers() {
        let response = success("ok", 1, Some(CacheStatus::Hit { age_seconds: 12 }));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[X_CACHE], "HIT");
        assert_eq!(response.headers()[X_CACHE_AGE], "12");
    }

    #[test]
    fn test_uncached_success_has_no_cache_headers() {
        let response = success("ok", 1, None);
        assert!(response.headers().get(X_CACHE).is_none());
    }

    #[test]
    fn test_api_error_status() {
        let response = ApiError(WeekendCastError::validation("bad city")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError(WeekendCastError::upstream("OpenWeatherMap", 401)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = ApiError(WeekendCastError::cache("disk full")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_request_ids_differ() {
        assert_ne!(Meta::new(None).request_id, Meta::new(None).request_id);
    }
}
