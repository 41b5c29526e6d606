//! JSON API served under `/api`

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};

use crate::config::WeekendConfig;
use crate::weather::WeatherService;

pub mod envelope;
pub mod handlers;

/// Shared state of every handler
pub struct AppState {
    pub weather: WeatherService,
    pub weekend: WeekendConfig,
    /// Directory holding `api_specs/<version>/openapi_spec.json`
    pub assets_dir: PathBuf,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(weather: WeatherService, weekend: WeekendConfig, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            weather,
            weekend,
            assets_dir: assets_dir.into(),
            started_at: Instant::now(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/admin/clear-cache", post(handlers::clear_cache))
        .route("/{version}/spec", get(handlers::api_spec))
        .route("/{version}/current", get(handlers::current))
        .route("/{version}/forecast", get(handlers::forecast))
        .route("/{version}/weekend", get(handlers::weekend))
        .route("/{version}/weekend-activities", get(handlers::weekend_activities))
        .with_state(state)
}

/// Fallback for unknown routes
pub async fn not_found() -> Response {
    envelope::failure(StatusCode::NOT_FOUND, "Route not found", Vec::new())
}
