use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::AppState;
use super::envelope::{ApiError, success};
use crate::cache::CacheStatus;
use crate::models::{LocationCharacteristics, WeekendBounds};
use crate::suggestions::ActivityPrompt;
use crate::weekend::{WeekendReport, weekend_report};
use crate::{Result, VERSION, WeekendCastError};

pub const SUPPORTED_VERSION: &str = "v1.9";

type HandlerResult = std::result::Result<Response, ApiError>;

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    #[serde(rename = "cityId")]
    pub city_id: Option<String>,
}

impl CityQuery {
    fn city_id(&self) -> Result<u64> {
        self.city_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .ok_or_else(|| WeekendCastError::validation("Invalid city ID. Please provide a valid integer."))
    }
}

fn ensure_supported(version: &str) -> Result<()> {
    if version == SUPPORTED_VERSION {
        Ok(())
    } else {
        Err(WeekendCastError::not_found(format!("API version {version} not supported")))
    }
}

/// Hit only when both parts were cached; the older age is reported
fn combined_status(a: CacheStatus, b: CacheStatus) -> CacheStatus {
    match (a, b) {
        (CacheStatus::Hit { age_seconds: x }, CacheStatus::Hit { age_seconds: y }) => {
            CacheStatus::Hit { age_seconds: x.max(y) }
        }
        _ => CacheStatus::Miss,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Health {
    status: &'static str,
    uptime: u64,
    version: &'static str,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let health = Health {
        status: "OK",
        uptime: state.started_at.elapsed().as_secs(),
        version: VERSION,
    };
    success("Service is healthy.", health, None)
}

#[instrument(skip(state))]
pub async fn api_spec(State(state): State<Arc<AppState>>, Path(version): Path<String>) -> HandlerResult {
    if version.is_empty() || version.contains("..") || version.contains(['/', '\\']) {
        return Err(WeekendCastError::validation(format!("Invalid API version '{version}'")).into());
    }

    let path = state
        .assets_dir
        .join("api_specs")
        .join(&version)
        .join("openapi_spec.json");
    let document = match tokio::fs::read(&path).await {
        Ok(document) => document,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(WeekendCastError::not_found(format!("API spec for version {version} not found.")).into());
        }
        Err(err) => return Err(WeekendCastError::from(err).into()),
    };
    let document: serde_json::Value = serde_json::from_slice(&document).map_err(WeekendCastError::from)?;

    Ok(Json(document).into_response())
}

#[instrument(skip(state))]
pub async fn current(
    State(state): State<Arc<AppState>>,
    Path(version): Path<String>,
    Query(query): Query<CityQuery>,
) -> HandlerResult {
    ensure_supported(&version)?;
    let city_id = query.city_id()?;

    let cached = state.weather.current_weather(city_id).await?;
    let characteristics =
        LocationCharacteristics::from_current(&cached.value, cached.status, &state.weekend.window());

    Ok(success("Data retrieved successfully.", characteristics, Some(cached.status)))
}

#[instrument(skip(state))]
pub async fn forecast(
    State(state): State<Arc<AppState>>,
    Path(version): Path<String>,
    Query(query): Query<CityQuery>,
) -> HandlerResult {
    ensure_supported(&version)?;
    let city_id = query.city_id()?;

    let cached = state.weather.forecast(city_id).await?;
    Ok(success("Data retrieved successfully.", cached.value, Some(cached.status)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WeekendForecast {
    weekend: WeekendBounds,
    /// `None` when no forecast sample falls inside the window
    temperature_range: Option<String>,
    overall_main: String,
    overall_description: String,
    report: WeekendReport,
    location_characteristics: LocationCharacteristics,
}

/// Current weather and forecast for `city_id`, fetched concurrently, and the
/// weekend report derived from them
async fn weekend_for_city(
    state: &AppState,
    city_id: u64,
) -> Result<(LocationCharacteristics, WeekendReport, CacheStatus)> {
    let (current, forecast) = futures::try_join!(
        state.weather.current_weather(city_id),
        state.weather.forecast(city_id)
    )?;

    // one offset for the window and its rendering, the current payload's
    let offset = current.value.timezone;
    if forecast.value.city.timezone != offset {
        tracing::warn!(
            current_offset = offset,
            forecast_offset = forecast.value.city.timezone,
            "Current weather and forecast disagree on the UTC offset"
        );
    }
    let series = forecast.value.to_series().at_offset(offset);
    let report = weekend_report(
        current.value.dt,
        &series,
        &state.weekend.window(),
        &state.weekend.dayparts(),
    );
    let characteristics =
        LocationCharacteristics::from_current(&current.value, current.status, &state.weekend.window());

    Ok((characteristics, report, combined_status(current.status, forecast.status)))
}

#[instrument(skip(state))]
pub async fn weekend(
    State(state): State<Arc<AppState>>,
    Path(version): Path<String>,
    Query(query): Query<CityQuery>,
) -> HandlerResult {
    ensure_supported(&version)?;
    let city_id = query.city_id()?;

    let (characteristics, report, status) = weekend_for_city(&state, city_id).await?;
    let summary = &report.summary;
    let data = WeekendForecast {
        weekend: WeekendBounds::new(&report.window, characteristics.location.timezone_offset),
        temperature_range: summary.temperature_range.map(|range| range.describe()),
        overall_main: summary.overall_main(),
        overall_description: summary.overall_description(),
        report,
        location_characteristics: characteristics,
    };

    let message = if data.report.summary.has_data() {
        "Data retrieved successfully."
    } else {
        "No weekend forecast available at this time."
    };
    Ok(success(message, data, Some(status)))
}

#[instrument(skip(state))]
pub async fn weekend_activities(
    State(state): State<Arc<AppState>>,
    Path(version): Path<String>,
    Query(query): Query<CityQuery>,
) -> HandlerResult {
    ensure_supported(&version)?;
    let city_id = query.city_id()?;

    let (characteristics, report, status) = weekend_for_city(&state, city_id).await?;
    let prompt = ActivityPrompt::new(&characteristics.location.name, &report.summary);

    Ok(success("Data retrieved successfully.", prompt, Some(status)))
}

#[instrument(skip(state))]
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> HandlerResult {
    let report = state.weather.clear_cache().await?;
    Ok(success("Cache cleared successfully.", report, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("2950159"), Some(2_950_159))]
    #[case(Some(" 42 "), Some(42))]
    #[case(Some("abc"), None)]
    #[case(Some("-5"), None)]
    #[case(Some("1.5"), None)]
    #[case(None, None)]
    fn test_city_id_parsing(#[case] raw: Option<&str>, #[case] expected: Option<u64>) {
        let query = CityQuery {
            city_id: raw.map(str::to_string),
        };
        assert_eq!(query.city_id().ok(), expected);
    }

    #[test]
    fn test_combined_status() {
        let hit = |age_seconds| CacheStatus::Hit { age_seconds };
        assert_eq!(combined_status(hit(3), hit(9)), hit(9));
        assert_eq!(combined_status(hit(3), CacheStatus::Miss), CacheStatus::Miss);
        assert_eq!(combined_status(CacheStatus::Miss, CacheStatus::Miss), CacheStatus::Miss);
    }

    #[test]
    fn test_only_current_version_is_supported() {
        assert!(ensure_supported("v1.9").is_ok());
        assert!(matches!(
            ensure_supported("v1.8"),
            Err(WeekendCastError::NotFound { .. })
        ));
    }
}
