// Axum API server module
//
// Purpose: JSON API for the dashboard views — live device data by region,
// daily extremes, and ranked location recommendations.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};

use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use std::sync::Arc;
use std::time::Duration;

use crate::devices::{build_device_summary, group_by_region, DeviceDescriptor, DeviceSeries};
use crate::extremes::{analyze_extremes, extremes_is_valid};
use crate::gateway::{ClimateGateway, GatewayError};
use crate::ranking::{top_n, LocationSummary, DEFAULT_TOP_N, SCORE_METRIC};
use crate::recommendations::{
    parse_recommendations, recommendations_is_valid, summarize_location,
    RECOMMENDATION_WINDOW_DAYS, SCORED_MEASUREMENTS,
};
use crate::session_cache::{SessionCache, EXTREMES_KEY, RECOMMENDATIONS_KEY};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn ClimateGateway>,
    pub cache: SessionCache,
}

impl AppState {
    pub fn new(gateway: Arc<dyn ClimateGateway>, cache_ttl: Duration) -> Self {
        AppState {
            gateway,
            cache: SessionCache::new(1_000, cache_ttl),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Dashboard views
        .route("/api/devices", get(get_devices))
        .route("/api/extremes", get(get_extremes))
        .route("/api/recommendations", get(get_recommendations))
        .route("/api/recommendations/top", get(get_top_recommendations))
        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Live device data grouped by region. Always fetched fresh: one device-list
/// request plus one data request per device per render cycle, no dedup.
async fn get_devices(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let devices = state.gateway.list_devices().await?;
    tracing::debug!(count = devices.len(), "building device summaries");

    let mut summaries = Vec::with_capacity(devices.len());
    for descriptor in &devices {
        let series = state.gateway.device_series(&descriptor.generated_id).await?;
        summaries.push(build_device_summary(descriptor, &series));
    }

    let regions = group_by_region(summaries);
    Ok(Json(serde_json::json!({ "regions": regions })))
}

/// Today's highest and lowest reading per measurement across all devices.
/// Served from the session cache when a structurally valid copy exists.
async fn get_extremes(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    if let Some(cached) = state.cache.get_valid(EXTREMES_KEY, extremes_is_valid).await {
        tracing::debug!("cache hit for extremes");
        return Ok(Json(cached));
    }

    let (devices, series) = fetch_all_series(&state, None).await?;
    let record = analyze_extremes(
        devices.iter().zip(series.iter()),
        chrono::Utc::now().date_naive(),
    );

    let result = serde_json::to_value(&record).map_err(|e| AppError::Internal(e.to_string()))?;
    state.cache.put(EXTREMES_KEY, result.clone()).await;

    Ok(Json(result))
}

/// All scored location summaries.
async fn get_recommendations(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let records = fetch_recommendations(&state).await?;
    let result = serde_json::to_value(&records).map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(result))
}

/// Query params for the ranked recommendations view.
#[derive(Debug, serde::Deserialize)]
struct TopQuery {
    metric: Option<String>,
    n: Option<usize>,
    /// Reverse the ranking for bottom-to-top chart display.
    ascending: Option<bool>,
}

/// Top locations by the selected metric, descending unless `ascending`.
async fn get_top_recommendations(
    State(state): State<AppState>,
    Query(params): Query<TopQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let metric = params.metric.as_deref().unwrap_or(SCORE_METRIC);
    if metric != SCORE_METRIC && !SCORED_MEASUREMENTS.contains(&metric) {
        return Err(AppError::BadRequest(format!("unknown metric: {}", metric)));
    }
    let n = params.n.unwrap_or(DEFAULT_TOP_N);

    let records = fetch_recommendations(&state).await?;
    let mut ranked = top_n(&records, metric, n);
    if params.ascending.unwrap_or(false) {
        ranked.reverse();
    }

    Ok(Json(serde_json::json!({
        "metric": metric,
        "data": ranked,
    })))
}

// ============================================================================
// Fetch Orchestration
// ============================================================================

/// Fetch the device list and each device's series. `days` selects the
/// trailing window; `None` uses the feed's default (the current day).
async fn fetch_all_series(
    state: &AppState,
    days: Option<i64>,
) -> Result<(Vec<DeviceDescriptor>, Vec<DeviceSeries>), AppError> {
    let devices = state.gateway.list_devices().await?;

    let mut series = Vec::with_capacity(devices.len());
    for descriptor in &devices {
        let s = match days {
            Some(days) => {
                state
                    .gateway
                    .device_series_range(&descriptor.generated_id, days)
                    .await?
            }
            None => state.gateway.device_series(&descriptor.generated_id).await?,
        };
        series.push(s);
    }

    Ok((devices, series))
}

/// Scored location summaries, via the session cache.
async fn fetch_recommendations(state: &AppState) -> Result<Vec<LocationSummary>, AppError> {
    if let Some(cached) = state
        .cache
        .get_valid(RECOMMENDATIONS_KEY, recommendations_is_valid)
        .await
    {
        if let Some(records) = parse_recommendations(&cached) {
            tracing::debug!("cache hit for recommendations");
            return Ok(records);
        }
        // Passed the shape check but not full decoding; drop and refetch.
        state.cache.invalidate(RECOMMENDATIONS_KEY).await;
    }

    let (devices, series) = fetch_all_series(state, Some(RECOMMENDATION_WINDOW_DAYS)).await?;
    let records: Vec<LocationSummary> = devices
        .iter()
        .zip(series.iter())
        .filter_map(|(d, s)| summarize_location(d, s))
        .collect();

    let raw = serde_json::to_value(&records).map_err(|e| AppError::Internal(e.to_string()))?;
    state.cache.put(RECOMMENDATIONS_KEY, raw).await;

    Ok(records)
}

// ============================================================================
// Error Handling
// ============================================================================

pub enum AppError {
    Upstream(String),
    BadRequest(String),
    Internal(String),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
