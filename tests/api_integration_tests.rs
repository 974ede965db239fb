// API Integration Tests
//
// Purpose: Drive the full router with a fake upstream gateway and check the
// dashboard views end to end, including session-cache behavior.
// Run with: cargo test --test api_integration_tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use climatenet_dashboard::{
    create_router, AppState, ClimateGateway, DeviceDescriptor, DeviceSeries, GatewayError,
};
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot

// =========================================================================
// Fake gateway
// =========================================================================

#[derive(Default)]
struct FakeGateway {
    devices: Vec<DeviceDescriptor>,
    series: HashMap<String, DeviceSeries>,
    range_series: HashMap<String, DeviceSeries>,
    fetch_calls: AtomicU64,
}

#[async_trait]
impl ClimateGateway for FakeGateway {
    async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, GatewayError> {
        Ok(self.devices.clone())
    }

    async fn device_series(&self, device_id: &str) -> Result<DeviceSeries, GatewayError> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.series.get(device_id).cloned().unwrap_or_default())
    }

    async fn device_series_range(
        &self,
        device_id: &str,
        _days: i64,
    ) -> Result<DeviceSeries, GatewayError> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .range_series
            .get(device_id)
            .cloned()
            .unwrap_or_default())
    }
}

fn descriptor(id: &str, name: &str, region: &str, issues: &[&str]) -> DeviceDescriptor {
    DeviceDescriptor {
        generated_id: id.to_string(),
        name: name.to_string(),
        parent_name: Some(region.to_string()),
        issues: issues.iter().map(|s| s.to_string()).collect(),
    }
}

fn today_timestamp() -> String {
    format!("{} 10:00:00", chrono::Utc::now().date_naive().format("%Y-%m-%d"))
}

/// One current reading with the live feed's column names.
fn live_series(uv: f64, pm: f64, temp: f64, wind: f64, humidity: f64, rain: f64) -> DeviceSeries {
    DeviceSeries {
        keys: vec![
            "timestamp".to_string(),
            "uv".to_string(),
            "pm2_5".to_string(),
            "temperature".to_string(),
            "wind speed".to_string(),
            "humidity".to_string(),
            "rain".to_string(),
        ],
        data: vec![vec![
            json!(today_timestamp()),
            json!(uv),
            json!(pm),
            json!(temp),
            json!(wind),
            json!(humidity),
            json!(rain),
        ]],
    }
}

/// Twelve identical rows with the analyzer's column names, enough to score.
fn scored_series(temp: f64, pm: f64, rain: f64, uv: f64, wind: f64) -> DeviceSeries {
    DeviceSeries {
        keys: vec![
            "timestamp".to_string(),
            "temperature".to_string(),
            "pm2_5".to_string(),
            "rain".to_string(),
            "uv".to_string(),
            "wind_speed".to_string(),
        ],
        data: (0..12)
            .map(|_| {
                vec![
                    json!(today_timestamp()),
                    json!(temp),
                    json!(pm),
                    json!(rain),
                    json!(uv),
                    json!(wind),
                ]
            })
            .collect(),
    }
}

fn test_state(gateway: FakeGateway) -> AppState {
    AppState::new(Arc::new(gateway), Duration::from_secs(300))
}

fn shared_state(gateway: FakeGateway) -> (Arc<FakeGateway>, AppState) {
    let gateway = Arc::new(gateway);
    let state = AppState::new(gateway.clone(), Duration::from_secs(300));
    (gateway, state)
}

// Helper: Parse JSON response
async fn json_response(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&body).expect("Failed to parse JSON")
}

async fn get(app: axum::Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

// =========================================================================
// Section 1: Health Check
// =========================================================================

#[tokio::test]
async fn test_health_check() {
    let app = create_router(test_state(FakeGateway::default()));
    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_response(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

// =========================================================================
// Section 2: Devices by Region
// =========================================================================

#[tokio::test]
async fn test_devices_grouped_by_region_in_input_order() {
    let mut gateway = FakeGateway::default();
    gateway.devices = vec![
        descriptor("d0", "Center", "Yerevan", &[]),
        descriptor("d1", "Park", "Shirak", &[]),
        descriptor("d2", "North", "Yerevan", &[]),
    ];
    for id in ["d0", "d1", "d2"] {
        gateway
            .series
            .insert(id.to_string(), live_series(2.0, 8.0, 20.0, 5.0, 40.0, 0.0));
    }

    let app = create_router(test_state(gateway));
    let response = get(app, "/api/devices").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_response(response).await;
    let regions = body["regions"].as_array().unwrap();
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0]["region"], "Yerevan");
    assert_eq!(regions[1]["region"], "Shirak");

    let yerevan = regions[0]["devices"].as_array().unwrap();
    assert_eq!(yerevan.len(), 2);
    assert_eq!(yerevan[0]["name"], "Center");
    assert_eq!(yerevan[1]["name"], "North");
}

#[tokio::test]
async fn test_device_issue_suppresses_measurement() {
    let mut gateway = FakeGateway::default();
    gateway.devices = vec![descriptor("d0", "Center", "Yerevan", &["uv"])];
    gateway
        .series
        .insert("d0".to_string(), live_series(8.0, 60.0, 20.0, 5.0, 40.0, 0.0));

    let app = create_router(test_state(gateway));
    let body = json_response(get(app, "/api/devices").await).await;

    let device = &body["regions"][0]["devices"][0];
    let measurements = device["measurements"].as_array().unwrap();

    // Card order is pm2_5, uv, wind, rain, heat.
    assert_eq!(measurements[0]["type"], "pm2_5");
    assert_eq!(measurements[0]["label"], "Very unhealthy");
    assert_eq!(measurements[0]["severityTier"], "veryUnhealthy");

    // UV reads 8 upstream, but the reported issue suppresses it.
    assert_eq!(measurements[1]["type"], "uv");
    assert_eq!(measurements[1]["label"], "No Data");
    assert_eq!(measurements[1]["displayValue"], "—");

    // pm ≥ 56 is the only advice trigger here (uv is suppressed).
    let advice = device["advice"].as_array().unwrap();
    assert_eq!(advice.len(), 1);
    assert!(advice[0].as_str().unwrap().contains("Air quality"));
}

#[tokio::test]
async fn test_device_heat_index_present() {
    let mut gateway = FakeGateway::default();
    gateway.devices = vec![descriptor("d0", "Center", "Yerevan", &[])];
    gateway
        .series
        .insert("d0".to_string(), live_series(2.0, 8.0, 40.0, 5.0, 80.0, 0.0));

    let app = create_router(test_state(gateway));
    let body = json_response(get(app, "/api/devices").await).await;

    let heat = &body["regions"][0]["devices"][0]["measurements"][4];
    assert_eq!(heat["type"], "heat");
    assert!(heat["rawValue"].is_number());
    assert!(!heat["label"].as_str().unwrap().is_empty());
}

// =========================================================================
// Section 3: Daily Extremes + Session Cache
// =========================================================================

fn extremes_gateway() -> FakeGateway {
    let mut gateway = FakeGateway::default();
    gateway.devices = vec![
        descriptor("d0", "Center", "Yerevan", &[]),
        descriptor("d1", "Park", "Shirak", &[]),
    ];
    gateway
        .series
        .insert("d0".to_string(), live_series(2.0, 8.0, 31.0, 5.0, 40.0, 0.0));
    gateway
        .series
        .insert("d1".to_string(), live_series(2.0, 8.0, 12.0, 5.0, 40.0, 0.0));
    gateway
}

#[tokio::test]
async fn test_extremes_tracks_high_and_low() {
    let state = test_state(extremes_gateway());
    let app = create_router(state);

    let body = json_response(get(app, "/api/extremes").await).await;
    let high = &body["highest"]["temperature"];
    assert_eq!(high["value"], 31.0);
    assert_eq!(high["location"], "Yerevan - Center");
    let low = &body["lowest"]["temperature"];
    assert_eq!(low["value"], 12.0);
    assert_eq!(low["location"], "Shirak - Park");
}

#[tokio::test]
async fn test_extremes_second_request_served_from_cache() {
    let (gateway, state) = shared_state(extremes_gateway());
    let app = create_router(state);

    let first = json_response(get(app.clone(), "/api/extremes").await).await;
    let calls_after_first = gateway.fetch_calls.load(Ordering::Relaxed);
    assert!(calls_after_first > 0);

    let second = json_response(get(app, "/api/extremes").await).await;
    assert_eq!(first, second);
    assert_eq!(gateway.fetch_calls.load(Ordering::Relaxed), calls_after_first);
}

#[tokio::test]
async fn test_malformed_cached_extremes_is_refetched() {
    let (gateway, state) = shared_state(extremes_gateway());
    let app = create_router(state.clone());

    // Seed the cache with a structurally invalid payload.
    state
        .cache
        .put("extremesData", json!({ "highest": {} }))
        .await;

    let body = json_response(get(app, "/api/extremes").await).await;
    assert!(body["lowest"].is_object());
    assert!(gateway.fetch_calls.load(Ordering::Relaxed) > 0);
}

// =========================================================================
// Section 4: Recommendations + Ranking
// =========================================================================

fn recommendations_gateway() -> FakeGateway {
    let mut gateway = FakeGateway::default();
    gateway.devices = vec![
        descriptor("d0", "Center", "Yerevan", &[]),
        descriptor("d1", "Park", "Shirak", &[]),
        descriptor("d2", "Coast", "Lori", &[]),
    ];
    // Scores: d0 = 7 (everything comfortable), d1 = 0, d2 = 4.
    gateway
        .range_series
        .insert("d0".to_string(), scored_series(22.0, 10.0, 0.1, 2.0, 4.0));
    gateway
        .range_series
        .insert("d1".to_string(), scored_series(35.0, 40.0, 5.0, 6.0, 20.0));
    gateway
        .range_series
        .insert("d2".to_string(), scored_series(20.0, 40.0, 0.1, 0.5, 4.0));
    gateway
}

#[tokio::test]
async fn test_recommendations_scores_locations() {
    let app = create_router(test_state(recommendations_gateway()));
    let body = json_response(get(app, "/api/recommendations").await).await;

    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 3);
    let first = &records[0];
    assert_eq!(first["location"], "Yerevan - Center");
    assert_eq!(first["score"], 7.0);
    assert_eq!(first["summary"]["temperature"], 22.0);
}

#[tokio::test]
async fn test_recommendations_skip_short_series() {
    let mut gateway = recommendations_gateway();
    gateway.range_series.insert(
        "d1".to_string(),
        DeviceSeries {
            keys: vec!["temperature".to_string()],
            data: vec![vec![json!(20.0)]],
        },
    );

    let app = create_router(test_state(gateway));
    let body = json_response(get(app, "/api/recommendations").await).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_top_recommendations_ranked_descending() {
    let app = create_router(test_state(recommendations_gateway()));
    let body = json_response(get(app, "/api/recommendations/top?metric=score").await).await;

    assert_eq!(body["metric"], "score");
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["name"], "Yerevan - Center");
    assert_eq!(data[0]["value"], 7.0);
    assert_eq!(data[2]["name"], "Shirak - Park");
}

#[tokio::test]
async fn test_top_recommendations_by_measurement_metric() {
    let app = create_router(test_state(recommendations_gateway()));
    let body = json_response(get(app, "/api/recommendations/top?metric=temperature").await).await;

    let data = body["data"].as_array().unwrap();
    // Mean temperatures: d1 = 35, d0 = 22, d2 = 20.
    assert_eq!(data[0]["name"], "Shirak - Park");
    assert_eq!(data[0]["value"], 35.0);
    assert_eq!(data[2]["name"], "Lori - Coast");
}

#[tokio::test]
async fn test_top_recommendations_ascending_for_chart() {
    let app = create_router(test_state(recommendations_gateway()));
    let body =
        json_response(get(app, "/api/recommendations/top?metric=score&ascending=true").await)
            .await;

    let data = body["data"].as_array().unwrap();
    assert_eq!(data[0]["name"], "Shirak - Park");
    assert_eq!(data[2]["name"], "Yerevan - Center");
}

#[tokio::test]
async fn test_top_recommendations_unknown_metric_rejected() {
    let app = create_router(test_state(recommendations_gateway()));
    let response = get(app, "/api/recommendations/top?metric=sunshine").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_response(response).await;
    assert!(body["error"].as_str().unwrap().contains("unknown metric"));
}
