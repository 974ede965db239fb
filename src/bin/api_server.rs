// API Server Binary Entry Point
//
// Purpose: Start the Axum API server for the dashboard views
// Usage: cargo run --bin api_server

use std::sync::Arc;
use std::time::Duration;

use climatenet_dashboard::{AppState, create_router, HttpClimateGateway};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // Default log level: info for our crate, warn for others
                "climatenet_dashboard=info,tower_http=debug,axum=debug,warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    // Configuration from environment variables
    let device_list_url = std::env::var("DEVICE_LIST_URL")
        .unwrap_or_else(|_| "https://climatenet.am/device_inner/list".to_string());

    let data_api_url = std::env::var("DATA_API_URL").unwrap_or_else(|_| {
        "https://emvnh9buoh.execute-api.us-east-1.amazonaws.com/getData".to_string()
    });

    let cache_ttl_secs: u64 = std::env::var("CACHE_TTL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(300);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);

    tracing::info!("Configuration:");
    tracing::info!("  DEVICE_LIST_URL: {}", device_list_url);
    tracing::info!("  DATA_API_URL: {}", data_api_url);
    tracing::info!("  CACHE_TTL_SECS: {}", cache_ttl_secs);
    tracing::info!("  PORT: {}", port);

    // Initialize application state
    let gateway = Arc::new(HttpClimateGateway::new(device_list_url, data_api_url));
    let state = AppState::new(gateway, Duration::from_secs(cache_ttl_secs));

    // Create router with all endpoints and middleware
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
