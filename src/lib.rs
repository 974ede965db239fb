//! ClimateNet dashboard service.
//!
//! Fetches raw sensor readings from the upstream device network, classifies
//! them into human-readable severity bands, and serves the dashboard views:
//! - `devices`: per-device summaries with advice, grouped by region
//! - `extremes`: today's highest and lowest reading per measurement
//! - `recommendations`: per-location comfort scores, ranked top-N
//!
//! The classification core (`measurements`) is pure and stateless; the
//! fetch-and-cache orchestration lives in `api_server`.

pub mod api_server;
pub mod devices;
pub mod extremes;
pub mod gateway;
pub mod measurements;
pub mod ranking;
pub mod recommendations;
pub mod session_cache;

// Re-export commonly used types
pub use api_server::{create_router, AppState};
pub use devices::{build_device_summary, group_by_region, DeviceDescriptor, DeviceSeries, DeviceSummary};
pub use gateway::{ClimateGateway, GatewayError, HttpClimateGateway};
pub use measurements::{ClassifiedMeasurement, MeasurementKind, SensorValue, SeverityTier};
pub use ranking::{top_n, LocationSummary, RankedEntry};
pub use session_cache::SessionCache;
