//! Upstream collaborators: the device list and the per-device data API.
//!
//! The trait seam exists so the HTTP API can be driven by a fake gateway in
//! tests. The HTTP implementation performs one request per call with no
//! retries or explicit timeout; recovery is the caller's manual reload.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use thiserror::Error;

use crate::devices::{DeviceDescriptor, DeviceSeries};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Read access to the upstream sensor network.
#[async_trait]
pub trait ClimateGateway: Send + Sync {
    /// The full device list with regions and reported issues.
    async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, GatewayError>;

    /// Recent readings for one device (the feed's default window, which
    /// covers the current day).
    async fn device_series(&self, device_id: &str) -> Result<DeviceSeries, GatewayError>;

    /// Readings for one device over the trailing `days` days.
    async fn device_series_range(
        &self,
        device_id: &str,
        days: i64,
    ) -> Result<DeviceSeries, GatewayError>;
}

/// reqwest-backed gateway against the live endpoints.
pub struct HttpClimateGateway {
    client: reqwest::Client,
    device_list_url: String,
    data_api_url: String,
}

impl HttpClimateGateway {
    pub fn new(device_list_url: impl Into<String>, data_api_url: impl Into<String>) -> Self {
        HttpClimateGateway {
            client: reqwest::Client::new(),
            device_list_url: device_list_url.into(),
            data_api_url: data_api_url.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, GatewayError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ClimateGateway for HttpClimateGateway {
    async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, GatewayError> {
        self.get_json(&self.device_list_url).await
    }

    async fn device_series(&self, device_id: &str) -> Result<DeviceSeries, GatewayError> {
        let url = format!("{}?device_id={}", self.data_api_url, device_id);
        self.get_json(&url).await
    }

    async fn device_series_range(
        &self,
        device_id: &str,
        days: i64,
    ) -> Result<DeviceSeries, GatewayError> {
        let end = Utc::now().date_naive();
        let start = end - ChronoDuration::days(days);
        let url = format!(
            "{}?device_id={}&start_time={}&end_time={}",
            self.data_api_url,
            device_id,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
        );
        self.get_json(&url).await
    }
}
