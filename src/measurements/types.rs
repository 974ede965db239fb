//! Shared data types for measurement classification.
//!
//! Data sources:
//! - Raw readings: last data row of the per-device feed (keys × values)
//! - Issue suppression: the device descriptor's `issues` list

use serde::{Deserialize, Serialize};

/// A single raw sensor value as it arrives from the feed.
///
/// `NoData` covers both a field missing from the reading row and a value
/// suppressed because the device reported an issue for that measurement.
/// Numeric parsing failures also land here rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorValue {
    Number(f64),
    NoData,
}

impl SensorValue {
    /// Parse a JSON value from the reading row.
    /// Numbers pass through; numeric strings are parsed; everything else
    /// (null, objects, non-numeric strings) degrades to `NoData`.
    pub fn from_json(value: Option<&serde_json::Value>) -> Self {
        match value {
            Some(serde_json::Value::Number(n)) => match n.as_f64() {
                Some(v) if v.is_finite() => SensorValue::Number(v),
                _ => SensorValue::NoData,
            },
            Some(serde_json::Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => SensorValue::Number(v),
                _ => SensorValue::NoData,
            },
            _ => SensorValue::NoData,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SensorValue::Number(v) => Some(*v),
            SensorValue::NoData => None,
        }
    }
}

/// Ordinal classification of a measurement's health/safety impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeverityTier {
    Good,
    Moderate,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl SeverityTier {
    /// Visual indicator for the dashboard: success for `Good`, warning for
    /// `Moderate`, error for everything above.
    pub fn icon(&self) -> StatusIcon {
        match self {
            SeverityTier::Good => StatusIcon::Success,
            SeverityTier::Moderate => StatusIcon::Warning,
            _ => StatusIcon::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusIcon {
    Success,
    Warning,
    Error,
}

/// Closed set of measurement kinds the dashboard displays.
/// Heat is derived from the (temperature, humidity) pair rather than read
/// directly from the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasurementKind {
    #[serde(rename = "pm2_5")]
    Pm25,
    #[serde(rename = "uv")]
    Uv,
    #[serde(rename = "wind")]
    Wind,
    #[serde(rename = "rain")]
    Rain,
    #[serde(rename = "heat")]
    Heat,
}

impl MeasurementKind {
    /// Display name used on device cards.
    pub fn display_name(&self) -> &'static str {
        match self {
            MeasurementKind::Pm25 => "Air Pollution",
            MeasurementKind::Uv => "UV",
            MeasurementKind::Wind => "Wind",
            MeasurementKind::Rain => "Rain",
            MeasurementKind::Heat => "Heat Index",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "pm2_5" => Some(MeasurementKind::Pm25),
            "uv" => Some(MeasurementKind::Uv),
            "wind" => Some(MeasurementKind::Wind),
            "rain" => Some(MeasurementKind::Rain),
            "heat" => Some(MeasurementKind::Heat),
            _ => None,
        }
    }
}

/// A classified measurement ready for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedMeasurement {
    #[serde(rename = "type")]
    pub kind: MeasurementKind,
    pub raw_value: Option<f64>,
    pub display_value: String,
    pub severity_tier: SeverityTier,
    /// Status text; empty when the source omits it (heat with missing inputs).
    pub label: String,
    pub icon: StatusIcon,
}
