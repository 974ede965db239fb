//! Severity classification for raw sensor values.
//!
//! Each measurement kind carries its own fixed threshold bands (upper bound
//! exclusive unless noted). Missing or unparseable values never fail; they
//! classify as a neutral "No Data" result.

use super::heat_index::compute_heat_index;
use super::types::*;

/// Display placeholder for values that are absent from the feed.
pub const NO_DATA_DISPLAY: &str = "—";

/// pm2_5 bands: <12, <36, <56, <151, ≥151.
fn pm25_band(v: f64) -> (SeverityTier, &'static str) {
    match v {
        v if v < 12.0 => (SeverityTier::Good, "Good"),
        v if v < 36.0 => (SeverityTier::Moderate, "Moderate"),
        v if v < 56.0 => (SeverityTier::Unhealthy, "Unhealthy (Sensitive)"),
        v if v < 151.0 => (SeverityTier::VeryUnhealthy, "Very unhealthy"),
        _ => (SeverityTier::Hazardous, "Hazardous"),
    }
}

/// UV index bands: <3, ≤5, ≤7, ≤10, >10.
fn uv_band(v: f64) -> (SeverityTier, &'static str) {
    match v {
        v if v < 3.0 => (SeverityTier::Good, "Low"),
        v if v <= 5.0 => (SeverityTier::Moderate, "Moderate"),
        v if v <= 7.0 => (SeverityTier::Unhealthy, "High"),
        v if v <= 10.0 => (SeverityTier::VeryUnhealthy, "Very High"),
        _ => (SeverityTier::Hazardous, "Extreme"),
    }
}

/// Wind speed bands: <19, ≤24, ≤31, ≤38, >38.
fn wind_band(v: f64) -> (SeverityTier, &'static str) {
    match v {
        v if v < 19.0 => (SeverityTier::Good, "Light"),
        v if v <= 24.0 => (SeverityTier::Moderate, "Fresh Breeze"),
        v if v <= 31.0 => (SeverityTier::Unhealthy, "Strong Breeze"),
        v if v <= 38.0 => (SeverityTier::VeryUnhealthy, "Near Gale"),
        _ => (SeverityTier::Hazardous, "Gale"),
    }
}

/// Rainfall bands: <2.5, <7.5, <15, <30, ≥30.
fn rain_band(v: f64) -> (SeverityTier, &'static str) {
    match v {
        v if v < 2.5 => (SeverityTier::Good, "Light"),
        v if v < 7.5 => (SeverityTier::Moderate, "Moderate"),
        v if v < 15.0 => (SeverityTier::Unhealthy, "Heavy"),
        v if v < 30.0 => (SeverityTier::VeryUnhealthy, "Intense"),
        _ => (SeverityTier::Hazardous, "Torrential"),
    }
}

/// Heat index bands: <80, <90, <103, <125, ≥125.
/// The top two bands share the "Extreme Danger" label in the source.
fn heat_band(hi: f64) -> (SeverityTier, &'static str) {
    match hi {
        hi if hi < 80.0 => (SeverityTier::Good, "Caution"),
        hi if hi < 90.0 => (SeverityTier::Moderate, "Extreme Caution"),
        hi if hi < 103.0 => (SeverityTier::Unhealthy, "Danger"),
        hi if hi < 125.0 => (SeverityTier::VeryUnhealthy, "Extreme Danger"),
        _ => (SeverityTier::Hazardous, "Extreme Danger"),
    }
}

fn no_data(kind: MeasurementKind) -> ClassifiedMeasurement {
    ClassifiedMeasurement {
        kind,
        raw_value: None,
        display_value: NO_DATA_DISPLAY.to_string(),
        severity_tier: SeverityTier::Moderate,
        label: "No Data".to_string(),
        icon: SeverityTier::Moderate.icon(),
    }
}

/// Classify a single raw value for one measurement kind.
///
/// `Heat` is derived from a pair and cannot be classified from a single
/// value; it falls through to the missing-pair result of [`classify_heat`].
pub fn classify(kind: MeasurementKind, value: &SensorValue) -> ClassifiedMeasurement {
    let v = match value.as_f64() {
        Some(v) if v.is_finite() => v,
        _ => return no_data(kind),
    };

    let (tier, label) = match kind {
        MeasurementKind::Pm25 => pm25_band(v),
        MeasurementKind::Uv => uv_band(v),
        MeasurementKind::Wind => wind_band(v),
        MeasurementKind::Rain => rain_band(v),
        MeasurementKind::Heat => return classify_heat(&SensorValue::NoData, &SensorValue::NoData),
    };

    ClassifiedMeasurement {
        kind,
        raw_value: Some(v),
        display_value: format!("{:.1}", v),
        severity_tier: tier,
        label: label.to_string(),
        icon: tier.icon(),
    }
}

/// Classify the derived heat index from a (temperature, humidity) pair.
///
/// When either member is missing the result carries a neutral tier, a dash
/// display value, and no status text (the source omits the label here rather
/// than showing "No Data").
pub fn classify_heat(temp: &SensorValue, humidity: &SensorValue) -> ClassifiedMeasurement {
    let (t, h) = match (temp.as_f64(), humidity.as_f64()) {
        (Some(t), Some(h)) => (t, h),
        _ => {
            return ClassifiedMeasurement {
                kind: MeasurementKind::Heat,
                raw_value: None,
                display_value: NO_DATA_DISPLAY.to_string(),
                severity_tier: SeverityTier::Moderate,
                label: String::new(),
                icon: SeverityTier::Moderate.icon(),
            }
        }
    };

    let hi = match compute_heat_index(t, h) {
        Some(hi) => hi,
        None => {
            return ClassifiedMeasurement {
                kind: MeasurementKind::Heat,
                raw_value: None,
                display_value: NO_DATA_DISPLAY.to_string(),
                severity_tier: SeverityTier::Moderate,
                label: String::new(),
                icon: SeverityTier::Moderate.icon(),
            }
        }
    };

    let (tier, label) = heat_band(hi);
    ClassifiedMeasurement {
        kind: MeasurementKind::Heat,
        raw_value: Some(hi),
        display_value: format!("{:.1}", hi),
        severity_tier: tier,
        label: label.to_string(),
        icon: tier.icon(),
    }
}

/// Outcome of classifying by name, where the kind may be unrecognized.
#[derive(Debug, Clone)]
pub struct Classification {
    pub severity_tier: SeverityTier,
    pub label: String,
    pub display_value: String,
    pub icon: StatusIcon,
}

/// Classify by measurement name, for callers holding the feed's string keys.
/// An unrecognized name yields a neutral tier with an "Unknown" label.
pub fn classify_named(name: &str, value: &SensorValue) -> Classification {
    match MeasurementKind::parse(name) {
        Some(kind) => {
            let c = classify(kind, value);
            Classification {
                severity_tier: c.severity_tier,
                label: c.label,
                display_value: c.display_value,
                icon: c.icon,
            }
        }
        None => Classification {
            severity_tier: SeverityTier::Moderate,
            label: "Unknown".to_string(),
            display_value: match value.as_f64() {
                Some(v) => format!("{:.1}", v),
                None => NO_DATA_DISPLAY.to_string(),
            },
            icon: SeverityTier::Moderate.icon(),
        },
    }
}
