//! Per-location vacation-suitability scoring.
//!
//! Aggregates each device's recent rows into per-measurement means, filters
//! implausible values, and scores the location on comfort criteria. The
//! resulting `LocationSummary` records feed the Top-N ranker.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::devices::{DeviceDescriptor, DeviceSeries};
use crate::measurements::SensorValue;
use crate::ranking::LocationSummary;

/// Measurement fields the scoring pipeline aggregates. The analyzer API uses
/// `wind_speed` (underscore) where the live feed uses `"wind speed"`.
pub const SCORED_MEASUREMENTS: [&str; 6] = [
    "temperature",
    "pm2_5",
    "humidity",
    "uv",
    "wind_speed",
    "rain",
];

/// Minimum rows a location needs before its summary is considered reliable.
pub const MIN_ENTRIES: usize = 10;

/// Trailing window of data the scoring pipeline fetches per device.
pub const RECOMMENDATION_WINDOW_DAYS: i64 = 120;

/// A measurement whose invalid-value rate exceeds this is dropped entirely.
const MAX_INVALID_RATE: f64 = 0.3;

/// A pm2_5 mean above this is treated as a sensor fault, not real pollution.
const PM25_FAULT_MEAN: f64 = 500.0;

/// Plausible value range per measurement; readings outside are invalid.
fn valid_range(measurement: &str) -> Option<(f64, f64)> {
    match measurement {
        "temperature" => Some((-50.0, 60.0)),
        "pm2_5" => Some((0.0, 1000.0)),
        "humidity" => Some((0.0, 100.0)),
        "uv" => Some((0.0, 15.0)),
        "wind_speed" => Some((0.0, 150.0)),
        "rain" => Some((0.0, 50.0)),
        _ => None,
    }
}

/// Resolve a device's reported issues to the measurements they affect.
/// Accepts both the human-readable issue names of the analyzer feed and raw
/// measurement names.
pub fn problematic_measurements(issues: &[String]) -> HashSet<String> {
    let mut out = HashSet::new();
    for issue in issues {
        match issue.as_str() {
            "Wind Speed and Direction" => {
                out.insert("wind_speed".to_string());
            }
            "Rain" => {
                out.insert("rain".to_string());
            }
            "Temperature" => {
                out.insert("temperature".to_string());
            }
            "UV" => {
                out.insert("uv".to_string());
            }
            "Humidity" => {
                out.insert("humidity".to_string());
            }
            "Air Pollution" => {
                out.insert("pm2_5".to_string());
            }
            other => {
                out.insert(other.to_string());
            }
        }
    }
    out
}

/// Mean of each measurement over the given rows, excluding problematic
/// measurements and implausible values.
///
/// A measurement where more than 30% of readings fall outside its valid
/// range is dropped. A pm2_5 mean above 500 is nulled as a sensor fault.
/// Means are rounded to two decimals.
pub fn compute_average(
    entries: &[rustc_hash::FxHashMap<&str, &Value>],
    problematic: &HashSet<String>,
) -> HashMap<String, Option<f64>> {
    let mut stats: HashMap<&str, Vec<f64>> = HashMap::new();
    let mut invalid_counts: HashMap<&str, usize> = HashMap::new();
    let total_entries = entries.len();

    for entry in entries {
        for measurement in SCORED_MEASUREMENTS {
            if problematic.contains(measurement) {
                continue;
            }
            let Some(value) = SensorValue::from_json(entry.get(measurement).copied()).as_f64()
            else {
                continue;
            };

            let in_range = valid_range(measurement)
                .is_none_or(|(min, max)| value >= min && value <= max);
            if in_range {
                stats.entry(measurement).or_default().push(value);
            } else {
                *invalid_counts.entry(measurement).or_default() += 1;
            }
        }
    }

    // Too many implausible readings means the sensor itself is suspect.
    if total_entries > 0 {
        for (measurement, count) in &invalid_counts {
            let invalid_rate = *count as f64 / total_entries as f64;
            if invalid_rate > MAX_INVALID_RATE {
                tracing::warn!(
                    measurement,
                    invalid = count,
                    total = total_entries,
                    "dropping measurement with high invalid rate"
                );
                stats.remove(measurement);
            }
        }
    }

    let mut summary = HashMap::new();
    for measurement in SCORED_MEASUREMENTS {
        let mean = stats.get(measurement).filter(|v| !v.is_empty()).map(|values| {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            (mean * 100.0).round() / 100.0
        });

        let mean = match (measurement, mean) {
            ("pm2_5", Some(m)) if m > PM25_FAULT_MEAN => {
                tracing::warn!(mean = m, "pm2_5 average implausibly high, likely sensor issue");
                None
            }
            (_, m) => m,
        };

        summary.insert(measurement.to_string(), mean);
    }

    summary
}

/// Score a location's comfort from its measurement means.
///
/// Temperature in 18..=28 and pm2_5 ≤ 25 are worth two points each; low
/// rain, mild UV, and low wind one each. Fewer than two measured aspects
/// makes the score unreliable, so it collapses to zero.
pub fn score_location(summary: &HashMap<String, Option<f64>>) -> f64 {
    let mut score = 0.0;
    let mut measured_aspects = 0;

    let get = |key: &str| summary.get(key).copied().flatten();

    if let Some(temp) = get("temperature") {
        measured_aspects += 1;
        if (18.0..=28.0).contains(&temp) {
            score += 2.0;
        }
    }
    if let Some(pm) = get("pm2_5") {
        measured_aspects += 1;
        if pm <= 25.0 {
            score += 2.0;
        }
    }
    if let Some(rain) = get("rain") {
        measured_aspects += 1;
        if rain < 0.5 {
            score += 1.0;
        }
    }
    if let Some(uv) = get("uv") {
        measured_aspects += 1;
        if uv > 1.0 && uv < 3.0 {
            score += 1.0;
        }
    }
    if let Some(wind) = get("wind_speed") {
        measured_aspects += 1;
        if wind < 10.0 {
            score += 1.0;
        }
    }

    if measured_aspects < 2 {
        return 0.0;
    }
    score
}

/// Build a `LocationSummary` for one device, or `None` when the device has
/// too little data to score reliably.
pub fn summarize_location(
    descriptor: &DeviceDescriptor,
    series: &DeviceSeries,
) -> Option<LocationSummary> {
    let entries = series.entries();
    if entries.len() < MIN_ENTRIES {
        tracing::debug!(device = %descriptor.name, rows = entries.len(), "skipping, insufficient data");
        return None;
    }

    let location = format!(
        "{} - {}",
        descriptor.parent_name.as_deref().unwrap_or("Unknown"),
        descriptor.name
    );

    let problematic = problematic_measurements(&descriptor.issues);
    let summary = compute_average(&entries, &problematic);
    let score = score_location(&summary);

    Some(LocationSummary {
        location,
        score: Some(score),
        summary,
    })
}

/// Parse a recommendations payload: either a bare array of records or an
/// object wrapping one under a `recommendations` key.
pub fn parse_recommendations(value: &Value) -> Option<Vec<LocationSummary>> {
    let array = if value.is_array() {
        value.clone()
    } else {
        value.get("recommendations")?.clone()
    };
    serde_json::from_value(array).ok()
}

/// Structural validity check used for cache invalidation.
pub fn recommendations_is_valid(value: &Value) -> bool {
    value.is_array() || value.get("recommendations").is_some_and(|r| r.is_array())
}
