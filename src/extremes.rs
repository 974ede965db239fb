//! Daily extremes: highest and lowest reading per measurement across all
//! devices, restricted to the current UTC day.
//!
//! Devices with any reported issue are skipped entirely; rows with an
//! unparseable timestamp or from another day are ignored.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::devices::{DeviceDescriptor, DeviceSeries};
use crate::measurements::SensorValue;

/// Timestamp format of the device feed rows.
pub const FEED_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Measurements tracked by the extremes view. Pressure appears here even
/// though the device cards do not display it.
pub const EXTREME_MEASUREMENTS: [&str; 7] = [
    "temperature",
    "uv",
    "pm2_5",
    "humidity",
    "pressure",
    "wind speed",
    "rain",
];

/// A single extreme observation: the value, where, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremeEntry {
    pub value: f64,
    pub location: String,
    pub timestamp: String,
}

/// Daily extremes per measurement. Entries are null until a valid reading
/// for that measurement is seen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtremesRecord {
    pub highest: HashMap<String, Option<ExtremeEntry>>,
    pub lowest: HashMap<String, Option<ExtremeEntry>>,
}

impl ExtremesRecord {
    fn with_all_measurements() -> Self {
        let empty: HashMap<String, Option<ExtremeEntry>> = EXTREME_MEASUREMENTS
            .iter()
            .map(|m| (m.to_string(), None))
            .collect();
        ExtremesRecord {
            highest: empty.clone(),
            lowest: empty,
        }
    }
}

/// Structural validity check used for cache invalidation: both `highest` and
/// `lowest` must be present and non-null.
pub fn extremes_is_valid(value: &Value) -> bool {
    value.get("highest").is_some_and(|h| !h.is_null())
        && value.get("lowest").is_some_and(|l| !l.is_null())
}

/// Scan all device series and compute today's highest and lowest reading per
/// measurement.
pub fn analyze_extremes<'a, I>(devices: I, today: NaiveDate) -> ExtremesRecord
where
    I: IntoIterator<Item = (&'a DeviceDescriptor, &'a DeviceSeries)>,
{
    let mut record = ExtremesRecord::with_all_measurements();

    for (descriptor, series) in devices {
        // A device with known issues is excluded from extremes entirely.
        if !descriptor.issues.is_empty() {
            continue;
        }

        let location = format!(
            "{} - {}",
            descriptor.parent_name.as_deref().unwrap_or("Unknown"),
            descriptor.name
        );

        for entry in series.entries() {
            let Some(timestamp) = entry.get("timestamp").and_then(|v| v.as_str()) else {
                continue;
            };
            let Ok(parsed) = NaiveDateTime::parse_from_str(timestamp, FEED_TIMESTAMP_FORMAT)
            else {
                continue;
            };
            if parsed.date() != today {
                continue;
            }

            for measurement in EXTREME_MEASUREMENTS {
                let Some(value) =
                    SensorValue::from_json(entry.get(measurement).copied()).as_f64()
                else {
                    continue;
                };

                let candidate = ExtremeEntry {
                    value,
                    location: location.clone(),
                    timestamp: timestamp.to_string(),
                };

                let high = record.highest.entry(measurement.to_string()).or_default();
                if high.as_ref().is_none_or(|e| value > e.value) {
                    *high = Some(candidate.clone());
                }

                let low = record.lowest.entry(measurement.to_string()).or_default();
                if low.as_ref().is_none_or(|e| value < e.value) {
                    *low = Some(candidate);
                }
            }
        }
    }

    record
}
