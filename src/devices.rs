//! Per-device summaries and regional grouping.
//!
//! Data sources:
//! - Device list: array of descriptors with `generated_id`, `name`,
//!   `parent_name` and a list of reported measurement issues
//! - Per-device feed: `{ keys, data }` where the last data row is the most
//!   recent reading; `keys` name the columns of each row

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::measurements::{
    classify, classify_heat, generate_advice, AdviceInputs, ClassifiedMeasurement,
    MeasurementKind, SensorValue,
};

/// A device as listed by the device-list collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub generated_id: String,
    pub name: String,
    #[serde(default)]
    pub parent_name: Option<String>,
    /// Measurement names with a reported sensor issue; their values are
    /// suppressed rather than displayed.
    #[serde(default)]
    pub issues: Vec<String>,
}

/// Raw time series for one device. Rows are positional; `keys` names the
/// columns. The last row is the most recent reading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceSeries {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

impl DeviceSeries {
    /// Reconstruct the most recent reading as a key → value map.
    /// An empty series yields an empty map.
    pub fn latest_entry(&self) -> FxHashMap<&str, &Value> {
        let mut entry = FxHashMap::default();
        if let Some(row) = self.data.last() {
            for (key, value) in self.keys.iter().zip(row.iter()) {
                entry.insert(key.as_str(), value);
            }
        }
        entry
    }

    /// Reconstruct every row as a key → value map, oldest first.
    pub fn entries(&self) -> Vec<FxHashMap<&str, &Value>> {
        self.data
            .iter()
            .map(|row| {
                self.keys
                    .iter()
                    .zip(row.iter())
                    .map(|(k, v)| (k.as_str(), v))
                    .collect()
            })
            .collect()
    }
}

/// The six raw values a device card displays, after issue suppression.
#[derive(Debug, Clone, Copy)]
pub struct DeviceValues {
    pub uv: SensorValue,
    pub pm: SensorValue,
    pub temp: SensorValue,
    pub wind: SensorValue,
    pub humidity: SensorValue,
    pub rain: SensorValue,
}

impl DeviceValues {
    /// Extract the raw values from a reading map, suppressing any
    /// measurement the device has a reported issue for.
    pub fn from_entry(entry: &FxHashMap<&str, &Value>, issues: &[String]) -> Self {
        let pick = |key: &str| -> SensorValue {
            if issues.iter().any(|i| i == key) {
                SensorValue::NoData
            } else {
                SensorValue::from_json(entry.get(key).copied())
            }
        };

        DeviceValues {
            uv: pick("uv"),
            pm: pick("pm2_5"),
            temp: pick("temperature"),
            wind: pick("wind speed"),
            humidity: pick("humidity"),
            rain: pick("rain"),
        }
    }

    fn advice_inputs(&self) -> AdviceInputs {
        AdviceInputs {
            uv: self.uv.as_f64(),
            pm: self.pm.as_f64(),
            temp: self.temp.as_f64(),
            wind: self.wind.as_f64(),
            humidity: self.humidity.as_f64(),
            rain: self.rain.as_f64(),
        }
    }
}

/// Display payload for one device, built fresh per fetch cycle and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub name: String,
    pub region: Option<String>,
    pub timestamp: String,
    pub measurements: Vec<ClassifiedMeasurement>,
    pub advice: Vec<String>,
}

/// Build the display summary for one device from its descriptor and series.
pub fn build_device_summary(descriptor: &DeviceDescriptor, series: &DeviceSeries) -> DeviceSummary {
    let entry = series.latest_entry();

    let timestamp = entry
        .get("timestamp")
        .and_then(|v| v.as_str())
        .unwrap_or("—")
        .to_string();

    let values = DeviceValues::from_entry(&entry, &descriptor.issues);

    // Card order: air pollution, UV, wind, rain, derived heat index.
    let measurements = vec![
        classify(MeasurementKind::Pm25, &values.pm),
        classify(MeasurementKind::Uv, &values.uv),
        classify(MeasurementKind::Wind, &values.wind),
        classify(MeasurementKind::Rain, &values.rain),
        classify_heat(&values.temp, &values.humidity),
    ];

    let advice = generate_advice(&values.advice_inputs())
        .into_iter()
        .map(String::from)
        .collect();

    DeviceSummary {
        name: descriptor.name.clone(),
        region: descriptor.parent_name.clone(),
        timestamp,
        measurements,
        advice,
    }
}

/// Devices of one region, in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionGroup {
    pub region: String,
    pub devices: Vec<DeviceSummary>,
}

/// Group device summaries by region, preserving first-seen region order and
/// input order within each region. A missing or empty region groups under
/// "Other". No deduplication.
pub fn group_by_region(devices: Vec<DeviceSummary>) -> Vec<RegionGroup> {
    let mut groups: Vec<RegionGroup> = Vec::new();

    for device in devices {
        let region = match device.region.as_deref() {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => "Other".to_string(),
        };

        match groups.iter_mut().find(|g| g.region == region) {
            Some(group) => group.devices.push(device),
            None => groups.push(RegionGroup {
                region,
                devices: vec![device],
            }),
        }
    }

    groups
}
