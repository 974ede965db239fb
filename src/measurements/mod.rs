//! Measurement classification engine.
//!
//! Pure, stateless mapping from raw sensor values to display-ready severity
//! classifications, plus the derived heat index and per-device advice.

pub mod advice;
pub mod classify;
pub mod heat_index;
pub mod types;

pub use advice::{generate_advice, AdviceInputs};
pub use classify::{classify, classify_heat, classify_named, Classification, NO_DATA_DISPLAY};
pub use heat_index::compute_heat_index;
pub use types::{ClassifiedMeasurement, MeasurementKind, SensorValue, SeverityTier, StatusIcon};
