use serde_json::Value;
use thiserror::Error;

use crate::record::{RawRecord, SensorRecord};

/// Bounds for the range check, inclusive on both ends.
#[derive(Debug, Clone, Copy)]
pub struct ValidationConfig {
    pub value_min: f64,
    pub value_max: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        ValidationConfig {
            value_min: 0.0,
            value_max: 50.0,
        }
    }
}

/// Why a decoded record was rejected. `Display` renders the dead-letter
/// `error` field, `<KIND>: <detail>`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidReason {
    #[error("MISSING_FIELD: field '{0}' is absent")]
    MissingField(&'static str),

    #[error("FORMAT_ERROR: 'value' is not a numeric type")]
    FormatError,

    #[error("RANGE_ERROR: value {value} outside allowed range ({min}-{max})")]
    RangeError { value: f64, min: f64, max: f64 },
}

impl InvalidReason {
    pub fn kind(&self) -> &'static str {
        match self {
            InvalidReason::MissingField(_) => "MISSING_FIELD",
            InvalidReason::FormatError => "FORMAT_ERROR",
            InvalidReason::RangeError { .. } => "RANGE_ERROR",
        }
    }
}

/// Schema, type and range checks, in that order, first failure wins.
/// Pure and total: every decodable record gets a definite outcome.
pub fn validate(
    record: &RawRecord,
    config: &ValidationConfig,
) -> Result<SensorRecord, InvalidReason> {
    let sensor_id = record
        .sensor_id
        .as_ref()
        .ok_or(InvalidReason::MissingField("sensor_id"))?;
    let timestamp = record
        .timestamp
        .ok_or(InvalidReason::MissingField("timestamp"))?;
    let sequence_id = record
        .sequence_id
        .ok_or(InvalidReason::MissingField("sequence_id"))?;
    let raw_value = record
        .value
        .as_ref()
        .ok_or(InvalidReason::MissingField("value"))?;

    let value = coerce_numeric(raw_value).ok_or(InvalidReason::FormatError)?;

    if value < config.value_min || value > config.value_max {
        return Err(InvalidReason::RangeError {
            value,
            min: config.value_min,
            max: config.value_max,
        });
    }

    Ok(SensorRecord {
        sensor_id: sensor_id.clone(),
        timestamp,
        sequence_id,
        value,
    })
}

/// JSON numbers coerce directly; strings coerce when they parse as a float.
/// Non-finite floats are rejected: they compare as in-range yet cannot be
/// re-encoded as JSON.
fn coerce_numeric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}
