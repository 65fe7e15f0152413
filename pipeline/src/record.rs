use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validate::InvalidReason;

/// One stream line as decoded, before validation. Every field is optional:
/// the generator deliberately omits or corrupts fields, and the processor
/// must accept whatever the line actually carried. `None` fields are dropped
/// on re-serialization so a missing-field fault round-trips unchanged.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RawRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl RawRecord {
    pub fn from_line(line: &str) -> Result<RawRecord, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Logical identity for duplicate detection. Falls back to a synthetic
    /// per-line token when either component is absent; those tokens are
    /// unique per ordinal and can never collide with a real identity.
    pub fn identity(&self, ordinal: u64) -> String {
        match (&self.sensor_id, &self.sequence_id) {
            (Some(sensor_id), Some(sequence_id)) => format!("{}_{}", sensor_id, sequence_id),
            _ => format!("UNKNOWN_{}", ordinal),
        }
    }
}

/// A record that passed validation, as written to the clean sink. Same JSON
/// shape as the well-formed input encoding, never an `error` key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorRecord {
    pub sensor_id: String,
    pub timestamp: i64,
    pub sequence_id: i64,
    pub value: f64,
}

impl SensorRecord {
    pub fn identity(&self) -> String {
        format!("{}_{}", self.sensor_id, self.sequence_id)
    }
}

/// One dead-letter line: either the raw text of a line that did not decode,
/// or the decoded fields of a record that failed validation, each annotated
/// with an `error` of the form `<KIND>: <detail>`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DeadLetterEntry {
    Undecodable {
        raw_data: String,
        error: String,
    },
    Invalid {
        #[serde(flatten)]
        record: RawRecord,
        error: String,
    },
}

impl DeadLetterEntry {
    pub fn undecodable(line: &str, cause: &serde_json::Error) -> DeadLetterEntry {
        DeadLetterEntry::Undecodable {
            raw_data: line.to_string(),
            error: format!("JSON_DECODE_ERROR: {}", cause),
        }
    }

    pub fn invalid(record: RawRecord, reason: &InvalidReason) -> DeadLetterEntry {
        DeadLetterEntry::Invalid {
            record,
            error: reason.to_string(),
        }
    }

    pub fn error(&self) -> &str {
        match self {
            DeadLetterEntry::Undecodable { error, .. } => error,
            DeadLetterEntry::Invalid { error, .. } => error,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{DeadLetterEntry, RawRecord};

    #[test]
    fn identity_concatenates_sensor_and_sequence() {
        let record = RawRecord::from_line(
            r#"{"sensor_id":"LAB_01","timestamp":1700000000,"sequence_id":42,"value":21.5}"#,
        )
        .unwrap();
        assert_eq!(record.identity(7), "LAB_01_42");
    }

    #[test]
    fn identity_falls_back_to_ordinal_when_fields_missing() {
        let record = RawRecord::from_line(r#"{"timestamp":1700000000,"value":21.5}"#).unwrap();
        assert_eq!(record.identity(3), "UNKNOWN_3");

        let record = RawRecord::from_line(r#"{"sensor_id":"LAB_01","value":21.5}"#).unwrap();
        assert_eq!(record.identity(4), "UNKNOWN_4");
    }

    #[test]
    fn missing_value_is_not_serialized_as_null() {
        let record = RawRecord::from_line(
            r#"{"sensor_id":"LAB_01","timestamp":1700000000,"sequence_id":42}"#,
        )
        .unwrap();
        let encoded = serde_json::to_value(&record).unwrap();
        assert_eq!(
            encoded,
            json!({"sensor_id":"LAB_01","timestamp":1700000000,"sequence_id":42})
        );
    }

    #[test]
    fn undecodable_entry_keeps_raw_text() {
        let err = RawRecord::from_line("not-json").unwrap_err();
        let entry = DeadLetterEntry::undecodable("not-json", &err);
        let encoded = serde_json::to_value(&entry).unwrap();
        assert_eq!(encoded["raw_data"], "not-json");
        assert!(encoded["error"]
            .as_str()
            .unwrap()
            .starts_with("JSON_DECODE_ERROR"));
    }
}
