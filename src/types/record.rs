//! Decoded telemetry record

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Value;

/// One decoded telemetry message instance.
///
/// Records are immutable value objects once produced; the decoders emit them
/// in stream order and callers may share them freely across threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedRecord {
    /// Timestamp in seconds since recording start. Monotonic within one clean
    /// recording, but noisy inputs are not required to be strictly increasing.
    pub timestamp: f64,
    /// Aircraft id from the record header.
    pub aircraft_id: u32,
    /// Message type name from the record header.
    pub message_type: String,
    /// Numeric message id, 0 when the message could not be resolved against
    /// the catalog.
    pub message_id: u32,
    /// Decoded field values keyed by field name.
    pub fields: HashMap<String, Value>,
    /// The raw byte span this record was decoded from, kept for diagnostics.
    #[serde(skip)]
    pub raw: Vec<u8>,
}

impl DecodedRecord {
    /// Stable view of the field map for caller-owned serialization.
    pub fn field_map(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Get a specific field value.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Check whether a field was decoded for this record.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}
