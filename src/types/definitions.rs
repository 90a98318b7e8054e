//! Schema definition records: fields, messages, aircraft.
//!
//! These are the fixed-shape counterparts of what the schema file declares.
//! All three are immutable once the catalog is built and are safely shared by
//! read-only reference across decode jobs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::FieldType;

/// A single field declared inside a message definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name, unique within its message.
    pub name: String,
    /// The raw type tag as written in the schema, kept for diagnostics.
    pub type_tag: String,
    /// Parsed type; `None` when the tag is outside the supported enumeration,
    /// which surfaces per field at decode time rather than failing the schema.
    pub field_type: Option<FieldType>,
    /// Physical unit, e.g. `deg` or `m/s`.
    pub unit: Option<String>,
    /// Alternate display unit.
    pub alt_unit: Option<String>,
    /// Conversion coefficient into the alternate unit.
    pub alt_unit_coef: Option<f64>,
    /// Free-text description from the field element body.
    pub description: Option<String>,
    /// Ordered enumeration labels for enum-like fields.
    pub values: Option<Vec<String>>,
}

/// A message layout: ordered fields plus identification.
///
/// Field order is wire order and decode order; it must be preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDefinition {
    /// Message name, unique within its message class.
    pub name: String,
    /// Numeric message id, unique within its class.
    pub message_id: u32,
    /// Fields in declaration order.
    pub fields: Vec<FieldDefinition>,
    /// Optional description from the `<description>` child.
    pub description: Option<String>,
}

impl MessageDefinition {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// One aircraft entry from the schema, with its resolved message map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftDefinition {
    /// Numeric aircraft id, unique within a catalog.
    pub ac_id: u32,
    /// Display name.
    pub name: String,
    /// Airframe identifier string.
    pub airframe: String,
    /// Message name to definition map. Fully resolved before decode begins;
    /// there are no lazy schema lookups during decode.
    pub messages: HashMap<String, MessageDefinition>,
}

impl AircraftDefinition {
    /// Look up a message definition by name.
    pub fn message(&self, name: &str) -> Option<&MessageDefinition> {
        self.messages.get(name)
    }

    /// Look up a message definition by numeric id (linear scan; message maps
    /// hold at most a few hundred entries).
    pub fn message_by_id(&self, id: u32) -> Option<&MessageDefinition> {
        self.messages.values().find(|m| m.message_id == id)
    }
}
