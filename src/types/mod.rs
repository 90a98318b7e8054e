//! Core types for telemetry schema and record representation.
//!
//! The type system replaces the ad hoc dictionaries of older logging stacks
//! with fixed-shape records and exhaustive tag enumerations:
//! - [`ScalarType`] / [`FieldType`] map schema type tags to wire widths
//! - [`FieldDefinition`], [`MessageDefinition`] and [`AircraftDefinition`]
//!   describe the catalog entries extracted from a schema file
//! - [`Value`] is the runtime value a decoded field can take
//! - [`DecodedRecord`] is one decoded telemetry message instance
//!
//! Everything here is an immutable value object: catalogs are read-only after
//! construction and records are never mutated after emission, so both are
//! safely shared by reference across decode jobs.

mod definitions;
mod field_type;
mod record;
mod value;

pub use definitions::{AircraftDefinition, FieldDefinition, MessageDefinition};
pub use field_type::{FieldType, ScalarType};
pub use record::DecodedRecord;
pub use value::Value;
