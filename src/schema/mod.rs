//! Schema catalog extraction
//!
//! The schema file is a loosely-XML document declaring aircraft and their
//! message/field layouts. This module turns it into a typed, fully resolved
//! [`SchemaCatalog`]:
//! - `xml_cleanup` repairs the unescaped characters real recordings contain
//! - `catalog` parses the repaired document into definitions and binds each
//!   aircraft to the `telemetry` message class
//!
//! Construction is pure: the builder receives text and performs no I/O.

mod catalog;
mod xml_cleanup;

pub use catalog::{SchemaCatalog, TELEMETRY_CLASS};
pub use xml_cleanup::clean_schema_text;
