//! Schema-driven decoder for autopilot flight-telemetry recordings.
//!
//! A recording is a pair of files written by the autopilot ground station: a
//! loosely-XML schema describing per-aircraft message formats, and a data
//! stream of timestamped telemetry records encoded against that schema.
//! Skylog turns the pair into typed records:
//!
//! - [`SchemaCatalog`] extracts a typed message catalog from the schema text
//! - [`TextDecoder`] / [`BinaryDecoder`] decode the record stream against the
//!   catalog, recovering from corruption instead of aborting
//! - [`VersionGuard`] fingerprints the decoding logic so previously decoded
//!   sessions can be selectively re-decoded when it changes
//!
//! The core is pure: callers supply already-read buffers and own all
//! persistence. Decoding is synchronous with no shared mutable state, so
//! distinct sessions decode concurrently by sharing the catalog by reference.
//!
//! # Example
//!
//! ```rust
//! use skylog::{SchemaCatalog, TextDecoder};
//!
//! let schema = r#"
//!     <conf>
//!       <aircraft ac_id="3" name="Bixler" airframe="fixedwing"/>
//!       <msg_class NAME="telemetry">
//!         <message NAME="GPS" ID="8">
//!           <field NAME="lat" TYPE="float" UNIT="deg"/>
//!           <field NAME="lon" TYPE="float" UNIT="deg"/>
//!           <field NAME="alt" TYPE="int16" UNIT="m"/>
//!         </message>
//!       </msg_class>
//!     </conf>
//! "#;
//!
//! let catalog = SchemaCatalog::build(schema)?;
//! let records = TextDecoder::decode(b"12.5 3 GPS 48.1,11.5,350", &catalog);
//!
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].aircraft_id, 3);
//! assert_eq!(records[0].field("alt").and_then(|v| v.as_i64()), Some(350));
//! # Ok::<(), skylog::SchemaError>(())
//! ```

pub mod decoder;
mod error;
pub mod schema;
pub mod session;
pub mod types;
pub mod version;

pub use decoder::{BinaryDecoder, TextDecoder};
pub use error::{FieldError, Result, SchemaError};
pub use schema::{SchemaCatalog, TELEMETRY_CLASS};
pub use session::{SessionRecord, SessionStats, recording_start_time};
pub use types::{
    AircraftDefinition, DecodedRecord, FieldDefinition, FieldType, MessageDefinition, ScalarType,
    Value,
};
pub use version::{VersionFingerprint, VersionGuard};

/// Wire encoding of a telemetry data stream.
///
/// The text encoding is what production recordings use; the binary framing is
/// kept as the second implementation of the same contract for streams that
/// carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    Binary,
    Text,
}

/// One-call pipeline: build the catalog from schema text, then decode the
/// data stream under the given wire encoding.
///
/// # Errors
///
/// Only schema construction can fail; record decoding is always best-effort
/// and returns whatever could be extracted.
pub fn decode_recording(
    schema_text: &str,
    data: &[u8],
    format: WireFormat,
) -> Result<Vec<DecodedRecord>> {
    let catalog = SchemaCatalog::build(schema_text)?;
    let records = match format {
        WireFormat::Binary => BinaryDecoder::decode(data, &catalog),
        WireFormat::Text => TextDecoder::decode(data, &catalog),
    };
    Ok(records)
}
