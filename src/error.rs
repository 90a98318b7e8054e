//! Error types for schema parsing and field decoding.
//!
//! The error model follows the crate's guiding policy: schema construction is
//! strict (a broken schema makes nothing decodable, so it fails loudly), while
//! record decoding is lenient (a broken field or record never prevents
//! extracting everything else).
//!
//! ## Error categories
//!
//! - [`SchemaError`]: fatal, aborts catalog construction. The caller gets no
//!   usable catalog and must fix the schema file.
//! - [`FieldError`]: always recovered inside the decoders. The affected field
//!   becomes [`Value::Null`](crate::Value::Null) and decoding proceeds with
//!   the next field; a diagnostic is emitted via `tracing`.

use thiserror::Error;

/// Result type alias for catalog construction.
pub type Result<T, E = SchemaError> = std::result::Result<T, E>;

/// Fatal errors raised while building a [`SchemaCatalog`](crate::SchemaCatalog).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SchemaError {
    /// The schema document could not be parsed as structured markup, even
    /// after the tolerant cleanup pre-pass.
    #[error("malformed schema document: {details}")]
    Malformed { details: String },

    /// The schema declared aircraft but no `telemetry` message class, so no
    /// runtime message can ever be resolved.
    #[error("schema has no 'telemetry' message class")]
    MissingTelemetryClass,
}

impl SchemaError {
    /// Helper constructor for malformed-document errors.
    pub fn malformed(details: impl Into<String>) -> Self {
        SchemaError::Malformed { details: details.into() }
    }
}

impl From<roxmltree::Error> for SchemaError {
    fn from(err: roxmltree::Error) -> Self {
        SchemaError::Malformed { details: err.to_string() }
    }
}

/// Per-field decode errors. Always recoverable at the record level.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FieldError {
    /// Not enough bytes (or no token) remain for the field's fixed width.
    #[error("field '{field}' truncated: needed {needed} bytes, {available} available")]
    Truncated { field: String, needed: usize, available: usize },

    /// The field's declared type tag is not part of the supported enumeration.
    #[error("field '{field}' has unknown type tag '{tag}'")]
    UnknownType { field: String, tag: String },
}

impl FieldError {
    /// Helper constructor for truncation errors.
    pub fn truncated(field: impl Into<String>, needed: usize, available: usize) -> Self {
        FieldError::Truncated { field: field.into(), needed, available }
    }

    /// Helper constructor for unknown-type errors.
    pub fn unknown_type(field: impl Into<String>, tag: impl Into<String>) -> Self {
        FieldError::UnknownType { field: field.into(), tag: tag.into() }
    }

    /// Whether the enclosing record can still be emitted after this error.
    ///
    /// Currently every field error is recoverable; the method exists so the
    /// decoders read as policy rather than accident.
    pub fn is_recoverable(&self) -> bool {
        true
    }
}
