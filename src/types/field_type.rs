//! Telemetry field type definitions

use serde::{Deserialize, Serialize};

/// Scalar wire types supported by the binary encoding.
///
/// Every scalar has a fixed little-endian width on the wire; the widths
/// drive both binary field decoding and truncation checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    /// 32-bit floating point
    Float32,
    /// 64-bit floating point
    Float64,
    /// 8-bit signed integer
    Int8,
    /// 8-bit unsigned integer
    UInt8,
    /// 16-bit signed integer
    Int16,
    /// 16-bit unsigned integer
    UInt16,
    /// 32-bit signed integer
    Int32,
    /// 32-bit unsigned integer
    UInt32,
}

impl ScalarType {
    /// Returns the size in bytes of this type in the binary encoding.
    pub const fn size(&self) -> usize {
        match self {
            ScalarType::Int8 | ScalarType::UInt8 => 1,
            ScalarType::Int16 | ScalarType::UInt16 => 2,
            ScalarType::Int32 | ScalarType::UInt32 | ScalarType::Float32 => 4,
            ScalarType::Float64 => 8,
        }
    }

    /// Whether values of this type are floating point.
    pub const fn is_float(&self) -> bool {
        matches!(self, ScalarType::Float32 | ScalarType::Float64)
    }

    fn from_tag(tag: &str) -> Option<Self> {
        // Schema files use both the canonical names and the C-style aliases.
        match tag {
            "float" | "float32" => Some(ScalarType::Float32),
            "double" | "float64" => Some(ScalarType::Float64),
            "int8" | "char" => Some(ScalarType::Int8),
            "uint8" | "uchar" => Some(ScalarType::UInt8),
            "int16" | "short" => Some(ScalarType::Int16),
            "uint16" | "ushort" => Some(ScalarType::UInt16),
            "int32" | "int" => Some(ScalarType::Int32),
            "uint32" | "uint" => Some(ScalarType::UInt32),
            _ => None,
        }
    }
}

/// Parsed form of a field's declared type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Fixed-width scalar value.
    Scalar(ScalarType),
    /// Fixed-length character buffer of the declared byte length,
    /// read as text and trimmed of trailing NUL padding.
    CharBuf(usize),
    /// Variable-length array of a scalar base type. Arrays are not
    /// fixed-width in the binary encoding; see the field codec.
    Array(ScalarType),
}

impl FieldType {
    /// Parse a schema type tag such as `float`, `char[12]` or `int16[]`.
    ///
    /// Returns `None` for tags outside the supported enumeration; the decoders
    /// surface those per field as `FieldError::UnknownType` rather than
    /// rejecting the whole schema.
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase();

        if let Some(base) = tag.strip_suffix("[]") {
            return ScalarType::from_tag(base).map(FieldType::Array);
        }

        // char[N] fixed-length buffers
        if let Some(rest) = tag.strip_prefix("char[") {
            let len: usize = rest.strip_suffix(']')?.parse().ok()?;
            return Some(FieldType::CharBuf(len));
        }

        ScalarType::from_tag(&tag).map(FieldType::Scalar)
    }
}
