//! Field codec shared by the binary and text decoders.
//!
//! A field's declared type drives an exhaustive dispatch here; there is no
//! dynamic attribute access and no "unknown key" path at decode time.
//! Failures are per field and always recoverable: the caller records the
//! field as absent and keeps going.

use tracing::trace;

use crate::error::FieldError;
use crate::types::{FieldDefinition, FieldType, ScalarType, Value};

/// Decode one field from the front of `data` in the binary representation.
///
/// Scalars are little-endian with the fixed widths from [`ScalarType::size`].
/// `char[N]` buffers are read as text and trimmed of trailing NUL padding.
/// Returns the decoded value and the number of bytes consumed.
///
/// # Errors
///
/// [`FieldError::Truncated`] when fewer bytes remain than the type's fixed
/// width, [`FieldError::UnknownType`] when the declared tag is outside the
/// supported enumeration. Both are recovered by the caller.
pub fn decode_binary(data: &[u8], field: &FieldDefinition) -> Result<(Value, usize), FieldError> {
    let Some(field_type) = field.field_type else {
        return Err(FieldError::unknown_type(&field.name, &field.type_tag));
    };

    match field_type {
        FieldType::Scalar(scalar) => decode_scalar(data, scalar, &field.name),
        FieldType::CharBuf(len) => {
            let bytes = data
                .get(..len)
                .ok_or_else(|| FieldError::truncated(&field.name, len, data.len()))?;
            let text = String::from_utf8_lossy(bytes).trim_end_matches('\0').to_string();
            Ok((Value::Text(text), len))
        }
        FieldType::Array(base) => decode_array(data, base, &field.name),
    }
}

fn decode_scalar(data: &[u8], scalar: ScalarType, name: &str) -> Result<(Value, usize), FieldError> {
    let size = scalar.size();
    let bytes =
        data.get(..size).ok_or_else(|| FieldError::truncated(name, size, data.len()))?;

    let value = match scalar {
        ScalarType::Float32 => {
            Value::Float(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64)
        }
        ScalarType::Float64 => Value::Float(f64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ])),
        ScalarType::Int8 => Value::Int(bytes[0] as i8 as i64),
        ScalarType::UInt8 => Value::Int(bytes[0] as i64),
        ScalarType::Int16 => Value::Int(i16::from_le_bytes([bytes[0], bytes[1]]) as i64),
        ScalarType::UInt16 => Value::Int(u16::from_le_bytes([bytes[0], bytes[1]]) as i64),
        ScalarType::Int32 => {
            Value::Int(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64)
        }
        ScalarType::UInt32 => {
            Value::Int(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64)
        }
    };

    Ok((value, size))
}

/// Best-effort array decode.
///
/// Arrays are not fixed-width in this encoding: the remainder of the current
/// token is read as a delimiter-separated list (comma preferred, whitespace
/// fallback) and each element converted by the base scalar rule. The consumed
/// length is the encoded length of the consumed token, which is an
/// approximation inherited from the recording format, not an authoritative
/// framing.
fn decode_array(data: &[u8], base: ScalarType, name: &str) -> Result<(Value, usize), FieldError> {
    if data.is_empty() {
        return Err(FieldError::truncated(name, 1, 0));
    }

    let text = String::from_utf8_lossy(data);
    let Some(token) = text.split_whitespace().next() else {
        return Err(FieldError::truncated(name, 1, 0));
    };

    let parts: Vec<&str> = if token.contains(',') {
        token.split(',').collect()
    } else {
        token.split_whitespace().collect()
    };

    let mut values = Vec::with_capacity(parts.len());
    for part in parts {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if base.is_float() {
            if let Ok(v) = part.parse::<f64>() {
                values.push(Value::Float(v));
            } else {
                trace!(field = name, element = part, "dropping unparseable array element");
            }
        } else if let Ok(v) = part.parse::<i64>() {
            values.push(Value::Int(v));
        } else {
            trace!(field = name, element = part, "dropping unparseable array element");
        }
    }

    Ok((Value::Array(values), token.len()))
}

/// Convert one whitespace/comma-delimited token from the text representation.
///
/// Conversion order: absent markers (`nan`/`null`/`none`/empty/`-`) first,
/// then integer parse when the token has no decimal point or exponent marker,
/// else floating-point parse, then boolean words. `0` and `1` therefore stay
/// integers; only `true`/`yes`/`false`/`no` become booleans. Anything else is
/// kept as a string.
pub fn convert_token(token: &str) -> Value {
    let token = token.trim();
    if token.is_empty() || token == "-" {
        return Value::Null;
    }

    let lower = token.to_ascii_lowercase();
    if matches!(lower.as_str(), "nan" | "null" | "none") {
        return Value::Null;
    }

    if !token.contains('.') && !lower.contains('e') {
        if let Ok(v) = token.parse::<i64>() {
            return Value::Int(v);
        }
    } else if let Ok(v) = token.parse::<f64>() {
        return Value::Float(v);
    }

    match lower.as_str() {
        "true" | "yes" => Value::Bool(true),
        "false" | "no" => Value::Bool(false),
        _ => Value::Text(token.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field(name: &str, tag: &str) -> FieldDefinition {
        FieldDefinition {
            name: name.into(),
            type_tag: tag.into(),
            field_type: FieldType::parse(tag),
            unit: None,
            alt_unit: None,
            alt_unit_coef: None,
            description: None,
            values: None,
        }
    }

    #[test]
    fn decodes_little_endian_scalars() {
        let (v, n) = decode_binary(&42.5f32.to_le_bytes(), &field("s", "float")).unwrap();
        assert_eq!(n, 4);
        assert!((v.as_f64().unwrap() - 42.5).abs() < 1e-6);

        let (v, n) = decode_binary(&(-350i16).to_le_bytes(), &field("alt", "int16")).unwrap();
        assert_eq!((v, n), (Value::Int(-350), 2));

        let (v, n) = decode_binary(&[0xff], &field("m", "uint8")).unwrap();
        assert_eq!((v, n), (Value::Int(255), 1));

        let (v, n) = decode_binary(&u32::MAX.to_le_bytes(), &field("t", "uint32")).unwrap();
        assert_eq!((v, n), (Value::Int(u32::MAX as i64), 4));

        let (v, n) = decode_binary(&1.25f64.to_le_bytes(), &field("d", "double")).unwrap();
        assert_eq!((v, n), (Value::Float(1.25), 8));
    }

    #[test]
    fn char_buffer_trims_nul_padding() {
        let (v, n) = decode_binary(b"GCS1\0\0\0\0", &field("id", "char[8]")).unwrap();
        assert_eq!((v, n), (Value::Text("GCS1".into()), 8));
    }

    #[test]
    fn truncated_input_reports_widths() {
        let err = decode_binary(&[0u8; 3], &field("lat", "float")).unwrap_err();
        assert_eq!(err, FieldError::truncated("lat", 4, 3));

        let err = decode_binary(&[], &field("id", "char[8]")).unwrap_err();
        assert!(matches!(err, FieldError::Truncated { needed: 8, .. }));
    }

    #[test]
    fn unknown_tag_is_reported_per_field() {
        let err = decode_binary(&[0u8; 16], &field("q", "quaternion")).unwrap_err();
        assert_eq!(err, FieldError::unknown_type("q", "quaternion"));
    }

    #[test]
    fn array_reads_one_comma_token() {
        let (v, n) = decode_binary(b"1.5,2.5,3.5 trailing", &field("a", "float[]")).unwrap();
        assert_eq!(n, 11);
        assert_eq!(
            v,
            Value::Array(vec![Value::Float(1.5), Value::Float(2.5), Value::Float(3.5)])
        );

        let (v, _) = decode_binary(b"4,5,6", &field("a", "int16[]")).unwrap();
        assert_eq!(v, Value::Array(vec![Value::Int(4), Value::Int(5), Value::Int(6)]));
    }

    #[test]
    fn array_skips_unparseable_elements() {
        let (v, _) = decode_binary(b"1,x,3", &field("a", "uint8[]")).unwrap();
        assert_eq!(v, Value::Array(vec![Value::Int(1), Value::Int(3)]));
    }

    #[test]
    fn token_conversion_rules() {
        assert_eq!(convert_token("350"), Value::Int(350));
        assert_eq!(convert_token("-17"), Value::Int(-17));
        assert_eq!(convert_token("48.1"), Value::Float(48.1));
        assert_eq!(convert_token("1e3"), Value::Float(1000.0));
        assert_eq!(convert_token("1"), Value::Int(1)); // integer wins over boolean
        assert_eq!(convert_token("0"), Value::Int(0));
        assert_eq!(convert_token("true"), Value::Bool(true));
        assert_eq!(convert_token("YES"), Value::Bool(true));
        assert_eq!(convert_token("no"), Value::Bool(false));
        assert_eq!(convert_token("nan"), Value::Null);
        assert_eq!(convert_token("None"), Value::Null);
        assert_eq!(convert_token(""), Value::Null);
        assert_eq!(convert_token("-"), Value::Null);
        assert_eq!(convert_token("AUTO2"), Value::Text("AUTO2".into()));
    }

    proptest! {
        #[test]
        fn prop_scalar_roundtrip_f32(value in any::<f32>()) {
            let (decoded, consumed) =
                decode_binary(&value.to_le_bytes(), &field("x", "float")).unwrap();
            prop_assert_eq!(consumed, 4);
            let decoded = decoded.as_f64().unwrap() as f32;
            if value.is_nan() {
                prop_assert!(decoded.is_nan());
            } else {
                prop_assert_eq!(decoded, value);
            }
        }

        #[test]
        fn prop_scalar_roundtrip_i32(value in any::<i32>()) {
            let (decoded, consumed) =
                decode_binary(&value.to_le_bytes(), &field("x", "int32")).unwrap();
            prop_assert_eq!(consumed, 4);
            prop_assert_eq!(decoded, Value::Int(value as i64));
        }

        #[test]
        fn prop_token_conversion_never_panics(token in ".*") {
            let _ = convert_token(&token);
        }

        #[test]
        fn prop_integer_tokens_stay_integers(value in any::<i64>()) {
            prop_assert_eq!(convert_token(&value.to_string()), Value::Int(value));
        }
    }
}
