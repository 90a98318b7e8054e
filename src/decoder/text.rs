//! Line-oriented text decoder.
//!
//! The delimited-text encoding is the primary production format:
//!
//! ```text
//! timestamp aircraft_id MESSAGE_NAME value1,value2,value3...
//! ```
//!
//! Decoding is best-effort throughout: a line that cannot be parsed is
//! dropped with a per-line diagnostic, and a message that does not resolve
//! against the catalog is still emitted under synthetic `field_0, field_1...`
//! names. Partial information always beats silence.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use super::codec;
use crate::schema::SchemaCatalog;
use crate::types::{DecodedRecord, Value};

/// Decoder for the delimited-text wire encoding.
pub struct TextDecoder;

impl TextDecoder {
    /// Decode a complete text stream against a catalog.
    ///
    /// Never fails the whole call; unparseable lines are skipped and the
    /// result may be shorter than the line count implies. The decoder holds
    /// no state across calls: decoding the same input twice yields identical
    /// records.
    pub fn decode(data: &[u8], catalog: &SchemaCatalog) -> Vec<DecodedRecord> {
        let text = decode_stream_text(data);
        let mut records = Vec::new();
        let mut dropped = 0usize;

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match parse_line(line, catalog) {
                Some(record) => records.push(record),
                None => {
                    dropped += 1;
                    warn!(line = line_no + 1, "dropped unparseable telemetry line");
                }
            }
        }

        debug!(records = records.len(), dropped, "text decode finished");
        records
    }
}

/// Decode raw bytes to text: UTF-8 first, with a single-byte Western decode
/// as the fallback for streams older ground stations wrote as Latin-1.
fn decode_stream_text(data: &[u8]) -> String {
    match String::from_utf8_lossy(data) {
        std::borrow::Cow::Borrowed(s) => s.to_string(),
        std::borrow::Cow::Owned(_) => {
            trace!("stream is not valid UTF-8, falling back to single-byte decode");
            data.iter().map(|&b| b as char).collect()
        }
    }
}

fn parse_line(line: &str, catalog: &SchemaCatalog) -> Option<DecodedRecord> {
    let mut parts = line.split_whitespace();
    let timestamp: f64 = parts.next()?.parse().ok()?;
    let aircraft_id: u32 = parts.next()?.parse().ok()?;
    let message_name = parts.next()?;

    // Rejoin the remainder and resplit by field delimiter: comma when the
    // payload carries one, whitespace otherwise.
    let payload = parts.collect::<Vec<_>>().join(" ");
    let values: Vec<Value> = if payload.contains(',') {
        payload.split(',').map(codec::convert_token).collect()
    } else {
        payload.split_whitespace().map(codec::convert_token).collect()
    };

    let definition = catalog.message(aircraft_id, message_name);
    let mut fields = HashMap::with_capacity(values.len());
    match definition {
        Some(message) => {
            // Positional mapping: surplus values are ignored, missing
            // trailing fields stay absent.
            for (field, value) in message.fields.iter().zip(values) {
                fields.insert(field.name.clone(), value);
            }
        }
        None => {
            trace!(aircraft_id, message = message_name, "unresolved message, emitting synthetic field names");
            for (index, value) in values.into_iter().enumerate() {
                fields.insert(format!("field_{index}"), value);
            }
        }
    }

    Some(DecodedRecord {
        timestamp,
        aircraft_id,
        message_type: message_name.to_string(),
        message_id: definition.map_or(0, |m| m.message_id),
        fields,
        raw: line.as_bytes().to_vec(),
    })
}
