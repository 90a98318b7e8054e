//! Binary stream decoder with single-byte resynchronization.
//!
//! Record framing:
//!
//! ```text
//! timestamp: f32 | aircraft_id: u32 | message name (NUL- or space-terminated) | field bytes...
//! ```
//!
//! Corrupted streams are common, so an unresolvable header never aborts the
//! decode: the offset slips forward by exactly one byte and the decoder
//! retries. The loop is written as an explicit two-state machine
//! ([`DecodeState::AtRecordStart`] / [`DecodeState::Resyncing`]) to keep the
//! worst-case behavior auditable: amortized O(n), degrading to O(n²) on
//! pathological all-invalid input because each byte is resynchronized at most
//! once.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use super::codec;
use crate::schema::SchemaCatalog;
use crate::types::{DecodedRecord, Value};

/// Minimum bytes for a record header: f32 timestamp + u32 aircraft id.
const HEADER_MIN: usize = 8;

/// Where the decode loop currently stands relative to record framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// The offset is believed to sit on a record boundary.
    AtRecordStart,
    /// The previous offset did not resolve; slipping a byte at a time until a
    /// header resolves again.
    Resyncing,
}

/// Decoder for the binary wire encoding.
pub struct BinaryDecoder;

impl BinaryDecoder {
    /// Decode a complete binary stream against a catalog.
    ///
    /// Never fails the whole call: per-record failures are skipped via
    /// resynchronization and the result may simply be shorter than the input
    /// implies.
    pub fn decode(data: &[u8], catalog: &SchemaCatalog) -> Vec<DecodedRecord> {
        let mut records = Vec::new();
        let mut offset = 0usize;
        let mut state = DecodeState::AtRecordStart;
        let mut slipped = 0usize;

        while offset < data.len() {
            match try_record(&data[offset..], catalog) {
                Some((record, consumed)) => {
                    if state == DecodeState::Resyncing {
                        trace!(offset, "resynchronized on record boundary");
                        state = DecodeState::AtRecordStart;
                    }
                    records.push(record);
                    offset += consumed;
                }
                None => {
                    if state == DecodeState::AtRecordStart {
                        trace!(offset, "record header did not resolve, resyncing");
                        state = DecodeState::Resyncing;
                    }
                    slipped += 1;
                    offset += 1;
                }
            }
        }

        if slipped > 0 {
            warn!(slipped, stream_len = data.len(), "skipped bytes while resynchronizing");
        }
        debug!(records = records.len(), stream_len = data.len(), "binary decode finished");

        records
    }
}

/// Attempt to decode one record from the front of `data`.
///
/// Returns `None` when the header does not resolve against the catalog, which
/// the caller treats as a resynchronization point.
fn try_record(data: &[u8], catalog: &SchemaCatalog) -> Option<(DecodedRecord, usize)> {
    if data.len() < HEADER_MIN {
        return None;
    }

    let timestamp = f32::from_le_bytes([data[0], data[1], data[2], data[3]]) as f64;
    let aircraft_id = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    let aircraft = catalog.aircraft_by_id(aircraft_id)?;

    let (message_name, name_len) = read_terminated_name(&data[HEADER_MIN..])?;
    let message = aircraft.message(&message_name)?;

    let mut offset = HEADER_MIN + name_len;
    let mut fields = HashMap::with_capacity(message.fields.len());
    for field in &message.fields {
        match codec::decode_binary(&data[offset..], field) {
            Ok((value, consumed)) => {
                fields.insert(field.name.clone(), value);
                offset += consumed;
            }
            Err(err) => {
                // Field failures never abort the record.
                trace!(error = %err, message = %message.name, "field decode failed, recording as absent");
                fields.insert(field.name.clone(), Value::Null);
            }
        }
    }

    let record = DecodedRecord {
        timestamp,
        aircraft_id,
        message_type: message.name.clone(),
        message_id: message.message_id,
        fields,
        raw: data[..offset].to_vec(),
    };

    Some((record, offset))
}

/// Read a NUL-terminated message name, falling back to a space terminator.
/// Returns the name and the terminated length (name plus terminator byte).
fn read_terminated_name(data: &[u8]) -> Option<(String, usize)> {
    let end = data
        .iter()
        .position(|&b| b == 0)
        .or_else(|| data.iter().position(|&b| b == b' '))?;
    if end == 0 {
        return None;
    }
    let name = String::from_utf8_lossy(&data[..end]).to_string();
    Some((name, end + 1))
}
