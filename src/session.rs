//! Decoded-session metadata: persisted session records, summary statistics
//! and recording-filename timestamps.
//!
//! The surrounding watcher/API layer owns the persisted JSON layout; this
//! module only defines the shapes the core reads back (for staleness checks)
//! and the statistics it can compute from a decoded record sequence.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::DecodedRecord;
use crate::version::VersionFingerprint;

/// One previously decoded session, as persisted by the caller.
///
/// The core never writes these; it reads the stored fingerprint to decide
/// which sessions are stale. A missing or corrupt fingerprint deserializes to
/// `None` and is treated conservatively as stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session identifier, typically the recording base name.
    pub id: String,
    /// Fingerprint of the decoding logic active when the session was decoded.
    #[serde(default)]
    pub fingerprint: Option<VersionFingerprint>,
    /// Summary statistics captured at decode time.
    #[serde(default)]
    pub stats: SessionStats,
}

/// Summary statistics over one decoded record sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Total decoded records.
    pub total_messages: usize,
    /// Distinct aircraft ids observed, ascending.
    pub aircraft_ids: Vec<u32>,
    /// Record count per message type name.
    pub message_types: HashMap<String, usize>,
    /// Record count per aircraft id.
    pub aircraft_message_counts: HashMap<u32, usize>,
    /// Earliest record timestamp, 0 when the sequence is empty.
    pub start_time: f64,
    /// Latest record timestamp, 0 when the sequence is empty.
    pub end_time: f64,
    /// `end_time - start_time`.
    pub duration: f64,
}

impl SessionStats {
    /// Compute statistics from a decoded record sequence.
    pub fn from_records(records: &[DecodedRecord]) -> Self {
        let mut message_types: HashMap<String, usize> = HashMap::new();
        let mut aircraft_message_counts: HashMap<u32, usize> = HashMap::new();
        let mut start_time = f64::INFINITY;
        let mut end_time = f64::NEG_INFINITY;

        for record in records {
            *message_types.entry(record.message_type.clone()).or_insert(0) += 1;
            *aircraft_message_counts.entry(record.aircraft_id).or_insert(0) += 1;
            start_time = start_time.min(record.timestamp);
            end_time = end_time.max(record.timestamp);
        }

        if records.is_empty() {
            start_time = 0.0;
            end_time = 0.0;
        }

        let mut aircraft_ids: Vec<u32> = aircraft_message_counts.keys().copied().collect();
        aircraft_ids.sort_unstable();

        SessionStats {
            total_messages: records.len(),
            aircraft_ids,
            message_types,
            aircraft_message_counts,
            start_time,
            end_time,
            duration: end_time - start_time,
        }
    }
}

/// Extract the recording start time from a log filename.
///
/// Recording pairs are named `YY_MM_DD__HH_MM_SS` (plus extension), e.g.
/// `25_07_09__15_38_54.log`. Years are interpreted as 20YY. Returns `None`
/// for names that do not follow the convention.
pub fn recording_start_time(filename: &str) -> Option<NaiveDateTime> {
    let stem = filename.split('.').next()?;
    let (date_part, time_part) = stem.split_once("__")?;

    let [year, month, day] = parse_two_digit_triple(date_part)?;
    let [hour, minute, second] = parse_two_digit_triple(time_part)?;

    NaiveDate::from_ymd_opt(2000 + year as i32, month, day)?.and_hms_opt(hour, minute, second)
}

/// Parse `NN_NN_NN` into three numbers, requiring exactly two digits each.
fn parse_two_digit_triple(input: &str) -> Option<[u32; 3]> {
    let mut parts = input.splitn(3, '_');
    let mut out = [0u32; 3];
    for slot in &mut out {
        let part = parts.next()?;
        if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }
    Some(out)
}
