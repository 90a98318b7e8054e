//! Decoder version tracking.
//!
//! Previously decoded output becomes stale whenever the decoding logic
//! changes. Instead of a hand-maintained version number, the guard
//! fingerprints the exact source text that defines decoding behavior (schema
//! interpretation, field codec, both decoders and the value types they emit)
//! via `include_str!`, so any behavioral edit changes the fingerprint at
//! compile time. Aircraft-specific schema content varies per recording and is
//! deliberately not part of the digest.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::session::SessionRecord;

/// Hex length the SHA-256 digest is truncated to.
const FINGERPRINT_LEN: usize = 16;

/// The source files whose text defines current decoding behavior.
const DECODER_SOURCES: &[&str] = &[
    include_str!("schema/xml_cleanup.rs"),
    include_str!("schema/catalog.rs"),
    include_str!("decoder/codec.rs"),
    include_str!("decoder/binary.rs"),
    include_str!("decoder/text.rs"),
    include_str!("types/field_type.rs"),
    include_str!("types/value.rs"),
    include_str!("types/definitions.rs"),
    include_str!("types/record.rs"),
];

/// Short deterministic digest identifying one version of decoding behavior.
///
/// Two fingerprints compare equal iff the decoding source they were computed
/// from is byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionFingerprint(String);

impl VersionFingerprint {
    /// Wrap a stored fingerprint read back from a session record.
    pub fn new(hex: impl Into<String>) -> Self {
        VersionFingerprint(hex.into())
    }

    /// The hex representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the fingerprint of the decoding logic compiled into this build.
pub fn current_fingerprint() -> VersionFingerprint {
    let mut hasher = Sha256::new();
    for source in DECODER_SOURCES {
        hasher.update(source.as_bytes());
    }
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    VersionFingerprint(hex[..FINGERPRINT_LEN].to_string())
}

/// Decides which previously decoded sessions need re-decoding.
#[derive(Debug, Clone)]
pub struct VersionGuard {
    current: VersionFingerprint,
    last_saved: Option<VersionFingerprint>,
}

impl VersionGuard {
    /// Guard with no record of a previously saved fingerprint: every scan is
    /// performed until [`mark_saved`](Self::mark_saved) is called.
    pub fn new() -> Self {
        VersionGuard { current: current_fingerprint(), last_saved: None }
    }

    /// Guard seeded with the fingerprint stored by the last run, enabling the
    /// no-change fast path in [`sessions_to_reprocess`](Self::sessions_to_reprocess).
    pub fn with_last_saved(last_saved: Option<VersionFingerprint>) -> Self {
        VersionGuard { current: current_fingerprint(), last_saved }
    }

    /// The fingerprint of the decoding logic in this build.
    pub fn fingerprint(&self) -> &VersionFingerprint {
        &self.current
    }

    /// Whether a stored fingerprint no longer matches current logic.
    pub fn is_stale(&self, stored: &VersionFingerprint) -> bool {
        *stored != self.current
    }

    /// Whether the decoding logic changed since the last saved fingerprint.
    pub fn has_changed(&self) -> bool {
        self.last_saved.as_ref() != Some(&self.current)
    }

    /// Record that the caller persisted the current fingerprint.
    pub fn mark_saved(&mut self) {
        self.last_saved = Some(self.current.clone());
    }

    /// Identifiers of every session that must be re-decoded: stored
    /// fingerprint differs from current, or is missing/corrupt (treated
    /// conservatively as stale).
    ///
    /// Returns the empty set without scanning when the fingerprint has not
    /// changed since the last save. That is purely an optimization; scanning
    /// would return the same answer.
    pub fn sessions_to_reprocess<'a, I>(&self, sessions: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a SessionRecord>,
    {
        if !self.has_changed() {
            return BTreeSet::new();
        }

        let mut stale = BTreeSet::new();
        for session in sessions {
            match &session.fingerprint {
                Some(stored) if !self.is_stale(stored) => {}
                Some(stored) => {
                    debug!(
                        session = %session.id,
                        stored = %stored,
                        current = %self.current,
                        "session decoded with outdated logic"
                    );
                    stale.insert(session.id.clone());
                }
                None => {
                    warn!(session = %session.id, "session has no readable fingerprint, treating as stale");
                    stale.insert(session.id.clone());
                }
            }
        }
        stale
    }
}

impl Default for VersionGuard {
    fn default() -> Self {
        Self::new()
    }
}
