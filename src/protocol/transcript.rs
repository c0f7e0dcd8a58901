//! Round Transcript
//!
//! Everything an observer needs to re-check a finished round, in a form that
//! serializes cleanly to JSON. Keys and tags are lowercase hex.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::mac::HashAlgorithm;

/// Current transcript version.
pub const TRANSCRIPT_VERSION: u8 = 1;

/// Audit record of a combined round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTranscript {
    /// Version for forward compatibility.
    pub version: u8,

    /// Round identifier.
    pub round_id: Uuid,

    /// Caller-chosen purpose of the round.
    pub label: String,

    /// Selection range.
    pub range: u64,

    /// Digest used inside the MAC.
    pub algorithm: HashAlgorithm,

    /// Tag published before the counterpart contributed (hex).
    pub tag: String,

    /// Revealed key (hex).
    pub secret_key: String,

    /// Revealed committed value.
    pub committed_value: u64,

    /// Counterpart's contribution.
    pub counterpart_value: u64,

    /// Combined outcome.
    pub outcome: u64,

    /// When the commitment was made.
    pub committed_at: DateTime<Utc>,
}

impl RoundTranscript {
    /// Serialize to a single JSON line.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
