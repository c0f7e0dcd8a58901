//! Round state machine.
//!
//! A round moves through `Committed -> Contributed -> Revealed -> Combined`.
//! Each transition consumes the round and fails with
//! [`FairPlayError::PhaseViolation`] when taken from the wrong phase, so a
//! round can never be combined before reveal or revealed twice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use super::combine::combine;
use super::commitment::{check_in_range, Commitment, Opening};
use super::transcript::{RoundTranscript, TRANSCRIPT_VERSION};
use crate::core::mac::{HashAlgorithm, Tag};
use crate::error::{FairPlayError, Result};

/// Phase of a [`Round`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Tag published, waiting for the counterpart.
    Committed,
    /// Counterpart value attached, secret still hidden.
    Contributed,
    /// Key and value disclosed and checked against the tag.
    Revealed,
    /// Outcome computed.
    Combined,
}

/// What the counterpart gets to see before contributing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitmentOffer {
    /// Round identifier.
    pub round_id: Uuid,
    /// Caller-chosen purpose, e.g. "first move".
    pub label: String,
    /// The counterpart must answer with a value in `[0, range)`.
    pub range: u64,
    /// Digest used inside the MAC.
    pub algorithm: HashAlgorithm,
    /// Published commitment tag.
    pub tag: Tag,
}

impl CommitmentOffer {
    /// Published tag as lowercase hex.
    pub fn tag_hex(&self) -> String {
        hex::encode(self.tag)
    }
}

#[derive(Debug)]
enum RoundState {
    Committed {
        commitment: Commitment,
    },
    Contributed {
        commitment: Commitment,
        counterpart: u64,
    },
    Revealed {
        opening: Opening,
        counterpart: u64,
    },
    Combined {
        opening: Opening,
        counterpart: u64,
        outcome: u64,
    },
}

/// One commit-reveal round.
#[derive(Debug)]
pub struct Round {
    id: Uuid,
    label: String,
    range: u64,
    algorithm: HashAlgorithm,
    tag: Tag,
    committed_at: DateTime<Utc>,
    state: RoundState,
}

impl Round {
    /// Start a round from a fresh commitment.
    pub fn new(label: impl Into<String>, commitment: Commitment) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            range: commitment.range(),
            algorithm: commitment.algorithm(),
            tag: *commitment.tag(),
            committed_at: Utc::now(),
            state: RoundState::Committed { commitment },
        }
    }

    /// Round identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Caller-chosen purpose.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Selection range.
    pub fn range(&self) -> u64 {
        self.range
    }

    /// Digest used inside the MAC.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Published tag.
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// When the commitment was made.
    pub fn committed_at(&self) -> DateTime<Utc> {
        self.committed_at
    }

    /// Current phase.
    pub fn phase(&self) -> RoundPhase {
        match self.state {
            RoundState::Committed { .. } => RoundPhase::Committed,
            RoundState::Contributed { .. } => RoundPhase::Contributed,
            RoundState::Revealed { .. } => RoundPhase::Revealed,
            RoundState::Combined { .. } => RoundPhase::Combined,
        }
    }

    /// Public view handed to the counterpart.
    pub fn offer(&self) -> CommitmentOffer {
        CommitmentOffer {
            round_id: self.id,
            label: self.label.clone(),
            range: self.range,
            algorithm: self.algorithm,
            tag: self.tag,
        }
    }

    /// Counterpart's contribution, once attached.
    pub fn counterpart_value(&self) -> Option<u64> {
        match self.state {
            RoundState::Committed { .. } => None,
            RoundState::Contributed { counterpart, .. }
            | RoundState::Revealed { counterpart, .. }
            | RoundState::Combined { counterpart, .. } => Some(counterpart),
        }
    }

    /// Disclosed key and value. `None` until the round is revealed.
    pub fn opening(&self) -> Option<&Opening> {
        match &self.state {
            RoundState::Revealed { opening, .. } | RoundState::Combined { opening, .. } => {
                Some(opening)
            }
            _ => None,
        }
    }

    /// Combined outcome. `None` until the round is combined.
    pub fn outcome(&self) -> Option<u64> {
        match self.state {
            RoundState::Combined { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    /// Attach the counterpart's value. Requires phase `Committed`.
    pub fn attach_counterpart(self, value: u64) -> Result<Self> {
        let phase = self.phase();
        let RoundState::Committed { commitment } = self.state else {
            return Err(phase_violation(RoundPhase::Committed, phase));
        };
        if let Err(err) = check_in_range(value, self.range) {
            return Err(FairPlayError::InvalidCounterpartInput {
                reason: err.to_string(),
            });
        }

        Ok(Self {
            state: RoundState::Contributed {
                commitment,
                counterpart: value,
            },
            ..self
        })
    }

    /// Disclose the key and value, checking them against the published tag.
    /// Requires phase `Contributed`.
    pub fn reveal(self) -> Result<Self> {
        let phase = self.phase();
        let RoundState::Contributed {
            commitment,
            counterpart,
        } = self.state
        else {
            return Err(phase_violation(RoundPhase::Contributed, phase));
        };

        let opening = commitment.open();
        if !self.algorithm.verify(&opening.secret_key, opening.value, &self.tag) {
            error!(
                round_id = %self.id,
                tag = %hex::encode(self.tag),
                "Revealed value does not match published commitment"
            );
            return Err(FairPlayError::CommitmentIntegrityViolation { round_id: self.id });
        }

        Ok(Self {
            state: RoundState::Revealed {
                opening,
                counterpart,
            },
            ..self
        })
    }

    /// Compute the outcome. Requires phase `Revealed`.
    pub fn combine(self) -> Result<Self> {
        let phase = self.phase();
        let RoundState::Revealed {
            opening,
            counterpart,
        } = self.state
        else {
            return Err(phase_violation(RoundPhase::Revealed, phase));
        };

        let outcome = combine(opening.value, counterpart, self.range)?;

        Ok(Self {
            state: RoundState::Combined {
                opening,
                counterpart,
                outcome,
            },
            ..self
        })
    }

    /// Audit record of a combined round. `None` in any other phase.
    pub fn transcript(&self) -> Option<RoundTranscript> {
        let RoundState::Combined {
            opening,
            counterpart,
            outcome,
        } = &self.state
        else {
            return None;
        };

        Some(RoundTranscript {
            version: TRANSCRIPT_VERSION,
            round_id: self.id,
            label: self.label.clone(),
            range: self.range,
            algorithm: self.algorithm,
            tag: hex::encode(self.tag),
            secret_key: opening.secret_key.to_hex(),
            committed_value: opening.value,
            counterpart_value: *counterpart,
            outcome: *outcome,
            committed_at: self.committed_at,
        })
    }

    #[cfg(test)]
    pub(crate) fn corrupt_published_tag(&mut self) {
        self.tag[31] ^= 0x01;
    }
}

fn phase_violation(expected: RoundPhase, actual: RoundPhase) -> FairPlayError {
    FairPlayError::PhaseViolation { expected, actual }
}
