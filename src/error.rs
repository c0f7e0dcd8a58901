//! Error taxonomy.
//!
//! Every failure in the crate is a [`FairPlayError`]. Variants are grouped by
//! [`ErrorClass`] so callers can tell user mistakes from protocol breaches
//! and from integrity failures without string matching.

use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::protocol::round::RoundPhase;

/// Convenience alias used across the crate.
pub type Result<T, E = FairPlayError> = std::result::Result<T, E>;

/// Coarse classification of a [`FairPlayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caller input was wrong. Recoverable, nothing retained.
    Configuration,
    /// The counterpart did not participate correctly. The round was aborted
    /// before anything was revealed.
    Protocol,
    /// A committed tag and its opening disagree. Never recoverable.
    Integrity,
    /// The API was driven out of order.
    Usage,
}

/// All errors produced by the fair-dice crate.
#[derive(Debug, Error)]
pub enum FairPlayError {
    /// A selection range must be at least 1.
    #[error("invalid range {range}: must be at least 1")]
    InvalidRange {
        /// Rejected range.
        range: u64,
    },

    /// A value lies outside `[0, range)`.
    #[error("value {value} is outside [0, {range})")]
    ValueOutOfRange {
        /// Rejected value.
        value: u64,
        /// Range it had to fit in.
        range: u64,
    },

    /// A die needs at least one face.
    #[error("face set is empty")]
    EmptyFaceSet,

    /// Dice configuration text could not be parsed.
    #[error("invalid dice configuration '{input}': {reason}")]
    ConfigParse {
        /// The offending argument.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Too few dice for a game.
    #[error("at least {required} dice configurations are required, got {provided}")]
    NotEnoughDice {
        /// Minimum number of dice.
        required: usize,
        /// Number supplied.
        provided: usize,
    },

    /// Unrecognised hash algorithm name.
    #[error("unknown hash algorithm '{0}' (expected sha3-256 or sha256)")]
    UnknownHashAlgorithm(String),

    /// The MAC implementation refused the commitment key.
    #[error("MAC rejected a {len}-byte key")]
    MacKeyRejected {
        /// Key length offered.
        len: usize,
    },

    /// The counterpart supplied an unusable contribution.
    #[error("invalid counterpart input: {reason}")]
    InvalidCounterpartInput {
        /// Why the input was rejected.
        reason: String,
    },

    /// The counterpart did not answer in time.
    #[error("counterpart did not respond within {waited:?}")]
    CounterpartTimeout {
        /// How long we waited.
        waited: Duration,
    },

    /// A die selection referred to a die that cannot be chosen.
    #[error("die #{index} cannot be selected ({available} dice available)")]
    InvalidSelection {
        /// Requested index.
        index: usize,
        /// Number of dice on offer.
        available: usize,
    },

    /// The revealed key and value do not reproduce the published tag.
    #[error("commitment integrity violation in round {round_id}")]
    CommitmentIntegrityViolation {
        /// Round that failed its self-check.
        round_id: Uuid,
    },

    /// A round transition was attempted from the wrong phase.
    #[error("round is in phase {actual:?}, expected {expected:?}")]
    PhaseViolation {
        /// Phase the transition requires.
        expected: RoundPhase,
        /// Phase the round is actually in.
        actual: RoundPhase,
    },
}

impl FairPlayError {
    /// Classify this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidRange { .. }
            | Self::ValueOutOfRange { .. }
            | Self::EmptyFaceSet
            | Self::ConfigParse { .. }
            | Self::NotEnoughDice { .. }
            | Self::UnknownHashAlgorithm(_)
            | Self::MacKeyRejected { .. } => ErrorClass::Configuration,
            Self::InvalidCounterpartInput { .. }
            | Self::CounterpartTimeout { .. }
            | Self::InvalidSelection { .. } => ErrorClass::Protocol,
            Self::CommitmentIntegrityViolation { .. } => ErrorClass::Integrity,
            Self::PhaseViolation { .. } => ErrorClass::Usage,
        }
    }

    /// Fatal errors must not be retried or silently continued past.
    pub fn is_fatal(&self) -> bool {
        self.class() == ErrorClass::Integrity
    }
}
