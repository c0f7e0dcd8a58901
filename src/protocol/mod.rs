//! Commit-Reveal Protocol
//!
//! Provides fair two-party selection through:
//! - HMAC commitments published before the counterpart contributes
//! - A phase-checked round state machine
//! - Modular combination of both contributions
//! - Independent audit of finished rounds
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PROTOCOL                                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  commitment.rs   - commit / verify over keyed MACs          │
//! │  combine.rs      - (x + y) mod range                        │
//! │  round.rs        - Committed → Contributed → Revealed → ... │
//! │  counterpart.rs  - The other party's side of a round        │
//! │  selector.rs     - One full round, end to end               │
//! │  transcript.rs   - Serializable record of a finished round  │
//! │  audit.rs        - Re-check a transcript from scratch       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod audit;
pub mod combine;
pub mod commitment;
pub mod counterpart;
pub mod round;
pub mod selector;
pub mod transcript;

// Re-export key types
pub use audit::{audit_transcript, AuditError};
pub use combine::combine;
pub use commitment::{commit, verify, Commitment, CommitmentScheme, Opening};
pub use counterpart::{from_fn, Counterpart, CounterpartError, FnCounterpart};
pub use round::{CommitmentOffer, Round, RoundPhase};
pub use selector::{FairSelector, SelectorConfig};
pub use transcript::{RoundTranscript, TRANSCRIPT_VERSION};
