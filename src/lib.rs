//! # Fair Dice
//!
//! Provably fair random selection between two parties, and a nontransitive
//! dice game built on top of it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    FAIR DICE                                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Cryptographic primitives                  │
//! │  ├── mac.rs      - HMAC-SHA3-256 / HMAC-SHA256 tags          │
//! │  └── rng.rs      - Secure keys and uniform draws             │
//! │                                                              │
//! │  protocol/       - Commit-reveal rounds                      │
//! │  ├── commitment.rs - commit / verify                         │
//! │  ├── round.rs    - Phase-checked round state machine         │
//! │  ├── selector.rs - One fair round, end to end                │
//! │  └── audit.rs    - Re-check a finished round                 │
//! │                                                              │
//! │  game/           - Dice game                                 │
//! │  ├── dice.rs     - Dice configuration                        │
//! │  ├── probability.rs - Exact win probabilities                │
//! │  └── session.rs  - First move, picks, rolls                  │
//! │                                                              │
//! │  console/        - Interactive front end                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fairness Guarantee
//!
//! In every round the committing side fixes its value before the other
//! side contributes, and the tag it publishes reveals nothing about that
//! value. The outcome `(x + y) mod range` is uniform as long as either
//! side chose uniformly, and the other side can check the opening
//! against the tag once the round is over.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod console;
pub mod core;
pub mod error;
pub mod game;
pub mod protocol;

// Re-export commonly used types
pub use config::FairDiceConfig;
pub use crate::core::mac::{HashAlgorithm, SecretKey};
pub use error::{FairPlayError, Result};
pub use game::dice::FaceSet;
pub use game::session::{GameReport, GameSession, Side};
pub use protocol::commitment::{commit, verify, Commitment};
pub use protocol::combine::combine;
pub use protocol::selector::FairSelector;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
