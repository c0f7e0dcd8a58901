//! Dice game built on the protocol.
//!
//! Contains:
//! - Dice configuration parsing
//! - Exact win probabilities between dice
//! - Game orchestration (first move, die picks, fair rolls)

pub mod dice;
pub mod probability;
pub mod session;

pub use dice::{parse_dice, require_playable, FaceSet};
pub use probability::{
    best_counter, win_probability, win_probability_of_faces, ProbabilityMatrix, WinProbability,
};
pub use session::{decide_winner, GameReport, GameSession, Participant, SessionEvent, Side};
