//! Cryptographic primitives.
//!
//! Keyed MACs and secure randomness. Nothing in here knows about rounds,
//! dice or players.

pub mod mac;
pub mod rng;

// Re-export core types
pub use mac::{encode_value, HashAlgorithm, SecretKey, Tag, KEY_LEN, TAG_LEN};
pub use rng::{draw_below, fresh_key, os_rng};
