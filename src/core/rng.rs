//! Secure randomness helpers
//!
//! Every draw that a counterpart could profit from predicting (commitment
//! keys, committed values) goes through a `CryptoRng`. Callers inject the
//! generator; production code uses [`OsRng`], tests use a seeded `StdRng`.

use rand::rngs::OsRng;
use rand::{CryptoRng, Rng, RngCore};

use super::mac::{SecretKey, KEY_LEN};
use crate::error::{FairPlayError, Result};

/// The operating system's CSPRNG.
pub fn os_rng() -> OsRng {
    OsRng
}

/// Draw a fresh commitment key.
pub fn fresh_key<R: RngCore + CryptoRng>(rng: &mut R) -> SecretKey {
    let mut bytes = [0u8; KEY_LEN];
    rng.fill_bytes(&mut bytes);
    SecretKey::from_bytes(bytes)
}

/// Draw a value uniformly from `[0, range)`.
///
/// `gen_range` rejects out-of-zone samples, so there is no modulo bias even
/// for ranges that do not divide 2^64.
pub fn draw_below<R: RngCore + CryptoRng>(rng: &mut R, range: u64) -> Result<u64> {
    if range == 0 {
        return Err(FairPlayError::InvalidRange { range });
    }
    Ok(rng.gen_range(0..range))
}

/// Select a random element index from a slice of length `len`.
pub fn choose_index<R: RngCore>(rng: &mut R, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.gen_range(0..len))
    }
}

// =============================================================================
// TESTS
// =============================================================================
