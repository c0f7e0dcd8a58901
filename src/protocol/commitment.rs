//! Value Commitment Protocol
//!
//! Commit to a value before the counterpart contributes.
//! Reveal the key afterwards so anyone holding the tag can check that the
//! value was not swapped.

use std::fmt;

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::core::mac::{HashAlgorithm, SecretKey, Tag};
use crate::core::rng::fresh_key;
use crate::error::{FairPlayError, Result};

/// A binding, hiding commitment to a value in `[0, range)`.
///
/// Only [`Commitment::tag`] is meant to be published before reveal. `Debug`
/// shows the tag but never the key or the value.
#[derive(Clone)]
pub struct Commitment {
    secret_key: SecretKey,
    value: u64,
    range: u64,
    algorithm: HashAlgorithm,
    tag: Tag,
}

impl Commitment {
    /// Published tag.
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Published tag as lowercase hex.
    pub fn tag_hex(&self) -> String {
        hex::encode(self.tag)
    }

    /// Range the committed value was chosen from.
    pub fn range(&self) -> u64 {
        self.range
    }

    /// Digest used inside the MAC.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Committed value. Only the committer should read this before reveal.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Commitment key. Only the committer should read this before reveal.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Recompute the tag from the key and value held here.
    pub fn is_consistent(&self) -> bool {
        self.algorithm.verify(&self.secret_key, self.value, &self.tag)
    }

    /// Give up the secret: consume the commitment and return its opening.
    pub fn open(self) -> Opening {
        Opening {
            secret_key: self.secret_key,
            value: self.value,
        }
    }

    #[cfg(test)]
    pub(crate) fn corrupt_tag(&mut self) {
        self.tag[0] ^= 0xFF;
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commitment")
            .field("range", &self.range)
            .field("algorithm", &self.algorithm)
            .field("tag", &self.tag_hex())
            .finish_non_exhaustive()
    }
}

/// Revealed key and value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Opening {
    /// Key the tag was computed with.
    pub secret_key: SecretKey,
    /// Value that was committed to.
    pub value: u64,
}

/// Commitment scheme parameterized by the MAC's digest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentScheme {
    algorithm: HashAlgorithm,
}

impl CommitmentScheme {
    /// Create a scheme over the given digest.
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Digest used inside the MAC.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Commit to `value`, which must lie in `[0, range)`.
    ///
    /// Draws a fresh 32-byte key from `rng` for every call.
    pub fn commit<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        value: u64,
        range: u64,
    ) -> Result<Commitment> {
        check_in_range(value, range)?;

        let secret_key = fresh_key(rng);
        let tag = self.algorithm.tag(&secret_key, value)?;

        Ok(Commitment {
            secret_key,
            value,
            range,
            algorithm: self.algorithm,
            tag,
        })
    }

    /// Check a revealed key and value against a published tag.
    pub fn verify(&self, secret_key: &SecretKey, value: u64, tag: &[u8]) -> bool {
        self.algorithm.verify(secret_key, value, tag)
    }
}

/// Commit with the default HMAC-SHA3-256 scheme.
pub fn commit<R: RngCore + CryptoRng>(rng: &mut R, value: u64, range: u64) -> Result<Commitment> {
    CommitmentScheme::default().commit(rng, value, range)
}

/// Verify with the default HMAC-SHA3-256 scheme.
pub fn verify(secret_key: &SecretKey, value: u64, tag: &[u8]) -> bool {
    CommitmentScheme::default().verify(secret_key, value, tag)
}

/// Require `range >= 1` and `value < range`.
pub fn check_in_range(value: u64, range: u64) -> Result<()> {
    if range == 0 {
        return Err(FairPlayError::InvalidRange { range });
    }
    if value >= range {
        return Err(FairPlayError::ValueOutOfRange { value, range });
    }
    Ok(())
}
