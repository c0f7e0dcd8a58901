//! Keyed MACs for commitment tags
//!
//! Provides the keyed hashing behind every commitment:
//! - 32-byte secret keys that never print themselves
//! - HMAC over a configurable digest (SHA3-256 by default)
//! - Constant-time tag verification
//!
//! Values are encoded as decimal ASCII before hashing (`42` -> `b"42"`), so a
//! published tag can be checked with any stock HMAC tool.

use std::fmt;
use std::str::FromStr;

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sha3::Sha3_256;
use subtle::{Choice, ConstantTimeEq};

use crate::error::{FairPlayError, Result};

/// Secret key length in bytes.
pub const KEY_LEN: usize = 32;

/// Tag length in bytes (both supported digests are 256-bit).
pub const TAG_LEN: usize = 32;

/// MAC output type (256 bits / 32 bytes)
pub type Tag = [u8; TAG_LEN];

type HmacSha3_256 = Hmac<Sha3_256>;
type HmacSha256 = Hmac<Sha256>;

/// Commitment key.
///
/// `Debug` is redacted so keys never end up in logs by accident. Equality
/// is constant-time.
#[derive(Clone)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Build a key from a slice; `None` unless it is exactly [`KEY_LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; KEY_LEN] = bytes.try_into().ok()?;
        Some(Self(bytes))
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Lowercase hex encoding of the key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl ConstantTimeEq for SecretKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[..].ct_eq(&other.0[..])
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for SecretKey {}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Digest function used inside the HMAC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// HMAC-SHA3-256.
    #[default]
    #[serde(rename = "sha3-256")]
    Sha3_256,
    /// HMAC-SHA-256.
    #[serde(rename = "sha256")]
    Sha256,
}

impl HashAlgorithm {
    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha3_256 => "sha3-256",
            Self::Sha256 => "sha256",
        }
    }

    /// Compute `HMAC(key, encode(value))`.
    pub fn tag(self, key: &SecretKey, value: u64) -> Result<Tag> {
        match self {
            Self::Sha3_256 => compute_tag::<HmacSha3_256>(key, value),
            Self::Sha256 => compute_tag::<HmacSha256>(key, value),
        }
    }

    /// Check `tag` against `HMAC(key, encode(value))` in constant time.
    ///
    /// A tag of the wrong length is rejected, never panics.
    pub fn verify(self, key: &SecretKey, value: u64, tag: &[u8]) -> bool {
        match self {
            Self::Sha3_256 => verify_tag::<HmacSha3_256>(key, value, tag),
            Self::Sha256 => verify_tag::<HmacSha256>(key, value, tag),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = FairPlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha3-256" | "sha3_256" | "sha3" => Ok(Self::Sha3_256),
            "sha256" | "sha-256" | "sha2-256" => Ok(Self::Sha256),
            other => Err(FairPlayError::UnknownHashAlgorithm(other.to_string())),
        }
    }
}

/// Canonical byte encoding of a committed value: decimal ASCII.
pub fn encode_value(value: u64) -> Vec<u8> {
    value.to_string().into_bytes()
}

fn keyed<M: Mac + KeyInit>(key: &SecretKey, value: u64) -> Result<M> {
    let mut mac = <M as Mac>::new_from_slice(key.as_bytes())
        .map_err(|_| FairPlayError::MacKeyRejected { len: KEY_LEN })?;
    mac.update(&encode_value(value));
    Ok(mac)
}

fn compute_tag<M: Mac + KeyInit>(key: &SecretKey, value: u64) -> Result<Tag> {
    let output = keyed::<M>(key, value)?.finalize().into_bytes();
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&output);
    Ok(tag)
}

fn verify_tag<M: Mac + KeyInit>(key: &SecretKey, value: u64, tag: &[u8]) -> bool {
    keyed::<M>(key, value).map_or(false, |mac| mac.verify_slice(tag).is_ok())
}

// =============================================================================
// TESTS
// =============================================================================
