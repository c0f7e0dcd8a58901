//! Runtime configuration.
//!
//! Defaults, overridable from the environment and then from the command
//! line.

use std::time::Duration;

use crate::core::mac::HashAlgorithm;
use crate::error::{FairPlayError, Result};
use crate::protocol::selector::SelectorConfig;

/// Environment variable selecting the MAC digest.
pub const ENV_HASH: &str = "FAIR_DICE_HASH";

/// Environment variable with the counterpart timeout in seconds (`0` = none).
pub const ENV_TIMEOUT_SECS: &str = "FAIR_DICE_TIMEOUT_SECS";

/// Default wait for a counterpart contribution.
pub const DEFAULT_COUNTERPART_TIMEOUT: Duration = Duration::from_secs(120);

/// Minimum number of dice for a game.
pub const MIN_DICE: usize = 3;

/// Range of the first-move round: outcome 0 or 1.
pub const FIRST_MOVE_RANGE: u64 = 2;

/// Game and protocol configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FairDiceConfig {
    /// Digest used inside commitment MACs.
    pub hash_algorithm: HashAlgorithm,
    /// Bound on waiting for the counterpart. `None` waits forever.
    pub counterpart_timeout: Option<Duration>,
    /// Minimum number of dice a game needs.
    pub min_dice: usize,
    /// Range of the first-move round.
    pub first_move_range: u64,
}

impl Default for FairDiceConfig {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::default(),
            counterpart_timeout: Some(DEFAULT_COUNTERPART_TIMEOUT),
            min_dice: MIN_DICE,
            first_move_range: FIRST_MOVE_RANGE,
        }
    }
}

impl FairDiceConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup. Unset keys keep defaults;
    /// set but invalid keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(hash) = lookup(ENV_HASH) {
            config.hash_algorithm = hash.parse()?;
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            config.counterpart_timeout = parse_timeout_secs(&secs)?;
        }

        Ok(config)
    }

    /// Protocol-level settings for a [`FairSelector`](crate::FairSelector).
    pub fn selector_config(&self) -> SelectorConfig {
        SelectorConfig {
            algorithm: self.hash_algorithm,
            counterpart_timeout: self.counterpart_timeout,
        }
    }
}

/// Parse a timeout in whole seconds; `0` disables the timeout.
pub fn parse_timeout_secs(raw: &str) -> Result<Option<Duration>> {
    let secs: u64 = raw.trim().parse().map_err(|_| FairPlayError::ConfigParse {
        input: raw.to_string(),
        reason: format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds"),
    })?;
    Ok(timeout_from_secs(secs))
}

/// `0` means no timeout.
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
