//! The other party in a round.
//!
//! A [`Counterpart`] sees only the [`CommitmentOffer`] and answers with its
//! own contribution. Answers may take arbitrarily long (a human at a
//! console), so the method is async; the selector bounds the wait.

use std::future::{self, Future};

use thiserror::Error;

use super::round::CommitmentOffer;
use crate::error::FairPlayError;

/// Why a counterpart could not contribute.
#[derive(Debug, Error)]
pub enum CounterpartError {
    /// The answer was not an integer.
    #[error("malformed input '{input}'")]
    Malformed {
        /// Raw answer.
        input: String,
    },

    /// The input stream ended.
    #[error("counterpart input closed")]
    Closed,

    /// Reading the answer failed.
    #[error("counterpart I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CounterpartError> for FairPlayError {
    fn from(err: CounterpartError) -> Self {
        FairPlayError::InvalidCounterpartInput {
            reason: err.to_string(),
        }
    }
}

/// A party that contributes a value to a commit-reveal round.
pub trait Counterpart {
    /// Choose a value in `[0, offer.range)` after seeing only the tag.
    fn contribute(
        &mut self,
        offer: &CommitmentOffer,
    ) -> impl Future<Output = Result<u64, CounterpartError>>;
}

impl<C: Counterpart + ?Sized> Counterpart for &mut C {
    fn contribute(
        &mut self,
        offer: &CommitmentOffer,
    ) -> impl Future<Output = Result<u64, CounterpartError>> {
        (**self).contribute(offer)
    }
}

/// Counterpart backed by a plain `FnMut(range) -> value` closure.
#[derive(Debug, Clone)]
pub struct FnCounterpart<F> {
    provider: F,
}

/// Wrap a closure that maps the round's range to a contribution.
///
/// The closure is not trusted: an out-of-range answer still aborts the
/// round with [`FairPlayError::InvalidCounterpartInput`].
pub fn from_fn<F>(provider: F) -> FnCounterpart<F>
where
    F: FnMut(u64) -> u64,
{
    FnCounterpart { provider }
}

impl<F> Counterpart for FnCounterpart<F>
where
    F: FnMut(u64) -> u64,
{
    fn contribute(
        &mut self,
        offer: &CommitmentOffer,
    ) -> impl Future<Output = Result<u64, CounterpartError>> {
        future::ready(Ok((self.provider)(offer.range)))
    }
}
