//! Fair Selector
//!
//! Runs one commit-reveal round end to end:
//!
//! ```text
//! draw x ──▶ commit(x) ──▶ publish tag ──▶ counterpart picks y
//!                                               │
//!      outcome = (x + y) mod range ◀── verify ◀── reveal x, key
//! ```
//!
//! Nothing about `x` or the key leaves the selector until `y` is in hand.
//! An aborted round (bad input, timeout) reveals nothing.

use std::time::Duration;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::{debug, info, warn};

use super::commitment::CommitmentScheme;
use super::counterpart::Counterpart;
use super::round::{CommitmentOffer, Round};
use crate::config::DEFAULT_COUNTERPART_TIMEOUT;
use crate::core::mac::HashAlgorithm;
use crate::core::rng::draw_below;
use crate::error::{FairPlayError, Result};

/// Label used by [`FairSelector::run_round`].
pub const DEFAULT_ROUND_LABEL: &str = "fair selection";

/// Protocol settings for a [`FairSelector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Digest used inside commitment MACs.
    pub algorithm: HashAlgorithm,
    /// Bound on waiting for the counterpart. `None` waits forever.
    pub counterpart_timeout: Option<Duration>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            counterpart_timeout: Some(DEFAULT_COUNTERPART_TIMEOUT),
        }
    }
}

/// Runs commit-reveal rounds with an injected secure RNG.
#[derive(Debug)]
pub struct FairSelector<R> {
    rng: R,
    scheme: CommitmentScheme,
    counterpart_timeout: Option<Duration>,
}

impl FairSelector<OsRng> {
    /// Selector backed by the operating system's CSPRNG.
    pub fn with_os_rng(config: SelectorConfig) -> Self {
        Self::new(OsRng, config)
    }
}

impl<R: RngCore + CryptoRng> FairSelector<R> {
    /// Create a selector.
    pub fn new(rng: R, config: SelectorConfig) -> Self {
        Self {
            rng,
            scheme: CommitmentScheme::new(config.algorithm),
            counterpart_timeout: config.counterpart_timeout,
        }
    }

    /// Commitment scheme in use.
    pub fn scheme(&self) -> CommitmentScheme {
        self.scheme
    }

    /// Configured counterpart timeout.
    pub fn counterpart_timeout(&self) -> Option<Duration> {
        self.counterpart_timeout
    }

    /// The selector's RNG, for callers that need non-protocol randomness
    /// from the same source.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Draw `x` uniformly from `[0, range)` and commit to it.
    ///
    /// Returns a round in phase `Committed`; callers that drive the phases
    /// themselves continue with [`Round::attach_counterpart`].
    pub fn commit(&mut self, label: &str, range: u64) -> Result<Round> {
        let value = draw_below(&mut self.rng, range)?;
        let commitment = self.scheme.commit(&mut self.rng, value, range)?;
        let round = Round::new(label, commitment);

        info!(
            round_id = %round.id(),
            label,
            range,
            algorithm = %round.algorithm(),
            tag = %hex::encode(round.tag()),
            "Round committed"
        );

        Ok(round)
    }

    /// Run a full round with the default label.
    pub async fn run_round<C: Counterpart>(&mut self, range: u64, counterpart: C) -> Result<Round> {
        self.run_labeled_round(DEFAULT_ROUND_LABEL, range, counterpart).await
    }

    /// Run a full round: commit, collect the counterpart's value, reveal,
    /// self-check and combine.
    pub async fn run_labeled_round<C: Counterpart>(
        &mut self,
        label: &str,
        range: u64,
        mut counterpart: C,
    ) -> Result<Round> {
        let round = self.commit(label, range)?;
        let offer = round.offer();

        let contributed = self
            .await_contribution(&offer, &mut counterpart)
            .await
            .and_then(|value| round.attach_counterpart(value));
        let round = match contributed {
            Ok(round) => round,
            Err(err) => {
                warn!(round_id = %offer.round_id, error = %err, "Round aborted before reveal");
                return Err(err);
            }
        };
        debug!(
            round_id = %round.id(),
            counterpart_value = ?round.counterpart_value(),
            "Counterpart contributed"
        );

        let round = round.reveal()?.combine()?;

        info!(
            round_id = %round.id(),
            label,
            outcome = ?round.outcome(),
            "Round combined"
        );

        Ok(round)
    }

    async fn await_contribution<C: Counterpart>(
        &self,
        offer: &CommitmentOffer,
        counterpart: &mut C,
    ) -> Result<u64> {
        match self.counterpart_timeout {
            Some(limit) => match tokio::time::timeout(limit, counterpart.contribute(offer)).await {
                Ok(answer) => answer.map_err(FairPlayError::from),
                Err(_) => Err(FairPlayError::CounterpartTimeout { waited: limit }),
            },
            None => counterpart.contribute(offer).await.map_err(FairPlayError::from),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::combine::combine;
    use crate::protocol::commitment::verify;
    use crate::protocol::counterpart::{from_fn, CounterpartError};
    use crate::protocol::round::RoundPhase;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::future::Future;

    fn seeded(seed: u64) -> FairSelector<StdRng> {
        FairSelector::new(StdRng::seed_from_u64(seed), SelectorConfig::default())
    }

    /// Pearson chi-squared statistic against the uniform distribution.
    fn chi_squared(counts: &[u64]) -> f64 {
        let total: u64 = counts.iter().sum();
        let expected = total as f64 / counts.len() as f64;
        counts
            .iter()
            .map(|&c| {
                let diff = c as f64 - expected;
                diff * diff / expected
            })
            .sum()
    }

    struct Malformed;

    impl Counterpart for Malformed {
        fn contribute(
            &mut self,
            _offer: &CommitmentOffer,
        ) -> impl Future<Output = Result<u64, CounterpartError>> {
            std::future::ready(Err(CounterpartError::Malformed { input: "three".into() }))
        }
    }

    struct Sleepy;

    impl Counterpart for Sleepy {
        fn contribute(
            &mut self,
            _offer: &CommitmentOffer,
        ) -> impl Future<Output = Result<u64, CounterpartError>> {
            async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(0)
            }
        }
    }

    /// Remembers every offer it saw.
    #[derive(Default)]
    struct Recorder {
        offers: Vec<CommitmentOffer>,
        answer: u64,
    }

    impl Counterpart for Recorder {
        fn contribute(
            &mut self,
            offer: &CommitmentOffer,
        ) -> impl Future<Output = Result<u64, CounterpartError>> {
            self.offers.push(offer.clone());
            std::future::ready(Ok(self.answer))
        }
    }

    #[tokio::test]
    async fn test_run_round_completes() {
        let mut selector = seeded(1);
        let round = selector.run_round(6, from_fn(|_| 4)).await.unwrap();

        assert_eq!(round.phase(), RoundPhase::Combined);
        assert_eq!(round.label(), DEFAULT_ROUND_LABEL);
        assert_eq!(round.counterpart_value(), Some(4));

        let opening = round.opening().unwrap();
        assert!(opening.value < 6);
        assert!(verify(&opening.secret_key, opening.value, round.tag()));
        assert_eq!(round.outcome(), Some(combine(opening.value, 4, 6).unwrap()));
    }

    #[tokio::test]
    async fn test_counterpart_sees_only_the_tag() {
        let mut selector = seeded(2);
        let mut recorder = Recorder { answer: 1, ..Default::default() };

        let round = selector
            .run_labeled_round("first move", 2, &mut recorder)
            .await
            .unwrap();

        assert_eq!(recorder.offers.len(), 1);
        let offer = &recorder.offers[0];
        assert_eq!(offer.round_id, round.id());
        assert_eq!(offer.label, "first move");
        assert_eq!(offer.range, 2);
        assert_eq!(&offer.tag, round.tag());

        // The tag the counterpart saw binds the value revealed afterwards.
        let opening = round.opening().unwrap();
        assert!(verify(&opening.secret_key, opening.value, &offer.tag));
    }

    #[test]
    fn test_commit_discloses_nothing() {
        let mut selector = seeded(3);
        let round = selector.commit("peek", 6).unwrap();

        assert_eq!(round.phase(), RoundPhase::Committed);
        assert!(round.opening().is_none());
        assert!(round.outcome().is_none());
    }

    #[tokio::test]
    async fn test_out_of_range_counterpart_aborts() {
        let mut selector = seeded(4);
        let result = selector.run_round(6, from_fn(|range| range)).await;
        assert!(matches!(result, Err(FairPlayError::InvalidCounterpartInput { .. })));
    }

    #[tokio::test]
    async fn test_malformed_counterpart_aborts() {
        let mut selector = seeded(5);
        let result = selector.run_round(6, Malformed).await;
        match result {
            Err(FairPlayError::InvalidCounterpartInput { reason }) => assert!(reason.contains("three")),
            other => panic!("expected InvalidCounterpartInput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_counterpart_timeout() {
        let config = SelectorConfig {
            counterpart_timeout: Some(Duration::from_millis(20)),
            ..SelectorConfig::default()
        };
        let mut selector = FairSelector::new(StdRng::seed_from_u64(6), config);

        let result = selector.run_round(6, Sleepy).await;
        assert!(matches!(
            result,
            Err(FairPlayError::CounterpartTimeout { waited }) if waited == Duration::from_millis(20)
        ));
    }

    #[tokio::test]
    async fn test_invalid_range() {
        let mut selector = seeded(7);
        let result = selector.run_round(0, from_fn(|_| 0)).await;
        assert!(matches!(result, Err(FairPlayError::InvalidRange { range: 0 })));
    }

    #[tokio::test]
    async fn test_fresh_key_every_round() {
        let mut selector = seeded(8);
        let mut keys = HashSet::new();
        for _ in 0..50 {
            let round = selector.run_round(2, from_fn(|_| 0)).await.unwrap();
            keys.insert(round.opening().unwrap().secret_key.to_hex());
        }
        assert_eq!(keys.len(), 50);
    }

    #[tokio::test]
    async fn test_configured_algorithm_is_used() {
        let config = SelectorConfig {
            algorithm: HashAlgorithm::Sha256,
            counterpart_timeout: None,
        };
        let mut selector = FairSelector::new(StdRng::seed_from_u64(9), config);
        let round = selector.run_round(3, from_fn(|_| 2)).await.unwrap();

        assert_eq!(round.algorithm(), HashAlgorithm::Sha256);
        let opening = round.opening().unwrap();
        assert!(HashAlgorithm::Sha256.verify(&opening.secret_key, opening.value, round.tag()));
    }

    #[tokio::test]
    async fn test_outcomes_uniform_with_fixed_counterpart() {
        // df = 5; P(chi2 > 30) is about 1.5e-5.
        const RANGE: u64 = 6;
        const TRIALS: usize = 6000;

        for fixed in [0, RANGE - 1] {
            let mut selector = seeded(100 + fixed);
            let mut counts = [0u64; RANGE as usize];
            for _ in 0..TRIALS {
                let round = selector.run_round(RANGE, from_fn(move |_| fixed)).await.unwrap();
                counts[round.outcome().unwrap() as usize] += 1;
            }
            assert!(chi_squared(&counts) < 30.0, "y = {fixed}: counts {counts:?}");
        }
    }

    #[tokio::test]
    async fn test_outcomes_uniform_with_adaptive_counterpart() {
        // The counterpart tries to repeat the last outcome by echoing it.
        const RANGE: u64 = 6;
        const TRIALS: usize = 6000;

        let mut selector = seeded(200);
        let mut counts = [0u64; RANGE as usize];
        let mut last = 0;
        for _ in 0..TRIALS {
            let round = selector.run_round(RANGE, from_fn(move |_| last)).await.unwrap();
            last = round.outcome().unwrap();
            counts[last as usize] += 1;
        }
        assert!(chi_squared(&counts) < 30.0, "counts {counts:?}");
    }
}
