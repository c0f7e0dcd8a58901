//! Outcome combiner.
//!
//! `(x + y) mod range` is uniform over `[0, range)` whenever `x` is uniform
//! and chosen independently of `y`. The committer fixes `x` before seeing
//! `y`, and the counterpart picks `y` without seeing `x`, so neither side
//! can steer the outcome.

use crate::error::{FairPlayError, Result};

/// Merge two contributions into one outcome in `[0, range)`.
///
/// Inputs are not required to be reduced; the sum is taken in `u128` so it
/// cannot overflow.
pub fn combine(x: u64, y: u64, range: u64) -> Result<u64> {
    if range == 0 {
        return Err(FairPlayError::InvalidRange { range });
    }
    let sum = x as u128 + y as u128;
    Ok((sum % range as u128) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_combine_edges() {
        assert_eq!(combine(0, 0, 6).unwrap(), 0);
        assert_eq!(combine(5, 5, 6).unwrap(), 4);
        assert_eq!(combine(1, 0, 2).unwrap(), 1);
        assert_eq!(combine(1, 1, 2).unwrap(), 0);
        assert_eq!(combine(0, 0, 1).unwrap(), 0);
    }

    #[test]
    fn test_combine_no_overflow() {
        let r = u64::MAX;
        assert_eq!(combine(r - 1, r - 1, r).unwrap(), r - 2);
    }

    #[test]
    fn test_combine_zero_range() {
        assert!(matches!(combine(1, 1, 0), Err(FairPlayError::InvalidRange { range: 0 })));
    }

    #[test]
    fn test_every_y_permutes_outcomes() {
        // For a fixed y, x -> combine(x, y) is a bijection on [0, range).
        let range = 7;
        for y in 0..range {
            let mut outcomes: Vec<u64> = (0..range).map(|x| combine(x, y, range).unwrap()).collect();
            outcomes.sort_unstable();
            assert_eq!(outcomes, (0..range).collect::<Vec<_>>());
        }
    }

    proptest! {
        #[test]
        fn prop_combine_matches_modular_sum(range in 1u64..10_000, x in 0u64..10_000, y in 0u64..10_000) {
            let x = x % range;
            let y = y % range;
            prop_assert_eq!(combine(x, y, range).unwrap(), (x + y) % range);
        }

        #[test]
        fn prop_combine_in_range(range in 1u64..=u64::MAX, x in any::<u64>(), y in any::<u64>()) {
            prop_assert!(combine(x, y, range).unwrap() < range);
        }
    }
}
