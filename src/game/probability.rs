//! Probability Engine
//!
//! Exact win probabilities between dice by full enumeration of face pairs.
//! Results stay rational until they are displayed.

use std::cmp::Ordering;
use std::fmt;

use super::dice::FaceSet;
use crate::error::{FairPlayError, Result};

/// Probability that one die rolls strictly higher than another.
///
/// Stored as `wins / pairs`; equality and ordering compare the rational
/// values, so `2/4 == 1/2`.
#[derive(Clone, Copy, Debug)]
pub struct WinProbability {
    wins: u64,
    pairs: u64,
}

impl WinProbability {
    /// Number of face pairs won.
    pub fn wins(&self) -> u64 {
        self.wins
    }

    /// Number of face pairs compared.
    pub fn pairs(&self) -> u64 {
        self.pairs
    }

    /// `(numerator, denominator)` in lowest terms.
    pub fn reduced(&self) -> (u64, u64) {
        let divisor = gcd(self.wins, self.pairs).max(1);
        (self.wins / divisor, self.pairs / divisor)
    }

    /// Floating-point value, for display only.
    pub fn as_f64(&self) -> f64 {
        self.wins as f64 / self.pairs as f64
    }
}

impl PartialEq for WinProbability {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for WinProbability {}

impl PartialOrd for WinProbability {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WinProbability {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.wins as u128 * other.pairs as u128;
        let rhs = other.wins as u128 * self.pairs as u128;
        lhs.cmp(&rhs)
    }
}

impl fmt::Display for WinProbability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (numerator, denominator) = self.reduced();
        write!(f, "{numerator}/{denominator}")
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Probability that `a` beats `b`. Ties count for neither die.
pub fn win_probability(a: &FaceSet, b: &FaceSet) -> WinProbability {
    count_wins(a.faces(), b.faces())
}

/// Slice form of [`win_probability`] for unvalidated face lists.
pub fn win_probability_of_faces(a: &[u32], b: &[u32]) -> Result<WinProbability> {
    if a.is_empty() || b.is_empty() {
        return Err(FairPlayError::EmptyFaceSet);
    }
    Ok(count_wins(a, b))
}

fn count_wins(a: &[u32], b: &[u32]) -> WinProbability {
    let wins = a
        .iter()
        .map(|fa| b.iter().filter(|fb| fa > fb).count() as u64)
        .sum();
    WinProbability {
        wins,
        pairs: a.len() as u64 * b.len() as u64,
    }
}

/// Pairwise win probabilities for a set of dice.
///
/// Cell `(row, col)` is the probability that die `row` beats die `col`. The
/// diagonal is `None`: a die is not compared against itself in the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbabilityMatrix {
    cells: Vec<Vec<Option<WinProbability>>>,
}

impl ProbabilityMatrix {
    /// Compute every off-diagonal cell.
    pub fn compute(dice: &[FaceSet]) -> Self {
        let cells = dice
            .iter()
            .enumerate()
            .map(|(row, a)| {
                dice.iter()
                    .enumerate()
                    .map(|(col, b)| (row != col).then(|| win_probability(a, b)))
                    .collect()
            })
            .collect();
        Self { cells }
    }

    /// Number of dice.
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Probability that `row` beats `col`; `None` on the diagonal or out of
    /// bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<WinProbability> {
        self.cells.get(row)?.get(col).copied().flatten()
    }

    /// Rows of the matrix.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<WinProbability>]> {
        self.cells.iter().map(Vec::as_slice)
    }
}

/// Die with the best chance of beating `dice[against]`, skipping `against`
/// itself and every index in `exclude`. Ties go to the lowest index.
pub fn best_counter(dice: &[FaceSet], against: usize, exclude: &[usize]) -> Option<usize> {
    let target = dice.get(against)?;
    dice.iter()
        .enumerate()
        .filter(|(index, _)| *index != against && !exclude.contains(index))
        .map(|(index, die)| (index, win_probability(die, target)))
        .fold(None, |best: Option<(usize, WinProbability)>, candidate| match best {
            Some((_, best_p)) if best_p >= candidate.1 => best,
            _ => Some(candidate),
        })
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn die(text: &str) -> FaceSet {
        FaceSet::parse(text).unwrap()
    }

    #[test]
    fn test_classic_pair() {
        let a = die("2,2,4,4,9,9");
        let b = die("1,1,6,6,8,8");

        let p = win_probability(&a, &b);
        assert_eq!(p.wins(), 20);
        assert_eq!(p.pairs(), 36);
        assert_eq!(p.reduced(), (5, 9));
        assert_eq!(format!("{:.4}", p.as_f64()), "0.5556");

        let q = win_probability(&b, &a);
        assert_eq!(q.reduced(), (4, 9));
        assert_eq!(format!("{:.4}", q.as_f64()), "0.4444");
    }

    #[test]
    fn test_identical_dice_exclude_ties() {
        let a = die("1,2,3");
        let p = win_probability(&a, &a);
        assert_eq!(p.wins(), 3);
        assert_eq!(p.pairs(), 9);
        assert_eq!(p.to_string(), "1/3");
    }

    #[test]
    fn test_domination() {
        let p = win_probability(&die("9,9,9"), &die("1,1,1"));
        assert_eq!(p.reduced(), (1, 1));
        assert_eq!(p.as_f64(), 1.0);

        let q = win_probability(&die("1,1,1"), &die("9,9,9"));
        assert_eq!(q.reduced(), (0, 1));
        assert_eq!(q.as_f64(), 0.0);
    }

    #[test]
    fn test_all_ties() {
        let p = win_probability(&die("4,4"), &die("4"));
        assert_eq!(p.wins(), 0);
        assert_eq!(p.pairs(), 2);
    }

    #[test]
    fn test_rational_equality() {
        let half = win_probability(&die("2,1"), &die("1"));
        let also_half = win_probability(&die("2,2,1,1"), &die("1"));
        assert_eq!(half, also_half);
        assert!(win_probability(&die("9"), &die("1")) > half);
    }

    #[test]
    fn test_slice_form_rejects_empty() {
        assert!(matches!(
            win_probability_of_faces(&[], &[1, 2]),
            Err(FairPlayError::EmptyFaceSet)
        ));
        assert!(matches!(
            win_probability_of_faces(&[1], &[]),
            Err(FairPlayError::EmptyFaceSet)
        ));
        assert_eq!(win_probability_of_faces(&[3], &[1, 5]).unwrap().reduced(), (1, 2));
    }

    #[test]
    fn test_matrix() {
        let dice = vec![die("2,2,4,4,9,9"), die("6,8,1,1,8,6"), die("7,5,3,7,5,3")];
        let matrix = ProbabilityMatrix::compute(&dice);

        assert_eq!(matrix.size(), 3);
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), None);
        }
        assert_eq!(matrix.get(0, 1).unwrap().reduced(), (5, 9));
        assert_eq!(matrix.get(1, 0).unwrap().reduced(), (4, 9));
        assert_eq!(matrix.get(3, 0), None);
        assert_eq!(matrix.rows().count(), 3);
    }

    #[test]
    fn test_nontransitive_cycle() {
        // Each die beats the next with probability 5/9.
        let dice = vec![die("2,2,4,4,9,9"), die("1,1,6,6,8,8"), die("3,3,5,5,7,7")];
        let matrix = ProbabilityMatrix::compute(&dice);

        assert_eq!(matrix.get(0, 1).unwrap().reduced(), (5, 9));
        assert_eq!(matrix.get(1, 2).unwrap().reduced(), (5, 9));
        assert_eq!(matrix.get(2, 0).unwrap().reduced(), (5, 9));
    }

    #[test]
    fn test_best_counter() {
        let dice = vec![die("2,2,4,4,9,9"), die("1,1,6,6,8,8"), die("3,3,5,5,7,7")];

        // Die 2 beats die 0; die 0 beats die 1; die 1 beats die 2.
        assert_eq!(best_counter(&dice, 0, &[]), Some(2));
        assert_eq!(best_counter(&dice, 1, &[]), Some(0));
        assert_eq!(best_counter(&dice, 2, &[]), Some(1));

        assert_eq!(best_counter(&dice, 0, &[2]), Some(1));
        assert_eq!(best_counter(&dice, 0, &[1, 2]), None);
        assert_eq!(best_counter(&dice, 9, &[]), None);
    }
}
