//! Exact head-to-head win probabilities between dice sets.

use super::dice::DiceSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendered in place of the diagonal
pub const NO_SELF_PLAY: &str = "-";

/// Decimal digits shown for each probability
pub const PRECISION: usize = 4;

/// Face-pair counts for one die against another
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub wins: u64,
    pub losses: u64,
    pub ties: u64,
}

impl HeadToHead {
    /// Enumerate every face pair of `row` against `col`
    pub fn count(row: &DiceSet, col: &DiceSet) -> Self {
        let mut outcome = Self {
            wins: 0,
            losses: 0,
            ties: 0,
        };
        for a in row.faces() {
            for b in col.faces() {
                match a.cmp(b) {
                    std::cmp::Ordering::Greater => outcome.wins += 1,
                    std::cmp::Ordering::Less => outcome.losses += 1,
                    std::cmp::Ordering::Equal => outcome.ties += 1,
                }
            }
        }
        outcome
    }

    pub fn total(&self) -> u64 {
        self.wins + self.losses + self.ties
    }

    /// Probability that the row die strictly beats the column die
    pub fn win_probability(&self) -> Probability {
        Probability {
            wins: self.wins,
            total: self.total(),
        }
    }

    pub fn tie_fraction(&self) -> f64 {
        self.ties as f64 / self.total() as f64
    }
}

/// Exact probability as a ratio of face-pair counts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Probability {
    pub wins: u64,
    pub total: u64,
}

impl Probability {
    pub fn as_f64(&self) -> f64 {
        self.wins as f64 / self.total as f64
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", PRECISION, self.as_f64())
    }
}

/// Win probabilities for every ordered pair of distinct dice sets.
///
/// Rows are the user's dice, columns the computer's. The diagonal is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbabilityMatrix {
    cells: Vec<Vec<Option<HeadToHead>>>,
}

impl ProbabilityMatrix {
    /// Exhaustively compare all face pairs; pure and deterministic
    pub fn compute(sets: &[DiceSet]) -> Self {
        let cells = sets
            .iter()
            .enumerate()
            .map(|(i, row)| {
                sets.iter()
                    .enumerate()
                    .map(|(j, col)| (i != j).then(|| HeadToHead::count(row, col)))
                    .collect()
            })
            .collect();
        Self { cells }
    }

    /// Number of dice sets on each axis
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Counts for `row` against `col`; `None` on the diagonal or out of range
    pub fn head_to_head(&self, row: usize, col: usize) -> Option<HeadToHead> {
        self.cells.get(row)?.get(col).copied().flatten()
    }

    /// Probability that `row` beats `col`
    pub fn get(&self, row: usize, col: usize) -> Option<Probability> {
        self.head_to_head(row, col)
            .map(|outcome| outcome.win_probability())
    }

    /// The grid as strings, with [`NO_SELF_PLAY`] on the diagonal
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Some(outcome) => outcome.win_probability().to_string(),
                        None => NO_SELF_PLAY.to_string(),
                    })
                    .collect()
            })
            .collect()
    }
}
