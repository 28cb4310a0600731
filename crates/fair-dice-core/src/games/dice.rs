//! Dice sets and their validation at the input boundary.

use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum number of dice sets for a game
pub const MIN_DICE_SETS: usize = 2;

/// One non-standard die: an ordered, non-empty list of integer faces
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct DiceSet(Vec<i64>);

impl DiceSet {
    /// Create a die; faces may repeat but there must be at least one.
    ///
    /// A die built outside an argument list has no position, so an empty one
    /// is reported as `InvalidBound`: it could never be rolled.
    pub fn new(faces: Vec<i64>) -> Result<Self> {
        if faces.is_empty() {
            return Err(GameError::InvalidBound);
        }
        Ok(Self(faces))
    }

    pub fn faces(&self) -> &[i64] {
        &self.0
    }

    /// Number of faces, used as the bound of a roll
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed die
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Face at a rolled index
    pub fn face(&self, index: usize) -> Option<i64> {
        self.0.get(index).copied()
    }
}

impl TryFrom<Vec<i64>> for DiceSet {
    type Error = GameError;

    fn try_from(faces: Vec<i64>) -> Result<Self> {
        Self::new(faces)
    }
}

impl From<DiceSet> for Vec<i64> {
    fn from(dice: DiceSet) -> Self {
        dice.0
    }
}

impl fmt::Display for DiceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.0.iter().map(i64::to_string).collect();
        write!(f, "{}", faces.join(","))
    }
}

/// Parse one comma-separated list of faces, e.g. `2,2,4,4,9,9`.
///
/// `position` is only used to label errors.
/// Every field must hold an integer; `1,,2` and `3,4,` are rejected rather
/// than shortened.
pub fn parse_dice_set(input: &str, position: usize) -> Result<DiceSet> {
    let fields: Vec<&str> = input.split(',').map(str::trim).collect();
    if fields.iter().all(|field| field.is_empty()) {
        return Err(GameError::EmptyDiceSet(position));
    }

    let faces = fields
        .into_iter()
        .map(|face| {
            face.parse::<i64>().map_err(|_| GameError::NonIntegerFace {
                set: position,
                face: face.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DiceSet(faces))
}

/// Validate raw arguments into dice sets before any game object exists.
pub fn parse_dice_sets<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<DiceSet>> {
    if inputs.len() < MIN_DICE_SETS {
        return Err(GameError::TooFewDiceSets(inputs.len()));
    }
    inputs
        .iter()
        .enumerate()
        .map(|(position, input)| parse_dice_set(input.as_ref(), position))
        .collect()
}
