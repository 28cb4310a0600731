//! Error type shared by every layer of the game.

use thiserror::Error;

/// Errors from commitment, exchange, selection and input validation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Invalid bound: range must contain at least one value")]
    InvalidBound,

    #[error("Value {value} is out of range 0..{bound}")]
    OutOfRange { value: u32, bound: u32 },

    #[error("Protocol violation: {0}")]
    ProtocolViolation(&'static str),

    #[error("Dice set {0} is already taken")]
    DuplicateSelection(usize),

    #[error("No dice set with index {index} (have {count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("At least two dice sets are required, got {0}")]
    TooFewDiceSets(usize),

    #[error("Dice set {0} has no faces")]
    EmptyDiceSet(usize),

    #[error("Dice set {set}: face {face:?} is not an integer")]
    NonIntegerFace { set: usize, face: String },

    #[error("Game aborted: {0}")]
    Aborted(String),
}

impl GameError {
    /// Errors caused by a bad counter-party choice that can be asked again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GameError::OutOfRange { .. }
                | GameError::DuplicateSelection(_)
                | GameError::IndexOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
