//! Game definitions and logic.

mod dice;
mod probability;
mod roll;
mod selection;
mod session;
mod traits;

pub use dice::{parse_dice_set, parse_dice_sets, DiceSet, MIN_DICE_SETS};
pub use probability::{HeadToHead, Probability, ProbabilityMatrix, NO_SELF_PLAY, PRECISION};
pub use roll::{begin_roll, finish_roll, DiceRoll};
pub use selection::{
    decide_first_mover, Assignment, DiceSelection, FirstMoveDecision, SelectedDice,
    FIRST_MOVE_BOUND,
};
pub use session::{DiceGame, GameSession};
pub use traits::{Counterparty, RandomCounterparty};
