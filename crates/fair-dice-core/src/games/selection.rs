//! Move order and dice assignment.

use super::dice::{DiceSet, MIN_DICE_SETS};
use crate::error::{GameError, Result};
use crate::protocol::{FairRandomExchange, FairRandomResult, Party};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Bound of the first-move exchange: the user guesses 0 or 1
pub const FIRST_MOVE_BOUND: u32 = 2;

/// Outcome of the first-move exchange
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstMoveDecision {
    /// The user's guess, supplied as the counter value
    pub guess: u32,
    pub first_mover: Party,
    pub result: FairRandomResult,
}

/// Settle who picks dice first.
///
/// The user's guess is the counter value of a bound-2 exchange; the user
/// moves first when it equals the computer's revealed value.
pub fn decide_first_mover(
    exchange: &mut FairRandomExchange,
    guess: u32,
) -> Result<FirstMoveDecision> {
    if exchange.bound() != FIRST_MOVE_BOUND {
        return Err(GameError::ProtocolViolation(
            "first move must be decided by a bound-2 exchange",
        ));
    }
    exchange.supply_counter_value(guess)?;
    let result = exchange.reveal()?;

    let first_mover = if result.party_value == guess {
        Party::User
    } else {
        Party::Computer
    };
    info!(%first_mover, guess, value = result.party_value, "First move decided");

    Ok(FirstMoveDecision {
        guess,
        first_mover,
        result,
    })
}

/// A dice set bound to a party
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedDice {
    pub index: usize,
    pub dice: DiceSet,
}

/// Both parties' dice once selection is complete
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub computer: SelectedDice,
    pub user: SelectedDice,
}

impl Assignment {
    pub fn for_party(&self, party: Party) -> &SelectedDice {
        match party {
            Party::Computer => &self.computer,
            Party::User => &self.user,
        }
    }
}

/// Turn-based selection of distinct dice sets
#[derive(Debug)]
pub struct DiceSelection<'a> {
    sets: &'a [DiceSet],
    first_mover: Party,
    picks: Vec<(Party, usize)>,
}

impl<'a> DiceSelection<'a> {
    pub fn new(sets: &'a [DiceSet], first_mover: Party) -> Result<Self> {
        if sets.len() < MIN_DICE_SETS {
            return Err(GameError::TooFewDiceSets(sets.len()));
        }
        Ok(Self {
            sets,
            first_mover,
            picks: Vec::with_capacity(2),
        })
    }

    pub fn first_mover(&self) -> Party {
        self.first_mover
    }

    /// The party whose pick is due, or `None` once both have picked
    pub fn next_to_pick(&self) -> Option<Party> {
        match self.picks.len() {
            0 => Some(self.first_mover),
            1 => Some(self.first_mover.opponent()),
            _ => None,
        }
    }

    /// Indices not yet taken, in ascending order
    pub fn available(&self) -> Vec<usize> {
        (0..self.sets.len())
            .filter(|index| !self.is_taken(*index))
            .collect()
    }

    fn is_taken(&self, index: usize) -> bool {
        self.picks.iter().any(|(_, taken)| *taken == index)
    }

    /// Record a pick for `party`
    pub fn select(&mut self, party: Party, index: usize) -> Result<()> {
        if index >= self.sets.len() {
            return Err(GameError::IndexOutOfRange {
                index,
                count: self.sets.len(),
            });
        }
        if self.is_taken(index) {
            return Err(GameError::DuplicateSelection(index));
        }
        match self.next_to_pick() {
            Some(due) if due == party => {}
            Some(_) => return Err(GameError::ProtocolViolation("party selected out of turn")),
            None => return Err(GameError::ProtocolViolation("both dice already selected")),
        }

        info!(%party, index, dice = %self.sets[index], "Dice selected");
        self.picks.push((party, index));
        Ok(())
    }

    /// Both picks, once made
    pub fn finish(&self) -> Result<Assignment> {
        let pick_of = |party: Party| {
            self.picks
                .iter()
                .find(|(picker, _)| *picker == party)
                .map(|(_, index)| SelectedDice {
                    index: *index,
                    dice: self.sets[*index].clone(),
                })
        };
        match (pick_of(Party::Computer), pick_of(Party::User)) {
            (Some(computer), Some(user)) => Ok(Assignment { computer, user }),
            _ => Err(GameError::ProtocolViolation("dice selection is incomplete")),
        }
    }
}
