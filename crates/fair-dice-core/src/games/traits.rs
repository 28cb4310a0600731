//! The counter-party seam: whoever answers the computer's commitments.

use super::dice::DiceSet;
use super::roll::DiceRoll;
use super::selection::{FirstMoveDecision, SelectedDice};
use crate::error::{GameError, Result};
use crate::protocol::{CommitMessage, Party, RevealMessage};
use rand::Rng;

/// The user side of a game: a person at a prompt, a script, or a bot.
///
/// The computer commits and the counter-party answers. Values returned here
/// are validated by the game; rejected answers are passed to
/// [`Counterparty::on_rejected`] and asked again if it returns `Ok`.
pub trait Counterparty {
    /// Guess the computer's hidden value in `0..=1`
    fn guess_first_move(&mut self, commit: &CommitMessage) -> Result<u32>;

    /// Pick a dice set index from `available`
    fn pick_dice(&mut self, sets: &[DiceSet], available: &[usize]) -> Result<usize>;

    /// Contribute a value in `0..commit.bound` to a roll
    fn add_value(&mut self, commit: &CommitMessage) -> Result<u32>;

    fn observe_reveal(&mut self, _reveal: &RevealMessage) {}

    fn observe_first_move(&mut self, _decision: &FirstMoveDecision) {}

    fn observe_pick(&mut self, _party: Party, _selected: &SelectedDice) {}

    fn observe_roll(&mut self, _roll: &DiceRoll) {}

    /// Decide what to do with a rejected answer. Aborts by default.
    fn on_rejected(&mut self, error: &GameError) -> Result<()> {
        Err(error.clone())
    }
}

/// Counter-party that answers uniformly at random.
///
/// Its values do not affect fairness; they only have to be in range.
pub struct RandomCounterparty<R> {
    rng: R,
}

impl<R: Rng> RandomCounterparty<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Counterparty for RandomCounterparty<R> {
    fn guess_first_move(&mut self, _commit: &CommitMessage) -> Result<u32> {
        Ok(self.rng.gen_range(0..=1))
    }

    fn pick_dice(&mut self, _sets: &[DiceSet], available: &[usize]) -> Result<usize> {
        if available.is_empty() {
            return Err(GameError::ProtocolViolation("no dice left to pick"));
        }
        Ok(available[self.rng.gen_range(0..available.len())])
    }

    fn add_value(&mut self, commit: &CommitMessage) -> Result<u32> {
        if commit.bound == 0 {
            return Err(GameError::InvalidBound);
        }
        Ok(self.rng.gen_range(0..commit.bound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::CommitmentGenerator;
    use crate::protocol::{ExchangeStep, FairRandomExchange, GameId};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn commit(bound: u32) -> CommitMessage {
        let mut generator = CommitmentGenerator::with_rng(StdRng::seed_from_u64(2));
        let exchange = FairRandomExchange::begin(&mut generator, bound).unwrap();
        CommitMessage::new(GameId::new(), ExchangeStep::Roll(Party::User), &exchange)
    }

    #[test]
    fn test_random_counterparty_stays_in_range() {
        let mut bot = RandomCounterparty::new(StdRng::seed_from_u64(9));
        let sets = vec![DiceSet::new(vec![1]).unwrap(); 4];
        let roll = commit(5);

        for _ in 0..100 {
            assert!(bot.guess_first_move(&commit(2)).unwrap() <= 1);
            assert!(bot.add_value(&roll).unwrap() < 5);
            let pick = bot.pick_dice(&sets, &[1, 3]).unwrap();
            assert!(pick == 1 || pick == 3);
        }
    }

    #[test]
    fn test_default_rejection_aborts() {
        let mut bot = RandomCounterparty::new(StdRng::seed_from_u64(9));
        let error = GameError::DuplicateSelection(0);
        assert_eq!(bot.on_rejected(&error).unwrap_err(), error);
    }
}
