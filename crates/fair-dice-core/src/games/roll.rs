//! Fair die rolls: one exchange per roll, bounded by the number of faces.

use super::dice::DiceSet;
use super::selection::SelectedDice;
use crate::crypto::CommitmentGenerator;
use crate::error::{GameError, Result};
use crate::protocol::{FairRandomExchange, FairRandomResult, Party};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A completed roll
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub party: Party,
    pub dice_index: usize,
    pub result: FairRandomResult,
    pub face: i64,
}

fn roll_bound(dice: &DiceSet) -> Result<u32> {
    match u32::try_from(dice.len()) {
        Ok(0) | Err(_) => Err(GameError::InvalidBound),
        Ok(bound) => Ok(bound),
    }
}

/// Start the exchange for rolling `dice`
pub fn begin_roll<R: RngCore + CryptoRng>(
    generator: &mut CommitmentGenerator<R>,
    dice: &DiceSet,
) -> Result<FairRandomExchange> {
    FairRandomExchange::begin(generator, roll_bound(dice)?)
}

/// Apply the counter value, reveal, and read the face at the combined index
pub fn finish_roll(
    party: Party,
    selected: &SelectedDice,
    exchange: &mut FairRandomExchange,
    counter_value: u32,
) -> Result<DiceRoll> {
    if exchange.bound() != roll_bound(&selected.dice)? {
        return Err(GameError::ProtocolViolation(
            "roll exchange does not match the die",
        ));
    }
    exchange.supply_counter_value(counter_value)?;
    let result = exchange.reveal()?;
    let face = selected
        .dice
        .face(result.combined as usize)
        .ok_or(GameError::ProtocolViolation("combined index outside the die"))?;

    info!(%party, face, index = result.combined, "Die rolled");

    Ok(DiceRoll {
        party,
        dice_index: selected.index,
        result,
        face,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Commitment, SecretKey, SECRET_KEY_LEN};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn selected(faces: Vec<i64>) -> SelectedDice {
        SelectedDice {
            index: 1,
            dice: DiceSet::new(faces).unwrap(),
        }
    }

    #[test]
    fn test_roll_reads_combined_face() {
        let die = selected(vec![10, 20, 30, 40, 50, 60]);
        let key = SecretKey::from_bytes([8u8; SECRET_KEY_LEN]);
        let mut exchange =
            FairRandomExchange::from_commitment(Commitment::with_value(key, 4, 6).unwrap());

        let roll = finish_roll(Party::User, &die, &mut exchange, 3).unwrap();
        assert_eq!(roll.result.combined, 1);
        assert_eq!(roll.face, 20);
        assert_eq!(roll.dice_index, 1);
        assert!(roll.result.verify());
    }

    #[test]
    fn test_bound_follows_die_length() {
        let mut generator = CommitmentGenerator::with_rng(StdRng::seed_from_u64(3));
        let die = DiceSet::new(vec![1, 2, 3, 4]).unwrap();

        let exchange = begin_roll(&mut generator, &die).unwrap();
        assert_eq!(exchange.bound(), 4);
    }

    #[test]
    fn test_singleton_die_always_rolls_its_face() {
        let mut generator = CommitmentGenerator::with_rng(StdRng::seed_from_u64(3));
        let die = selected(vec![7]);

        let mut exchange = begin_roll(&mut generator, &die.dice).unwrap();
        let roll = finish_roll(Party::Computer, &die, &mut exchange, 0).unwrap();
        assert_eq!(roll.face, 7);
    }

    #[test]
    fn test_mismatched_exchange_rejected() {
        let mut generator = CommitmentGenerator::with_rng(StdRng::seed_from_u64(3));
        let mut exchange = FairRandomExchange::begin(&mut generator, 6).unwrap();

        assert!(matches!(
            finish_roll(Party::User, &selected(vec![1, 2, 3]), &mut exchange, 0),
            Err(GameError::ProtocolViolation(_))
        ));
    }

    #[test]
    fn test_counter_value_out_of_range() {
        let mut generator = CommitmentGenerator::with_rng(StdRng::seed_from_u64(3));
        let die = selected(vec![1, 2, 3]);
        let mut exchange = begin_roll(&mut generator, &die.dice).unwrap();

        assert_eq!(
            finish_roll(Party::User, &die, &mut exchange, 3).unwrap_err(),
            GameError::OutOfRange { value: 3, bound: 3 }
        );
        // The exchange is still waiting for a valid value
        assert!(finish_roll(Party::User, &die, &mut exchange, 2).is_ok());
    }
}
