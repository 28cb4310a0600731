//! One complete game: first move, dice selection, two rolls, result.

use super::dice::{DiceSet, MIN_DICE_SETS};
use super::probability::ProbabilityMatrix;
use super::roll::{begin_roll, finish_roll, DiceRoll};
use super::selection::{
    decide_first_mover, Assignment, DiceSelection, FirstMoveDecision, SelectedDice,
    FIRST_MOVE_BOUND,
};
use super::traits::Counterparty;
use crate::crypto::CommitmentGenerator;
use crate::error::{GameError, Result};
use crate::protocol::{
    CommitMessage, ExchangeStep, FairRandomExchange, GameId, GameResult, Party, RevealMessage,
};
use rand::rngs::ThreadRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Everything published during one game, in order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub game_id: GameId,
    pub first_move: FirstMoveDecision,
    pub assignment: Assignment,
    pub computer_roll: DiceRoll,
    pub user_roll: DiceRoll,
    pub result: GameResult,
}

impl GameSession {
    /// Recheck the whole transcript: every revealed exchange, the move order
    /// it implies, the faces read from the assigned dice and the verdict.
    pub fn verify(&self) -> bool {
        self.first_move_holds()
            && self.assignment.computer.index != self.assignment.user.index
            && roll_holds(&self.computer_roll, Party::Computer, &self.assignment.computer)
            && roll_holds(&self.user_roll, Party::User, &self.assignment.user)
            && self.result == GameResult::judge(self.computer_roll.face, self.user_roll.face)
    }

    fn first_move_holds(&self) -> bool {
        let decision = &self.first_move;
        let expected = if decision.guess == decision.result.party_value {
            Party::User
        } else {
            Party::Computer
        };
        decision.result.bound == FIRST_MOVE_BOUND
            && decision.result.counter_value == decision.guess
            && decision.first_mover == expected
            && decision.result.verify()
    }
}

fn roll_holds(roll: &DiceRoll, party: Party, selected: &SelectedDice) -> bool {
    roll.party == party
        && roll.dice_index == selected.index
        && roll.result.bound as usize == selected.dice.len()
        && selected.dice.face(roll.result.combined as usize) == Some(roll.face)
        && roll.result.verify()
}

/// Ask the counter-party until an answer is accepted or it gives up.
fn ask<C: Counterparty, T>(
    counterparty: &mut C,
    mut attempt: impl FnMut(&mut C) -> Result<T>,
) -> Result<T> {
    loop {
        match attempt(counterparty) {
            Ok(value) => return Ok(value),
            Err(error) if error.is_recoverable() => {
                warn!(%error, "Counter-party answer rejected");
                counterparty.on_rejected(&error)?;
            }
            Err(error) => return Err(error),
        }
    }
}

/// Runs games over a fixed list of dice sets.
///
/// The computer is the committing party in every exchange.
pub struct DiceGame<R = ThreadRng> {
    sets: Vec<DiceSet>,
    generator: CommitmentGenerator<R>,
}

impl DiceGame<ThreadRng> {
    pub fn new(sets: Vec<DiceSet>) -> Result<Self> {
        Self::with_generator(sets, CommitmentGenerator::new())
    }
}

impl<R: RngCore + CryptoRng> DiceGame<R> {
    pub fn with_generator(sets: Vec<DiceSet>, generator: CommitmentGenerator<R>) -> Result<Self> {
        if sets.len() < MIN_DICE_SETS {
            return Err(GameError::TooFewDiceSets(sets.len()));
        }
        Ok(Self { sets, generator })
    }

    pub fn sets(&self) -> &[DiceSet] {
        &self.sets
    }

    pub fn probabilities(&self) -> ProbabilityMatrix {
        ProbabilityMatrix::compute(&self.sets)
    }

    /// Play one game against `counterparty`
    pub fn play<C: Counterparty>(&mut self, counterparty: &mut C) -> Result<GameSession> {
        let game_id = GameId::new();
        info!(%game_id, dice_sets = self.sets.len(), "Game started");

        let first_move = self.decide_first_move(game_id, counterparty)?;
        let assignment = self.select_dice(first_move.first_mover, counterparty)?;

        let computer_roll =
            self.roll(game_id, Party::Computer, &assignment.computer, counterparty)?;
        let user_roll = self.roll(game_id, Party::User, &assignment.user, counterparty)?;

        let result = GameResult::judge(computer_roll.face, user_roll.face);
        info!(
            %game_id,
            %result,
            computer = computer_roll.face,
            user = user_roll.face,
            "Game finished"
        );

        Ok(GameSession {
            game_id,
            first_move,
            assignment,
            computer_roll,
            user_roll,
            result,
        })
    }

    fn decide_first_move<C: Counterparty>(
        &mut self,
        game_id: GameId,
        counterparty: &mut C,
    ) -> Result<FirstMoveDecision> {
        let step = ExchangeStep::FirstMove;
        let mut exchange = FairRandomExchange::begin(&mut self.generator, FIRST_MOVE_BOUND)?;
        let commit = CommitMessage::new(game_id, step, &exchange);

        let decision = ask(counterparty, |counterparty| {
            let guess = counterparty.guess_first_move(&commit)?;
            decide_first_mover(&mut exchange, guess)
        })?;

        counterparty.observe_reveal(&RevealMessage::new(game_id, step, decision.result.clone()));
        counterparty.observe_first_move(&decision);
        Ok(decision)
    }

    fn select_dice<C: Counterparty>(
        &mut self,
        first_mover: Party,
        counterparty: &mut C,
    ) -> Result<Assignment> {
        let mut selection = DiceSelection::new(&self.sets, first_mover)?;

        while let Some(party) = selection.next_to_pick() {
            let available = selection.available();
            let index = match party {
                // Moving first the computer picks at random, second it takes
                // the lowest remaining index.
                Party::Computer if party == first_mover => {
                    let slot = self.generator.draw(available.len() as u32)?;
                    available[slot as usize]
                }
                Party::Computer => *available
                    .first()
                    .ok_or(GameError::ProtocolViolation("no dice left to pick"))?,
                Party::User => ask(counterparty, |counterparty| {
                    let index = counterparty.pick_dice(&self.sets, &available)?;
                    selection.select(Party::User, index)?;
                    Ok(index)
                })?,
            };
            if party == Party::Computer {
                selection.select(Party::Computer, index)?;
            }
            counterparty.observe_pick(
                party,
                &SelectedDice {
                    index,
                    dice: self.sets[index].clone(),
                },
            );
        }

        selection.finish()
    }

    fn roll<C: Counterparty>(
        &mut self,
        game_id: GameId,
        party: Party,
        selected: &SelectedDice,
        counterparty: &mut C,
    ) -> Result<DiceRoll> {
        let step = ExchangeStep::Roll(party);
        let mut exchange = begin_roll(&mut self.generator, &selected.dice)?;
        let commit = CommitMessage::new(game_id, step, &exchange);

        let roll = ask(counterparty, |counterparty| {
            let value = counterparty.add_value(&commit)?;
            finish_roll(party, selected, &mut exchange, value)
        })?;

        counterparty.observe_reveal(&RevealMessage::new(game_id, step, roll.result.clone()));
        counterparty.observe_roll(&roll);
        Ok(roll)
    }
}
