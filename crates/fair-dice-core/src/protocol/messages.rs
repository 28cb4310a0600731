//! Protocol messages published to the counter-party.

use super::exchange::{FairRandomExchange, FairRandomResult};
use crate::crypto::Digest;
use crate::protocol::{ExchangeStep, GameId};
use serde::{Deserialize, Serialize};

/// Published at commit time: the digest only
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMessage {
    pub game_id: GameId,
    pub step: ExchangeStep,
    pub bound: u32,
    pub digest: Digest,
}

impl CommitMessage {
    pub fn new(game_id: GameId, step: ExchangeStep, exchange: &FairRandomExchange) -> Self {
        Self {
            game_id,
            step,
            bound: exchange.bound(),
            digest: *exchange.digest(),
        }
    }

    /// Largest value the counter-party may supply
    pub fn max_value(&self) -> u32 {
        self.bound.saturating_sub(1)
    }
}

/// Published at reveal time: key, both values and the combination
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealMessage {
    pub game_id: GameId,
    pub step: ExchangeStep,
    #[serde(flatten)]
    pub result: FairRandomResult,
}

impl RevealMessage {
    pub fn new(game_id: GameId, step: ExchangeStep, result: FairRandomResult) -> Self {
        Self {
            game_id,
            step,
            result,
        }
    }

    /// Check this reveal against the digest published earlier
    pub fn matches(&self, commit: &CommitMessage) -> bool {
        self.game_id == commit.game_id
            && self.step == commit.step
            && self.result.bound == commit.bound
            && self.result.digest == commit.digest
            && self.result.verify()
    }
}
