//! Fair Dice Core Library
//!
//! This crate provides the commit-reveal primitives, the fair random value
//! exchange, dice selection and win probabilities for a two-party game of
//! non-transitive dice where neither side can bias a roll.

pub mod crypto;
pub mod error;
pub mod games;
pub mod protocol;

pub use crypto::{verify, Commitment, CommitmentGenerator, Digest, SecretKey};
pub use error::{GameError, Result};
pub use games::{
    parse_dice_sets, Counterparty, DiceGame, DiceSet, GameSession, ProbabilityMatrix,
    RandomCounterparty,
};
pub use protocol::{FairRandomExchange, FairRandomResult, GameId, GameResult, Party};
