//! Protocol types, the fair random exchange and its messages.

mod exchange;
mod messages;
mod types;

pub use exchange::{combine, ExchangeState, FairRandomExchange, FairRandomResult};
pub use messages::{CommitMessage, RevealMessage};
pub use types::{ExchangeStep, GameId, GameResult, Party};
