//! Protocol types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique game identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(Uuid);

impl GameId {
    /// Create a new random game ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for GameId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Debug for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameId({})", self.0)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One side of the game.
///
/// The computer always commits; the user always supplies the counter value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    Computer,
    User,
}

impl Party {
    /// Get the opponent
    pub fn opponent(&self) -> Party {
        match self {
            Party::Computer => Party::User,
            Party::User => Party::Computer,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Computer => write!(f, "computer"),
            Party::User => write!(f, "user"),
        }
    }
}

/// Which exchange of a game a message belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeStep {
    FirstMove,
    Roll(Party),
}

impl fmt::Display for ExchangeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeStep::FirstMove => write!(f, "first move"),
            ExchangeStep::Roll(party) => write!(f, "{} roll", party),
        }
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    ComputerWins,
    UserWins,
    Draw,
}

impl GameResult {
    /// Compare the two rolled faces
    pub fn judge(computer_face: i64, user_face: i64) -> Self {
        match user_face.cmp(&computer_face) {
            std::cmp::Ordering::Greater => GameResult::UserWins,
            std::cmp::Ordering::Less => GameResult::ComputerWins,
            std::cmp::Ordering::Equal => GameResult::Draw,
        }
    }

    /// The winning party, if any
    pub fn winner(&self) -> Option<Party> {
        match self {
            GameResult::ComputerWins => Some(Party::Computer),
            GameResult::UserWins => Some(Party::User),
            GameResult::Draw => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::ComputerWins => "Computer wins",
            GameResult::UserWins => "User wins",
            GameResult::Draw => "Draw",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
