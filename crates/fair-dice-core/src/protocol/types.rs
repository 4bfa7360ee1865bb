//! Protocol types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique session identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the two players
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The program running the commitments
    Program,
    /// The human at the terminal
    Counterpart,
}

impl Side {
    /// Get the opponent
    pub fn opponent(&self) -> Side {
        match self {
            Side::Program => Side::Counterpart,
            Side::Counterpart => Side::Program,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Program => write!(f, "program"),
            Side::Counterpart => write!(f, "counterpart"),
        }
    }
}

/// What a fair random exchange is deciding
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "side")]
pub enum Purpose {
    /// Who selects a die first
    FirstMove,
    /// Which face the given side rolls
    Roll(Side),
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Purpose::FirstMove => write!(f, "first move"),
            Purpose::Roll(side) => write!(f, "{} roll", side),
        }
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    ProgramWins,
    CounterpartWins,
    Tie,
}

impl GameResult {
    /// Human readable form
    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::ProgramWins => "program wins",
            GameResult::CounterpartWins => "counterpart wins",
            GameResult::Tie => "tie",
        }
    }

    /// The winning side, if any
    pub fn winner(&self) -> Option<Side> {
        match self {
            GameResult::ProgramWins => Some(Side::Program),
            GameResult::CounterpartWins => Some(Side::Counterpart),
            GameResult::Tie => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compare two rolls. The strictly greater roll wins; equal rolls tie.
pub fn resolve(program_roll: i64, counterpart_roll: i64) -> GameResult {
    match program_roll.cmp(&counterpart_roll) {
        std::cmp::Ordering::Greater => GameResult::ProgramWins,
        std::cmp::Ordering::Less => GameResult::CounterpartWins,
        std::cmp::Ordering::Equal => GameResult::Tie,
    }
}

/// Everything decided during one completed session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Side that selected its die first and rolled first
    pub first_mover: Side,
    /// Index of the program's die in the die set
    pub program_die: usize,
    /// Index of the counterpart's die in the die set
    pub counterpart_die: usize,
    pub program_roll: i64,
    pub counterpart_roll: i64,
    pub result: GameResult,
}
