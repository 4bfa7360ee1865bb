//! Game definitions and logic.

mod dice;
mod game;
mod probability;

pub use dice::{DiceError, Die, DieSet, MIN_DICE, MIN_FACES};
pub use game::{Game, GameError, SessionEnd};
pub use probability::{win_probability, ProbabilityTable};
