//! The other player, as seen by the game.

mod mock;
mod traits;

pub use mock::ScriptedCounterpart;
pub use traits::{Counterpart, Reply, Request};
