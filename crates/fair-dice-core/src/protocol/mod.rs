//! Protocol types and messages.

mod messages;
mod types;

pub use messages::{CommitNotice, GameEvent, RevealNotice};
pub use types::{resolve, GameOutcome, GameResult, Purpose, SessionId, Side};
