//! Counterpart trait definition.

use crate::protocol::{CommitNotice, GameEvent, Side};
use async_trait::async_trait;

/// A question the game needs the counterpart to answer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    /// Contribute 0 or 1 to the first-move exchange
    GuessFirstMove { commitment: CommitNotice },
    /// Pick one of the listed die indices
    ChooseDie { candidates: Vec<usize> },
    /// Contribute a number in `0..commitment.range` to `roller`'s roll
    AddToRoll {
        roller: Side,
        commitment: CommitNotice,
    },
}

impl Request {
    /// Whether `value` is one of the choices this request offers
    pub fn accepts(&self, value: u32) -> bool {
        match self {
            Request::GuessFirstMove { commitment } | Request::AddToRoll { commitment, .. } => {
                value < commitment.range
            }
            Request::ChooseDie { candidates } => candidates
                .iter()
                .any(|index| u32::try_from(*index).map_or(false, |i| i == value)),
        }
    }
}

/// A counterpart's answer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reply {
    Number(u32),
    /// Leave the session immediately
    Abandon,
}

/// Trait for the counterpart side of a session
///
/// Implementations can be:
/// - ScriptedCounterpart for testing
/// - an interactive terminal prompt
///
/// `respond` may take as long as it likes; the game never times out. Answers
/// that `Request::accepts` rejects are reported back through
/// `GameEvent::InvalidSelection` and the same request is asked again.
#[async_trait]
pub trait Counterpart: Send {
    /// Answer a request
    async fn respond(&mut self, request: &Request) -> Reply;

    /// Receive a progress event
    fn observe(&mut self, event: &GameEvent);
}
