//! Protocol messages.

use crate::crypto::{Commitment, Key};
use crate::fairness::ExchangeResult;
use crate::protocol::{GameOutcome, Purpose, SessionId, Side};
use serde::{Deserialize, Serialize};

/// Published when an exchange is committed: only the HMAC and the range
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitNotice {
    pub purpose: Purpose,
    pub range: u32,
    pub hmac: Commitment,
}

/// Published when an exchange is revealed, so the counterpart can check the HMAC
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealNotice {
    pub purpose: Purpose,
    pub range: u32,
    /// Program's committed number
    pub secret: u32,
    pub key: Key,
    pub counterpart_value: u32,
    /// (secret + counterpart_value) mod range
    pub result: u32,
}

impl RevealNotice {
    pub fn new(purpose: Purpose, exchange: &ExchangeResult) -> Self {
        Self {
            purpose,
            range: exchange.range,
            secret: exchange.secret,
            key: exchange.key.clone(),
            counterpart_value: exchange.counterpart_value,
            result: exchange.result,
        }
    }

    /// Check this reveal against the earlier commitment
    pub fn verify(&self, commit: &CommitNotice) -> bool {
        self.purpose == commit.purpose
            && self.range == commit.range
            && commit.hmac.verify(&self.key, self.secret)
    }
}

/// Everything the game reports to the counterpart while it runs
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum GameEvent {
    Started { session: SessionId, dice: usize },
    DecidingFirstMove,
    Committed(CommitNotice),
    Revealed(RevealNotice),
    FirstMoveDecided { first_mover: Side },
    DieChosen { side: Side, index: usize },
    RollStarted { roller: Side },
    Rolled { side: Side, face_index: u32, value: i64 },
    /// A numeric answer outside the offered choices; the request is repeated
    InvalidSelection { value: u32 },
    Finished(GameOutcome),
}
