//! Fair Dice Core Library
//!
//! This crate provides the commit-reveal primitives, the two-party fair random
//! exchange, and the selection state machine for a non-transitive dice game
//! in which every random choice the program makes can be checked by the
//! human afterwards.

pub mod counterpart;
pub mod crypto;
pub mod fairness;
pub mod games;
pub mod protocol;

pub use counterpart::{Counterpart, Reply, Request, ScriptedCounterpart};
pub use crypto::{Commitment, CryptoError, Key, OsRandom, ScriptedSource, SecretSource};
pub use fairness::{ExchangeError, ExchangeResult, FairExchange};
pub use games::{DiceError, Die, DieSet, Game, GameError, ProbabilityTable, SessionEnd};
pub use protocol::{
    CommitNotice, GameEvent, GameOutcome, GameResult, Purpose, RevealNotice, SessionId, Side,
};
