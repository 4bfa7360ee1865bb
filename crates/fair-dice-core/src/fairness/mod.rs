//! Two-party fair random number generation.
//!
//! The program commits to a secret number before the counterpart picks its
//! own; the result is their sum modulo the range, and the key is revealed
//! afterwards so the commitment can be checked.

mod exchange;

pub use exchange::{modular_sum, ExchangeError, ExchangeResult, ExchangeState, FairExchange};
