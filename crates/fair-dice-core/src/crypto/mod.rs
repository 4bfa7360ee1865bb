//! Cryptographic primitives for the fair dice protocol.
//!
//! This module provides:
//! - Key and Commitment for the HMAC commit-reveal scheme
//! - SecretSource for drawing keys and secret numbers from a CSPRNG

mod commitment;
mod error;
mod source;

pub use commitment::{Commitment, Key, KEY_LEN};
pub use error::CryptoError;
pub use source::{generate_key, generate_secret, OsRandom, ScriptedSource, SecretSource};
