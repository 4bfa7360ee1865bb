//! Errors from cryptographic operations.

use thiserror::Error;

/// Errors from key handling and secret generation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Secret range must be greater than zero")]
    EmptyRange,

    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Expected {expected} bytes, got {found}")]
    InvalidLength { expected: usize, found: usize },

    #[error("Scripted secret source exhausted")]
    SourceExhausted,

    #[error("Scripted secret {value} is outside the range 0..{range}")]
    ScriptOutOfRange { value: u32, range: u32 },
}
