//! Sources of keys and secret numbers.

use super::{CryptoError, Key, KEY_LEN};
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use std::collections::VecDeque;

/// Where a committing party draws its key and secret number from.
///
/// Implementations can be:
/// - OsRandom for play (operating-system CSPRNG)
/// - ScriptedSource for tests and replays
pub trait SecretSource {
    /// Draw a fresh single-use key
    fn key(&mut self) -> Key;

    /// Draw a number uniformly from `0..range`
    fn secret(&mut self, range: u32) -> Result<u32, CryptoError>;
}

/// Operating-system CSPRNG
#[derive(Clone, Copy, Debug, Default)]
pub struct OsRandom;

impl SecretSource for OsRandom {
    fn key(&mut self) -> Key {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Key::from_bytes(bytes)
    }

    fn secret(&mut self, range: u32) -> Result<u32, CryptoError> {
        if range == 0 {
            return Err(CryptoError::EmptyRange);
        }
        // gen_range rejects samples from the biased tail of the source output
        Ok(OsRng.gen_range(0..range))
    }
}

/// Generate a fresh 32-byte key from the OS CSPRNG
pub fn generate_key() -> Key {
    OsRandom.key()
}

/// Generate a secret uniformly distributed in `0..range` from the OS CSPRNG
pub fn generate_secret(range: u32) -> Result<u32, CryptoError> {
    OsRandom.secret(range)
}

/// Replays a fixed list of secrets.
///
/// Keys are derived from a counter so every key is still distinct, but they are
/// predictable; never use this outside tests and replays.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    secrets: VecDeque<u32>,
    keys_issued: u64,
}

impl ScriptedSource {
    /// Create a source that yields `secrets` in order
    pub fn new(secrets: impl IntoIterator<Item = u32>) -> Self {
        Self {
            secrets: secrets.into_iter().collect(),
            keys_issued: 0,
        }
    }

    /// Number of secrets not yet drawn
    pub fn remaining(&self) -> usize {
        self.secrets.len()
    }
}

impl SecretSource for ScriptedSource {
    fn key(&mut self) -> Key {
        let mut bytes = [0u8; KEY_LEN];
        bytes[..8].copy_from_slice(&self.keys_issued.to_le_bytes());
        self.keys_issued += 1;
        Key::from_bytes(bytes)
    }

    fn secret(&mut self, range: u32) -> Result<u32, CryptoError> {
        if range == 0 {
            return Err(CryptoError::EmptyRange);
        }
        let value = self.secrets.pop_front().ok_or(CryptoError::SourceExhausted)?;
        if value >= range {
            return Err(CryptoError::ScriptOutOfRange { value, range });
        }
        Ok(value)
    }
}
