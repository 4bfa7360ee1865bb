//! Offline check of a revealed commitment.

use fair_dice_core::{Commitment, CryptoError, Key};
use std::process::ExitCode;

/// Whether `hmac` is the commitment to `value` under `key`
pub fn check(key: &str, value: u32, hmac: &str) -> Result<bool, CryptoError> {
    let key = Key::from_hex(key)?;
    let hmac: Commitment = hmac.parse()?;
    Ok(hmac.verify(&key, value))
}

pub fn run(key: &str, value: u32, hmac: &str) -> ExitCode {
    match check(key, value, hmac) {
        Ok(true) => {
            println!("OK: HMAC matches value {} under the given key.", value);
            ExitCode::SUCCESS
        }
        Ok(false) => {
            println!("MISMATCH: HMAC does not match value {} under the given key.", value);
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
