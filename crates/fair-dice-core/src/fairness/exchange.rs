//! Commit, combine and reveal.

use crate::crypto::{Commitment, CryptoError, Key, SecretSource};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Errors from a fair exchange
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExchangeError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("Protocol violation: exchange must be {expected}, but is {found}")]
    ProtocolViolation {
        expected: ExchangeState,
        found: ExchangeState,
    },

    #[error("Counterpart value {value} is outside the range 0..{range}")]
    OutOfRange { value: u32, range: u32 },
}

/// Lifecycle of an exchange that has not been revealed yet.
///
/// Revealing consumes the exchange and yields an [`ExchangeResult`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeState {
    /// Only the HMAC is public
    Committed,
    /// The counterpart's number has been added in
    Combined,
}

impl fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeState::Committed => write!(f, "committed"),
            ExchangeState::Combined => write!(f, "combined"),
        }
    }
}

/// `(secret + counterpart_value) mod range`, computed without overflow.
///
/// `range` must be non-zero.
pub fn modular_sum(secret: u32, counterpart_value: u32, range: u32) -> u32 {
    ((u64::from(secret) + u64::from(counterpart_value)) % u64::from(range)) as u32
}

/// One fair random exchange over `0..range`
pub struct FairExchange {
    range: u32,
    key: Key,
    secret: u32,
    commitment: Commitment,
    state: ExchangeState,
    counterpart_value: Option<u32>,
    result: Option<u32>,
}

impl FairExchange {
    /// Draw a fresh key and secret and commit to them
    pub fn commit<S>(source: &mut S, range: u32) -> Result<Self, ExchangeError>
    where
        S: SecretSource + ?Sized,
    {
        let secret = source.secret(range)?;
        let key = source.key();
        Ok(Self::from_parts(range, key, secret))
    }

    /// Commit to a known key and secret
    pub fn from_parts(range: u32, key: Key, secret: u32) -> Self {
        let commitment = Commitment::new(&key, secret);
        debug!(range, hmac = %commitment, "exchange committed");
        Self {
            range,
            key,
            secret,
            commitment,
            state: ExchangeState::Committed,
            counterpart_value: None,
            result: None,
        }
    }

    /// The published HMAC
    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// Add the counterpart's number to the committed secret
    pub fn combine(&mut self, counterpart_value: u32) -> Result<u32, ExchangeError> {
        if self.state != ExchangeState::Committed {
            return Err(ExchangeError::ProtocolViolation {
                expected: ExchangeState::Committed,
                found: self.state,
            });
        }
        if counterpart_value >= self.range {
            return Err(ExchangeError::OutOfRange {
                value: counterpart_value,
                range: self.range,
            });
        }

        let result = modular_sum(self.secret, counterpart_value, self.range);
        self.counterpart_value = Some(counterpart_value);
        self.result = Some(result);
        self.state = ExchangeState::Combined;
        debug!(range = self.range, counterpart_value, result, "exchange combined");
        Ok(result)
    }

    /// Disclose the secret and key. Only valid once combined.
    pub fn reveal(self) -> Result<ExchangeResult, ExchangeError> {
        let (Some(counterpart_value), Some(result)) = (self.counterpart_value, self.result) else {
            return Err(ExchangeError::ProtocolViolation {
                expected: ExchangeState::Combined,
                found: self.state,
            });
        };
        debug!(range = self.range, secret = self.secret, "exchange revealed");
        Ok(ExchangeResult {
            range: self.range,
            secret: self.secret,
            counterpart_value,
            result,
            key: self.key,
            commitment: self.commitment,
        })
    }
}

impl fmt::Debug for FairExchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // secret and key stay hidden until reveal
        f.debug_struct("FairExchange")
            .field("range", &self.range)
            .field("commitment", &self.commitment)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// A revealed exchange
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeResult {
    pub range: u32,
    pub secret: u32,
    pub counterpart_value: u32,
    pub result: u32,
    pub key: Key,
    pub commitment: Commitment,
}

impl ExchangeResult {
    /// Recompute the HMAC from the revealed key and secret
    pub fn verify(&self) -> bool {
        self.commitment.verify(&self.key, self.secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{OsRandom, ScriptedSource};
    use proptest::prelude::*;

    #[test]
    fn test_full_exchange_verifies() {
        let mut exchange = FairExchange::commit(&mut OsRandom, 6).unwrap();
        let published = *exchange.commitment();

        let result = exchange.combine(2).unwrap();
        let revealed = exchange.reveal().unwrap();

        assert!(result < 6);
        assert_eq!(revealed.result, result);
        assert_eq!(revealed.commitment, published);
        assert!(revealed.verify());
    }

    #[test]
    fn test_known_combination() {
        let mut exchange = FairExchange::commit(&mut ScriptedSource::new([0]), 6).unwrap();

        assert_eq!(exchange.combine(2), Ok(2));
        assert_eq!(exchange.reveal().unwrap().secret, 0);
    }

    #[test]
    fn test_sum_wraps_around_range() {
        let mut exchange = FairExchange::commit(&mut ScriptedSource::new([4]), 6).unwrap();

        assert_eq!(exchange.combine(5), Ok(3));
    }

    #[test]
    fn test_reveal_before_combine_is_protocol_violation() {
        let exchange = FairExchange::commit(&mut OsRandom, 2).unwrap();

        assert_eq!(
            exchange.reveal().unwrap_err(),
            ExchangeError::ProtocolViolation {
                expected: ExchangeState::Combined,
                found: ExchangeState::Committed,
            }
        );
    }

    #[test]
    fn test_combine_twice_is_protocol_violation() {
        let mut exchange = FairExchange::commit(&mut OsRandom, 2).unwrap();
        exchange.combine(1).unwrap();

        assert_eq!(
            exchange.combine(0),
            Err(ExchangeError::ProtocolViolation {
                expected: ExchangeState::Committed,
                found: ExchangeState::Combined,
            })
        );
    }

    #[test]
    fn test_out_of_range_counterpart_value() {
        let mut exchange = FairExchange::commit(&mut OsRandom, 2).unwrap();

        assert_eq!(
            exchange.combine(2),
            Err(ExchangeError::OutOfRange { value: 2, range: 2 })
        );
        // still committed, a valid value is accepted afterwards
        assert_eq!(exchange.state(), ExchangeState::Committed);
        assert!(exchange.combine(1).is_ok());
    }

    #[test]
    fn test_zero_range_cannot_commit() {
        assert_eq!(
            FairExchange::commit(&mut OsRandom, 0).unwrap_err(),
            ExchangeError::Crypto(CryptoError::EmptyRange)
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let exchange = FairExchange::from_parts(6, Key::from_bytes([9; 32]), 5);
        let printed = format!("{:?}", exchange);

        assert!(!printed.contains("secret"));
        assert!(!printed.contains("key"));
    }

    #[test]
    fn test_fixed_secret_result_is_uniform_over_counterpart_values() {
        // every result appears exactly once as the counterpart value sweeps the range
        for range in 2..=12u32 {
            for secret in 0..range {
                let mut seen = vec![0u32; range as usize];
                for value in 0..range {
                    seen[modular_sum(secret, value, range) as usize] += 1;
                }
                assert!(seen.iter().all(|count| *count == 1));
            }
        }
    }

    proptest! {
        #[test]
        fn prop_result_in_range(secret in any::<u32>(), value in any::<u32>(), range in 1u32..=u32::MAX) {
            prop_assert!(modular_sum(secret, value, range) < range);
        }

        #[test]
        fn prop_result_is_sum_mod_range(range in 1u32..1_000, secret_seed in any::<u32>(), value_seed in any::<u32>()) {
            let secret = secret_seed % range;
            let value = value_seed % range;
            let mut exchange = FairExchange::from_parts(range, Key::from_bytes([1; 32]), secret);

            let result = exchange.combine(value).unwrap();

            prop_assert_eq!(result, (secret + value) % range);
            prop_assert!(exchange.reveal().unwrap().verify());
        }

        #[test]
        fn prop_sum_is_symmetric(range in 1u32..1_000, a in any::<u32>(), b in any::<u32>()) {
            prop_assert_eq!(modular_sum(a, b, range), modular_sum(b, a, range));
        }
    }
}
