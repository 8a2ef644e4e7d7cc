//! Injectable randomness
//!
//! Key generation and IV generation draw from a [`RandomSource`] handed to them
//! by the caller instead of reaching for a global RNG. Production code passes an
//! [`OsRandomSource`]; tests pass a [`SeededRandomSource`] to get reproducible
//! keys and IVs.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Errors raised by a random source
#[derive(Debug, thiserror::Error)]
pub enum RandomError {
    #[error("random source unavailable: {0}")]
    Unavailable(String),
}

/// A cryptographically secure source of random bytes
pub trait RandomSource: Send + Sync {
    /// Fill `dest` entirely with random bytes, or fail without a partial guarantee
    fn try_fill_bytes(&self, dest: &mut [u8]) -> Result<(), RandomError>;
}

/// Operating system entropy (production use)
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandomSource;

impl OsRandomSource {
    pub fn new() -> Self {
        OsRandomSource
    }
}

impl RandomSource for OsRandomSource {
    fn try_fill_bytes(&self, dest: &mut [u8]) -> Result<(), RandomError> {
        getrandom::getrandom(dest).map_err(|e| RandomError::Unavailable(e.to_string()))
    }
}

/// Seeded deterministic source for tests and reproducible demos
///
/// Not suitable for protecting real data: anyone who knows the seed knows
/// every key and IV it produces.
#[derive(Debug)]
pub struct SeededRandomSource {
    rng: Mutex<StdRng>,
}

impl SeededRandomSource {
    pub fn new(seed: u64) -> Self {
        SeededRandomSource {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandomSource {
    fn try_fill_bytes(&self, dest: &mut [u8]) -> Result<(), RandomError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| RandomError::Unavailable(format!("lock poisoned: {}", e)))?;
        rng.fill_bytes(dest);
        Ok(())
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &R {
    fn try_fill_bytes(&self, dest: &mut [u8]) -> Result<(), RandomError> {
        (**self).try_fill_bytes(dest)
    }
}
