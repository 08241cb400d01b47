use alloc::vec;
use alloc::vec::Vec;

use serde::Serialize;

use crate::cipher::{Aes128Cbc, Algorithm, CipherEngine, Ntsa, Tea};
use crate::config::Config;
use crate::key::{Key, KEY_BITS};
use crate::stats;

use super::{time_us, Error};

/// Plaintext encrypted under every candidate key
pub const BRUTE_FORCE_PLAINTEXT: &[u8] = b"Test message for brute force";

/// Seconds in a Julian year
pub const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0;

/// Measured search rate extrapolated to the full key space
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BruteForceEstimate {
    pub algorithm: Algorithm,
    pub iterations: usize,
    pub elapsed_seconds: f64,
    pub attempts_per_second: f64,
    pub key_space_bits: usize,
    pub total_key_space: f64,
    pub seconds_to_exhaust: f64,
    pub years_to_exhaust: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BruteForceReport {
    pub estimates: Vec<BruteForceEstimate>,
}

/// Size of the 128-bit key space, 2^128
pub fn key_space() -> f64 {
    (1_u128 << (KEY_BITS - 1)) as f64 * 2.0
}

/// Extrapolate exhaustion time from `iterations` attempts in `elapsed_seconds`
///
/// Rates and times default to zero when the measurement is too short to divide by.
pub fn extrapolate(
    algorithm: Algorithm,
    iterations: usize,
    elapsed_seconds: f64,
) -> BruteForceEstimate {
    let attempts_per_second = stats::ratio(iterations as f64, elapsed_seconds);
    let seconds_to_exhaust = stats::ratio(key_space(), attempts_per_second);

    BruteForceEstimate {
        algorithm,
        iterations,
        elapsed_seconds,
        attempts_per_second,
        key_space_bits: KEY_BITS,
        total_key_space: key_space(),
        seconds_to_exhaust,
        years_to_exhaust: seconds_to_exhaust / SECONDS_PER_YEAR,
    }
}

/// Encrypt the fixed plaintext under keys 0, 1, 2, ... and time the whole run
pub fn estimate<E: CipherEngine>(iterations: usize) -> Result<BruteForceEstimate, Error> {
    let (res, us) = time_us(|| -> Result<(), Error> {
        for i in 0..iterations {
            let engine = E::new(&Key::from_u128(i as u128));
            engine.encrypt(BRUTE_FORCE_PLAINTEXT)?;
        }
        Ok(())
    });
    res?;

    Ok(extrapolate(E::ALGORITHM, iterations, us / 1_000_000.0))
}

/// Estimate exhaustive search time for TEA, NTSA and AES-128-CBC
///
/// `key` is the key under study. The search enumerates keys from zero and never uses it.
pub fn run(key: &Key, config: &Config) -> Result<BruteForceReport, Error> {
    config.validate()?;

    let iterations = config.brute_force_iterations;
    tracing::debug!(key = %key.to_hex(), iterations, "brute-force estimate");

    Ok(BruteForceReport {
        estimates: vec![
            estimate::<Tea>(iterations)?,
            estimate::<Ntsa>(iterations)?,
            estimate::<Aes128Cbc>(iterations)?,
        ],
    })
}
