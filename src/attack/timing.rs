use alloc::vec;
use alloc::vec::Vec;

use serde::Serialize;

use crate::cipher::{Aes128Cbc, Algorithm, CipherEngine, Ntsa, Tea};
use crate::config::Config;
use crate::key::Key;
use crate::stats::{self, ConfidenceInterval};

use super::{time_us, Error};

/// Per-call encryption timings for one algorithm
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimingProfile {
    pub algorithm: Algorithm,
    pub iterations: usize,
    pub average_time_us: f64,
    pub min_time_us: f64,
    pub max_time_us: f64,
    pub std_deviation_us: f64,
    pub variance_us: f64,
    /// std / mean, zero when the mean is zero
    pub coefficient_of_variation: f64,
    pub interval: ConfidenceInterval,
    pub samples_us: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimingReport {
    pub plaintext_len: usize,
    pub profiles: Vec<TimingProfile>,
}

/// Time `iterations` encryptions of the same plaintext
///
/// Timings include co-scheduled OS jitter, nothing is done to suppress it.
pub fn profile<E: CipherEngine>(
    engine: &E,
    plaintext: &[u8],
    iterations: usize,
    confidence: f64,
) -> Result<TimingProfile, Error> {
    let mut samples_us = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let (ciphertext, us) = time_us(|| engine.encrypt(plaintext));
        ciphertext?;
        samples_us.push(us);
    }

    let summary = stats::summarize(&samples_us, confidence);

    Ok(TimingProfile {
        algorithm: E::ALGORITHM,
        iterations,
        average_time_us: summary.mean,
        min_time_us: summary.min,
        max_time_us: summary.max,
        std_deviation_us: summary.std_dev,
        variance_us: summary.std_dev * summary.std_dev,
        coefficient_of_variation: stats::ratio(summary.std_dev, summary.mean),
        interval: summary.interval,
        samples_us,
    })
}

/// Profile TEA, NTSA and AES-128-CBC on the same plaintext
pub fn run(key: &Key, plaintext: &[u8], config: &Config) -> Result<TimingReport, Error> {
    config.validate()?;

    let iterations = config.timing_iterations;
    tracing::debug!(iterations, len = plaintext.len(), "timing profile");

    let profiles = vec![
        profile(&Tea::new(key), plaintext, iterations, config.confidence)?,
        profile(&Ntsa::new(key), plaintext, iterations, config.confidence)?,
        profile(&Aes128Cbc::new(key), plaintext, iterations, config.confidence)?,
    ];

    Ok(TimingReport {
        plaintext_len: plaintext.len(),
        profiles,
    })
}
