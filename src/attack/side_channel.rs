//! Per-key-bit timing side-channel test.
//!
//! For every key bit, encryption time under the key with that bit forced to 1
//! is compared against the key with the bit forced to 0, using a Welch-style
//! t-statistic over repeated measurements. Measurements share the CPU with
//! whatever else is scheduled, so small |t| values are expected noise.

use alloc::vec::Vec;

use rand::Rng;
use serde::Serialize;

use crate::cipher::{Algorithm, CipherEngine, Ntsa, Tea, BLOCK_LEN};
use crate::config::Config;
use crate::key::{Key, KEY_BITS};
use crate::stats;

use super::{resolve_seed, seeded_rng, time_us, Error};

/// More than this many significant bits is a HIGH vulnerability
pub const HIGH_THRESHOLD: usize = 10;

/// More than this many significant bits is a MODERATE vulnerability
pub const MODERATE_THRESHOLD: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Vulnerability {
    High,
    Moderate,
    Low,
}

/// Classify by the number of key bits with a significant timing difference
pub fn classify(significant_bits: usize) -> Vulnerability {
    if significant_bits > HIGH_THRESHOLD {
        Vulnerability::High
    } else if significant_bits > MODERATE_THRESHOLD {
        Vulnerability::Moderate
    } else {
        Vulnerability::Low
    }
}

/// Timing comparison for one key bit
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BitLeak {
    pub bit_position: usize,
    pub mean_set_us: f64,
    pub mean_clear_us: f64,
    pub timing_difference_us: f64,
    pub pooled_std_us: f64,
    pub t_statistic: f64,
    pub significant: bool,
    /// Per-repeat mean encryption time with the bit set
    pub samples_set_us: Vec<f64>,
    /// Per-repeat mean encryption time with the bit clear
    pub samples_clear_us: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SideChannelReport {
    pub algorithm: Algorithm,
    pub seed: u64,
    pub repeats: usize,
    pub inner_repeats: usize,
    pub bits_analyzed: usize,
    pub significant_bits: usize,
    pub vulnerability: Vulnerability,
    /// Bits ranked by |t|, largest first
    pub top_bits: Vec<BitLeak>,
    /// Every bit, in key order
    pub bits: Vec<BitLeak>,
}

/// Difference of means, pooled standard deviation, and t-statistic of two populations
///
/// `t = diff / (pooled_std / sqrt(n))` with `n` the size of the `set` population;
/// zero when the pooled deviation is zero.
pub fn t_statistic(set: &[f64], clear: &[f64]) -> (f64, f64, f64) {
    let diff = stats::mean(set) - stats::mean(clear);
    let pooled = libm::sqrt((stats::variance(set) + stats::variance(clear)) / 2.0);
    let t = stats::ratio(diff, pooled / libm::sqrt(set.len() as f64));

    (diff, pooled, t)
}

// Mean time of `inner` encryptions of `plaintext`
fn mean_time<E: CipherEngine>(engine: &E, plaintext: &[u8], inner: usize) -> Result<f64, Error> {
    let mut total = 0.0;
    for _ in 0..inner {
        let (res, us) = time_us(|| engine.encrypt(plaintext));
        res?;
        total += us;
    }
    Ok(stats::ratio(total, inner as f64))
}

fn analyze_bit<E: CipherEngine, R: Rng>(
    key: &Key,
    bit: usize,
    repeats: usize,
    inner: usize,
    threshold: f64,
    rng: &mut R,
) -> Result<BitLeak, Error> {
    let set = E::new(&key.with_bit(bit, true)?);
    let clear = E::new(&key.with_bit(bit, false)?);

    let mut samples_set_us = Vec::with_capacity(repeats);
    let mut samples_clear_us = Vec::with_capacity(repeats);
    let mut plaintext = [0_u8; BLOCK_LEN];

    for _ in 0..repeats {
        rng.fill_bytes(&mut plaintext);
        samples_set_us.push(mean_time(&set, &plaintext, inner)?);
        samples_clear_us.push(mean_time(&clear, &plaintext, inner)?);
    }

    let (diff, pooled, t) = t_statistic(&samples_set_us, &samples_clear_us);

    Ok(BitLeak {
        bit_position: bit,
        mean_set_us: stats::mean(&samples_set_us),
        mean_clear_us: stats::mean(&samples_clear_us),
        timing_difference_us: diff,
        pooled_std_us: pooled,
        t_statistic: t,
        significant: libm::fabs(t) > threshold,
        samples_set_us,
        samples_clear_us,
    })
}

/// Rank bits by |t| descending, ties kept in key order
pub fn rank(bits: &[BitLeak], top: usize) -> Vec<BitLeak> {
    let mut ranked = bits.to_vec();
    ranked.sort_by(|a, b| {
        libm::fabs(b.t_statistic)
            .partial_cmp(&libm::fabs(a.t_statistic))
            .unwrap_or(core::cmp::Ordering::Equal)
    });
    ranked.truncate(top);
    ranked
}

/// Run the per-bit timing test for one cipher
pub fn analyze<E: CipherEngine, R: Rng>(
    key: &Key,
    config: &Config,
    rng: &mut R,
    seed: u64,
) -> Result<SideChannelReport, Error> {
    config.validate()?;

    let (repeats, inner) = (config.side_channel_repeats, config.side_channel_inner_repeats);

    let mut bits = Vec::with_capacity(KEY_BITS);
    for bit in 0..KEY_BITS {
        let threshold = config.significance_threshold;
        bits.push(analyze_bit::<E, R>(key, bit, repeats, inner, threshold, rng)?);
    }

    let significant_bits = bits.iter().filter(|b| b.significant).count();
    let vulnerability = classify(significant_bits);

    tracing::debug!(algorithm = E::ALGORITHM.name(), significant_bits, "side-channel analysis");

    Ok(SideChannelReport {
        algorithm: E::ALGORITHM,
        seed,
        repeats,
        inner_repeats: inner,
        bits_analyzed: bits.len(),
        significant_bits,
        vulnerability,
        top_bits: rank(&bits, config.side_channel_top),
        bits,
    })
}

/// Per-bit timing test against TEA and NTSA
pub fn run(key: &Key, config: &Config) -> Result<Vec<SideChannelReport>, Error> {
    config.validate()?;

    let seed = resolve_seed(config.seed);

    Ok(alloc::vec![
        analyze::<Tea, _>(key, config, &mut seeded_rng(seed), seed)?,
        analyze::<Ntsa, _>(key, config, &mut seeded_rng(seed), seed)?,
    ])
}
