//! Empirical search for single-block differential characteristics.
//!
//! Every sampled block is paired with itself XORed by each input difference,
//! both are encrypted, and the `(input, output)` difference pair is counted.
//! A good cipher spreads each input difference over ~2^64 outputs, so any
//! output difference seen more than once in a few thousand samples is a
//! candidate characteristic.

use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;
use rand::Rng;
use serde::Serialize;

use crate::cipher::{Algorithm, BlockEngine, CipherEngine, Ntsa, Tea};
use crate::config::Config;
use crate::key::Key;
use crate::stats;

use super::{resolve_seed, seeded_rng, Error};

/// XOR difference between two blocks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Difference {
    pub v0: u32,
    pub v1: u32,
}

impl Difference {
    pub const fn new(v0: u32, v1: u32) -> Self {
        Self { v0, v1 }
    }

    pub fn of(left: (u32, u32), right: (u32, u32)) -> Self {
        Self::new(left.0 ^ right.0, left.1 ^ right.1)
    }

    pub fn apply(&self, block: (u32, u32)) -> (u32, u32) {
        (block.0 ^ self.v0, block.1 ^ self.v1)
    }
}

/// Input differences tried against every sampled block
pub const INPUT_DIFFERENCES: [Difference; 5] = [
    // MSB of v0 only
    Difference::new(0x8000_0000, 0),
    // MSB of v1 only
    Difference::new(0, 0x8000_0000),
    // MSB of both halves
    Difference::new(0x8000_0000, 0x8000_0000),
    // LSB of v0 only
    Difference::new(0x0000_0001, 0),
    // every bit of v0
    Difference::new(0xffff_ffff, 0),
];

/// Probability of a fixed output difference under a random 64-bit permutation
pub const RANDOM_BASELINE: f64 = 1.0 / 18_446_744_073_709_551_616.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Characteristic {
    pub input_difference: Difference,
    pub output_difference: Difference,
    pub count: usize,
    /// count / samples processed, as of the last time this pair was observed
    pub running_probability: f64,
    /// count / total samples
    pub probability: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DifferentialReport {
    pub algorithm: Algorithm,
    pub seed: u64,
    pub samples: usize,
    pub pairs_encrypted: usize,
    pub distinct_characteristics: usize,
    pub top_characteristics: Vec<Characteristic>,
    pub max_probability: f64,
    pub mean_probability: f64,
    pub std_probability: f64,
    pub random_baseline: f64,
}

/// Frequency table over (input, output) differences, iterable in first-seen order
#[derive(Default)]
struct FrequencyTable {
    index: HashMap<(Difference, Difference), usize>,
    entries: Vec<Characteristic>,
}

impl FrequencyTable {
    fn observe(&mut self, input: Difference, output: Difference, processed: usize) {
        let entries = &mut self.entries;
        let idx = *self.index.entry((input, output)).or_insert_with(|| {
            entries.push(Characteristic {
                input_difference: input,
                output_difference: output,
                count: 0,
                running_probability: 0.0,
                probability: 0.0,
            });
            entries.len() - 1
        });

        let entry = &mut self.entries[idx];
        entry.count += 1;
        entry.running_probability = entry.count as f64 / processed as f64;
    }

    /// Entries ranked by count, ties kept in first-seen order
    fn ranked(mut self, samples: usize) -> Vec<Characteristic> {
        for entry in self.entries.iter_mut() {
            entry.probability = stats::ratio(entry.count as f64, samples as f64);
        }
        self.entries.sort_by(|a, b| b.count.cmp(&a.count));
        self.entries
    }
}

/// Sample `samples` random blocks and count differential characteristics
pub fn search<E: BlockEngine, R: Rng>(
    engine: &E,
    samples: usize,
    top: usize,
    rng: &mut R,
    seed: u64,
) -> DifferentialReport {
    let mut table = FrequencyTable::default();

    for i in 0..samples {
        let block = (rng.gen::<u32>(), rng.gen::<u32>());
        let base = engine.encrypt_words(block.0, block.1);

        for input in INPUT_DIFFERENCES.iter() {
            let (p0, p1) = input.apply(block);
            let paired = engine.encrypt_words(p0, p1);
            table.observe(*input, Difference::of(base, paired), i + 1);
        }
    }

    let ranked = table.ranked(samples);
    let probabilities: Vec<f64> = ranked.iter().map(|c| c.probability).collect();
    let summary = stats::summarize(&probabilities, 0.95);

    DifferentialReport {
        algorithm: E::ALGORITHM,
        seed,
        samples,
        pairs_encrypted: samples * INPUT_DIFFERENCES.len(),
        distinct_characteristics: ranked.len(),
        max_probability: summary.max,
        mean_probability: summary.mean,
        std_probability: summary.std_dev,
        random_baseline: RANDOM_BASELINE,
        top_characteristics: ranked.into_iter().take(top).collect(),
    }
}

/// Differential search against TEA and NTSA under `key`
///
/// Both ciphers see the same sampled blocks.
pub fn run(key: &Key, config: &Config) -> Result<Vec<DifferentialReport>, Error> {
    config.validate()?;

    let seed = resolve_seed(config.seed);
    let (samples, top) = (config.differential_samples, config.differential_top);
    tracing::debug!(seed, samples, "differential search");

    Ok(vec![
        search(&Tea::new(key), samples, top, &mut seeded_rng(seed), seed),
        search(&Ntsa::new(key), samples, top, &mut seeded_rng(seed), seed),
    ])
}
