use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};

use crate::{cipher, key};

/// Module comparing ciphertexts under TEA's equivalent keys and NTSA's perturbed keys
pub mod equivalent;

/// Module scoring ciphertext correlation under additively related keys
pub mod related;

/// Module measuring plaintext bit-flip diffusion
pub mod avalanche;

/// Module profiling single-plaintext encryption time
pub mod timing;

/// Module extrapolating exhaustive key search time
pub mod brute_force;

/// Module sampling single-block differential characteristics
pub mod differential;

/// Module testing per-key-bit timing differences
pub mod side_channel;

/// Module demonstrating a sparse partial key search from known plaintext
pub mod recovery;

/// Module describing the structure of each cipher
pub mod structure;

/// Errors surfaced by an analysis run
///
/// A failed analysis is reported as-is, nothing is retried.
#[derive(Debug)]
pub enum Error {
    Key(key::Error),
    Cipher(cipher::Error),
    InsufficientPlaintext(usize),
    InvalidConfig(&'static str),
}

impl From<key::Error> for Error {
    fn from(e: key::Error) -> Self {
        Error::Key(e)
    }
}

impl From<cipher::Error> for Error {
    fn from(e: cipher::Error) -> Self {
        Error::Cipher(e)
    }
}

/// Seed for sampled plaintexts, drawn from the thread RNG when not configured
///
/// Reports carry the seed so a run can be replayed.
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| thread_rng().gen())
}

pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Wall-clock duration of `f` in microseconds
pub(crate) fn time_us<T, F: FnOnce() -> T>(f: F) -> (T, f64) {
    let start = std::time::Instant::now();
    let out = core::hint::black_box(f());
    let elapsed = start.elapsed();

    (out, elapsed.as_nanos() as f64 / 1_000.0)
}
