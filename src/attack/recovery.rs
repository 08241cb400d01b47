//! Sparse partial key search from one known plaintext block.
//!
//! The attacker is given words 1..3 of the key and the residue of word 0 modulo
//! the configured stride, and sweeps the remaining high bits of word 0. Every
//! candidate that maps the known plaintext block to the observed ciphertext
//! block is reported. Under TEA a hit is only known up to its equivalence
//! class, so the three equivalent keys of each TEA hit are listed too.

use alloc::string::String;
use alloc::vec::Vec;

use serde::Serialize;

use crate::cipher::{load_words, Algorithm, BlockEngine, Ntsa, Tea, BLOCK_LEN};
use crate::config::Config;
use crate::encoding::to_hex;
use crate::key::Key;
use crate::stats;

use super::{equivalent, time_us, Error};

/// Candidate key that reproduces the known ciphertext block
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecoveredKey {
    pub key: String,
    pub is_secret_key: bool,
    /// Keys producing identical ciphertext under TEA, empty for other ciphers
    pub equivalent_keys: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KeyRecoveryReport {
    pub algorithm: Algorithm,
    pub known_plaintext: String,
    pub known_ciphertext: String,
    pub stride: u32,
    /// Low bits of word 0 known to the attacker
    pub offset: u32,
    pub candidates_tested: u64,
    pub elapsed_seconds: f64,
    pub candidates_per_second: f64,
    pub matches: Vec<RecoveredKey>,
    pub recovered: bool,
}

/// Number of word-0 candidates swept for a stride, zero for a zero stride
pub fn candidate_count(stride: u32) -> u64 {
    (1_u64 << 32).checked_div(stride as u64).unwrap_or(0)
}

fn block_hex(block: (u32, u32)) -> String {
    let mut bytes = [0_u8; BLOCK_LEN];
    bytes[..4].copy_from_slice(&block.0.to_be_bytes());
    bytes[4..].copy_from_slice(&block.1.to_be_bytes());
    to_hex(&bytes)
}

/// Sweep word 0 of `secret` in steps of `stride` against the first block of `known_plaintext`
pub fn search<E: BlockEngine>(
    secret: &Key,
    known_plaintext: &[u8],
    stride: u32,
) -> Result<KeyRecoveryReport, Error> {
    if stride < 2 || !stride.is_power_of_two() {
        return Err(Error::InvalidConfig("key_recovery_stride must be a power of two >= 2"));
    }
    if known_plaintext.len() < BLOCK_LEN {
        return Err(Error::InsufficientPlaintext(known_plaintext.len()));
    }

    let (p0, p1) = load_words(&known_plaintext[..BLOCK_LEN]);
    let target = E::new(secret).encrypt_words(p0, p1);

    let secret_word = secret.words()[0];
    let offset = secret_word % stride;
    let candidates_tested = candidate_count(stride);

    let (hits, us) = time_us(|| -> Result<Vec<Key>, Error> {
        let mut hits = Vec::new();
        let mut word = offset;
        for _ in 0..candidates_tested {
            let candidate = secret.with_word(0, word)?;
            if E::new(&candidate).encrypt_words(p0, p1) == target {
                hits.push(candidate);
            }
            word = word.wrapping_add(stride);
        }
        Ok(hits)
    });
    let hits = hits?;

    let mut matches = Vec::with_capacity(hits.len());
    for hit in hits.iter() {
        let equivalent_keys = if E::ALGORITHM == Algorithm::Tea {
            equivalent::tea_equivalent_keys(hit)?.iter().map(Key::to_hex).collect()
        } else {
            Vec::new()
        };

        matches.push(RecoveredKey {
            key: hit.to_hex(),
            is_secret_key: hit == secret,
            equivalent_keys,
        });
    }

    let elapsed_seconds = us / 1_000_000.0;
    let recovered = matches.iter().any(|m| m.is_secret_key);

    tracing::debug!(
        algorithm = E::ALGORITHM.name(),
        candidates_tested,
        matches = matches.len(),
        recovered,
        "key recovery"
    );
    if !recovered {
        tracing::warn!(algorithm = E::ALGORITHM.name(), "secret key not among candidates");
    }

    Ok(KeyRecoveryReport {
        algorithm: E::ALGORITHM,
        known_plaintext: to_hex(&known_plaintext[..BLOCK_LEN]),
        known_ciphertext: block_hex(target),
        stride,
        offset,
        candidates_tested,
        elapsed_seconds,
        candidates_per_second: stats::ratio(candidates_tested as f64, elapsed_seconds),
        matches,
        recovered,
    })
}

/// Partial key recovery against TEA and NTSA
pub fn run(
    secret: &Key,
    known_plaintext: &[u8],
    config: &Config,
) -> Result<Vec<KeyRecoveryReport>, Error> {
    config.validate()?;

    let stride = config.key_recovery_stride;

    Ok(alloc::vec![
        search::<Tea>(secret, known_plaintext, stride)?,
        search::<Ntsa>(secret, known_plaintext, stride)?,
    ])
}
