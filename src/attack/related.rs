use alloc::string::String;
use alloc::vec::Vec;

use serde::Serialize;

use crate::bytes::xor_weight;
use crate::cipher::{CipherEngine, Ntsa, Tea};
use crate::encoding::to_hex;
use crate::key::Key;
use crate::stats;

use super::Error;

/// Deltas added (mod 2^32) to TEA key word 0
pub const TEA_WORD_DELTAS: [u32; 4] = [0x0000_0001, 0x0001_0000, 0x0100_0000, 0x1000_0000];

/// Deltas added (mod 256) to NTSA key byte 0
pub const NTSA_BYTE_DELTAS: [u8; 4] = [0x01, 0x02, 0x10, 0x80];

/// Ciphertext correlation under one related key
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RelatedKeyTrial {
    pub delta: u32,
    pub key: String,
    pub ciphertext: String,
    /// Sum of Hamming weights of the XOR of aligned ciphertext bytes; lower is more related
    pub correlation: u64,
    /// Correlation divided by the number of bits compared (0.5 for unrelated outputs)
    pub normalized: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RelatedKeyReport {
    pub base_key: String,
    pub tea_base_ciphertext: String,
    pub tea: Vec<RelatedKeyTrial>,
    pub tea_mean_normalized: f64,
    pub ntsa_base_ciphertext: String,
    pub ntsa: Vec<RelatedKeyTrial>,
    pub ntsa_mean_normalized: f64,
}

/// Correlation score between two ciphertexts
pub fn correlation(left: &[u8], right: &[u8]) -> u64 {
    xor_weight(left, right)
}

fn trial<E: CipherEngine>(
    base_ciphertext: &[u8],
    related: Key,
    delta: u32,
    plaintext: &[u8],
) -> Result<RelatedKeyTrial, Error> {
    let ciphertext = E::new(&related).encrypt(plaintext)?;
    let correlation = correlation(base_ciphertext, &ciphertext);
    let bits = core::cmp::min(base_ciphertext.len(), ciphertext.len()) as f64 * 8.0;

    Ok(RelatedKeyTrial {
        delta,
        key: related.to_hex(),
        ciphertext: to_hex(&ciphertext),
        correlation,
        normalized: stats::ratio(correlation as f64, bits),
    })
}

fn mean_normalized(trials: &[RelatedKeyTrial]) -> f64 {
    let normalized: Vec<f64> = trials.iter().map(|t| t.normalized).collect();
    stats::mean(&normalized)
}

/// Encrypt `plaintext` under the base key and each related key, scoring output correlation
pub fn run(key: &Key, plaintext: &[u8]) -> Result<RelatedKeyReport, Error> {
    tracing::debug!(key = %key.to_hex(), len = plaintext.len(), "related-key analysis");

    let tea_base = Tea::new(key).encrypt(plaintext)?;
    let mut tea = Vec::with_capacity(TEA_WORD_DELTAS.len());
    for &delta in TEA_WORD_DELTAS.iter() {
        tea.push(trial::<Tea>(&tea_base, key.with_word_added(0, delta)?, delta, plaintext)?);
    }

    let ntsa_base = Ntsa::new(key).encrypt(plaintext)?;
    let mut ntsa = Vec::with_capacity(NTSA_BYTE_DELTAS.len());
    for &delta in NTSA_BYTE_DELTAS.iter() {
        let related = key.with_byte_added(0, delta)?;
        ntsa.push(trial::<Ntsa>(&ntsa_base, related, delta as u32, plaintext)?);
    }

    Ok(RelatedKeyReport {
        base_key: key.to_hex(),
        tea_base_ciphertext: to_hex(&tea_base),
        tea_mean_normalized: mean_normalized(&tea),
        tea,
        ntsa_base_ciphertext: to_hex(&ntsa_base),
        ntsa_mean_normalized: mean_normalized(&ntsa),
        ntsa,
    })
}
