use alloc::vec::Vec;

use serde::Serialize;

use crate::bytes::changed_bits;
use crate::cipher::{Algorithm, CipherEngine, Ntsa, Tea};
use crate::key::Key;
use crate::stats;

use super::Error;

/// Leading plaintext bits flipped per measurement
pub const MAX_FLIPPED_BITS: usize = 8;

/// Ideal fraction of output bits changed by a one-bit input change
pub const IDEAL_PERCENTAGE: f64 = 50.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BitFlip {
    pub bit_position: usize,
    pub changed_bits: u64,
    pub total_bits: u64,
    pub avalanche_percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AvalancheProfile {
    pub algorithm: Algorithm,
    pub flips: Vec<BitFlip>,
    pub mean_percentage: f64,
    /// Mean distance from the ideal 50%
    pub mean_deviation: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AvalancheReport {
    pub tea: AvalancheProfile,
    pub ntsa: AvalancheProfile,
}

/// Flip plaintext bit `pos`: byte `pos / 8`, mask `1 << (pos % 8)`
pub fn flip_bit(plaintext: &[u8], pos: usize) -> Vec<u8> {
    let mut flipped = plaintext.to_vec();
    flipped[pos / 8] ^= 1 << (pos % 8);
    flipped
}

/// Flip each of the leading plaintext bits and measure the fraction of ciphertext bits changed
pub fn measure<E: CipherEngine>(engine: &E, plaintext: &[u8]) -> Result<AvalancheProfile, Error> {
    let base = engine.encrypt(plaintext)?;
    let bits = core::cmp::min(MAX_FLIPPED_BITS, plaintext.len() * 8);

    let mut flips = Vec::with_capacity(bits);
    for pos in 0..bits {
        let ciphertext = engine.encrypt(&flip_bit(plaintext, pos))?;
        let (changed, total) = changed_bits(&base, &ciphertext);

        flips.push(BitFlip {
            bit_position: pos,
            changed_bits: changed,
            total_bits: total,
            avalanche_percentage: stats::ratio(changed as f64, total as f64) * 100.0,
        });
    }

    let percentages: Vec<f64> = flips.iter().map(|f| f.avalanche_percentage).collect();
    let deviations: Vec<f64> =
        percentages.iter().map(|p| libm::fabs(p - IDEAL_PERCENTAGE)).collect();

    Ok(AvalancheProfile {
        algorithm: E::ALGORITHM,
        flips,
        mean_percentage: stats::mean(&percentages),
        mean_deviation: stats::mean(&deviations),
    })
}

/// Measure diffusion of TEA and NTSA under `key`
pub fn run(key: &Key, plaintext: &[u8]) -> Result<AvalancheReport, Error> {
    tracing::debug!(len = plaintext.len(), "avalanche analysis");

    Ok(AvalancheReport {
        tea: measure(&Tea::new(key), plaintext)?,
        ntsa: measure(&Ntsa::new(key), plaintext)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_flip_bit() {
        assert_eq!(flip_bit(&[0x00, 0x00], 0), [0x01_u8, 0x00]);
        assert_eq!(flip_bit(&[0x00, 0x00], 7), [0x80_u8, 0x00]);
        assert_eq!(flip_bit(&[0x00, 0x00], 9), [0x00_u8, 0x02]);
    }

    #[test]
    fn check_avalanche() {
        let key = Key::from_hex("000102030405060708090a0b0c0d0e0f").unwrap();
        let report = run(&key, b"avalanche").unwrap();

        for profile in [&report.tea, &report.ntsa].iter() {
            assert_eq!(profile.flips.len(), MAX_FLIPPED_BITS);
            for (i, flip) in profile.flips.iter().enumerate() {
                assert_eq!(flip.bit_position, i);
                assert!(flip.changed_bits > 0);
                assert!(flip.avalanche_percentage > 0.0 && flip.avalanche_percentage <= 100.0);
            }
        }

        // 9 bytes pad to two blocks
        assert_eq!(report.tea.flips[0].total_bits, 128);
        assert_eq!(report.ntsa.flips[0].total_bits, 256);
    }

    #[test]
    fn check_short_plaintext() {
        let key = Key::from([1_u8; 16]);

        assert!(run(&key, b"").unwrap().tea.flips.is_empty());
        assert_eq!(run(&key, b"").unwrap().tea.mean_percentage, 0.0);
        assert_eq!(run(&key, b"a").unwrap().ntsa.flips.len(), 8);
    }
}
