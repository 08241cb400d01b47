use alloc::string::String;
use alloc::vec::Vec;

use serde::Serialize;

use crate::cipher::{CipherEngine, Ntsa, Tea};
use crate::encoding::to_hex;
use crate::key::Key;

use super::Error;

/// 2^31: flips the top bit of a word
const TOP_BIT: u32 = 1 << 31;

/// 2^30
const SECOND_BIT: u32 = 1 << 30;

/// Number of leading key bytes incremented for the NTSA comparison
pub const NTSA_PERTURBED_BYTES: usize = 5;

/// Key transform applied to the base key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Transform {
    /// +2^31 on k0 and k1: flips the top bit of two XORed terms in the v0 update, which cancel
    TopBitWords01,
    /// +2^31 on k2 and k3: the same cancellation in the v1 update
    TopBitWords23,
    /// +2^31 on all four words
    TopBitAllWords,
    /// +2^31 on k0 and k2
    OffsetWords02,
    /// +2^30 on k1 and k3
    OffsetWords13,
    /// +1 (mod 256) on a single key byte
    ByteIncrement(usize),
}

impl Transform {
    /// Whether the transform maps every TEA key to an equivalent key
    pub fn is_tea_equivalence(&self) -> bool {
        match self {
            Transform::TopBitWords01 | Transform::TopBitWords23 | Transform::TopBitAllWords => true,
            _ => false,
        }
    }

    pub fn apply(&self, key: &Key) -> Result<Key, Error> {
        let key = match *self {
            Transform::TopBitWords01 => {
                key.with_word_added(0, TOP_BIT)?.with_word_added(1, TOP_BIT)?
            }
            Transform::TopBitWords23 => {
                key.with_word_added(2, TOP_BIT)?.with_word_added(3, TOP_BIT)?
            }
            Transform::TopBitAllWords => Key::from_words({
                let mut words = key.words();
                for w in words.iter_mut() {
                    *w = w.wrapping_add(TOP_BIT);
                }
                words
            }),
            Transform::OffsetWords02 => {
                key.with_word_added(0, TOP_BIT)?.with_word_added(2, TOP_BIT)?
            }
            Transform::OffsetWords13 => {
                key.with_word_added(1, SECOND_BIT)?.with_word_added(3, SECOND_BIT)?
            }
            Transform::ByteIncrement(idx) => key.with_byte_added(idx, 1)?,
        };
        Ok(key)
    }
}

/// Transforms tried against TEA
pub const TEA_TRANSFORMS: [Transform; 5] = [
    Transform::TopBitWords01,
    Transform::TopBitWords23,
    Transform::TopBitAllWords,
    Transform::OffsetWords02,
    Transform::OffsetWords13,
];

/// Outcome of encrypting under one transformed key
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KeyComparison {
    pub transform: Transform,
    pub key: String,
    pub ciphertext: String,
    pub matches_base: bool,
    /// Whether the transform is a known equivalence for the cipher
    pub is_equivalent: bool,
}

/// Equivalent-key experiment over TEA and NTSA
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EquivalentKeyReport {
    pub base_key: String,
    pub plaintext: String,
    pub tea_base_ciphertext: String,
    pub tea: Vec<KeyComparison>,
    pub ntsa_base_ciphertext: String,
    pub ntsa: Vec<KeyComparison>,
    /// Transformed TEA keys whose ciphertext matched the base
    pub tea_matches: usize,
    /// Perturbed NTSA keys whose ciphertext matched the base (expected 0)
    pub ntsa_collisions: usize,
}

/// The three other members of a key's TEA equivalence class
pub fn tea_equivalent_keys(key: &Key) -> Result<[Key; 3], Error> {
    Ok([
        Transform::TopBitWords01.apply(key)?,
        Transform::TopBitWords23.apply(key)?,
        Transform::TopBitAllWords.apply(key)?,
    ])
}

fn compare<E: CipherEngine>(
    base_ciphertext: &[u8],
    key: &Key,
    transform: Transform,
    is_equivalent: bool,
    plaintext: &[u8],
) -> Result<KeyComparison, Error> {
    let key = transform.apply(key)?;
    let ciphertext = E::new(&key).encrypt(plaintext)?;

    Ok(KeyComparison {
        transform,
        key: key.to_hex(),
        matches_base: ciphertext == base_ciphertext,
        ciphertext: to_hex(&ciphertext),
        is_equivalent,
    })
}

/// Encrypt `plaintext` under the base key and its transformed keys
///
/// TEA is tried against every transform in [TEA_TRANSFORMS], NTSA against a +1
/// increment of each of its first five key bytes.
pub fn run(key: &Key, plaintext: &[u8]) -> Result<EquivalentKeyReport, Error> {
    tracing::debug!(key = %key.to_hex(), len = plaintext.len(), "equivalent-key analysis");

    let tea_base = Tea::new(key).encrypt(plaintext)?;
    let tea = TEA_TRANSFORMS
        .iter()
        .map(|&t| compare::<Tea>(&tea_base, key, t, t.is_tea_equivalence(), plaintext))
        .collect::<Result<Vec<_>, _>>()?;

    let ntsa_base = Ntsa::new(key).encrypt(plaintext)?;
    let ntsa = (0..NTSA_PERTURBED_BYTES)
        .map(|i| compare::<Ntsa>(&ntsa_base, key, Transform::ByteIncrement(i), false, plaintext))
        .collect::<Result<Vec<_>, _>>()?;

    let tea_matches = tea.iter().filter(|c| c.matches_base).count();
    let ntsa_collisions = ntsa.iter().filter(|c| c.matches_base).count();

    if ntsa_collisions > 0 {
        tracing::warn!(ntsa_collisions, "NTSA ciphertext collision under a perturbed key");
    }

    Ok(EquivalentKeyReport {
        base_key: key.to_hex(),
        plaintext: to_hex(plaintext),
        tea_base_ciphertext: to_hex(&tea_base),
        tea,
        ntsa_base_ciphertext: to_hex(&ntsa_base),
        ntsa,
        tea_matches,
        ntsa_collisions,
    })
}
