//! NTSA: a TEA variant with masked key mixing and per-round key evolution.
//!
//! Each round ANDs the shifted half with k0 (k2) instead of adding it, then
//! evolves k1 (k3) by `k0 ^ xtract(v0)` (`k2 ^ xtract(v1)`), where `xtract`
//! folds the freshly updated half down to five bits and indexes a 32-word
//! table derived from the key. The evolved (k1, k3) cannot be recomputed
//! without the plaintext, so they are emitted next to every ciphertext block.

use alloc::vec::Vec;

use crate::key::{Key, KEY_WORDS};

use super::{load_words, pad, store_words, strip_padding};
use super::{Algorithm, BlockEngine, CipherEngine, Error, BLOCK_LEN, DELTA, ROUNDS};

/// Number of entries in the dynamic table
pub const TABLE_LEN: usize = 32;

/// Bytes emitted per plaintext block: evolved (k1, k3) followed by the ciphertext block
pub const OUTPUT_BLOCK_LEN: usize = BLOCK_LEN * 2;

/// Key-derived lookup table
pub type DynamicTable = [u32; TABLE_LEN];

/// Final (k1, k3) after a block's 32 rounds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvolvedKey {
    pub k1: u32,
    pub k3: u32,
}

/// NTSA engine, holding the key words and the table derived from them
#[derive(Clone, Debug)]
pub struct Ntsa {
    key: [u32; KEY_WORDS],
    table: DynamicTable,
}

/// Derive the dynamic table from the key words
///
/// 32 iterations of an ARX step over the four-word state, recording the XOR
/// of all four words after each iteration.
pub fn dynamic_table(key: &[u32; KEY_WORDS]) -> DynamicTable {
    let mut state = *key;
    let mut table = [0_u32; TABLE_LEN];

    for entry in table.iter_mut() {
        for i in 0..KEY_WORDS {
            let next = state[(i + 1) % KEY_WORDS];
            let shifted = if i % 2 == 0 { next << 4 } else { next >> 5 };
            let mix = (state[(i + 3) % KEY_WORDS] ^ DELTA).wrapping_add(shifted);
            state[i] = state[i].wrapping_add(mix);
        }
        *entry = state[0] ^ state[1] ^ state[2] ^ state[3];
    }

    table
}

// TEA-shaped round function with the first key word used as a mask
fn mix(v: u32, mask: u32, add: u32, kc: u32) -> u32 {
    ((v << 4) & mask) ^ v.wrapping_add(kc) ^ (v >> 5).wrapping_add(add)
}

impl Ntsa {
    pub fn table(&self) -> &DynamicTable {
        &self.table
    }

    /// Fold all 32 bits of `v` into the low five, and look up the table entry
    pub fn xtract(&self, mut v: u32) -> u32 {
        v ^= v >> 16;
        v ^= v >> 8;
        v ^= v >> 4;
        v ^= v >> 2;
        v ^= v >> 1;
        self.table[(v & 0x1f) as usize]
    }

    /// Encrypt one block, returning the ciphertext words and the evolved subkeys
    pub fn encrypt_block(&self, mut v0: u32, mut v1: u32) -> ((u32, u32), EvolvedKey) {
        let [k0, mut k1, k2, mut k3] = self.key;
        let mut kc = 0_u32;

        for _ in 0..ROUNDS {
            kc = kc.wrapping_add(DELTA);
            v0 = v0.wrapping_add(mix(v1, k0, k1, kc));
            k1 = k1.wrapping_add(k0 ^ self.xtract(v0));
            v1 = v1.wrapping_add(mix(v0, k2, k3, kc));
            k3 = k3.wrapping_add(k2 ^ self.xtract(v1));
        }

        ((v0, v1), EvolvedKey { k1, k3 })
    }

    /// Decrypt one block, given the evolved subkeys its encryption produced
    pub fn decrypt_block(&self, mut v0: u32, mut v1: u32, evolved: EvolvedKey) -> (u32, u32) {
        let [k0, _, k2, _] = self.key;
        let EvolvedKey { mut k1, mut k3 } = evolved;
        let mut kc = DELTA.wrapping_mul(ROUNDS as u32);

        for _ in 0..ROUNDS {
            k3 = k3.wrapping_sub(k2 ^ self.xtract(v1));
            v1 = v1.wrapping_sub(mix(v0, k2, k3, kc));
            k1 = k1.wrapping_sub(k0 ^ self.xtract(v0));
            v0 = v0.wrapping_sub(mix(v1, k0, k1, kc));
            kc = kc.wrapping_sub(DELTA);
        }

        (v0, v1)
    }
}

impl CipherEngine for Ntsa {
    const ALGORITHM: Algorithm = Algorithm::Ntsa;

    fn new(key: &Key) -> Self {
        let key = key.words();
        Self { key, table: dynamic_table(&key) }
    }

    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        let padded = pad(plaintext, BLOCK_LEN);
        let mut res = Vec::with_capacity(padded.len() * 2);

        for chunk in padded.chunks_exact(BLOCK_LEN) {
            let (v0, v1) = load_words(chunk);
            let ((c0, c1), evolved) = self.encrypt_block(v0, v1);
            store_words(&mut res, evolved.k1, evolved.k3);
            store_words(&mut res, c0, c1);
        }

        Ok(res)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
        if ciphertext.len() % OUTPUT_BLOCK_LEN != 0 {
            return Err(Error::CiphertextLength(ciphertext.len()));
        }

        let mut res = Vec::with_capacity(ciphertext.len() / 2);

        for chunk in ciphertext.chunks_exact(OUTPUT_BLOCK_LEN) {
            let (k1, k3) = load_words(&chunk[..BLOCK_LEN]);
            let (c0, c1) = load_words(&chunk[BLOCK_LEN..]);
            let (v0, v1) = self.decrypt_block(c0, c1, EvolvedKey { k1, k3 });
            store_words(&mut res, v0, v1);
        }

        Ok(strip_padding(res, BLOCK_LEN))
    }
}

impl BlockEngine for Ntsa {
    fn encrypt_words(&self, v0: u32, v1: u32) -> (u32, u32) {
        self.encrypt_block(v0, v1).0
    }
}
