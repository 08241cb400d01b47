use alloc::vec::Vec;

use crate::key::{Key, KEY_WORDS};

use super::{load_words, pad, store_words, strip_padding};
use super::{Algorithm, BlockEngine, CipherEngine, Error, BLOCK_LEN, DELTA, ROUNDS};

/// Tiny Encryption Algorithm (64-bit block, 128-bit key, 32 cycles)
///
/// Wheeler & Needham, 1994. Known to have four equivalent keys per key,
/// since flipping the top bit of both words used in one half-round cancels out.
#[derive(Clone, Debug)]
pub struct Tea {
    key: [u32; KEY_WORDS],
}

// ((v << 4) + ka) ^ (v + sum) ^ ((v >> 5) + kb)
fn feistel(v: u32, ka: u32, kb: u32, sum: u32) -> u32 {
    ((v << 4).wrapping_add(ka)) ^ (v.wrapping_add(sum)) ^ ((v >> 5).wrapping_add(kb))
}

impl Tea {
    /// Encrypt one block of two big-endian words
    pub fn encrypt_block(&self, mut v0: u32, mut v1: u32) -> (u32, u32) {
        let [k0, k1, k2, k3] = self.key;
        let mut sum = 0_u32;

        for _ in 0..ROUNDS {
            sum = sum.wrapping_add(DELTA);
            v0 = v0.wrapping_add(feistel(v1, k0, k1, sum));
            v1 = v1.wrapping_add(feistel(v0, k2, k3, sum));
        }

        (v0, v1)
    }

    /// Decrypt one block of two big-endian words
    pub fn decrypt_block(&self, mut v0: u32, mut v1: u32) -> (u32, u32) {
        let [k0, k1, k2, k3] = self.key;
        let mut sum = DELTA.wrapping_mul(ROUNDS as u32);

        for _ in 0..ROUNDS {
            v1 = v1.wrapping_sub(feistel(v0, k2, k3, sum));
            v0 = v0.wrapping_sub(feistel(v1, k0, k1, sum));
            sum = sum.wrapping_sub(DELTA);
        }

        (v0, v1)
    }
}

impl CipherEngine for Tea {
    const ALGORITHM: Algorithm = Algorithm::Tea;

    fn new(key: &Key) -> Self {
        Self { key: key.words() }
    }

    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        let padded = pad(plaintext, BLOCK_LEN);
        let mut res = Vec::with_capacity(padded.len());

        for chunk in padded.chunks_exact(BLOCK_LEN) {
            let (v0, v1) = load_words(chunk);
            let (c0, c1) = self.encrypt_block(v0, v1);
            store_words(&mut res, c0, c1);
        }

        Ok(res)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
        if ciphertext.len() % BLOCK_LEN != 0 {
            return Err(Error::CiphertextLength(ciphertext.len()));
        }

        let mut res = Vec::with_capacity(ciphertext.len());

        for chunk in ciphertext.chunks_exact(BLOCK_LEN) {
            let (c0, c1) = load_words(chunk);
            let (v0, v1) = self.decrypt_block(c0, c1);
            store_words(&mut res, v0, v1);
        }

        Ok(strip_padding(res, BLOCK_LEN))
    }
}

impl BlockEngine for Tea {
    fn encrypt_words(&self, v0: u32, v1: u32) -> (u32, u32) {
        self.encrypt_block(v0, v1)
    }
}
