use alloc::vec::Vec;

use serde::Serialize;

use crate::key::{self, Key};

/// Module implementing the Tiny Encryption Algorithm
pub mod tea;

/// Module implementing the NTSA variant of TEA (key-evolving rounds, dynamic table)
pub mod ntsa;

/// Module wrapping AES-128-CBC with a random IV
pub mod aes_cbc;

pub use aes_cbc::Aes128Cbc;
pub use ntsa::Ntsa;
pub use tea::Tea;

/// Magic constant shared by TEA and NTSA (2^32 / golden ratio)
pub const DELTA: u32 = 0x9e37_79b9;

/// Number of cycles run by TEA and NTSA
pub const ROUNDS: usize = 32;

/// Block length of TEA and NTSA in bytes
pub const BLOCK_LEN: usize = 8;

#[derive(Debug)]
pub enum Error {
    Key(key::Error),
    CiphertextLength(usize),
    Cbc(craes::cbc::Error),
}

impl From<key::Error> for Error {
    fn from(e: key::Error) -> Self {
        Error::Key(e)
    }
}

/// Cipher selected for an experiment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Algorithm {
    #[serde(rename = "TEA")]
    Tea,
    #[serde(rename = "NTSA")]
    Ntsa,
    #[serde(rename = "AES-128-CBC")]
    Aes128Cbc,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Tea => "TEA",
            Algorithm::Ntsa => "NTSA",
            Algorithm::Aes128Cbc => "AES-128-CBC",
        }
    }
}

/// Byte-stream encryption under a 128-bit key
pub trait CipherEngine: Sized {
    /// Tag reported in analysis records
    const ALGORITHM: Algorithm;

    /// Build an engine, deriving any key-dependent state once
    fn new(key: &Key) -> Self;

    /// Build an engine from raw key bytes
    fn from_key_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self::new(&Key::new(bytes)?))
    }

    /// Pad and encrypt a plaintext of any length
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error>;

    /// Decrypt and strip padding
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, Error>;
}

/// Single 64-bit block encryption, used by the differential and key-recovery experiments
pub trait BlockEngine: CipherEngine {
    fn encrypt_words(&self, v0: u32, v1: u32) -> (u32, u32);
}

/// Pad with `n` copies of `n`, where `n = block_len - (len % block_len)`
///
/// Always pads, so an aligned input gains a full block
pub fn pad(data: &[u8], block_len: usize) -> Vec<u8> {
    let pad_len = block_len - (data.len() % block_len);

    let mut res = Vec::with_capacity(data.len() + pad_len);
    res.extend_from_slice(data);
    res.resize(data.len() + pad_len, pad_len as u8);
    res
}

/// Strip trailing padding, trusting the final byte as the pad length
///
/// A final byte larger than `block_len` leaves the data unstripped.
/// No check is made that the pad bytes agree with each other.
pub fn strip_padding(mut data: Vec<u8>, block_len: usize) -> Vec<u8> {
    if let Some(&last) = data.last() {
        let pad_len = last as usize;
        if pad_len <= block_len && pad_len <= data.len() {
            data.truncate(data.len() - pad_len);
        }
    }
    data
}

/// Split an 8-byte chunk into big-endian words
pub(crate) fn load_words(chunk: &[u8]) -> (u32, u32) {
    (
        u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
        u32::from_be_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]),
    )
}

/// Append two words big-endian
pub(crate) fn store_words(out: &mut Vec<u8>, v0: u32, v1: u32) {
    out.extend_from_slice(&v0.to_be_bytes());
    out.extend_from_slice(&v1.to_be_bytes());
}
