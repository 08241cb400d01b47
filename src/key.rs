use alloc::string::String;

use crate::encoding;

/// Length of a cipher key in bytes
pub const KEY_LEN: usize = 16;

/// Length of a cipher key in bits
pub const KEY_BITS: usize = KEY_LEN * 8;

/// Number of big-endian 32-bit words in a key
pub const KEY_WORDS: usize = 4;

#[derive(Debug, PartialEq)]
pub enum Error {
    InvalidKeyLength(usize),
    InvalidHexEncoding(encoding::Error),
    InvalidBitPosition(usize),
    InvalidWordIndex(usize),
    InvalidByteIndex(usize),
}

/// 128-bit key shared by every engine
///
/// Interpreted as four big-endian words k0..k3
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Key([u8; KEY_LEN]);

impl Key {
    /// Create a key from a byte slice, which must be exactly 16 bytes
    pub fn new(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != KEY_LEN {
            return Err(Error::InvalidKeyLength(bytes.len()));
        }

        let mut key = [0_u8; KEY_LEN];
        key.copy_from_slice(bytes);

        Ok(Self(key))
    }

    /// Parse a key from 32 hex characters
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        let bytes = encoding::from_hex(hex).map_err(Error::InvalidHexEncoding)?;
        Self::new(&bytes)
    }

    /// Create a key from four words
    pub fn from_words(words: [u32; KEY_WORDS]) -> Self {
        let mut key = [0_u8; KEY_LEN];
        for (chunk, word) in key.chunks_exact_mut(4).zip(words.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        Self(key)
    }

    /// Encode an integer as a big-endian key (used to enumerate the key space)
    pub fn from_u128(i: u128) -> Self {
        Self(i.to_be_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// The key as four big-endian words
    pub fn words(&self) -> [u32; KEY_WORDS] {
        let mut words = [0_u32; KEY_WORDS];
        for (word, chunk) in words.iter_mut().zip(self.0.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        words
    }

    pub fn to_hex(&self) -> String {
        encoding::to_hex(&self.0)
    }

    /// Add `delta` to word `idx` (mod 2^32)
    pub fn with_word_added(&self, idx: usize, delta: u32) -> Result<Self, Error> {
        if idx >= KEY_WORDS {
            return Err(Error::InvalidWordIndex(idx));
        }

        let mut words = self.words();
        words[idx] = words[idx].wrapping_add(delta);

        Ok(Self::from_words(words))
    }

    /// Replace word `idx`
    pub fn with_word(&self, idx: usize, value: u32) -> Result<Self, Error> {
        if idx >= KEY_WORDS {
            return Err(Error::InvalidWordIndex(idx));
        }

        let mut words = self.words();
        words[idx] = value;

        Ok(Self::from_words(words))
    }

    /// Add `delta` to byte `idx` (mod 256)
    pub fn with_byte_added(&self, idx: usize, delta: u8) -> Result<Self, Error> {
        if idx >= KEY_LEN {
            return Err(Error::InvalidByteIndex(idx));
        }

        let mut key = self.0;
        key[idx] = key[idx].wrapping_add(delta);

        Ok(Self(key))
    }

    /// Force key bit `pos` to `set`
    ///
    /// Bit 0 is the most significant bit of byte 0, bit 127 the least significant bit of byte 15
    pub fn with_bit(&self, pos: usize, set: bool) -> Result<Self, Error> {
        if pos >= KEY_BITS {
            return Err(Error::InvalidBitPosition(pos));
        }

        let mut key = self.0;
        let mask = 0x80_u8 >> (pos % 8);
        if set {
            key[pos / 8] |= mask;
        } else {
            key[pos / 8] &= !mask;
        }

        Ok(Self(key))
    }
}

impl From<[u8; KEY_LEN]> for Key {
    fn from(key: [u8; KEY_LEN]) -> Self {
        Self(key)
    }
}
