use alloc::vec::Vec;

use rand::{thread_rng, RngCore};

use craes::{aes, cbc};

use crate::key::Key;

use super::{pad, strip_padding, Algorithm, CipherEngine, Error};

/// AES-128-CBC with a fresh random IV per message
///
/// Output layout: IV (16 bytes) | ciphertext (16-byte aligned)
#[derive(Clone, Debug)]
pub struct Aes128Cbc {
    key: [u8; aes::KEY_LEN_128],
}

impl Aes128Cbc {
    /// Encrypt under a caller-supplied IV
    pub fn encrypt_with_iv(
        &self,
        plaintext: &[u8],
        iv: &[u8; cbc::IV_LEN],
    ) -> Result<Vec<u8>, Error> {
        let padded = pad(plaintext, aes::BLOCK_LEN);
        let ciphertext = cbc::encrypt(&padded, &self.key, iv).map_err(Error::Cbc)?;

        let mut res = Vec::with_capacity(cbc::IV_LEN + ciphertext.len());
        res.extend_from_slice(iv);
        res.extend_from_slice(&ciphertext);

        Ok(res)
    }
}

impl CipherEngine for Aes128Cbc {
    const ALGORITHM: Algorithm = Algorithm::Aes128Cbc;

    fn new(key: &Key) -> Self {
        Self { key: *key.as_bytes() }
    }

    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        let mut iv = [0_u8; cbc::IV_LEN];
        thread_rng().fill_bytes(&mut iv);

        self.encrypt_with_iv(plaintext, &iv)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
        let len = ciphertext.len();
        if len < cbc::IV_LEN || (len - cbc::IV_LEN) % aes::BLOCK_LEN != 0 {
            return Err(Error::CiphertextLength(len));
        }

        if len == cbc::IV_LEN {
            return Ok(Vec::new());
        }

        let mut iv = [0_u8; cbc::IV_LEN];
        iv.copy_from_slice(&ciphertext[..cbc::IV_LEN]);

        let plaintext =
            cbc::decrypt(&ciphertext[cbc::IV_LEN..], &self.key, &iv).map_err(Error::Cbc)?;

        Ok(strip_padding(plaintext, aes::BLOCK_LEN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let cipher = Aes128Cbc::from_key_bytes(b"YELLOW SUBMARINE").unwrap();

        for len in 0..=40 {
            let msg = alloc::vec![0x41_u8 ^ len as u8; len];
            let ciphertext = cipher.encrypt(&msg).unwrap();

            assert_eq!(ciphertext.len(), cbc::IV_LEN + (len / aes::BLOCK_LEN + 1) * aes::BLOCK_LEN);
            assert_eq!(cipher.decrypt(&ciphertext).unwrap(), msg);
        }
    }

    #[test]
    fn fresh_iv() {
        let cipher = Aes128Cbc::from_key_bytes(&[3_u8; 16]).unwrap();
        let msg = b"same message twice";

        assert_ne!(cipher.encrypt(msg).unwrap(), cipher.encrypt(msg).unwrap());

        let iv = [9_u8; cbc::IV_LEN];
        assert_eq!(
            cipher.encrypt_with_iv(msg, &iv).unwrap(),
            cipher.encrypt_with_iv(msg, &iv).unwrap()
        );
    }

    #[test]
    fn bad_ciphertext_length() {
        let cipher = Aes128Cbc::from_key_bytes(&[3_u8; 16]).unwrap();

        assert!(matches!(cipher.decrypt(&[0_u8; 15]), Err(Error::CiphertextLength(15))));
        assert!(matches!(cipher.decrypt(&[0_u8; 20]), Err(Error::CiphertextLength(20))));
        assert!(cipher.decrypt(&[0_u8; 16]).unwrap().is_empty());
    }
}
