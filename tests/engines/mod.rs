use cryptolab::cipher::{self, ntsa, Error};
use cryptolab::{Aes128Cbc, BlockEngine, CipherEngine, Key, Ntsa, Tea};

use crate::common::{random_bytes, random_key, test_key, to_hex, TEST_PLAINTEXT};

fn check_roundtrip<E: CipherEngine>(engine: &E) {
    for len in 0..=40 {
        let msg = random_bytes(len);
        let ciphertext = engine.encrypt(&msg).unwrap();
        assert_eq!(engine.decrypt(&ciphertext).unwrap(), msg, "length {}", len);
    }
}

#[test]
fn tea_roundtrip() {
    check_roundtrip(&Tea::new(&test_key()));
    check_roundtrip(&Tea::new(&random_key()));
}

#[test]
fn ntsa_roundtrip() {
    check_roundtrip(&Ntsa::new(&test_key()));
    check_roundtrip(&Ntsa::new(&random_key()));
}

#[test]
fn aes_roundtrip() {
    check_roundtrip(&Aes128Cbc::new(&test_key()));
    check_roundtrip(&Aes128Cbc::new(&random_key()));
}

#[test]
fn tea_known_answer() {
    let tea = Tea::new(&Key::from([0_u8; 16]));

    assert_eq!(tea.encrypt_words(0, 0), (0x41ea_3a0a, 0x94ba_a940));

    // an aligned block gains a full padding block
    let ciphertext = tea.encrypt(&[0_u8; 8]).unwrap();
    assert_eq!(ciphertext.len(), 16);
    assert_eq!(to_hex(&ciphertext[..8]), "41ea3a0a94baa940");
}

#[test]
fn brute_force_message() {
    let key = test_key();
    assert_eq!(TEST_PLAINTEXT.len(), 28);

    let tea = Tea::new(&key);
    let ciphertext = tea.encrypt(TEST_PLAINTEXT).unwrap();
    assert_eq!(ciphertext.len(), 32);
    assert_eq!(tea.decrypt(&ciphertext).unwrap(), TEST_PLAINTEXT);

    // deterministic
    assert_eq!(tea.encrypt(TEST_PLAINTEXT).unwrap(), ciphertext);

    let ntsa = Ntsa::new(&key);
    let ciphertext = ntsa.encrypt(TEST_PLAINTEXT).unwrap();
    assert_eq!(ciphertext.len(), 64);
    assert_eq!(ntsa.decrypt(&ciphertext).unwrap(), TEST_PLAINTEXT);

    let aes = Aes128Cbc::new(&key);
    let ciphertext = aes.encrypt(TEST_PLAINTEXT).unwrap();
    assert_eq!(ciphertext.len(), 48);
    assert_eq!(aes.decrypt(&ciphertext).unwrap(), TEST_PLAINTEXT);
}

#[test]
fn ntsa_expansion() {
    let key = random_key();
    let ntsa = Ntsa::new(&key);
    let tea = Tea::new(&key);

    for len in 0..=40 {
        let msg = random_bytes(len);
        let padded = (len / 8 + 1) * 8;
        assert_eq!(ntsa.encrypt(&msg).unwrap().len(), padded * 2);
        assert_eq!(ntsa.encrypt(&msg).unwrap().len(), tea.encrypt(&msg).unwrap().len() * 2);
    }

    // every output block leads with the evolved key words
    let msg = random_bytes(16);
    let ciphertext = ntsa.encrypt(&msg).unwrap();
    for (chunk, block) in ciphertext.chunks(ntsa::OUTPUT_BLOCK_LEN).zip(msg.chunks(8)) {
        let v0 = u32::from_be_bytes([block[0], block[1], block[2], block[3]]);
        let v1 = u32::from_be_bytes([block[4], block[5], block[6], block[7]]);
        let ((c0, c1), evolved) = ntsa.encrypt_block(v0, v1);

        assert_eq!(chunk[..4], evolved.k1.to_be_bytes());
        assert_eq!(chunk[4..8], evolved.k3.to_be_bytes());
        assert_eq!(chunk[8..12], c0.to_be_bytes());
        assert_eq!(chunk[12..], c1.to_be_bytes());
    }
}

#[test]
fn aes_random_iv() {
    let aes = Aes128Cbc::new(&test_key());
    let first = aes.encrypt(b"same message").unwrap();
    let second = aes.encrypt(b"same message").unwrap();

    assert_ne!(first[..16], second[..16]);
    assert_eq!(aes.decrypt(&first).unwrap(), b"same message");
    assert_eq!(aes.decrypt(&second).unwrap(), b"same message");
}

#[test]
fn bad_ciphertext_lengths() {
    let key = test_key();

    assert!(matches!(Tea::new(&key).decrypt(&[0_u8; 7]), Err(Error::CiphertextLength(7))));
    assert!(matches!(Ntsa::new(&key).decrypt(&[0_u8; 8]), Err(Error::CiphertextLength(8))));
    assert!(matches!(Aes128Cbc::new(&key).decrypt(&[0_u8; 15]), Err(Error::CiphertextLength(15))));
    assert!(matches!(Aes128Cbc::new(&key).decrypt(&[0_u8; 20]), Err(Error::CiphertextLength(20))));
}

#[test]
fn key_bytes() {
    assert!(Tea::from_key_bytes(&[1_u8; 16]).is_ok());
    assert!(matches!(Tea::from_key_bytes(&[1_u8; 15]), Err(Error::Key(_))));
    assert!(matches!(Ntsa::from_key_bytes(&[1_u8; 17]), Err(Error::Key(_))));
    assert!(Key::from_hex("not hex").is_err());
}

#[test]
fn padding() {
    for len in 0..=40 {
        let msg = random_bytes(len);
        let padded = cipher::pad(&msg, 8);

        assert_eq!(padded.len() % 8, 0);
        assert!(padded.len() > msg.len());
        assert_eq!(cipher::strip_padding(padded, 8), msg);
    }
}
