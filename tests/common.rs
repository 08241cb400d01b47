use rand::{thread_rng, Rng};

use cryptolab::Key;

#[allow(dead_code)]
pub const TEST_KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f";

#[allow(dead_code)]
pub const TEST_PLAINTEXT: &[u8] = b"Test message for brute force";

#[allow(dead_code)]
pub fn to_hex(hex: &[u8]) -> String {
    hex.iter().map(|x| format!("{:02x}", x)).collect()
}

#[allow(dead_code)]
pub fn test_key() -> Key {
    Key::from_hex(TEST_KEY_HEX).unwrap()
}

// fresh random key from the thread RNG
#[allow(dead_code)]
pub fn random_key() -> Key {
    let mut bytes = [0_u8; 16];
    thread_rng().fill(&mut bytes);
    Key::from(bytes)
}

// random buffer of the given length
#[allow(dead_code)]
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut rng = thread_rng();
    (0..len).map(|_| rng.gen()).collect()
}
