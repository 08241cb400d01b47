use alloc::string::String;
use alloc::vec::Vec;

#[derive(Debug, PartialEq)]
pub enum Error {
    HexLength,
    ParseHex,
}

/// Hex-decode a string
///
/// errors: returns Error on odd length, empty, or non-hex strings
pub fn from_hex(hex: &str) -> Result<Vec<u8>, Error> {
    let hex_len = hex.len();
    if hex_len % 2 != 0 || hex_len == 0 {
        return Err(Error::HexLength);
    }

    // multi-byte characters would split the two-character windows below
    if !hex.is_ascii() {
        return Err(Error::ParseHex);
    }

    let mut res = Vec::with_capacity(hex_len / 2);
    for i in 0..(hex_len / 2) {
        res.push(u8::from_str_radix(&hex[i * 2..=i * 2 + 1], 16).map_err(|_| Error::ParseHex)?);
    }
    Ok(res)
}

/// Hex-encode a byte slice (lowercase)
pub fn to_hex(bytes: &[u8]) -> String {
    const ALPHABET: &[u8; 16] = b"0123456789abcdef";

    let mut res = String::with_capacity(bytes.len() * 2);
    for &b in bytes.iter() {
        res.push(ALPHABET[(b >> 4) as usize] as char);
        res.push(ALPHABET[(b & 0x0f) as usize] as char);
    }
    res
}
