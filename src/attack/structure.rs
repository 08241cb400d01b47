use serde::Serialize;

use crate::cipher::Algorithm;

/// Static description of a cipher's construction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StructuralProfile {
    pub algorithm: Algorithm,
    pub round_structure: &'static str,
    pub block_size_bits: usize,
    pub key_size_bits: usize,
    pub key_schedule: &'static str,
    pub confusion: &'static str,
    pub diffusion: &'static str,
    pub weaknesses: &'static [&'static str],
    pub strengths: &'static [&'static str],
}

const TEA: StructuralProfile = StructuralProfile {
    algorithm: Algorithm::Tea,
    round_structure: "64 Feistel rounds (32 cycles of 2 rounds)",
    block_size_bits: 64,
    key_size_bits: 128,
    key_schedule: "128-bit key split into 4 32-bit words, reused every cycle",
    confusion: "Limited: modular addition, XOR and shifts only",
    diffusion: "Weak: each half mixes only with the other half",
    weaknesses: &[
        "Equivalent keys: flipping bit 31 of both words of one key half keeps the ciphertext",
        "Related-key vulnerabilities",
        "Simple key schedule",
        "Effective key size of 126 bits",
    ],
    strengths: &["Small, table-free implementation"],
};

const NTSA: StructuralProfile = StructuralProfile {
    algorithm: Algorithm::Ntsa,
    round_structure: "64 Feistel rounds (32 cycles of 2 rounds) with evolving round keys",
    block_size_bits: 64,
    key_size_bits: 128,
    key_schedule: "Key words 1 and 3 evolve every round through a 32-entry key-derived table",
    confusion: "Key-dependent table lookups added to the TEA round",
    diffusion: "Round keys depend on the block state, ciphertext carries the evolved key",
    weaknesses: &[
        "Ciphertext is twice the plaintext length",
        "Evolved key words are emitted alongside each block",
        "Not constant time",
    ],
    strengths: &[
        "No TEA-style equivalent keys",
        "Data-dependent key evolution",
    ],
};

const AES_128_CBC: StructuralProfile = StructuralProfile {
    algorithm: Algorithm::Aes128Cbc,
    round_structure: "10 substitution-permutation rounds",
    block_size_bits: 128,
    key_size_bits: 128,
    key_schedule: "Rijndael key expansion through the S-box",
    confusion: "Strong: non-linear S-box substitution",
    diffusion: "Strong: ShiftRows and MixColumns linear mixing",
    weaknesses: &["Random IV grows ciphertext by one block"],
    strengths: &[
        "No equivalent keys",
        "Resistant to related-key attacks",
        "Complex key schedule",
        "Near 50% avalanche",
    ],
};

/// Construction summary for one cipher
pub fn profile(algorithm: Algorithm) -> StructuralProfile {
    match algorithm {
        Algorithm::Tea => TEA,
        Algorithm::Ntsa => NTSA,
        Algorithm::Aes128Cbc => AES_128_CBC,
    }
}

/// Construction summaries for every cipher
pub fn run() -> [StructuralProfile; 3] {
    [TEA, NTSA, AES_128_CBC]
}
