/// Hamming weight of the XOR of two byte slices, over the min length
pub fn xor_weight(el: &[u8], ar: &[u8]) -> u64 {
    el.iter()
        .zip(ar.iter())
        .map(|(e, a)| (e ^ a).count_ones() as u64)
        .sum()
}

/// Count changed bits between two byte slices
///
/// Aligned bytes contribute the popcount of their XOR.
/// Bytes past the end of the shorter slice count their own popcount as changed.
///
/// Returns (changed bits, total bits compared)
pub fn changed_bits(el: &[u8], ar: &[u8]) -> (u64, u64) {
    let (long, short) = if el.len() >= ar.len() { (el, ar) } else { (ar, el) };

    let mut changed = xor_weight(short, long);
    for b in long[short.len()..].iter() {
        changed += b.count_ones() as u64;
    }

    (changed, long.len() as u64 * 8)
}
