//! One-bit-per-element helpers.

/// Expand bytes into bits, MSB first.
pub fn bits_from_bytes(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1))
        .collect()
}

/// Pack bits back into bytes, MSB first. A trailing partial byte is padded
/// with zero bits on the right.
pub fn bytes_from_bits(bits: &[u8]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &bit)| acc | ((bit & 1) << (7 - i)))
        })
        .collect()
}

/// Pack up to 32 bits into an integer, MSB first.
pub fn pack_bits(bits: &[u8]) -> u32 {
    debug_assert!(bits.len() <= 32);
    bits.iter().fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit & 1))
}

/// Unpack the low `width` bits of `value` into bits, MSB first.
pub fn unpack_bits(value: u32, width: usize) -> Vec<u8> {
    (0..width)
        .rev()
        .map(|i| ((value >> i) & 1) as u8)
        .collect()
}
