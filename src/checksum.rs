/// Computes the CAB data-block checksum of `data`, folded into `seed`.
///
/// Each complete 4-byte little-endian word is XORed into the running value.
/// Any 1-3 trailing bytes are packed most-significant-first into one final
/// word before being XORed in.
pub fn checksum(data: &[u8], seed: u32) -> u32 {
    let mut value = seed;
    let mut words = data.chunks_exact(4);
    for word in &mut words {
        value ^= u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
    }
    let remainder = words
        .remainder()
        .iter()
        .fold(0u32, |acc, &byte| (acc << 8) | byte as u32);
    value ^ remainder
}
