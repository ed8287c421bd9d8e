//! Thin wrapper around the `xxhash-rust` crate providing the one-shot XXH32
//! and XXH64 entry points used by [`crate::strview::Utf8View`].

/// Seed shared by every hash this crate computes. Hashes are comparable
/// across processes only because the seed is fixed.
pub const HASH_SEED: u32 = 0x9747_B28C;

/// One-shot XXH32 over `data` with the crate seed.
#[inline]
pub fn hash32(data: &[u8]) -> u32 {
    xxhash_rust::xxh32::xxh32(data, HASH_SEED)
}

/// One-shot XXH64 over `data` with the crate seed.
#[inline]
pub fn hash64(data: &[u8]) -> u64 {
    xxhash_rust::xxh64::xxh64(data, HASH_SEED as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(hash32(b"apple"), hash32(b"apple"));
        assert_eq!(hash64(b"apple"), hash64(b"apple"));
    }

    #[test]
    fn distinguishes_inputs() {
        assert_ne!(hash32(b"apple"), hash32(b"banana"));
        assert_ne!(hash64(b"apple"), hash64(b"banana"));
    }
}
