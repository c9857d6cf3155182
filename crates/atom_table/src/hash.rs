//! Content hash keying the reverse cache.

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// 64-bit hash of a name's bytes.
///
/// Order- and content-sensitive but not collision-free; cache hits are
/// checked against the table bytes before they are trusted.
#[inline]
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(bytes);
    hasher.write_usize(bytes.len());
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_bytes(b"golang"), hash_bytes(b"golang"));
    }

    #[test]
    fn test_hash_is_order_sensitive() {
        assert_ne!(hash_bytes(b"ab"), hash_bytes(b"ba"));
        assert_ne!(hash_bytes(b"section"), hash_bytes(b"noitces"));
    }

    #[test]
    fn test_hash_distinguishes_trailing_zeros() {
        assert_ne!(hash_bytes(b"a"), hash_bytes(b"a\0"));
        assert_ne!(hash_bytes(b""), hash_bytes(b"\0"));
    }
}
