//! Zero-copy UTF-8 view.
//!
//! A [`Utf8View`] points into somebody else's byte region — a decoded
//! payload or a caller-supplied buffer — and never allocates. Ordering is
//! unsigned lexicographic by byte; equality is byte identity. Two hashes
//! (XXH32 and XXH64, fixed seed) are computed on first use and cached.
//!
//! The caches are single atomic words with a sentinel "uncomputed" value.
//! Concurrent first reads may race, but every racer stores the same bits,
//! so the race is benign; a hash that happens to equal the sentinel is
//! simply recomputed on each call.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::sync::atomic::{AtomicU64, Ordering as MemOrdering};

use crate::error::{Result, VectorError};
use crate::xxhash;

const UNCOMPUTED: u64 = u64::MAX;

/// Non-owning view of UTF-8 bytes inside a longer-lived region.
///
/// The region must not change for the lifetime of the view; the borrow
/// checker enforces exactly that.
pub struct Utf8View<'a> {
    bytes: &'a [u8],
    cached32: AtomicU64,
    cached64: AtomicU64,
}

impl<'a> Utf8View<'a> {
    /// View over an entire byte slice.
    #[inline]
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Utf8View {
            bytes,
            cached32: AtomicU64::new(UNCOMPUTED),
            cached64: AtomicU64::new(UNCOMPUTED),
        }
    }

    /// View over a string.
    #[inline]
    pub fn from_str(s: &'a str) -> Self {
        Self::from_bytes(s.as_bytes())
    }

    /// Bounds-checked view of `len` bytes of `region` starting at `offset`.
    pub fn new(region: &'a [u8], offset: usize, len: usize) -> Result<Self> {
        let end = offset.checked_add(len).ok_or(VectorError::TruncatedPayload)?;
        let bytes = region
            .get(offset..end)
            .ok_or(VectorError::TruncatedPayload)?;
        Ok(Self::from_bytes(bytes))
    }

    /// The viewed bytes.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Checked conversion; `None` when the bytes are not valid UTF-8.
    pub fn as_str(&self) -> Option<&'a str> {
        core::str::from_utf8(self.bytes).ok()
    }

    /// Owned string, replacing any invalid sequences.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.bytes).into_owned()
    }

    /// XXH32 of the bytes, computed lazily and cached.
    pub fn hash32(&self) -> u32 {
        let cached = self.cached32.load(MemOrdering::Relaxed);
        if cached != UNCOMPUTED {
            return cached as u32;
        }
        let h = xxhash::hash32(self.bytes);
        self.cached32.store(h as u64, MemOrdering::Relaxed);
        h
    }

    /// XXH64 of the bytes, computed lazily and cached.
    pub fn hash64(&self) -> u64 {
        let cached = self.cached64.load(MemOrdering::Relaxed);
        if cached != UNCOMPUTED {
            return cached;
        }
        let h = xxhash::hash64(self.bytes);
        if h != UNCOMPUTED {
            self.cached64.store(h, MemOrdering::Relaxed);
        }
        h
    }
}

impl Clone for Utf8View<'_> {
    fn clone(&self) -> Self {
        Utf8View {
            bytes: self.bytes,
            cached32: AtomicU64::new(self.cached32.load(MemOrdering::Relaxed)),
            cached64: AtomicU64::new(self.cached64.load(MemOrdering::Relaxed)),
        }
    }
}

impl PartialEq for Utf8View<'_> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Utf8View<'_> {}

impl PartialOrd for Utf8View<'_> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Utf8View<'_> {
    /// Unsigned lexicographic byte order.
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.bytes.cmp(other.bytes)
    }
}

impl Hash for Utf8View<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Debug for Utf8View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Utf8View({:?})", String::from_utf8_lossy(self.bytes))
    }
}

impl fmt::Display for Utf8View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_bytewise() {
        let apple = Utf8View::from_str("apple");
        let apricot = Utf8View::from_str("apricot");
        assert!(apple < apricot);
        assert_eq!(apple, Utf8View::from_str("apple"));
        // Unsigned comparison: 0xC3 sorts after every ASCII byte.
        let high = Utf8View::from_str("é");
        let low = Utf8View::from_str("z");
        assert!(low < high);
    }

    #[test]
    fn hashes_are_cached_and_stable() {
        let v = Utf8View::from_str("apple");
        let h32 = v.hash32();
        let h64 = v.hash64();
        assert_eq!(v.hash32(), h32);
        assert_eq!(v.hash64(), h64);
        // Equal views hash equal; the cache does not leak across values.
        let w = Utf8View::from_str("apple");
        assert_eq!(w.hash32(), h32);
        assert_eq!(w.hash64(), h64);
        assert_ne!(Utf8View::from_str("banana").hash32(), h32);
    }

    #[test]
    fn offset_construction() {
        let region = b"xxapplexx";
        let v = Utf8View::new(region, 2, 5).unwrap();
        assert_eq!(v.as_str(), Some("apple"));
        assert!(Utf8View::new(region, 8, 5).is_err());
        assert!(Utf8View::new(region, usize::MAX, 2).is_err());
    }

    #[test]
    fn invalid_utf8_is_contained() {
        let v = Utf8View::from_bytes(&[0xFF, 0x61]);
        assert_eq!(v.as_str(), None);
        assert_eq!(v.to_string_lossy(), "\u{FFFD}a");
    }

    #[test]
    fn views_are_shareable_across_threads() {
        let v = Utf8View::from_str("shared");
        let h = v.hash64();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| assert_eq!(v.hash64(), h));
            }
        });
    }
}
