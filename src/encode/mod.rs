//! Column encoders.
//!
//! Each `encode_*` function applies the same selection ladder — empty,
//! all-missing, constant, (strings: dictionary,) packed simple — and emits a
//! finished blob: 4-byte header plus table payload. The returned `Vec<u8>`
//! is always a fresh allocation owned by the caller.
//!
//! Encoding builds payloads in a per-thread scratch buffer: one growable
//! allocation per thread, 64 KiB on first use, retained (including any
//! growth) for that thread's next encoding. Encoders are therefore not
//! shareable across threads; use one per thread.

pub mod primitive;
pub mod string;

use std::cell::RefCell;
use std::mem;

use crate::error::{Result, VectorError};
use crate::header::{subtype, Header, MajorKind, HEADER_SIZE};
use crate::namask::NaBitset;
use crate::table::{Loc, TableBuilder};

pub use primitive::{encode_bool, encode_f32, encode_f64, encode_i32, encode_i64};
pub use string::{
    encode_strs, encode_strs_with_limit, encode_utf8_views, DEFAULT_DICT_CARDINALITY_CAP,
};

// ─────────────────────────────────────────────────────────────────────────────
// Per-thread scratch
// ─────────────────────────────────────────────────────────────────────────────

thread_local! {
    static SCRATCH: RefCell<Vec<u8>> = const { RefCell::new(Vec::new()) };
}

/// Run `f` with this thread's scratch buffer.
fn with_scratch<R>(f: impl FnOnce(&mut Vec<u8>) -> R) -> R {
    SCRATCH.with(|cell| f(&mut cell.borrow_mut()))
}

/// Drop this thread's scratch buffer; the next encoding re-allocates. Meant
/// for tests that assert on allocation behavior.
pub fn reset_scratch() {
    SCRATCH.with(|cell| *cell.borrow_mut() = Vec::new());
}

/// Current capacity of this thread's scratch buffer.
pub fn scratch_capacity() -> usize {
    SCRATCH.with(|cell| cell.borrow().capacity())
}

/// Build a payload in the scratch buffer and prefix it with `header`.
pub(crate) fn build_blob(header: Header, build: impl FnOnce(&mut TableBuilder) -> Loc) -> Vec<u8> {
    with_scratch(|scratch| {
        let mut b = TableBuilder::with_buffer(mem::take(scratch));
        let root = build(&mut b);
        let range = b.finish(root);
        let mut blob = Vec::with_capacity(HEADER_SIZE + range.len());
        header.write_to(&mut blob);
        blob.extend_from_slice(&b.buffer()[range]);
        *scratch = b.into_buffer();
        blob
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared ladder steps
// ─────────────────────────────────────────────────────────────────────────────

/// An EMPTY blob: header only, declared length in `aux`.
pub fn encode_empty(len: u16) -> Vec<u8> {
    let mut blob = Vec::with_capacity(HEADER_SIZE);
    Header::new(MajorKind::Empty, subtype::PRIMITIVE, len).write_to(&mut blob);
    blob
}

/// Staged values and mask must line up row for row.
pub(crate) fn check_staging(values_len: usize, na: &NaBitset) -> Result<()> {
    if values_len != na.len() {
        return Err(VectorError::LengthMismatch { declared: na.len(), actual: values_len });
    }
    Ok(())
}

/// The all-missing step: EMPTY when the length fits the header's `aux`
/// field; otherwise a constant vector whose every position is masked, which
/// stays O(1) in the length. Returns `None` when the column has values.
pub(crate) fn encode_all_missing(
    na: &NaBitset,
    oversize: impl FnOnce() -> Vec<u8>,
) -> Option<Vec<u8>> {
    if !na.all_missing() || na.is_empty() {
        return None;
    }
    if na.len() <= u16::MAX as usize {
        Some(encode_empty(na.len() as u16))
    } else {
        Some(oversize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_blob_is_header_only() {
        let blob = encode_empty(0);
        assert_eq!(blob.len(), HEADER_SIZE);
        let h = Header::read(&blob).unwrap();
        assert_eq!(h.major, MajorKind::Empty);
        assert_eq!(h.aux, 0);

        let blob = encode_empty(41);
        assert_eq!(Header::read(&blob).unwrap().aux, 41);
    }

    #[test]
    fn scratch_is_reused_and_resettable() {
        reset_scratch();
        assert_eq!(scratch_capacity(), 0);
        let _ = encode_i32(&[1, 2, 3], &{
            let mut na = NaBitset::new();
            na.push(false);
            na.push(false);
            na.push(false);
            na
        });
        let cap = scratch_capacity();
        assert!(cap >= 64 * 1024);
        // A second encoding keeps the same allocation.
        let _ = encode_i32(&[4], &{
            let mut na = NaBitset::new();
            na.push(false);
            na
        });
        assert_eq!(scratch_capacity(), cap);
        reset_scratch();
        assert_eq!(scratch_capacity(), 0);
    }
}
