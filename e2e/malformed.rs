//! E2E Test Suite 04: Malformed input handling
//!
//! Validates the fail-fast parse contract: corrupt headers and payloads
//! error out at handle construction with the right error kind, and no
//! truncation of a valid blob can cause a panic.

use binvec::header::{subtype, Header, MajorKind, HEADER_SIZE};
use binvec::table::TableBuilder;
use binvec::wire;
use binvec::{
    decode, encode_i32, encode_strs, encode_utf8_views, Column, NaBitset, Utf8View, VectorError,
};

fn all_present(n: usize) -> NaBitset {
    let mut na = NaBitset::new();
    for _ in 0..n {
        na.push(false);
    }
    na
}

/// Hand-build a blob from a wire table, bypassing the encoder policy.
fn raw_blob(header: Header, build: impl FnOnce(&mut TableBuilder) -> binvec::table::Loc) -> Vec<u8> {
    let mut b = TableBuilder::with_buffer(Vec::new());
    let root = build(&mut b);
    let range = b.finish(root);
    let mut blob = Vec::new();
    header.write_to(&mut blob);
    blob.extend_from_slice(&b.buffer()[range]);
    blob
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: truncated and unknown headers
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_bad_headers() {
    assert!(matches!(
        decode::<i32>(&[]),
        Err(VectorError::MalformedHeader { .. })
    ));
    assert!(matches!(
        decode::<i32>(&[2, 0]),
        Err(VectorError::MalformedHeader { .. })
    ));
    // Major code 9 does not exist.
    assert!(matches!(
        decode::<i32>(&[9, 0, 0, 0]),
        Err(VectorError::MalformedHeader { .. })
    ));
    // DICT only admits the string sub-encoding.
    assert!(matches!(
        decode::<String>(&[3, 2, 0, 0]),
        Err(VectorError::MalformedHeader { .. })
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: element type must match the blob's encoding
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_type_mismatch() {
    let ints = encode_i32(&[1, 2, 3], &all_present(3)).unwrap();
    assert!(matches!(
        decode::<String>(&ints),
        Err(VectorError::TypeMismatch { .. })
    ));
    assert!(matches!(
        decode::<bool>(&ints),
        Err(VectorError::TypeMismatch { .. })
    ));

    let strs = encode_strs(&["a", "b", "c", "d"], &all_present(4)).unwrap();
    assert!(matches!(
        decode::<i64>(&strs),
        Err(VectorError::TypeMismatch { .. })
    ));

    // Cross-width integer reads are fine; cross-family reads are not.
    assert!(decode::<i64>(&ints).is_ok());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: unsupported bit widths are rejected at parse time
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unsupported_nbits() {
    for nb in [2u8, 3, 4, 5, 6, 7] {
        let blob = raw_blob(
            Header::new(MajorKind::Simple, subtype::PRIMITIVE, 0),
            |b| wire::simple_primitive::build(b, 4, &all_present(4), nb, &[0; 8]),
        );
        assert!(
            matches!(decode::<i32>(&blob), Err(VectorError::UnsupportedNBits(n)) if n == nb),
            "nbits {nb} should be rejected"
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: declared length must fit the packed data
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_length_mismatch() {
    let blob = raw_blob(
        Header::new(MajorKind::Simple, subtype::PRIMITIVE, 0),
        |b| wire::simple_primitive::build(b, 100, &all_present(100), 32, &[0; 8]),
    );
    assert!(matches!(
        decode::<i32>(&blob),
        Err(VectorError::LengthMismatch { .. })
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: every truncation of a valid blob errors without panicking
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_truncation_sweep() {
    let ints = encode_i32(&(0..50).collect::<Vec<_>>(), &all_present(50)).unwrap();
    let strs = encode_strs(&["alpha", "beta", "alpha", "gamma"], &all_present(4)).unwrap();

    for blob in [&ints, &strs] {
        for cut in 0..blob.len() {
            // Err is expected for most prefixes; a panic never is.
            let _ = decode::<i32>(&blob[..cut]);
            let _ = decode::<String>(&blob[..cut]);
        }
        assert!(decode::<i32>(&ints).is_ok());
        assert!(decode::<String>(&strs).is_ok());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 6: corrupted payload bytes never panic the parser
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_bitflip_sweep() {
    let blob = encode_strs(&["north", "south", "north", "east"], &all_present(4)).unwrap();
    for i in 0..blob.len() {
        for bit in 0..8 {
            let mut copy = blob.clone();
            copy[i] ^= 1 << bit;
            // Parse may fail or succeed; element reads on a successful parse
            // must stay total.
            if let Ok(col) = decode::<String>(&copy) {
                for j in 0..col.len().min(8) {
                    let _ = col.get_safe(j);
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 7: non-UTF-8 view bytes fail at encode time
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_invalid_utf8_rejected_on_encode() {
    let bad = [0xFFu8, 0xFE, 0x00];
    let views = [Utf8View::from_str("fine"), Utf8View::from_bytes(&bad)];
    assert!(matches!(
        encode_utf8_views(&views, &all_present(2)),
        Err(VectorError::InvalidUtf8)
    ));

    // Masked rows are not validated; their bytes never reach a reader.
    let mut na = NaBitset::new();
    na.push(false);
    na.push(true);
    let blob = encode_utf8_views(&views, &na).unwrap();
    let col: Column<String> = decode(&blob).unwrap();
    assert_eq!(col.get_safe(0), Some("fine".to_owned()));
    assert_eq!(col.get_safe(1), None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 8: absent region decodes as an empty column of the hinted length
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_absent_region_uses_hint() {
    let col: Column<i64> = Column::parse(None, 12).unwrap();
    assert_eq!(col.len(), 12);
    assert!(!col.is_available(0));
    assert_eq!(col.iter().count(), 0);

    let empty = binvec::encode_empty(3);
    let col: Column<f64> = decode(&empty).unwrap();
    assert_eq!(col.len(), 3);
    assert_eq!(Header::read(&empty).unwrap().aux, 3);
    assert_eq!(empty.len(), HEADER_SIZE);
}
