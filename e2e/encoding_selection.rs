//! E2E Test Suite 02: Encoding selection
//!
//! Validates the per-column selection ladder and its observable outputs:
//! - minimal bit width over the observed integer range
//! - one-bit boolean packing
//! - dictionary coding with minimal code widths and threshold edges
//! - sign round-trips through narrowed widths

use binvec::header::{Header, MajorKind, HEADER_SIZE};
use binvec::table::Table;
use binvec::wire;
use binvec::{
    decode, encode_bool, encode_i32, encode_i64, encode_strs, encode_strs_with_limit, Column,
    NaBitset,
};

fn all_present(n: usize) -> NaBitset {
    let mut na = NaBitset::new();
    for _ in 0..n {
        na.push(false);
    }
    na
}

fn simple_nbits(blob: &[u8]) -> u8 {
    let root = Table::root(&blob[HEADER_SIZE..]).unwrap();
    wire::simple_primitive::decode(&root).unwrap().nbits
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: 1..=300 as i32 packs at 16 bits
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_small_range_packs_16_bits() {
    let values: Vec<i32> = (1..=300).collect();
    let blob = encode_i32(&values, &all_present(values.len())).unwrap();

    assert_eq!(Header::read(&blob).unwrap().major, MajorKind::Simple);
    assert_eq!(simple_nbits(&blob), 16);

    let col: Column<i32> = decode(&blob).unwrap();
    assert_eq!(col.len(), 300);
    for (i, &v) in values.iter().enumerate() {
        assert_eq!(col.get(i), v);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: minimal width tracks the observed range, per width rung
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_minimal_width_per_range() {
    let cases: [(Vec<i64>, u8); 6] = [
        (vec![0, 1, -128, 127], 8),
        (vec![0, 128], 16),
        (vec![-129, 5], 16),
        (vec![0, 40_000], 32),
        (vec![i32::MIN as i64, 3], 32),
        (vec![0, i32::MAX as i64 + 1], 64),
    ];
    for (values, want) in cases {
        let blob = encode_i64(&values, &all_present(values.len())).unwrap();
        assert_eq!(simple_nbits(&blob), want, "values {values:?}");
        let col: Column<i64> = decode(&blob).unwrap();
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(col.get(i), v, "values {values:?} at {i}");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: negatives survive the narrowed widths
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_sign_roundtrip_through_narrow_widths() {
    let values = [-5i32, 100, -128, 127];
    let blob = encode_i32(&values, &all_present(4)).unwrap();
    assert_eq!(simple_nbits(&blob), 8);
    let col: Column<i32> = decode(&blob).unwrap();
    assert_eq!(col.iter().collect::<Vec<_>>(), vec![-5, 100, -128, 127]);

    // The same bytes widen cleanly to i64.
    let col64: Column<i64> = decode(&blob).unwrap();
    assert_eq!(col64.get(0), -5);
    assert_eq!(col64.get(2), -128);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: 1000 alternating booleans pack one bit each
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_bool_packs_one_bit() {
    let values: Vec<bool> = (0..1000).map(|i| i % 2 == 0).collect();
    let blob = encode_bool(&values, &all_present(1000)).unwrap();

    assert_eq!(simple_nbits(&blob), 1);
    // 1000 bits of payload data round to 125 bytes; the whole blob stays
    // within a couple hundred.
    assert!(blob.len() < 200, "blob is {} bytes", blob.len());

    let col: Column<bool> = decode(&blob).unwrap();
    assert_eq!(col.len(), 1000);
    for i in 0..1000 {
        assert_eq!(col.get(i), i % 2 == 0);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: four-string palette dictionary-codes at 8-bit codes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_palette_strings_dictionary_code() {
    let palette = ["north", "south", "east", "west"];
    let values: Vec<&str> = (0..100).map(|i| palette[i % 4]).collect();
    let blob = encode_strs(&values, &all_present(100)).unwrap();

    assert_eq!(Header::read(&blob).unwrap().major, MajorKind::Dict);
    let root = Table::root(&blob[HEADER_SIZE..]).unwrap();
    let parts = wire::dict_string::decode(&root).unwrap();
    assert_eq!(parts.dict.len(), 4);
    assert_eq!(parts.codes.nbits, 8);

    let col: Column<String> = decode(&blob).unwrap();
    for (i, &v) in values.iter().enumerate() {
        assert_eq!(col.get(i), v);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 6: dictionary threshold edge — at the cap codes, past the cap stores
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_dictionary_threshold_edge() {
    let cap = 4;
    let n = 40;

    // Exactly `cap` distinct values: dictionary.
    let at_cap: Vec<String> = (0..n).map(|i| format!("v{}", i % cap)).collect();
    let refs: Vec<&str> = at_cap.iter().map(|s| s.as_str()).collect();
    let blob = encode_strs_with_limit(&refs, &all_present(n), cap).unwrap();
    assert_eq!(Header::read(&blob).unwrap().major, MajorKind::Dict);

    // One more distinct value: plain string vector.
    let past_cap: Vec<String> = (0..n).map(|i| format!("v{}", i % (cap + 1))).collect();
    let refs: Vec<&str> = past_cap.iter().map(|s| s.as_str()).collect();
    let blob = encode_strs_with_limit(&refs, &all_present(n), cap).unwrap();
    assert_eq!(Header::read(&blob).unwrap().major, MajorKind::Simple);

    // Half-the-length bound: 6 rows over 4 distinct values exceeds 6/2.
    let half_bound: Vec<String> = (0..6).map(|i| format!("v{}", i % 4)).collect();
    let refs: Vec<&str> = half_bound.iter().map(|s| s.as_str()).collect();
    let blob = encode_strs(&refs, &all_present(6)).unwrap();
    assert_eq!(Header::read(&blob).unwrap().major, MajorKind::Simple);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 7: one present plus one missing row
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_one_present_one_missing() {
    let mut na = NaBitset::new();
    na.push(false);
    na.push(true);
    let blob = encode_i32(&[77, 0], &na).unwrap();

    // A single present value is a constant column with a bitmap mask.
    let h = Header::read(&blob).unwrap();
    assert_eq!(h.major, MajorKind::Const);
    let root = Table::root(&blob[HEADER_SIZE..]).unwrap();
    let parts = wire::simple_primitive::decode(&root).unwrap();
    assert!(matches!(parts.na, binvec::namask::NaMask::Bitmap(_)));

    let col: Column<i32> = decode(&blob).unwrap();
    assert_eq!(col.len(), 2);
    assert_eq!(col.get_safe(0), Some(77));
    assert_eq!(col.get_safe(1), None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 8: mixed missing positions keep values at their indexes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_scattered_missing_positions() {
    let n = 200;
    let mut na = NaBitset::new();
    let mut values = Vec::with_capacity(n);
    for i in 0..n {
        let missing = i % 7 == 3;
        na.push(missing);
        values.push(if missing { 0 } else { (i as i64) - 100 });
    }
    let blob = encode_i64(&values, &na).unwrap();
    let col: Column<i64> = decode(&blob).unwrap();
    assert_eq!(col.len(), n);
    for i in 0..n {
        if i % 7 == 3 {
            assert!(!col.is_available(i));
        } else {
            assert_eq!(col.get_safe(i), Some((i as i64) - 100));
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 9: all-missing columns wider than the header aux field stay small
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_all_missing_past_aux_capacity() {
    let n = u16::MAX as usize + 10;
    let mut na = NaBitset::new();
    for _ in 0..n {
        na.push(true);
    }
    let values = vec![0i32; n];
    let blob = encode_i32(&values, &na).unwrap();

    // Too long for an EMPTY header; a fully masked constant takes over.
    assert_eq!(Header::read(&blob).unwrap().major, MajorKind::Const);
    assert!(blob.len() <= 80, "blob is {} bytes", blob.len());

    let col: Column<i32> = decode(&blob).unwrap();
    assert_eq!(col.len(), n);
    assert!(!col.is_available(0));
    assert!(!col.is_available(n - 1));
    assert_eq!(col.iter().count(), 0);
}
