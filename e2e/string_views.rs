//! E2E Test Suite 03: Zero-copy string views
//!
//! Validates the view contracts end to end:
//! - byte-lexicographic ordering consistent with equality
//! - lazy, stable xxHash32/64 values
//! - the decode path that hands out views pointing into the blob itself

use binvec::{decode, encode_strs, Column, NaBitset, Utf8View};

fn all_present(n: usize) -> NaBitset {
    let mut na = NaBitset::new();
    for _ in 0..n {
        na.push(false);
    }
    na
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: apple before apricot, hashes stable and discriminating
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_ordering_and_hashes() {
    let apple = Utf8View::from_str("apple");
    let apricot = Utf8View::from_str("apricot");
    let banana = Utf8View::from_str("banana");

    assert!(apple < apricot);
    assert!(apple != apricot);
    assert_eq!(apple.cmp(&apricot), std::cmp::Ordering::Less);

    assert_eq!(apple.hash32(), Utf8View::from_str("apple").hash32());
    assert_eq!(apple.hash64(), Utf8View::from_str("apple").hash64());
    assert_eq!(apple.hash32(), apple.hash32());
    assert_ne!(apple.hash32(), banana.hash32());
    assert_ne!(apple.hash64(), banana.hash64());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: equal views agree on ordering, equality, and hashes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_equality_consistency() {
    let region = b"prefix-shared-suffix";
    let a = Utf8View::new(region, 7, 6).unwrap();
    let b = Utf8View::from_str("shared");
    assert_eq!(a, b);
    assert_eq!(a.cmp(&b), std::cmp::Ordering::Equal);
    assert_eq!(a.hash32(), b.hash32());
    assert_eq!(a.hash64(), b.hash64());
    assert_eq!(a.as_str(), Some("shared"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: decoded views point into the blob — no copies, no allocation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_decoded_views_are_zero_copy() {
    let values = ["tin", "copper", "tin", "zinc", "copper", "tin"];
    let blob = encode_strs(&values, &all_present(values.len())).unwrap();

    let col: Column<Utf8View> = decode(&blob).unwrap();
    assert_eq!(col.len(), 6);
    let range = blob.as_ptr_range();
    for (i, &want) in values.iter().enumerate() {
        let view = col.get(i);
        assert_eq!(view.as_str(), Some(want));
        // The view's bytes live inside the blob allocation itself.
        let p = view.as_bytes().as_ptr();
        assert!(range.contains(&p) || view.is_empty());
    }

    // Both read paths agree.
    let owned: Column<String> = decode(&blob).unwrap();
    for i in 0..col.len() {
        assert_eq!(owned.get(i), col.get(i).to_string_lossy());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: views sort decoded columns byte-lexicographically
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_sorting_decoded_views() {
    let values = ["pear", "apple", "quince", "apricot", "banana"];
    let blob = encode_strs(&values, &all_present(values.len())).unwrap();
    let col: Column<Utf8View> = decode(&blob).unwrap();

    let mut views: Vec<Utf8View> = col.iter().collect();
    views.sort();
    let sorted: Vec<&str> = views.iter().filter_map(|v| v.as_str()).collect();
    assert_eq!(sorted, vec!["apple", "apricot", "banana", "pear", "quince"]);
}
