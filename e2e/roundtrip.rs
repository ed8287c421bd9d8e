//! E2E Test Suite 01: Row-to-column round trips
//!
//! Validates that encoding a row stream against a schema and decoding each
//! column reproduces every present-value / missing-flag pair:
//! - RowToColumnBuilder over mixed schemas
//! - every element type, including the timestamp newtypes
//! - empty and single-row boundaries
//! - all-missing and constant column shapes

use binvec::{
    decode, Column, ColumnSpec, DateTimeMillis, ElementType, RowToColumnBuilder, Value,
    ValueRowReader,
};
use binvec::header::{Header, MajorKind};

fn opt_str(s: &str) -> Option<Value> {
    Some(Value::Str(s.to_owned()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: names-and-ages rows, one sparse, one empty
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_name_age_rows_roundtrip() {
    let schema = vec![
        ColumnSpec::new("name", ElementType::Utf8),
        ColumnSpec::new("age", ElementType::Int),
    ];
    let rows: Vec<Vec<Option<Value>>> = vec![
        vec![opt_str("Matthew Perry"), Some(Value::Int(18))],
        vec![opt_str("Michelle Pfeiffer"), None],
        vec![opt_str("George C"), Some(Value::Int(59))],
        vec![opt_str("Rich Sherman"), Some(Value::Int(26))],
        vec![None, None],
    ];

    let mut builder = RowToColumnBuilder::new(schema);
    for row in &rows {
        builder.add_row(&ValueRowReader::new(row));
    }
    assert_eq!(builder.row_count(), 5);
    let columns = builder.convert_to_bytes().expect("encoding should succeed");

    let names: Column<String> = decode(&columns["name"]).expect("name column should parse");
    assert_eq!(names.len(), 5);
    assert_eq!(names.get(0), "Matthew Perry");
    assert_eq!(names.get(1), "Michelle Pfeiffer");
    assert_eq!(names.get(2), "George C");
    assert_eq!(names.get(3), "Rich Sherman");
    assert!(!names.is_available(4));
    assert_eq!(names.get_safe(4), None);

    let ages: Column<i32> = decode(&columns["age"]).expect("age column should parse");
    assert_eq!(ages.len(), 5);
    assert_eq!(ages.get(0), 18);
    assert_eq!(ages.get(2), 59);
    assert_eq!(ages.get(3), 26);
    assert!(!ages.is_available(1));
    assert!(!ages.is_available(4));
    assert_eq!(ages.iter().collect::<Vec<_>>(), vec![18, 59, 26]);
    assert_eq!(
        ages.iter_opt().collect::<Vec<_>>(),
        vec![Some(18), None, Some(59), Some(26), None]
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: every element type through one schema
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_all_element_types_roundtrip() {
    let schema = vec![
        ColumnSpec::new("flag", ElementType::Bool),
        ColumnSpec::new("small", ElementType::Int),
        ColumnSpec::new("big", ElementType::Long),
        ColumnSpec::new("ratio", ElementType::Float),
        ColumnSpec::new("precise", ElementType::Double),
        ColumnSpec::new("label", ElementType::Utf8),
        ColumnSpec::new("seen_at", ElementType::DateTime),
        ColumnSpec::new("stored_at", ElementType::SqlTimestamp),
    ];
    let rows: Vec<Vec<Option<Value>>> = vec![
        vec![
            Some(Value::Bool(true)),
            Some(Value::Int(-40)),
            Some(Value::Long(1 << 40)),
            Some(Value::Float(0.5)),
            Some(Value::Double(-2.25)),
            opt_str("alpha"),
            Some(Value::Long(1_700_000_000_000)),
            Some(Value::Long(1_700_000_000_001)),
        ],
        vec![
            Some(Value::Bool(false)),
            None,
            Some(Value::Long(-(1 << 41))),
            None,
            Some(Value::Double(7.0)),
            opt_str("beta"),
            None,
            Some(Value::Long(1_700_000_100_001)),
        ],
    ];

    let mut builder = RowToColumnBuilder::new(schema);
    for row in &rows {
        builder.add_row(&ValueRowReader::new(row));
    }
    let columns = builder.convert_to_bytes().unwrap();

    let flags: Column<bool> = decode(&columns["flag"]).unwrap();
    assert_eq!((flags.get(0), flags.get(1)), (true, false));

    let smalls: Column<i32> = decode(&columns["small"]).unwrap();
    assert_eq!(smalls.get_safe(0), Some(-40));
    assert_eq!(smalls.get_safe(1), None);

    let bigs: Column<i64> = decode(&columns["big"]).unwrap();
    assert_eq!(bigs.get(0), 1 << 40);
    assert_eq!(bigs.get(1), -(1 << 41));

    let ratios: Column<f32> = decode(&columns["ratio"]).unwrap();
    assert_eq!(ratios.get_safe(0), Some(0.5));
    assert!(!ratios.is_available(1));

    let precises: Column<f64> = decode(&columns["precise"]).unwrap();
    assert_eq!(precises.iter().collect::<Vec<_>>(), vec![-2.25, 7.0]);

    let labels: Column<String> = decode(&columns["label"]).unwrap();
    assert_eq!(labels.get(0), "alpha");
    assert_eq!(labels.get(1), "beta");

    let seen: Column<DateTimeMillis> = decode(&columns["seen_at"]).unwrap();
    assert_eq!(seen.get_safe(0), Some(DateTimeMillis(1_700_000_000_000)));
    assert_eq!(seen.get_safe(1), None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: zero rows round-trips as an empty column
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_zero_rows() {
    let schema = vec![
        ColumnSpec::new("a", ElementType::Int),
        ColumnSpec::new("b", ElementType::Utf8),
    ];
    let builder = RowToColumnBuilder::new(schema);
    let columns = builder.convert_to_bytes().unwrap();

    for blob in [&columns["a"], &columns["b"]] {
        let h = Header::read(blob).unwrap();
        assert_eq!(h.major, MajorKind::Empty);
        assert_eq!(h.aux, 0);
    }
    let a: Column<i32> = decode(&columns["a"]).unwrap();
    assert_eq!(a.len(), 0);
    assert!(a.is_empty());
    let b: Column<String> = decode(&columns["b"]).unwrap();
    assert_eq!(b.iter_opt().count(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: single-row columns work for every encoding path
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_single_row() {
    let schema = vec![
        ColumnSpec::new("n", ElementType::Long),
        ColumnSpec::new("s", ElementType::Utf8),
        ColumnSpec::new("gap", ElementType::Double),
    ];
    let mut builder = RowToColumnBuilder::new(schema);
    let row = vec![Some(Value::Long(-1)), opt_str("only"), None];
    builder.add_row(&ValueRowReader::new(&row));
    let columns = builder.convert_to_bytes().unwrap();

    let n: Column<i64> = decode(&columns["n"]).unwrap();
    assert_eq!((n.len(), n.get_safe(0)), (1, Some(-1)));

    let s: Column<String> = decode(&columns["s"]).unwrap();
    assert_eq!((s.len(), s.get_safe(0)), (1, Some("only".to_owned())));

    let gap: Column<f64> = decode(&columns["gap"]).unwrap();
    assert_eq!(gap.len(), 1);
    assert!(!gap.is_available(0));
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: an all-missing column of n rows is a header-sized EMPTY blob
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_all_missing_column_is_tiny() {
    let schema = vec![ColumnSpec::new("gaps", ElementType::Int)];
    let mut builder = RowToColumnBuilder::new(schema);
    let row: Vec<Option<Value>> = vec![None];
    for _ in 0..1000 {
        builder.add_row(&ValueRowReader::new(&row));
    }
    let columns = builder.convert_to_bytes().unwrap();
    let blob = &columns["gaps"];

    assert!(blob.len() <= 8, "blob is {} bytes", blob.len());
    assert_eq!(Header::read(blob).unwrap().major, MajorKind::Empty);

    let col: Column<i32> = decode(blob).unwrap();
    assert_eq!(col.len(), 1000);
    for i in [0, 1, 500, 999] {
        assert!(!col.is_available(i));
        assert_eq!(col.get_safe(i), None);
    }
    assert_eq!(col.iter().count(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 6: constant columns do not grow with the row count
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_const_size_independent_of_length() {
    let blob_at = |n: usize| {
        let schema = vec![ColumnSpec::new("c", ElementType::Utf8)];
        let mut builder = RowToColumnBuilder::new(schema);
        let row = vec![opt_str("abc")];
        for _ in 0..n {
            builder.add_row(&ValueRowReader::new(&row));
        }
        builder.convert_to_bytes().unwrap().remove("c").unwrap()
    };

    let small = blob_at(100);
    let large = blob_at(10_000);
    assert_eq!(Header::read(&small).unwrap().major, MajorKind::Const);
    assert_eq!(small.len(), large.len());
    assert!(small.len() <= 48, "blob is {} bytes", small.len());

    let col: Column<String> = decode(&large).unwrap();
    assert_eq!(col.len(), 10_000);
    assert_eq!(col.get(0), "abc");
    assert_eq!(col.get(9_999), "abc");
    assert_eq!(col.iter().filter(|s| s == "abc").count(), 10_000);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 7: builder reset starts a fresh batch
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_builder_reset() {
    let schema = vec![ColumnSpec::new("v", ElementType::Int)];
    let mut builder = RowToColumnBuilder::new(schema);
    let row = vec![Some(Value::Int(5))];
    builder.add_row(&ValueRowReader::new(&row));
    builder.reset();
    assert_eq!(builder.row_count(), 0);

    let row = vec![Some(Value::Int(8))];
    builder.add_row(&ValueRowReader::new(&row));
    let columns = builder.convert_to_bytes().unwrap();
    let col: Column<i32> = decode(&columns["v"]).unwrap();
    assert_eq!((col.len(), col.get_safe(0)), (1, Some(8)));
}
