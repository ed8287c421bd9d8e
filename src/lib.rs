//! Columnar binary vectors: encode one column of tabular data into a
//! self-describing blob, read elements straight out of the bytes.
//!
//! A blob is a 4-byte header plus a table-structured payload. The encoder
//! picks the smallest faithful representation per column — empty, constant,
//! dictionary-coded, or bit-packed at a minimal width — and the decoder
//! hands back a typed [`Column`] answering `len` / `is_available` / `get`
//! without copying the payload.
//!
//! ```
//! use binvec::{decode, encode_i32, Column, NaBitset};
//!
//! let mut na = NaBitset::new();
//! let values = [18, 0, 59, 26];
//! for missing in [false, true, false, false] {
//!     na.push(missing);
//! }
//! let blob = encode_i32(&values, &na).unwrap();
//!
//! let ages: Column<i32> = decode(&blob).unwrap();
//! assert_eq!(ages.len(), 4);
//! assert_eq!(ages.get_safe(0), Some(18));
//! assert!(!ages.is_available(1));
//! assert_eq!(ages.iter().collect::<Vec<_>>(), vec![18, 59, 26]);
//! ```

pub mod builder;
pub mod bytes;
pub mod column;
pub mod encode;
pub mod error;
pub mod header;
pub mod namask;
pub mod row;
pub mod strview;
pub mod table;
pub mod wire;
pub mod xxhash;

// ─────────────────────────────────────────────────────────────────────────────
// Read path
// ─────────────────────────────────────────────────────────────────────────────

/// Typed read handle over one encoded column.
pub use column::Column;
/// Parse a blob into a typed column handle.
pub use column::decode;
/// The element-type registry trait and its raw-value plumbing.
pub use column::{Element, ElementKind, RawValue};
/// Timestamp element newtypes (epoch milliseconds).
pub use column::{DateTimeMillis, SqlTimestampMillis};
/// Zero-copy UTF-8 view with cached xxHash values.
pub use strview::Utf8View;

// ─────────────────────────────────────────────────────────────────────────────
// Write path
// ─────────────────────────────────────────────────────────────────────────────

/// Per-kind column encoders.
pub use encode::{encode_bool, encode_f32, encode_f64, encode_i32, encode_i64};
/// String encoders with dictionary selection.
pub use encode::{encode_strs, encode_strs_with_limit, encode_utf8_views};
/// Header-only empty-column blob.
pub use encode::encode_empty;
/// Default cap on dictionary cardinality.
pub use encode::DEFAULT_DICT_CARDINALITY_CAP;
/// Per-thread scratch-buffer controls, exposed for tests.
pub use encode::{reset_scratch, scratch_capacity};
/// Missing-position bitset staged alongside column values.
pub use namask::NaBitset;

// ─────────────────────────────────────────────────────────────────────────────
// Rows and schemas
// ─────────────────────────────────────────────────────────────────────────────

/// Schema types and the row-to-column builder.
pub use builder::{ColumnSpec, ElementType, RowToColumnBuilder};
/// Row-source capability trait and the out-of-box row shapes.
pub use row::{
    ArrayStringRowReader, RoutingRowReader, RowReader, SeqRowReader, SingleValueRowReader,
    Value, ValueRowReader,
};

/// Crate error and result types.
pub use error::{Result, VectorError};
