//! Row sources the column builder consumes.
//!
//! A [`RowReader`] is a narrow capability set: per-column presence plus
//! typed getters. The getters are infallible by contract — calling one
//! whose type does not match the underlying field, or with a column the
//! reader does not have, is a programmer error and panics. The builder only
//! ever calls the getter matching the schema's declared element type.

use crate::strview::Utf8View;

/// Dynamically typed scalar used by the general-purpose row shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "i32",
            Value::Long(_) => "i64",
            Value::Float(_) => "f32",
            Value::Double(_) => "f64",
            Value::Str(_) => "str",
        }
    }
}

/// Typed access to one row of input data.
///
/// Extension element types with a primitive representation (timestamps,
/// say) stage through the matching numeric getter.
pub trait RowReader {
    /// Whether column `col` holds a value in this row.
    fn is_present(&self, col: usize) -> bool;

    fn get_bool(&self, col: usize) -> bool;
    fn get_i32(&self, col: usize) -> i32;
    fn get_i64(&self, col: usize) -> i64;
    fn get_f32(&self, col: usize) -> f32;
    fn get_f64(&self, col: usize) -> f64;
    fn get_str(&self, col: usize) -> &str;

    /// Zero-copy view of a string column.
    fn get_utf8(&self, col: usize) -> Utf8View<'_> {
        Utf8View::from_str(self.get_str(col))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Value-backed rows
// ─────────────────────────────────────────────────────────────────────────────

fn expect_value<'v>(values: &'v [Option<Value>], col: usize) -> &'v Value {
    match values.get(col) {
        Some(Some(v)) => v,
        Some(None) => panic!("column {col} is not present in this row"),
        None => panic!("row has no column {col}"),
    }
}

macro_rules! typed_getter {
    ($fn_name:ident, $variant:ident, $ty:ty) => {
        fn $fn_name(&self, col: usize) -> $ty {
            match self.value(col) {
                Value::$variant(v) => v.clone(),
                other => panic!(
                    "column {col} is {}, not {}",
                    other.type_name(),
                    stringify!($ty)
                ),
            }
        }
    };
}

/// Positional row of optional values — the tuple-like shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRowReader<'a> {
    values: &'a [Option<Value>],
}

impl<'a> ValueRowReader<'a> {
    pub fn new(values: &'a [Option<Value>]) -> Self {
        ValueRowReader { values }
    }

    fn value(&self, col: usize) -> &Value {
        expect_value(self.values, col)
    }
}

impl RowReader for ValueRowReader<'_> {
    fn is_present(&self, col: usize) -> bool {
        matches!(self.values.get(col), Some(Some(_)))
    }

    typed_getter!(get_bool, Bool, bool);
    typed_getter!(get_i32, Int, i32);
    typed_getter!(get_i64, Long, i64);
    typed_getter!(get_f32, Float, f32);
    typed_getter!(get_f64, Double, f64);

    fn get_str(&self, col: usize) -> &str {
        match self.value(col) {
            Value::Str(s) => s,
            other => panic!("column {col} is {}, not str", other.type_name()),
        }
    }
}

/// Row over a sequence of strings, parsing numerics on demand. Every column
/// the slice covers is present.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayStringRowReader<'a> {
    values: &'a [&'a str],
}

impl<'a> ArrayStringRowReader<'a> {
    pub fn new(values: &'a [&'a str]) -> Self {
        ArrayStringRowReader { values }
    }

    fn parse<T: core::str::FromStr>(&self, col: usize) -> T {
        let s = self.values[col];
        match s.parse() {
            Ok(v) => v,
            Err(_) => panic!("column {col} ({s:?}) does not parse"),
        }
    }
}

impl RowReader for ArrayStringRowReader<'_> {
    fn is_present(&self, col: usize) -> bool {
        col < self.values.len()
    }

    fn get_bool(&self, col: usize) -> bool {
        self.parse(col)
    }

    fn get_i32(&self, col: usize) -> i32 {
        self.parse(col)
    }

    fn get_i64(&self, col: usize) -> i64 {
        self.parse(col)
    }

    fn get_f32(&self, col: usize) -> f32 {
        self.parse(col)
    }

    fn get_f64(&self, col: usize) -> f64 {
        self.parse(col)
    }

    fn get_str(&self, col: usize) -> &str {
        self.values[col]
    }
}

/// One value answered for every column index.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleValueRowReader {
    value: Value,
}

impl SingleValueRowReader {
    pub fn new(value: Value) -> Self {
        SingleValueRowReader { value }
    }

    fn value(&self, _col: usize) -> &Value {
        &self.value
    }
}

impl RowReader for SingleValueRowReader {
    fn is_present(&self, _col: usize) -> bool {
        true
    }

    typed_getter!(get_bool, Bool, bool);
    typed_getter!(get_i32, Int, i32);
    typed_getter!(get_i64, Long, i64);
    typed_getter!(get_f32, Float, f32);
    typed_getter!(get_f64, Double, f64);

    fn get_str(&self, col: usize) -> &str {
        match self.value(col) {
            Value::Str(s) => s,
            other => panic!("column {col} is {}, not str", other.type_name()),
        }
    }
}

/// General sequence of values, all present.
#[derive(Debug, Clone, PartialEq)]
pub struct SeqRowReader<'a> {
    values: &'a [Value],
}

impl<'a> SeqRowReader<'a> {
    pub fn new(values: &'a [Value]) -> Self {
        SeqRowReader { values }
    }

    fn value(&self, col: usize) -> &Value {
        match self.values.get(col) {
            Some(v) => v,
            None => panic!("row has no column {col}"),
        }
    }
}

impl RowReader for SeqRowReader<'_> {
    fn is_present(&self, col: usize) -> bool {
        col < self.values.len()
    }

    typed_getter!(get_bool, Bool, bool);
    typed_getter!(get_i32, Int, i32);
    typed_getter!(get_i64, Long, i64);
    typed_getter!(get_f32, Float, f32);
    typed_getter!(get_f64, Double, f64);

    fn get_str(&self, col: usize) -> &str {
        match self.value(col) {
            Value::Str(s) => s,
            other => panic!("column {col} is {}, not str", other.type_name()),
        }
    }
}

/// Remaps column indices onto another reader: column `c` here reads column
/// `route[c]` there. Equality follows the underlying reader and route.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingRowReader<'a, R: RowReader> {
    inner: &'a R,
    route: &'a [usize],
}

impl<'a, R: RowReader> RoutingRowReader<'a, R> {
    pub fn new(inner: &'a R, route: &'a [usize]) -> Self {
        RoutingRowReader { inner, route }
    }

    pub fn underlying(&self) -> &'a R {
        self.inner
    }

    fn target(&self, col: usize) -> usize {
        self.route[col]
    }
}

impl<R: RowReader> RowReader for RoutingRowReader<'_, R> {
    fn is_present(&self, col: usize) -> bool {
        col < self.route.len() && self.inner.is_present(self.target(col))
    }

    fn get_bool(&self, col: usize) -> bool {
        self.inner.get_bool(self.target(col))
    }

    fn get_i32(&self, col: usize) -> i32 {
        self.inner.get_i32(self.target(col))
    }

    fn get_i64(&self, col: usize) -> i64 {
        self.inner.get_i64(self.target(col))
    }

    fn get_f32(&self, col: usize) -> f32 {
        self.inner.get_f32(self.target(col))
    }

    fn get_f64(&self, col: usize) -> f64 {
        self.inner.get_f64(self.target(col))
    }

    fn get_str(&self, col: usize) -> &str {
        self.inner.get_str(self.target(col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_rows_report_presence() {
        let row = [Some(Value::Int(4)), None, Some(Value::Str("x".into()))];
        let r = ValueRowReader::new(&row);
        assert!(r.is_present(0));
        assert!(!r.is_present(1));
        assert!(r.is_present(2));
        assert!(!r.is_present(3));
        assert_eq!(r.get_i32(0), 4);
        assert_eq!(r.get_str(2), "x");
    }

    #[test]
    fn string_rows_parse_on_demand() {
        let row = ["42", "-7", "2.5", "true", "plain"];
        let r = ArrayStringRowReader::new(&row);
        assert_eq!(r.get_i32(0), 42);
        assert_eq!(r.get_i64(1), -7);
        assert_eq!(r.get_f64(2), 2.5);
        assert!(r.get_bool(3));
        assert_eq!(r.get_str(4), "plain");
    }

    #[test]
    fn single_value_answers_every_column() {
        let r = SingleValueRowReader::new(Value::Long(99));
        assert!(r.is_present(0));
        assert!(r.is_present(17));
        assert_eq!(r.get_i64(0), 99);
        assert_eq!(r.get_i64(17), 99);
    }

    #[test]
    fn routing_remaps_and_compares_by_underlying() {
        let row = [Value::Int(1), Value::Int(2), Value::Int(3)];
        let inner = SeqRowReader::new(&row);
        let route = [2usize, 0];
        let r = RoutingRowReader::new(&inner, &route);
        assert_eq!(r.get_i32(0), 3);
        assert_eq!(r.get_i32(1), 1);
        assert!(r.is_present(1));
        assert!(!r.is_present(2));

        let same = RoutingRowReader::new(&inner, &route);
        assert_eq!(r, same);
        assert_eq!(r.underlying(), &inner);
    }

    #[test]
    #[should_panic(expected = "not i32")]
    fn type_mismatch_panics() {
        let row = [Some(Value::Str("nope".into()))];
        ValueRowReader::new(&row).get_i32(0);
    }
}
