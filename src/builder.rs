//! Row-to-column conversion.
//!
//! A [`RowToColumnBuilder`] stages one buffer per schema column plus a
//! missing-position bitset, appends rows from any [`RowReader`], and hands
//! every staged column to its encoder in one shot. Timestamp-typed columns
//! stage as epoch-millisecond longs and therefore ride the integer
//! encoding.

use std::collections::HashMap;

use crate::encode;
use crate::error::Result;
use crate::namask::NaBitset;
use crate::row::RowReader;

/// Schema-level element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Bool,
    Int,
    Long,
    Float,
    Double,
    Utf8,
    /// Calendar timestamp, staged as epoch milliseconds.
    DateTime,
    /// Database timestamp, staged as epoch milliseconds.
    SqlTimestamp,
}

/// One column of a schema: a name plus its element type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub ty: ElementType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, ty: ElementType) -> Self {
        ColumnSpec { name: name.into(), ty }
    }
}

/// Per-column staging buffer. Missing rows store the type's default so
/// indexes stay aligned; the bitset is what readers trust.
#[derive(Debug)]
enum Staging {
    Bool(Vec<bool>, NaBitset),
    Int(Vec<i32>, NaBitset),
    Long(Vec<i64>, NaBitset),
    Float(Vec<f32>, NaBitset),
    Double(Vec<f64>, NaBitset),
    Utf8(Vec<String>, NaBitset),
}

impl Staging {
    fn for_type(ty: ElementType) -> Self {
        match ty {
            ElementType::Bool => Staging::Bool(Vec::new(), NaBitset::new()),
            ElementType::Int => Staging::Int(Vec::new(), NaBitset::new()),
            ElementType::Long | ElementType::DateTime | ElementType::SqlTimestamp => {
                Staging::Long(Vec::new(), NaBitset::new())
            }
            ElementType::Float => Staging::Float(Vec::new(), NaBitset::new()),
            ElementType::Double => Staging::Double(Vec::new(), NaBitset::new()),
            ElementType::Utf8 => Staging::Utf8(Vec::new(), NaBitset::new()),
        }
    }

    fn append(&mut self, row: &dyn RowReader, col: usize) {
        let present = row.is_present(col);
        match self {
            Staging::Bool(vals, na) => {
                vals.push(present && row.get_bool(col));
                na.push(!present);
            }
            Staging::Int(vals, na) => {
                vals.push(if present { row.get_i32(col) } else { 0 });
                na.push(!present);
            }
            Staging::Long(vals, na) => {
                vals.push(if present { row.get_i64(col) } else { 0 });
                na.push(!present);
            }
            Staging::Float(vals, na) => {
                vals.push(if present { row.get_f32(col) } else { 0.0 });
                na.push(!present);
            }
            Staging::Double(vals, na) => {
                vals.push(if present { row.get_f64(col) } else { 0.0 });
                na.push(!present);
            }
            Staging::Utf8(vals, na) => {
                vals.push(if present { row.get_str(col).to_owned() } else { String::new() });
                na.push(!present);
            }
        }
    }

    fn encode(&self) -> Result<Vec<u8>> {
        match self {
            Staging::Bool(vals, na) => encode::encode_bool(vals, na),
            Staging::Int(vals, na) => encode::encode_i32(vals, na),
            Staging::Long(vals, na) => encode::encode_i64(vals, na),
            Staging::Float(vals, na) => encode::encode_f32(vals, na),
            Staging::Double(vals, na) => encode::encode_f64(vals, na),
            Staging::Utf8(vals, na) => {
                let strs: Vec<&str> = vals.iter().map(|s| s.as_str()).collect();
                encode::encode_strs(&strs, na)
            }
        }
    }

    fn clear(&mut self) {
        match self {
            Staging::Bool(vals, na) => {
                vals.clear();
                na.clear();
            }
            Staging::Int(vals, na) => {
                vals.clear();
                na.clear();
            }
            Staging::Long(vals, na) => {
                vals.clear();
                na.clear();
            }
            Staging::Float(vals, na) => {
                vals.clear();
                na.clear();
            }
            Staging::Double(vals, na) => {
                vals.clear();
                na.clear();
            }
            Staging::Utf8(vals, na) => {
                vals.clear();
                na.clear();
            }
        }
    }
}

/// Collects rows into per-column staging buffers and encodes each column.
pub struct RowToColumnBuilder {
    specs: Vec<ColumnSpec>,
    stagings: Vec<Staging>,
    rows: usize,
}

impl RowToColumnBuilder {
    pub fn new(schema: Vec<ColumnSpec>) -> Self {
        let stagings = schema.iter().map(|s| Staging::for_type(s.ty)).collect();
        RowToColumnBuilder { specs: schema, stagings, rows: 0 }
    }

    /// The schema this builder stages for.
    pub fn schema(&self) -> &[ColumnSpec] {
        &self.specs
    }

    /// Rows appended since construction or the last [`RowToColumnBuilder::reset`].
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Append one row: each schema column reads its value or records a
    /// missing position.
    pub fn add_row(&mut self, row: &dyn RowReader) {
        for (col, staging) in self.stagings.iter_mut().enumerate() {
            staging.append(row, col);
        }
        self.rows += 1;
    }

    /// Encode every staged column, returning `name → blob`.
    pub fn convert_to_bytes(&self) -> Result<HashMap<String, Vec<u8>>> {
        let mut out = HashMap::with_capacity(self.specs.len());
        for (spec, staging) in self.specs.iter().zip(&self.stagings) {
            out.insert(spec.name.clone(), staging.encode()?);
        }
        Ok(out)
    }

    /// Drop staged rows, keeping the schema and buffers for reuse.
    pub fn reset(&mut self) {
        for staging in &mut self.stagings {
            staging.clear();
        }
        self.rows = 0;
    }
}
