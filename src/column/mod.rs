//! The polymorphic column handle.
//!
//! A [`Column`] is a read-only view over one encoded column, parameterized
//! by the element type it hands out. Internally it is a tagged variant per
//! payload encoding; the variant is fixed at parse time by dispatching on
//! the wire header, so element reads are branch-plus-load with no dynamic
//! dispatch.
//!
//! The mapping from element types to decoders is the [`Element`] trait:
//! implementing it registers a new element type. The provided impls cover
//! `bool`, `i32`, `i64`, `f32`, `f64`, owned `String`, the zero-copy
//! [`Utf8View`], and the epoch-millisecond timestamp newtypes.
//!
//! # Read contract
//!
//! Construction validates the header and the payload structure; [`Column::get`]
//! does not re-validate. `get(i)` for an index where [`Column::is_available`]
//! is false returns an unspecified value of the element type — guard with
//! `is_available`, or use [`Column::get_safe`] / the iterators.

pub mod primitive;
pub mod string;

use core::any::Any;
use core::marker::PhantomData;

use crate::error::{Result, VectorError};
use crate::header::{subtype, Header, MajorKind, HEADER_SIZE};
use crate::strview::Utf8View;
use crate::table::Table;
use crate::wire;

pub use primitive::PrimitiveReader;
pub use string::{ConstStringReader, DictStringReader, StringReader};

// ─────────────────────────────────────────────────────────────────────────────
// Element registry
// ─────────────────────────────────────────────────────────────────────────────

/// The payload families an element type can decode from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Bool,
    I32,
    I64,
    F32,
    F64,
    Utf8,
}

impl ElementKind {
    #[inline]
    fn is_primitive(self) -> bool {
        !matches!(self, ElementKind::Utf8)
    }

    /// Whether loads should sign-extend from the packed width.
    #[inline]
    fn is_signed_int(self) -> bool {
        matches!(self, ElementKind::I32 | ElementKind::I64)
    }
}

/// A raw decoded value before element conversion.
#[derive(Debug, Clone, Copy)]
pub enum RawValue<'a> {
    /// Packed primitive, sign-extended already when the kind calls for it.
    Bits(u64),
    /// String bytes inside the payload.
    Bytes(&'a [u8]),
}

/// An element type a column can hand out.
///
/// The constant picks the payload family; `from_raw` converts the decoded
/// raw value. Parse-time dispatch guarantees `from_raw` only ever sees the
/// raw family matching [`Element::KIND`].
pub trait Element<'a>: Sized {
    const KIND: ElementKind;

    fn from_raw(raw: RawValue<'a>) -> Self;
}

impl<'a> Element<'a> for bool {
    const KIND: ElementKind = ElementKind::Bool;

    #[inline]
    fn from_raw(raw: RawValue<'a>) -> Self {
        match raw {
            RawValue::Bits(b) => b != 0,
            RawValue::Bytes(_) => unreachable!(),
        }
    }
}

impl<'a> Element<'a> for i32 {
    const KIND: ElementKind = ElementKind::I32;

    #[inline]
    fn from_raw(raw: RawValue<'a>) -> Self {
        match raw {
            RawValue::Bits(b) => b as i32,
            RawValue::Bytes(_) => unreachable!(),
        }
    }
}

impl<'a> Element<'a> for i64 {
    const KIND: ElementKind = ElementKind::I64;

    #[inline]
    fn from_raw(raw: RawValue<'a>) -> Self {
        match raw {
            RawValue::Bits(b) => b as i64,
            RawValue::Bytes(_) => unreachable!(),
        }
    }
}

impl<'a> Element<'a> for f32 {
    const KIND: ElementKind = ElementKind::F32;

    #[inline]
    fn from_raw(raw: RawValue<'a>) -> Self {
        match raw {
            RawValue::Bits(b) => f32::from_bits(b as u32),
            RawValue::Bytes(_) => unreachable!(),
        }
    }
}

impl<'a> Element<'a> for f64 {
    const KIND: ElementKind = ElementKind::F64;

    #[inline]
    fn from_raw(raw: RawValue<'a>) -> Self {
        match raw {
            RawValue::Bits(b) => f64::from_bits(b),
            RawValue::Bytes(_) => unreachable!(),
        }
    }
}

impl<'a> Element<'a> for String {
    const KIND: ElementKind = ElementKind::Utf8;

    #[inline]
    fn from_raw(raw: RawValue<'a>) -> Self {
        match raw {
            RawValue::Bytes(s) => String::from_utf8_lossy(s).into_owned(),
            RawValue::Bits(_) => unreachable!(),
        }
    }
}

impl<'a> Element<'a> for Utf8View<'a> {
    const KIND: ElementKind = ElementKind::Utf8;

    #[inline]
    fn from_raw(raw: RawValue<'a>) -> Self {
        match raw {
            RawValue::Bytes(s) => Utf8View::from_bytes(s),
            RawValue::Bits(_) => unreachable!(),
        }
    }
}

/// Calendar timestamp, milliseconds since the Unix epoch, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTimeMillis(pub i64);

impl<'a> Element<'a> for DateTimeMillis {
    const KIND: ElementKind = ElementKind::I64;

    #[inline]
    fn from_raw(raw: RawValue<'a>) -> Self {
        DateTimeMillis(i64::from_raw(raw))
    }
}

/// Database-style timestamp, also epoch milliseconds; kept distinct from
/// [`DateTimeMillis`] so schemas can tell the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SqlTimestampMillis(pub i64);

impl<'a> Element<'a> for SqlTimestampMillis {
    const KIND: ElementKind = ElementKind::I64;

    #[inline]
    fn from_raw(raw: RawValue<'a>) -> Self {
        SqlTimestampMillis(i64::from_raw(raw))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Column handle
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Repr<'a> {
    Empty { len: usize },
    Prim(PrimitiveReader<'a>),
    ConstPrim(PrimitiveReader<'a>),
    Str(StringReader<'a>),
    ConstStr(ConstStringReader<'a>),
    Dict(DictStringReader<'a>),
}

/// Read handle over one encoded column.
///
/// Holds a non-owning view; the blob bytes must outlive the handle, which
/// the lifetime parameter enforces. Handles are `Copy` and safe to share
/// across threads.
pub struct Column<'a, T: Element<'a>> {
    repr: Repr<'a>,
    _elem: PhantomData<fn() -> T>,
}

// Manual impls: the handle is a view, copyable whether or not `T` is.
impl<'a, T: Element<'a>> Clone for Column<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: Element<'a>> Copy for Column<'a, T> {}

impl<'a, T: Element<'a>> core::fmt::Debug for Column<'a, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Column").field("repr", &self.repr).finish()
    }
}

/// Parse a blob into a typed column handle.
pub fn decode<'a, T: Element<'a>>(blob: &'a [u8]) -> Result<Column<'a, T>> {
    Column::parse(Some(blob), 0)
}

impl<'a, T: Element<'a>> Column<'a, T> {
    fn from_repr(repr: Repr<'a>) -> Self {
        Column { repr, _elem: PhantomData }
    }

    /// An empty column of `len` all-missing rows, with no backing blob.
    pub fn empty(len: usize) -> Self {
        Self::from_repr(Repr::Empty { len })
    }

    /// Parse an optional byte region. An absent region decodes as an empty
    /// column of `len_hint` rows.
    pub fn parse(region: Option<&'a [u8]>, len_hint: usize) -> Result<Self> {
        let blob = match region {
            Some(b) => b,
            None => return Ok(Self::empty(len_hint)),
        };
        let header = Header::read(blob)?;
        if header.major == MajorKind::Empty {
            return Ok(Self::empty(header.aux as usize));
        }

        let payload = &blob[HEADER_SIZE..];
        let root = Table::root(payload)?;
        let mismatch = || VectorError::TypeMismatch { header: header.encode() };

        let repr = match (header.major, header.sub) {
            (MajorKind::Simple, subtype::PRIMITIVE) => {
                if !(T::KIND.is_primitive() && T::KIND != ElementKind::Bool) {
                    return Err(mismatch());
                }
                Repr::Prim(PrimitiveReader::parse_simple(wire::simple_primitive::decode(&root)?)?)
            }
            (MajorKind::Simple, subtype::BOOL) => {
                if T::KIND != ElementKind::Bool {
                    return Err(mismatch());
                }
                Repr::Prim(PrimitiveReader::parse_simple(wire::simple_primitive::decode(&root)?)?)
            }
            (MajorKind::Simple, subtype::STRING) => {
                if T::KIND != ElementKind::Utf8 {
                    return Err(mismatch());
                }
                Repr::Str(StringReader::parse(wire::simple_string::decode(&root)?)?)
            }
            (MajorKind::Dict, subtype::STRING) => {
                if T::KIND != ElementKind::Utf8 {
                    return Err(mismatch());
                }
                Repr::Dict(DictStringReader::parse(wire::dict_string::decode(&root)?)?)
            }
            (MajorKind::Const, subtype::STRING) => {
                if T::KIND != ElementKind::Utf8 {
                    return Err(mismatch());
                }
                Repr::ConstStr(ConstStringReader::parse(wire::const_string::decode(&root)?)?)
            }
            (MajorKind::Const, subtype::PRIMITIVE) => {
                if !T::KIND.is_primitive() {
                    return Err(mismatch());
                }
                Repr::ConstPrim(PrimitiveReader::parse_const(wire::simple_primitive::decode(&root)?)?)
            }
            // Header::decode already rejected every other combination.
            _ => return Err(mismatch()),
        };
        Ok(Self::from_repr(repr))
    }

    /// Logical row count.
    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Empty { len } => *len,
            Repr::Prim(r) | Repr::ConstPrim(r) => r.len(),
            Repr::Str(r) => r.len(),
            Repr::ConstStr(r) => r.len(),
            Repr::Dict(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether row `i` holds a value. Callable for any `i < len()`.
    pub fn is_available(&self, i: usize) -> bool {
        match &self.repr {
            Repr::Empty { .. } => false,
            Repr::Prim(r) | Repr::ConstPrim(r) => r.is_present(i),
            Repr::Str(r) => r.is_present(i),
            Repr::ConstStr(r) => r.is_present(i),
            Repr::Dict(r) => r.is_present(i),
        }
    }

    #[inline]
    fn raw_at(&self, i: usize) -> RawValue<'a> {
        match &self.repr {
            Repr::Empty { .. } => {
                if T::KIND.is_primitive() {
                    RawValue::Bits(0)
                } else {
                    RawValue::Bytes(&[])
                }
            }
            Repr::Prim(r) => {
                if T::KIND.is_signed_int() {
                    RawValue::Bits(r.load_signed(i) as u64)
                } else {
                    RawValue::Bits(r.load(i))
                }
            }
            Repr::ConstPrim(r) => {
                if r.is_empty() {
                    RawValue::Bits(0)
                } else if T::KIND.is_signed_int() {
                    RawValue::Bits(r.load_const_signed() as u64)
                } else {
                    RawValue::Bits(r.load_const())
                }
            }
            Repr::Str(r) => RawValue::Bytes(r.get_bytes(i)),
            Repr::ConstStr(r) => RawValue::Bytes(r.get_bytes()),
            Repr::Dict(r) => RawValue::Bytes(r.get_bytes(i)),
        }
    }

    /// Element at row `i`. Unspecified when `is_available(i)` is false;
    /// panics only if `i >= len()` on a non-masked encoding.
    #[inline]
    pub fn get(&self, i: usize) -> T {
        T::from_raw(self.raw_at(i))
    }

    /// Bounds- and availability-checked element access.
    pub fn get_safe(&self, i: usize) -> Option<T> {
        if i < self.len() && self.is_available(i) {
            Some(self.get(i))
        } else {
            None
        }
    }

    /// Boxed element for dynamically typed interop; `None` when the row is
    /// missing or out of range.
    pub fn get_boxed(&self, i: usize) -> Option<Box<dyn Any>>
    where
        T: Any,
    {
        self.get_safe(i).map(|v| Box::new(v) as Box<dyn Any>)
    }

    /// Iterate over available values only. Missing rows are skipped; no
    /// allocation per element for zero-copy element types.
    pub fn iter(&self) -> AvailableIter<'_, 'a, T> {
        AvailableIter { col: self, idx: 0 }
    }

    /// Iterate over every row as `Option<T>`.
    pub fn iter_opt(&self) -> OptionIter<'_, 'a, T> {
        OptionIter { col: self, idx: 0 }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Iterators
// ─────────────────────────────────────────────────────────────────────────────

/// Yields the value of each available row in index order.
pub struct AvailableIter<'c, 'a, T: Element<'a>> {
    col: &'c Column<'a, T>,
    idx: usize,
}

impl<'c, 'a, T: Element<'a>> Iterator for AvailableIter<'c, 'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        while self.idx < self.col.len() {
            let i = self.idx;
            self.idx += 1;
            if self.col.is_available(i) {
                return Some(self.col.get(i));
            }
        }
        None
    }
}

/// Yields `Some(value)` or `None` for every row in index order.
pub struct OptionIter<'c, 'a, T: Element<'a>> {
    col: &'c Column<'a, T>,
    idx: usize,
}

impl<'c, 'a, T: Element<'a>> Iterator for OptionIter<'c, 'a, T> {
    type Item = Option<T>;

    fn next(&mut self) -> Option<Option<T>> {
        if self.idx >= self.col.len() {
            return None;
        }
        let i = self.idx;
        self.idx += 1;
        Some(if self.col.is_available(i) { Some(self.col.get(i)) } else { None })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.col.len() - self.idx;
        (rest, Some(rest))
    }
}
