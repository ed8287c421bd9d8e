//! String payload readers: simple, constant, and dictionary-coded.
//!
//! All three hand out raw byte slices; the element layer decides whether to
//! wrap them zero-copy or copy into an owned `String`. Structural checks run
//! once at construction (every string offset is walked), after which the
//! byte accessors are total: anything that would land out of bounds yields
//! an empty slice instead of panicking, which only ever happens for masked
//! positions or corrupt data.

use crate::column::primitive::PrimitiveReader;
use crate::error::{Result, VectorError};
use crate::namask::NaMask;
use crate::table::VectorOfOffsets;
use crate::wire::{const_string, dict_string, simple_string};

// ─────────────────────────────────────────────────────────────────────────────
// Simple
// ─────────────────────────────────────────────────────────────────────────────

/// Reader over a `SimpleStringVector` payload.
#[derive(Debug, Clone, Copy)]
pub struct StringReader<'a> {
    len: usize,
    na: NaMask<'a>,
    data: VectorOfOffsets<'a>,
}

impl<'a> StringReader<'a> {
    pub fn parse(parts: simple_string::Parts<'a>) -> Result<Self> {
        if parts.data.len() != parts.len {
            return Err(VectorError::LengthMismatch {
                declared: parts.len,
                actual: parts.data.len(),
            });
        }
        parts.data.validate()?;
        Ok(StringReader { len: parts.len, na: parts.na, data: parts.data })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_present(&self, i: usize) -> bool {
        self.na.is_present(i)
    }

    /// Bytes of the string at row `i`.
    #[inline]
    pub fn get_bytes(&self, i: usize) -> &'a [u8] {
        self.data.bytes_at(i).unwrap_or(&[])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Constant
// ─────────────────────────────────────────────────────────────────────────────

/// Reader over a `ConstStringVector` payload: one stored value, any length.
#[derive(Debug, Clone, Copy)]
pub struct ConstStringReader<'a> {
    len: usize,
    na: NaMask<'a>,
    value: &'a [u8],
}

impl<'a> ConstStringReader<'a> {
    pub fn parse(parts: const_string::Parts<'a>) -> Result<Self> {
        Ok(ConstStringReader { len: parts.len, na: parts.na, value: parts.value })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_present(&self, i: usize) -> bool {
        self.na.is_present(i)
    }

    #[inline]
    pub fn get_bytes(&self) -> &'a [u8] {
        self.value
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dictionary
// ─────────────────────────────────────────────────────────────────────────────

/// Reader over a `DictStringVector` payload: packed codes indexing an
/// ordered dictionary of distinct values.
#[derive(Debug, Clone, Copy)]
pub struct DictStringReader<'a> {
    len: usize,
    na: NaMask<'a>,
    codes: PrimitiveReader<'a>,
    dict: VectorOfOffsets<'a>,
}

impl<'a> DictStringReader<'a> {
    pub fn parse(parts: dict_string::Parts<'a>) -> Result<Self> {
        let codes = PrimitiveReader::parse_simple(parts.codes)?;
        if codes.len() != parts.len {
            return Err(VectorError::LengthMismatch {
                declared: parts.len,
                actual: codes.len(),
            });
        }
        parts.dict.validate()?;
        Ok(DictStringReader { len: parts.len, na: parts.na, codes, dict: parts.dict })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_present(&self, i: usize) -> bool {
        self.na.is_present(i)
    }

    /// Packed code width in bits.
    #[inline]
    pub fn code_nbits(&self) -> u8 {
        self.codes.nbits()
    }

    /// Distinct-value count.
    #[inline]
    pub fn dict_len(&self) -> usize {
        self.dict.len()
    }

    /// Bytes of the dictionary entry the code at row `i` selects. A masked
    /// row's code is unspecified; an out-of-dictionary code reads empty.
    #[inline]
    pub fn get_bytes(&self, i: usize) -> &'a [u8] {
        let code = self.codes.load(i) as usize;
        self.dict.bytes_at(code).unwrap_or(&[])
    }
}
