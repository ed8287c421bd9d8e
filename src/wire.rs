//! Fixed payload-table schemas.
//!
//! One module per table keeps every slot number in a single place; the
//! column readers and the encoders both go through these helpers, so the
//! two sides cannot drift apart.
//!
//! Tables and slots:
//!
//! | table                 | 0       | 1      | 2              | 3           |
//! |-----------------------|---------|--------|----------------|-------------|
//! | NaMask                | maskType| bitMask| —              | —           |
//! | SimplePrimitiveVector | len     | naMask | nbits          | data `[u8]` |
//! | SimpleStringVector    | len     | naMask | data `[string]`| —           |
//! | ConstStringVector     | len     | naMask | str            | —           |
//! | DictStringVector      | len     | naMask | info (codes)   | dict        |

use crate::error::{Result, VectorError};
use crate::namask::{mask_type, NaBitset, NaMask};
use crate::table::{Loc, Table, TableBuilder, VectorOfOffsets};

/// Row counts travel as `i32`; anything negative is corrupt.
fn vector_len(raw: i32) -> Result<usize> {
    usize::try_from(raw).map_err(|_| VectorError::LengthMismatch { declared: 0, actual: 0 })
}

// ─────────────────────────────────────────────────────────────────────────────
// NaMask
// ─────────────────────────────────────────────────────────────────────────────

pub mod na_mask {
    use super::*;

    pub const MASK_TYPE: u16 = 0;
    pub const BIT_MASK: u16 = 1;

    /// Decode the `naMask` field of `parent` at `slot`. An absent field is
    /// the all-present mask.
    pub fn decode<'a>(parent: &Table<'a>, slot: u16) -> Result<NaMask<'a>> {
        let table = match parent.table_field(slot)? {
            Some(t) => t,
            None => return Ok(NaMask::AllZeroes),
        };
        match table.u8_field(MASK_TYPE, mask_type::ALL_ZEROES)? {
            mask_type::ALL_ZEROES => Ok(NaMask::AllZeroes),
            mask_type::ALL_ONES => Ok(NaMask::AllOnes),
            mask_type::SIMPLE_BIT_MASK => {
                let words = table
                    .u64_vector_field(BIT_MASK)?
                    .map(|(bytes, _)| bytes)
                    .unwrap_or(&[]);
                Ok(NaMask::Bitmap(words))
            }
            other => Err(VectorError::MalformedHeader { raw: other as u32 }),
        }
    }

    /// Build the mask table for a staged column. Returns `None` when every
    /// position is present so the caller can omit the field entirely.
    pub fn build(b: &mut TableBuilder, na: &NaBitset) -> Option<Loc> {
        if na.none_missing() {
            return None;
        }
        if na.all_missing() {
            b.start_table();
            b.push_slot_u8(MASK_TYPE, mask_type::ALL_ONES, mask_type::ALL_ZEROES);
            return Some(b.end_table());
        }
        let words = b.create_u64_vector(na.words());
        b.start_table();
        b.push_slot_u8(MASK_TYPE, mask_type::SIMPLE_BIT_MASK, mask_type::ALL_ZEROES);
        b.push_slot_loc(BIT_MASK, words);
        Some(b.end_table())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SimplePrimitiveVector
// ─────────────────────────────────────────────────────────────────────────────

pub mod simple_primitive {
    use super::*;

    pub const LEN: u16 = 0;
    pub const NA_MASK: u16 = 1;
    pub const NBITS: u16 = 2;
    pub const DATA: u16 = 3;

    pub struct Parts<'a> {
        pub len: usize,
        pub na: NaMask<'a>,
        pub nbits: u8,
        pub data: &'a [u8],
    }

    /// Structural decode; bit-width legality and data sizing are checked by
    /// the primitive reader, which knows how many values are stored.
    pub fn decode<'a>(table: &Table<'a>) -> Result<Parts<'a>> {
        let len = vector_len(table.i32_field(LEN, 0)?)?;
        Ok(Parts {
            len,
            na: na_mask::decode(table, NA_MASK)?,
            nbits: table.u8_field(NBITS, 0)?,
            data: table.bytes_field(DATA)?.unwrap_or(&[]),
        })
    }

    /// Build the table around already-encoded packed bytes.
    pub fn build(
        b: &mut TableBuilder,
        len: usize,
        na: &NaBitset,
        nbits: u8,
        packed: &[u8],
    ) -> Loc {
        let data = b.create_byte_vector(packed, (nbits as usize / 8).max(1));
        let mask = na_mask::build(b, na);
        b.start_table();
        b.push_slot_i32(LEN, len as i32, 0);
        if let Some(m) = mask {
            b.push_slot_loc(NA_MASK, m);
        }
        b.push_slot_u8(NBITS, nbits, 0);
        b.push_slot_loc(DATA, data);
        b.end_table()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SimpleStringVector
// ─────────────────────────────────────────────────────────────────────────────

pub mod simple_string {
    use super::*;

    pub const LEN: u16 = 0;
    pub const NA_MASK: u16 = 1;
    pub const DATA: u16 = 2;

    pub struct Parts<'a> {
        pub len: usize,
        pub na: NaMask<'a>,
        pub data: VectorOfOffsets<'a>,
    }

    pub fn decode<'a>(table: &Table<'a>) -> Result<Parts<'a>> {
        let len = vector_len(table.i32_field(LEN, 0)?)?;
        let data = table
            .string_vector_field(DATA)?
            .ok_or(VectorError::TruncatedPayload)?;
        Ok(Parts { len, na: na_mask::decode(table, NA_MASK)?, data })
    }

    /// Build from UTF-8 byte strings; missing positions store empty strings
    /// so indexes stay aligned with rows.
    pub fn build<'v>(
        b: &mut TableBuilder,
        len: usize,
        na: &NaBitset,
        strings: impl Iterator<Item = &'v [u8]>,
    ) -> Loc {
        let locs: Vec<Loc> = strings.map(|s| b.create_string_bytes(s)).collect();
        let data = b.create_loc_vector(&locs);
        let mask = na_mask::build(b, na);
        b.start_table();
        b.push_slot_i32(LEN, len as i32, 0);
        if let Some(m) = mask {
            b.push_slot_loc(NA_MASK, m);
        }
        b.push_slot_loc(DATA, data);
        b.end_table()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ConstStringVector
// ─────────────────────────────────────────────────────────────────────────────

pub mod const_string {
    use super::*;

    pub const LEN: u16 = 0;
    pub const NA_MASK: u16 = 1;
    pub const STR: u16 = 2;

    pub struct Parts<'a> {
        pub len: usize,
        pub na: NaMask<'a>,
        pub value: &'a [u8],
    }

    pub fn decode<'a>(table: &Table<'a>) -> Result<Parts<'a>> {
        let len = vector_len(table.i32_field(LEN, 0)?)?;
        Ok(Parts {
            len,
            na: na_mask::decode(table, NA_MASK)?,
            value: table.string_field(STR)?.unwrap_or(&[]),
        })
    }

    pub fn build(b: &mut TableBuilder, len: usize, na: &NaBitset, value: &[u8]) -> Loc {
        let s = b.create_string_bytes(value);
        let mask = na_mask::build(b, na);
        b.start_table();
        b.push_slot_i32(LEN, len as i32, 0);
        if let Some(m) = mask {
            b.push_slot_loc(NA_MASK, m);
        }
        b.push_slot_loc(STR, s);
        b.end_table()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DictStringVector
// ─────────────────────────────────────────────────────────────────────────────

pub mod dict_string {
    use super::*;

    pub const LEN: u16 = 0;
    pub const NA_MASK: u16 = 1;
    pub const INFO: u16 = 2;
    pub const DICT: u16 = 3;

    pub struct Parts<'a> {
        pub len: usize,
        pub na: NaMask<'a>,
        pub codes: simple_primitive::Parts<'a>,
        pub dict: VectorOfOffsets<'a>,
    }

    pub fn decode<'a>(table: &Table<'a>) -> Result<Parts<'a>> {
        let len = vector_len(table.i32_field(LEN, 0)?)?;
        let info = table
            .table_field(INFO)?
            .ok_or(VectorError::TruncatedPayload)?;
        let dict = table
            .string_vector_field(DICT)?
            .ok_or(VectorError::TruncatedPayload)?;
        Ok(Parts {
            len,
            na: na_mask::decode(table, NA_MASK)?,
            codes: simple_primitive::decode(&info)?,
            dict,
        })
    }

    /// Build around pre-packed code bytes and the ordered dictionary.
    pub fn build<'v>(
        b: &mut TableBuilder,
        len: usize,
        na: &NaBitset,
        code_nbits: u8,
        packed_codes: &[u8],
        dict: impl Iterator<Item = &'v [u8]>,
    ) -> Loc {
        let info = simple_primitive::build(b, len, &NaBitset::new(), code_nbits, packed_codes);
        let locs: Vec<Loc> = dict.map(|s| b.create_string_bytes(s)).collect();
        let dict_vec = b.create_loc_vector(&locs);
        let mask = na_mask::build(b, na);
        b.start_table();
        b.push_slot_i32(LEN, len as i32, 0);
        if let Some(m) = mask {
            b.push_slot_loc(NA_MASK, m);
        }
        b.push_slot_loc(INFO, info);
        b.push_slot_loc(DICT, dict_vec);
        b.end_table()
    }
}
