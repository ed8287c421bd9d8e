//! Bounds-checked reader for the tagged-table payload layout.
//!
//! Every accessor returns `Result`: handle construction walks these once and
//! fails fast on truncation, so the hot element-read paths above can assume
//! the structure they captured is in bounds.

use crate::bytes::{try_read_le16, try_read_le32, try_read_le_i32, try_slice};
use crate::error::{Result, VectorError};

/// A table resolved inside a payload region.
#[derive(Debug, Clone, Copy)]
pub struct Table<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Table<'a> {
    /// Resolve the root table of a payload: a `u32` offset at the region
    /// start pointing at the table position.
    pub fn root(buf: &'a [u8]) -> Result<Self> {
        let off = try_read_le32(buf, 0)? as usize;
        let tab = Table { buf, pos: off };
        // Force the vtable walk once so a bogus root fails here, not later.
        tab.vtable()?;
        Ok(tab)
    }

    /// Locate this table's vtable: `(vtable_pos, vtable_size_bytes)`.
    fn vtable(&self) -> Result<(usize, usize)> {
        let soffset = try_read_le_i32(self.buf, self.pos)? as i64;
        let vt = (self.pos as i64) - soffset;
        if vt < 0 || vt as usize >= self.buf.len() {
            return Err(VectorError::TruncatedPayload);
        }
        let vt = vt as usize;
        let vt_size = try_read_le16(self.buf, vt)? as usize;
        let vt_end = vt.checked_add(vt_size).ok_or(VectorError::TruncatedPayload)?;
        if vt_size < 4 || vt_end > self.buf.len() {
            return Err(VectorError::TruncatedPayload);
        }
        Ok((vt, vt_size))
    }

    /// Absolute position of a field by table slot number, or `None` when the
    /// field is absent (zero vtable entry, or vtable too short).
    pub fn field_pos(&self, slot: u16) -> Result<Option<usize>> {
        let (vt, vt_size) = self.vtable()?;
        let entry = 4 + 2 * slot as usize;
        if entry + 2 > vt_size {
            return Ok(None);
        }
        let voff = try_read_le16(self.buf, vt + entry)? as usize;
        if voff == 0 {
            return Ok(None);
        }
        Ok(Some(self.pos + voff))
    }

    /// Inline `u8` scalar, or `default` when absent.
    pub fn u8_field(&self, slot: u16, default: u8) -> Result<u8> {
        match self.field_pos(slot)? {
            Some(p) => Ok(*self.buf.get(p).ok_or(VectorError::TruncatedPayload)?),
            None => Ok(default),
        }
    }

    /// Inline `i32` scalar, or `default` when absent.
    pub fn i32_field(&self, slot: u16, default: i32) -> Result<i32> {
        match self.field_pos(slot)? {
            Some(p) => try_read_le_i32(self.buf, p),
            None => Ok(default),
        }
    }

    /// Follow an indirect offset to a nested table.
    pub fn table_field(&self, slot: u16) -> Result<Option<Table<'a>>> {
        match self.field_pos(slot)? {
            Some(p) => {
                let target = p + try_read_le32(self.buf, p)? as usize;
                let tab = Table { buf: self.buf, pos: target };
                tab.vtable()?;
                Ok(Some(tab))
            }
            None => Ok(None),
        }
    }

    /// Position and element count of a vector field, without touching the
    /// element bytes. `elem_size` only scales the bounds check.
    fn vector_field(&self, slot: u16, elem_size: usize) -> Result<Option<(usize, usize)>> {
        match self.field_pos(slot)? {
            Some(p) => {
                let vec_pos = p + try_read_le32(self.buf, p)? as usize;
                let len = try_read_le32(self.buf, vec_pos)? as usize;
                let data = vec_pos + 4;
                let byte_len = len
                    .checked_mul(elem_size)
                    .ok_or(VectorError::TruncatedPayload)?;
                try_slice(self.buf, data, byte_len)?;
                Ok(Some((data, len)))
            }
            None => Ok(None),
        }
    }

    /// `[u8]` vector field as a raw byte slice.
    pub fn bytes_field(&self, slot: u16) -> Result<Option<&'a [u8]>> {
        match self.vector_field(slot, 1)? {
            Some((data, len)) => Ok(Some(&self.buf[data..data + len])),
            None => Ok(None),
        }
    }

    /// `[u64]` vector field as a raw byte slice plus word count. Words are
    /// read little-endian by the caller; keeping the slice untyped avoids
    /// alignment assumptions.
    pub fn u64_vector_field(&self, slot: u16) -> Result<Option<(&'a [u8], usize)>> {
        match self.vector_field(slot, 8)? {
            Some((data, len)) => Ok(Some((&self.buf[data..data + len * 8], len))),
            None => Ok(None),
        }
    }

    /// `string` field: UTF-8 bytes without the trailing NUL.
    pub fn string_field(&self, slot: u16) -> Result<Option<&'a [u8]>> {
        // Same layout as a byte vector; the NUL terminator sits past `len`.
        self.bytes_field(slot)
    }

    /// Vector-of-strings field: indexable forward offsets.
    pub fn string_vector_field(&self, slot: u16) -> Result<Option<VectorOfOffsets<'a>>> {
        match self.vector_field(slot, 4)? {
            Some((data, len)) => Ok(Some(VectorOfOffsets { buf: self.buf, data, len })),
            None => Ok(None),
        }
    }
}

/// A vector of forward offsets, each pointing at a length-prefixed string.
#[derive(Debug, Clone, Copy)]
pub struct VectorOfOffsets<'a> {
    buf: &'a [u8],
    data: usize,
    len: usize,
}

impl<'a> VectorOfOffsets<'a> {
    /// Element count.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes of the string at index `i`.
    pub fn bytes_at(&self, i: usize) -> Result<&'a [u8]> {
        if i >= self.len {
            return Err(VectorError::TruncatedPayload);
        }
        let elem = self.data + 4 * i;
        let target = elem + try_read_le32(self.buf, elem)? as usize;
        let slen = try_read_le32(self.buf, target)? as usize;
        try_slice(self.buf, target + 4, slen)
    }

    /// Walk every element once; used at handle construction to push
    /// truncation failures to parse time.
    pub fn validate(&self) -> Result<()> {
        for i in 0..self.len {
            self.bytes_at(i)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::build::TableBuilder;

    // Build-then-read lives here so the two halves are tested against each
    // other rather than against hand-written buffers alone.

    #[test]
    fn scalar_slots_roundtrip() {
        let mut b = TableBuilder::with_buffer(Vec::new());
        b.start_table();
        b.push_slot_i32(0, 12345, 0);
        b.push_slot_u8(2, 16, 0);
        let t = b.end_table();
        let range = b.finish(t);
        let buf = b.buffer();
        let payload = &buf[range];

        let root = Table::root(payload).unwrap();
        assert_eq!(root.i32_field(0, 0).unwrap(), 12345);
        assert_eq!(root.u8_field(2, 0).unwrap(), 16);
        // Slot 1 was never written: default comes back.
        assert_eq!(root.i32_field(1, -7).unwrap(), -7);
        assert_eq!(root.field_pos(1).unwrap(), None);
        // Slots past the vtable are absent, not an error.
        assert_eq!(root.field_pos(9).unwrap(), None);
    }

    #[test]
    fn default_valued_slots_are_omitted() {
        let mut b = TableBuilder::with_buffer(Vec::new());
        b.start_table();
        b.push_slot_i32(0, 0, 0);
        b.push_slot_u8(1, 5, 5);
        let t = b.end_table();
        let range = b.finish(t);
        let buf = b.buffer();
        let root = Table::root(&buf[range]).unwrap();
        assert_eq!(root.field_pos(0).unwrap(), None);
        assert_eq!(root.field_pos(1).unwrap(), None);
        assert_eq!(root.u8_field(1, 5).unwrap(), 5);
    }

    #[test]
    fn byte_vector_roundtrip() {
        let mut b = TableBuilder::with_buffer(Vec::new());
        let data = b.create_byte_vector(&[1, 2, 3, 4, 5], 1);
        b.start_table();
        b.push_slot_loc(3, data);
        let t = b.end_table();
        let range = b.finish(t);
        let buf = b.buffer();
        let root = Table::root(&buf[range]).unwrap();
        assert_eq!(root.bytes_field(3).unwrap().unwrap(), &[1, 2, 3, 4, 5]);
        assert_eq!(root.bytes_field(0).unwrap(), None);
    }

    #[test]
    fn u64_vector_alignment_and_roundtrip() {
        let mut b = TableBuilder::with_buffer(Vec::new());
        let words = b.create_u64_vector(&[u64::MAX, 1, 0x0123_4567_89AB_CDEF]);
        b.start_table();
        b.push_slot_loc(1, words);
        let t = b.end_table();
        let range = b.finish(t);
        let buf = b.buffer();
        let payload = &buf[range];
        let root = Table::root(payload).unwrap();
        let (raw, n) = root.u64_vector_field(1).unwrap().unwrap();
        assert_eq!(n, 3);
        assert_eq!(crate::bytes::read_le64(raw, 0), u64::MAX);
        assert_eq!(crate::bytes::read_le64(raw, 8), 1);
        assert_eq!(crate::bytes::read_le64(raw, 16), 0x0123_4567_89AB_CDEF);
        // Word data is 8-aligned within the payload.
        let data_off = raw.as_ptr() as usize - payload.as_ptr() as usize;
        assert_eq!(data_off % 8, 0);
    }

    #[test]
    fn string_vector_roundtrip() {
        let mut b = TableBuilder::with_buffer(Vec::new());
        let locs: Vec<_> = ["apple", "", "apricot"]
            .iter()
            .map(|s| b.create_string(s))
            .collect();
        let vec = b.create_loc_vector(&locs);
        b.start_table();
        b.push_slot_loc(2, vec);
        let t = b.end_table();
        let range = b.finish(t);
        let buf = b.buffer();
        let root = Table::root(&buf[range]).unwrap();
        let v = root.string_vector_field(2).unwrap().unwrap();
        assert_eq!(v.len(), 3);
        assert_eq!(v.bytes_at(0).unwrap(), b"apple");
        assert_eq!(v.bytes_at(1).unwrap(), b"");
        assert_eq!(v.bytes_at(2).unwrap(), b"apricot");
        assert!(v.bytes_at(3).is_err());
        v.validate().unwrap();
    }

    #[test]
    fn nested_table_roundtrip() {
        let mut b = TableBuilder::with_buffer(Vec::new());
        b.start_table();
        b.push_slot_u8(0, 2, 0);
        let inner = b.end_table();
        b.start_table();
        b.push_slot_i32(0, 99, 0);
        b.push_slot_loc(1, inner);
        let outer = b.end_table();
        let range = b.finish(outer);
        let buf = b.buffer();
        let root = Table::root(&buf[range]).unwrap();
        assert_eq!(root.i32_field(0, 0).unwrap(), 99);
        let nested = root.table_field(1).unwrap().unwrap();
        assert_eq!(nested.u8_field(0, 0).unwrap(), 2);
        assert_eq!(root.table_field(2).unwrap().map(|_| ()), None);
    }

    #[test]
    fn truncated_buffers_fail_fast() {
        let mut b = TableBuilder::with_buffer(Vec::new());
        b.start_table();
        b.push_slot_i32(0, 7, 0);
        let t = b.end_table();
        let range = b.finish(t);
        let buf = b.buffer();
        let payload = &buf[range];
        // Every strict prefix must error, never panic.
        for cut in 0..payload.len() {
            let _ = Table::root(&payload[..cut]);
        }
        assert!(Table::root(&[]).is_err());
        assert!(Table::root(&[0xFF, 0xFF, 0xFF, 0xFF]).is_err());
    }
}
