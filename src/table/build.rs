//! Back-to-front builder for the tagged-table payload layout.
//!
//! Data grows from the end of the buffer toward the front, the way the
//! layout's reference builders work: a child object is always finished
//! before anything that refers to it, so every reference is a forward
//! offset in the final byte order. Positions are tracked as [`Loc`] values —
//! distances from the end of the buffer — which stay valid when the buffer
//! grows.
//!
//! The builder borrows its backing `Vec<u8>` from the caller and hands it
//! back via [`TableBuilder::into_buffer`], so one thread can reuse a single
//! scratch allocation across many encodings. The finished payload is
//! `buffer()[finish(..)]`; callers copy it into a fresh blob.

use std::ops::Range;

use crate::bytes::write_le32;

/// Position of a finished object, measured from the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loc(u32);

/// Builder state. Usage: create child objects (vectors, strings, nested
/// tables) first, then `start_table` / `push_slot_*` / `end_table`, then
/// `finish` with the root. Creating child objects between `start_table` and
/// `end_table` is a contract violation (checked in debug builds).
pub struct TableBuilder {
    buf: Vec<u8>,
    head: usize,
    min_align: usize,
    field_locs: Vec<(u16, u32)>,
    table_start_used: usize,
    in_table: bool,
}

const INITIAL_SIZE: usize = 64 * 1024;

impl TableBuilder {
    /// Wrap a reusable backing buffer. The buffer's contents are discarded;
    /// its allocation is kept and grown as needed.
    pub fn with_buffer(mut buf: Vec<u8>) -> Self {
        let size = buf.capacity().max(INITIAL_SIZE);
        buf.clear();
        buf.resize(size, 0);
        let head = buf.len();
        TableBuilder {
            buf,
            head,
            min_align: 1,
            field_locs: Vec::new(),
            table_start_used: 0,
            in_table: false,
        }
    }

    /// Bytes written so far; also the [`Loc`] of the most recent push.
    #[inline]
    fn used(&self) -> usize {
        self.buf.len() - self.head
    }

    /// Reclaim the backing buffer (retaining any growth) for reuse.
    pub fn into_buffer(self) -> Vec<u8> {
        self.buf
    }

    /// The backing buffer; the finished payload is the range returned by
    /// [`TableBuilder::finish`].
    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    // ── low-level pushes ─────────────────────────────────────────────────────

    /// Make room for `n` more bytes at the front, sliding existing data to
    /// the new end. End-relative `Loc`s survive the move.
    fn ensure(&mut self, n: usize) {
        if self.head >= n {
            return;
        }
        let old_len = self.buf.len();
        let used = self.used();
        let mut new_len = (old_len.max(INITIAL_SIZE)) * 2;
        while new_len < used + n {
            new_len *= 2;
        }
        self.buf.resize(new_len, 0);
        self.buf.copy_within(old_len - used..old_len, new_len - used);
        self.head = new_len - used;
    }

    fn push_bytes(&mut self, data: &[u8]) {
        self.ensure(data.len());
        self.head -= data.len();
        self.buf[self.head..self.head + data.len()].copy_from_slice(data);
    }

    fn push_zeros(&mut self, n: usize) {
        self.ensure(n);
        self.head -= n;
        self.buf[self.head..self.head + n].fill(0);
    }

    /// Pad so that after `upcoming` more bytes are pushed, the write cursor
    /// lands on a multiple of `align` (a power of two). The final payload is
    /// padded to the largest alignment requested, which turns end-relative
    /// alignment into start-relative alignment.
    fn align_before(&mut self, upcoming: usize, align: usize) {
        self.min_align = self.min_align.max(align);
        let pad = align - 1 - ((self.used() + upcoming + align - 1) % align);
        if pad > 0 {
            self.push_zeros(pad);
        }
    }

    fn push_u16(&mut self, v: u16) {
        self.push_bytes(&v.to_le_bytes());
    }

    fn push_u32(&mut self, v: u32) {
        self.push_bytes(&v.to_le_bytes());
    }

    // ── child objects ────────────────────────────────────────────────────────

    /// Length-prefixed byte vector whose data is aligned to `elem_align`.
    pub fn create_byte_vector(&mut self, data: &[u8], elem_align: usize) -> Loc {
        debug_assert!(!self.in_table, "child objects must precede start_table");
        self.align_before(data.len(), elem_align.max(4));
        self.push_bytes(data);
        self.push_u32(data.len() as u32);
        Loc(self.used() as u32)
    }

    /// Vector of `u64` words, 8-aligned, length counted in words.
    pub fn create_u64_vector(&mut self, words: &[u64]) -> Loc {
        debug_assert!(!self.in_table, "child objects must precede start_table");
        self.align_before(words.len() * 8, 8);
        for w in words.iter().rev() {
            self.push_bytes(&w.to_le_bytes());
        }
        self.push_u32(words.len() as u32);
        Loc(self.used() as u32)
    }

    /// Length-prefixed, NUL-terminated string. The prefix length excludes
    /// the terminator.
    pub fn create_string(&mut self, s: &str) -> Loc {
        self.create_string_bytes(s.as_bytes())
    }

    /// As [`TableBuilder::create_string`] for pre-validated UTF-8 bytes.
    pub fn create_string_bytes(&mut self, s: &[u8]) -> Loc {
        debug_assert!(!self.in_table, "child objects must precede start_table");
        self.align_before(s.len() + 1, 4);
        self.push_zeros(1);
        self.push_bytes(s);
        self.push_u32(s.len() as u32);
        Loc(self.used() as u32)
    }

    /// Vector of forward offsets to already-created objects.
    pub fn create_loc_vector(&mut self, locs: &[Loc]) -> Loc {
        debug_assert!(!self.in_table, "child objects must precede start_table");
        self.align_before(locs.len() * 4, 4);
        for loc in locs.iter().rev() {
            let here = (self.used() + 4) as u32;
            self.push_u32(here - loc.0);
        }
        self.push_u32(locs.len() as u32);
        Loc(self.used() as u32)
    }

    // ── tables ───────────────────────────────────────────────────────────────

    pub fn start_table(&mut self) {
        debug_assert!(!self.in_table, "tables do not nest inline");
        self.field_locs.clear();
        self.table_start_used = self.used();
        self.in_table = true;
    }

    /// Inline `u8` slot; omitted when equal to `default`.
    pub fn push_slot_u8(&mut self, slot: u16, value: u8, default: u8) {
        if value == default {
            return;
        }
        self.push_bytes(&[value]);
        self.field_locs.push((slot, self.used() as u32));
    }

    /// Inline `i32` slot; omitted when equal to `default`.
    pub fn push_slot_i32(&mut self, slot: u16, value: i32, default: i32) {
        if value == default {
            return;
        }
        self.align_before(4, 4);
        self.push_bytes(&value.to_le_bytes());
        self.field_locs.push((slot, self.used() as u32));
    }

    /// Offset slot referring to a previously created object.
    pub fn push_slot_loc(&mut self, slot: u16, loc: Loc) {
        self.align_before(4, 4);
        let here = (self.used() + 4) as u32;
        self.push_u32(here - loc.0);
        self.field_locs.push((slot, here));
    }

    /// Close the current table: write its vtable and the back-reference to
    /// it, returning the table's location.
    pub fn end_table(&mut self) -> Loc {
        debug_assert!(self.in_table, "end_table without start_table");
        self.in_table = false;

        // Table position word (patched below once the vtable location is
        // known).
        self.align_before(4, 4);
        self.push_u32(0);
        let table_loc = self.used();

        let nslots = self
            .field_locs
            .iter()
            .map(|&(slot, _)| slot as usize + 1)
            .max()
            .unwrap_or(0);
        let vt_size = 4 + 2 * nslots;
        let table_size = table_loc - self.table_start_used;
        debug_assert!(table_size <= u16::MAX as usize);

        // Slot entries, highest slot first so slot 0 ends up adjacent to the
        // vtable header.
        for slot in (0..nslots).rev() {
            let voff = self
                .field_locs
                .iter()
                .find(|&&(s, _)| s as usize == slot)
                .map(|&(_, loc)| table_loc as u32 - loc)
                .unwrap_or(0);
            debug_assert!(voff <= u16::MAX as u32);
            self.push_u16(voff as u16);
        }
        self.push_u16(table_size as u16);
        self.push_u16(vt_size as u16);
        let vtable_loc = self.used();

        // Patch the table word: distance from the table back to its vtable.
        let pos = self.buf.len() - table_loc;
        write_le32(&mut self.buf, pos, (vtable_loc - table_loc) as u32);
        Loc(table_loc as u32)
    }

    /// Write the root offset and return the finished payload range within
    /// [`TableBuilder::buffer`].
    pub fn finish(&mut self, root: Loc) -> Range<usize> {
        let align = self.min_align.max(4);
        self.align_before(4, align);
        let here = (self.used() + 4) as u32;
        self.push_u32(here - root.0);
        self.head..self.buf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_preserving_tail_data() {
        let mut b = TableBuilder::with_buffer(Vec::new());
        // Push more than the initial 64 KiB so the buffer must grow.
        let big = vec![0xABu8; INITIAL_SIZE];
        let v1 = b.create_byte_vector(&big, 1);
        let v2 = b.create_byte_vector(&[1, 2, 3], 1);
        b.start_table();
        b.push_slot_loc(0, v1);
        b.push_slot_loc(1, v2);
        let t = b.end_table();
        let range = b.finish(t);
        let payload = &b.buffer()[range];
        let root = crate::table::Table::root(payload).unwrap();
        assert_eq!(root.bytes_field(0).unwrap().unwrap().len(), INITIAL_SIZE);
        assert_eq!(root.bytes_field(1).unwrap().unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn buffer_is_reusable_and_retained() {
        let mut b = TableBuilder::with_buffer(Vec::new());
        let v = b.create_byte_vector(&[9; 100], 1);
        b.start_table();
        b.push_slot_loc(0, v);
        let t = b.end_table();
        let _ = b.finish(t);
        let buf = b.into_buffer();
        let cap = buf.capacity();
        assert!(cap >= INITIAL_SIZE);

        // Second encoding on the same buffer: no reallocation required.
        let mut b = TableBuilder::with_buffer(buf);
        let v = b.create_byte_vector(&[7; 100], 1);
        b.start_table();
        b.push_slot_loc(0, v);
        let t = b.end_table();
        let range = b.finish(t);
        let root = crate::table::Table::root(&b.buffer()[range]).unwrap();
        assert_eq!(root.bytes_field(0).unwrap().unwrap(), &[7u8; 100][..]);
        assert_eq!(b.into_buffer().capacity(), cap);
    }

    #[test]
    fn payload_size_is_multiple_of_max_alignment() {
        let mut b = TableBuilder::with_buffer(Vec::new());
        let words = b.create_u64_vector(&[1, 2, 3]);
        b.start_table();
        b.push_slot_loc(0, words);
        let t = b.end_table();
        let range = b.finish(t);
        assert_eq!(range.len() % 8, 0);
    }
}
