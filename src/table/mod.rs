//! Minimal tagged-table layout used by vector payloads.
//!
//! The layout is FlatBuffers-compatible: a root `u32` offset, tables that
//! point back at a vtable of per-slot `u16` offsets, inline little-endian
//! scalars, and forward `u32` offsets to nested tables, vectors, and
//! length-prefixed strings. Only the subset the vector payloads need is
//! implemented: no unions, no structs, no shared vtables.
//!
//! [`read::Table`] is the bounds-checked reader; [`build::TableBuilder`] is
//! the back-to-front builder. Offsets inside the builder are measured from
//! the end of the buffer so they stay stable while the buffer grows.

pub mod build;
pub mod read;

pub use build::{Loc, TableBuilder};
pub use read::{Table, VectorOfOffsets};
