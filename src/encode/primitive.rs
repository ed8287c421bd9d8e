//! Integer, float, and boolean column encoders.
//!
//! Integers pack at the smallest width in {8, 16, 32, 64} whose signed range
//! covers the observed `[min, max]`; booleans pack one bit per row; floats
//! keep their natural width. Missing rows pack a zero placeholder that the
//! NA mask hides from readers.

use crate::encode::{build_blob, check_staging, encode_all_missing, encode_empty};
use crate::error::Result;
use crate::header::{subtype, Header, MajorKind};
use crate::namask::NaBitset;
use crate::wire::simple_primitive;

/// Smallest supported width whose signed range covers `[min, max]`.
fn nbits_for_range(min: i64, max: i64) -> u8 {
    if min >= i8::MIN as i64 && max <= i8::MAX as i64 {
        8
    } else if min >= i16::MIN as i64 && max <= i16::MAX as i64 {
        16
    } else if min >= i32::MIN as i64 && max <= i32::MAX as i64 {
        32
    } else {
        64
    }
}

/// Truncating little-endian pack of one value at `nbits`.
fn push_packed(out: &mut Vec<u8>, bits: u64, nbits: u8) {
    match nbits {
        8 => out.push(bits as u8),
        16 => out.extend_from_slice(&(bits as u16).to_le_bytes()),
        32 => out.extend_from_slice(&(bits as u32).to_le_bytes()),
        64 => out.extend_from_slice(&bits.to_le_bytes()),
        _ => unreachable!(),
    }
}

/// Scan results over the present rows of a staged column.
struct Scan {
    first: i64,
    all_equal: bool,
    min: i64,
    max: i64,
}

fn scan_present(values: &[i64], na: &NaBitset) -> Option<Scan> {
    let mut scan: Option<Scan> = None;
    for (i, &v) in values.iter().enumerate() {
        if na.is_missing(i) {
            continue;
        }
        match scan.as_mut() {
            None => scan = Some(Scan { first: v, all_equal: true, min: v, max: v }),
            Some(s) => {
                s.all_equal &= v == s.first;
                s.min = s.min.min(v);
                s.max = s.max.max(v);
            }
        }
    }
    scan
}

/// The constant-vector blob shared by the integer paths.
fn const_primitive_blob(len: usize, na: &NaBitset, nbits: u8, bits: u64) -> Vec<u8> {
    let mut packed = Vec::with_capacity(8);
    push_packed(&mut packed, bits, nbits);
    build_blob(
        Header::new(MajorKind::Const, subtype::PRIMITIVE, 0),
        |b| simple_primitive::build(b, len, na, nbits, &packed),
    )
}

fn simple_primitive_blob(sub: u8, len: usize, na: &NaBitset, nbits: u8, packed: &[u8]) -> Vec<u8> {
    build_blob(Header::new(MajorKind::Simple, sub, 0), |b| {
        simple_primitive::build(b, len, na, nbits, packed)
    })
}

fn encode_ints(values: &[i64], na: &NaBitset) -> Vec<u8> {
    let n = values.len();
    if n == 0 {
        return encode_empty(0);
    }
    if let Some(blob) = encode_all_missing(na, || const_primitive_blob(n, na, 8, 0)) {
        return blob;
    }
    // At least one present row from here on.
    let scan = scan_present(values, na).unwrap_or(Scan {
        first: 0,
        all_equal: true,
        min: 0,
        max: 0,
    });
    if scan.all_equal {
        let nbits = nbits_for_range(scan.first, scan.first);
        return const_primitive_blob(n, na, nbits, scan.first as u64);
    }
    let nbits = nbits_for_range(scan.min, scan.max);
    let mut packed = Vec::with_capacity(n * nbits as usize / 8);
    for (i, &v) in values.iter().enumerate() {
        let bits = if na.is_missing(i) { 0 } else { v as u64 };
        push_packed(&mut packed, bits, nbits);
    }
    simple_primitive_blob(subtype::PRIMITIVE, n, na, nbits, &packed)
}

/// Encode a staged `i32` column.
pub fn encode_i32(values: &[i32], na: &NaBitset) -> Result<Vec<u8>> {
    check_staging(values.len(), na)?;
    let widened: Vec<i64> = values.iter().map(|&v| v as i64).collect();
    Ok(encode_ints(&widened, na))
}

/// Encode a staged `i64` column.
pub fn encode_i64(values: &[i64], na: &NaBitset) -> Result<Vec<u8>> {
    check_staging(values.len(), na)?;
    Ok(encode_ints(values, na))
}

/// Encode a staged boolean column: one bit per row.
pub fn encode_bool(values: &[bool], na: &NaBitset) -> Result<Vec<u8>> {
    check_staging(values.len(), na)?;
    let n = values.len();
    if n == 0 {
        return Ok(encode_empty(0));
    }
    if let Some(blob) = encode_all_missing(na, || const_primitive_blob(n, na, 1, 0)) {
        return Ok(blob);
    }
    let mut first = None;
    let mut all_equal = true;
    for (i, &v) in values.iter().enumerate() {
        if na.is_missing(i) {
            continue;
        }
        match first {
            None => first = Some(v),
            Some(f) => all_equal &= v == f,
        }
    }
    let first = first.unwrap_or(false);
    if all_equal {
        return Ok(const_primitive_blob(n, na, 1, first as u64));
    }
    let mut packed = vec![0u8; n.div_ceil(8)];
    for (i, &v) in values.iter().enumerate() {
        if v && !na.is_missing(i) {
            packed[i >> 3] |= 1 << (i & 7);
        }
    }
    Ok(simple_primitive_blob(subtype::BOOL, n, na, 1, &packed))
}

fn encode_floats<const NBITS: u8>(
    bits_of: impl Fn(usize) -> u64,
    eq: impl Fn(usize, usize) -> bool,
    n: usize,
    na: &NaBitset,
) -> Vec<u8> {
    if n == 0 {
        return encode_empty(0);
    }
    if let Some(blob) = encode_all_missing(na, || const_primitive_blob(n, na, NBITS, 0)) {
        return blob;
    }
    let mut first = None;
    let mut all_equal = true;
    for i in 0..n {
        if na.is_missing(i) {
            continue;
        }
        match first {
            None => first = Some(i),
            Some(f) => all_equal &= eq(i, f),
        }
    }
    if all_equal {
        let f = first.unwrap_or(0);
        return const_primitive_blob(n, na, NBITS, bits_of(f));
    }
    let mut packed = Vec::with_capacity(n * NBITS as usize / 8);
    for i in 0..n {
        let bits = if na.is_missing(i) { 0 } else { bits_of(i) };
        push_packed(&mut packed, bits, NBITS);
    }
    simple_primitive_blob(subtype::PRIMITIVE, n, na, NBITS, &packed)
}

/// Encode a staged `f32` column at its natural 32-bit width.
pub fn encode_f32(values: &[f32], na: &NaBitset) -> Result<Vec<u8>> {
    check_staging(values.len(), na)?;
    Ok(encode_floats::<32>(
        |i| values[i].to_bits() as u64,
        |i, j| values[i] == values[j],
        values.len(),
        na,
    ))
}

/// Encode a staged `f64` column at its natural 64-bit width.
pub fn encode_f64(values: &[f64], na: &NaBitset) -> Result<Vec<u8>> {
    check_staging(values.len(), na)?;
    Ok(encode_floats::<64>(
        |i| values[i].to_bits(),
        |i, j| values[i] == values[j],
        values.len(),
        na,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_ladder() {
        assert_eq!(nbits_for_range(0, 127), 8);
        assert_eq!(nbits_for_range(-128, 0), 8);
        assert_eq!(nbits_for_range(0, 128), 16);
        assert_eq!(nbits_for_range(-129, 0), 16);
        assert_eq!(nbits_for_range(0, 32768), 32);
        assert_eq!(nbits_for_range(i32::MIN as i64, 0), 32);
        assert_eq!(nbits_for_range(0, i32::MAX as i64 + 1), 64);
        assert_eq!(nbits_for_range(i64::MIN, i64::MAX), 64);
    }
}
