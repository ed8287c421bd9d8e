//! String column encoders: constant, dictionary, and plain.
//!
//! Dictionary coding wins when the distinct-value count stays under a
//! threshold (half the row count, capped). Codes index the dictionary in
//! first-appearance order and pack at the smallest width that can address
//! every entry. Missing rows store an empty string (plain) or code zero
//! (dictionary); the NA mask hides both.

use std::collections::HashMap;

use crate::encode::{build_blob, check_staging, encode_all_missing, encode_empty};
use crate::error::{Result, VectorError};
use crate::header::{subtype, Header, MajorKind};
use crate::namask::NaBitset;
use crate::strview::Utf8View;
use crate::wire::{const_string, dict_string, simple_string};

/// Default ceiling on dictionary cardinality. The effective threshold for a
/// column of `n` rows is `min(n / 2, cap)`.
pub const DEFAULT_DICT_CARDINALITY_CAP: usize = 255;

/// Smallest code width that can address `dict_size` entries.
fn code_nbits(dict_size: usize) -> u8 {
    if dict_size <= 1 {
        1
    } else if dict_size <= 255 {
        8
    } else if dict_size <= 65_535 {
        16
    } else {
        32
    }
}

fn const_string_blob(len: usize, na: &NaBitset, value: &[u8]) -> Vec<u8> {
    build_blob(Header::new(MajorKind::Const, subtype::STRING, 0), |b| {
        const_string::build(b, len, na, value)
    })
}

fn encode_utf8_bytes(values: &[&[u8]], na: &NaBitset, cap: usize) -> Vec<u8> {
    let n = values.len();
    if n == 0 {
        return encode_empty(0);
    }
    if let Some(blob) = encode_all_missing(na, || const_string_blob(n, na, b"")) {
        return blob;
    }

    // Distinct present values, in first-appearance order.
    let mut dict: Vec<&[u8]> = Vec::new();
    let mut codes_by_value: HashMap<&[u8], u32> = HashMap::new();
    for (i, &v) in values.iter().enumerate() {
        if na.is_missing(i) {
            continue;
        }
        let next = dict.len() as u32;
        codes_by_value.entry(v).or_insert_with(|| {
            dict.push(v);
            next
        });
    }

    if dict.len() == 1 {
        return const_string_blob(n, na, dict[0]);
    }

    let threshold = (n / 2).min(cap);
    if dict.len() <= threshold {
        let nbits = code_nbits(dict.len());
        let mut packed = Vec::with_capacity(n * nbits as usize / 8 + 1);
        match nbits {
            1 => {
                packed.resize(n.div_ceil(8), 0);
                for (i, &v) in values.iter().enumerate() {
                    if !na.is_missing(i) && codes_by_value[v] != 0 {
                        packed[i >> 3] |= 1 << (i & 7);
                    }
                }
            }
            8 => {
                for (i, &v) in values.iter().enumerate() {
                    packed.push(if na.is_missing(i) { 0 } else { codes_by_value[v] as u8 });
                }
            }
            16 => {
                for (i, &v) in values.iter().enumerate() {
                    let c = if na.is_missing(i) { 0 } else { codes_by_value[v] as u16 };
                    packed.extend_from_slice(&c.to_le_bytes());
                }
            }
            _ => {
                for (i, &v) in values.iter().enumerate() {
                    let c = if na.is_missing(i) { 0 } else { codes_by_value[v] };
                    packed.extend_from_slice(&c.to_le_bytes());
                }
            }
        }
        return build_blob(Header::new(MajorKind::Dict, subtype::STRING, 0), |b| {
            dict_string::build(b, n, na, nbits, &packed, dict.iter().copied())
        });
    }

    build_blob(Header::new(MajorKind::Simple, subtype::STRING, 0), |b| {
        let strings = values
            .iter()
            .enumerate()
            .map(|(i, &v)| if na.is_missing(i) { &b""[..] } else { v });
        simple_string::build(b, n, na, strings)
    })
}

/// Encode a staged string column with the default dictionary cap.
pub fn encode_strs(values: &[&str], na: &NaBitset) -> Result<Vec<u8>> {
    encode_strs_with_limit(values, na, DEFAULT_DICT_CARDINALITY_CAP)
}

/// Encode a staged string column with an explicit dictionary cardinality
/// cap. A cap of zero disables dictionary coding.
pub fn encode_strs_with_limit(values: &[&str], na: &NaBitset, cap: usize) -> Result<Vec<u8>> {
    check_staging(values.len(), na)?;
    let bytes: Vec<&[u8]> = values.iter().map(|s| s.as_bytes()).collect();
    Ok(encode_utf8_bytes(&bytes, na, cap))
}

/// Encode a column of byte views, validating UTF-8 up front. Views over
/// arbitrary buffers are accepted; invalid UTF-8 fails the whole encode.
pub fn encode_utf8_views(values: &[Utf8View<'_>], na: &NaBitset) -> Result<Vec<u8>> {
    check_staging(values.len(), na)?;
    let mut bytes: Vec<&[u8]> = Vec::with_capacity(values.len());
    for (i, v) in values.iter().enumerate() {
        if !na.is_missing(i) && core::str::from_utf8(v.as_bytes()).is_err() {
            return Err(VectorError::InvalidUtf8);
        }
        bytes.push(v.as_bytes());
    }
    Ok(encode_utf8_bytes(&bytes, na, DEFAULT_DICT_CARDINALITY_CAP))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_width_ladder() {
        assert_eq!(code_nbits(0), 1);
        assert_eq!(code_nbits(1), 1);
        assert_eq!(code_nbits(2), 8);
        assert_eq!(code_nbits(255), 8);
        assert_eq!(code_nbits(256), 16);
        assert_eq!(code_nbits(65_535), 16);
        assert_eq!(code_nbits(65_536), 32);
    }
}
