//! Error type shared by the parsing and encoding paths.
//!
//! Parsing a blob into a column handle validates the header and the
//! structural sizes up front; element reads afterwards do not re-validate.
//! Everything here is either a programmer error or data corruption — there
//! is no retry story.

use core::fmt;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, VectorError>;

/// Failure modes of blob parsing and column encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorError {
    /// The 4-byte prefix is truncated or carries unknown major/sub codes.
    MalformedHeader { raw: u32 },
    /// A table field or packed region extends past the end of the buffer.
    TruncatedPayload,
    /// A packed bit width outside the supported set {1, 8, 16, 32, 64}.
    UnsupportedNBits(u8),
    /// The declared row count disagrees with the size of a payload vector.
    LengthMismatch { declared: usize, actual: usize },
    /// The blob's encoding cannot produce the requested element type.
    TypeMismatch { header: u32 },
    /// Bytes presented as string data are not valid UTF-8.
    InvalidUtf8,
}

impl VectorError {
    /// Stable short name for the error kind.
    pub fn name(&self) -> &'static str {
        match self {
            VectorError::MalformedHeader { .. } => "MalformedHeader",
            VectorError::TruncatedPayload => "TruncatedPayload",
            VectorError::UnsupportedNBits(_) => "UnsupportedNBits",
            VectorError::LengthMismatch { .. } => "LengthMismatch",
            VectorError::TypeMismatch { .. } => "TypeMismatch",
            VectorError::InvalidUtf8 => "InvalidUtf8",
        }
    }
}

impl fmt::Display for VectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorError::MalformedHeader { raw } => {
                write!(f, "malformed vector header 0x{raw:08X}")
            }
            VectorError::TruncatedPayload => write!(f, "payload truncated"),
            VectorError::UnsupportedNBits(n) => write!(f, "unsupported bit width {n}"),
            VectorError::LengthMismatch { declared, actual } => {
                write!(f, "declared length {declared} inconsistent with payload ({actual})")
            }
            VectorError::TypeMismatch { header } => {
                write!(f, "element type does not match encoding (header 0x{header:08X})")
            }
            VectorError::InvalidUtf8 => write!(f, "string data is not valid UTF-8"),
        }
    }
}

impl std::error::Error for VectorError {}
