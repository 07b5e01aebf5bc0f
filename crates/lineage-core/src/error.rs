//! # Error Types
//!
//! Decoding errors for the values that cross a serialization boundary:
//! field elements, origin ordinals and account identifiers.

use thiserror::Error;

/// Error decoding a protocol value from its text or integer encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The string is not a decimal integer.
    #[error("invalid decimal field element: {0:?}")]
    InvalidDecimal(String),

    /// The decimal integer is not below the field modulus.
    #[error("decimal value is not a canonical field element (>= modulus): {0}")]
    NonCanonical(String),

    /// The string is not `0x`-prefixed hex of the expected width.
    #[error("invalid hex encoding: {0}")]
    InvalidHex(String),

    /// The ordinal does not name an origin class.
    #[error("unknown origin class ordinal {0}")]
    UnknownOrigin(u64),

    /// The origin class name is not recognised.
    #[error("unknown origin class name {0:?}")]
    UnknownOriginName(String),

    /// A field element that must fit in 64 bits does not.
    #[error("field element does not fit in u64: {0}")]
    Overflow(String),
}
