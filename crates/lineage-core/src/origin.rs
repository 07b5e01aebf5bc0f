//! # Origin Classes
//!
//! The closed set of authorities that can produce a state transition.
//!
//! ## Security Invariant
//!
//! Ordinals are part of the public protocol: they are hashed into policy
//! leaves, transition digests and genesis commitments. Reordering variants
//! would silently change every commitment. Decoding rejects any ordinal
//! outside `0..=3` instead of letting an arbitrary integer reach a hash.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::field::FieldElement;

/// Number of origin classes.
pub const ORIGIN_CLASS_COUNT: usize = 4;

/// Tag describing the authority or context that produced a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum OriginClass {
    /// Initial deployment of a lineage.
    Genesis = 0,
    /// Ordinary user transaction.
    User = 1,
    /// Administrative action.
    Admin = 2,
    /// Cross-chain bridge import.
    Bridge = 3,
}

impl OriginClass {
    /// All classes in ordinal order.
    pub const ALL: [OriginClass; ORIGIN_CLASS_COUNT] = [
        OriginClass::Genesis,
        OriginClass::User,
        OriginClass::Admin,
        OriginClass::Bridge,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Decode a protocol ordinal.
    pub fn from_ordinal(value: u64) -> Result<Self, FieldError> {
        match value {
            0 => Ok(Self::Genesis),
            1 => Ok(Self::User),
            2 => Ok(Self::Admin),
            3 => Ok(Self::Bridge),
            other => Err(FieldError::UnknownOrigin(other)),
        }
    }

    /// Decode from a field element carrying an ordinal.
    pub fn from_field(value: &FieldElement) -> Result<Self, FieldError> {
        let ordinal = value
            .to_u64()
            .ok_or_else(|| FieldError::Overflow(value.to_decimal()))?;
        Self::from_ordinal(ordinal)
    }

    /// The ordinal as a hash input.
    pub fn to_field(self) -> FieldElement {
        FieldElement::from_u64(u64::from(self.ordinal()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Genesis => "Genesis",
            Self::User => "User",
            Self::Admin => "Admin",
            Self::Bridge => "Bridge",
        }
    }
}

impl fmt::Display for OriginClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Case-insensitive name, or a decimal ordinal.
impl FromStr for OriginClass {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(ordinal) = trimmed.parse::<u64>() {
            return Self::from_ordinal(ordinal);
        }
        Self::ALL
            .into_iter()
            .find(|o| o.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| FieldError::UnknownOriginName(trimmed.to_string()))
    }
}

impl TryFrom<u8> for OriginClass {
    type Error = FieldError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_ordinal(u64::from(value))
    }
}
