//! # Field Elements
//!
//! `FieldElement` is an element of the BN254 scalar field, the field the
//! lineage hash chain and the external circuit operate over.
//!
//! ## Encodings
//!
//! - **Bytes**: canonical 32-byte big-endian, always `< p`.
//! - **Decimal**: the integer value as a base-10 string. This is the witness
//!   and public-signal wire format. Parsing rejects values `>= p`.
//! - **Hex**: `0x` followed by 64 hex digits (bytes32). Parsing a bytes32
//!   reduces it modulo `p`, since arbitrary 256-bit state identifiers are
//!   mapped into the field before hashing.
//!
//! ## Security Invariant
//!
//! There is no constructor that stores an unreduced value. Two encodings of
//! the same residue always compare equal.

use std::fmt;
use std::str::FromStr;

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FieldError;

/// An element of the BN254 scalar field in canonical big-endian form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FieldElement([u8; 32]);

impl FieldElement {
    /// The additive identity.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Reduce an arbitrary 256-bit big-endian value into the field.
    pub fn from_be_bytes_reduced(bytes: &[u8; 32]) -> Self {
        Self::from_fr(Fr::from_be_bytes_mod_order(bytes))
    }

    /// Embed a `u64`. Every `u64` is below the modulus, so no reduction occurs.
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Convert from the arkworks representation.
    pub fn from_fr(fr: Fr) -> Self {
        let be = fr.into_bigint().to_bytes_be();
        let mut bytes = [0u8; 32];
        let take = be.len().min(32);
        bytes[32 - take..].copy_from_slice(&be[be.len() - take..]);
        Self(bytes)
    }

    /// Convert to the arkworks representation.
    pub fn to_fr(&self) -> Fr {
        Fr::from_be_bytes_mod_order(&self.0)
    }

    /// Canonical big-endian bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// The value as a `u64`, if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        if self.0[..24].iter().any(|b| *b != 0) {
            return None;
        }
        let mut tail = [0u8; 8];
        tail.copy_from_slice(&self.0[24..]);
        Some(u64::from_be_bytes(tail))
    }

    /// Render as a base-10 integer string.
    pub fn to_decimal(&self) -> String {
        self.to_fr().into_bigint().to_string()
    }

    /// Parse a base-10 integer string, rejecting values `>= p`.
    pub fn from_decimal(s: &str) -> Result<Self, FieldError> {
        let digits = s.trim();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FieldError::InvalidDecimal(s.to_string()));
        }

        let ten = Fr::from(10u64);
        let mut acc = Fr::from(0u64);
        for b in digits.bytes() {
            acc = acc * ten + Fr::from(u64::from(b - b'0'));
        }
        let value = Self::from_fr(acc);

        // Accumulation wraps silently; a round trip exposes any wrap.
        let normalized = match digits.trim_start_matches('0') {
            "" => "0",
            rest => rest,
        };
        if value.to_decimal() != normalized {
            return Err(FieldError::NonCanonical(digits.to_string()));
        }
        Ok(value)
    }

    /// Render as `0x`-prefixed 64-digit lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse `0x`-prefixed (or bare) 64-digit hex and reduce into the field.
    pub fn from_hex_reduced(s: &str) -> Result<Self, FieldError> {
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if body.len() != 64 {
            return Err(FieldError::InvalidHex(format!(
                "expected 64 hex digits, got {}",
                body.len()
            )));
        }
        let decoded = hex::decode(body).map_err(|e| FieldError::InvalidHex(e.to_string()))?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&decoded);
        Ok(Self::from_be_bytes_reduced(&bytes))
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<Fr> for FieldElement {
    fn from(fr: Fr) -> Self {
        Self::from_fr(fr)
    }
}

/// Accepts either `0x`-prefixed hex (reduced) or a canonical decimal string.
impl FromStr for FieldElement {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
            Self::from_hex_reduced(trimmed)
        } else {
            Self::from_decimal(trimmed)
        }
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_hex())
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Protocol newtypes ───────────────────────────────────────────────

/// Identifier of an opaque external state, reduced into the field.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateHash(FieldElement);

impl StateHash {
    pub const ZERO: Self = Self(FieldElement::ZERO);

    pub fn new(value: FieldElement) -> Self {
        Self(value)
    }

    /// Map a raw bytes32 state identifier into the field.
    pub fn from_bytes32(bytes: &[u8; 32]) -> Self {
        Self(FieldElement::from_be_bytes_reduced(bytes))
    }

    pub fn as_field(&self) -> FieldElement {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl FromStr for StateHash {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Display for StateHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for StateHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateHash({})", self.0.to_hex())
    }
}

/// Accumulated commitment to a state's full transition history.
///
/// Produced by the lineage hash chain. The ledger stores whatever a verified
/// proof discloses and never derives one itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineageCommitment(FieldElement);

impl LineageCommitment {
    pub const ZERO: Self = Self(FieldElement::ZERO);

    pub fn new(value: FieldElement) -> Self {
        Self(value)
    }

    pub fn as_field(&self) -> FieldElement {
        self.0
    }
}

impl FromStr for LineageCommitment {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Display for LineageCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for LineageCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineageCommitment({})", self.0.to_hex())
    }
}
