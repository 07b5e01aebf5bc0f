//! # Witness
//!
//! The full input handed to a proving backend for one transition. Every
//! field travels as a decimal field string:
//!
//! ```json
//! { "prev_state_hash": "…", "new_state_hash": "…",
//!   "prev_lineage_commitment": "…", "prev_origin": "1",
//!   "new_origin": "1", "prev_depth": "2", "timestamp": "1700000000000" }
//! ```
//!
//! Decoding rejects origin ordinals outside `0..=3` and integers that do not
//! fit a u64, so nothing unchecked reaches a hash input.

use serde::{Deserialize, Serialize};

use lineage_core::{FieldElement, FieldError, LineageCommitment, OriginClass, StateHash, Transition};

/// Inputs for one transition proof. Built by
/// [`LineageChain::build_witness`](crate::chain::LineageChain::build_witness).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WitnessWire", into = "WitnessWire")]
pub struct Witness {
    pub prev_state_hash: StateHash,
    pub new_state_hash: StateHash,
    pub prev_lineage_commitment: LineageCommitment,
    pub prev_origin: OriginClass,
    pub new_origin: OriginClass,
    pub prev_depth: u64,
    pub timestamp: u64,
}

impl Witness {
    pub(crate) fn from_transition(t: &Transition) -> Self {
        Self {
            prev_state_hash: t.prev_state_hash,
            new_state_hash: t.new_state_hash,
            prev_lineage_commitment: t.prev_lineage_commitment,
            prev_origin: t.prev_origin,
            new_origin: t.new_origin,
            prev_depth: t.prev_depth,
            timestamp: t.timestamp,
        }
    }

    /// Field encoding in wire order.
    pub fn to_fields(&self) -> [FieldElement; 7] {
        [
            self.prev_state_hash.as_field(),
            self.new_state_hash.as_field(),
            self.prev_lineage_commitment.as_field(),
            self.prev_origin.to_field(),
            self.new_origin.to_field(),
            FieldElement::from_u64(self.prev_depth),
            FieldElement::from_u64(self.timestamp),
        ]
    }

    pub fn transition(&self) -> Transition {
        Transition {
            prev_state_hash: self.prev_state_hash,
            new_state_hash: self.new_state_hash,
            prev_lineage_commitment: self.prev_lineage_commitment,
            prev_origin: self.prev_origin,
            new_origin: self.new_origin,
            prev_depth: self.prev_depth,
            timestamp: self.timestamp,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WitnessWire {
    prev_state_hash: String,
    new_state_hash: String,
    prev_lineage_commitment: String,
    prev_origin: String,
    new_origin: String,
    prev_depth: String,
    timestamp: String,
}

impl From<Witness> for WitnessWire {
    fn from(w: Witness) -> Self {
        let [a, b, c, d, e, f, g] = w.to_fields().map(|x| x.to_decimal());
        Self {
            prev_state_hash: a,
            new_state_hash: b,
            prev_lineage_commitment: c,
            prev_origin: d,
            new_origin: e,
            prev_depth: f,
            timestamp: g,
        }
    }
}

fn decode_u64(field: &str, raw: &str) -> Result<u64, FieldError> {
    FieldElement::from_decimal(raw)?
        .to_u64()
        .ok_or_else(|| FieldError::Overflow(format!("{field} = {raw}")))
}

fn decode_origin(raw: &str) -> Result<OriginClass, FieldError> {
    OriginClass::from_field(&FieldElement::from_decimal(raw)?)
}

impl TryFrom<WitnessWire> for Witness {
    type Error = FieldError;

    fn try_from(w: WitnessWire) -> Result<Self, Self::Error> {
        Ok(Self {
            prev_state_hash: StateHash::new(FieldElement::from_decimal(&w.prev_state_hash)?),
            new_state_hash: StateHash::new(FieldElement::from_decimal(&w.new_state_hash)?),
            prev_lineage_commitment: LineageCommitment::new(FieldElement::from_decimal(
                &w.prev_lineage_commitment,
            )?),
            prev_origin: decode_origin(&w.prev_origin)?,
            new_origin: decode_origin(&w.new_origin)?,
            prev_depth: decode_u64("prev_depth", &w.prev_depth)?,
            timestamp: decode_u64("timestamp", &w.timestamp)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Witness {
        Witness {
            prev_state_hash: StateHash::new(FieldElement::from_u64(11)),
            new_state_hash: StateHash::new(FieldElement::from_u64(22)),
            prev_lineage_commitment: LineageCommitment::new(FieldElement::from_u64(33)),
            prev_origin: OriginClass::Genesis,
            new_origin: OriginClass::User,
            prev_depth: 0,
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn wire_form_is_decimal_strings() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["prev_state_hash"], "11");
        assert_eq!(json["prev_origin"], "0");
        assert_eq!(json["new_origin"], "1");
        assert_eq!(json["timestamp"], "1700000000000");
        let back: Witness = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn unknown_origin_ordinal_rejected() {
        let mut json = serde_json::to_value(sample()).unwrap();
        json["new_origin"] = "4".into();
        let err = serde_json::from_value::<Witness>(json).unwrap_err();
        assert!(err.to_string().contains("origin"), "{err}");
    }

    #[test]
    fn non_canonical_field_rejected() {
        let mut json = serde_json::to_value(sample()).unwrap();
        json["prev_state_hash"] =
            "21888242871839275222246405745257275088548364400416034343698204186575808495617".into();
        assert!(serde_json::from_value::<Witness>(json).is_err());
    }

    #[test]
    fn unknown_fields_rejected() {
        let mut json = serde_json::to_value(sample()).unwrap();
        json["extra"] = "1".into();
        assert!(serde_json::from_value::<Witness>(json).is_err());
    }

    #[test]
    fn transition_round_trip() {
        let w = sample();
        assert_eq!(Witness::from_transition(&w.transition()), w);
    }
}
