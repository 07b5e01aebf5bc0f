//! # Public Signals and Public Context
//!
//! `PublicSignals` is the backend's disclosed output, exactly
//! `[new_lineage_commitment, new_depth]`. On the wire it is a two-element
//! array of decimal field strings.
//!
//! `PublicContext` is the public input a proof is bound to: the state it
//! leaves together with that state's lineage commitment and origin, the
//! state it produces and its origin, and the policy root it was checked
//! against. The ledger keys the new record by `new_state_hash` and compares
//! the predecessor half against its own record, so a proof cannot be
//! replayed against other states or built on an invented history.

use serde::{Deserialize, Serialize};

use lineage_core::{FieldElement, FieldError, LineageCommitment, OriginClass, StateHash};

use crate::witness::Witness;

/// `[new_lineage_commitment, new_depth]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[String; 2]", into = "[String; 2]")]
pub struct PublicSignals {
    pub new_lineage_commitment: LineageCommitment,
    pub new_depth: u64,
}

impl PublicSignals {
    pub fn new(new_lineage_commitment: LineageCommitment, new_depth: u64) -> Self {
        Self {
            new_lineage_commitment,
            new_depth,
        }
    }

    /// Signals as field elements in wire order.
    pub fn to_fields(&self) -> [FieldElement; 2] {
        [
            self.new_lineage_commitment.as_field(),
            FieldElement::from_u64(self.new_depth),
        ]
    }

    pub fn from_fields(fields: [FieldElement; 2]) -> Result<Self, FieldError> {
        let depth = fields[1].to_u64().ok_or_else(|| {
            FieldError::Overflow(format!("depth {} exceeds u64", fields[1].to_decimal()))
        })?;
        Ok(Self::new(LineageCommitment::new(fields[0]), depth))
    }
}

impl From<PublicSignals> for [String; 2] {
    fn from(signals: PublicSignals) -> Self {
        signals.to_fields().map(|f| f.to_decimal())
    }
}

impl TryFrom<[String; 2]> for PublicSignals {
    type Error = FieldError;

    fn try_from(wire: [String; 2]) -> Result<Self, Self::Error> {
        let commitment = FieldElement::from_decimal(&wire[0])?;
        let depth = FieldElement::from_decimal(&wire[1])?;
        Self::from_fields([commitment, depth])
    }
}

/// Public input binding a proof to one edge of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicContext {
    pub prev_state_hash: StateHash,
    pub prev_lineage_commitment: LineageCommitment,
    pub prev_origin: OriginClass,
    pub new_state_hash: StateHash,
    pub new_origin: OriginClass,
    pub policy_root: FieldElement,
}

impl PublicContext {
    /// The public half of `witness`, checked against `policy_root`.
    pub fn for_witness(witness: &Witness, policy_root: FieldElement) -> Self {
        Self {
            prev_state_hash: witness.prev_state_hash,
            prev_lineage_commitment: witness.prev_lineage_commitment,
            prev_origin: witness.prev_origin,
            new_state_hash: witness.new_state_hash,
            new_origin: witness.new_origin,
            policy_root,
        }
    }

    /// Context fields in the order they are bound into a proof.
    pub fn to_fields(&self) -> [FieldElement; 6] {
        [
            self.prev_state_hash.as_field(),
            self.prev_lineage_commitment.as_field(),
            self.prev_origin.to_field(),
            self.new_state_hash.as_field(),
            self.new_origin.to_field(),
            self.policy_root,
        ]
    }
}
