//! # Field Hash Capability
//!
//! The hash primitive behind policy leaves, Merkle nodes and the lineage
//! chain. It is constructed once by the host process and handed to each
//! component as a [`SharedHasher`]; nothing in the workspace reaches for a
//! global instance.
//!
//! Implementations must be deterministic and thread-safe. Different input
//! lengths must be domain-separated so `H(a, b)` and `H(a, b, 0)` differ.

use std::sync::Arc;

use crate::field::FieldElement;

/// A hash from a sequence of field elements to a field element.
pub trait FieldHasher: Send + Sync {
    /// Hash an ordered input sequence. Order is significant.
    fn hash(&self, inputs: &[FieldElement]) -> FieldElement;

    /// Short identifier, recorded in logs and bundle metadata.
    fn name(&self) -> &'static str;
}

/// Reusable, thread-safe handle to the process hash primitive.
pub type SharedHasher = Arc<dyn FieldHasher>;
