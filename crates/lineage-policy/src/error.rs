//! Policy errors.

use lineage_core::OriginClass;
use lineage_crypto::MerkleError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The pair is not a leaf of the tree it was looked up in.
    #[error("origin pair {from} -> {to} is not in the policy tree")]
    PairNotInPolicy { from: OriginClass, to: OriginClass },

    /// A pair list named the same pair twice.
    #[error("origin pair {from} -> {to} listed more than once")]
    DuplicatePair { from: OriginClass, to: OriginClass },

    #[error(transparent)]
    Merkle(#[from] MerkleError),
}
