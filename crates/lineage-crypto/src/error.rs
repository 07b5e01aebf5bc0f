//! Merkle tree errors.

use thiserror::Error;

/// Errors from building or querying a Merkle tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleError {
    /// A tree needs at least one leaf.
    #[error("cannot build a Merkle tree from zero leaves")]
    EmptyTree,

    /// The requested leaf does not exist.
    #[error("leaf index {index} out of range for tree of {leaf_count} leaves")]
    LeafIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of caller-supplied leaves.
        leaf_count: usize,
    },
}
