//! Ledger and registry errors.

use lineage_core::{AccountId, FieldElement, LineageCommitment, OriginClass, PolicyId, StateHash};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("policy root must be non-zero")]
    ZeroPolicyRoot,

    #[error("unknown policy {0}")]
    UnknownPolicy(PolicyId),
}

/// A rejected ledger call. The ledger is unchanged whenever one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("caller {caller} is not the ledger admin")]
    NotAdmin { caller: AccountId },

    #[error("genesis already set")]
    GenesisAlreadySet,

    #[error("genesis not set")]
    GenesisNotSet,

    #[error("state hash must be non-zero")]
    ZeroStateHash,

    #[error("no active policy")]
    NoActivePolicy,

    #[error("proof checked against policy root {actual}, active root is {expected}")]
    PolicyRootMismatch {
        expected: FieldElement,
        actual: FieldElement,
    },

    /// The target state already has a record. Records are never rewritten.
    #[error("state {state_hash} already has a verified lineage")]
    StateAlreadyVerified { state_hash: StateHash },

    #[error("predecessor state {state_hash} has no verified lineage")]
    UnknownPredecessor { state_hash: StateHash },

    /// The proof extends a lineage commitment other than the one recorded
    /// for its predecessor.
    #[error("predecessor {state_hash} has lineage {expected}, proof extends {actual}")]
    LineageMismatch {
        state_hash: StateHash,
        expected: LineageCommitment,
        actual: LineageCommitment,
    },

    #[error("predecessor {state_hash} has origin {expected}, proof claims {actual}")]
    OriginMismatch {
        state_hash: StateHash,
        expected: OriginClass,
        actual: OriginClass,
    },

    #[error("invalid proof for transition {prev_state_hash} -> {new_state_hash}")]
    InvalidProof {
        prev_state_hash: StateHash,
        new_state_hash: StateHash,
    },

    #[error("proof claims depth {actual}, predecessor implies {expected}")]
    DepthMismatch { expected: u64, actual: u64 },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
