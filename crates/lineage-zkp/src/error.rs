//! Errors from lineage derivation, sessions and bundle files.
//!
//! Proof boundary errors live next to the trait in `traits.rs`.

use std::path::PathBuf;

use lineage_core::{OriginClass, StateHash};
use thiserror::Error;

use crate::signals::PublicSignals;
use crate::traits::ProofError;

/// Local derivation failures. Raised before anything is sent to a backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineageError {
    /// The origin pair is denied by the policy predicate at this depth.
    #[error("policy violation: {from} -> {to} not allowed at depth {prev_depth}")]
    PolicyViolation {
        from: OriginClass,
        to: OriginClass,
        prev_depth: u64,
    },

    /// `prev_depth + 1` does not fit in a u64.
    #[error("lineage depth overflow at depth {prev_depth}")]
    DepthOverflow { prev_depth: u64 },
}

/// Failures while advancing a [`LineageSession`](crate::session::LineageSession).
///
/// The session head is unchanged whenever one of these is returned.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Lineage(#[from] LineageError),

    #[error("proof generation failed: {0}")]
    Proof(#[from] ProofError),

    /// The backend answered with signals that disagree with local derivation.
    #[error("backend returned signals {actual:?}, expected {expected:?}")]
    SignalMismatch {
        expected: PublicSignals,
        actual: PublicSignals,
    },
}

/// Proof bundle IO, parse and continuity failures.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("bundle io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bundle json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The recorded genesis commitment is not derived from the genesis state.
    #[error("genesis commitment does not match genesis state {state_hash}")]
    GenesisMismatch { state_hash: StateHash },

    /// Entry `index` does not continue from the state before it.
    #[error("entry {index} starts at {found}, expected {expected}")]
    BrokenChain {
        index: usize,
        expected: StateHash,
        found: StateHash,
    },

    /// Entry `index` names a predecessor commitment or origin other than
    /// the one the bundle produced before it.
    #[error("entry {index} does not extend the lineage before it")]
    BrokenLineage { index: usize },

    /// Entry `index` does not advance depth by one.
    #[error("entry {index} claims depth {found}, expected {expected}")]
    DepthGap {
        index: usize,
        expected: u64,
        found: u64,
    },

    /// Entry `index` failed proof verification.
    #[error("entry {index} failed proof verification")]
    InvalidProof { index: usize },
}
