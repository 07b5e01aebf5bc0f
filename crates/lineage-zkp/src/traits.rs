//! # Proof System Trait
//!
//! The boundary to the proving backend. A backend takes a [`Witness`] and the
//! [`PublicContext`] it is bound to and returns a proof plus
//! [`PublicSignals`]; verification checks a proof against the same context
//! and signals.
//!
//! Nothing on this side of the boundary does cryptography of its own. A
//! failure is reported, never retried: the backend is deterministic, so the
//! same inputs give the same outcome.
//!
//! ## Backends
//!
//! [`ProofSystem`] is an open trait: a circuit backend lives in its own
//! crate and is handed to [`LineageSession`](crate::LineageSession) and the
//! ledger as a value. The ledger never relies on a backend for anything
//! beyond `verify_proof`. Lineage continuity is checked against its own
//! records.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::signals::{PublicContext, PublicSignals};
use crate::witness::Witness;

/// Proof generation failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// The request is malformed, e.g. a context whose states, predecessor
    /// commitment or origins differ from the witness.
    #[error("invalid proof inputs: {0}")]
    InvalidInputs(String),
    /// The witness does not satisfy the circuit constraints.
    #[error("constraints unsatisfiable: {0}")]
    Unsatisfiable(String),
    /// The backend failed internally.
    #[error("proof generation failed: {0}")]
    GenerationFailed(String),
}

/// Verification could not be carried out.
///
/// A well-formed proof that simply does not verify is `Ok(false)`, not an
/// error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("malformed proof: {0}")]
    MalformedProof(String),
    #[error("verifying key {expected} does not match proof key {actual}")]
    KeyMismatch { expected: String, actual: String },
}

/// Proving and verification backend.
///
/// `Send + Sync` so one backend can serve independent lineages in parallel.
pub trait ProofSystem: Send + Sync {
    type Proof: Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync;
    type VerifyingKey: Clone + Send + Sync;
    type ProvingKey: Send + Sync;

    /// Prove one transition. `context` must be the public half of
    /// `witness` (see [`PublicContext::for_witness`]).
    ///
    /// # Errors
    ///
    /// [`ProofError::InvalidInputs`] for a mismatched context,
    /// [`ProofError::Unsatisfiable`] if the witness breaks a constraint.
    fn generate_proof(
        &self,
        pk: &Self::ProvingKey,
        witness: &Witness,
        context: &PublicContext,
    ) -> Result<(Self::Proof, PublicSignals), ProofError>;

    /// Check `proof` against `context` and `signals`.
    fn verify_proof(
        &self,
        vk: &Self::VerifyingKey,
        context: &PublicContext,
        signals: &PublicSignals,
        proof: &Self::Proof,
    ) -> Result<bool, VerifyError>;
}
