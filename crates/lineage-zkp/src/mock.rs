//! # Mock Proof System
//!
//! A deterministic, transparent backend for development and tests.
//!
//! ## How It Works
//!
//! - `generate_proof()` performs the checks the circuit would: the context
//!   carries the witness's states, predecessor commitment and origins, the origin pair is a member of the policy tree
//!   whose root the context names, the depth rule holds. It then derives the
//!   signals through [`LineageChain`] and tags
//!   `SHA256(tag || key_id || context || signals)`.
//! - `verify_proof()` recomputes the tag and compares.
//!
//! Behaviour can be switched to reject every verification or fail every
//! generation, so ledger and session code can be tested against both
//! outcomes. Calls to `generate_proof()` are counted.
//!
//! ## Security Warning
//!
//! **NOT PRIVATE.** Anyone holding the key id can recompute a proof. The
//! mock exists so the lineage and ledger logic can run without a circuit.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::chain::LineageChain;
use crate::signals::{PublicContext, PublicSignals};
use crate::traits::{ProofError, ProofSystem, VerifyError};
use crate::witness::Witness;

const PROOF_TAG: &[u8] = b"lineage.mock-proof.v1";
const KEY_TAG: &[u8] = b"lineage.mock-key.v1";

/// Hex-encoded SHA-256 tag plus the id of the key that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockProof {
    pub key_id: String,
    pub proof_hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockProvingKey {
    pub key_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockVerifyingKey {
    pub key_id: String,
}

/// What the mock does when called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockBehavior {
    /// Prove and verify like a correct backend.
    #[default]
    Honest,
    /// Prove normally, answer `false` to every verification.
    RejectVerification,
    /// Fail every proof generation.
    FailGeneration,
}

pub struct MockProofSystem {
    chain: LineageChain,
    behavior: MockBehavior,
    prove_calls: AtomicU64,
}

impl std::fmt::Debug for MockProofSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProofSystem")
            .field("behavior", &self.behavior)
            .field("prove_calls", &self.prove_calls())
            .finish()
    }
}

impl MockProofSystem {
    pub fn new(chain: LineageChain) -> Self {
        Self::with_behavior(chain, MockBehavior::Honest)
    }

    pub fn with_behavior(chain: LineageChain, behavior: MockBehavior) -> Self {
        Self {
            chain,
            behavior,
            prove_calls: AtomicU64::new(0),
        }
    }

    pub fn behavior(&self) -> MockBehavior {
        self.behavior
    }

    /// Number of `generate_proof` invocations so far.
    pub fn prove_calls(&self) -> u64 {
        self.prove_calls.load(Ordering::SeqCst)
    }

    /// Derive a matching key pair from a label.
    pub fn setup(label: &str) -> (MockProvingKey, MockVerifyingKey) {
        let mut hasher = Sha256::new();
        hasher.update(KEY_TAG);
        hasher.update(label.as_bytes());
        let key_id = hex::encode(hasher.finalize());
        (
            MockProvingKey {
                key_id: key_id.clone(),
            },
            MockVerifyingKey { key_id },
        )
    }

    /// Context for `witness` over the canonical policy root.
    pub fn canonical_context(&self, witness: &Witness) -> Result<PublicContext, ProofError> {
        let root = self
            .chain
            .policy()
            .canonical_root()
            .map_err(|e| ProofError::GenerationFailed(e.to_string()))?;
        Ok(PublicContext::for_witness(witness, root))
    }

    fn tag(key_id: &str, context: &PublicContext, signals: &PublicSignals) -> String {
        let mut hasher = Sha256::new();
        hasher.update(PROOF_TAG);
        hasher.update(key_id.as_bytes());
        for field in context.to_fields().iter().chain(signals.to_fields().iter()) {
            hasher.update(field.as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    fn check_constraints(
        &self,
        witness: &Witness,
        context: &PublicContext,
    ) -> Result<PublicSignals, ProofError> {
        let expected = PublicContext::for_witness(witness, context.policy_root);
        if *context != expected {
            return Err(ProofError::InvalidInputs(format!(
                "public context does not match witness {} -> {}",
                witness.prev_state_hash, witness.new_state_hash
            )));
        }

        let policy = self.chain.policy();
        let tree = policy
            .canonical_tree()
            .map_err(|e| ProofError::GenerationFailed(e.to_string()))?;
        if tree.root() != context.policy_root {
            return Err(ProofError::Unsatisfiable(format!(
                "no policy tree known for root {}",
                context.policy_root
            )));
        }
        let accepted = policy.check_against_tree(
            &tree,
            witness.prev_origin,
            witness.new_origin,
            witness.prev_depth,
        );
        if !accepted {
            return Err(ProofError::Unsatisfiable(format!(
                "{} -> {} not accepted by policy at depth {}",
                witness.prev_origin, witness.new_origin, witness.prev_depth
            )));
        }

        self.chain
            .expected_signals(witness)
            .map_err(|e| ProofError::Unsatisfiable(e.to_string()))
    }
}

impl ProofSystem for MockProofSystem {
    type Proof = MockProof;
    type VerifyingKey = MockVerifyingKey;
    type ProvingKey = MockProvingKey;

    fn generate_proof(
        &self,
        pk: &Self::ProvingKey,
        witness: &Witness,
        context: &PublicContext,
    ) -> Result<(Self::Proof, PublicSignals), ProofError> {
        self.prove_calls.fetch_add(1, Ordering::SeqCst);
        if self.behavior == MockBehavior::FailGeneration {
            return Err(ProofError::GenerationFailed(
                "mock backend configured to fail".to_string(),
            ));
        }

        let signals = self.check_constraints(witness, context)?;
        let proof = MockProof {
            key_id: pk.key_id.clone(),
            proof_hex: Self::tag(&pk.key_id, context, &signals),
        };
        debug!(
            new_state = %context.new_state_hash,
            depth = signals.new_depth,
            "mock proof generated"
        );
        Ok((proof, signals))
    }

    fn verify_proof(
        &self,
        vk: &Self::VerifyingKey,
        context: &PublicContext,
        signals: &PublicSignals,
        proof: &Self::Proof,
    ) -> Result<bool, VerifyError> {
        if proof.proof_hex.len() != 64 {
            return Err(VerifyError::MalformedProof(format!(
                "expected 64 hex chars, got {}",
                proof.proof_hex.len()
            )));
        }
        if !proof.proof_hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(VerifyError::MalformedProof(
                "proof_hex contains non-hex characters".to_string(),
            ));
        }
        if proof.key_id != vk.key_id {
            return Err(VerifyError::KeyMismatch {
                expected: vk.key_id.clone(),
                actual: proof.key_id.clone(),
            });
        }
        if self.behavior == MockBehavior::RejectVerification {
            return Ok(false);
        }

        Ok(proof.proof_hex == Self::tag(&vk.key_id, context, signals))
    }
}
