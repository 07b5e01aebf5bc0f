//! # Lineage Session
//!
//! Sequential prover for one lineage. The session owns the local head
//! (state, commitment, depth, origin) and builds each transition from it.
//!
//! ## Security Invariant
//!
//! The head advances only after the backend returned a proof **and** the
//! returned signals equal the locally derived ones. Every error, including a
//! backend failure whose outcome is unknown, leaves the head where it was.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use lineage_core::{FieldElement, LineageCommitment, OriginClass, StateHash, Transition};

use crate::chain::LineageChain;
use crate::error::SessionError;
use crate::signals::{PublicContext, PublicSignals};
use crate::traits::ProofSystem;
use crate::witness::Witness;

/// Latest accepted point of a lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageHead {
    pub state_hash: StateHash,
    pub commitment: LineageCommitment,
    pub depth: u64,
    pub origin: OriginClass,
}

/// Output of one successful step.
#[derive(Debug, Clone)]
pub struct ProvedStep<Pr> {
    pub witness: Witness,
    pub context: PublicContext,
    pub signals: PublicSignals,
    pub proof: Pr,
}

#[derive(Debug, Clone)]
pub struct LineageSession {
    chain: LineageChain,
    genesis: LineageHead,
    head: LineageHead,
}

impl LineageSession {
    /// Start a lineage at `genesis_state` with depth 0.
    pub fn new(chain: LineageChain, genesis_state: StateHash) -> Self {
        let genesis = LineageHead {
            state_hash: genesis_state,
            commitment: chain.genesis_commitment(genesis_state),
            depth: 0,
            origin: OriginClass::Genesis,
        };
        Self {
            chain,
            genesis,
            head: genesis,
        }
    }

    pub fn genesis(&self) -> &LineageHead {
        &self.genesis
    }

    pub fn head(&self) -> &LineageHead {
        &self.head
    }

    pub fn chain(&self) -> &LineageChain {
        &self.chain
    }

    /// The transition from the current head to `new_state`.
    pub fn next_transition(
        &self,
        new_state: StateHash,
        new_origin: OriginClass,
        timestamp: u64,
    ) -> Transition {
        Transition {
            prev_state_hash: self.head.state_hash,
            new_state_hash: new_state,
            prev_lineage_commitment: self.head.commitment,
            prev_origin: self.head.origin,
            new_origin,
            prev_depth: self.head.depth,
            timestamp,
        }
    }

    /// Pre-check, prove, cross-check, then advance.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Lineage`] when the policy pre-check fails. The
    ///   backend is not called.
    /// - [`SessionError::Proof`] when the backend fails.
    /// - [`SessionError::SignalMismatch`] when the backend's signals differ
    ///   from local derivation.
    pub fn prove_step<P: ProofSystem>(
        &mut self,
        backend: &P,
        pk: &P::ProvingKey,
        new_state: StateHash,
        new_origin: OriginClass,
        timestamp: u64,
        policy_root: FieldElement,
    ) -> Result<ProvedStep<P::Proof>, SessionError> {
        let transition = self.next_transition(new_state, new_origin, timestamp);
        let witness = self.chain.build_witness(&transition)?;
        let expected = self.chain.expected_signals(&witness)?;
        let context = PublicContext::for_witness(&witness, policy_root);

        let (proof, signals) = backend.generate_proof(pk, &witness, &context)?;
        if signals != expected {
            warn!(
                new_state = %new_state,
                expected_depth = expected.new_depth,
                actual_depth = signals.new_depth,
                "backend signals disagree with local derivation"
            );
            return Err(SessionError::SignalMismatch {
                expected,
                actual: signals,
            });
        }

        self.head = LineageHead {
            state_hash: new_state,
            commitment: signals.new_lineage_commitment,
            depth: signals.new_depth,
            origin: new_origin,
        };
        debug!(
            state = %new_state,
            depth = self.head.depth,
            origin = %new_origin,
            "lineage advanced"
        );

        Ok(ProvedStep {
            witness,
            context,
            signals,
            proof,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LineageError;
    use crate::mock::{MockBehavior, MockProofSystem};
    use crate::traits::ProofError;
    use lineage_crypto::Sha256FieldHasher;
    use std::sync::Arc;

    fn chain() -> LineageChain {
        LineageChain::new(Arc::new(Sha256FieldHasher::new()))
    }

    fn sh(v: u64) -> StateHash {
        StateHash::new(FieldElement::from_u64(v))
    }

    fn root(c: &LineageChain) -> FieldElement {
        c.policy().canonical_root().unwrap()
    }

    #[test]
    fn three_steps_reach_depth_three() {
        let c = chain();
        let backend = MockProofSystem::new(c.clone());
        let (pk, _) = MockProofSystem::setup("session");
        let mut session = LineageSession::new(c.clone(), sh(0xaa));
        assert_eq!(session.head().depth, 0);
        assert_eq!(session.head().commitment, c.genesis_commitment(sh(0xaa)));

        let origins = [OriginClass::User, OriginClass::User, OriginClass::User];
        for (i, origin) in origins.iter().enumerate() {
            let step = session
                .prove_step(&backend, &pk, sh(0xb0 + i as u64), *origin, 1_000 + i as u64, root(&c))
                .unwrap();
            assert_eq!(step.signals.new_depth, i as u64 + 1);
        }
        assert_eq!(session.head().depth, 3);
        assert_eq!(session.head().state_hash, sh(0xb2));
        assert_eq!(session.genesis().state_hash, sh(0xaa));
    }

    #[test]
    fn policy_violation_never_reaches_backend() {
        let c = chain();
        let backend = MockProofSystem::new(c.clone());
        let (pk, _) = MockProofSystem::setup("session");
        let mut session = LineageSession::new(c.clone(), sh(0xaa));
        session
            .prove_step(&backend, &pk, sh(1), OriginClass::User, 1, root(&c))
            .unwrap();
        let before = *session.head();
        assert_eq!(backend.prove_calls(), 1);

        let err = session
            .prove_step(&backend, &pk, sh(2), OriginClass::Admin, 2, root(&c))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Lineage(LineageError::PolicyViolation {
                from: OriginClass::User,
                to: OriginClass::Admin,
                ..
            })
        ));
        assert_eq!(backend.prove_calls(), 1);
        assert_eq!(*session.head(), before);
    }

    #[test]
    fn backend_failure_leaves_head() {
        let c = chain();
        let backend = MockProofSystem::with_behavior(c.clone(), MockBehavior::FailGeneration);
        let (pk, _) = MockProofSystem::setup("session");
        let mut session = LineageSession::new(c.clone(), sh(0xaa));
        let before = *session.head();
        let err = session
            .prove_step(&backend, &pk, sh(1), OriginClass::User, 1, root(&c))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Proof(ProofError::GenerationFailed(_))
        ));
        assert_eq!(*session.head(), before);
    }

    #[test]
    fn wrong_policy_root_leaves_head() {
        let c = chain();
        let backend = MockProofSystem::new(c.clone());
        let (pk, _) = MockProofSystem::setup("session");
        let mut session = LineageSession::new(c.clone(), sh(0xaa));
        let err = session
            .prove_step(&backend, &pk, sh(1), OriginClass::User, 1, FieldElement::from_u64(5))
            .unwrap_err();
        assert!(matches!(err, SessionError::Proof(ProofError::Unsatisfiable(_))));
        assert_eq!(session.head().depth, 0);
    }

    #[test]
    fn step_context_carries_head_lineage() {
        let c = chain();
        let backend = MockProofSystem::new(c.clone());
        let (pk, _) = MockProofSystem::setup("session");
        let mut session = LineageSession::new(c.clone(), sh(0xaa));
        let first = session
            .prove_step(&backend, &pk, sh(1), OriginClass::Admin, 1, root(&c))
            .unwrap();
        assert_eq!(first.context.prev_lineage_commitment, session.genesis().commitment);
        assert_eq!(first.context.prev_origin, OriginClass::Genesis);

        let second = session
            .prove_step(&backend, &pk, sh(2), OriginClass::Bridge, 2, root(&c))
            .unwrap();
        assert_eq!(
            second.context.prev_lineage_commitment,
            first.signals.new_lineage_commitment
        );
        assert_eq!(second.context.prev_origin, OriginClass::Admin);
        assert_eq!(second.context.new_origin, OriginClass::Bridge);
    }

    #[test]
    fn next_transition_uses_head() {
        let session = LineageSession::new(chain(), sh(0xaa));
        let t = session.next_transition(sh(0xbb), OriginClass::Bridge, 9);
        assert_eq!(t.prev_state_hash, sh(0xaa));
        assert_eq!(t.prev_origin, OriginClass::Genesis);
        assert_eq!(t.prev_depth, 0);
        assert_eq!(t.prev_lineage_commitment, session.genesis().commitment);
    }
}
