//! # Lineage Hash Chain
//!
//! ```text
//! genesis_commitment(s)              = H(s, Genesis, 0)
//! transition_digest(prev, new, o, t) = H(prev, new, o, t)
//! next_commitment(L, D, d)           = H(L, D, d)
//! ```
//!
//! `o` is the origin of the new state and `t` the timestamp in milliseconds.
//! All functions are pure. The only shared value is the hash handle, which
//! is read-only and safe to use from many threads at once.

use tracing::debug;

use lineage_core::{
    FieldElement, LineageCommitment, OriginClass, SharedHasher, StateHash, Transition,
};
use lineage_policy::PolicyEngine;

use crate::error::LineageError;
use crate::signals::PublicSignals;
use crate::witness::Witness;

/// Lineage derivation bound to one hash primitive.
#[derive(Clone, Debug)]
pub struct LineageChain {
    policy: PolicyEngine,
}

impl LineageChain {
    pub fn new(hasher: SharedHasher) -> Self {
        Self {
            policy: PolicyEngine::new(hasher),
        }
    }

    pub fn policy(&self) -> &PolicyEngine {
        &self.policy
    }

    pub fn hasher(&self) -> &SharedHasher {
        self.policy.hasher()
    }

    pub fn genesis_commitment(&self, state_hash: StateHash) -> LineageCommitment {
        LineageCommitment::new(self.hasher().hash(&[
            state_hash.as_field(),
            OriginClass::Genesis.to_field(),
            FieldElement::ZERO,
        ]))
    }

    pub fn transition_digest(
        &self,
        prev_state: StateHash,
        new_state: StateHash,
        origin: OriginClass,
        timestamp: u64,
    ) -> FieldElement {
        self.hasher().hash(&[
            prev_state.as_field(),
            new_state.as_field(),
            origin.to_field(),
            FieldElement::from_u64(timestamp),
        ])
    }

    pub fn next_commitment(
        &self,
        prev_lineage: LineageCommitment,
        transition_digest: FieldElement,
        new_depth: u64,
    ) -> LineageCommitment {
        LineageCommitment::new(self.hasher().hash(&[
            prev_lineage.as_field(),
            transition_digest,
            FieldElement::from_u64(new_depth),
        ]))
    }

    /// Policy pre-check, then witness assembly.
    ///
    /// # Errors
    ///
    /// [`LineageError::PolicyViolation`] if the origin pair is denied at
    /// `prev_depth`, [`LineageError::DepthOverflow`] if the successor depth
    /// does not fit.
    pub fn build_witness(&self, transition: &Transition) -> Result<Witness, LineageError> {
        let (from, to) = transition.origin_pair();
        if !self.policy.is_allowed(from, to, transition.prev_depth) {
            return Err(LineageError::PolicyViolation {
                from,
                to,
                prev_depth: transition.prev_depth,
            });
        }
        successor_depth(transition.prev_depth)?;

        let witness = Witness::from_transition(transition);
        debug!(
            from = %from,
            to = %to,
            prev_depth = transition.prev_depth,
            new_state = %transition.new_state_hash,
            "built witness"
        );
        Ok(witness)
    }

    /// The signals a correct proof of `witness` must disclose.
    pub fn expected_signals(&self, witness: &Witness) -> Result<PublicSignals, LineageError> {
        let new_depth = successor_depth(witness.prev_depth)?;
        let digest = self.transition_digest(
            witness.prev_state_hash,
            witness.new_state_hash,
            witness.new_origin,
            witness.timestamp,
        );
        let commitment = self.next_commitment(witness.prev_lineage_commitment, digest, new_depth);
        Ok(PublicSignals::new(commitment, new_depth))
    }
}

fn successor_depth(prev_depth: u64) -> Result<u64, LineageError> {
    prev_depth
        .checked_add(1)
        .ok_or(LineageError::DepthOverflow { prev_depth })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProofSystem;
    use crate::traits::ProofSystem;
    use lineage_core::OriginClass::*;
    use lineage_crypto::Sha256FieldHasher;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn chain() -> LineageChain {
        LineageChain::new(Arc::new(Sha256FieldHasher::new()))
    }

    fn sh(v: u64) -> StateHash {
        StateHash::new(FieldElement::from_u64(v))
    }

    fn transition(from: OriginClass, to: OriginClass, depth: u64) -> Transition {
        Transition {
            prev_state_hash: sh(1),
            new_state_hash: sh(2),
            prev_lineage_commitment: LineageCommitment::new(FieldElement::from_u64(3)),
            prev_origin: from,
            new_origin: to,
            prev_depth: depth,
            timestamp: 1_000,
        }
    }

    fn origin() -> impl Strategy<Value = OriginClass> {
        prop_oneof![Just(Genesis), Just(User), Just(Admin), Just(Bridge)]
    }

    #[test]
    fn genesis_commitment_is_deterministic() {
        let c = chain();
        assert_eq!(c.genesis_commitment(sh(0xaa)), c.genesis_commitment(sh(0xaa)));
        assert_ne!(c.genesis_commitment(sh(0xaa)), c.genesis_commitment(sh(0xab)));
    }

    #[test]
    fn genesis_commitment_matches_definition() {
        let c = chain();
        let expected = c.hasher().hash(&[
            FieldElement::from_u64(7),
            FieldElement::ZERO,
            FieldElement::ZERO,
        ]);
        assert_eq!(c.genesis_commitment(sh(7)).as_field(), expected);
    }

    #[test]
    fn digest_binds_every_input() {
        let c = chain();
        let base = c.transition_digest(sh(1), sh(2), User, 5);
        assert_ne!(base, c.transition_digest(sh(9), sh(2), User, 5));
        assert_ne!(base, c.transition_digest(sh(1), sh(9), User, 5));
        assert_ne!(base, c.transition_digest(sh(1), sh(2), Admin, 5));
        assert_ne!(base, c.transition_digest(sh(1), sh(2), User, 6));
    }

    #[test]
    fn user_to_admin_is_policy_violation() {
        let err = chain().build_witness(&transition(User, Admin, 1)).unwrap_err();
        assert_eq!(
            err,
            LineageError::PolicyViolation {
                from: User,
                to: Admin,
                prev_depth: 1
            }
        );
    }

    #[test]
    fn genesis_reentry_is_policy_violation() {
        assert!(chain().build_witness(&transition(User, Genesis, 0)).is_ok());
        assert!(matches!(
            chain().build_witness(&transition(User, Genesis, 4)),
            Err(LineageError::PolicyViolation { .. })
        ));
    }

    #[test]
    fn depth_overflow_reported() {
        assert_eq!(
            chain().build_witness(&transition(User, User, u64::MAX)),
            Err(LineageError::DepthOverflow {
                prev_depth: u64::MAX
            })
        );
    }

    #[test]
    fn expected_signals_advance_depth() {
        let c = chain();
        let w = c.build_witness(&transition(Genesis, User, 0)).unwrap();
        let signals = c.expected_signals(&w).unwrap();
        assert_eq!(signals.new_depth, 1);
        let digest = c.transition_digest(sh(1), sh(2), User, 1_000);
        assert_eq!(
            signals.new_lineage_commitment,
            c.next_commitment(w.prev_lineage_commitment, digest, 1)
        );
    }

    proptest! {
        #[test]
        fn witness_succeeds_iff_allowed(from in origin(), to in origin(), depth in 0u64..100) {
            let result = chain().build_witness(&transition(from, to, depth));
            prop_assert_eq!(result.is_ok(), lineage_policy::is_allowed(from, to, depth));
        }

        #[test]
        fn allowed_steps_prove_at_next_depth(
            from in origin(),
            to in origin(),
            depth in 0u64..100
        ) {
            prop_assume!(lineage_policy::is_allowed(from, to, depth));
            let c = chain();
            let backend = MockProofSystem::new(c.clone());
            let (pk, vk) = MockProofSystem::setup("chain");
            let w = c.build_witness(&transition(from, to, depth)).unwrap();
            let ctx = backend.canonical_context(&w).unwrap();
            let (proof, signals) = backend.generate_proof(&pk, &w, &ctx).unwrap();
            prop_assert_eq!(signals.new_depth, depth + 1);
            prop_assert_eq!(signals, c.expected_signals(&w).unwrap());
            prop_assert!(backend.verify_proof(&vk, &ctx, &signals, &proof).unwrap());
        }

        #[test]
        fn next_commitment_is_pure(l in any::<u64>(), d in any::<u64>(), n in any::<u64>()) {
            let c = chain();
            let lc = LineageCommitment::new(FieldElement::from_u64(l));
            let digest = FieldElement::from_u64(d);
            prop_assert_eq!(c.next_commitment(lc, digest, n), c.next_commitment(lc, digest, n));
        }
    }
}
