//! # Lineage Ledger State Machine
//!
//! Per state hash: `Unknown → Verified` (terminal). Ledger-wide:
//! `Uninitialized → GenesisSet`, exactly once.
//!
//! ## Acceptance of a lineage submission
//!
//! A submission carries a proof, its public signals
//! `[new_lineage_commitment, new_depth]`, and the public context the proof
//! is bound to: the predecessor state with its lineage commitment and
//! origin, the new state with its origin, and the policy root. It is
//! accepted only if, in order:
//!
//! 1. genesis is set;
//! 2. a policy is active and its root is the one in the context;
//! 3. the new state hash is non-zero;
//! 4. the new state has no record yet (no replay, no overwrite);
//! 5. the predecessor has a record;
//! 6. the context's predecessor commitment is the recorded one;
//! 7. the context's predecessor origin is the recorded one;
//! 8. the backend verifies the proof;
//! 9. the claimed depth is the predecessor's depth plus one.
//!
//! The new commitment is taken from the signals as proven. The ledger does
//! not recompute it.
//!
//! ## Security Invariant
//!
//! Records are append-only and `total_transitions` equals the number of
//! non-genesis records. All checks run before the first write. Every
//! record's commitment descends from the genesis commitment through proven
//! steps.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use lineage_core::{AccountId, FieldElement, LineageCommitment, OriginClass, PolicyId, StateHash};
use lineage_zkp::{BundleEntry, ProofSystem};

use crate::error::LedgerError;
use crate::events::LedgerEvent;
use crate::registry::PolicyRegistry;

/// A proof submitted for acceptance. Same shape as a bundle entry.
pub type LineageSubmission<Pr> = BundleEntry<Pr>;

/// What the ledger knows about one state. The default value is what the
/// read accessors report for an unknown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub lineage_commitment: LineageCommitment,
    pub depth: u64,
    /// Origin class of the transition that produced this state.
    pub origin: OriginClass,
    pub verified: bool,
}

impl Default for LedgerRecord {
    fn default() -> Self {
        Self {
            lineage_commitment: LineageCommitment::ZERO,
            depth: 0,
            origin: OriginClass::Genesis,
            verified: false,
        }
    }
}

pub struct LineageLedger<P: ProofSystem> {
    backend: Arc<P>,
    verifying_key: P::VerifyingKey,
    admin: AccountId,
    records: HashMap<StateHash, LedgerRecord>,
    genesis: Option<StateHash>,
    total_transitions: u64,
    policies: PolicyRegistry,
    events: Vec<LedgerEvent>,
}

impl<P: ProofSystem> std::fmt::Debug for LineageLedger<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineageLedger")
            .field("admin", &self.admin)
            .field("genesis", &self.genesis)
            .field("records", &self.records.len())
            .field("total_transitions", &self.total_transitions)
            .field("active_policy", &self.policies.current_root())
            .finish()
    }
}

impl<P: ProofSystem> LineageLedger<P> {
    pub fn new(backend: Arc<P>, verifying_key: P::VerifyingKey, admin: AccountId) -> Self {
        Self {
            backend,
            verifying_key,
            admin,
            records: HashMap::new(),
            genesis: None,
            total_transitions: 0,
            policies: PolicyRegistry::new(),
            events: Vec::new(),
        }
    }

    fn require_admin(&self, caller: AccountId) -> Result<(), LedgerError> {
        if caller != self.admin {
            return Err(LedgerError::NotAdmin { caller });
        }
        Ok(())
    }

    fn emit(&mut self, event: LedgerEvent) -> LedgerEvent {
        self.events.push(event.clone());
        event
    }

    // ── Mutations ──────────────────────────────────────────────────

    /// Record the lineage root at depth 0. Admin only, once.
    pub fn set_genesis(
        &mut self,
        caller: AccountId,
        state_hash: StateHash,
        lineage_commitment: LineageCommitment,
    ) -> Result<LedgerEvent, LedgerError> {
        self.require_admin(caller)?;
        if self.genesis.is_some() {
            return Err(LedgerError::GenesisAlreadySet);
        }
        if state_hash.is_zero() {
            return Err(LedgerError::ZeroStateHash);
        }

        self.records.insert(
            state_hash,
            LedgerRecord {
                lineage_commitment,
                depth: 0,
                origin: OriginClass::Genesis,
                verified: true,
            },
        );
        self.genesis = Some(state_hash);
        info!(state = %state_hash, "genesis set");
        Ok(self.emit(LedgerEvent::GenesisSet {
            state_hash,
            lineage_commitment,
        }))
    }

    /// Accept one proven transition.
    ///
    /// # Errors
    ///
    /// See the module docs for the order of checks. A failed backend
    /// verification, whether `Ok(false)` or a verifier error, is
    /// [`LedgerError::InvalidProof`].
    pub fn verify_lineage(
        &mut self,
        submission: &LineageSubmission<P::Proof>,
    ) -> Result<LedgerEvent, LedgerError> {
        let result = self.check_submission(submission);
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                warn!(
                    prev = %submission.context.prev_state_hash,
                    new = %submission.context.new_state_hash,
                    error = %err,
                    "lineage submission rejected"
                );
                return Err(err);
            }
        };

        let state_hash = submission.context.new_state_hash;
        self.records.insert(state_hash, record);
        self.total_transitions += 1;
        info!(
            state = %state_hash,
            depth = record.depth,
            total = self.total_transitions,
            "lineage verified"
        );
        Ok(self.emit(LedgerEvent::LineageVerified {
            state_hash,
            lineage_commitment: record.lineage_commitment,
            depth: record.depth,
        }))
    }

    fn check_submission(
        &self,
        submission: &LineageSubmission<P::Proof>,
    ) -> Result<LedgerRecord, LedgerError> {
        let ctx = &submission.context;
        let signals = &submission.public_signals;

        if self.genesis.is_none() {
            return Err(LedgerError::GenesisNotSet);
        }
        let active_root = self.policies.current_root().ok_or(LedgerError::NoActivePolicy)?;
        if active_root != ctx.policy_root {
            return Err(LedgerError::PolicyRootMismatch {
                expected: active_root,
                actual: ctx.policy_root,
            });
        }
        if ctx.new_state_hash.is_zero() {
            return Err(LedgerError::ZeroStateHash);
        }
        if self.records.contains_key(&ctx.new_state_hash) {
            return Err(LedgerError::StateAlreadyVerified {
                state_hash: ctx.new_state_hash,
            });
        }
        let prev = self
            .records
            .get(&ctx.prev_state_hash)
            .ok_or(LedgerError::UnknownPredecessor {
                state_hash: ctx.prev_state_hash,
            })?;
        if ctx.prev_lineage_commitment != prev.lineage_commitment {
            return Err(LedgerError::LineageMismatch {
                state_hash: ctx.prev_state_hash,
                expected: prev.lineage_commitment,
                actual: ctx.prev_lineage_commitment,
            });
        }
        if ctx.prev_origin != prev.origin {
            return Err(LedgerError::OriginMismatch {
                state_hash: ctx.prev_state_hash,
                expected: prev.origin,
                actual: ctx.prev_origin,
            });
        }

        let verified = self
            .backend
            .verify_proof(&self.verifying_key, ctx, signals, &submission.proof)
            .unwrap_or_else(|e| {
                warn!(error = %e, "verifier error");
                false
            });
        if !verified {
            return Err(LedgerError::InvalidProof {
                prev_state_hash: ctx.prev_state_hash,
                new_state_hash: ctx.new_state_hash,
            });
        }

        let expected_depth = prev.depth.saturating_add(1);
        if signals.new_depth != expected_depth {
            return Err(LedgerError::DepthMismatch {
                expected: expected_depth,
                actual: signals.new_depth,
            });
        }

        Ok(LedgerRecord {
            lineage_commitment: signals.new_lineage_commitment,
            depth: signals.new_depth,
            origin: ctx.new_origin,
            verified: true,
        })
    }

    /// Single-step admin handover.
    pub fn transfer_admin(
        &mut self,
        caller: AccountId,
        new_admin: AccountId,
    ) -> Result<LedgerEvent, LedgerError> {
        self.require_admin(caller)?;
        let previous = std::mem::replace(&mut self.admin, new_admin);
        info!(previous = %previous, new_admin = %new_admin, "admin transferred");
        Ok(self.emit(LedgerEvent::AdminTransferred {
            previous,
            new_admin,
        }))
    }

    pub fn create_policy(
        &mut self,
        caller: AccountId,
        root: FieldElement,
        label: &str,
    ) -> Result<PolicyId, LedgerError> {
        self.require_admin(caller)?;
        let policy_id = self.policies.create(root, label)?;
        info!(policy = %policy_id, root = %root, label, "policy created");
        self.emit(LedgerEvent::PolicyCreated {
            policy_id,
            root,
            label: label.to_string(),
        });
        Ok(policy_id)
    }

    pub fn activate_policy(
        &mut self,
        caller: AccountId,
        policy_id: PolicyId,
    ) -> Result<LedgerEvent, LedgerError> {
        self.require_admin(caller)?;
        self.policies.activate(policy_id)?;
        let root = self
            .policies
            .current_root()
            .ok_or(LedgerError::NoActivePolicy)?;
        info!(policy = %policy_id, root = %root, "policy activated");
        Ok(self.emit(LedgerEvent::PolicyActivated { policy_id, root }))
    }

    // ── Reads ──────────────────────────────────────────────────────

    pub fn admin(&self) -> AccountId {
        self.admin
    }

    pub fn genesis_initialized(&self) -> bool {
        self.genesis.is_some()
    }

    pub fn genesis_state(&self) -> Option<StateHash> {
        self.genesis
    }

    pub fn total_transitions(&self) -> u64 {
        self.total_transitions
    }

    pub fn has_verified_lineage(&self, state_hash: &StateHash) -> bool {
        self.get_state_info(state_hash).verified
    }

    pub fn get_lineage(&self, state_hash: &StateHash) -> LineageCommitment {
        self.get_state_info(state_hash).lineage_commitment
    }

    pub fn get_depth(&self, state_hash: &StateHash) -> u64 {
        self.get_state_info(state_hash).depth
    }

    /// `(lineage, depth, verified)` for `state_hash`, zeroed if unknown.
    pub fn get_state_info(&self, state_hash: &StateHash) -> LedgerRecord {
        self.records.get(state_hash).copied().unwrap_or_default()
    }

    pub fn current_policy_root(&self) -> Option<FieldElement> {
        self.policies.current_root()
    }

    pub fn policies(&self) -> &PolicyRegistry {
        &self.policies
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}
