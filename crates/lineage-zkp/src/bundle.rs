//! # Proof Bundles
//!
//! An ordered file of proofs for one lineage, written by the prover and
//! read back for verification or ledger submission:
//!
//! ```json
//! {
//!   "genesis": { "state_hash": "…", "lineage_commitment": "…" },
//!   "entries": [ { "proof": {…}, "public_signals": ["…", "1"], "context": {…} } ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use lineage_core::{LineageCommitment, OriginClass, StateHash};

use crate::chain::LineageChain;
use crate::error::BundleError;
use crate::session::ProvedStep;
use crate::signals::{PublicContext, PublicSignals};
use crate::traits::ProofSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleGenesis {
    pub state_hash: StateHash,
    pub lineage_commitment: LineageCommitment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleEntry<Pr> {
    pub proof: Pr,
    pub public_signals: PublicSignals,
    pub context: PublicContext,
}

impl<Pr> From<ProvedStep<Pr>> for BundleEntry<Pr> {
    fn from(step: ProvedStep<Pr>) -> Self {
        Self {
            proof: step.proof,
            public_signals: step.signals,
            context: step.context,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBundle<Pr> {
    pub genesis: BundleGenesis,
    pub entries: Vec<BundleEntry<Pr>>,
}

impl<Pr> ProofBundle<Pr> {
    pub fn new(genesis: BundleGenesis) -> Self {
        Self {
            genesis,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: impl Into<BundleEntry<Pr>>) {
        self.entries.push(entry.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// State hash at the end of the bundle.
    pub fn head_state(&self) -> StateHash {
        self.entries
            .last()
            .map(|e| e.context.new_state_hash)
            .unwrap_or(self.genesis.state_hash)
    }

    /// Structural checks that need no backend: the genesis commitment is
    /// derived from the genesis state, each entry starts where the previous
    /// one ended and names that state's commitment and origin, and depths
    /// count up from one.
    pub fn check_continuity(&self, chain: &LineageChain) -> Result<(), BundleError> {
        if chain.genesis_commitment(self.genesis.state_hash) != self.genesis.lineage_commitment {
            return Err(BundleError::GenesisMismatch {
                state_hash: self.genesis.state_hash,
            });
        }

        let mut expected_prev = self.genesis.state_hash;
        let mut expected_lineage = self.genesis.lineage_commitment;
        let mut expected_origin = OriginClass::Genesis;
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.context.prev_state_hash != expected_prev {
                return Err(BundleError::BrokenChain {
                    index,
                    expected: expected_prev,
                    found: entry.context.prev_state_hash,
                });
            }
            if entry.context.prev_lineage_commitment != expected_lineage
                || entry.context.prev_origin != expected_origin
            {
                return Err(BundleError::BrokenLineage { index });
            }
            let expected_depth = index as u64 + 1;
            if entry.public_signals.new_depth != expected_depth {
                return Err(BundleError::DepthGap {
                    index,
                    expected: expected_depth,
                    found: entry.public_signals.new_depth,
                });
            }
            expected_prev = entry.context.new_state_hash;
            expected_lineage = entry.public_signals.new_lineage_commitment;
            expected_origin = entry.context.new_origin;
        }
        Ok(())
    }

    /// Continuity plus proof verification of every entry.
    ///
    /// A verifier error is reported as [`BundleError::InvalidProof`], the
    /// same as a proof that does not verify.
    pub fn verify<P>(
        &self,
        chain: &LineageChain,
        backend: &P,
        vk: &P::VerifyingKey,
    ) -> Result<(), BundleError>
    where
        P: ProofSystem<Proof = Pr>,
    {
        self.check_continuity(chain)?;
        for (index, entry) in self.entries.iter().enumerate() {
            let ok = backend
                .verify_proof(vk, &entry.context, &entry.public_signals, &entry.proof)
                .unwrap_or_else(|e| {
                    warn!(index, error = %e, "bundle entry verifier error");
                    false
                });
            if !ok {
                return Err(BundleError::InvalidProof { index });
            }
        }
        debug!(entries = self.entries.len(), "bundle verified");
        Ok(())
    }
}

impl<Pr: Serialize> ProofBundle<Pr> {
    pub fn to_json(&self) -> Result<String, BundleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), BundleError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| BundleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), entries = self.entries.len(), "bundle written");
        Ok(())
    }
}

impl<Pr: serde::de::DeserializeOwned> ProofBundle<Pr> {
    pub fn from_json(json: &str) -> Result<Self, BundleError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn read_from(path: &Path) -> Result<Self, BundleError> {
        let json = fs::read_to_string(path).map_err(|source| BundleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockProof, MockProofSystem};
    use crate::session::LineageSession;
    use lineage_core::{FieldElement, OriginClass};
    use lineage_crypto::Sha256FieldHasher;
    use std::sync::Arc;

    fn sh(v: u64) -> StateHash {
        StateHash::new(FieldElement::from_u64(v))
    }

    fn bundle(steps: u64) -> (LineageChain, MockProofSystem, ProofBundle<MockProof>) {
        let chain = LineageChain::new(Arc::new(Sha256FieldHasher::new()));
        let backend = MockProofSystem::new(chain.clone());
        let (pk, _) = MockProofSystem::setup("bundle");
        let root = chain.policy().canonical_root().unwrap();
        let mut session = LineageSession::new(chain.clone(), sh(0xaa));
        let mut bundle: ProofBundle<MockProof> = ProofBundle::new(BundleGenesis {
            state_hash: session.genesis().state_hash,
            lineage_commitment: session.genesis().commitment,
        });
        for i in 0..steps {
            let step = session
                .prove_step(&backend, &pk, sh(0x100 + i), OriginClass::User, i, root)
                .unwrap();
            bundle.push(step);
        }
        (chain, backend, bundle)
    }

    #[test]
    fn honest_bundle_verifies() {
        let (chain, backend, bundle) = bundle(3);
        let (_, vk) = MockProofSystem::setup("bundle");
        assert_eq!(bundle.len(), 3);
        assert_eq!(bundle.head_state(), sh(0x102));
        bundle.verify(&chain, &backend, &vk).unwrap();
    }

    #[test]
    fn reordered_entries_break_chain() {
        let (chain, _, mut bundle) = bundle(3);
        bundle.entries.swap(1, 2);
        assert!(matches!(
            bundle.check_continuity(&chain),
            Err(BundleError::BrokenChain { index: 1, .. })
        ));
    }

    #[test]
    fn dropped_entry_breaks_chain() {
        let (chain, _, mut bundle) = bundle(3);
        bundle.entries.remove(0);
        assert!(matches!(
            bundle.check_continuity(&chain),
            Err(BundleError::BrokenChain { index: 0, .. })
        ));
    }

    #[test]
    fn forged_genesis_commitment_detected() {
        let (chain, _, mut bundle) = bundle(1);
        bundle.genesis.lineage_commitment = LineageCommitment::new(FieldElement::from_u64(1));
        assert!(matches!(
            bundle.check_continuity(&chain),
            Err(BundleError::GenesisMismatch { .. })
        ));
    }

    #[test]
    fn entry_must_extend_previous_commitment() {
        let (chain, _, mut bundle) = bundle(3);
        bundle.entries[1].context.prev_lineage_commitment =
            LineageCommitment::new(FieldElement::from_u64(12_345));
        assert!(matches!(
            bundle.check_continuity(&chain),
            Err(BundleError::BrokenLineage { index: 1 })
        ));
    }

    #[test]
    fn entry_must_extend_previous_origin() {
        let (chain, _, mut bundle) = bundle(2);
        bundle.entries[1].context.prev_origin = OriginClass::Admin;
        assert!(matches!(
            bundle.check_continuity(&chain),
            Err(BundleError::BrokenLineage { index: 1 })
        ));
    }

    #[test]
    fn tampered_proof_is_invalid() {
        let (chain, backend, mut bundle) = bundle(2);
        let (_, vk) = MockProofSystem::setup("bundle");
        bundle.entries[1].proof.proof_hex = "0".repeat(64);
        assert!(matches!(
            bundle.verify(&chain, &backend, &vk),
            Err(BundleError::InvalidProof { index: 1 })
        ));
    }

    #[test]
    fn json_round_trip() {
        let (_, _, bundle) = bundle(2);
        let json = bundle.to_json().unwrap();
        let back: ProofBundle<MockProof> = ProofBundle::from_json(&json).unwrap();
        assert_eq!(back, bundle);
    }

    #[test]
    fn garbage_json_is_error() {
        assert!(matches!(
            ProofBundle::<MockProof>::from_json("{not json"),
            Err(BundleError::Json(_))
        ));
    }
}
