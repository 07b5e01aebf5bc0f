//! Process-wide components, built once from the configuration and shared
//! by every subcommand: the hash primitive, the lineage chain, the mock
//! backend and its key pair, and the canonical policy root.

use std::sync::Arc;

use anyhow::{Context, Result};

use lineage_core::{FieldElement, SharedHasher};
use lineage_crypto::Sha256FieldHasher;
use lineage_policy::PolicyEngine;
use lineage_state::LineageLedger;
use lineage_zkp::{
    LineageChain, MockProof, MockProofSystem, MockProvingKey, MockVerifyingKey, ProofBundle,
};

use crate::config::LineageConfig;

pub struct Toolkit {
    pub config: LineageConfig,
    pub hasher: SharedHasher,
    pub chain: LineageChain,
    pub backend: Arc<MockProofSystem>,
    pub proving_key: MockProvingKey,
    pub verifying_key: MockVerifyingKey,
    pub policy_root: FieldElement,
}

impl Toolkit {
    pub fn new(config: LineageConfig) -> Result<Self> {
        let hasher: SharedHasher = Arc::new(Sha256FieldHasher::new());
        let chain = LineageChain::new(Arc::clone(&hasher));
        let policy_root = chain
            .policy()
            .canonical_root()
            .context("failed to build canonical policy tree")?;
        let backend = Arc::new(MockProofSystem::new(chain.clone()));
        let (proving_key, verifying_key) = MockProofSystem::setup(&config.key_label);
        tracing::debug!(
            hasher = hasher.name(),
            key_label = %config.key_label,
            policy_root = %policy_root,
            "toolkit ready"
        );
        Ok(Self {
            config,
            hasher,
            chain,
            backend,
            proving_key,
            verifying_key,
            policy_root,
        })
    }

    pub fn policy(&self) -> &PolicyEngine {
        self.chain.policy()
    }

    /// Fresh ledger administered by the configured admin, with the
    /// canonical policy registered and active.
    pub fn ledger(&self) -> Result<LineageLedger<MockProofSystem>> {
        let admin = self.config.admin;
        let mut ledger = LineageLedger::new(
            Arc::clone(&self.backend),
            self.verifying_key.clone(),
            admin,
        );
        let id = ledger
            .create_policy(admin, self.policy_root, &self.config.policy_label)
            .context("failed to register policy")?;
        ledger
            .activate_policy(admin, id)
            .context("failed to activate policy")?;
        Ok(ledger)
    }

    /// Replay `bundle` into `ledger`: genesis, then every entry in order.
    pub fn submit_bundle(
        &self,
        ledger: &mut LineageLedger<MockProofSystem>,
        bundle: &ProofBundle<MockProof>,
    ) -> Result<()> {
        ledger
            .set_genesis(
                self.config.admin,
                bundle.genesis.state_hash,
                bundle.genesis.lineage_commitment,
            )
            .context("genesis rejected")?;
        for (index, entry) in bundle.entries.iter().enumerate() {
            ledger
                .verify_lineage(entry)
                .with_context(|| format!("entry {index} rejected"))?;
        }
        Ok(())
    }
}
