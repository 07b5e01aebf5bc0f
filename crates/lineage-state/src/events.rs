//! Ledger events, appended in call order and returned by the call that
//! emitted them.

use serde::{Deserialize, Serialize};

use lineage_core::{AccountId, FieldElement, LineageCommitment, PolicyId, StateHash};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    GenesisSet {
        state_hash: StateHash,
        lineage_commitment: LineageCommitment,
    },
    LineageVerified {
        state_hash: StateHash,
        lineage_commitment: LineageCommitment,
        depth: u64,
    },
    AdminTransferred {
        previous: AccountId,
        new_admin: AccountId,
    },
    PolicyCreated {
        policy_id: PolicyId,
        root: FieldElement,
        label: String,
    },
    PolicyActivated {
        policy_id: PolicyId,
        root: FieldElement,
    },
}
