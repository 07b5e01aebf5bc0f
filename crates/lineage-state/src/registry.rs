//! # Policy Root Registry
//!
//! Registered policy roots with sequential ids from 1. Activation is a
//! switch: the newly activated policy replaces the previous one, and at
//! most one is active at any time. Policies are never removed.

use serde::{Deserialize, Serialize};

use lineage_core::{FieldElement, PolicyId};

use crate::error::RegistryError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub id: PolicyId,
    pub root: FieldElement,
    pub label: String,
}

#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    policies: Vec<PolicyRecord>,
    active: Option<PolicyId>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a root. Does not activate it.
    pub fn create(&mut self, root: FieldElement, label: &str) -> Result<PolicyId, RegistryError> {
        if root.is_zero() {
            return Err(RegistryError::ZeroPolicyRoot);
        }
        let id = PolicyId(self.policies.len() as u64 + 1);
        self.policies.push(PolicyRecord {
            id,
            root,
            label: label.to_string(),
        });
        Ok(id)
    }

    /// Make `id` the active policy, returning the one it replaced.
    pub fn activate(&mut self, id: PolicyId) -> Result<Option<PolicyId>, RegistryError> {
        self.get(id).ok_or(RegistryError::UnknownPolicy(id))?;
        Ok(self.active.replace(id))
    }

    pub fn get(&self, id: PolicyId) -> Option<&PolicyRecord> {
        let index = usize::try_from(id.0).ok()?.checked_sub(1)?;
        self.policies.get(index)
    }

    pub fn active(&self) -> Option<&PolicyRecord> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn current_root(&self) -> Option<FieldElement> {
        self.active().map(|p| p.root)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PolicyRecord> {
        self.policies.iter()
    }
}
