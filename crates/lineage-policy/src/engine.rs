//! # Policy Engine
//!
//! Two views of one rule set:
//!
//! - [`is_allowed`]: the ordered predicate over `(prev_origin, new_origin,
//!   prev_depth)`. First matching denial wins.
//! - [`PolicyTree`]: a Merkle tree whose leaves are `H(from, to)` for the
//!   accepted pairs. The proving circuit checks membership against its root.
//!
//! The predicate depends on depth only through `prev_depth > 0`, so the
//! pair set is the union of [`accepted_pairs_at`] for depth 0 and depth 1.
//! The depth rule itself cannot be expressed by pair membership and is
//! checked next to it:
//!
//! ```text
//! is_allowed(f, t, d)  <=>  member(f, t)  &&  !(d > 0 && t == Genesis)
//! ```

use serde::Serialize;
use tracing::debug;

use lineage_core::{FieldElement, OriginClass, SharedHasher};
use lineage_crypto::{MembershipProof, MerkleTree};

use crate::error::PolicyError;

/// Ordered authorization predicate.
pub fn is_allowed(prev_origin: OriginClass, new_origin: OriginClass, prev_depth: u64) -> bool {
    use OriginClass::*;
    match (prev_origin, new_origin) {
        // No privilege escalation.
        (User, Admin) => false,
        (User, Bridge) => false,
        (Bridge, Admin) => false,
        // No chained bridging.
        (Bridge, Bridge) => false,
        (_, Genesis) if prev_depth > 0 => false,
        _ => true,
    }
}

/// Pairs accepted at a given predecessor depth, in ordinal order.
pub fn accepted_pairs_at(prev_depth: u64) -> Vec<(OriginClass, OriginClass)> {
    OriginClass::ALL
        .iter()
        .flat_map(|from| OriginClass::ALL.iter().map(move |to| (*from, *to)))
        .filter(|(from, to)| is_allowed(*from, *to, prev_depth))
        .collect()
}

/// Every pair the predicate accepts at some depth, in ordinal order.
///
/// This is the leaf list of the canonical policy tree.
pub fn accepted_pairs() -> Vec<(OriginClass, OriginClass)> {
    OriginClass::ALL
        .iter()
        .flat_map(|from| OriginClass::ALL.iter().map(move |to| (*from, *to)))
        .filter(|(from, to)| is_allowed(*from, *to, 0) || is_allowed(*from, *to, 1))
        .collect()
}

/// A Merkle tree over policy leaves, remembering which pair sits where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTree {
    pairs: Vec<(OriginClass, OriginClass)>,
    tree: MerkleTree,
}

impl PolicyTree {
    pub fn root(&self) -> FieldElement {
        self.tree.root()
    }

    /// Pairs in leaf order.
    pub fn pairs(&self) -> &[(OriginClass, OriginClass)] {
        &self.pairs
    }

    pub fn leaf_index(&self, from: OriginClass, to: OriginClass) -> Option<usize> {
        self.pairs.iter().position(|p| *p == (from, to))
    }

    pub fn contains_pair(&self, from: OriginClass, to: OriginClass) -> bool {
        self.leaf_index(from, to).is_some()
    }

    pub fn merkle(&self) -> &MerkleTree {
        &self.tree
    }
}

/// One row of the policy matrix, for display and JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyEntry {
    pub from: OriginClass,
    pub to: OriginClass,
    pub at_genesis: bool,
    pub mid_lineage: bool,
    pub leaf_index: Option<usize>,
}

/// Policy operations bound to the process hash primitive.
#[derive(Clone)]
pub struct PolicyEngine {
    hasher: SharedHasher,
}

impl std::fmt::Debug for PolicyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyEngine")
            .field("hasher", &self.hasher.name())
            .finish()
    }
}

impl PolicyEngine {
    pub fn new(hasher: SharedHasher) -> Self {
        Self { hasher }
    }

    pub fn hasher(&self) -> &SharedHasher {
        &self.hasher
    }

    pub fn is_allowed(
        &self,
        prev_origin: OriginClass,
        new_origin: OriginClass,
        prev_depth: u64,
    ) -> bool {
        is_allowed(prev_origin, new_origin, prev_depth)
    }

    /// `H(from, to)` over the origin ordinals.
    pub fn policy_leaf(&self, from: OriginClass, to: OriginClass) -> FieldElement {
        self.hasher.hash(&[from.to_field(), to.to_field()])
    }

    /// Build a tree over `pairs` in caller order.
    pub fn build_policy_tree(
        &self,
        pairs: &[(OriginClass, OriginClass)],
    ) -> Result<PolicyTree, PolicyError> {
        for (i, (from, to)) in pairs.iter().enumerate() {
            if pairs[..i].contains(&(*from, *to)) {
                return Err(PolicyError::DuplicatePair {
                    from: *from,
                    to: *to,
                });
            }
        }
        let leaves: Vec<FieldElement> = pairs
            .iter()
            .map(|(from, to)| self.policy_leaf(*from, *to))
            .collect();
        let tree = MerkleTree::build(self.hasher.as_ref(), &leaves)?;
        debug!(
            pairs = pairs.len(),
            root = %tree.root(),
            "built policy tree"
        );
        Ok(PolicyTree {
            pairs: pairs.to_vec(),
            tree,
        })
    }

    /// The tree over [`accepted_pairs`].
    pub fn canonical_tree(&self) -> Result<PolicyTree, PolicyError> {
        self.build_policy_tree(&accepted_pairs())
    }

    pub fn canonical_root(&self) -> Result<FieldElement, PolicyError> {
        Ok(self.canonical_tree()?.root())
    }

    /// Sibling path and direction bits for the leaf at `leaf_index`.
    pub fn prove_membership(
        &self,
        tree: &PolicyTree,
        leaf_index: usize,
    ) -> Result<MembershipProof, PolicyError> {
        Ok(tree.tree.prove(leaf_index)?)
    }

    /// Membership proof looked up by pair.
    pub fn prove_pair(
        &self,
        tree: &PolicyTree,
        from: OriginClass,
        to: OriginClass,
    ) -> Result<MembershipProof, PolicyError> {
        let index = tree
            .leaf_index(from, to)
            .ok_or(PolicyError::PairNotInPolicy { from, to })?;
        self.prove_membership(tree, index)
    }

    pub fn verify_membership(
        &self,
        leaf: FieldElement,
        siblings: &[FieldElement],
        directions: &[bool],
        root: FieldElement,
    ) -> bool {
        lineage_crypto::verify_membership(self.hasher.as_ref(), leaf, siblings, directions, root)
    }

    /// Tree-side evaluation of a transition: pair membership plus the depth
    /// rule. Agrees with [`is_allowed`] for the canonical tree.
    pub fn check_against_tree(
        &self,
        tree: &PolicyTree,
        prev_origin: OriginClass,
        new_origin: OriginClass,
        prev_depth: u64,
    ) -> bool {
        let Ok(proof) = self.prove_pair(tree, prev_origin, new_origin) else {
            return false;
        };
        let leaf = self.policy_leaf(prev_origin, new_origin);
        let reenters_genesis = prev_depth > 0 && new_origin == OriginClass::Genesis;
        proof.leaf == leaf && proof.verify(self.hasher.as_ref(), tree.root()) && !reenters_genesis
    }

    /// Full 4x4 matrix against the canonical tree.
    pub fn matrix(&self, tree: &PolicyTree) -> Vec<PolicyEntry> {
        OriginClass::ALL
            .iter()
            .flat_map(|from| OriginClass::ALL.iter().map(move |to| (*from, *to)))
            .map(|(from, to)| PolicyEntry {
                from,
                to,
                at_genesis: is_allowed(from, to, 0),
                mid_lineage: is_allowed(from, to, 1),
                leaf_index: tree.leaf_index(from, to),
            })
            .collect()
    }
}
