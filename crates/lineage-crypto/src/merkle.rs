//! # Ordered Binary Merkle Tree
//!
//! A balanced binary tree over field elements:
//!
//! - Leaves are padded with [`FieldElement::ZERO`] up to the next power of two.
//! - Internal node = `H(left, right)`. The hash is ordered, not commutative.
//! - The root is the compact commitment to the leaf list.
//!
//! Membership proofs are a sibling path plus one direction bit per level.
//! A set bit means the running node is the right child at that level, so
//! the parent is `H(sibling, current)`; a clear bit gives `H(current, sibling)`.
//!
//! Built level by level from the leaves, the same way the receipt-chain
//! accumulator computes power-of-two peak roots.

use lineage_core::{FieldElement, FieldHasher};

use crate::error::MerkleError;

/// A fully materialised Merkle tree. `layers[0]` are the padded leaves and
/// the last layer holds the single root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    layers: Vec<Vec<FieldElement>>,
    leaf_count: usize,
}

/// Sibling path from a leaf to the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipProof {
    /// Index of the proven leaf.
    pub leaf_index: usize,
    /// The proven leaf value.
    pub leaf: FieldElement,
    /// Sibling at each level, leaf level first.
    pub siblings: Vec<FieldElement>,
    /// `true` where the running node is the right child.
    pub directions: Vec<bool>,
}

impl MerkleTree {
    /// Build a tree over `leaves` in the given order.
    pub fn build(hasher: &dyn FieldHasher, leaves: &[FieldElement]) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyTree);
        }

        let width = leaves.len().next_power_of_two();
        let mut level: Vec<FieldElement> = Vec::with_capacity(width);
        level.extend_from_slice(leaves);
        level.resize(width, FieldElement::ZERO);

        let mut layers = vec![level];
        while let Some(current) = layers.last() {
            if current.len() <= 1 {
                break;
            }
            let next: Vec<FieldElement> = current
                .chunks_exact(2)
                .map(|pair| hasher.hash(&[pair[0], pair[1]]))
                .collect();
            layers.push(next);
        }

        Ok(Self {
            layers,
            leaf_count: leaves.len(),
        })
    }

    pub fn root(&self) -> FieldElement {
        self.layers
            .last()
            .and_then(|top| top.first())
            .copied()
            .unwrap_or(FieldElement::ZERO)
    }

    /// Number of leaves supplied by the caller, before padding.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Leaves after zero padding.
    pub fn padded_leaves(&self) -> &[FieldElement] {
        self.layers.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of hashing levels between a leaf and the root.
    pub fn height(&self) -> usize {
        self.layers.len().saturating_sub(1)
    }

    pub fn leaf(&self, index: usize) -> Option<FieldElement> {
        if index < self.leaf_count {
            self.padded_leaves().get(index).copied()
        } else {
            None
        }
    }

    /// Sibling path for the leaf at `index`.
    pub fn prove(&self, index: usize) -> Result<MembershipProof, MerkleError> {
        let leaf = self.leaf(index).ok_or(MerkleError::LeafIndexOutOfRange {
            index,
            leaf_count: self.leaf_count,
        })?;

        let mut pos = index;
        let mut siblings = Vec::with_capacity(self.height());
        let mut directions = Vec::with_capacity(self.height());
        for level in &self.layers[..self.height()] {
            let sibling_pos = pos ^ 1;
            siblings.push(level[sibling_pos]);
            directions.push(pos & 1 == 1);
            pos /= 2;
        }

        Ok(MembershipProof {
            leaf_index: index,
            leaf,
            siblings,
            directions,
        })
    }
}

/// Recompute the root from `leaf` along the path and compare.
///
/// Returns `false` rather than an error for malformed input, including a
/// path whose length disagrees with its direction bits.
pub fn verify_membership(
    hasher: &dyn FieldHasher,
    leaf: FieldElement,
    siblings: &[FieldElement],
    directions: &[bool],
    root: FieldElement,
) -> bool {
    if siblings.len() != directions.len() {
        return false;
    }
    let computed = siblings
        .iter()
        .zip(directions)
        .fold(leaf, |current, (sibling, is_right)| {
            if *is_right {
                hasher.hash(&[*sibling, current])
            } else {
                hasher.hash(&[current, *sibling])
            }
        });
    computed == root
}

impl MembershipProof {
    /// Verify this proof against `root`.
    pub fn verify(&self, hasher: &dyn FieldHasher, root: FieldElement) -> bool {
        verify_membership(hasher, self.leaf, &self.siblings, &self.directions, root)
    }
}
