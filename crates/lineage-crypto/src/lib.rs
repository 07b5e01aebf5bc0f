//! # lineage-crypto: Cryptographic Primitives
//!
//! - **Hash-to-field** (`hash.rs`): [`Sha256FieldHasher`], the shipped
//!   [`FieldHasher`](lineage_core::FieldHasher) implementation.
//! - **Merkle tree** (`merkle.rs`): a balanced binary tree over field
//!   elements, zero-padded to a power of two, with sibling-path membership
//!   proofs.
//!
//! ## Crate Policy
//!
//! - Depends only on `lineage-core` internally.
//! - The tree never owns a hasher; callers pass the shared handle in.

pub mod error;
pub mod hash;
pub mod merkle;

pub use error::MerkleError;
pub use hash::Sha256FieldHasher;
pub use merkle::{verify_membership, MembershipProof, MerkleTree};
