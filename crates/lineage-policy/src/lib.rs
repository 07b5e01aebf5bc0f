//! # lineage-policy: Origin-Class Transition Policy
//!
//! Decides which `(prev_origin, new_origin)` moves a lineage may make, and
//! commits to that decision as a Merkle root the proving circuit can check
//! membership against.
//!
//! ## Security Invariant
//!
//! The predicate [`PolicyEngine::is_allowed`] is the only hand-written rule
//! set. The canonical policy tree is built from [`accepted_pairs`], which
//! enumerates the predicate, so the two representations cannot drift.

pub mod engine;
pub mod error;

pub use engine::{
    accepted_pairs, accepted_pairs_at, is_allowed, PolicyEngine, PolicyEntry, PolicyTree,
};
pub use error::PolicyError;
