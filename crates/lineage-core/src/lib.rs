//! # lineage-core: Foundational Types for Lineage Provenance
//!
//! Every other crate in the workspace depends on `lineage-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Field elements are always reduced.** `FieldElement` stores the
//!    canonical big-endian encoding of a BN254 scalar. Every constructor
//!    reduces modulo the field prime, so an unreduced value can never reach
//!    a hash input.
//!
//! 2. **Newtypes for protocol values.** `StateHash` and `LineageCommitment`
//!    wrap `FieldElement` so a commitment cannot be passed where a state
//!    hash is expected.
//!
//! 3. **Closed origin enumeration.** `OriginClass` is a four-variant enum
//!    with frozen ordinals. Unknown ordinals are rejected at decode time.
//!
//! 4. **Hashing is a capability.** `FieldHasher` is a trait object handed to
//!    whoever needs it. There is no process-wide hasher instance.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `lineage-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod field;
pub mod hasher;
pub mod identity;
pub mod origin;
pub mod transition;

pub use error::FieldError;
pub use field::{FieldElement, LineageCommitment, StateHash};
pub use hasher::{FieldHasher, SharedHasher};
pub use identity::{AccountId, PolicyId};
pub use origin::{OriginClass, ORIGIN_CLASS_COUNT};
pub use transition::Transition;
