//! # lineage-zkp: Lineage Chain and Proof Boundary
//!
//! Everything between a [`Transition`](lineage_core::Transition) and a proof
//! the ledger can check:
//!
//! - **Chain** (`chain.rs`): genesis commitment, transition digest and
//!   successor commitment, plus witness assembly behind the policy pre-check.
//! - **Witness and signals** (`witness.rs`, `signals.rs`): the backend's
//!   input and output shapes, encoded as decimal field strings on the wire.
//! - **Proof boundary** (`traits.rs`): the open [`ProofSystem`] trait.
//! - **Mock backend** (`mock.rs`): deterministic and transparent. Mirrors the
//!   circuit's checks and tags proofs with SHA-256.
//! - **Session** (`session.rs`): sequential prover for one lineage.
//! - **Bundles** (`bundle.rs`): ordered proof files for later verification or
//!   submission.
//!
//! ## Security Invariant
//!
//! A transition whose origin pair fails the policy predicate never reaches a
//! proving backend. [`LineageChain::build_witness`] is the only way to make a
//! [`Witness`] from a transition and it checks the predicate first.

pub mod bundle;
pub mod chain;
pub mod error;
pub mod mock;
pub mod session;
pub mod signals;
pub mod traits;
pub mod witness;

pub use bundle::{BundleEntry, BundleGenesis, ProofBundle};
pub use chain::LineageChain;
pub use error::{BundleError, LineageError, SessionError};
pub use mock::{MockBehavior, MockProof, MockProofSystem, MockProvingKey, MockVerifyingKey};
pub use session::{LineageHead, LineageSession, ProvedStep};
pub use signals::{PublicContext, PublicSignals};
pub use traits::{ProofError, ProofSystem, VerifyError};
pub use witness::Witness;
