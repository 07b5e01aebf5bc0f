//! # lineage-state: Lineage Ledger
//!
//! The authoritative record store. Each state hash moves `Unknown →
//! Verified` once and never again; the ledger as a whole moves
//! `Uninitialized → GenesisSet` once.
//!
//! - **Ledger** (`ledger.rs`): [`LineageLedger`] with genesis, lineage
//!   verification, admin transfer and read accessors.
//! - **Policy registry** (`registry.rs`): policy roots with exactly one
//!   active at a time.
//! - **Events** (`events.rs`): what each successful call emitted.
//!
//! ## Security Invariant
//!
//! Every mutating call validates all of its preconditions before writing
//! anything. A call that returns an error leaves the ledger exactly as it
//! was, so a corrected retry is always safe.
//!
//! The ledger takes `&mut self` for every mutation; callers that share it
//! across threads put it behind a lock, which gives the total order the
//! state machine assumes.

pub mod error;
pub mod events;
pub mod ledger;
pub mod registry;

pub use error::{LedgerError, RegistryError};
pub use events::LedgerEvent;
pub use ledger::{LedgerRecord, LineageLedger, LineageSubmission};
pub use registry::{PolicyRecord, PolicyRegistry};
