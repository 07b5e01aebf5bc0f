//! # lineage-cli: Lineage Provenance Command-Line Interface
//!
//! ## Subcommands
//!
//! - `policy`: Print the transition matrix and the canonical policy root
//! - `prove`: Prove a lineage step by step and write a proof bundle
//! - `verify`: Check a bundle's continuity and every proof in it
//! - `submit`: Replay a bundle against an in-memory ledger
//! - `demo`: End-to-end run including rejected transitions
//!
//! ## Crate Policy
//!
//! - Argument parsing lives with each subcommand; `main.rs` only dispatches.
//! - Handlers delegate to the domain crates. No protocol logic here.
//! - Handlers return a process exit code; errors carry `anyhow` context.

pub mod config;
pub mod demo;
pub mod policy;
pub mod prove;
pub mod submit;
pub mod toolkit;
pub mod verify;
