//! # Verify Subcommand
//!
//! Reads a proof bundle and checks it without a ledger: the genesis
//! commitment, continuity from entry to entry, depth counting, and every
//! proof against the configured verifying key.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use lineage_zkp::{MockProof, ProofBundle};

use crate::toolkit::Toolkit;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Bundle file written by `prove`.
    #[arg(long)]
    pub bundle: PathBuf,
}

pub fn run_verify(args: &VerifyArgs, toolkit: &Toolkit) -> Result<u8> {
    let bundle: ProofBundle<MockProof> = ProofBundle::read_from(&args.bundle)
        .with_context(|| format!("failed to load bundle {}", args.bundle.display()))?;

    if let Err(e) = bundle.verify(
        &toolkit.chain,
        toolkit.backend.as_ref(),
        &toolkit.verifying_key,
    ) {
        println!("FAIL: {e}");
        return Ok(1);
    }

    println!("OK: {} entries verified", bundle.len());
    println!("  Genesis: {}", bundle.genesis.state_hash);
    println!("  Head:    {}", bundle.head_state());
    Ok(0)
}
