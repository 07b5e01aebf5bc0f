//! # Submit Subcommand
//!
//! Replays a proof bundle against a fresh in-memory ledger: registers and
//! activates the canonical policy, sets genesis, then submits every entry
//! in order. Prints the resulting record for each state.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use lineage_zkp::{MockProof, ProofBundle};

use crate::toolkit::Toolkit;

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Bundle file written by `prove`.
    #[arg(long)]
    pub bundle: PathBuf,

    /// Print ledger events as JSON lines.
    #[arg(long)]
    pub events: bool,
}

pub fn run_submit(args: &SubmitArgs, toolkit: &Toolkit) -> Result<u8> {
    let bundle: ProofBundle<MockProof> = ProofBundle::read_from(&args.bundle)
        .with_context(|| format!("failed to load bundle {}", args.bundle.display()))?;

    let mut ledger = toolkit.ledger()?;
    toolkit.submit_bundle(&mut ledger, &bundle)?;

    println!(
        "OK: genesis + {} transitions accepted (total_transitions = {})",
        bundle.len(),
        ledger.total_transitions()
    );
    let states = std::iter::once(bundle.genesis.state_hash)
        .chain(bundle.entries.iter().map(|e| e.context.new_state_hash));
    for state in states {
        let info = ledger.get_state_info(&state);
        println!(
            "  depth {:>3}  {}  lineage {}",
            info.depth, state, info.lineage_commitment
        );
    }
    if args.events {
        for event in ledger.events() {
            println!("{}", serde_json::to_string(event)?);
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineageConfig;
    use crate::prove::prove_lineage;
    use lineage_core::OriginClass;

    #[test]
    fn bundle_replays_into_ledger() {
        let toolkit = Toolkit::new(LineageConfig::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        prove_lineage(
            &toolkit,
            &[OriginClass::Genesis, OriginClass::Admin, OriginClass::Bridge],
            Some(5),
        )
        .unwrap()
        .write_to(&path)
        .unwrap();

        let args = SubmitArgs {
            bundle: path,
            events: true,
        };
        assert_eq!(run_submit(&args, &toolkit).unwrap(), 0);
    }

    #[test]
    fn tampered_bundle_rejected() {
        let toolkit = Toolkit::new(LineageConfig::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        let mut bundle = prove_lineage(&toolkit, &[OriginClass::User], Some(5)).unwrap();
        bundle.entries[0].proof.proof_hex = "f".repeat(64);
        bundle.write_to(&path).unwrap();

        let err = run_submit(
            &SubmitArgs {
                bundle: path,
                events: false,
            },
            &toolkit,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("entry 0 rejected"), "{err:#}");
    }
}
