//! # Demo Subcommand
//!
//! Walks the whole protocol in memory: genesis, three User steps accepted
//! by the ledger, then two attempts that must fail. A User to Admin step
//! is refused before the prover runs, and replaying an accepted step is
//! refused by the ledger.

use anyhow::{bail, Context, Result};
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;

use lineage_core::OriginClass;
use lineage_state::LedgerError;
use lineage_zkp::{BundleEntry, LineageError, LineageSession, MockProof, SessionError};

use crate::prove::random_state;
use crate::toolkit::Toolkit;

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Seed for state generation.
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run_demo(args: &DemoArgs, toolkit: &Toolkit) -> Result<u8> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let admin = toolkit.config.admin;
    let mut ledger = toolkit.ledger()?;
    let mut session = LineageSession::new(toolkit.chain.clone(), random_state(&mut rng));

    ledger
        .set_genesis(admin, session.genesis().state_hash, session.genesis().commitment)
        .context("genesis rejected")?;
    println!("genesis   {}  depth 0", session.genesis().state_hash);

    let mut last: Option<BundleEntry<MockProof>> = None;
    for timestamp in 1..=3u64 {
        let step = session
            .prove_step(
                toolkit.backend.as_ref(),
                &toolkit.proving_key,
                random_state(&mut rng),
                OriginClass::User,
                timestamp,
                toolkit.policy_root,
            )
            .context("User step failed")?;
        let entry: BundleEntry<MockProof> = step.into();
        ledger
            .verify_lineage(&entry)
            .context("ledger rejected User step")?;
        println!(
            "accepted  {}  depth {}",
            entry.context.new_state_hash, entry.public_signals.new_depth
        );
        last = Some(entry);
    }

    // Privilege escalation: refused locally, prover never called.
    let calls = toolkit.backend.prove_calls();
    match session.prove_step(
        toolkit.backend.as_ref(),
        &toolkit.proving_key,
        random_state(&mut rng),
        OriginClass::Admin,
        4,
        toolkit.policy_root,
    ) {
        Err(SessionError::Lineage(err @ LineageError::PolicyViolation { .. })) => {
            println!("refused   {err}");
        }
        Err(other) => bail!("unexpected escalation failure: {other}"),
        Ok(_) => bail!("User -> Admin step was proved"),
    }
    if toolkit.backend.prove_calls() != calls {
        bail!("prover was invoked for a denied transition");
    }

    // Replay of an accepted step.
    let Some(replayed) = last else {
        bail!("no step to replay");
    };
    match ledger.verify_lineage(&replayed) {
        Err(err @ LedgerError::StateAlreadyVerified { .. }) => println!("refused   {err}"),
        Err(other) => bail!("unexpected replay failure: {other}"),
        Ok(_) => bail!("replayed step was accepted"),
    }

    println!(
        "OK: {} transitions verified, {} events",
        ledger.total_transitions(),
        ledger.events().len()
    );
    Ok(0)
}
