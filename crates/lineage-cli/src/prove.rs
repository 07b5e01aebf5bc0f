//! # Prove Subcommand
//!
//! Builds a lineage from a fresh genesis state, one step per requested
//! origin, proves each step with the configured backend and writes the
//! result as a proof bundle.
//!
//! States are random 32-byte values (seedable for reproducible runs) and
//! timestamps are wall-clock milliseconds. A step the policy denies aborts
//! the run before the backend is called and nothing is written.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lineage_core::{OriginClass, StateHash};
use lineage_zkp::{BundleGenesis, LineageSession, MockProof, ProofBundle};

use crate::toolkit::Toolkit;

#[derive(Args, Debug)]
pub struct ProveArgs {
    /// Origin of each new state, comma separated (e.g. Genesis,User,User).
    /// A leading Genesis names the root and adds no step.
    #[arg(long, value_delimiter = ',', required = true)]
    pub origins: Vec<OriginClass>,

    /// Bundle file to write.
    #[arg(long)]
    pub out: PathBuf,

    /// Seed for state generation.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Draw a non-zero state hash.
pub fn random_state(rng: &mut impl Rng) -> StateHash {
    loop {
        let bytes: [u8; 32] = rng.gen();
        let state = StateHash::from_bytes32(&bytes);
        if !state.is_zero() {
            return state;
        }
    }
}

fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}

/// Steps requested by `origins`, without a leading Genesis.
pub fn step_origins(origins: &[OriginClass]) -> &[OriginClass] {
    match origins.split_first() {
        Some((OriginClass::Genesis, rest)) => rest,
        _ => origins,
    }
}

/// Prove a whole lineage in memory.
pub fn prove_lineage(
    toolkit: &Toolkit,
    origins: &[OriginClass],
    seed: Option<u64>,
) -> Result<ProofBundle<MockProof>> {
    let steps = step_origins(origins);
    if steps.is_empty() {
        bail!("no transitions requested; give at least one origin after Genesis");
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = LineageSession::new(toolkit.chain.clone(), random_state(&mut rng));
    let mut bundle: ProofBundle<MockProof> = ProofBundle::new(BundleGenesis {
        state_hash: session.genesis().state_hash,
        lineage_commitment: session.genesis().commitment,
    });
    tracing::info!(genesis = %session.genesis().state_hash, steps = steps.len(), "proving lineage");

    let base = now_millis();
    for (index, origin) in steps.iter().enumerate() {
        let new_state = random_state(&mut rng);
        let step = session
            .prove_step(
                toolkit.backend.as_ref(),
                &toolkit.proving_key,
                new_state,
                *origin,
                base + index as u64,
                toolkit.policy_root,
            )
            .with_context(|| {
                format!(
                    "step {} ({} -> {}) failed",
                    index + 1,
                    session.head().origin,
                    origin
                )
            })?;
        bundle.push(step);
    }
    Ok(bundle)
}

pub fn run_prove(args: &ProveArgs, toolkit: &Toolkit) -> Result<u8> {
    let bundle = prove_lineage(toolkit, &args.origins, args.seed)?;
    bundle
        .write_to(&args.out)
        .with_context(|| format!("failed to write bundle {}", args.out.display()))?;

    println!("OK: proved {} transitions", bundle.len());
    println!("  Genesis: {}", bundle.genesis.state_hash);
    println!("  Head:    {}", bundle.head_state());
    println!("  Bundle:  {}", args.out.display());
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineageConfig;
    use lineage_core::OriginClass::*;

    fn toolkit() -> Toolkit {
        Toolkit::new(LineageConfig::default()).unwrap()
    }

    #[test]
    fn leading_genesis_is_root() {
        assert_eq!(step_origins(&[Genesis, User, User]), &[User, User]);
        assert_eq!(step_origins(&[User, Genesis]), &[User, Genesis]);
        assert!(step_origins(&[Genesis]).is_empty());
    }

    #[test]
    fn seeded_runs_share_states() {
        let t = toolkit();
        let a = prove_lineage(&t, &[Genesis, User, User], Some(7)).unwrap();
        let b = prove_lineage(&t, &[Genesis, User, User], Some(7)).unwrap();
        assert_eq!(a.genesis, b.genesis);
        assert_eq!(a.head_state(), b.head_state());
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn denied_step_aborts() {
        let t = toolkit();
        let err = prove_lineage(&t, &[Genesis, User, Admin], Some(1)).unwrap_err();
        assert!(format!("{err:#}").contains("User -> Admin"), "{err:#}");
        assert_eq!(t.backend.prove_calls(), 1);
    }

    #[test]
    fn genesis_only_is_error() {
        assert!(prove_lineage(&toolkit(), &[Genesis], None).is_err());
    }

    #[test]
    fn writes_bundle_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("bundle.json");
        let args = ProveArgs {
            origins: vec![Genesis, Bridge, User],
            out: out.clone(),
            seed: Some(3),
        };
        assert_eq!(run_prove(&args, &toolkit()).unwrap(), 0);
        let loaded: ProofBundle<MockProof> = ProofBundle::read_from(&out).unwrap();
        assert_eq!(loaded.len(), 2);
    }
}
