//! # lineage CLI entry point
//!
//! Parses command-line arguments, builds the shared toolkit from the
//! optional configuration file, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lineage_cli::config::LineageConfig;
use lineage_cli::demo::{run_demo, DemoArgs};
use lineage_cli::policy::{run_policy, PolicyArgs};
use lineage_cli::prove::{run_prove, ProveArgs};
use lineage_cli::submit::{run_submit, SubmitArgs};
use lineage_cli::toolkit::Toolkit;
use lineage_cli::verify::{run_verify, VerifyArgs};

/// Lineage provenance toolchain.
///
/// Inspects the origin-class transition policy, proves lineages step by
/// step, verifies proof bundles, and replays them against an in-memory
/// ledger.
#[derive(Parser, Debug)]
#[command(name = "lineage", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the transition matrix and the canonical policy root.
    Policy(PolicyArgs),

    /// Prove a lineage and write it as a proof bundle.
    Prove(ProveArgs),

    /// Check a bundle's continuity and every proof in it.
    Verify(VerifyArgs),

    /// Replay a bundle against a fresh in-memory ledger.
    Submit(SubmitArgs),

    /// Run an end-to-end lineage including refused transitions.
    Demo(DemoArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("lineage CLI starting");

    let result = LineageConfig::load(cli.config.as_deref())
        .and_then(Toolkit::new)
        .and_then(|toolkit| match &cli.command {
            Commands::Policy(args) => run_policy(args, &toolkit),
            Commands::Prove(args) => run_prove(args, &toolkit),
            Commands::Verify(args) => run_verify(args, &toolkit),
            Commands::Submit(args) => run_submit(args, &toolkit),
            Commands::Demo(args) => run_demo(args, &toolkit),
        });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_core::OriginClass;

    #[test]
    fn parse_prove_origins() {
        let cli = Cli::try_parse_from([
            "lineage",
            "prove",
            "--origins",
            "Genesis,user,2",
            "--out",
            "b.json",
            "--seed",
            "9",
        ])
        .unwrap();
        let Commands::Prove(args) = cli.command else {
            panic!("expected prove");
        };
        assert_eq!(
            args.origins,
            vec![OriginClass::Genesis, OriginClass::User, OriginClass::Admin]
        );
        assert_eq!(args.seed, Some(9));
    }

    #[test]
    fn parse_rejects_unknown_origin() {
        assert!(Cli::try_parse_from(["lineage", "prove", "--origins", "Root", "--out", "b"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["lineage", "policy", "--json", "-vv", "--config", "c.yaml"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("c.yaml")));
        assert!(matches!(cli.command, Commands::Policy(PolicyArgs { json: true })));
    }

    #[test]
    fn verify_requires_bundle() {
        assert!(Cli::try_parse_from(["lineage", "verify"]).is_err());
    }
}
