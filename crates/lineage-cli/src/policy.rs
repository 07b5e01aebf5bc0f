//! # Policy Subcommand
//!
//! Prints the origin-class transition matrix, the accepted pairs in leaf
//! order, and the canonical policy root.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use lineage_core::OriginClass;
use lineage_policy::PolicyEntry;

use crate::toolkit::Toolkit;

#[derive(Args, Debug)]
pub struct PolicyArgs {
    /// Emit JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PolicyReport {
    hasher: &'static str,
    root: String,
    accepted_pairs: Vec<(OriginClass, OriginClass)>,
    matrix: Vec<PolicyEntry>,
}

pub fn run_policy(args: &PolicyArgs, toolkit: &Toolkit) -> Result<u8> {
    let engine = toolkit.policy();
    let tree = engine.canonical_tree().context("failed to build policy tree")?;
    let report = PolicyReport {
        hasher: toolkit.hasher.name(),
        root: tree.root().to_hex(),
        accepted_pairs: tree.pairs().to_vec(),
        matrix: engine.matrix(&tree),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(0);
    }

    println!("Policy root: {} ({})", report.root, report.hasher);
    println!(
        "Accepted pairs: {} (tree padded to {})",
        tree.pairs().len(),
        tree.merkle().padded_leaves().len()
    );
    println!();
    println!("{:<10} {:<10} {:<9} {:<9} leaf", "from", "to", "depth=0", "depth>0");
    for row in &report.matrix {
        println!(
            "{:<10} {:<10} {:<9} {:<9} {}",
            row.from.name(),
            row.to.name(),
            yes_no(row.at_genesis),
            yes_no(row.mid_lineage),
            row.leaf_index.map(|i| i.to_string()).unwrap_or_else(|| "-".to_string())
        );
    }
    Ok(0)
}

fn yes_no(allowed: bool) -> &'static str {
    if allowed {
        "allow"
    } else {
        "deny"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineageConfig;

    #[test]
    fn policy_table_and_json_succeed() {
        let toolkit = Toolkit::new(LineageConfig::default()).unwrap();
        assert_eq!(run_policy(&PolicyArgs { json: false }, &toolkit).unwrap(), 0);
        assert_eq!(run_policy(&PolicyArgs { json: true }, &toolkit).unwrap(), 0);
    }
}
