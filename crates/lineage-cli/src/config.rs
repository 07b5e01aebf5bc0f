//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`. Every field has a default, so
//! an absent file and an empty file behave the same.
//!
//! ```yaml
//! key_label: lineage-dev
//! policy_label: canonical
//! admin: "0x00000000000000000000000000000000000000a1"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use lineage_core::AccountId;

const DEFAULT_ADMIN: [u8; 20] = {
    let mut bytes = [0u8; 20];
    bytes[19] = 0xa1;
    bytes
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LineageConfig {
    /// Label the proving and verifying keys are derived from.
    pub key_label: String,
    /// Label recorded with the policy root in the ledger registry.
    pub policy_label: String,
    /// Admin account for the in-memory ledger.
    pub admin: AccountId,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            key_label: "lineage-dev".to_string(),
            policy_label: "canonical".to_string(),
            admin: AccountId::new(DEFAULT_ADMIN),
        }
    }
}

impl LineageConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_path_gives_defaults() {
        assert_eq!(LineageConfig::load(None).unwrap(), LineageConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lineage.yaml");
        std::fs::write(&path, "key_label: staging\n").unwrap();
        let cfg = LineageConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.key_label, "staging");
        assert_eq!(cfg.policy_label, "canonical");
        assert_eq!(cfg.admin, LineageConfig::default().admin);
    }

    #[test]
    fn admin_parsed_from_hex() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lineage.yaml");
        std::fs::write(&path, format!("admin: \"0x{}\"\n", "cd".repeat(20))).unwrap();
        let cfg = LineageConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.admin, AccountId::new([0xcd; 20]));
    }

    #[test]
    fn unknown_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lineage.yaml");
        std::fs::write(&path, "key_lable: typo\n").unwrap();
        assert!(LineageConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn empty_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lineage.yaml");
        std::fs::write(&path, "").unwrap();
        assert_eq!(LineageConfig::load(Some(&path)).unwrap(), LineageConfig::default());
    }

    #[test]
    fn missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LineageConfig::load(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert!(format!("{err:#}").contains("nope.yaml"));
    }
}
