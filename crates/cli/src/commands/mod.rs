//! CLI commands module.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use powchain_chain::BlockchainConfig;
use std::fs;
use std::path::{Path, PathBuf};

mod audit;
mod demo;
mod keygen;

#[derive(Subcommand)]
pub enum Commands {
    /// Sign a transfer, mine it and print the resulting balances
    Demo(demo::DemoArgs),
    /// Generate a new keypair
    Keygen(keygen::KeygenArgs),
    /// Mine a few blocks, tamper with copies and audit them
    Audit(audit::AuditArgs),
}

pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Demo(args) => demo::run(args),
        Commands::Keygen(args) => keygen::run(args),
        Commands::Audit(args) => audit::run(args),
    }
}

/// Ledger settings shared by commands that build a chain.
#[derive(Args, Debug, Default)]
pub struct LedgerArgs {
    /// JSON file with ledger settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Leading zero hex characters required per block
    #[arg(short, long)]
    difficulty: Option<usize>,

    /// Amount credited to the miner of each block
    #[arg(short, long)]
    reward: Option<u64>,

    /// Give up mining a block after this many hashes
    #[arg(long)]
    max_attempts: Option<u64>,
}

impl LedgerArgs {
    /// Config file values (or defaults), overridden by any flags given.
    pub fn load(&self) -> Result<BlockchainConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => BlockchainConfig::default(),
        };

        if let Some(difficulty) = self.difficulty {
            config.pow.difficulty = difficulty;
        }
        if let Some(reward) = self.reward {
            config.mining_reward = reward;
        }
        if let Some(max_attempts) = self.max_attempts {
            config.pow.max_attempts = Some(max_attempts);
        }

        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<BlockchainConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_flags() {
        let config = LedgerArgs::default().load().unwrap();
        assert_eq!(config, BlockchainConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(
            &path,
            r#"{"pow":{"difficulty":4,"max_attempts":null},"mining_reward":50}"#,
        )
        .unwrap();

        let args = LedgerArgs {
            config: Some(path),
            difficulty: Some(1),
            reward: None,
            max_attempts: Some(10),
        };
        let config = args.load().unwrap();

        assert_eq!(config.pow.difficulty, 1);
        assert_eq!(config.pow.max_attempts, Some(10));
        assert_eq!(config.mining_reward, 50);
    }

    #[test]
    fn test_missing_config_file() {
        let args = LedgerArgs {
            config: Some(PathBuf::from("/nonexistent/ledger.json")),
            ..Default::default()
        };
        assert!(args.load().is_err());
    }
}
