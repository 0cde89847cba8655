//! Keypair generation command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use powchain_core::Keypair;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct KeygenArgs {
    /// Also write the keypair to this JSON file
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// On-disk keypair format.
#[derive(Debug, Serialize, Deserialize)]
pub struct KeyFile {
    pub address: String,
    pub public_key: String,
    pub private_key: String,
}

impl KeyFile {
    pub fn from_keypair(keypair: &Keypair) -> Self {
        Self {
            address: keypair.address().to_string(),
            public_key: hex::encode(keypair.public_key().as_bytes()),
            private_key: hex::encode(keypair.private_key()),
        }
    }

    pub fn to_keypair(&self) -> Result<Keypair> {
        Keypair::from_hex(&self.private_key).context("Key file holds an invalid private key")
    }
}

/// Load a keypair written by `powchain keygen --out`.
pub fn load_keypair(path: &Path) -> Result<Keypair> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read key file: {}", path.display()))?;
    let key_file: KeyFile = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid key file: {}", path.display()))?;
    key_file.to_keypair()
}

pub fn run(args: KeygenArgs) -> Result<()> {
    let keypair = Keypair::generate();
    let key_file = KeyFile::from_keypair(&keypair);

    println!("{}", "Generated new keypair:".bold().cyan());
    println!();
    println!("  Address:     {}", key_file.address.bright_yellow());
    println!("  Private Key: {}", key_file.private_key.bright_black());

    if let Some(path) = args.out {
        fs::write(&path, serde_json::to_string_pretty(&key_file)?)
            .with_context(|| format!("Failed to write key file: {}", path.display()))?;
        println!();
        println!(
            "{}  Saved to: {}",
            "✓".green().bold(),
            path.display().to_string().bright_black()
        );
    }

    println!();
    println!("{}", "Keep your private key safe!".yellow().bold());

    Ok(())
}
