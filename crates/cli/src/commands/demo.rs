//! Single-transfer walkthrough: sign, queue, mine, report.

use super::keygen::load_keypair;
use super::LedgerArgs;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use powchain_chain::Blockchain;
use powchain_core::{Address, Keypair, Transaction};
use std::path::PathBuf;

/// Private key of the built-in demo wallet.
const DEMO_PRIVATE_KEY: &str = "31fc91751bc83f6b921f343bb4f5271abfd728fc84d1286f22548d2a7e902f08";

#[derive(Args)]
pub struct DemoArgs {
    /// Sender private key (hex)
    #[arg(short = 'k', long, default_value = DEMO_PRIVATE_KEY, conflicts_with = "key_file")]
    private_key: String,

    /// Read the sender keypair from a file written by `keygen --out`
    #[arg(long)]
    key_file: Option<PathBuf>,

    /// Recipient address
    #[arg(short, long, default_value = "public key goes here")]
    to: String,

    /// Amount to transfer
    #[arg(short, long, default_value = "1")]
    amount: u64,

    #[command(flatten)]
    ledger: LedgerArgs,
}

pub fn run(args: DemoArgs) -> Result<()> {
    let keypair = match &args.key_file {
        Some(path) => load_keypair(path)?,
        None => Keypair::from_hex(&args.private_key).context("Invalid private key")?,
    };
    let wallet = keypair.address();
    let config = args.ledger.load()?;

    let mut blockchain = Blockchain::new(config);

    let tx = Transaction::new(wallet.clone(), Address::new(args.to), args.amount)
        .signed(&keypair)
        .context("Failed to sign transaction")?;
    blockchain
        .add_transaction(tx)
        .context("Transaction rejected")?;

    println!("{}", "Starting the miner...".bold().cyan());
    let block = blockchain
        .mine_pending_transactions(&wallet)
        .context("Mining failed")?
        .context("Nothing to mine")?;

    println!();
    println!("  Block:   {}", block.hash.to_hex().bright_yellow());
    println!("  Nonce:   {}", block.nonce.to_string().bright_cyan());
    println!();
    println!("  Wallet:  {}", wallet.to_string().bright_yellow());
    println!(
        "  Balance: {}",
        blockchain
            .get_balance_of_address(&wallet)
            .to_string()
            .bright_cyan()
    );

    let valid = blockchain.is_chain_valid();
    println!(
        "  Chain valid: {}",
        if valid { "yes".green() } else { "no".red() }
    );

    Ok(())
}
