//! Chain audit walkthrough.
//!
//! Builds a short chain, then checks it as mined and after three kinds
//! of tampering, each applied to a separate copy.

use super::LedgerArgs;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use powchain_chain::Blockchain;
use powchain_consensus::{ChainValidator, ValidationError};
use powchain_core::{Address, Block, Hash, Keypair, Transaction};

#[derive(Args)]
pub struct AuditArgs {
    /// Number of blocks to mine before auditing
    #[arg(short, long, default_value = "3")]
    blocks: u64,

    #[command(flatten)]
    ledger: LedgerArgs,
}

pub fn run(args: AuditArgs) -> Result<()> {
    let config = args.ledger.load()?;
    let difficulty = config.pow.difficulty;
    let mut blockchain = Blockchain::new(config);
    let keypair = Keypair::generate();
    let miner = keypair.address();
    let recipient = Address::from("B");

    println!("{}", "Mining blocks...".bold().cyan());
    for i in 1..=args.blocks.max(1) {
        let tx = Transaction::new(miner.clone(), recipient.clone(), i)
            .signed(&keypair)
            .context("Failed to sign transaction")?;
        blockchain.add_transaction(tx)?;
        blockchain
            .mine_pending_transactions(&miner)
            .context("Mining failed")?;
    }
    println!("  Height: {}", blockchain.height().to_string().bright_cyan());
    println!();

    println!("{}", "Audit:".bold().cyan());
    report("as mined", blockchain.validate_chain());

    let tip = blockchain.chain().len() - 1;
    report(
        "transfer amount changed",
        tampered(blockchain.chain(), |blocks| {
            blocks[tip].transactions[0].amount += 1_000;
        }),
    );
    report(
        "reward amount changed",
        tampered(blockchain.chain(), |blocks| {
            if let Some(reward) = blocks[tip].transactions.last_mut() {
                reward.amount += 1_000;
            }
        }),
    );
    report(
        "relinked and re-mined",
        tampered(blockchain.chain(), |blocks| {
            blocks[tip].previous_hash = Hash::from_bytes([0xAA; 32]);
            // Only fails for impossible difficulties, which mining above
            // would already have rejected.
            let _ = blocks[tip].mine(difficulty);
        }),
    );
    println!();

    Ok(())
}

fn tampered(chain: &[Block], tamper: impl FnOnce(&mut Vec<Block>)) -> Result<(), ValidationError> {
    let mut blocks = chain.to_vec();
    tamper(&mut blocks);
    ChainValidator::validate(&blocks)
}

fn report(label: &str, outcome: Result<(), ValidationError>) {
    match outcome {
        Ok(()) => println!("  {:<24} {}", label, "valid".green()),
        Err(e) => println!("  {:<24} {} ({})", label, "invalid".red(), e),
    }
}
