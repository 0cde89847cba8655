//! Main ledger orchestration.
//!
//! The `Blockchain` owns the chain and the mempool, accepts signed
//! transfers, mines them into blocks and answers balance and history
//! queries by scanning every block.

use crate::clock::{Clock, SystemClock};
use crate::mempool::Mempool;
use powchain_consensus::{ChainValidator, PowConfig, ProofOfWork, ValidationError};
use powchain_core::{Address, Block, Hash, Transaction};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlockchainError {
    #[error("transaction must include from and to address")]
    MalformedTransaction,

    #[error("cannot add transaction with an invalid signature")]
    InvalidSignature,

    #[error("consensus error: {0}")]
    Mining(#[from] powchain_consensus::ConsensusError),

    #[error("invalid chain state")]
    InvalidChainState,
}

pub type Result<T> = std::result::Result<T, BlockchainError>;

/// Blockchain configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// Proof of Work settings.
    pub pow: PowConfig,
    /// Amount credited to the miner of each block.
    pub mining_reward: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            pow: PowConfig::default(),
            mining_reward: 5,
        }
    }
}

impl BlockchainConfig {
    /// Create an unbounded configuration.
    pub fn new(difficulty: usize, mining_reward: u64) -> Self {
        Self {
            pow: PowConfig::new(difficulty),
            mining_reward,
        }
    }
}

/// Main blockchain struct that orchestrates all components.
pub struct Blockchain {
    /// Blocks from genesis to tip. Never empty.
    chain: Vec<Block>,
    /// Transactions waiting for the next block.
    mempool: Mempool,
    /// Block sealer.
    pow: ProofOfWork,
    /// Timestamp source.
    clock: Box<dyn Clock>,
    /// Configuration.
    config: BlockchainConfig,
}

impl Blockchain {
    /// Create a new blockchain using wall-clock timestamps.
    pub fn new(config: BlockchainConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Create a new blockchain with the given timestamp source.
    pub fn with_clock(config: BlockchainConfig, clock: Box<dyn Clock>) -> Self {
        let genesis = Self::create_genesis_block(clock.as_ref());
        info!(hash = %genesis.hash, "created genesis block");

        Self {
            chain: vec![genesis],
            mempool: Mempool::new(),
            pow: ProofOfWork::new(config.pow.clone()),
            clock,
            config,
        }
    }

    /// The fixed first block: no transactions, no predecessor.
    pub fn create_genesis_block(clock: &dyn Clock) -> Block {
        Block::genesis(clock.now_millis())
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    /// All blocks, genesis first.
    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Get the current chain height (0 for a genesis-only chain).
    pub fn height(&self) -> u64 {
        self.chain.len().saturating_sub(1) as u64
    }

    /// Get the latest block.
    pub fn get_latest_block(&self) -> Result<&Block> {
        self.chain.last().ok_or(BlockchainError::InvalidChainState)
    }

    /// Get a block by height.
    pub fn get_block_by_height(&self, height: u64) -> Option<&Block> {
        usize::try_from(height).ok().and_then(|h| self.chain.get(h))
    }

    /// Get a block by hash.
    pub fn get_block(&self, hash: &Hash) -> Option<&Block> {
        self.chain.iter().find(|block| &block.hash == hash)
    }

    /// Transactions waiting for the next block.
    pub fn pending_transactions(&self) -> &[Transaction] {
        self.mempool.transactions()
    }

    /// Submit a signed transfer to the mempool.
    ///
    /// The sender's balance is not checked.
    pub fn add_transaction(&mut self, tx: Transaction) -> Result<()> {
        let has_sender = tx.from_address().is_some_and(|from| !from.is_empty());
        if !has_sender || tx.to.is_empty() {
            warn!(to = %tx.to, "rejected malformed transaction");
            return Err(BlockchainError::MalformedTransaction);
        }

        if !matches!(tx.is_valid(), Ok(true)) {
            warn!(to = %tx.to, amount = tx.amount, "rejected transaction with invalid signature");
            return Err(BlockchainError::InvalidSignature);
        }

        debug!(hash = %tx.calculate_hash(), amount = tx.amount, "transaction queued");
        self.mempool.add(tx);
        Ok(())
    }

    /// Mine every pending transaction, plus a reward for `reward_address`,
    /// into a new block.
    ///
    /// Does nothing when the mempool is empty. If mining gives up, the
    /// pending transactions are put back and the chain is unchanged.
    pub fn mine_pending_transactions(&mut self, reward_address: &Address) -> Result<Option<&Block>> {
        if self.mempool.is_empty() {
            return Ok(None);
        }

        let previous_hash = self.get_latest_block()?.hash;
        let mut transactions = self.mempool.drain();
        transactions.push(Transaction::reward(
            reward_address.clone(),
            self.config.mining_reward,
        ));

        let mut block = Block::new(self.clock.now_millis(), transactions, previous_hash);
        info!(
            height = self.height() + 1,
            transactions = block.tx_count(),
            difficulty = self.pow.difficulty(),
            "mining block"
        );

        let report = match self.pow.seal(&mut block) {
            Ok(report) => report,
            Err(e) => {
                let mut transactions = block.transactions;
                transactions.pop();
                self.mempool.restore(transactions);
                return Err(e.into());
            }
        };

        self.chain.push(block);
        info!(
            height = self.height(),
            attempts = report.attempts,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "block successfully mined"
        );
        Ok(self.chain.last())
    }

    /// Net amount received minus sent by `address` across the whole chain.
    pub fn get_balance_of_address(&self, address: &Address) -> i128 {
        let mut balance = 0i128;
        for tx in self.chain.iter().flat_map(|block| &block.transactions) {
            if tx.from_address() == Some(address) {
                balance -= i128::from(tx.amount);
            }
            if &tx.to == address {
                balance += i128::from(tx.amount);
            }
        }
        balance
    }

    /// Every mined transaction sent or received by `address`, in chain order.
    pub fn get_all_transactions_for_wallet(&self, address: &Address) -> Vec<Transaction> {
        self.chain
            .iter()
            .flat_map(|block| &block.transactions)
            .filter(|tx| tx.involves(address))
            .cloned()
            .collect()
    }

    /// Check transactions, hashes and links of every non-genesis block.
    pub fn is_chain_valid(&self) -> bool {
        self.validate_chain().is_ok()
    }

    /// Same checks as [`Blockchain::is_chain_valid`], naming the first
    /// block that fails.
    pub fn validate_chain(&self) -> std::result::Result<(), ValidationError> {
        ChainValidator::validate(&self.chain)
    }

    /// Get blockchain statistics.
    pub fn stats(&self) -> Result<BlockchainStats> {
        let latest_block = self.get_latest_block()?;
        let mempool_stats = self.mempool.stats();

        Ok(BlockchainStats {
            height: self.height(),
            latest_block_hash: latest_block.hash,
            latest_timestamp: latest_block.timestamp,
            pending_transactions: mempool_stats.total_transactions,
            total_transactions: self.chain.iter().map(Block::tx_count).sum(),
            difficulty: self.pow.difficulty(),
        })
    }

    #[cfg(test)]
    pub(crate) fn chain_mut(&mut self) -> &mut Vec<Block> {
        &mut self.chain
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new(BlockchainConfig::default())
    }
}

/// Blockchain statistics.
#[derive(Debug, Clone)]
pub struct BlockchainStats {
    /// Current chain height.
    pub height: u64,
    /// Hash of the latest block.
    pub latest_block_hash: Hash,
    /// Timestamp of the latest block.
    pub latest_timestamp: u64,
    /// Number of pending transactions.
    pub pending_transactions: usize,
    /// Number of mined transactions, rewards included.
    pub total_transactions: usize,
    /// Leading zeros required per block.
    pub difficulty: usize,
}
