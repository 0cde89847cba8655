//! Blocks and proof-of-work sealing.

use crate::hash::{digest, Hash, HEX_LEN};
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::ops::RangeFrom;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while mining a block.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MiningError {
    #[error("difficulty {difficulty} exceeds hash length of {max} hex characters")]
    DifficultyOutOfRange { difficulty: usize, max: usize },

    #[error("no valid nonce found after {attempts} attempts")]
    Timeout { attempts: u64 },
}

/// A batch of transactions linked to its predecessor.
///
/// `hash` is a cache of `calculate_hash()` taken when the block was built
/// or mined. Changing any hashed field afterwards leaves the block
/// tampered until it is mined again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Milliseconds since the Unix epoch, as reported by the ledger clock.
    pub timestamp: u64,
    /// Transactions in inclusion order.
    pub transactions: Vec<Transaction>,
    /// Hash of the previous block (`Hash::ZERO` for genesis).
    pub previous_hash: Hash,
    /// Proof-of-work counter.
    pub nonce: u64,
    /// Cached block hash.
    pub hash: Hash,
}

impl Block {
    /// Create a block with nonce 0 and its hash computed.
    pub fn new(timestamp: u64, transactions: Vec<Transaction>, previous_hash: Hash) -> Self {
        let mut block = Self {
            timestamp,
            transactions,
            previous_hash,
            nonce: 0,
            hash: Hash::ZERO,
        };
        block.hash = block.calculate_hash();
        block
    }

    /// Create the genesis block.
    pub fn genesis(timestamp: u64) -> Self {
        Self::new(timestamp, Vec::new(), Hash::ZERO)
    }

    /// Recompute the block hash from its current fields.
    pub fn calculate_hash(&self) -> Hash {
        let transactions =
            serde_json::to_string(&self.transactions).expect("serialization should not fail");
        digest(&[
            self.previous_hash.to_hex().as_str(),
            self.timestamp.to_string().as_str(),
            transactions.as_str(),
            self.nonce.to_string().as_str(),
        ])
    }

    /// Whether the cached hash still matches the block contents.
    pub fn is_sealed(&self) -> bool {
        self.hash == self.calculate_hash()
    }

    /// Check if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.previous_hash == Hash::ZERO
    }

    /// Get the number of transactions in this block.
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }

    /// Nonces still to be tried, starting from the current one.
    pub fn candidates(&self) -> RangeFrom<u64> {
        self.nonce..
    }

    /// Search for a nonce whose hash has `difficulty` leading zeros.
    ///
    /// Runs until one is found. Returns the number of hashes computed.
    pub fn mine(&mut self, difficulty: usize) -> Result<u64, MiningError> {
        self.search(difficulty, None)
    }

    /// Like [`Block::mine`], giving up after `max_attempts` hashes.
    pub fn mine_bounded(&mut self, difficulty: usize, max_attempts: u64) -> Result<u64, MiningError> {
        self.search(difficulty, Some(max_attempts))
    }

    fn search(&mut self, difficulty: usize, max_attempts: Option<u64>) -> Result<u64, MiningError> {
        if difficulty > HEX_LEN {
            return Err(MiningError::DifficultyOutOfRange {
                difficulty,
                max: HEX_LEN,
            });
        }

        let mut attempts = 0u64;
        for nonce in self.candidates() {
            if max_attempts.is_some_and(|max| attempts >= max) {
                return Err(MiningError::Timeout { attempts });
            }
            self.nonce = nonce;
            self.hash = self.calculate_hash();
            attempts += 1;

            if self.hash.meets_difficulty(difficulty) {
                info!(hash = %self.hash, nonce, attempts, "block mined");
                return Ok(attempts);
            }
        }
        Err(MiningError::Timeout { attempts })
    }

    /// Check every transaction's signature. An unsigned transfer counts
    /// as invalid.
    pub fn has_valid_transactions(&self) -> bool {
        self.transactions
            .iter()
            .all(|tx| matches!(tx.is_valid(), Ok(true)))
    }
}
