//! Proof of Work (PoW) sealing.
//!
//! A block is sealed once its hash, rendered as hex, starts with
//! `difficulty` zero characters. Each extra character multiplies the
//! expected work by 16.

use powchain_core::{Block, Hash, MiningError};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during consensus operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("mining failed: {0}")]
    Mining(#[from] MiningError),
}

pub type Result<T> = std::result::Result<T, ConsensusError>;

/// Proof of Work configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowConfig {
    /// Leading zero hex characters required in a block hash.
    pub difficulty: usize,
    /// Give up after this many hashes. `None` searches until found.
    pub max_attempts: Option<u64>,
}

impl Default for PowConfig {
    fn default() -> Self {
        Self {
            difficulty: 2,
            max_attempts: None,
        }
    }
}

impl PowConfig {
    /// Create an unbounded configuration with the given difficulty.
    pub fn new(difficulty: usize) -> Self {
        Self {
            difficulty,
            max_attempts: None,
        }
    }

    /// Cap the nonce search.
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Expected number of hashes to find a block at this difficulty.
    pub fn expected_attempts(&self) -> f64 {
        16f64.powi(self.difficulty as i32)
    }
}

/// Outcome of a successful mining run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiningReport {
    /// The sealed block hash.
    pub hash: Hash,
    /// Nonce that produced it.
    pub nonce: u64,
    /// Hashes computed during the search.
    pub attempts: u64,
    /// Wall time spent searching.
    pub elapsed: Duration,
}

/// Block sealer for a fixed difficulty.
#[derive(Debug, Clone, Default)]
pub struct ProofOfWork {
    config: PowConfig,
}

impl ProofOfWork {
    /// Create a sealer with the given configuration.
    pub fn new(config: PowConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &PowConfig {
        &self.config
    }

    /// Get the difficulty.
    pub fn difficulty(&self) -> usize {
        self.config.difficulty
    }

    /// Search for a nonce that seals `block`.
    ///
    /// Blocks the calling thread until a nonce is found or the configured
    /// attempt cap runs out.
    pub fn seal(&self, block: &mut Block) -> Result<MiningReport> {
        let started = Instant::now();
        let outcome = match self.config.max_attempts {
            Some(max) => block.mine_bounded(self.config.difficulty, max),
            None => block.mine(self.config.difficulty),
        };

        let attempts = outcome.map_err(|e| {
            warn!(difficulty = self.config.difficulty, error = %e, "mining aborted");
            e
        })?;

        Ok(MiningReport {
            hash: block.hash,
            nonce: block.nonce,
            attempts,
            elapsed: started.elapsed(),
        })
    }

    /// Check that a block's cached hash satisfies the difficulty.
    pub fn meets_target(&self, block: &Block) -> bool {
        block.hash.meets_difficulty(self.config.difficulty)
    }
}
