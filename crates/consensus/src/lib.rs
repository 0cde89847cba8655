//! Proof of Work consensus for powchain.
//!
//! This crate provides:
//! - Nonce search against a leading-zero difficulty target
//! - Block validation (transaction signatures, hash integrity, parent links)
//! - Whole-chain auditing with the first failing block reported
//!
//! # Example
//!
//! ```rust,no_run
//! use powchain_consensus::{ChainValidator, PowConfig, ProofOfWork};
//! use powchain_core::Block;
//!
//! let genesis = Block::genesis(0);
//! let mut block = Block::new(1, vec![], genesis.hash);
//!
//! let pow = ProofOfWork::new(PowConfig::new(2));
//! let report = pow.seal(&mut block).unwrap();
//! assert!(report.hash.to_hex().starts_with("00"));
//!
//! assert!(ChainValidator::is_valid(&[genesis, block]));
//! ```

pub mod pow;
pub mod validator;

// Re-export commonly used types
pub use pow::{ConsensusError, MiningReport, PowConfig, ProofOfWork};
pub use validator::{BlockValidator, ChainValidator, ValidationError};
