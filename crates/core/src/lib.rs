//! Core ledger primitives for powchain.
//!
//! This crate provides the fundamental types used throughout the ledger:
//! - Content hashing (Blake3 digests rendered as hex)
//! - Ed25519 keypairs, addresses and signatures
//! - Transfer and reward transactions
//! - Blocks and proof-of-work mining

pub mod block;
pub mod crypto;
pub mod hash;
pub mod transaction;

// Re-export commonly used types at the crate root
pub use block::{Block, MiningError};
pub use crypto::{Address, CryptoError, Keypair, PublicKey, Signature};
pub use hash::{digest, hash, hash_concat, Hash, H256};
pub use transaction::{Sender, Transaction, TransactionError};
