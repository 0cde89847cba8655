//! Ledger orchestration for powchain.
//!
//! This crate brings the primitives together into a single-node ledger:
//! - **Blockchain**: chain ownership, submission, mining, balance queries
//! - **Mempool**: ordered queue of accepted, not yet mined transactions
//! - **Clock**: injectable timestamp source for new blocks
//!
//! # Example
//!
//! ```rust,no_run
//! use powchain_chain::{Blockchain, BlockchainConfig};
//! use powchain_core::{Address, Keypair, Transaction};
//!
//! let keypair = Keypair::generate();
//! let mut blockchain = Blockchain::new(BlockchainConfig::default());
//!
//! let tx = Transaction::new(keypair.address(), Address::from("B"), 10)
//!     .signed(&keypair)
//!     .unwrap();
//! blockchain.add_transaction(tx).unwrap();
//! blockchain.mine_pending_transactions(&keypair.address()).unwrap();
//!
//! assert_eq!(blockchain.get_balance_of_address(&Address::from("B")), 10);
//! assert!(blockchain.is_chain_valid());
//! ```

pub mod blockchain;
pub mod clock;
pub mod mempool;

// Re-export commonly used types
pub use blockchain::{Blockchain, BlockchainConfig, BlockchainError, BlockchainStats};
pub use clock::{Clock, FixedClock, SystemClock};
pub use mempool::{Mempool, MempoolStats};
