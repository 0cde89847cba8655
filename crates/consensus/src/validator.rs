//! Block and chain validation rules.
//!
//! The genesis block is trusted as constructed. Every later block must
//! carry valid transactions, match its own cached hash and point at the
//! hash of the block before it.

use powchain_core::{Block, Hash};
use thiserror::Error;

/// Errors that can occur during validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("chain has no genesis block")]
    EmptyChain,

    #[error("block {index} contains an invalid transaction")]
    InvalidTransactions { index: usize },

    #[error("block {index} hash does not match its contents")]
    HashMismatch { index: usize },

    #[error("block {index} does not link to its parent")]
    BrokenLink { index: usize },
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Block validator.
pub struct BlockValidator;

impl BlockValidator {
    /// Validate the block's own contents.
    pub fn validate_block(block: &Block, index: usize) -> Result<()> {
        if !block.has_valid_transactions() {
            return Err(ValidationError::InvalidTransactions { index });
        }

        if !block.is_sealed() {
            return Err(ValidationError::HashMismatch { index });
        }

        Ok(())
    }

    /// Validate block extends the parent correctly.
    pub fn validate_block_extends_parent(
        block: &Block,
        parent_hash: Hash,
        index: usize,
    ) -> Result<()> {
        if block.previous_hash != parent_hash {
            return Err(ValidationError::BrokenLink { index });
        }
        Ok(())
    }

    /// Full block validation (contents + parent link).
    pub fn validate_full(block: &Block, parent_hash: Hash, index: usize) -> Result<()> {
        Self::validate_block(block, index)?;
        Self::validate_block_extends_parent(block, parent_hash, index)?;
        Ok(())
    }
}

/// Chain validator.
pub struct ChainValidator;

impl ChainValidator {
    /// Validate every non-genesis block, stopping at the first failure.
    pub fn validate(chain: &[Block]) -> Result<()> {
        if chain.is_empty() {
            return Err(ValidationError::EmptyChain);
        }

        for (index, pair) in chain.windows(2).enumerate() {
            let (parent, block) = (&pair[0], &pair[1]);
            BlockValidator::validate_full(block, parent.hash, index + 1)?;
        }

        Ok(())
    }

    /// Boolean form of [`ChainValidator::validate`].
    pub fn is_valid(chain: &[Block]) -> bool {
        Self::validate(chain).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powchain_core::{Address, Keypair, Transaction};

    const TS: u64 = 1_700_000_000_000;

    fn build_chain(keypair: &Keypair, blocks: usize) -> Vec<Block> {
        let mut chain = vec![Block::genesis(TS)];
        for i in 0..blocks {
            let tx = Transaction::new(keypair.address(), Address::from("B"), i as u64 + 1)
                .signed(keypair)
                .unwrap();
            let reward = Transaction::reward(keypair.address(), 5);
            let parent = chain.last().unwrap().hash;
            let mut block = Block::new(TS + i as u64 + 1, vec![tx, reward], parent);
            block.mine(1).unwrap();
            chain.push(block);
        }
        chain
    }

    #[test]
    fn test_valid_chain() {
        let keypair = Keypair::generate();
        let chain = build_chain(&keypair, 3);
        assert!(ChainValidator::validate(&chain).is_ok());
        assert!(ChainValidator::is_valid(&chain));
    }

    #[test]
    fn test_genesis_only_chain_valid() {
        assert!(ChainValidator::is_valid(&[Block::genesis(TS)]));
    }

    #[test]
    fn test_empty_chain_rejected() {
        assert_eq!(ChainValidator::validate(&[]), Err(ValidationError::EmptyChain));
    }

    #[test]
    fn test_genesis_not_revalidated() {
        let keypair = Keypair::generate();
        let mut chain = build_chain(&keypair, 1);
        // Corrupting the genesis cache alone is not checked; block 1 still
        // points at the stored value.
        chain[0].timestamp += 1;
        assert!(ChainValidator::is_valid(&chain));
    }

    #[test]
    fn test_tampered_amount_detected() {
        let keypair = Keypair::generate();
        let mut chain = build_chain(&keypair, 2);
        chain[2].transactions[0].amount = 1_000;

        // The signature no longer covers the amount.
        assert_eq!(
            ChainValidator::validate(&chain),
            Err(ValidationError::InvalidTransactions { index: 2 })
        );
    }

    #[test]
    fn test_tampered_reward_detected_by_hash() {
        let keypair = Keypair::generate();
        let mut chain = build_chain(&keypair, 2);
        // Rewards carry no signature, so only the hash catches this.
        chain[1].transactions[1].amount = 1_000;

        assert_eq!(
            ChainValidator::validate(&chain),
            Err(ValidationError::HashMismatch { index: 1 })
        );
    }

    #[test]
    fn test_broken_link_detected() {
        let keypair = Keypair::generate();
        let mut chain = build_chain(&keypair, 2);
        chain[2].previous_hash = Hash::from_bytes([0xAA; 32]);
        // Re-mine so only the link is wrong.
        chain[2].mine(1).unwrap();

        assert_eq!(
            ChainValidator::validate(&chain),
            Err(ValidationError::BrokenLink { index: 2 })
        );
    }

    #[test]
    fn test_block_extends_parent() {
        let parent_hash = Hash::from_bytes([0xAA; 32]);
        let block = Block::new(TS, vec![], parent_hash);

        assert!(BlockValidator::validate_block_extends_parent(&block, parent_hash, 1).is_ok());
        assert_eq!(
            BlockValidator::validate_block_extends_parent(&block, Hash::ZERO, 1),
            Err(ValidationError::BrokenLink { index: 1 })
        );
    }
}
