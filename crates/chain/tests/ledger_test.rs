use powchain_chain::{Blockchain, BlockchainConfig, BlockchainError, FixedClock};
use powchain_consensus::{ChainValidator, ValidationError};
use powchain_core::{Address, Block, Hash, Keypair, Transaction};

fn ledger(difficulty: usize) -> Blockchain {
    Blockchain::with_clock(
        BlockchainConfig::new(difficulty, 5),
        Box::new(FixedClock(1_700_000_000_000)),
    )
}

fn transfer(keypair: &Keypair, to: &Address, amount: u64) -> Transaction {
    Transaction::new(keypair.address(), to.clone(), amount)
        .signed(keypair)
        .unwrap()
}

/// Export the chain, tamper with it, and audit the copy.
fn audit_tampered(
    blockchain: &Blockchain,
    tamper: impl FnOnce(&mut Vec<Block>),
) -> Result<(), ValidationError> {
    let mut blocks = blockchain.chain().to_vec();
    tamper(&mut blocks);
    ChainValidator::validate(&blocks)
}

#[test]
fn test_end_to_end_transfer() {
    let mut blockchain = ledger(2);
    let keypair = Keypair::generate();
    let a = keypair.address();
    let b = Address::from("B");

    blockchain.add_transaction(transfer(&keypair, &b, 10)).unwrap();
    blockchain.mine_pending_transactions(&a).unwrap();

    assert_eq!(blockchain.get_balance_of_address(&a), -10 + 5);
    assert_eq!(blockchain.get_balance_of_address(&b), 10);
    assert!(blockchain.is_chain_valid());
    assert!(blockchain.chain()[1].hash.to_hex().starts_with("00"));
}

#[test]
fn test_unsigned_submission_rejected() {
    let mut blockchain = ledger(1);
    let keypair = Keypair::generate();
    let tx = Transaction::new(keypair.address(), Address::from("B"), 10);

    assert_eq!(
        blockchain.add_transaction(tx),
        Err(BlockchainError::InvalidSignature)
    );
}

#[test]
fn test_unset_recipient_rejected() {
    let mut blockchain = ledger(1);
    let keypair = Keypair::generate();
    let tx = Transaction::new(keypair.address(), Address::default(), 10)
        .signed(&keypair)
        .unwrap();

    assert_eq!(
        blockchain.add_transaction(tx),
        Err(BlockchainError::MalformedTransaction)
    );
}

#[test]
fn test_balance_is_additive_across_blocks() {
    let mut blockchain = ledger(1);
    let miner = Keypair::generate();
    let friend = Keypair::generate();
    let x = miner.address();
    let y = friend.address();

    let blocks = 4;
    let mut sent = 0;
    let mut received = 0;
    for i in 0..blocks {
        blockchain.add_transaction(transfer(&miner, &y, i + 1)).unwrap();
        sent += i + 1;
        blockchain.add_transaction(transfer(&friend, &x, 2 * i)).unwrap();
        received += 2 * i;
        blockchain.mine_pending_transactions(&x).unwrap();
    }

    let expected = i128::from(blocks * 5) - i128::from(sent) + i128::from(received);
    assert_eq!(blockchain.height(), blocks);
    assert_eq!(blockchain.get_balance_of_address(&x), expected);
    assert_eq!(
        blockchain.get_balance_of_address(&y),
        i128::from(sent) - i128::from(received)
    );
    assert!(blockchain.is_chain_valid());
}

#[test]
fn test_overspending_is_permitted() {
    let mut blockchain = ledger(1);
    let keypair = Keypair::generate();

    blockchain
        .add_transaction(transfer(&keypair, &Address::from("B"), 1_000_000))
        .unwrap();
    blockchain.mine_pending_transactions(&keypair.address()).unwrap();

    assert_eq!(blockchain.get_balance_of_address(&keypair.address()), 5 - 1_000_000);
}

#[test]
fn test_history_in_chain_order() {
    let mut blockchain = ledger(1);
    let keypair = Keypair::generate();
    let a = keypair.address();
    let b = Address::from("B");

    blockchain.add_transaction(transfer(&keypair, &b, 1)).unwrap();
    blockchain.add_transaction(transfer(&keypair, &b, 2)).unwrap();
    blockchain.mine_pending_transactions(&b).unwrap();
    blockchain.add_transaction(transfer(&keypair, &b, 3)).unwrap();
    blockchain.mine_pending_transactions(&a).unwrap();

    let history: Vec<(bool, u64)> = blockchain
        .get_all_transactions_for_wallet(&a)
        .iter()
        .map(|tx| (tx.is_reward(), tx.amount))
        .collect();
    assert_eq!(history, vec![(false, 1), (false, 2), (false, 3), (true, 5)]);

    assert_eq!(blockchain.get_all_transactions_for_wallet(&b).len(), 4);
}

#[test]
fn test_tampering_detected_independently() {
    let mut blockchain = ledger(1);
    let keypair = Keypair::generate();
    for amount in [10, 20] {
        blockchain
            .add_transaction(transfer(&keypair, &Address::from("B"), amount))
            .unwrap();
        blockchain.mine_pending_transactions(&keypair.address()).unwrap();
    }
    assert!(blockchain.is_chain_valid());

    // Amount changed after mining: the signature no longer matches.
    assert_eq!(
        audit_tampered(&blockchain, |blocks| blocks[1].transactions[0].amount = 99),
        Err(ValidationError::InvalidTransactions { index: 1 })
    );

    // Reward inflated: no signature involved, the stale hash gives it away.
    assert_eq!(
        audit_tampered(&blockchain, |blocks| blocks[2].transactions[1].amount = 500),
        Err(ValidationError::HashMismatch { index: 2 })
    );

    // Relinked and re-mined: only the linkage is wrong.
    assert_eq!(
        audit_tampered(&blockchain, |blocks| {
            blocks[2].previous_hash = Hash::from_bytes([0x11; 32]);
            blocks[2].mine(1).unwrap();
        }),
        Err(ValidationError::BrokenLink { index: 2 })
    );

    // The ledger itself is untouched.
    assert!(blockchain.is_chain_valid());
    assert!(blockchain.validate_chain().is_ok());
}

#[test]
fn test_submission_after_mining_goes_to_next_block() {
    let mut blockchain = ledger(1);
    let keypair = Keypair::generate();
    let b = Address::from("B");

    blockchain.add_transaction(transfer(&keypair, &b, 1)).unwrap();
    blockchain.mine_pending_transactions(&keypair.address()).unwrap();
    blockchain.add_transaction(transfer(&keypair, &b, 2)).unwrap();

    assert_eq!(blockchain.chain()[1].tx_count(), 2);
    assert_eq!(blockchain.pending_transactions().len(), 1);
    assert_eq!(blockchain.pending_transactions()[0].amount, 2);
}
