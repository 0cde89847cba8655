//! Queue of transactions waiting to be mined.
//!
//! Transactions leave the mempool in the order they were accepted, and
//! all of them go into the next block.

use powchain_core::{Address, Transaction};
use std::collections::HashSet;

/// Transaction mempool.
#[derive(Debug, Default)]
pub struct Mempool {
    /// Pending transactions in arrival order.
    transactions: Vec<Transaction>,
}

impl Mempool {
    /// Create an empty mempool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of transactions in the mempool.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Check if the mempool is empty.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Append a transaction. Validation is the caller's job.
    pub fn add(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    /// Pending transactions in arrival order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Take every pending transaction, leaving the mempool empty.
    pub fn drain(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.transactions)
    }

    /// Put previously drained transactions back ahead of anything queued
    /// since.
    pub fn restore(&mut self, mut transactions: Vec<Transaction>) {
        transactions.append(&mut self.transactions);
        self.transactions = transactions;
    }

    /// Get transactions from a specific sender.
    pub fn get_by_sender(&self, sender: &Address) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|tx| tx.from_address() == Some(sender))
            .cloned()
            .collect()
    }

    /// Clear all transactions from the mempool.
    pub fn clear(&mut self) {
        self.transactions.clear();
    }

    /// Get mempool statistics.
    pub fn stats(&self) -> MempoolStats {
        let senders: HashSet<&Address> = self
            .transactions
            .iter()
            .filter_map(|tx| tx.from_address())
            .collect();
        MempoolStats {
            total_transactions: self.len(),
            unique_senders: senders.len(),
            total_amount: self.transactions.iter().map(|tx| u128::from(tx.amount)).sum(),
        }
    }
}

/// Mempool statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MempoolStats {
    /// Total number of transactions.
    pub total_transactions: usize,
    /// Number of unique senders.
    pub unique_senders: usize,
    /// Sum of pending amounts.
    pub total_amount: u128,
}
