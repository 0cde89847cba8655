//! Transaction types and signing.

use crate::crypto::{self, Address, Keypair, Signature};
use crate::hash::{digest, Hash};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during transaction operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("keypair does not own the sending address")]
    UnauthorizedSigner,
    #[error("missing signature")]
    MissingSignature,
}

/// Where the value of a transaction comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    /// Minted by the ledger for the miner of a block. Has no signer.
    Reward,
    /// Moved out of an existing address.
    Transfer { from: Address },
}

/// A value transfer on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Source of the value.
    pub sender: Sender,
    /// Recipient's address.
    pub to: Address,
    /// Value to transfer.
    pub amount: u64,
    /// Signature over `calculate_hash()`, set once signed.
    pub signature: Option<Signature>,
}

impl Transaction {
    /// Create a new unsigned transfer.
    pub fn new(from: Address, to: Address, amount: u64) -> Self {
        Self {
            sender: Sender::Transfer { from },
            to,
            amount,
            signature: None,
        }
    }

    /// Create a mining reward paid to `to`.
    pub fn reward(to: Address, amount: u64) -> Self {
        Self {
            sender: Sender::Reward,
            to,
            amount,
            signature: None,
        }
    }

    /// The sending address, if this is a transfer.
    pub fn from_address(&self) -> Option<&Address> {
        match &self.sender {
            Sender::Reward => None,
            Sender::Transfer { from } => Some(from),
        }
    }

    /// Check if this is a mining reward.
    pub fn is_reward(&self) -> bool {
        matches!(self.sender, Sender::Reward)
    }

    /// Whether `address` sends or receives in this transaction.
    pub fn involves(&self, address: &Address) -> bool {
        self.from_address() == Some(address) || &self.to == address
    }

    /// Hash of sender, recipient and amount. This is what gets signed.
    pub fn calculate_hash(&self) -> Hash {
        let from = self.from_address().map(Address::as_str).unwrap_or("");
        digest(&[from, self.to.as_str(), self.amount.to_string().as_str()])
    }

    /// Sign the transaction with the given keypair.
    ///
    /// The keypair's address must be the sender; rewards cannot be signed.
    pub fn sign(&mut self, keypair: &Keypair) -> Result<(), TransactionError> {
        if self.from_address() != Some(&keypair.address()) {
            return Err(TransactionError::UnauthorizedSigner);
        }
        let hash = self.calculate_hash();
        self.signature = Some(keypair.sign_hash(&hash));
        Ok(())
    }

    /// Create a signed transaction.
    pub fn signed(mut self, keypair: &Keypair) -> Result<Self, TransactionError> {
        self.sign(keypair)?;
        Ok(self)
    }

    /// Check the signature against the sender address.
    ///
    /// Rewards are always valid. An unsigned transfer is an error rather
    /// than merely invalid.
    pub fn is_valid(&self) -> Result<bool, TransactionError> {
        let from = match &self.sender {
            Sender::Reward => return Ok(true),
            Sender::Transfer { from } => from,
        };
        let signature = self
            .signature
            .as_ref()
            .ok_or(TransactionError::MissingSignature)?;
        Ok(crypto::verify(from, &self.calculate_hash(), signature))
    }
}
