//! Error types for the core crate.

use crate::types::{Account, Amount};
use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backend failed to read or write.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// A stored value could not be decoded.
    #[error("Corrupt value under key {key}: {reason}")]
    Corrupt {
        /// Hex encoding of the offending key
        key: String,
        /// What was wrong with the value
        reason: String,
    },
}

impl StorageError {
    pub(crate) fn corrupt(key: &[u8], reason: impl Into<String>) -> Self {
        StorageError::Corrupt {
            key: hex::encode(key),
            reason: reason.into(),
        }
    }
}

impl From<rocksdb::Error> for StorageError {
    fn from(error: rocksdb::Error) -> Self {
        StorageError::Backend(error.to_string())
    }
}

/// Errors that can occur in ledger operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// An account identifier had the wrong length or encoding.
    #[error("Invalid account: {0}")]
    InvalidAccount(String),

    /// An amount or delta could not be parsed.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The caller is not entitled to act for the account.
    #[error("{operation}: authorization failed for {account}")]
    Unauthorized {
        /// The entry point that rejected the call
        operation: &'static str,
        /// The account whose authorization was missing
        account: Account,
    },

    /// The account is neither an author nor the owner.
    #[error("mint: {0} is not a registered minter")]
    NotMinter(Account),

    /// Error when trying to move more than an account holds.
    #[error("Insufficient balance for {account}: required {required}, available {available}")]
    InsufficientBalance {
        /// The account being debited
        account: Account,
        /// The requested amount
        required: Amount,
        /// The stored balance
        available: Amount,
    },

    /// Error when a spender exceeds what the owner allowed.
    #[error("Insufficient allowance from {owner} to {spender}: required {required}, available {available}")]
    InsufficientAllowance {
        /// The owner of the funds
        owner: Account,
        /// The delegated spender
        spender: Account,
        /// The requested amount
        required: Amount,
        /// The stored allowance
        available: Amount,
    },

    /// Error when burning more than the recorded total supply.
    #[error("Insufficient supply: required {required}, available {available}")]
    InsufficientSupply {
        /// The amount being burned
        required: Amount,
        /// The recorded total supply
        available: Amount,
    },

    /// Error when a stored quantity would exceed the 256-bit range.
    #[error("{0} overflow")]
    Overflow(&'static str),

    /// Error from the storage backend.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
