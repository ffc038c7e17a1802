//! Recipient notification boundary.

use crate::store::WriteStore;
use crate::types::{Account, Amount};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors reported by a recipient's payment callback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HookError {
    /// The recipient refused the payment.
    #[error("payment rejected by {recipient}: {reason}")]
    Rejected {
        /// The contract that was notified
        recipient: Account,
        /// Why it refused
        reason: String,
    },

    /// The callback could not be executed.
    #[error("payment callback failed: {0}")]
    Failed(String),
}

/// Detects contract accounts and delivers payment notifications to them.
pub trait PaymentHook {
    /// Whether `account` is a contract that must be notified of incoming funds.
    fn is_contract(&self, account: &Account) -> bool;

    /// Notifies contract `to` that it received `amount` from `from`.
    ///
    /// `ledger` is the operation's open transaction, already holding the
    /// debit and credit. Reads see them, and writes commit together with the
    /// transfer.
    fn on_payment(
        &self,
        ledger: &mut dyn WriteStore,
        to: &Account,
        from: &Account,
        amount: &Amount,
        data: Option<&[u8]>,
    ) -> Result<(), HookError>;
}

/// A host without contracts: nobody is ever notified.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContracts;

impl PaymentHook for NoContracts {
    fn is_contract(&self, _account: &Account) -> bool {
        false
    }

    fn on_payment(
        &self,
        _ledger: &mut dyn WriteStore,
        _to: &Account,
        _from: &Account,
        _amount: &Amount,
        _data: Option<&[u8]>,
    ) -> Result<(), HookError> {
        Ok(())
    }
}

/// What happened when the destination was checked for a payment callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookOutcome {
    /// The destination is not a contract.
    NotContract,
    /// The destination contract accepted the notification.
    Notified,
    /// The destination contract's callback failed. The transfer still stands.
    Failed(String),
}

impl fmt::Display for HookOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookOutcome::NotContract => write!(f, "not a contract"),
            HookOutcome::Notified => write!(f, "notified"),
            HookOutcome::Failed(reason) => write!(f, "callback failed ({})", reason),
        }
    }
}
