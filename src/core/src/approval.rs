//! Allowance adjustment.
//!
//! Approvals apply a signed delta to the existing allowance instead of
//! overwriting it, so concurrent approvals for the same pair compose.

use crate::errors::LedgerError;
use crate::events::LedgerEvent;
use crate::storage::LedgerStorage;
use crate::store::WriteStore;
use crate::types::{Account, Delta};
use tracing::debug;

/// Applies approval deltas against ledger storage.
pub struct ApprovalEngine<S> {
    storage: LedgerStorage<S>,
}

impl<S: WriteStore> ApprovalEngine<S> {
    /// Creates an engine over a writable store handle.
    pub fn new(store: S) -> Self {
        Self {
            storage: LedgerStorage::new(store),
        }
    }

    /// Adjusts what `spender` may withdraw from `owner` by `delta`.
    ///
    /// Returns the event to announce, or `None` for a self-approval, which
    /// succeeds without touching storage.
    pub fn approve(
        &mut self,
        owner: Account,
        spender: Account,
        delta: Delta,
    ) -> Result<Option<LedgerEvent>, LedgerError> {
        if owner == spender {
            debug!(%owner, "self-approval ignored");
            return Ok(None);
        }

        match delta {
            Delta::Increase(amount) => self.storage.increase_allowance(&owner, &spender, amount)?,
            Delta::Decrease(amount) => {
                if !self.storage.reduce_allowance(&owner, &spender, amount)? {
                    return Err(LedgerError::InsufficientAllowance {
                        owner,
                        spender,
                        required: amount,
                        available: self.storage.allowance(&owner, &spender)?,
                    });
                }
            }
        }

        Ok(Some(LedgerEvent::Approval {
            owner,
            spender,
            delta,
        }))
    }
}
