//! Transfer execution, including delegated transfers, mints and burns.

use crate::errors::LedgerError;
use crate::events::LedgerEvent;
use crate::hooks::{HookOutcome, PaymentHook};
use crate::storage::LedgerStorage;
use crate::store::WriteStore;
use crate::types::{Account, Amount};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// One side of a transfer.
///
/// The null account never holds a balance. On the source side it stands for
/// newly minted supply, on the destination side for burned supply. Every
/// transfer branches through [`Endpoint::of`] so that rule lives in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// The token supply itself.
    Supply,
    /// A real account holding a balance.
    Holder(Account),
}

impl Endpoint {
    /// Classifies an account.
    pub fn of(account: Account) -> Self {
        if account.is_null() {
            Endpoint::Supply
        } else {
            Endpoint::Holder(account)
        }
    }
}

/// A transfer as requested by an entry point.
#[derive(Debug, Clone, Copy)]
pub struct TransferRequest<'d> {
    /// The account spending the funds; equal to `from` unless delegated
    pub spender: Account,
    /// The debited account, or null to mint
    pub from: Account,
    /// The credited account, or null to burn
    pub to: Account,
    /// The amount to move
    pub amount: Amount,
    /// Opaque payload handed to a contract recipient
    pub data: Option<&'d [u8]>,
}

/// The result of a successful transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// The event to announce once the transfer is committed
    pub event: LedgerEvent,
    /// What the destination's payment callback did
    pub hook: HookOutcome,
}

impl fmt::Display for TransferReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (recipient {})", self.event, self.hook)
    }
}

/// Executes transfers against ledger storage.
pub struct TransferEngine<'h, S, H: ?Sized> {
    storage: LedgerStorage<S>,
    hook: &'h H,
}

impl<'h, S: WriteStore, H: PaymentHook + ?Sized> TransferEngine<'h, S, H> {
    /// Creates an engine over a writable store handle.
    pub fn new(store: S, hook: &'h H) -> Self {
        Self {
            storage: LedgerStorage::new(store),
            hook,
        }
    }

    /// Moves `amount` from `from` to `to` on behalf of `spender`.
    ///
    /// Any error leaves partial writes in the store handle; the caller must
    /// discard them. A failing payment callback does not undo the transfer.
    pub fn execute(&mut self, request: TransferRequest<'_>) -> Result<TransferReceipt, LedgerError> {
        let TransferRequest {
            spender,
            from,
            to,
            amount,
            data,
        } = request;

        if spender != from && !self.storage.reduce_allowance(&from, &spender, amount)? {
            return Err(LedgerError::InsufficientAllowance {
                owner: from,
                spender,
                required: amount,
                available: self.storage.allowance(&from, &spender)?,
            });
        }

        match Endpoint::of(from) {
            Endpoint::Supply => self.storage.increase_total_supply(amount)?,
            Endpoint::Holder(account) => {
                if !amount.is_zero() && !self.storage.reduce_balance(&account, amount)? {
                    return Err(LedgerError::InsufficientBalance {
                        account,
                        required: amount,
                        available: self.storage.balance(&account)?,
                    });
                }
            }
        }

        match Endpoint::of(to) {
            Endpoint::Supply => self.storage.decrease_total_supply(amount)?,
            Endpoint::Holder(account) => {
                if !amount.is_zero() {
                    self.storage.increase_balance(&account, amount)?;
                }
            }
        }

        let hook = self.notify(&from, &to, &amount, data);
        debug!(%spender, %from, %to, %amount, "transfer applied");

        Ok(TransferReceipt {
            event: LedgerEvent::Transfer { from, to, amount },
            hook,
        })
    }

    fn notify(&mut self, from: &Account, to: &Account, amount: &Amount, data: Option<&[u8]>) -> HookOutcome {
        let hook = self.hook;
        if !hook.is_contract(to) {
            return HookOutcome::NotContract;
        }
        match hook.on_payment(self.storage.store_mut(), to, from, amount, data) {
            Ok(()) => HookOutcome::Notified,
            Err(e) => {
                warn!(%from, %to, %amount, error = %e, "payment callback failed; transfer stands");
                HookOutcome::Failed(e.to_string())
            }
        }
    }
}
