//! Public entry points of the ledger.
//!
//! Every mutating entry point checks authorization first, then runs as one
//! [`Transaction`] against the backing store. The transaction is committed
//! as a single batch only if the whole operation succeeds, and events are
//! delivered only after that commit.

use crate::approval::ApprovalEngine;
use crate::auth::CallContext;
use crate::errors::LedgerError;
use crate::events::{EventSink, LedgerEvent, TracingSink};
use crate::hooks::{NoContracts, PaymentHook};
use crate::registry::{AuthorRegistry, OwnerRegistry};
use crate::storage::LedgerStorage;
use crate::store::{Store, Transaction};
use crate::transfer::{TransferEngine, TransferReceipt, TransferRequest};
use crate::types::{Account, Amount, Delta};
use tracing::{debug, info, warn};

/// Owner reported while no valid owner has been stored.
pub const DEFAULT_OWNER: Account = Account::new([
    0x7d, 0x4e, 0x3b, 0x46, 0x1f, 0x0c, 0x2a, 0x93, 0x58, 0xe1,
    0x6b, 0x05, 0xd2, 0x8f, 0x34, 0xc7, 0x19, 0xa0, 0x62, 0xbe,
]);

/// A fungible token ledger over a persistent store.
pub struct Ledger<S, H = NoContracts, E = TracingSink> {
    store: S,
    hook: H,
    events: E,
    fallback_owner: Account,
}

impl<S: Store> Ledger<S> {
    /// Opens a ledger with no contract recipients that logs its events.
    pub fn open(store: S) -> Self {
        Self::new(store, NoContracts, TracingSink)
    }
}

impl<S: Store, H: PaymentHook, E: EventSink> Ledger<S, H, E> {
    /// Creates a ledger from its collaborators.
    pub fn new(store: S, hook: H, events: E) -> Self {
        Self {
            store,
            hook,
            events,
            fallback_owner: DEFAULT_OWNER,
        }
    }

    /// Replaces the owner reported while none is stored.
    pub fn with_fallback_owner(mut self, owner: Account) -> Self {
        self.fallback_owner = owner;
        self
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The recipient notification hook.
    pub fn hook(&self) -> &H {
        &self.hook
    }

    /// The event sink.
    pub fn events(&self) -> &E {
        &self.events
    }

    // ---- read API ----

    /// The total token supply.
    pub fn total_supply(&self) -> Result<Amount, LedgerError> {
        Ok(LedgerStorage::new(&self.store).total_supply()?)
    }

    /// The balance held by `account`.
    pub fn balance_of(&self, account: &Account) -> Result<Amount, LedgerError> {
        Ok(LedgerStorage::new(&self.store).balance(account)?)
    }

    /// What `spender` may still withdraw from `owner`.
    pub fn allowance(&self, owner: &Account, spender: &Account) -> Result<Amount, LedgerError> {
        Ok(LedgerStorage::new(&self.store).allowance(owner, spender)?)
    }

    /// Every account with a nonzero balance, in key order.
    pub fn holders(&self) -> Result<Vec<(Account, Amount)>, LedgerError> {
        LedgerStorage::new(&self.store).balances()
    }

    /// The privileged owner account.
    pub fn owner(&self) -> Result<Account, LedgerError> {
        Ok(OwnerRegistry::new(&self.store, self.fallback_owner).get()?)
    }

    /// Whether `account` is a registered author.
    pub fn is_author(&self, account: &Account) -> Result<bool, LedgerError> {
        Ok(AuthorRegistry::new(&self.store).contains(account)?)
    }

    /// Number of registered authors.
    pub fn author_count(&self) -> Result<usize, LedgerError> {
        Ok(AuthorRegistry::new(&self.store).count()?)
    }

    /// Every registered author.
    pub fn authors(&self) -> Result<Vec<Account>, LedgerError> {
        AuthorRegistry::new(&self.store).list()
    }

    // ---- write API ----

    /// Adjusts what `spender` may withdraw from `owner` by `delta`.
    pub fn approve(
        &mut self,
        ctx: &CallContext<'_>,
        owner: Account,
        spender: Account,
        delta: Delta,
    ) -> Result<bool, LedgerError> {
        require(ctx, "approve", &owner)?;
        self.execute("approve", |tx, _| {
            let event = ApprovalEngine::new(tx).approve(owner, spender, delta)?;
            Ok(((), event.into_iter().collect()))
        })?;
        Ok(true)
    }

    /// Moves `amount` from `from` to `to`. `from` must authorize the call.
    ///
    /// The null account is never authorized, so new supply only comes from
    /// [`Ledger::mint`]. A null `to` burns.
    pub fn transfer(
        &mut self,
        ctx: &CallContext<'_>,
        from: Account,
        to: Account,
        amount: Amount,
        data: Option<&[u8]>,
    ) -> Result<TransferReceipt, LedgerError> {
        require(ctx, "transfer", &from)?;
        self.run_transfer(
            "transfer",
            TransferRequest {
                spender: from,
                from,
                to,
                amount,
                data,
            },
        )
    }

    /// Moves `amount` from `from` to `to` out of the allowance `from` granted `spender`.
    ///
    /// `spender` must authorize the call, unless it runs in `from`'s own
    /// contract context.
    pub fn transfer_from(
        &mut self,
        ctx: &CallContext<'_>,
        spender: Account,
        from: Account,
        to: Account,
        amount: Amount,
        data: Option<&[u8]>,
    ) -> Result<TransferReceipt, LedgerError> {
        if !ctx.is_witnessed(&spender) && !ctx.is_self_call(&from) {
            warn!(%spender, %from, "transfer_from: authorization failed");
            return Err(LedgerError::Unauthorized {
                operation: "transfer_from",
                account: spender,
            });
        }
        self.run_transfer(
            "transfer_from",
            TransferRequest {
                spender,
                from,
                to,
                amount,
                data,
            },
        )
    }

    /// Creates `amount` new tokens for `to`. `minter` must authorize the call
    /// and be a registered author or the owner.
    pub fn mint(
        &mut self,
        ctx: &CallContext<'_>,
        minter: Account,
        to: Account,
        amount: Amount,
    ) -> Result<TransferReceipt, LedgerError> {
        require(ctx, "mint", &minter)?;
        if !self.is_author(&minter)? && self.owner()? != minter {
            warn!(%minter, "mint: not a registered minter");
            return Err(LedgerError::NotMinter(minter));
        }
        self.run_transfer(
            "mint",
            TransferRequest {
                spender: Account::NULL,
                from: Account::NULL,
                to,
                amount,
                data: None,
            },
        )
    }

    /// Destroys `amount` tokens held by `from`. `from` must authorize the call.
    pub fn burn(
        &mut self,
        ctx: &CallContext<'_>,
        from: Account,
        amount: Amount,
    ) -> Result<TransferReceipt, LedgerError> {
        require(ctx, "burn", &from)?;
        self.run_transfer(
            "burn",
            TransferRequest {
                spender: from,
                from,
                to: Account::NULL,
                amount,
                data: None,
            },
        )
    }

    /// Registers an author. Requires the owner's authorization.
    pub fn add_author(&mut self, ctx: &CallContext<'_>, account: Account) -> Result<(), LedgerError> {
        self.require_owner(ctx, "add_author")?;
        self.execute("add_author", |tx, _| {
            AuthorRegistry::new(tx).add(&account)?;
            Ok(((), Vec::new()))
        })
    }

    /// Unregisters an author. Requires the owner's authorization.
    pub fn remove_author(&mut self, ctx: &CallContext<'_>, account: Account) -> Result<(), LedgerError> {
        self.require_owner(ctx, "remove_author")?;
        self.execute("remove_author", |tx, _| {
            AuthorRegistry::new(tx).remove(&account)?;
            Ok(((), Vec::new()))
        })
    }

    /// Hands ownership to `account`. Requires the current owner's authorization.
    pub fn set_owner(&mut self, ctx: &CallContext<'_>, account: Account) -> Result<(), LedgerError> {
        self.require_owner(ctx, "set_owner")?;
        let fallback = self.fallback_owner;
        self.execute("set_owner", |tx, _| {
            OwnerRegistry::new(tx, fallback).set(&account)?;
            Ok(((), Vec::new()))
        })
    }

    // ---- internals ----

    fn require_owner(&self, ctx: &CallContext<'_>, operation: &'static str) -> Result<(), LedgerError> {
        let owner = self.owner()?;
        require(ctx, operation, &owner)
    }

    fn run_transfer(
        &mut self,
        operation: &'static str,
        request: TransferRequest<'_>,
    ) -> Result<TransferReceipt, LedgerError> {
        self.execute(operation, |tx, hook| {
            let receipt = TransferEngine::new(tx, hook).execute(request)?;
            let events = vec![receipt.event.clone()];
            Ok((receipt, events))
        })
    }

    /// Runs `op` in a fresh transaction, commits it, then announces its events.
    fn execute<T, F>(&mut self, operation: &'static str, op: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Transaction<'_, S>, &H) -> Result<(T, Vec<LedgerEvent>), LedgerError>,
    {
        let mut tx = Transaction::new(&self.store);
        let (value, events) = match op(&mut tx, &self.hook) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(operation, error = %e, "operation rejected; writes discarded");
                return Err(e);
            }
        };

        let batch = tx.into_batch();
        debug!(operation, writes = batch.len(), "committing");
        self.store.write_batch(batch)?;

        for event in &events {
            self.events.emit(event);
        }
        info!(operation, events = events.len(), "operation committed");
        Ok(value)
    }
}

fn require(ctx: &CallContext<'_>, operation: &'static str, account: &Account) -> Result<(), LedgerError> {
    let authorization = ctx.authorize(account);
    if authorization.is_granted() {
        debug!(operation, %account, ?authorization, "authorized");
        Ok(())
    } else {
        warn!(operation, %account, "authorization failed");
        Err(LedgerError::Unauthorized { operation, account: *account })
    }
}
