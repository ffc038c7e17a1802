//! Namespaced ledger storage: total supply, balances and allowances.
//!
//! Each namespace lives under its own two-byte prefix so a scan of one never
//! crosses into another. Balances and allowances are sparse: a record that
//! drops to exactly zero is deleted, and an absent record reads as zero.

use crate::errors::{LedgerError, StorageError};
use crate::store::{ReadStore, WriteStore};
use crate::types::{decode_amount, encode_amount, Account, Amount};
use tracing::debug;

/// Prefix of the total supply cell.
pub const TOTAL_SUPPLY_PREFIX: [u8; 2] = [0x01, 0x00];
/// Key of the total supply cell inside its namespace.
pub const TOTAL_SUPPLY_KEY: &[u8] = b"totalSupply";
/// Prefix of the balance namespace.
pub const BALANCE_PREFIX: [u8; 2] = [0x01, 0x01];
/// Prefix of the allowance namespace.
pub const ALLOWANCE_PREFIX: [u8; 2] = [0x01, 0x02];
/// Prefix of the author namespace.
pub const AUTHOR_PREFIX: [u8; 2] = [0x01, 0x03];
/// Prefix of the owner cell.
pub const OWNER_PREFIX: [u8; 2] = [0x03, 0x02];
/// Key of the owner cell inside its namespace.
pub const OWNER_KEY: &[u8] = b"owner";

/// Builds a full storage key from a namespace prefix and the parts of a record key.
pub(crate) fn storage_key(prefix: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    let len = prefix.len() + parts.iter().map(|p| p.len()).sum::<usize>();
    let mut key = Vec::with_capacity(len);
    key.extend_from_slice(prefix);
    for part in parts {
        key.extend_from_slice(part);
    }
    key
}

fn supply_key() -> Vec<u8> {
    storage_key(&TOTAL_SUPPLY_PREFIX, &[TOTAL_SUPPLY_KEY])
}

fn balance_key(account: &Account) -> Vec<u8> {
    storage_key(&BALANCE_PREFIX, &[account.as_ref()])
}

fn allowance_key(owner: &Account, spender: &Account) -> Vec<u8> {
    storage_key(&ALLOWANCE_PREFIX, &[owner.as_ref(), spender.as_ref()])
}

/// Ledger bookkeeping over a store handle.
///
/// Wrap a shared reference for read-only queries, or a transaction for
/// mutations.
pub struct LedgerStorage<S> {
    store: S,
}

impl<S: ReadStore> LedgerStorage<S> {
    /// Wraps a store handle.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn read_amount(&self, key: &[u8]) -> Result<Amount, StorageError> {
        match self.store.get(key)? {
            Some(bytes) => {
                decode_amount(&bytes).ok_or_else(|| StorageError::corrupt(key, "amount wider than 256 bits"))
            }
            None => Ok(Amount::zero()),
        }
    }

    /// The recorded total supply; zero if never set.
    pub fn total_supply(&self) -> Result<Amount, StorageError> {
        self.read_amount(&supply_key())
    }

    /// The balance of `account`; zero if no record exists.
    pub fn balance(&self, account: &Account) -> Result<Amount, StorageError> {
        self.read_amount(&balance_key(account))
    }

    /// What `spender` may still withdraw from `owner`; zero if no record exists.
    pub fn allowance(&self, owner: &Account, spender: &Account) -> Result<Amount, StorageError> {
        self.read_amount(&allowance_key(owner, spender))
    }

    /// Every stored balance record. Used for audits and supply reconciliation.
    pub fn balances(&self) -> Result<Vec<(Account, Amount)>, LedgerError> {
        let mut records = Vec::new();
        for (key, value) in self.store.scan_prefix(&BALANCE_PREFIX)? {
            let account = Account::from_slice(&key[BALANCE_PREFIX.len()..])
                .map_err(|_| StorageError::corrupt(&key, "malformed balance key"))?;
            let amount = decode_amount(&value)
                .ok_or_else(|| StorageError::corrupt(&key, "amount wider than 256 bits"))?;
            records.push((account, amount));
        }
        Ok(records)
    }
}

impl<S: WriteStore> LedgerStorage<S> {
    /// The underlying store handle, for nested calls that share the operation's writes.
    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    // A zero amount is never stored; absence already reads as zero
    fn write_amount(&mut self, key: &[u8], amount: &Amount) -> Result<(), StorageError> {
        if amount.is_zero() {
            self.store.delete(key)
        } else {
            self.store.put(key, &encode_amount(amount))
        }
    }

    /// Adds `delta` to the total supply.
    pub fn increase_total_supply(&mut self, delta: Amount) -> Result<(), LedgerError> {
        let current = self.total_supply()?;
        let updated = current
            .checked_add(delta)
            .ok_or(LedgerError::Overflow("total supply"))?;
        debug!(%delta, %updated, "increase total supply");
        self.write_amount(&supply_key(), &updated)?;
        Ok(())
    }

    /// Subtracts `delta` from the total supply.
    pub fn decrease_total_supply(&mut self, delta: Amount) -> Result<(), LedgerError> {
        let current = self.total_supply()?;
        let updated = current
            .checked_sub(delta)
            .ok_or(LedgerError::InsufficientSupply {
                required: delta,
                available: current,
            })?;
        debug!(%delta, %updated, "decrease total supply");
        self.write_amount(&supply_key(), &updated)?;
        Ok(())
    }

    /// Credits `delta` to `account`.
    pub fn increase_balance(&mut self, account: &Account, delta: Amount) -> Result<(), LedgerError> {
        let key = balance_key(account);
        let updated = self
            .read_amount(&key)?
            .checked_add(delta)
            .ok_or(LedgerError::Overflow("balance"))?;
        debug!(%account, %delta, %updated, "increase balance");
        self.write_amount(&key, &updated)?;
        Ok(())
    }

    /// Debits `delta` from `account`.
    ///
    /// Returns `Ok(false)` without writing anything if the balance is too small.
    /// A balance reduced to exactly zero is deleted.
    pub fn reduce_balance(&mut self, account: &Account, delta: Amount) -> Result<bool, StorageError> {
        let key = balance_key(account);
        let reduced = self.reduce(&key, delta)?;
        debug!(%account, %delta, reduced, "reduce balance");
        Ok(reduced)
    }

    /// Raises what `spender` may withdraw from `owner` by `delta`.
    pub fn increase_allowance(
        &mut self,
        owner: &Account,
        spender: &Account,
        delta: Amount,
    ) -> Result<(), LedgerError> {
        let key = allowance_key(owner, spender);
        let updated = self
            .read_amount(&key)?
            .checked_add(delta)
            .ok_or(LedgerError::Overflow("allowance"))?;
        debug!(%owner, %spender, %delta, %updated, "increase allowance");
        self.write_amount(&key, &updated)?;
        Ok(())
    }

    /// Lowers what `spender` may withdraw from `owner` by `delta`.
    ///
    /// Same policy as [`LedgerStorage::reduce_balance`].
    pub fn reduce_allowance(
        &mut self,
        owner: &Account,
        spender: &Account,
        delta: Amount,
    ) -> Result<bool, StorageError> {
        let key = allowance_key(owner, spender);
        let reduced = self.reduce(&key, delta)?;
        debug!(%owner, %spender, %delta, reduced, "reduce allowance");
        Ok(reduced)
    }

    fn reduce(&mut self, key: &[u8], delta: Amount) -> Result<bool, StorageError> {
        let current = self.read_amount(key)?;
        if current < delta {
            return Ok(false);
        }
        self.write_amount(key, &(current - delta))?;
        Ok(true)
    }
}
