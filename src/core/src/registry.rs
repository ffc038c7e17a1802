//! Author and owner registries.

use crate::errors::{LedgerError, StorageError};
use crate::storage::{storage_key, AUTHOR_PREFIX, OWNER_KEY, OWNER_PREFIX};
use crate::store::{KvPair, ReadStore, WriteStore};
use crate::types::{Account, ACCOUNT_LEN};
use tracing::debug;

const MEMBER_FLAG: &[u8] = &[1];

/// The set of distinguished author accounts. Presence of a record is membership.
pub struct AuthorRegistry<S> {
    store: S,
}

impl<S: ReadStore> AuthorRegistry<S> {
    /// Wraps a store handle.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn key(account: &Account) -> Vec<u8> {
        storage_key(&AUTHOR_PREFIX, &[account.as_ref()])
    }

    /// Whether `account` is a registered author.
    pub fn contains(&self, account: &Account) -> Result<bool, StorageError> {
        Ok(self.store.get(&Self::key(account))?.is_some())
    }

    /// Number of registered authors.
    pub fn count(&self) -> Result<usize, StorageError> {
        Ok(self.store.scan_prefix(&AUTHOR_PREFIX)?.len())
    }

    /// Every registered author, in key order.
    pub fn list(&self) -> Result<Vec<Account>, LedgerError> {
        self.find()?
            .into_iter()
            .map(|(key, _)| {
                Account::from_slice(&key).map_err(|_| {
                    LedgerError::Storage(StorageError::corrupt(
                        &storage_key(&AUTHOR_PREFIX, &[key.as_slice()]),
                        format!("author key is {} bytes, expected {}", key.len(), ACCOUNT_LEN),
                    ))
                })
            })
            .collect()
    }

    /// Raw author entries with the namespace prefix removed.
    pub fn find(&self) -> Result<Vec<KvPair>, StorageError> {
        Ok(self
            .store
            .scan_prefix(&AUTHOR_PREFIX)?
            .into_iter()
            .map(|(key, value)| (key[AUTHOR_PREFIX.len()..].to_vec(), value))
            .collect())
    }
}

impl<S: WriteStore> AuthorRegistry<S> {
    /// Registers `account` as an author. Adding an existing author is a no-op.
    pub fn add(&mut self, account: &Account) -> Result<(), StorageError> {
        debug!(%account, "add author");
        self.store.put(&Self::key(account), MEMBER_FLAG)
    }

    /// Removes `account` from the authors. Removing a non-member is a no-op.
    pub fn remove(&mut self, account: &Account) -> Result<(), StorageError> {
        debug!(%account, "remove author");
        self.store.delete(&Self::key(account))
    }
}

/// The single privileged owner account.
pub struct OwnerRegistry<S> {
    store: S,
    fallback: Account,
}

impl<S: ReadStore> OwnerRegistry<S> {
    /// Wraps a store handle. `fallback` is reported while no valid owner is stored.
    pub fn new(store: S, fallback: Account) -> Self {
        Self { store, fallback }
    }

    fn key() -> Vec<u8> {
        storage_key(&OWNER_PREFIX, &[OWNER_KEY])
    }

    /// The current owner, or the fallback when the cell is unset or malformed.
    pub fn get(&self) -> Result<Account, StorageError> {
        let owner = match self.store.get(&Self::key())? {
            Some(bytes) => Account::from_slice(&bytes).unwrap_or(self.fallback),
            None => self.fallback,
        };
        Ok(owner)
    }
}

impl<S: WriteStore> OwnerRegistry<S> {
    /// Replaces the owner.
    pub fn set(&mut self, account: &Account) -> Result<(), StorageError> {
        debug!(%account, "set owner");
        self.store.put(&Self::key(), account.as_ref())
    }
}
