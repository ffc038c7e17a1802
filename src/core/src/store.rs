//! Key-value storage boundary for the ledger.
//!
//! The ledger never talks to a database directly. It reads through
//! [`ReadStore`], stages writes in a [`Transaction`] overlay, and hands the
//! resulting batch to [`Store::write_batch`] once the whole operation has
//! succeeded. A failed operation simply drops its transaction, so nothing it
//! wrote ever reaches the backend.

use crate::errors::StorageError;
use std::collections::BTreeMap;
use tracing::trace;

/// A key-value pair returned by a prefix scan.
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Read-only view of a byte-keyed store.
pub trait ReadStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Returns every entry whose key starts with `prefix`, in ascending key order.
    /// Keys are returned in full, prefix included.
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KvPair>, StorageError>;
}

/// Read-write view of a byte-keyed store.
pub trait WriteStore: ReadStore {
    /// Stores `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError>;
}

/// Batch operations for atomic commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    /// Insert or overwrite a key-value pair.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Remove a key.
    Delete { key: Vec<u8> },
}

/// A persistent backend that can commit a batch of writes atomically.
pub trait Store: ReadStore {
    /// Applies `ops` in order as one all-or-nothing write.
    fn write_batch(&mut self, ops: Vec<BatchOp>) -> Result<(), StorageError>;
}

impl<T: ReadStore + ?Sized> ReadStore for &T {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).get(key)
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KvPair>, StorageError> {
        (**self).scan_prefix(prefix)
    }
}

impl<T: ReadStore + ?Sized> ReadStore for &mut T {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).get(key)
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KvPair>, StorageError> {
        (**self).scan_prefix(prefix)
    }
}

impl<T: WriteStore + ?Sized> WriteStore for &mut T {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        (**self).put(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError> {
        (**self).delete(key)
    }
}

/// In-memory store, ordered by key.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ReadStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KvPair>, StorageError> {
        Ok(self
            .entries
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

impl WriteStore for MemoryStore {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

impl Store for MemoryStore {
    fn write_batch(&mut self, ops: Vec<BatchOp>) -> Result<(), StorageError> {
        for op in ops {
            match op {
                BatchOp::Put { key, value } => {
                    self.entries.insert(key, value);
                }
                BatchOp::Delete { key } => {
                    self.entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}

/// A write overlay over a read-only base.
///
/// Reads observe the overlay's own pending writes. Nothing reaches the base
/// until the caller commits [`Transaction::into_batch`].
pub struct Transaction<'a, S: ReadStore + ?Sized> {
    base: &'a S,
    // None marks a pending delete
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, S: ReadStore + ?Sized> Transaction<'a, S> {
    /// Opens a transaction over `base`.
    pub fn new(base: &'a S) -> Self {
        Self {
            base,
            pending: BTreeMap::new(),
        }
    }

    /// Whether the transaction has staged any write.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Consumes the transaction, returning its writes in key order.
    pub fn into_batch(self) -> Vec<BatchOp> {
        self.pending
            .into_iter()
            .map(|(key, value)| match value {
                Some(value) => BatchOp::Put { key, value },
                None => BatchOp::Delete { key },
            })
            .collect()
    }
}

impl<'a, S: ReadStore + ?Sized> ReadStore for Transaction<'a, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        match self.pending.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => self.base.get(key),
        }
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KvPair>, StorageError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.base.scan_prefix(prefix)?.into_iter().collect();

        for (key, staged) in self
            .pending
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
        {
            match staged {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }
}

impl<'a, S: ReadStore + ?Sized> WriteStore for Transaction<'a, S> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        trace!(key = %hex::encode(key), "staged put");
        self.pending.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError> {
        trace!(key = %hex::encode(key), "staged delete");
        self.pending.insert(key.to_vec(), None);
        Ok(())
    }
}
