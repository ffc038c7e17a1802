//! RocksDB storage backend.

use crate::errors::StorageError;
use crate::store::{BatchOp, KvPair, ReadStore, Store, WriteStore};
use rocksdb::{Direction, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// A ledger store persisted in RocksDB.
#[derive(Clone)]
pub struct RocksStore {
    /// The RocksDB instance
    db: Arc<DB>,
}

impl RocksStore {
    /// Opens (or creates) a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DB::open(&opts, path.as_ref())?;
        info!("Opened ledger store at {}", path.as_ref().display());

        Ok(Self { db: Arc::new(db) })
    }

    /// Wraps an already opened database.
    pub fn from_db(db: Arc<DB>) -> Self {
        Self { db }
    }
}

impl ReadStore for RocksStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.db.get(key)?)
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KvPair>, StorageError> {
        let iter = self
            .db
            .iterator(IteratorMode::From(prefix, Direction::Forward));

        let mut entries = Vec::new();
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(prefix) {
                // We've moved past the prefix
                break;
            }
            entries.push((key.to_vec(), value.to_vec()));
        }
        Ok(entries)
    }
}

impl WriteStore for RocksStore {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        Ok(self.db.put(key, value)?)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError> {
        Ok(self.db.delete(key)?)
    }
}

impl Store for RocksStore {
    fn write_batch(&mut self, ops: Vec<BatchOp>) -> Result<(), StorageError> {
        let mut batch = WriteBatch::default();
        for op in &ops {
            match op {
                BatchOp::Put { key, value } => batch.put(key, value),
                BatchOp::Delete { key } => batch.delete(key),
            }
        }
        debug!(ops = ops.len(), "committing write batch");
        self.db.write(batch)?;
        Ok(())
    }
}
