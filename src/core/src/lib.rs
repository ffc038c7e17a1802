//! Core ledger engine for the FLM fungible token.
//!
//! This crate provides the storage-backed bookkeeping for balances, allowances
//! and total supply, the transfer and approval state transitions that mutate
//! them, and the author/owner registries. Storage, authorization, recipient
//! notification and event delivery are injected through traits so the engine
//! can run against RocksDB in production and an in-memory map in tests.

pub mod approval;
pub mod auth;
pub mod errors;
pub mod events;
pub mod hooks;
pub mod ledger;
pub mod registry;
pub mod rocks;
pub mod storage;
pub mod store;
pub mod transfer;
pub mod types;

// Re-export commonly used types
pub use auth::{Authorization, CallContext, NoWitness, SignerSet, Witness};
pub use errors::{LedgerError, StorageError};
pub use events::{EventSink, LedgerEvent, RecordingSink, TracingSink};
pub use hooks::{HookError, HookOutcome, NoContracts, PaymentHook};
pub use ledger::{Ledger, DEFAULT_OWNER};
pub use rocks::RocksStore;
pub use store::{BatchOp, MemoryStore, ReadStore, Store, Transaction, WriteStore};
pub use transfer::{Endpoint, TransferReceipt};
pub use types::{Account, Amount, Delta};
