//! Error types for the ledger CLI.

use flm_core::{LedgerError, StorageError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the ledger CLI.
#[derive(Error, Debug)]
pub enum CliError {
    /// A configuration file could not be read or written.
    #[error("config file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid JSON for [`crate::LedgerConfig`].
    #[error("invalid config: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    /// An environment override holds an unusable value.
    #[error("invalid value for {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },

    /// No data directory was configured and the platform has none.
    #[error("no data directory available; pass --data-dir")]
    NoDataDir,

    /// A hex payload could not be decoded.
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] hex::FromHexError),

    /// The ledger store could not be opened.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The ledger rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
