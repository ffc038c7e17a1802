//! Commands for the ledger CLI.

pub mod admin;
pub mod approve;
pub mod query;
pub mod transfer;

use crate::config::LedgerConfig;
use crate::errors::CliError;
use flm_core::{Ledger, LedgerEvent, NoContracts, RecordingSink, RocksStore};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// The ledger as driven from the command line: no contract recipients, and
/// events collected so they can be printed once the command commits.
pub type CliLedger<S = RocksStore> = Ledger<S, NoContracts, RecordingSink>;

/// Opens the RocksDB ledger named by `config`.
pub fn open_ledger(config: &LedgerConfig) -> Result<CliLedger, CliError> {
    let dir = config.resolve_data_dir()?;
    std::fs::create_dir_all(&dir).map_err(|source| CliError::ConfigIo {
        path: dir.clone(),
        source,
    })?;
    info!("Opening ledger at {}", dir.display());

    let store = RocksStore::open(&dir)?;
    Ok(Ledger::new(store, NoContracts, RecordingSink::new()).with_fallback_owner(config.default_owner))
}

/// A committed operation together with the events it announced.
#[derive(Debug, Serialize)]
pub struct Committed<T> {
    /// What the operation returned
    pub result: T,
    /// Events delivered after the commit, in order
    pub events: Vec<LedgerEvent>,
}

impl<T> Committed<T> {
    /// Pairs `result` with whatever the ledger announced since the last drain.
    pub(crate) fn drain<S>(ledger: &CliLedger<S>, result: T) -> Self
    where
        S: flm_core::Store,
    {
        Self {
            result,
            events: ledger.events().take(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Committed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.result)?;
        for event in &self.events {
            write!(f, "\n  {}", event)?;
        }
        Ok(())
    }
}

/// Opaque transfer data given on the command line as hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(pub Vec<u8>);

impl FromStr for Payload {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        Ok(Payload(hex::decode(digits)?))
    }
}
