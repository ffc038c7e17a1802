//! Configuration for the ledger CLI.

use crate::errors::CliError;
use flm_core::{Account, DEFAULT_OWNER};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding [`LedgerConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "FLM_DATA_DIR";

/// Environment variable overriding [`LedgerConfig::default_owner`].
pub const OWNER_ENV: &str = "FLM_DEFAULT_OWNER";

/// Configuration for the ledger CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Directory holding the RocksDB ledger; platform data dir when unset
    pub data_dir: Option<PathBuf>,
    /// Owner reported until one is stored
    pub default_owner: Account,
    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_owner: DEFAULT_OWNER,
            log_filter: "info".to_string(),
        }
    }
}

impl LedgerConfig {
    /// Loads configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Saves configuration to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|source| CliError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `FLM_DATA_DIR` and `FLM_DEFAULT_OWNER` when they are set.
    pub fn apply_env(&mut self) -> Result<(), CliError> {
        if let Some(dir) = env::var_os(DATA_DIR_ENV) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Ok(owner) = env::var(OWNER_ENV) {
            self.default_owner = owner.parse().map_err(|e: flm_core::LedgerError| CliError::InvalidEnv {
                var: OWNER_ENV,
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// The directory the ledger lives in.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, CliError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let mut dir = dirs::data_dir().ok_or(CliError::NoDataDir)?;
                dir.push("flm");
                dir.push("ledger");
                Ok(dir)
            }
        }
    }
}
