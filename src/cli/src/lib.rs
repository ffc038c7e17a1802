//! Operator CLI for the FLM token ledger.

pub mod commands;
pub mod config;
pub mod errors;

// Re-export commonly used types and functions
pub use commands::{open_ledger, CliLedger, Committed, Payload};
pub use config::LedgerConfig;
pub use errors::CliError;
