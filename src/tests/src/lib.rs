//! Integration tests for the FLM token ledger.

pub mod config_tests;
pub mod hook_tests;
pub mod invariant_tests;
pub mod persistence_tests;
pub mod scenario_tests;
