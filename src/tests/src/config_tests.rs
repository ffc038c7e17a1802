//! Configuration layering: file, environment, then command line.

use flm_cli::config::{DATA_DIR_ENV, OWNER_ENV};
use flm_cli::{CliError, LedgerConfig};
use flm_core::{Account, DEFAULT_OWNER};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::tempdir;

fn clear_env() {
    env::remove_var(DATA_DIR_ENV);
    env::remove_var(OWNER_ENV);
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("flm.json");
    LedgerConfig {
        data_dir: Some(PathBuf::from("/from/file")),
        ..LedgerConfig::default()
    }
    .to_file(&path)
    .unwrap();

    env::set_var(DATA_DIR_ENV, "/from/env");
    env::set_var(OWNER_ENV, format!("0x{}", "ab".repeat(20)));

    let mut config = LedgerConfig::from_file(&path).unwrap();
    config.apply_env().unwrap();
    clear_env();

    assert_eq!(config.resolve_data_dir().unwrap(), PathBuf::from("/from/env"));
    assert_eq!(config.default_owner, Account::new([0xab; 20]));
}

#[test]
#[serial]
fn test_unset_env_keeps_defaults() {
    clear_env();
    let mut config = LedgerConfig::default();
    config.apply_env().unwrap();
    assert_eq!(config, LedgerConfig::default());
    assert_eq!(config.default_owner, DEFAULT_OWNER);
}

#[test]
#[serial]
fn test_malformed_owner_env_is_rejected() {
    clear_env();
    env::set_var(OWNER_ENV, "0x1234");
    let result = LedgerConfig::default().apply_env();
    clear_env();

    assert!(matches!(result, Err(CliError::InvalidEnv { var: OWNER_ENV, .. })));
}
