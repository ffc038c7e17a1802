//! Read-only ledger queries.

use super::CliLedger;
use crate::errors::CliError;
use flm_core::{Account, Amount, Store};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// An account's balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceReport {
    pub account: Account,
    pub balance: Amount,
}

impl fmt::Display for BalanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.account, self.balance)
    }
}

/// What a spender may still withdraw from an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllowanceReport {
    pub owner: Account,
    pub spender: Account,
    pub allowance: Amount,
}

impl fmt::Display for AllowanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.owner, self.spender, self.allowance)
    }
}

/// Supply, owner and authors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerInfo {
    pub total_supply: Amount,
    pub owner: Account,
    pub authors: Vec<Account>,
}

impl fmt::Display for LedgerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "supply {}, owner {}", self.total_supply, self.owner)?;
        for author in &self.authors {
            write!(f, "\n  author {}", author)?;
        }
        Ok(())
    }
}

/// A list of reports, one per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Listing<T>(pub Vec<T>);

impl<T: fmt::Display> fmt::Display for Listing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.0 {
            write!(f, "\n  {}", item)?;
        }
        Ok(())
    }
}

/// Runs the balance command.
pub fn balance<S: Store>(ledger: &CliLedger<S>, account: Account) -> Result<BalanceReport, CliError> {
    let balance = ledger.balance_of(&account)?;
    debug!("Balance of {}: {}", account, balance);
    Ok(BalanceReport { account, balance })
}

/// Runs the supply command.
pub fn supply<S: Store>(ledger: &CliLedger<S>) -> Result<Amount, CliError> {
    Ok(ledger.total_supply()?)
}

/// Runs the allowance command.
pub fn allowance<S: Store>(
    ledger: &CliLedger<S>,
    owner: Account,
    spender: Account,
) -> Result<AllowanceReport, CliError> {
    Ok(AllowanceReport {
        owner,
        spender,
        allowance: ledger.allowance(&owner, &spender)?,
    })
}

/// Runs the holders command.
pub fn holders<S: Store>(ledger: &CliLedger<S>) -> Result<Listing<BalanceReport>, CliError> {
    let holders = ledger
        .holders()?
        .into_iter()
        .map(|(account, balance)| BalanceReport { account, balance })
        .collect();
    Ok(Listing(holders))
}

/// Runs the info command.
pub fn info<S: Store>(ledger: &CliLedger<S>) -> Result<LedgerInfo, CliError> {
    Ok(LedgerInfo {
        total_supply: ledger.total_supply()?,
        owner: ledger.owner()?,
        authors: ledger.authors()?,
    })
}
