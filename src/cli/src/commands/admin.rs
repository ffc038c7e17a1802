//! Owner-only commands: author registration and ownership transfer.

use super::CliLedger;
use crate::errors::CliError;
use flm_core::{Account, CallContext, Store};
use tracing::info;

/// Runs the add-author command.
pub fn add_author<S: Store>(
    ledger: &mut CliLedger<S>,
    ctx: &CallContext<'_>,
    account: Account,
) -> Result<String, CliError> {
    ledger.add_author(ctx, account)?;
    info!("Registered author {}", account);
    Ok(format!("{} is now an author ({} total)", account, ledger.author_count()?))
}

/// Runs the remove-author command.
pub fn remove_author<S: Store>(
    ledger: &mut CliLedger<S>,
    ctx: &CallContext<'_>,
    account: Account,
) -> Result<String, CliError> {
    ledger.remove_author(ctx, account)?;
    info!("Removed author {}", account);
    Ok(format!("{} is no longer an author ({} total)", account, ledger.author_count()?))
}

/// Runs the set-owner command.
pub fn set_owner<S: Store>(
    ledger: &mut CliLedger<S>,
    ctx: &CallContext<'_>,
    account: Account,
) -> Result<String, CliError> {
    let previous = ledger.owner()?;
    ledger.set_owner(ctx, account)?;
    info!("Ownership moved from {} to {}", previous, account);
    Ok(format!("owner {} -> {}", previous, account))
}
