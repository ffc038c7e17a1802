//! Approve command for the ledger CLI.

use super::{CliLedger, Committed};
use crate::errors::CliError;
use flm_core::{Account, CallContext, Delta, Store};
use tracing::info;

/// Runs the approve command. The result is the allowance after the change.
pub fn run<S: Store>(
    ledger: &mut CliLedger<S>,
    ctx: &CallContext<'_>,
    owner: Account,
    spender: Account,
    delta: Delta,
) -> Result<Committed<String>, CliError> {
    info!("Adjusting allowance of {} over {} by {}", spender, owner, delta);
    ledger.approve(ctx, owner, spender, delta)?;
    let allowance = ledger.allowance(&owner, &spender)?;
    Ok(Committed::drain(ledger, format!("allowance now {}", allowance)))
}
