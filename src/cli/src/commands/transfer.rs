//! Commands that move funds: transfer, transfer-from, mint and burn.

use super::{CliLedger, Committed, Payload};
use crate::errors::CliError;
use flm_core::{Account, Amount, CallContext, Store, TransferReceipt};
use tracing::info;

/// Runs the transfer command.
pub fn transfer<S: Store>(
    ledger: &mut CliLedger<S>,
    ctx: &CallContext<'_>,
    from: Account,
    to: Account,
    amount: Amount,
    data: Option<&Payload>,
) -> Result<Committed<TransferReceipt>, CliError> {
    info!("Transferring {} from {} to {}", amount, from, to);
    let receipt = ledger.transfer(ctx, from, to, amount, data.map(|p| p.0.as_slice()))?;
    Ok(Committed::drain(ledger, receipt))
}

/// Runs the transfer-from command.
pub fn transfer_from<S: Store>(
    ledger: &mut CliLedger<S>,
    ctx: &CallContext<'_>,
    spender: Account,
    from: Account,
    to: Account,
    amount: Amount,
    data: Option<&Payload>,
) -> Result<Committed<TransferReceipt>, CliError> {
    info!("{} spending {} of {}'s allowance to {}", spender, amount, from, to);
    let receipt = ledger.transfer_from(ctx, spender, from, to, amount, data.map(|p| p.0.as_slice()))?;
    Ok(Committed::drain(ledger, receipt))
}

/// Runs the mint command.
pub fn mint<S: Store>(
    ledger: &mut CliLedger<S>,
    ctx: &CallContext<'_>,
    minter: Account,
    to: Account,
    amount: Amount,
) -> Result<Committed<TransferReceipt>, CliError> {
    info!("Minting {} to {}", amount, to);
    let receipt = ledger.mint(ctx, minter, to, amount)?;
    Ok(Committed::drain(ledger, receipt))
}

/// Runs the burn command.
pub fn burn<S: Store>(
    ledger: &mut CliLedger<S>,
    ctx: &CallContext<'_>,
    from: Account,
    amount: Amount,
) -> Result<Committed<TransferReceipt>, CliError> {
    info!("Burning {} from {}", amount, from);
    let receipt = ledger.burn(ctx, from, amount)?;
    Ok(Committed::drain(ledger, receipt))
}
