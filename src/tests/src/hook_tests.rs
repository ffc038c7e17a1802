//! Contract recipients notified through the ledger.

use flm_core::storage::LedgerStorage;
use flm_core::{
    Account, Amount, CallContext, HookError, HookOutcome, Ledger, LedgerEvent, MemoryStore, PaymentHook,
    ReadStore, RecordingSink, SignerSet, WriteStore,
};
use std::sync::Mutex;

/// Key the accepting contract writes into its own storage on each payment.
const LAST_PAYER_KEY: &[u8] = b"\x09last_payer";

/// A host where a fixed set of accounts are contracts.
struct Contracts {
    accepting: Account,
    refusing: Account,
    // (payer, amount, data, recipient balance read inside the callback)
    seen: Mutex<Vec<(Account, Amount, Option<Vec<u8>>, Amount)>>,
}

impl PaymentHook for Contracts {
    fn is_contract(&self, account: &Account) -> bool {
        *account == self.accepting || *account == self.refusing
    }

    fn on_payment(
        &self,
        ledger: &mut dyn WriteStore,
        to: &Account,
        from: &Account,
        amount: &Amount,
        data: Option<&[u8]>,
    ) -> Result<(), HookError> {
        let balance = LedgerStorage::new(&*ledger)
            .balance(to)
            .map_err(|e| HookError::Failed(e.to_string()))?;
        self.seen
            .lock()
            .unwrap()
            .push((*from, *amount, data.map(<[u8]>::to_vec), balance));
        if *to == self.refusing {
            return Err(HookError::Rejected {
                recipient: *to,
                reason: "closed".to_string(),
            });
        }
        ledger
            .put(LAST_PAYER_KEY, from.as_ref())
            .map_err(|e| HookError::Failed(e.to_string()))
    }
}

fn account(byte: u8) -> Account {
    Account::new([byte; 20])
}

#[test]
fn test_contract_recipients_are_notified_after_funds_land() {
    let owner = account(0xee);
    let a = account(1);
    let hook = Contracts {
        accepting: account(0xc0),
        refusing: account(0xc1),
        seen: Mutex::new(Vec::new()),
    };
    let mut ledger = Ledger::new(MemoryStore::new(), hook, RecordingSink::new()).with_fallback_owner(owner);
    let signers = SignerSet::new([owner, a]);
    let ctx = CallContext::new(&signers);

    let minted = ledger.mint(&ctx, owner, a, Amount::from(100u64)).unwrap();
    assert_eq!(minted.hook, HookOutcome::NotContract);

    let paid = ledger
        .transfer(&ctx, a, account(0xc0), Amount::from(30u64), Some(&b"order-17"[..]))
        .unwrap();
    assert_eq!(paid.hook, HookOutcome::Notified);

    // A refusing contract still keeps the funds
    let refused = ledger
        .transfer(&ctx, a, account(0xc1), Amount::from(20u64), None)
        .unwrap();
    assert!(matches!(refused.hook, HookOutcome::Failed(_)));
    assert_eq!(ledger.balance_of(&account(0xc1)).unwrap(), Amount::from(20u64));
    assert_eq!(ledger.balance_of(&a).unwrap(), Amount::from(50u64));

    let seen = ledger.hook().seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            (a, Amount::from(30u64), Some(b"order-17".to_vec()), Amount::from(30u64)),
            (a, Amount::from(20u64), None, Amount::from(20u64)),
        ]
    );

    // The accepting contract's own write committed with the transfer
    assert_eq!(
        ledger.store().get(LAST_PAYER_KEY).unwrap(),
        Some(a.as_ref().to_vec())
    );

    let events = ledger.events().take();
    assert_eq!(events.len(), 3);
    assert_eq!(
        events[2],
        LedgerEvent::Transfer {
            from: a,
            to: account(0xc1),
            amount: Amount::from(20u64),
        }
    );
}
