//! End-to-end walk through mint, approve, delegated transfer and burn.

use flm_core::{
    Account, Amount, CallContext, Delta, Ledger, LedgerError, LedgerEvent, MemoryStore, NoContracts,
    ReadStore, RecordingSink, SignerSet,
};

fn account(byte: u8) -> Account {
    Account::new([byte; 20])
}

fn amount(value: u64) -> Amount {
    Amount::from(value)
}

/// Mints 100 to A, lets B spend part of it on C, then burns the rest.
#[test]
fn test_allowance_scenario() {
    let owner = account(0xee);
    let (a, b, c) = (account(0xa1), account(0xb2), account(0xc3));
    let mut ledger = Ledger::new(MemoryStore::new(), NoContracts, RecordingSink::new()).with_fallback_owner(owner);

    let owner_signs = SignerSet::new([owner]);
    let a_signs = SignerSet::new([a]);
    let b_signs = SignerSet::new([b]);

    // Mint 100 to A
    ledger
        .mint(&CallContext::new(&owner_signs), owner, a, amount(100))
        .unwrap();
    assert_eq!(ledger.balance_of(&a).unwrap(), amount(100));
    assert_eq!(ledger.total_supply().unwrap(), amount(100));

    // A approves B for 40
    assert!(ledger
        .approve(&CallContext::new(&a_signs), a, b, Delta::Increase(amount(40)))
        .unwrap());
    assert_eq!(ledger.allowance(&a, &b).unwrap(), amount(40));

    // B moves 25 of A's funds to C
    ledger
        .transfer_from(&CallContext::new(&b_signs), b, a, c, amount(25), None)
        .unwrap();
    assert_eq!(ledger.balance_of(&a).unwrap(), amount(75));
    assert_eq!(ledger.balance_of(&c).unwrap(), amount(25));
    assert_eq!(ledger.allowance(&a, &b).unwrap(), amount(15));

    // A second withdrawal of 20 exceeds the remaining allowance
    let before = ledger.store().scan_prefix(&[]).unwrap();
    let err = ledger
        .transfer_from(&CallContext::new(&b_signs), b, a, c, amount(20), None)
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientAllowance { .. }));
    assert_eq!(ledger.store().scan_prefix(&[]).unwrap(), before);

    // A burns what is left
    ledger
        .transfer(&CallContext::new(&a_signs), a, Account::NULL, amount(75), None)
        .unwrap();
    assert_eq!(ledger.balance_of(&a).unwrap(), Amount::zero());
    assert_eq!(ledger.total_supply().unwrap(), amount(25));
    assert_eq!(ledger.holders().unwrap(), vec![(c, amount(25))]);

    let events = ledger.events().take();
    assert_eq!(
        events,
        vec![
            LedgerEvent::Transfer { from: Account::NULL, to: a, amount: amount(100) },
            LedgerEvent::Approval { owner: a, spender: b, delta: Delta::Increase(amount(40)) },
            LedgerEvent::Transfer { from: a, to: c, amount: amount(25) },
            LedgerEvent::Transfer { from: a, to: Account::NULL, amount: amount(75) },
        ]
    );
}

#[test]
fn test_zero_operations_change_nothing() {
    let owner = account(0xee);
    let (a, b) = (account(1), account(2));
    let mut ledger = Ledger::new(MemoryStore::new(), NoContracts, RecordingSink::new()).with_fallback_owner(owner);
    let signers = SignerSet::new([owner, a]);
    let ctx = CallContext::new(&signers);

    ledger.mint(&ctx, owner, a, amount(9)).unwrap();
    ledger.approve(&ctx, a, b, Delta::Increase(amount(3))).unwrap();
    let before = ledger.store().scan_prefix(&[]).unwrap();

    ledger.approve(&ctx, a, b, Delta::ZERO).unwrap();
    ledger.approve(&ctx, a, b, Delta::Decrease(Amount::zero())).unwrap();
    ledger.transfer(&ctx, a, b, Amount::zero(), None).unwrap();

    assert_eq!(ledger.store().scan_prefix(&[]).unwrap(), before);
}

#[test]
fn test_spending_exact_allowance_deletes_record() {
    let owner = account(0xee);
    let (a, b) = (account(1), account(2));
    let mut ledger = Ledger::new(MemoryStore::new(), NoContracts, RecordingSink::new()).with_fallback_owner(owner);
    let signers = SignerSet::new([owner, a, b]);
    let ctx = CallContext::new(&signers);

    ledger.mint(&ctx, owner, a, amount(10)).unwrap();
    ledger.approve(&ctx, a, b, Delta::Increase(amount(10))).unwrap();
    ledger.transfer_from(&ctx, b, a, b, amount(10), None).unwrap();

    assert_eq!(ledger.allowance(&a, &b).unwrap(), Amount::zero());
    assert_eq!(ledger.balance_of(&a).unwrap(), Amount::zero());
    // Only the supply and B's balance remain
    assert_eq!(ledger.store().len(), 2);
}
