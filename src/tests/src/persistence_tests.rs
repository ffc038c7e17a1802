//! Ledger state surviving a RocksDB reopen.

use flm_core::{Account, Amount, CallContext, Delta, Ledger, ReadStore, RocksStore, SignerSet};
use tempfile::tempdir;

fn account(byte: u8) -> Account {
    Account::new([byte; 20])
}

#[test]
fn test_state_survives_reopen() {
    let dir = tempdir().unwrap();
    let owner = account(0xee);
    let (a, b) = (account(1), account(2));
    let signers = SignerSet::new([owner, a]);
    let ctx = CallContext::new(&signers);

    {
        let store = RocksStore::open(dir.path()).unwrap();
        let mut ledger = Ledger::open(store).with_fallback_owner(owner);
        ledger.add_author(&ctx, a).unwrap();
        ledger.mint(&ctx, a, a, Amount::from(500u64)).unwrap();
        ledger.transfer(&ctx, a, b, Amount::from(120u64), None).unwrap();
        ledger.approve(&ctx, a, b, Delta::Increase(Amount::from(30u64))).unwrap();
        ledger.set_owner(&ctx, a).unwrap();
    }

    let store = RocksStore::open(dir.path()).unwrap();
    let ledger = Ledger::open(store);
    assert_eq!(ledger.total_supply().unwrap(), Amount::from(500u64));
    assert_eq!(ledger.balance_of(&a).unwrap(), Amount::from(380u64));
    assert_eq!(ledger.balance_of(&b).unwrap(), Amount::from(120u64));
    assert_eq!(ledger.allowance(&a, &b).unwrap(), Amount::from(30u64));
    assert_eq!(ledger.authors().unwrap(), vec![a]);
    // The stored owner wins over any fallback
    assert_eq!(ledger.owner().unwrap(), a);
}

#[test]
fn test_rejected_operation_leaves_database_untouched() {
    let dir = tempdir().unwrap();
    let owner = account(0xee);
    let a = account(1);
    let signers = SignerSet::new([owner, a]);
    let ctx = CallContext::new(&signers);

    let store = RocksStore::open(dir.path()).unwrap();
    let mut ledger = Ledger::open(store).with_fallback_owner(owner);
    ledger.mint(&ctx, owner, a, Amount::from(10u64)).unwrap();
    let before = ledger.store().scan_prefix(&[]).unwrap();

    assert!(ledger.burn(&ctx, a, Amount::from(11u64)).is_err());
    assert!(ledger.mint(&ctx, a, a, Amount::from(1u64)).is_err());
    assert_eq!(ledger.store().scan_prefix(&[]).unwrap(), before);
}
