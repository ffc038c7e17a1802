//! Randomized operation sequences checked against a plain model of the ledger.

use flm_core::{
    Account, Amount, CallContext, Delta, Ledger, LedgerError, MemoryStore, NoContracts, RecordingSink, SignerSet,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

const OWNER: Account = Account::new([0xee; 20]);

/// Expected balances and allowances, tracked independently of storage.
#[derive(Default)]
struct Model {
    balances: BTreeMap<Account, u64>,
    allowances: BTreeMap<(Account, Account), u64>,
    supply: u64,
}

impl Model {
    fn balance(&self, account: &Account) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Account, spender: &Account) -> u64 {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    fn credit(&mut self, account: Account, value: u64) {
        if account.is_null() {
            self.supply -= value;
        } else {
            *self.balances.entry(account).or_insert(0) += value;
        }
    }

    fn debit(&mut self, account: Account, value: u64) -> bool {
        if account.is_null() {
            self.supply += value;
            return true;
        }
        let held = self.balance(&account);
        if held < value {
            return false;
        }
        self.balances.insert(account, held - value);
        true
    }
}

fn accounts() -> Vec<Account> {
    let mut accounts: Vec<Account> = (1..=4u8).map(|b| Account::new([b; 20])).collect();
    accounts.push(Account::NULL);
    accounts
}

fn check(ledger: &Ledger<MemoryStore, NoContracts, RecordingSink>, model: &Model) {
    let holders = ledger.holders().unwrap();
    let sum = holders.iter().fold(Amount::zero(), |acc, (_, balance)| acc + *balance);
    assert_eq!(ledger.total_supply().unwrap(), sum, "supply must equal the sum of balances");
    assert_eq!(ledger.total_supply().unwrap(), Amount::from(model.supply));
    assert!(holders.iter().all(|(_, balance)| !balance.is_zero()), "zero balances are never stored");

    for account in accounts() {
        if account.is_null() {
            continue;
        }
        assert_eq!(ledger.balance_of(&account).unwrap(), Amount::from(model.balance(&account)));
        for spender in accounts() {
            if spender != account {
                assert_eq!(
                    ledger.allowance(&account, &spender).unwrap(),
                    Amount::from(model.allowance(&account, &spender))
                );
            }
        }
    }
}

#[test]
fn test_random_operations_preserve_invariants() {
    let mut rng = StdRng::seed_from_u64(0x464c4d);
    let mut ledger = Ledger::new(MemoryStore::new(), NoContracts, RecordingSink::new()).with_fallback_owner(OWNER);
    let mut model = Model::default();
    let pool = accounts();

    // Every real account signs; the null account cannot be witnessed anyway
    let mut everyone: Vec<Account> = pool.iter().copied().filter(|a| !a.is_null()).collect();
    everyone.push(OWNER);
    let signers = SignerSet::new(everyone);
    let ctx = CallContext::new(&signers);

    for _ in 0..500 {
        let from = pool[rng.gen_range(0..pool.len())];
        let to = pool[rng.gen_range(0..pool.len())];
        let spender = pool[rng.gen_range(0..pool.len() - 1)];
        let value: u64 = rng.gen_range(0..60);

        match rng.gen_range(0..4) {
            0 => {
                let to = if to.is_null() { pool[0] } else { to };
                ledger.mint(&ctx, OWNER, to, Amount::from(value)).unwrap();
                model.supply += value;
                model.credit(to, value);
            }
            1 if from.is_null() => {
                let result = ledger.transfer(&ctx, from, to, Amount::from(value), None);
                assert!(matches!(result, Err(LedgerError::Unauthorized { .. })));
            }
            1 => {
                let expected = model.balance(&from) >= value;
                let result = ledger.transfer(&ctx, from, to, Amount::from(value), None);
                assert_eq!(result.is_ok(), expected, "transfer {} -> {} of {}", from, to, value);
                if expected && model.debit(from, value) {
                    model.credit(to, value);
                }
            }
            2 if !from.is_null() => {
                let delta = if rng.gen_bool(0.5) {
                    Delta::Increase(Amount::from(value))
                } else {
                    Delta::Decrease(Amount::from(value))
                };
                let current = model.allowance(&from, &spender);
                let result = ledger.approve(&ctx, from, spender, delta);
                if from == spender {
                    assert!(result.is_ok());
                    continue;
                }
                match delta {
                    Delta::Increase(_) => {
                        result.unwrap();
                        model.allowances.insert((from, spender), current + value);
                    }
                    Delta::Decrease(_) if current >= value => {
                        result.unwrap();
                        model.allowances.insert((from, spender), current - value);
                    }
                    Delta::Decrease(_) => {
                        assert!(matches!(result, Err(LedgerError::InsufficientAllowance { .. })));
                    }
                }
            }
            3 if !from.is_null() && spender != from => {
                let allowed = model.allowance(&from, &spender) >= value;
                let funded = model.balance(&from) >= value;
                let result = ledger.transfer_from(&ctx, spender, from, to, Amount::from(value), None);
                assert_eq!(result.is_ok(), allowed && funded);
                if allowed && funded {
                    let remaining = model.allowance(&from, &spender) - value;
                    model.allowances.insert((from, spender), remaining);
                    model.debit(from, value);
                    model.credit(to, value);
                }
            }
            _ => {}
        }

        check(&ledger, &model);
    }
}

#[test]
fn test_approve_round_trip_for_random_deltas() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut ledger = Ledger::new(MemoryStore::new(), NoContracts, RecordingSink::new());
    let (owner, spender) = (Account::new([1; 20]), Account::new([2; 20]));
    let signers = SignerSet::new([owner]);
    let ctx = CallContext::new(&signers);

    ledger.approve(&ctx, owner, spender, Delta::Increase(Amount::from(17u64))).unwrap();
    for _ in 0..50 {
        let d = Amount::from(rng.gen::<u64>());
        ledger.approve(&ctx, owner, spender, Delta::Increase(d)).unwrap();
        ledger.approve(&ctx, owner, spender, Delta::Decrease(d)).unwrap();
        assert_eq!(ledger.allowance(&owner, &spender).unwrap(), Amount::from(17u64));
    }
}
