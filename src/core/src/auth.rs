//! Authorization boundary.
//!
//! Proving that a caller controls an account is the job of an external
//! witness service. The ledger only asks it a yes/no question per account,
//! and separately honours calls made from an account's own contract context.

use crate::types::Account;
use std::collections::HashSet;

/// External witness/signature verification service.
pub trait Witness {
    /// Returns true if the current call carries a valid witness for `account`.
    fn check_witness(&self, account: &Account) -> bool;
}

/// How an account's authorization was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    /// The witness service vouched for the account.
    Witnessed,
    /// The call originates from the account's own contract context.
    SelfCall,
    /// Neither applies.
    Denied,
}

impl Authorization {
    /// Whether the account may be acted for.
    pub fn is_granted(&self) -> bool {
        !matches!(self, Authorization::Denied)
    }
}

/// The trusted-caller capability handed to every mutating entry point.
#[derive(Clone, Copy)]
pub struct CallContext<'w> {
    witness: &'w dyn Witness,
    calling_account: Option<Account>,
}

impl<'w> CallContext<'w> {
    /// A call made directly by signers, outside any contract context.
    pub fn new(witness: &'w dyn Witness) -> Self {
        Self {
            witness,
            calling_account: None,
        }
    }

    /// A call made from the contract context of `calling_account`.
    pub fn from_contract(witness: &'w dyn Witness, calling_account: Account) -> Self {
        Self {
            witness,
            calling_account: Some(calling_account),
        }
    }

    /// The account whose contract context is executing, if any.
    pub fn calling_account(&self) -> Option<Account> {
        self.calling_account
    }

    /// Whether the witness service vouches for `account`.
    ///
    /// The null account stands for the supply and can never be witnessed.
    pub fn is_witnessed(&self, account: &Account) -> bool {
        !account.is_null() && self.witness.check_witness(account)
    }

    /// Whether the call runs in `account`'s own contract context.
    /// Never true for the null account.
    pub fn is_self_call(&self, account: &Account) -> bool {
        !account.is_null() && self.calling_account.as_ref() == Some(account)
    }

    /// Decides whether the caller may act for `account`.
    pub fn authorize(&self, account: &Account) -> Authorization {
        if self.is_witnessed(account) {
            Authorization::Witnessed
        } else if self.is_self_call(account) {
            Authorization::SelfCall
        } else {
            Authorization::Denied
        }
    }
}

/// A witness that vouches for a fixed set of signer accounts.
#[derive(Debug, Clone, Default)]
pub struct SignerSet {
    signers: HashSet<Account>,
}

impl SignerSet {
    /// Creates a set from the accounts that signed the call.
    pub fn new<I: IntoIterator<Item = Account>>(signers: I) -> Self {
        Self {
            signers: signers.into_iter().collect(),
        }
    }

    /// Adds a signer.
    pub fn insert(&mut self, account: Account) {
        self.signers.insert(account);
    }
}

impl Witness for SignerSet {
    fn check_witness(&self, account: &Account) -> bool {
        self.signers.contains(account)
    }
}

/// A witness that vouches for nobody.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWitness;

impl Witness for NoWitness {
    fn check_witness(&self, _account: &Account) -> bool {
        false
    }
}
