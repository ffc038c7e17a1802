//! Core types for the FLM ledger.

use crate::errors::LedgerError;
use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length in bytes of an account identifier.
pub const ACCOUNT_LEN: usize = 20;

/// Token quantity. Stored balances, allowances and supply never go negative.
pub type Amount = U256;

/// A 20-byte account identifier.
///
/// The all-zero value is the null account: it never holds a balance and
/// stands for "the supply" on the source side of a mint and the destination
/// side of a burn.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Account([u8; ACCOUNT_LEN]);

impl Account {
    /// The null account used as the mint/burn sentinel.
    pub const NULL: Account = Account([0u8; ACCOUNT_LEN]);

    /// Creates an account from its raw bytes.
    pub const fn new(bytes: [u8; ACCOUNT_LEN]) -> Self {
        Self(bytes)
    }

    /// Parses an account from a byte slice, rejecting any other length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LedgerError> {
        let raw: [u8; ACCOUNT_LEN] = bytes.try_into().map_err(|_| {
            LedgerError::InvalidAccount(format!(
                "expected {} bytes, got {}",
                ACCOUNT_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(raw))
    }

    /// Returns true for the null account.
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    /// Returns the raw bytes of the account.
    pub fn as_bytes(&self) -> &[u8; ACCOUNT_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for Account {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ACCOUNT_LEN]> for Account {
    fn from(bytes: [u8; ACCOUNT_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account({})", self)
    }
}

impl FromStr for Account {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| LedgerError::InvalidAccount(format!("{}: {}", s, e)))?;
        Self::from_slice(&bytes)
    }
}

impl Serialize for Account {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Account {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses a non-negative decimal amount.
pub fn parse_amount(s: &str) -> Result<Amount, LedgerError> {
    Amount::from_dec_str(s.trim())
        .map_err(|e| LedgerError::InvalidAmount(format!("{}: {:?}", s, e)))
}

/// Encodes an amount as minimal big-endian bytes. Zero encodes as empty.
pub fn encode_amount(amount: &Amount) -> Vec<u8> {
    let mut buf = [0u8; 32];
    amount.to_big_endian(&mut buf);
    let first = buf.iter().position(|b| *b != 0).unwrap_or(buf.len());
    buf[first..].to_vec()
}

/// Decodes an amount written by [`encode_amount`].
pub fn decode_amount(bytes: &[u8]) -> Option<Amount> {
    if bytes.len() > 32 {
        return None;
    }
    Some(Amount::from_big_endian(bytes))
}

/// A signed adjustment to an allowance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delta {
    /// Grant the spender more.
    Increase(Amount),
    /// Take back part of what was granted.
    Decrease(Amount),
}

impl Delta {
    /// The zero adjustment.
    pub const ZERO: Delta = Delta::Increase(U256([0; 4]));

    /// The unsigned size of the adjustment.
    pub fn magnitude(&self) -> Amount {
        match self {
            Delta::Increase(amount) | Delta::Decrease(amount) => *amount,
        }
    }

    /// Returns true if the adjustment is zero in either direction.
    pub fn is_zero(&self) -> bool {
        self.magnitude().is_zero()
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delta::Increase(amount) => write!(f, "{}", amount),
            Delta::Decrease(amount) => write!(f, "-{}", amount),
        }
    }
}

impl FromStr for Delta {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_prefix('-') {
            Some(rest) => Ok(Delta::Decrease(parse_amount(rest)?)),
            None => Ok(Delta::Increase(parse_amount(s.strip_prefix('+').unwrap_or(s))?)),
        }
    }
}
