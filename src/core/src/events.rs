//! Ledger notifications for external observers.

use crate::types::{Account, Amount, Delta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::info;

/// An event announced after a ledger operation commits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// Funds moved. `from` is null for a mint, `to` is null for a burn.
    Transfer {
        /// The debited account
        from: Account,
        /// The credited account
        to: Account,
        /// The amount moved
        amount: Amount,
    },

    /// An allowance was adjusted.
    Approval {
        /// The owner of the funds
        owner: Account,
        /// The delegated spender
        spender: Account,
        /// The signed adjustment as requested, not the resulting allowance
        delta: Delta,
    },
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerEvent::Transfer { from, to, amount } => {
                write!(f, "Transfer {{ from: {}, to: {}, amount: {} }}", from, to, amount)
            }
            LedgerEvent::Approval {
                owner,
                spender,
                delta,
            } => {
                write!(
                    f,
                    "Approval {{ owner: {}, spender: {}, delta: {} }}",
                    owner, spender, delta
                )
            }
        }
    }
}

/// Fire-and-forget delivery channel for ledger events.
pub trait EventSink {
    /// Delivers one event.
    fn emit(&self, event: &LedgerEvent);
}

impl<T: EventSink + ?Sized> EventSink for &T {
    fn emit(&self, event: &LedgerEvent) {
        (**self).emit(event)
    }
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn emit(&self, event: &LedgerEvent) {
        (**self).emit(event)
    }
}

/// Writes every event to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &LedgerEvent) {
        info!(target: "flm::events", "{}", event);
    }
}

/// Keeps every event in memory, in delivery order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<LedgerEvent>>,
}

impl RecordingSink {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the events delivered so far.
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Removes and returns the events delivered so far.
    pub fn take(&self) -> Vec<LedgerEvent> {
        std::mem::take(
            &mut *self
                .events
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &LedgerEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}
