//! Applies cart sizes to shared display elements in dispatch order.

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
};

use shared::domain::CartAction;
use tracing::debug;

use crate::display::CartDisplay;

/// Dispatch sequence number of one cart request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Requests can complete in any order; only a result newer than the last
/// applied one reaches the counter, so the most recently dispatched
/// successful request is what the page shows.
#[derive(Debug)]
pub struct CounterReconciler {
    next: AtomicU64,
    applied: Mutex<Option<Ticket>>,
}

impl Default for CounterReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterReconciler {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
            applied: Mutex::new(None),
        }
    }

    /// Ticket for a request about to be sent.
    pub fn issue(&self) -> Ticket {
        Ticket(self.next.fetch_add(1, Ordering::Relaxed))
    }

    pub fn latest_applied(&self) -> Option<Ticket> {
        *self
            .applied
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Writes `cart_length` to the counter (and the notification badge for
    /// adds) unless a newer ticket was already applied. Returns whether the
    /// display changed.
    pub fn apply(
        &self,
        display: &dyn CartDisplay,
        action: CartAction,
        ticket: Ticket,
        cart_length: i64,
    ) -> bool {
        let mut applied = self
            .applied
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if applied.is_some_and(|latest| latest >= ticket) {
            debug!(%ticket, %action, cart_length, "cart: stale result ignored");
            return false;
        }
        *applied = Some(ticket);

        let text = cart_length.to_string();
        if action == CartAction::Add {
            display.set_notification_badge(&text);
        }
        display.set_cart_counter(&text);
        true
    }
}
