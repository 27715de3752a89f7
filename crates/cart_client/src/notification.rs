//! Sticky notification with a cancellable auto-hide timer.

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard,
    },
    time::Duration,
};

use tokio::task::AbortHandle;
use tracing::debug;

use crate::display::CartDisplay;

pub const DEFAULT_NOTIFICATION_HIDE_AFTER: Duration = Duration::from_millis(2400);

struct PendingHide {
    id: u64,
    task: AbortHandle,
}

type PendingSlot = Arc<Mutex<Option<PendingHide>>>;

fn lock(slot: &Mutex<Option<PendingHide>>) -> MutexGuard<'_, Option<PendingHide>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Shows the banner and hides it again after a fixed delay.
///
/// Only the most recent show owns the pending hide: showing again aborts the
/// previous timer, so an older notification can never hide a newer one.
pub struct StickyNotification {
    display: Arc<dyn CartDisplay>,
    hide_after: Duration,
    next_id: AtomicU64,
    pending: PendingSlot,
}

impl StickyNotification {
    pub fn new(display: Arc<dyn CartDisplay>, hide_after: Duration) -> Self {
        Self {
            display,
            hide_after,
            next_id: AtomicU64::new(1),
            pending: Arc::new(Mutex::new(None)),
        }
    }

    pub fn hide_after(&self) -> Duration {
        self.hide_after
    }

    /// Must be called from within a tokio runtime.
    pub fn show(&self) -> NotificationHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut guard = lock(&self.pending);
        if let Some(previous) = guard.take() {
            previous.task.abort();
            debug!(previous = previous.id, id, "cart: notification timer superseded");
        }
        self.display.show_notification();

        let display = Arc::clone(&self.display);
        let pending = Arc::clone(&self.pending);
        let hide_after = self.hide_after;
        let task = tokio::spawn(async move {
            tokio::time::sleep(hide_after).await;
            let mut guard = lock(&pending);
            if guard.as_ref().is_some_and(|p| p.id == id) {
                guard.take();
                display.hide_notification();
            }
        });
        *guard = Some(PendingHide {
            id,
            task: task.abort_handle(),
        });

        NotificationHandle {
            id,
            display: Arc::clone(&self.display),
            pending: Arc::clone(&self.pending),
        }
    }

    /// Whether a hide is still scheduled.
    pub fn is_pending(&self) -> bool {
        lock(&self.pending).is_some()
    }
}

/// One shown notification.
pub struct NotificationHandle {
    id: u64,
    display: Arc<dyn CartDisplay>,
    pending: PendingSlot,
}

impl fmt::Debug for NotificationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl NotificationHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Cancels this notification's pending hide, leaving the banner as it is.
    /// Returns false if the hide already ran or a newer show took over.
    pub fn cancel(&self) -> bool {
        let mut guard = lock(&self.pending);
        abort_if_current(&mut guard, self.id)
    }

    /// Hides the banner now if this notification is still the current one.
    pub fn dismiss(&self) -> bool {
        let mut guard = lock(&self.pending);
        let current = abort_if_current(&mut guard, self.id);
        if current {
            self.display.hide_notification();
        }
        current
    }
}

fn abort_if_current(slot: &mut Option<PendingHide>, id: u64) -> bool {
    match slot {
        Some(pending) if pending.id == id => {
            pending.task.abort();
            *slot = None;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
#[path = "tests/notification_tests.rs"]
mod tests;
