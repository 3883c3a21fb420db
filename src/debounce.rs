//! Debounce Scheduler
//!
//! Coalesces rapid mutations (typed search text) into a single action after a quiet
//! period. Scheduling replaces any pending action; the surviving action runs exactly
//! once, and only while the scheduler is still active.

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

/// Default quiet period for typed search text.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(400);

/// The single pending slot. The ticket and the timer handle change together under
/// one lock, so a timer can never release an action after `cancel` returned.
#[derive(Default)]
struct Slot {
    /// Ticket of the most recently scheduled action; older tickets are superseded
    ticket: u64,
    timer: Option<JoinHandle<()>>,
}

/// Single-slot debounce timer on the tokio runtime
pub struct DebounceScheduler {
    quiet_period: Duration,
    slot: Arc<Mutex<Slot>>,
    /// Cleared on teardown so late timers become no-ops
    active: Arc<AtomicBool>,
}

impl DebounceScheduler {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            slot: Arc::new(Mutex::new(Slot::default())),
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Replace any pending action with `action` and re-arm the timer.
    ///
    /// Must be called from within a tokio runtime. Once the quiet period elapses the
    /// action runs on its own task, so a later `schedule` or `cancel` never interrupts
    /// an action that has already started.
    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if !self.is_active() {
            return;
        }

        let action: BoxFuture<'static, ()> = Box::pin(action);
        let slot = Arc::clone(&self.slot);
        let active = Arc::clone(&self.active);
        let quiet_period = self.quiet_period;

        let mut pending = self.slot.lock();
        pending.ticket += 1;
        let ticket = pending.ticket;
        let timer = tokio::spawn(async move {
            sleep(quiet_period).await;
            release(&slot, &active, ticket, action);
        });
        if let Some(previous) = pending.timer.replace(timer) {
            previous.abort();
        }
    }

    /// Drop the pending action, if any, without running it.
    pub fn cancel(&self) {
        let mut pending = self.slot.lock();
        pending.ticket += 1;
        if let Some(previous) = pending.timer.take() {
            previous.abort();
        }
    }

    /// Whether an action is waiting for its quiet period to elapse.
    pub fn is_pending(&self) -> bool {
        self.slot
            .lock()
            .timer
            .as_ref()
            .map(|timer| !timer.is_finished())
            .unwrap_or(false)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Tear down: cancel the pending action and refuse new ones.
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::SeqCst);
        self.cancel();
    }
}

/// Start `action` if `ticket` is still the latest one and the scheduler is active.
/// The check and the spawn happen under the slot lock.
fn release(slot: &Mutex<Slot>, active: &AtomicBool, ticket: u64, action: BoxFuture<'static, ()>) -> bool {
    let pending = slot.lock();
    if !active.load(Ordering::SeqCst) {
        debug!(ticket, "Debounced action dropped after teardown");
        return false;
    }
    if pending.ticket != ticket {
        return false;
    }
    debug!(ticket, "Debounce quiet period elapsed");
    tokio::spawn(action);
    true
}

impl Default for DebounceScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        if let Some(timer) = self.slot.lock().timer.take() {
            timer.abort();
        }
    }
}
