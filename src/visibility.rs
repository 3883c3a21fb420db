//! Visibility Triggers
//!
//! Abstract "the end-of-list marker is in view" signal. The rendering layer owns the
//! sentinel; the controller only needs a callback when it becomes visible. Any source
//! satisfies the contract: an intersection observer bridge, a "next" button press, or
//! a timer-based poll in non-visual targets.

use crate::types::SentinelHandle;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Callback invoked each time the observed sentinel becomes visible
pub type SentinelCallback = Arc<dyn Fn(SentinelHandle) + Send + Sync>;

/// Capability to watch one sentinel at a time
pub trait VisibilityTrigger: Send {
    /// Start observing `sentinel`, replacing any previous observation.
    fn observe(&mut self, sentinel: SentinelHandle, callback: SentinelCallback);

    /// Detach; the callback is not invoked again.
    fn unobserve(&mut self);

    fn is_observing(&self) -> bool;
}

/// Trigger fired explicitly, e.g. by a "load more" button
#[derive(Default)]
pub struct ManualTrigger {
    observed: Option<(SentinelHandle, SentinelCallback)>,
}

impl ManualTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the sentinel as visible. Returns false when nothing is observed.
    pub fn fire(&self) -> bool {
        match &self.observed {
            Some((sentinel, callback)) => {
                callback(*sentinel);
                true
            }
            None => false,
        }
    }
}

impl VisibilityTrigger for ManualTrigger {
    fn observe(&mut self, sentinel: SentinelHandle, callback: SentinelCallback) {
        self.observed = Some((sentinel, callback));
    }

    fn unobserve(&mut self) {
        self.observed = None;
    }

    fn is_observing(&self) -> bool {
        self.observed.is_some()
    }
}

/// Timer-based poll: every `period`, asks `probe` whether the end of the list is near
/// and fires when it is.
pub struct IntervalTrigger {
    period: Duration,
    probe: Arc<dyn Fn() -> bool + Send + Sync>,
    task: Option<JoinHandle<()>>,
}

impl IntervalTrigger {
    pub fn new<P>(period: Duration, probe: P) -> Self
    where
        P: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            period,
            probe: Arc::new(probe),
            task: None,
        }
    }
}

impl VisibilityTrigger for IntervalTrigger {
    /// Must be called from within a tokio runtime.
    fn observe(&mut self, sentinel: SentinelHandle, callback: SentinelCallback) {
        self.unobserve();
        let period = self.period;
        let probe = Arc::clone(&self.probe);
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if probe() {
                    debug!(sentinel = sentinel.id(), "Sentinel reported near");
                    callback(sentinel);
                }
            }
        }));
    }

    fn unobserve(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_observing(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for IntervalTrigger {
    fn drop(&mut self) {
        self.unobserve();
    }
}
