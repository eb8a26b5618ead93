//! Single-flight guard for reconnect cycles.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Ensures at most one reconnect cycle runs at a time.
///
/// Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct ReconnectGate {
    busy: Arc<AtomicBool>,
}

impl ReconnectGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a cycle, or returns `None` if one is already running.
    ///
    /// The cycle ends when the returned guard is dropped.
    pub fn try_begin(&self) -> Option<ReconnectCycle> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ReconnectCycle {
                busy: Arc::clone(&self.busy),
            })
    }

    /// Returns `true` while a cycle is running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Proof that the caller owns the running reconnect cycle.
#[derive(Debug)]
#[must_use = "the reconnect cycle ends as soon as this guard is dropped"]
pub struct ReconnectCycle {
    busy: Arc<AtomicBool>,
}

impl Drop for ReconnectCycle {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
