//! Cooperative shutdown signal for the background loops.
//!
//! Replaces the classic write-to-a-pipe wakeup with a flag guarded by a
//! mutex plus a condvar broadcast. `signal` notifies while holding the lock:
//! a waiter is either already parked in `wait_for` (the notify wakes it) or
//! has not yet re-checked the flag (and will see it set once it acquires the
//! lock). Either way no wakeup is lost, and wake latency is bounded by the
//! wait timeout, not the caller's full interval.

use std::sync::Arc;
use std::time::Duration;

use loadgen_core::{Clock, Interval};
use parking_lot::{Condvar, Mutex};

/// Result of a bounded wait on the signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The timeout elapsed without cancellation.
    TimedOut,
    /// Shutdown was signaled.
    Cancelled,
}

/// Single-writer, multi-reader shutdown signal.
///
/// Created once per run, raised exactly once after the final commit, never
/// reset. Clones share the same underlying signal.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    stopping: Mutex<bool>,
    wake: Condvar,
}

impl ShutdownSignal {
    /// A fresh, un-raised signal.
    pub fn new() -> ShutdownSignal {
        ShutdownSignal::default()
    }

    /// Raise the signal and wake every waiter. Idempotent.
    pub fn signal(&self) {
        let mut stopping = self.inner.stopping.lock();
        *stopping = true;
        self.inner.wake.notify_all();
    }

    /// Whether the signal has been raised.
    pub fn is_raised(&self) -> bool {
        *self.inner.stopping.lock()
    }

    /// Wait up to `timeout` for the signal.
    ///
    /// Returns `Cancelled` without blocking if the signal is already raised.
    /// A spurious wake surfaces as `TimedOut`; callers loop toward a
    /// deadline and recompute the remaining delay, so early returns are
    /// harmless.
    pub fn wait_timeout(&self, timeout: Duration) -> WaitOutcome {
        let mut stopping = self.inner.stopping.lock();
        if *stopping {
            return WaitOutcome::Cancelled;
        }
        let _ = self.inner.wake.wait_for(&mut stopping, timeout);
        if *stopping {
            WaitOutcome::Cancelled
        } else {
            WaitOutcome::TimedOut
        }
    }

    /// Bounded wait toward an absolute `deadline` on `clock`.
    ///
    /// Re-checks the remaining delay after every wake, so neither spurious
    /// wakes nor early timeouts shorten the interval. Returns `TimedOut`
    /// once the deadline has passed, or `Cancelled` as soon as the signal is
    /// observed.
    pub fn wait_deadline(&self, clock: &Clock, deadline: Interval) -> WaitOutcome {
        loop {
            let remaining = deadline - clock.now();
            let Some(timeout) = remaining.to_duration() else {
                return WaitOutcome::TimedOut;
            };
            if self.wait_timeout(timeout) == WaitOutcome::Cancelled {
                return WaitOutcome::Cancelled;
            }
        }
    }
}
