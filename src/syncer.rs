//! Optional background loop forcing periodic durability syncs.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use loadgen_core::{Clock, Error, Interval, Result};
use loadgen_engine::StorageEngine;
use tracing::{debug, error};

use crate::signal::{ShutdownSignal, WaitOutcome};

/// Periodic forced-sync driver for the engine under test.
///
/// Decouples durability flushes from per-transaction commit: with the
/// environment opened in relaxed-durability mode, this loop is what bounds
/// the window of unflushed data.
pub struct Syncer<E> {
    engine: Arc<E>,
    signal: ShutdownSignal,
    clock: Clock,
    interval: Interval,
}

impl<E> Syncer<E>
where
    E: StorageEngine + Send + Sync + 'static,
{
    /// A syncer flushing `engine` every `interval`.
    pub fn new(
        engine: Arc<E>,
        interval: Duration,
        signal: ShutdownSignal,
        clock: Clock,
    ) -> Syncer<E> {
        Syncer {
            engine,
            signal,
            clock,
            interval: Interval::from(interval),
        }
    }

    /// Spawn the syncer on its own named thread.
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("loadgen-sync".to_string())
            .spawn(move || self.run())
            .map_err(|e| Error::thread(format!("spawn syncer: {e}")))
    }

    fn run(self) {
        debug!(
            target: "loadgen::sync",
            interval_secs = self.interval.as_secs_f64(),
            "sync loop started"
        );
        // The cadence is anchored to the loop start and advanced by exactly
        // one interval per sync, so the schedule does not drift under load.
        let mut deadline = self.clock.now() + self.interval;
        loop {
            if self.signal.wait_deadline(&self.clock, deadline) == WaitOutcome::Cancelled {
                // No trailing sync: the final commit already happened and
                // the environment is flushed on close.
                break;
            }
            if let Err(err) = self.engine.sync(true) {
                // Engine failures are fatal to the whole run.
                error!(target: "loadgen::sync", error = %err, "forced sync failed");
                std::process::abort();
            }
            deadline = deadline + self.interval;
        }
        debug!(target: "loadgen::sync", "sync loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadgen_engine::testing::MemoryEngine;
    use std::time::Instant;

    #[test]
    fn test_syncs_on_cadence_until_cancelled() {
        let engine = Arc::new(MemoryEngine::new());
        let signal = ShutdownSignal::new();
        let clock = Clock::start();

        let handle = Syncer::new(
            Arc::clone(&engine),
            Duration::from_millis(10),
            signal.clone(),
            clock,
        )
        .spawn()
        .unwrap();

        thread::sleep(Duration::from_millis(100));
        signal.signal();
        handle.join().unwrap();

        assert!(engine.counts().syncs >= 1);
    }

    #[test]
    fn test_no_sync_when_cancelled_before_first_deadline() {
        let engine = Arc::new(MemoryEngine::new());
        let signal = ShutdownSignal::new();
        let clock = Clock::start();

        let handle = Syncer::new(
            Arc::clone(&engine),
            Duration::from_secs(60),
            signal.clone(),
            clock,
        )
        .spawn()
        .unwrap();

        let start = Instant::now();
        signal.signal();
        handle.join().unwrap();

        assert_eq!(engine.counts().syncs, 0);
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
