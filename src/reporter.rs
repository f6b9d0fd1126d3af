//! Background loop emitting periodic throughput/progress lines.

use std::io::Write;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use loadgen_core::{Clock, Error, Interval, Result};
use tracing::debug;

use crate::progress::Progress;
use crate::signal::{ShutdownSignal, WaitOutcome};

/// Cadence of progress lines.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Periodic progress reporter.
///
/// Samples the shared row counter at each interval boundary and prints one
/// line per cycle with the delta, elapsed time, rate, and completion
/// percentage. On cancellation it finishes the cycle it is in, emits that
/// cycle's line, and exits without sleeping again.
pub struct Reporter {
    progress: Arc<Progress>,
    signal: ShutdownSignal,
    clock: Clock,
    interval: Interval,
}

impl Reporter {
    /// A reporter sampling `progress` once per [`REPORT_INTERVAL`].
    pub fn new(progress: Arc<Progress>, signal: ShutdownSignal, clock: Clock) -> Reporter {
        Reporter {
            progress,
            signal,
            clock,
            interval: Interval::from(REPORT_INTERVAL),
        }
    }

    /// Spawn the reporter on its own named thread.
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("loadgen-report".to_string())
            .spawn(move || self.run())
            .map_err(|e| Error::thread(format!("spawn reporter: {e}")))
    }

    fn run(self) {
        debug!(target: "loadgen::report", "reporter started");
        loop {
            let start_rows = self.progress.inserted();
            let start = self.clock.now();
            let outcome = self.signal.wait_deadline(&self.clock, start + self.interval);

            let end_rows = self.progress.inserted();
            let elapsed = self.clock.now() - start;
            self.emit(start, start_rows, end_rows, elapsed);

            if outcome == WaitOutcome::Cancelled {
                break;
            }
        }
        // Blank line separates progress output from the final stats block.
        println!();
        debug!(target: "loadgen::report", "reporter stopped");
    }

    fn emit(&self, start: Interval, start_rows: u64, end_rows: u64, elapsed: Interval) {
        let delta = end_rows - start_rows;
        let secs = elapsed.as_secs_f64();
        let rate = if secs > 0.0 { delta as f64 / secs } else { 0.0 };
        println!(
            "[{:5.1}%, {:.3}]: inserted {} rows in {:.3}s; {:.3} rows/sec",
            self.progress.percent(),
            start.as_secs_f64(),
            delta,
            secs,
            rate
        );
        let _ = std::io::stdout().flush();
    }
}
