//! Shared progress counters: one writer, many readers.

use std::sync::atomic::{AtomicU64, Ordering};

/// Row counters shared between the insert driver and the reporter.
///
/// The driver is the sole writer; the reporter only samples. Reads may be
/// slightly stale but are monotone, so relaxed ordering is enough on both
/// sides.
#[derive(Debug)]
pub struct Progress {
    inserted: AtomicU64,
    total: u64,
}

impl Progress {
    /// Counters for a run inserting `total` rows.
    pub fn new(total: u64) -> Progress {
        Progress {
            inserted: AtomicU64::new(0),
            total,
        }
    }

    /// Record one inserted row.
    pub fn record_insert(&self) {
        self.inserted.fetch_add(1, Ordering::Relaxed);
    }

    /// Rows inserted so far.
    pub fn inserted(&self) -> u64 {
        self.inserted.load(Ordering::Relaxed)
    }

    /// Total rows the run will insert.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Completion percentage.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.inserted() as f64 / self.total as f64 * 100.0
    }
}
