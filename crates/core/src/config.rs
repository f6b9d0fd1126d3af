//! Run configuration for the insert benchmark.

use std::path::PathBuf;

/// Parameters of a single benchmark run.
///
/// Built by the CLI layer after validation; everything here is already known
/// to be in range (counts are positive, the map size fits in memory terms).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory holding the engine's on-disk environment.
    pub path: PathBuf,
    /// Maximum size of the environment's memory map, in bytes.
    pub map_size: usize,
    /// Number of synthetic users.
    pub num_users: u32,
    /// Rows inserted per user.
    pub rows_per_user: u32,
    /// Rows written per transaction before committing.
    pub rows_per_commit: u32,
    /// Seconds between forced durability syncs; 0 disables the sync loop.
    pub sync_interval_secs: u64,
    /// Seed for the workload permutation pools.
    pub seed: u64,
}

impl RunConfig {
    /// Total number of rows this run will insert.
    pub fn total_rows(&self) -> u64 {
        u64::from(self.num_users) * u64::from(self.rows_per_user)
    }

    /// Whether the periodic sync loop should run.
    pub fn sync_enabled(&self) -> bool {
        self.sync_interval_secs > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RunConfig {
        RunConfig {
            path: PathBuf::from("/tmp/db"),
            map_size: 1 << 30,
            num_users: 1000,
            rows_per_user: 500,
            rows_per_commit: 100,
            sync_interval_secs: 0,
            seed: 1,
        }
    }

    #[test]
    fn test_total_rows() {
        assert_eq!(config().total_rows(), 500_000);
    }

    #[test]
    fn test_total_rows_does_not_overflow_u32() {
        let mut c = config();
        c.num_users = u32::MAX;
        c.rows_per_user = 2;
        assert_eq!(c.total_rows(), u64::from(u32::MAX) * 2);
    }

    #[test]
    fn test_sync_enabled() {
        let mut c = config();
        assert!(!c.sync_enabled());
        c.sync_interval_secs = 5;
        assert!(c.sync_enabled());
    }
}
