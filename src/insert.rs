//! Insert orchestration: pools, background loops, batched commits, ordered
//! shutdown.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use loadgen_core::{Clock, Error, Interval, Result, RunConfig};
use loadgen_engine::{StorageEngine, WriteTxn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::pattern::PatternPool;
use crate::progress::Progress;
use crate::record::Record;
use crate::reporter::Reporter;
use crate::signal::ShutdownSignal;
use crate::syncer::Syncer;

/// Timing and row totals of a completed run.
#[derive(Debug, Clone, Copy)]
pub struct InsertOutcome {
    /// Wall time of the insert phase on the monotonic clock.
    pub elapsed: Interval,
    /// Rows inserted.
    pub rows: u64,
}

impl InsertOutcome {
    /// Sustained insertion rate in rows per second.
    pub fn rows_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.rows as f64 / secs
        } else {
            0.0
        }
    }
}

/// Drives the batched insert workload against an engine.
pub struct InsertEngine<E> {
    engine: Arc<E>,
    config: RunConfig,
}

impl<E> InsertEngine<E>
where
    E: StorageEngine + Send + Sync + 'static,
{
    /// Harness for one run of `config` against `engine`.
    pub fn new(engine: Arc<E>, config: RunConfig) -> InsertEngine<E> {
        InsertEngine { engine, config }
    }

    /// Execute the run: build the pools, start the loops, insert every row
    /// in batched transactions, then signal shutdown and join the loops.
    ///
    /// The signal is raised strictly after the final commit, so the loops
    /// can never observe 100% progress before the data has reached the
    /// engine's transaction log. On failure the signal is raised too, before
    /// the error propagates, so the joins cannot hang.
    pub fn run(&self) -> Result<InsertOutcome> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let pools =
            PatternPool::generate(self.config.num_users, self.config.rows_per_user, &mut rng);
        debug!(target: "loadgen::insert", seed = self.config.seed, "permutation pools built");

        let progress = Arc::new(Progress::new(self.config.total_rows()));
        let signal = ShutdownSignal::new();
        let clock = Clock::start();

        let syncer = if self.config.sync_enabled() {
            let interval = Duration::from_secs(self.config.sync_interval_secs);
            Some(Syncer::new(Arc::clone(&self.engine), interval, signal.clone(), clock).spawn()?)
        } else {
            None
        };
        let reporter = match Reporter::new(Arc::clone(&progress), signal.clone(), clock).spawn() {
            Ok(handle) => handle,
            Err(err) => {
                // The syncer is already running; shut it down before bailing.
                signal.signal();
                if let Some(handle) = syncer {
                    join(handle, "syncer")?;
                }
                return Err(err);
            }
        };

        let start = clock.now();
        let result = self.drive(&pools, &progress);
        let elapsed = clock.now() - start;

        // Strict shutdown order: raise the signal (on the success and error
        // paths alike), then join unconditionally.
        signal.signal();
        join(reporter, "reporter")?;
        if let Some(handle) = syncer {
            join(handle, "syncer")?;
        }
        result?;

        info!(
            target: "loadgen::insert",
            rows = progress.inserted(),
            secs = elapsed.as_secs_f64(),
            "insert phase complete"
        );
        Ok(InsertOutcome {
            elapsed,
            rows: progress.inserted(),
        })
    }

    /// The put/commit loop: every row once, committed every
    /// `rows_per_commit` rows.
    fn drive(&self, pools: &PatternPool, progress: &Progress) -> Result<()> {
        let rows_per_commit = u64::from(self.config.rows_per_commit);
        let mut txn = self.engine.begin()?;
        let mut txn_rows = 0u64;

        for i in 0..self.config.rows_per_user as usize {
            for j in 0..self.config.num_users as usize {
                let (user_id, txn_id) = pools.select(i, j);
                let record = Record::new(user_id, txn_id);
                txn.put(&record.key(), &record.value())?;
                progress.record_insert();

                txn_rows += 1;
                if txn_rows >= rows_per_commit {
                    txn.commit()?;
                    txn = self.engine.begin()?;
                    txn_rows = 0;
                }
            }
        }

        // Commit the remainder. When the batch size divides the row count
        // the freshly begun transaction is empty and dropping it aborts it.
        if txn_rows > 0 {
            txn.commit()?;
        }
        Ok(())
    }
}

fn join(handle: JoinHandle<()>, name: &str) -> Result<()> {
    handle
        .join()
        .map_err(|_| Error::thread(format!("{name} thread panicked")))
}
