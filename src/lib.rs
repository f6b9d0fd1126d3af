//! loadgen: a concurrent insert-throughput benchmark harness for LMDB.
//!
//! The harness drives sustained write load through batched transactions
//! while two background loops run alongside the insert driver: a reporter
//! that emits periodic progress lines and an optional syncer that forces
//! durability flushes on a fixed cadence. Insertion order comes from bounded
//! pools of precomputed random permutations, so the key stream is
//! reproducible but never monotonic; a sequential key order would sidestep
//! the tree balancing the benchmark is meant to exercise.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod insert;
pub mod pattern;
pub mod progress;
pub mod record;
pub mod reporter;
pub mod signal;
pub mod syncer;

pub use insert::{InsertEngine, InsertOutcome};
pub use pattern::PatternPool;
pub use progress::Progress;
pub use record::Record;
pub use signal::{ShutdownSignal, WaitOutcome};
