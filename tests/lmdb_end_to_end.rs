//! Full run against a real LMDB environment in a temporary directory.

use std::sync::Arc;

use loadgen::insert::InsertEngine;
use loadgen_core::RunConfig;
use loadgen_engine::{LmdbEngine, LmdbOptions, StorageEngine};

#[test]
fn full_run_against_lmdb() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
        path: dir.path().to_path_buf(),
        map_size: 64 << 20,
        num_users: 10,
        rows_per_user: 20,
        rows_per_commit: 7,
        sync_interval_secs: 0,
        seed: 7,
    };

    let engine = Arc::new(
        LmdbEngine::open(
            &config.path,
            &LmdbOptions {
                map_size: config.map_size,
                no_sync: config.sync_enabled(),
            },
        )
        .unwrap(),
    );

    let outcome = InsertEngine::new(Arc::clone(&engine), config).run().unwrap();
    assert_eq!(outcome.rows, 200);

    let stat = engine.stat().unwrap();
    assert_eq!(stat.entries, 200);
    assert!(stat.depth >= 1);
    assert!(engine.size_on_disk().unwrap() > 0);
}
