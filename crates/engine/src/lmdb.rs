//! LMDB adapter via `heed`.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvFlags, EnvOpenOptions, RwTxn};
use loadgen_core::{Error, Result};
use tracing::debug;

use crate::adapter::{EngineStat, StorageEngine, WriteTxn};

/// Options controlling how the LMDB environment is opened.
#[derive(Debug, Clone)]
pub struct LmdbOptions {
    /// Maximum size of the memory map, in bytes.
    pub map_size: usize,
    /// Skip the implicit flush on commit and leave durability to explicit
    /// `sync` calls (`MDB_NOSYNC`). Set when a periodic sync loop owns
    /// durability.
    pub no_sync: bool,
}

/// LMDB environment plus its unnamed database, ready for write traffic.
pub struct LmdbEngine {
    env: Env,
    db: Database<Bytes, Bytes>,
}

impl LmdbEngine {
    /// Open (or create) the environment at `path` and its unnamed database.
    ///
    /// Read-ahead is disabled: the benchmark writes far more than it reads
    /// and the insertion order is non-sequential.
    pub fn open(path: &Path, options: &LmdbOptions) -> Result<LmdbEngine> {
        std::fs::create_dir_all(path)?;

        let mut flags = EnvFlags::NO_READ_AHEAD;
        if options.no_sync {
            flags |= EnvFlags::NO_SYNC;
        }

        // SAFETY: the environment is opened once per process and none of the
        // flags used here enable an aliasing-unsafe mode; heed marks
        // `flags`/`open` unsafe wholesale.
        let env = unsafe {
            let mut builder = EnvOpenOptions::new();
            builder.map_size(options.map_size);
            builder.flags(flags);
            builder.open(path).map_err(Error::engine)?
        };

        let mut wtxn = env.write_txn().map_err(Error::engine)?;
        let db: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, None).map_err(Error::engine)?;
        wtxn.commit().map_err(Error::engine)?;

        debug!(
            target: "loadgen::engine",
            path = %path.display(),
            map_size = options.map_size,
            no_sync = options.no_sync,
            "opened LMDB environment"
        );
        Ok(LmdbEngine { env, db })
    }
}

/// A write transaction on the LMDB environment.
pub struct LmdbTxn<'e> {
    txn: RwTxn<'e>,
    db: Database<Bytes, Bytes>,
}

impl StorageEngine for LmdbEngine {
    type Txn<'e> = LmdbTxn<'e>
    where
        Self: 'e;

    fn begin(&self) -> Result<LmdbTxn<'_>> {
        let txn = self.env.write_txn().map_err(Error::engine)?;
        Ok(LmdbTxn { txn, db: self.db })
    }

    fn sync(&self, _force: bool) -> Result<()> {
        // heed exposes only the forced flush, and the harness always forces.
        self.env.force_sync().map_err(Error::engine)
    }

    fn stat(&self) -> Result<EngineStat> {
        let rtxn = self.env.read_txn().map_err(Error::engine)?;
        let stat = self.db.stat(&rtxn).map_err(Error::engine)?;
        Ok(EngineStat {
            page_size: stat.page_size,
            depth: stat.depth,
            branch_pages: stat.branch_pages as u64,
            leaf_pages: stat.leaf_pages as u64,
            overflow_pages: stat.overflow_pages as u64,
            entries: stat.entries as u64,
        })
    }

    fn size_on_disk(&self) -> Result<u64> {
        self.env.real_disk_size().map_err(Error::engine)
    }
}

impl WriteTxn for LmdbTxn<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.db.put(&mut self.txn, key, value).map_err(Error::engine)
    }

    fn commit(self) -> Result<()> {
        self.txn.commit().map_err(Error::engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp(no_sync: bool) -> (tempfile::TempDir, LmdbEngine) {
        let dir = tempfile::tempdir().unwrap();
        let engine = LmdbEngine::open(
            dir.path(),
            &LmdbOptions {
                map_size: 16 << 20,
                no_sync,
            },
        )
        .unwrap();
        (dir, engine)
    }

    #[test]
    fn test_put_commit_stat_roundtrip() {
        let (_dir, engine) = open_temp(false);

        let mut txn = engine.begin().unwrap();
        txn.put(b"k1", b"v1").unwrap();
        txn.put(b"k2", b"v2").unwrap();
        txn.commit().unwrap();

        let stat = engine.stat().unwrap();
        assert_eq!(stat.entries, 2);
        assert!(stat.page_size > 0);
        assert!(stat.depth >= 1);

        engine.sync(true).unwrap();
        assert!(engine.size_on_disk().unwrap() > 0);
    }

    #[test]
    fn test_dropped_txn_aborts() {
        let (_dir, engine) = open_temp(false);

        let mut txn = engine.begin().unwrap();
        txn.put(b"k1", b"v1").unwrap();
        drop(txn);

        assert_eq!(engine.stat().unwrap().entries, 0);
    }

    #[test]
    fn test_no_sync_environment_still_syncs_on_demand() {
        let (_dir, engine) = open_temp(true);

        let mut txn = engine.begin().unwrap();
        txn.put(b"k1", b"v1").unwrap();
        txn.commit().unwrap();

        engine.sync(true).unwrap();
        assert_eq!(engine.stat().unwrap().entries, 1);
    }
}
