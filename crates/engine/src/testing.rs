//! In-memory engine used by the orchestration tests.
//!
//! Stages puts per transaction the way a real engine would and counts every
//! adapter call, so tests can assert the exact number of begins, puts,
//! commits, and syncs a run performs.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use loadgen_core::Result;
use parking_lot::Mutex;

use crate::adapter::{EngineStat, StorageEngine, WriteTxn};

/// Snapshot of the adapter traffic a [`MemoryEngine`] has observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpCounts {
    /// Transactions begun.
    pub begins: u64,
    /// Individual puts.
    pub puts: u64,
    /// Transactions committed.
    pub commits: u64,
    /// Sync calls (forced or not).
    pub syncs: u64,
}

/// BTreeMap-backed engine that records adapter traffic.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    map: Mutex<BTreeMap<Vec<u8>, Vec<u8>>>,
    begins: AtomicU64,
    puts: AtomicU64,
    commits: AtomicU64,
    syncs: AtomicU64,
}

impl MemoryEngine {
    /// A fresh, empty engine.
    pub fn new() -> MemoryEngine {
        MemoryEngine::default()
    }

    /// Snapshot of the operation counters.
    pub fn counts(&self) -> OpCounts {
        OpCounts {
            begins: self.begins.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
            commits: self.commits.load(Ordering::Relaxed),
            syncs: self.syncs.load(Ordering::Relaxed),
        }
    }

    /// Number of committed entries.
    pub fn len(&self) -> usize {
        self.map.lock().len()
    }

    /// True when nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Committed value for `key`, if any.
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.map.lock().get(key).cloned()
    }
}

/// Write transaction staging puts until commit.
pub struct MemoryTxn<'e> {
    engine: &'e MemoryEngine,
    staged: Vec<(Vec<u8>, Vec<u8>)>,
}

impl StorageEngine for MemoryEngine {
    type Txn<'e> = MemoryTxn<'e>
    where
        Self: 'e;

    fn begin(&self) -> Result<MemoryTxn<'_>> {
        self.begins.fetch_add(1, Ordering::Relaxed);
        Ok(MemoryTxn {
            engine: self,
            staged: Vec::new(),
        })
    }

    fn sync(&self, _force: bool) -> Result<()> {
        self.syncs.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn stat(&self) -> Result<EngineStat> {
        let entries = self.map.lock().len() as u64;
        Ok(EngineStat {
            page_size: 4096,
            depth: u32::from(entries > 0),
            branch_pages: 0,
            leaf_pages: u64::from(entries > 0),
            overflow_pages: 0,
            entries,
        })
    }

    fn size_on_disk(&self) -> Result<u64> {
        let map = self.map.lock();
        Ok(map.iter().map(|(k, v)| (k.len() + v.len()) as u64).sum())
    }
}

impl WriteTxn for MemoryTxn<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.engine.puts.fetch_add(1, Ordering::Relaxed);
        self.staged.push((key.to_vec(), value.to_vec()));
        Ok(())
    }

    fn commit(self) -> Result<()> {
        let MemoryTxn { engine, staged } = self;
        let mut map = engine.map.lock();
        for (key, value) in staged {
            map.insert(key, value);
        }
        engine.commits.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_publishes_staged_puts() {
        let engine = MemoryEngine::new();

        let mut txn = engine.begin().unwrap();
        txn.put(b"a", b"1").unwrap();
        txn.put(b"b", b"2").unwrap();
        assert!(engine.is_empty());

        txn.commit().unwrap();
        assert_eq!(engine.len(), 2);
        assert_eq!(engine.get(b"a").as_deref(), Some(&b"1"[..]));

        let counts = engine.counts();
        assert_eq!(counts.begins, 1);
        assert_eq!(counts.puts, 2);
        assert_eq!(counts.commits, 1);
        assert_eq!(counts.syncs, 0);
    }

    #[test]
    fn test_drop_discards_staged_puts() {
        let engine = MemoryEngine::new();

        let mut txn = engine.begin().unwrap();
        txn.put(b"a", b"1").unwrap();
        drop(txn);

        assert!(engine.is_empty());
        assert_eq!(engine.counts().commits, 0);
    }

    #[test]
    fn test_sync_is_counted() {
        let engine = MemoryEngine::new();
        engine.sync(true).unwrap();
        engine.sync(true).unwrap();
        assert_eq!(engine.counts().syncs, 2);
    }
}
