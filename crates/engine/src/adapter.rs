//! Traits every engine under test must satisfy.
//!
//! The harness performs no retries: any failure crossing this boundary is
//! fatal to the run. Opening is engine-specific (a constructor on the
//! concrete type); closing happens on drop.

use loadgen_core::Result;

/// Statistics block describing the engine's on-disk structure.
///
/// Field names follow LMDB's stat block; other engines map what they can.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineStat {
    /// Size of a database page in bytes.
    pub page_size: u32,
    /// Depth of the B-tree.
    pub depth: u32,
    /// Number of internal (branch) pages.
    pub branch_pages: u64,
    /// Number of leaf pages.
    pub leaf_pages: u64,
    /// Number of overflow pages.
    pub overflow_pages: u64,
    /// Number of stored entries.
    pub entries: u64,
}

/// A durable, transactional key-value engine under test.
pub trait StorageEngine {
    /// Write-transaction type, borrowing the engine for its lifetime.
    type Txn<'e>: WriteTxn
    where
        Self: 'e;

    /// Begin a write transaction.
    fn begin(&self) -> Result<Self::Txn<'_>>;

    /// Flush buffered writes to stable storage.
    ///
    /// `force` requests a synchronous flush even when the environment was
    /// opened with relaxed durability; the harness always forces.
    fn sync(&self, force: bool) -> Result<()>;

    /// Statistics describing the current database structure.
    fn stat(&self) -> Result<EngineStat>;

    /// Bytes the database currently occupies on disk.
    fn size_on_disk(&self) -> Result<u64>;
}

/// A write transaction: puts are visible to readers only after `commit`.
pub trait WriteTxn {
    /// Insert or replace one key/value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Commit the transaction. Dropping without committing aborts it.
    fn commit(self) -> Result<()>;
}
