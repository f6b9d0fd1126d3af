//! Storage-engine adapter boundary for the loadgen harness.
//!
//! The benchmark drives the engine under test exclusively through the
//! [`StorageEngine`]/[`WriteTxn`] traits defined here. The production
//! adapter is LMDB via `heed`; [`testing`] provides an in-memory engine that
//! counts adapter traffic for the orchestration tests.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod lmdb;
pub mod testing;

pub use adapter::{EngineStat, StorageEngine, WriteTxn};
pub use lmdb::{LmdbEngine, LmdbOptions};
