//! Shared foundation for the loadgen benchmark harness.
//!
//! This crate holds the pieces every other layer leans on:
//! - Error: the two-tier error model (validation vs fatal)
//! - RunConfig: validated parameters of a single benchmark run
//! - Clock/Interval: monotonic time source and signed interval arithmetic
//! - units: human-readable size-string parsing

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod time;
pub mod units;

pub use config::RunConfig;
pub use error::{Error, Result};
pub use time::{Clock, Interval};
