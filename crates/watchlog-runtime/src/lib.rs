//! Runtime layer for watchlog.
//!
//! Owns the current dataset and runs CSV parses in the background so the
//! dashboard never blocks on file I/O.

pub mod dataset;
pub mod loader;

pub use dataset::{Dataset, DatasetOptions};
pub use loader::{CsvLoader, LoadOutcome};

pub use watchlog_core as core;
pub use watchlog_data as data;
