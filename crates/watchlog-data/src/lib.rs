//! Data layer for watchlog.
//!
//! Reads viewing-history CSV exports, aggregates the rows into per-day and
//! per-title series, and slices the ranked titles for display.

pub mod aggregator;
pub mod ranking;
pub mod reader;

pub use watchlog_core as core;
