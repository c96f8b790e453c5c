//! Core types and helpers shared by the watchlog crates.
//!
//! Holds the row and series models, the error type, CLI settings, and the
//! lenient duration / start-time parsers used during aggregation.

pub mod duration;
pub mod error;
pub mod formatting;
pub mod models;
pub mod paths;
pub mod settings;
pub mod time_utils;
