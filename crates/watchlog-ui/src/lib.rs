//! Terminal UI layer for watchlog.
//!
//! Provides themes, the header, status and prompt components, the dashboard
//! renderer (day line chart and ranked title bar chart), and the application
//! event loop built on top of [`ratatui`].

pub mod app;
pub mod components;
pub mod dashboard;
pub mod themes;

pub use watchlog_core as core;
