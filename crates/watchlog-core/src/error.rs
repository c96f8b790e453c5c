use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by watchlog.
#[derive(Error, Debug)]
pub enum WatchlogError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV input could not be parsed at all (e.g. unreadable header row).
    #[error("Failed to parse CSV: {0}")]
    Csv(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the watchlog crates.
pub type Result<T> = std::result::Result<T, WatchlogError>;
