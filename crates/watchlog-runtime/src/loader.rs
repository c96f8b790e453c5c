//! Background CSV loading.
//!
//! [`CsvLoader`] runs each parse on tokio's blocking pool and sends exactly
//! one [`LoadOutcome`] per request through an `mpsc` channel, so the TUI
//! event loop can pick results up without any shared mutable state.

use std::path::PathBuf;

use tokio::sync::mpsc;
use watchlog_data::reader::{read_csv_file, ParsedCsv};

// ── Public types ──────────────────────────────────────────────────────────────

/// Completion message for one load request.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// Generation assigned by [`CsvLoader::load`]; used to drop stale results.
    pub generation: u64,
    /// File that was requested.
    pub path: PathBuf,
    /// Parsed export, or a single human-readable failure message.
    pub result: Result<ParsedCsv, String>,
}

// ── CsvLoader ─────────────────────────────────────────────────────────────────

/// Spawns CSV parses and numbers them.
///
/// Requests are never cancelled: a superseded parse still finishes and sends
/// its outcome, and it is up to the receiver to ignore it.
pub struct CsvLoader {
    tx: mpsc::Sender<LoadOutcome>,
    next_generation: u64,
}

impl CsvLoader {
    /// Create a loader and the receiving end of its outcome channel.
    pub fn new() -> (Self, mpsc::Receiver<LoadOutcome>) {
        // A handful of in-flight loads is plenty; the UI drains every tick.
        let (tx, rx) = mpsc::channel(8);
        (
            Self {
                tx,
                next_generation: 1,
            },
            rx,
        )
    }

    /// Start parsing `path` in the background and return its generation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn load(&mut self, path: PathBuf) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;

        tracing::debug!(generation, path = %path.display(), "starting CSV load");

        let tx = self.tx.clone();
        tokio::spawn(async move {
            let task_path = path.clone();
            let result = match tokio::task::spawn_blocking(move || read_csv_file(&task_path)).await
            {
                Ok(Ok(parsed)) => Ok(parsed),
                Ok(Err(e)) => {
                    tracing::warn!(generation, error = %e, "CSV load failed");
                    Err(e.to_string())
                }
                Err(e) => {
                    tracing::warn!(generation, error = %e, "CSV load task aborted");
                    Err(format!("CSV load task aborted: {e}"))
                }
            };

            let outcome = LoadOutcome {
                generation,
                path,
                result,
            };
            if let Err(e) = tx.send(outcome).await {
                tracing::debug!(error = %e, "load outcome dropped; receiver closed");
            }
        });

        generation
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
