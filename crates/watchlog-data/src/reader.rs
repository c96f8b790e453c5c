//! CSV loading for viewing-history exports.
//!
//! Reads the export with the `csv` crate and maps each record onto a
//! [`RawRow`]. Structural problems in individual records are collected as
//! [`ParseIssue`]s instead of aborting, so a partially broken export still
//! yields every row that could be recovered.

use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use thiserror::Error;
use tracing::{debug, warn};
use watchlog_core::error::{Result, WatchlogError};
use watchlog_core::models::RawRow;

// ── ParseIssue ────────────────────────────────────────────────────────────────

/// A recoverable problem found in one data record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIssue {
    /// The record had fewer cells than the header; the row was kept.
    #[error("Too few fields: expected {expected} fields but parsed {found} (row {row})")]
    TooFewFields {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The record had more cells than the header; extras were ignored.
    #[error("Too many fields: expected {expected} fields but parsed {found} (row {row})")]
    TooManyFields {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The record could not be decoded at all and was dropped.
    #[error("Malformed record (row {row}): {message}")]
    Malformed { row: usize, message: String },
}

// ── ParsedCsv ─────────────────────────────────────────────────────────────────

/// Everything recovered from one export.
#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    /// Rows in file order. Blank lines are not records; a line of bare
    /// delimiters is kept as a row of absent cells.
    pub rows: Vec<RawRow>,
    /// Header names, trimmed.
    pub columns: Vec<String>,
    /// Recoverable problems, in file order.
    pub issues: Vec<ParseIssue>,
}

impl ParsedCsv {
    /// The single message shown to the user: the first issue, if any.
    pub fn first_error(&self) -> Option<String> {
        self.issues.first().map(|i| i.to_string())
    }
}

// ── Column mapping ────────────────────────────────────────────────────────────

/// Positions of the recognised columns within a header row.
#[derive(Debug, Default)]
struct ColumnMap {
    title: Option<usize>,
    date: Option<usize>,
    start_time: Option<usize>,
    start_time_utc: Option<usize>,
    duration: Option<usize>,
}

impl ColumnMap {
    fn from_columns(columns: &[String]) -> Self {
        let find = |name: &str| columns.iter().position(|c| c.eq_ignore_ascii_case(name));
        Self {
            title: find("Title"),
            date: find("Date"),
            start_time: find("Start Time"),
            start_time_utc: find("Start Time UTC"),
            duration: find("Duration"),
        }
    }

    fn row(&self, record: &StringRecord) -> RawRow {
        // Trimmed cell at `idx`, `None` when the column is absent or empty.
        let get = |idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        RawRow {
            title: get(self.title),
            date: get(self.date),
            start_time: get(self.start_time),
            start_time_utc: get(self.start_time_utc),
            duration: get(self.duration),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read and parse the export at `path`.
///
/// Fails only when the file cannot be opened or its header row cannot be
/// read; per-record problems end up in [`ParsedCsv::issues`].
pub fn read_csv_file(path: &Path) -> Result<ParsedCsv> {
    let file = std::fs::File::open(path).map_err(|source| WatchlogError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed = parse_csv_reader(std::io::BufReader::new(file))?;

    debug!(
        "Parsed {}: {} rows, {} columns, {} issues",
        path.display(),
        parsed.rows.len(),
        parsed.columns.len(),
        parsed.issues.len()
    );

    Ok(parsed)
}

/// Parse CSV text already held in memory.
pub fn parse_csv_str(text: &str) -> Result<ParsedCsv> {
    parse_csv_reader(text.as_bytes())
}

/// Parse CSV from any reader. The first record is the header row.
pub fn parse_csv_reader<R: Read>(rdr: R) -> Result<ParsedCsv> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(rdr);

    let headers = reader
        .headers()
        .map_err(|e| WatchlogError::Csv(e.to_string()))?
        .clone();

    let columns: Vec<String> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{FEFF}').trim().to_string())
        .collect();
    let map = ColumnMap::from_columns(&columns);
    let expected = columns.len();

    let mut parsed = ParsedCsv {
        columns,
        ..Default::default()
    };

    for (idx, result) in reader.records().enumerate() {
        let row = idx + 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping malformed CSV record {}: {}", row, e);
                let stop = e.is_io_error();
                parsed.issues.push(ParseIssue::Malformed {
                    row,
                    message: e.to_string(),
                });
                // An I/O failure will repeat on every further read.
                if stop {
                    break;
                }
                continue;
            }
        };

        let found = record.len();
        if found < expected {
            parsed.issues.push(ParseIssue::TooFewFields {
                row,
                expected,
                found,
            });
        } else if found > expected {
            parsed.issues.push(ParseIssue::TooManyFields {
                row,
                expected,
                found,
            });
        }

        parsed.rows.push(map.row(&record));
    }

    if !parsed.issues.is_empty() {
        warn!(
            "CSV parsed with {} issue(s); first: {}",
            parsed.issues.len(),
            parsed.issues[0]
        );
    }

    Ok(parsed)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
