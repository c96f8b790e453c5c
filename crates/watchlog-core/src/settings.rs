use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::error::{Result, WatchlogError};
use crate::models::{MetricMode, TitleRule};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Where the aggregated report goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Interactive terminal dashboard.
    #[default]
    Tui,
    /// One JSON document on stdout.
    Json,
}

/// Viewing-history dashboard for streaming-service CSV exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "watchlog",
    about = "Viewing-history dashboard for streaming-service CSV exports",
    version
)]
pub struct Settings {
    /// Viewing-history CSV export to load on startup
    pub file: Option<PathBuf>,

    /// What each viewing event contributes
    #[arg(long, value_enum, default_value_t = MetricMode::Auto)]
    pub metric: MetricMode,

    /// Collapse "Series: Episode" titles to the series name
    #[arg(long)]
    pub series: bool,

    /// Show only the N most-watched titles instead of paging
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub top: Option<u32>,

    /// Titles per page in the ranking chart (1-50)
    #[arg(long, default_value = "8", value_parser = clap::value_parser!(u32).range(1..=50))]
    pub page_size: u32,

    /// Timezone for start times without an offset (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Tui)]
    pub format: OutputFormat,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments and resolve `"auto"` values.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os().collect())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args(args: Vec<std::ffi::OsString>) -> Self {
        Self::resolve_auto_values(Settings::parse_from(args))
    }

    /// Resolve `"auto"` sentinel values and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        if settings.timezone == "auto" {
            settings.timezone = crate::time_utils::get_system_timezone();
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }

    /// Reject combinations the parser alone cannot catch.
    pub fn validate(&self) -> Result<()> {
        if !crate::time_utils::validate_timezone(&self.timezone) {
            return Err(WatchlogError::Config(format!(
                "unknown timezone {}",
                self.timezone
            )));
        }
        if self.format == OutputFormat::Json && self.file.is_none() {
            return Err(WatchlogError::Config(
                "--format json needs a CSV file argument".to_string(),
            ));
        }
        Ok(())
    }

    /// Title grouping rule selected by `--series`.
    pub fn title_rule(&self) -> TitleRule {
        if self.series {
            TitleRule::SeriesName
        } else {
            TitleRule::AsIs
        }
    }

    /// `--top` as a slice length.
    pub fn top_limit(&self) -> Option<usize> {
        self.top.map(|n| n as usize)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
