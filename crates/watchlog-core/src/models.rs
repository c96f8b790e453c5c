use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Day key used for rows without a `Date` when counting views.
pub const MISSING_DATE_KEY: &str = "1/1/75";

/// What each viewing event contributes to the aggregate series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Every row is one watch event.
    #[default]
    Count,
    /// Every row contributes its parsed duration in whole minutes.
    Minutes,
}

impl Metric {
    /// Axis / column label for this metric.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Count => "Views",
            Metric::Minutes => "Minutes",
        }
    }
}

/// Metric selection as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MetricMode {
    /// Minutes when the export has a `Duration` column, views otherwise.
    #[default]
    Auto,
    Count,
    Minutes,
}

impl MetricMode {
    /// Resolve `Auto` against the header columns of a parsed export.
    pub fn resolve(self, columns: &[String]) -> Metric {
        match self {
            MetricMode::Count => Metric::Count,
            MetricMode::Minutes => Metric::Minutes,
            MetricMode::Auto => {
                if columns
                    .iter()
                    .any(|c| c.trim().eq_ignore_ascii_case("duration"))
                {
                    Metric::Minutes
                } else {
                    Metric::Count
                }
            }
        }
    }
}

/// How titles are turned into grouping keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleRule {
    /// Group by the title exactly as exported.
    #[default]
    AsIs,
    /// Collapse `"Series: Episode"` titles to the series name.
    SeriesName,
}

impl TitleRule {
    pub fn apply(&self, title: &str) -> String {
        match self {
            TitleRule::AsIs => title.to_string(),
            TitleRule::SeriesName => series_name(title),
        }
    }
}

/// Extract the series name from an episode title by truncating at the first
/// colon and trimming whitespace.
pub fn series_name(title: &str) -> String {
    title.split(':').next().unwrap_or_default().trim().to_string()
}

/// One logged viewing event as read from the export.
///
/// Every field is optional; empty cells are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// `Title` column.
    pub title: Option<String>,
    /// `Date` column (count-style exports).
    pub date: Option<String>,
    /// `Start Time` column, local wall-clock time.
    pub start_time: Option<String>,
    /// `Start Time UTC` column.
    pub start_time_utc: Option<String>,
    /// `Duration` column, free text.
    pub duration: Option<String>,
}

/// Aggregated metric for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPoint {
    /// Day key, e.g. `"2024-01-15"` or the raw exported date string.
    pub day: String,
    pub metric: u64,
}

/// Aggregated metric for one (normalized) title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitlePoint {
    pub title: String,
    pub metric: u64,
}
