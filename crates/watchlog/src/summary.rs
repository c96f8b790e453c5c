//! Non-interactive `--format json` output.

use std::path::Path;

use serde::Serialize;

use watchlog_core::models::{DayPoint, Metric, MetricMode, TitlePoint};
use watchlog_core::paths::display_name;
use watchlog_core::settings::Settings;
use watchlog_data::aggregator::{Aggregator, AggregatorConfig};
use watchlog_data::ranking::top_titles;
use watchlog_data::reader::read_csv_file;

/// The JSON document printed to stdout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub source: String,
    pub metric: Metric,
    pub rows_seen: usize,
    pub rows_skipped: usize,
    /// First parse issue, if any.
    pub error: Option<String>,
    pub by_day: Vec<DayPoint>,
    pub by_title: Vec<TitlePoint>,
}

/// Read and aggregate `path` synchronously.
///
/// A file that cannot be read is an error; parse issues are reported in
/// the `error` field alongside whatever rows were recovered.
pub fn build(
    path: &Path,
    metric_mode: MetricMode,
    config: AggregatorConfig,
    top: Option<usize>,
) -> anyhow::Result<Summary> {
    let parsed = read_csv_file(path)?;
    let error = parsed.first_error();
    if let Some(msg) = &error {
        tracing::warn!(issues = parsed.issues.len(), "{msg}");
    }

    let config = AggregatorConfig {
        metric: metric_mode.resolve(&parsed.columns),
        ..config
    };
    let report = Aggregator::new(config).aggregate(&parsed.rows);

    let by_title = match top {
        Some(n) => top_titles(&report.by_title, n).to_vec(),
        None => report.by_title,
    };

    Ok(Summary {
        source: display_name(path),
        metric: report.metric,
        rows_seen: report.rows_seen,
        rows_skipped: report.rows_skipped,
        error,
        by_day: report.by_day,
        by_title,
    })
}

/// [`build`] driven by the command-line settings.
pub fn from_settings(settings: &Settings, path: &Path) -> anyhow::Result<Summary> {
    let config = AggregatorConfig {
        metric: Metric::default(),
        title_rule: settings.title_rule(),
        timezone: settings.timezone.clone(),
    };
    build(path, settings.metric, config, settings.top_limit())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
