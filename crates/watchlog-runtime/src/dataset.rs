//! Current dataset state with a memoized report.
//!
//! [`Dataset`] owns the rows of the most recently loaded export together
//! with its single error message. The aggregated [`Report`] is derived on
//! demand and recomputed only when the row set (compared by `Arc` identity)
//! or the aggregation config changes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use watchlog_core::models::{MetricMode, RawRow, TitleRule};
use watchlog_data::aggregator::{Aggregator, AggregatorConfig, Report};

use crate::loader::LoadOutcome;

// ── DatasetOptions ────────────────────────────────────────────────────────────

/// Aggregation choices fixed at startup.
#[derive(Debug, Clone)]
pub struct DatasetOptions {
    pub metric_mode: MetricMode,
    pub title_rule: TitleRule,
    /// IANA zone for naive start times.
    pub timezone: String,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            metric_mode: MetricMode::Auto,
            title_rule: TitleRule::AsIs,
            timezone: "UTC".to_string(),
        }
    }
}

// ── Dataset ───────────────────────────────────────────────────────────────────

struct CachedReport {
    rows: Option<Arc<Vec<RawRow>>>,
    config: AggregatorConfig,
    report: Report,
}

/// Rows, error message and load bookkeeping for the dashboard.
pub struct Dataset {
    options: DatasetOptions,
    rows: Option<Arc<Vec<RawRow>>>,
    columns: Vec<String>,
    error: Option<String>,
    source: Option<PathBuf>,
    /// Generation and path of the load whose outcome we are waiting for.
    pending: Option<(u64, PathBuf)>,
    cache: Option<CachedReport>,
    computations: u64,
}

impl Dataset {
    pub fn new(options: DatasetOptions) -> Self {
        Self {
            options,
            rows: None,
            columns: Vec::new(),
            error: None,
            source: None,
            pending: None,
            cache: None,
            computations: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Record that load `generation` for `path` is in flight. Any earlier
    /// pending load is superseded.
    pub fn begin_load(&mut self, generation: u64, path: PathBuf) {
        if let Some((old, _)) = &self.pending {
            tracing::debug!(superseded = old, generation, "new load supersedes pending one");
        }
        self.pending = Some((generation, path));
    }

    /// Apply a finished load. Returns `false` when the outcome is stale and
    /// was ignored.
    pub fn apply(&mut self, outcome: LoadOutcome) -> bool {
        match &self.pending {
            Some((generation, _)) if *generation == outcome.generation => {}
            _ => {
                tracing::debug!(
                    generation = outcome.generation,
                    "ignoring stale load outcome"
                );
                return false;
            }
        }

        self.pending = None;
        self.source = Some(outcome.path);

        match outcome.result {
            Ok(parsed) => {
                self.error = parsed.first_error();
                let issues = parsed.issues.len();
                self.columns = parsed.columns;
                self.rows = Some(Arc::new(parsed.rows));
                tracing::info!(rows = self.row_count(), issues, "dataset loaded");
            }
            Err(message) => {
                tracing::warn!(error = %message, "dataset load failed");
                self.error = Some(message);
                self.columns.clear();
                self.rows = None;
            }
        }

        true
    }

    /// Drop rows, error, source and any pending load.
    pub fn clear(&mut self) {
        self.rows = None;
        self.columns.clear();
        self.error = None;
        self.source = None;
        self.pending = None;
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn rows(&self) -> &[RawRow] {
        match &self.rows {
            Some(rows) => rows.as_slice(),
            None => &[],
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows().len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The single message shown to the user, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// File the current rows came from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// File currently being loaded, if any.
    pub fn pending_path(&self) -> Option<&Path> {
        self.pending.as_ref().map(|(_, p)| p.as_path())
    }

    pub fn title_rule(&self) -> TitleRule {
        self.options.title_rule
    }

    pub fn set_title_rule(&mut self, rule: TitleRule) {
        self.options.title_rule = rule;
    }

    pub fn timezone(&self) -> &str {
        &self.options.timezone
    }

    /// Number of times the report has actually been recomputed.
    pub fn report_computations(&self) -> u64 {
        self.computations
    }

    // ── Derived report ────────────────────────────────────────────────────

    /// Aggregation config for the current rows.
    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig {
            metric: self.options.metric_mode.resolve(&self.columns),
            title_rule: self.options.title_rule,
            timezone: self.options.timezone.clone(),
        }
    }

    /// The report for the current rows, recomputed only when the row set or
    /// the config changed since the last call.
    pub fn report(&mut self) -> &Report {
        let config = self.aggregator_config();

        let stale = match &self.cache {
            Some(cached) => !same_rows(&cached.rows, &self.rows) || cached.config != config,
            None => true,
        };
        if stale {
            self.cache = None;
        }

        let rows = &self.rows;
        let computations = &mut self.computations;
        let cached = self.cache.get_or_insert_with(|| {
            *computations += 1;
            let report = match rows {
                Some(rows) => Aggregator::new(config.clone()).aggregate(rows),
                None => Report {
                    metric: config.metric,
                    ..Default::default()
                },
            };
            CachedReport {
                rows: rows.clone(),
                config,
                report,
            }
        });
        &cached.report
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new(DatasetOptions::default())
    }
}

/// Identity comparison of two optional row sets.
fn same_rows(a: &Option<Arc<Vec<RawRow>>>, b: &Option<Arc<Vec<RawRow>>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
