//! Viewing-event aggregation by day and by title.
//!
//! Turns parsed [`RawRow`]s into the two series the dashboard draws: a
//! per-day series sorted by day key and a per-title series ranked by metric.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;
use watchlog_core::duration::parse_duration_minutes;
use watchlog_core::models::{DayPoint, Metric, RawRow, TitlePoint, TitleRule, MISSING_DATE_KEY};
use watchlog_core::time_utils::DayKeyResolver;

// ── AggregatorConfig ──────────────────────────────────────────────────────────

/// Knobs that change what a row contributes and under which keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    pub metric: Metric,
    pub title_rule: TitleRule,
    /// IANA zone for naive `Start Time` values.
    pub timezone: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            metric: Metric::Count,
            title_rule: TitleRule::AsIs,
            timezone: "UTC".to_string(),
        }
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Result of one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub metric: Metric,
    /// One point per distinct day key, ascending by key string.
    pub by_day: Vec<DayPoint>,
    /// One point per distinct title, descending by metric.
    pub by_title: Vec<TitlePoint>,
    /// Rows handed to the aggregator.
    pub rows_seen: usize,
    /// Rows left out because no day key could be derived.
    pub rows_skipped: usize,
}

impl Report {
    /// Sum of the day series.
    pub fn day_total(&self) -> u64 {
        self.by_day.iter().map(|p| p.metric).sum()
    }

    /// Sum of the title series.
    pub fn title_total(&self) -> u64 {
        self.by_title.iter().map(|p| p.metric).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty() && self.by_title.is_empty()
    }
}

// ── TitleTally ────────────────────────────────────────────────────────────────

/// Title → metric accumulator that remembers first-occurrence order.
#[derive(Default)]
struct TitleTally {
    index: HashMap<String, usize>,
    points: Vec<TitlePoint>,
}

impl TitleTally {
    fn add(&mut self, title: String, metric: u64) {
        match self.index.get(&title) {
            Some(&i) => self.points[i].metric += metric,
            None => {
                self.index.insert(title.clone(), self.points.len());
                self.points.push(TitlePoint { title, metric });
            }
        }
    }

    /// Ranked points; the sort is stable so ties keep first-occurrence order.
    fn into_ranked(self) -> Vec<TitlePoint> {
        let mut points = self.points;
        points.sort_by(|a, b| b.metric.cmp(&a.metric));
        points
    }
}

// ── Aggregator ────────────────────────────────────────────────────────────────

/// Groups viewing events by day and by title.
#[derive(Debug, Clone)]
pub struct Aggregator {
    config: AggregatorConfig,
    resolver: DayKeyResolver,
}

impl Aggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        let resolver = DayKeyResolver::new(&config.timezone);
        Self { config, resolver }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Aggregate `rows` in input order. Never fails: malformed values fall
    /// back to defaults, and rows without a usable start time are skipped
    /// when measuring minutes.
    pub fn aggregate(&self, rows: &[RawRow]) -> Report {
        let mut days: BTreeMap<String, u64> = BTreeMap::new();
        let mut titles = TitleTally::default();
        let mut skipped = 0usize;

        for row in rows {
            let Some(day) = self.day_key(row) else {
                skipped += 1;
                continue;
            };
            let title = self
                .config
                .title_rule
                .apply(row.title.as_deref().unwrap_or_default());
            let metric = self.contribution(row);

            *days.entry(day).or_insert(0) += metric;
            titles.add(title, metric);
        }

        let report = Report {
            metric: self.config.metric,
            by_day: days
                .into_iter()
                .map(|(day, metric)| DayPoint { day, metric })
                .collect(),
            by_title: titles.into_ranked(),
            rows_seen: rows.len(),
            rows_skipped: skipped,
        };

        debug!(
            rows = report.rows_seen,
            skipped = report.rows_skipped,
            days = report.by_day.len(),
            titles = report.by_title.len(),
            "aggregation complete"
        );

        report
    }

    /// Grouping key for the day series, `None` when the row must be skipped.
    fn day_key(&self, row: &RawRow) -> Option<String> {
        match self.config.metric {
            Metric::Count => Some(
                row.date
                    .clone()
                    .unwrap_or_else(|| MISSING_DATE_KEY.to_string()),
            ),
            Metric::Minutes => row
                .start_time
                .as_deref()
                .and_then(|s| self.resolver.local_day_key(s))
                .or_else(|| {
                    row.start_time_utc
                        .as_deref()
                        .and_then(|s| self.resolver.utc_day_key(s))
                }),
        }
    }

    fn contribution(&self, row: &RawRow) -> u64 {
        match self.config.metric {
            Metric::Count => 1,
            Metric::Minutes => parse_duration_minutes(row.duration.as_deref()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn dated(title: &str, date: &str) -> RawRow {
        RawRow {
            title: Some(title.to_string()),
            date: Some(date.to_string()),
            ..Default::default()
        }
    }

    fn timed(title: &str, start: &str, duration: &str) -> RawRow {
        RawRow {
            title: Some(title.to_string()),
            start_time: Some(start.to_string()),
            duration: Some(duration.to_string()),
            ..Default::default()
        }
    }

    fn counting() -> Aggregator {
        Aggregator::new(AggregatorConfig::default())
    }

    fn minutes(rule: TitleRule) -> Aggregator {
        Aggregator::new(AggregatorConfig {
            metric: Metric::Minutes,
            title_rule: rule,
            timezone: "UTC".to_string(),
        })
    }

    // ── count metric ──────────────────────────────────────────────────────────

    #[test]
    fn test_count_groups_by_raw_date() {
        let rows = vec![
            dated("Dark", "01/15/24"),
            dated("Dark", "01/15/24"),
            dated("Ozark", "01/16/24"),
        ];
        let report = counting().aggregate(&rows);

        assert_eq!(
            report.by_day,
            vec![
                DayPoint {
                    day: "01/15/24".to_string(),
                    metric: 2
                },
                DayPoint {
                    day: "01/16/24".to_string(),
                    metric: 1
                },
            ]
        );
        assert_eq!(report.by_title[0].title, "Dark");
        assert_eq!(report.by_title[0].metric, 2);
        assert_eq!(report.rows_seen, 3);
        assert_eq!(report.rows_skipped, 0);
    }

    #[test]
    fn test_count_missing_date_uses_sentinel() {
        let rows = vec![RawRow {
            title: Some("Mystery".to_string()),
            ..Default::default()
        }];
        let report = counting().aggregate(&rows);
        assert_eq!(report.by_day.len(), 1);
        assert_eq!(report.by_day[0].day, "1/1/75");
        assert_eq!(report.by_day[0].metric, 1);
    }

    #[test]
    fn test_count_delimiter_only_row_lands_on_sentinel() {
        let parsed = crate::reader::parse_csv_str("Title,Date\nA,1/1/24\n,\n").unwrap();
        let report = counting().aggregate(&parsed.rows);

        assert_eq!(report.rows_seen, 2);
        assert!(report
            .by_day
            .contains(&DayPoint { day: "1/1/75".to_string(), metric: 1 }));
        assert!(report
            .by_title
            .contains(&TitlePoint { title: String::new(), metric: 1 }));
    }

    #[test]
    fn test_missing_title_defaults_to_empty() {
        let rows = vec![RawRow {
            date: Some("2/2/24".to_string()),
            ..Default::default()
        }];
        let report = counting().aggregate(&rows);
        assert_eq!(report.by_title.len(), 1);
        assert_eq!(report.by_title[0].title, "");
    }

    #[test]
    fn test_count_conserves_total() {
        let rows = vec![
            dated("A", "1/1/24"),
            dated("B", "1/2/24"),
            dated("A", "1/3/24"),
            dated("C", "1/3/24"),
            dated("A: Pilot", "1/4/24"),
        ];
        let report = counting().aggregate(&rows);
        assert_eq!(report.day_total(), 5);
        assert_eq!(report.title_total(), 5);
    }

    #[test]
    fn test_day_series_sorted_lexicographically() {
        let rows = vec![
            dated("x", "2024-03-01"),
            dated("x", "2023-12-31"),
            dated("x", "2024-01-15"),
        ];
        let report = counting().aggregate(&rows);
        let keys: Vec<&str> = report.by_day.iter().map(|p| p.day.as_str()).collect();
        assert_eq!(keys, vec!["2023-12-31", "2024-01-15", "2024-03-01"]);
    }

    #[test]
    fn test_day_sort_is_string_order_for_unpadded_dates() {
        let rows = vec![dated("x", "2/1/24"), dated("x", "10/1/24")];
        let report = counting().aggregate(&rows);
        let keys: Vec<&str> = report.by_day.iter().map(|p| p.day.as_str()).collect();
        assert_eq!(keys, vec!["10/1/24", "2/1/24"]);
    }

    #[test]
    fn test_title_series_ranked_with_stable_ties() {
        let rows = vec![
            dated("Tie One", "1/1/24"),
            dated("Top", "1/1/24"),
            dated("Tie Two", "1/1/24"),
            dated("Top", "1/2/24"),
            dated("Tie Three", "1/2/24"),
        ];
        let report = counting().aggregate(&rows);
        let titles: Vec<&str> = report.by_title.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Top", "Tie One", "Tie Two", "Tie Three"]);
        assert!(report
            .by_title
            .windows(2)
            .all(|w| w[0].metric >= w[1].metric));
    }

    #[test]
    fn test_series_rule_collapses_episodes() {
        let agg = Aggregator::new(AggregatorConfig {
            title_rule: TitleRule::SeriesName,
            ..Default::default()
        });
        let rows = vec![
            dated("Stranger Things: Chapter One", "1/1/24"),
            dated("Stranger Things: Chapter Two", "1/1/24"),
            dated("Inception", "1/2/24"),
        ];
        let report = agg.aggregate(&rows);
        assert_eq!(report.by_title[0].title, "Stranger Things");
        assert_eq!(report.by_title[0].metric, 2);
        assert_eq!(report.by_title.len(), 2);
    }

    #[test]
    fn test_empty_input_yields_empty_report() {
        let report = counting().aggregate(&[]);
        assert!(report.is_empty());
        assert_eq!(report.rows_seen, 0);

        let report = minutes(TitleRule::AsIs).aggregate(&[]);
        assert!(report.is_empty());
    }

    #[test]
    fn test_unique_keys_in_both_series() {
        let rows = vec![
            dated("A", "d1"),
            dated("B", "d2"),
            dated("A", "d1"),
            dated("B", "d3"),
        ];
        let report = counting().aggregate(&rows);
        let days: HashSet<_> = report.by_day.iter().map(|p| &p.day).collect();
        let titles: HashSet<_> = report.by_title.iter().map(|p| &p.title).collect();
        assert_eq!(days.len(), report.by_day.len());
        assert_eq!(titles.len(), report.by_title.len());
        assert_eq!(days.len(), 3);
    }

    // ── minutes metric ────────────────────────────────────────────────────────

    #[test]
    fn test_minutes_sums_durations_per_day() {
        let rows = vec![
            timed("Dark: Secrets", "2024-01-15 20:00:00", "0:45:10"),
            timed("Dark: Lies", "2024-01-15 21:00:00", "1:02:03"),
            timed("Ozark: Sugarwood", "2024-01-16 19:00:00", "2h 5m"),
        ];
        let report = minutes(TitleRule::AsIs).aggregate(&rows);

        assert_eq!(report.metric, Metric::Minutes);
        assert_eq!(report.by_day.len(), 2);
        assert_eq!(report.by_day[0].day, "2024-01-15");
        assert_eq!(report.by_day[0].metric, 45 + 62);
        assert_eq!(report.by_day[1].metric, 125);
        assert_eq!(report.by_title[0].title, "Ozark: Sugarwood");
    }

    #[test]
    fn test_minutes_series_rule() {
        let rows = vec![
            timed("Dark: Secrets", "2024-01-15 20:00:00", "45"),
            timed("Dark: Lies", "2024-01-15 21:00:00", "50"),
            timed("Ozark: Sugarwood", "2024-01-16 19:00:00", "60"),
        ];
        let report = minutes(TitleRule::SeriesName).aggregate(&rows);
        assert_eq!(report.by_title[0].title, "Dark");
        assert_eq!(report.by_title[0].metric, 95);
        assert_eq!(report.by_title[1].title, "Ozark");
    }

    #[test]
    fn test_minutes_skips_unparseable_dates() {
        let rows = vec![
            timed("A", "not a date", "30"),
            RawRow {
                title: Some("B".to_string()),
                duration: Some("30".to_string()),
                ..Default::default()
            },
            timed("C", "2024-02-01 10:00:00", "15"),
        ];
        let report = minutes(TitleRule::AsIs).aggregate(&rows);

        assert_eq!(report.rows_seen, 3);
        assert_eq!(report.rows_skipped, 2);
        assert_eq!(report.by_day.len(), 1);
        assert_eq!(report.by_title.len(), 1);
        assert_eq!(report.by_title[0].title, "C");
    }

    #[test]
    fn test_minutes_falls_back_to_utc_column() {
        let rows = vec![RawRow {
            title: Some("Show".to_string()),
            start_time_utc: Some("2024-05-01 02:00:00".to_string()),
            duration: Some("30m".to_string()),
            ..Default::default()
        }];
        let agg = Aggregator::new(AggregatorConfig {
            metric: Metric::Minutes,
            title_rule: TitleRule::AsIs,
            timezone: "America/Los_Angeles".to_string(),
        });
        let report = agg.aggregate(&rows);
        assert_eq!(report.by_day[0].day, "2024-05-01");
        assert_eq!(report.by_day[0].metric, 30);
    }

    #[test]
    fn test_minutes_local_time_converted_to_utc_day() {
        let agg = Aggregator::new(AggregatorConfig {
            metric: Metric::Minutes,
            title_rule: TitleRule::AsIs,
            timezone: "America/New_York".to_string(),
        });
        let rows = vec![timed("Late Show", "2023-12-01 21:00:00", "20m")];
        let report = agg.aggregate(&rows);
        assert_eq!(report.by_day[0].day, "2023-12-02");
    }

    #[test]
    fn test_minutes_bad_duration_counts_as_zero() {
        let rows = vec![
            timed("A", "2024-01-01 10:00:00", "abc"),
            timed("A", "2024-01-01 11:00:00", "10m"),
        ];
        let report = minutes(TitleRule::AsIs).aggregate(&rows);
        assert_eq!(report.rows_skipped, 0);
        assert_eq!(report.by_day[0].metric, 10);
        assert_eq!(report.by_title[0].metric, 10);
    }

    #[test]
    fn test_distinct_days_match_parseable_dates() {
        let rows = vec![
            timed("A", "2024-01-01 10:00:00", "5"),
            timed("B", "2024-01-01T23:59:59Z", "5"),
            timed("C", "2024-01-02", "5"),
            timed("D", "garbage", "5"),
        ];
        let report = minutes(TitleRule::AsIs).aggregate(&rows);
        assert_eq!(report.by_day.len(), 2);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = counting().aggregate(&[dated("A", "1/1/24")]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["metric"], "count");
        assert_eq!(json["byDay"][0]["day"], "1/1/24");
        assert_eq!(json["byTitle"][0]["metric"], 1);
        assert_eq!(json["rowsSeen"], 1);
    }
}
