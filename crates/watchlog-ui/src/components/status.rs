use crate::themes::Theme;
use ratatui::text::{Line, Span};

use watchlog_core::formatting::{format_metric, format_number};
use watchlog_core::models::Metric;

// ── StatusLine ───────────────────────────────────────────────────────────────

/// One-line summary under the header.
///
/// Precedence: a pending load wins, then the error message, then the row
/// counts of the current report.
pub struct StatusLine<'a> {
    /// File currently being parsed.
    pub loading: Option<&'a str>,
    pub error: Option<&'a str>,
    pub rows_seen: usize,
    pub rows_skipped: usize,
    pub metric: Metric,
    /// Sum of the day series.
    pub total: u64,
    pub theme: &'a Theme,
}

impl<'a> StatusLine<'a> {
    pub fn to_line(&self) -> Line<'a> {
        if let Some(name) = self.loading {
            return Line::from(vec![
                Span::styled("⏳ Loading ", self.theme.info),
                Span::styled(name.to_string(), self.theme.value),
                Span::styled(" …", self.theme.info),
            ]);
        }

        if let Some(err) = self.error {
            return Line::from(vec![
                Span::styled("⚠ ", self.theme.error),
                Span::styled(err.to_string(), self.theme.error),
            ]);
        }

        let mut spans = vec![
            Span::styled("Rows: ", self.theme.label),
            Span::styled(format_number(self.rows_seen as u64), self.theme.value),
            Span::styled(format!("  {}: ", self.metric.label()), self.theme.label),
            Span::styled(format_metric(self.metric, self.total), self.theme.value),
        ];

        if self.rows_skipped > 0 {
            spans.push(Span::styled(
                format!("  ({} skipped, no usable date)", format_number(self.rows_skipped as u64)),
                self.theme.warning,
            ));
        }

        Line::from(spans)
    }
}

// ── KeyHints ─────────────────────────────────────────────────────────────────

/// Footer listing the available keys.
pub struct KeyHints<'a> {
    /// The path prompt is open.
    pub prompting: bool,
    pub theme: &'a Theme,
}

impl<'a> KeyHints<'a> {
    pub fn to_line(&self) -> Line<'a> {
        let hints: &[(&'static str, &'static str)] = if self.prompting {
            &[("Enter", "load"), ("Esc", "cancel")]
        } else {
            &[
                ("o", "open"),
                ("r", "reload"),
                ("c", "clear"),
                ("s", "series"),
                ("←/→", "page"),
                ("q", "quit"),
            ]
        };

        let mut spans = Vec::with_capacity(hints.len() * 2);
        for (i, (key, action)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", self.theme.key_hint));
            }
            spans.push(Span::styled(*key, self.theme.label));
            spans.push(Span::styled(format!(" {action}"), self.theme.key_hint));
        }
        Line::from(spans)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
