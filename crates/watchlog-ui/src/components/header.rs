use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decorative sparkle string placed either side of the application title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

/// Dashboard header rendering three lines:
///
/// 1. Application title with sparkle decorations.
/// 2. A 60-column `=` separator.
/// 3. `[ source | metric | timezone ]`.
pub struct Header<'a> {
    /// File name of the loaded export, or `None` when nothing is loaded.
    pub source: Option<&'a str>,
    /// Metric label, e.g. "Views" or "Minutes".
    pub metric: &'a str,
    pub timezone: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: Option<&'a str>, metric: &'a str, timezone: &'a str, theme: &'a Theme) -> Self {
        Self {
            source,
            metric,
            timezone,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        let source = match self.source {
            Some(name) => Span::styled(name.to_string(), self.theme.value),
            None => Span::styled("no file", self.theme.dim),
        };

        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_sparkle),
                Span::styled(" WATCHLOG VIEWING HISTORY ", self.theme.header),
                Span::styled(SPARKLES, self.theme.header_sparkle),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                source,
                Span::styled(" | ", self.theme.label),
                Span::styled(self.metric.to_lowercase(), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.timezone.to_lowercase(), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
