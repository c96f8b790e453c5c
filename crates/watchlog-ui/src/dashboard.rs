//! Dashboard rendering for the watchlog TUI.
//!
//! Lays out the header, a status line, the per-day line chart, the ranked
//! title bar chart and a footer holding either key hints or the path prompt.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    symbols,
    text::{Line, Span, Text},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use watchlog_core::formatting::format_metric;
use watchlog_core::models::{DayPoint, Metric, TitlePoint};
use watchlog_data::aggregator::Report;
use watchlog_data::ranking::{title_page, top_titles};

use crate::components::{Header, KeyHints, PathPrompt, StatusLine};
use crate::themes::Theme;

/// Longest title label, in terminal columns.
const MAX_LABEL_WIDTH: usize = 40;

/// Everything the dashboard needs for one frame.
pub struct DashboardView<'a> {
    pub report: &'a Report,
    /// Display name of the loaded file.
    pub source: Option<&'a str>,
    /// Display name of the file being parsed, if any.
    pub loading: Option<&'a str>,
    pub error: Option<&'a str>,
    pub timezone: &'a str,
    /// Requested page; clamped when rendering.
    pub page: usize,
    pub page_size: usize,
    /// Show only this many titles and disable paging.
    pub top: Option<usize>,
    pub prompt: Option<&'a PathPrompt>,
}

pub fn render_dashboard(frame: &mut Frame, area: Rect, view: &DashboardView<'_>, theme: &Theme) {
    let title_rows = match view.top {
        Some(n) => n,
        None => view.page_size,
    };
    // One row per bar, borders, and the page indicator.
    let bars_height = (title_rows.clamp(1, 50) + 3) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(bars_height),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Header::new(view.source, view.report.metric.label(), view.timezone, theme);
    frame.render_widget(Paragraph::new(Text::from(header.to_lines())), chunks[0]);

    let status = StatusLine {
        loading: view.loading,
        error: view.error,
        rows_seen: view.report.rows_seen,
        rows_skipped: view.report.rows_skipped,
        metric: view.report.metric,
        total: view.report.day_total(),
        theme,
    };
    frame.render_widget(Paragraph::new(status.to_line()), chunks[1]);

    if view.report.is_empty() {
        let body = chunks[2].union(chunks[3]);
        render_no_data(frame, body, theme);
    } else {
        render_day_chart(frame, chunks[2], view.report.metric, &view.report.by_day, theme);
        render_title_bars(frame, chunks[3], view, theme);
    }

    let footer = match view.prompt {
        Some(prompt) => prompt.to_line(theme),
        None => KeyHints {
            prompting: false,
            theme,
        }
        .to_line(),
    };
    frame.render_widget(Paragraph::new(footer), chunks[4]);
}

// ── Day series ───────────────────────────────────────────────────────────────

/// Line chart of the day series: day index on x, metric on y.
pub fn render_day_chart(
    frame: &mut Frame,
    area: Rect,
    metric: Metric,
    days: &[DayPoint],
    theme: &Theme,
) {
    let points: Vec<(f64, f64)> = days
        .iter()
        .enumerate()
        .map(|(i, d)| (i as f64, d.metric as f64))
        .collect();

    let max = days.iter().map(|d| d.metric).max().unwrap_or(0);
    let x_max = (days.len().saturating_sub(1)).max(1) as f64;
    let y_max = (max.max(1) as f64) * 1.1;

    let x_labels: Vec<Span> = match (days.first(), days.last()) {
        (Some(first), Some(last)) if days.len() > 1 => vec![
            Span::styled(first.day.clone(), theme.chart_axis),
            Span::styled(last.day.clone(), theme.chart_axis),
        ],
        (Some(only), _) => vec![Span::styled(only.day.clone(), theme.chart_axis)],
        _ => Vec::new(),
    };
    let y_labels = vec![
        Span::styled("0", theme.chart_axis),
        Span::styled(format_metric(metric, max), theme.chart_axis),
    ];

    let graph = if points.len() == 1 {
        GraphType::Scatter
    } else {
        GraphType::Line
    };

    let datasets = vec![Dataset::default()
        .name(metric.label())
        .marker(symbols::Marker::Braille)
        .graph_type(graph)
        .style(theme.chart_line)
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(panel(format!(" {} per day ", metric.label()), theme))
        .x_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, y_max])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

// ── Title ranking ────────────────────────────────────────────────────────────

/// Horizontal bar chart of the visible titles plus a page indicator.
pub fn render_title_bars(frame: &mut Frame, area: Rect, view: &DashboardView<'_>, theme: &Theme) {
    let ranked = &view.report.by_title;
    let (items, offset, footer) = match view.top {
        Some(n) => {
            let items = top_titles(ranked, n);
            let footer = format!("Top {} of {}", items.len(), ranked.len());
            (items, 0, footer)
        }
        None => {
            let page = title_page(ranked, view.page_size, view.page);
            let footer = format!("Page {} of {}", page.index + 1, page.count);
            (page.items, page.offset, footer)
        }
    };

    let label_width = (area.width as usize / 3).clamp(8, MAX_LABEL_WIDTH);
    let bars: Vec<Bar> = title_bars(items, offset, view.report.metric, label_width, theme);

    let block = panel(format!(" {} by title ", view.report.metric.label()), theme)
        .title_bottom(Line::from(Span::styled(format!(" {footer} "), theme.dim)).right_aligned());

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .value_style(theme.bar_value)
        .label_style(theme.bar_label)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn title_bars<'a>(
    items: &[TitlePoint],
    offset: usize,
    metric: Metric,
    label_width: usize,
    theme: &Theme,
) -> Vec<Bar<'a>> {
    items
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let rank = offset + i;
            let label = format!("{:>3}. {}", rank + 1, truncate_to_width(&point.title, label_width));
            Bar::default()
                .value(point.metric)
                .text_value(format_metric(metric, point.metric))
                .label(Line::from(label))
                .style(theme.bar_style(rank))
        })
        .collect()
}

/// Cut `s` to at most `max` terminal columns, ending in `…` when shortened.
pub fn truncate_to_width(s: &str, max: usize) -> String {
    let total: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let budget = max - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

// ── Placeholders ─────────────────────────────────────────────────────────────

/// Render a "no data" placeholder with instructions.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No viewing history loaded", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Export your viewing activity as CSV, then press 'o' to open it.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(panel(" watchlog ".to_string(), theme)),
        area,
    );
}

fn panel<'a>(title: String, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border)
        .title(Span::styled(title, theme.panel_title))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn report(days: usize, titles: usize) -> Report {
        Report {
            metric: Metric::Count,
            by_day: (0..days)
                .map(|i| DayPoint {
                    day: format!("1/{}/24", i + 1),
                    metric: (i as u64 % 5) + 1,
                })
                .collect(),
            by_title: (0..titles)
                .map(|i| TitlePoint {
                    title: format!("Title number {i}"),
                    metric: (titles - i) as u64,
                })
                .collect(),
            rows_seen: days * 3,
            rows_skipped: 0,
        }
    }

    fn view<'a>(report: &'a Report) -> DashboardView<'a> {
        DashboardView {
            report,
            source: Some("NetflixViewingHistory.csv"),
            loading: None,
            error: None,
            timezone: "UTC",
            page: 0,
            page_size: 8,
            top: None,
            prompt: None,
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn draw(view: &DashboardView<'_>, width: u16, height: u16) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_dashboard(frame, frame.area(), view, &theme))
            .unwrap();
        terminal
    }

    #[test]
    fn test_render_dashboard_shows_header_and_page() {
        let r = report(10, 20);
        let terminal = draw(&view(&r), 120, 40);
        let text = buffer_text(&terminal);
        assert!(text.contains("WATCHLOG"));
        assert!(text.contains("NetflixViewingHistory.csv"));
        assert!(text.contains("Page 1 of 3"));
        assert!(text.contains("Title number 0"));
        assert!(!text.contains("Title number 8"));
    }

    #[test]
    fn test_render_dashboard_second_page() {
        let r = report(10, 20);
        let mut v = view(&r);
        v.page = 1;
        let text = buffer_text(&draw(&v, 120, 40));
        assert!(text.contains("Page 2 of 3"));
        assert!(text.contains("Title number 8"));
        assert!(text.contains("9."));
    }

    #[test]
    fn test_render_dashboard_page_clamped() {
        let r = report(3, 5);
        let mut v = view(&r);
        v.page = 42;
        let text = buffer_text(&draw(&v, 120, 40));
        assert!(text.contains("Page 1 of 1"));
    }

    #[test]
    fn test_render_dashboard_top_mode() {
        let r = report(3, 20);
        let mut v = view(&r);
        v.top = Some(5);
        let text = buffer_text(&draw(&v, 120, 40));
        assert!(text.contains("Top 5 of 20"));
        assert!(!text.contains("Page "));
    }

    #[test]
    fn test_render_dashboard_empty_shows_placeholder() {
        let r = Report::default();
        let mut v = view(&r);
        v.source = None;
        let text = buffer_text(&draw(&v, 100, 30));
        assert!(text.contains("No viewing history loaded"));
        assert!(text.contains("no file"));
    }

    #[test]
    fn test_render_dashboard_error_and_prompt() {
        let r = report(2, 2);
        let prompt = PathPrompt::with_input("~/history.csv");
        let mut v = view(&r);
        v.error = Some("Too many fields: expected 2 fields but parsed 3 (row 4)");
        v.prompt = Some(&prompt);
        let text = buffer_text(&draw(&v, 120, 40));
        assert!(text.contains("Too many fields"));
        assert!(text.contains("Open CSV: ~/history.csv"));
    }

    #[test]
    fn test_render_dashboard_single_day_does_not_panic() {
        let r = report(1, 1);
        draw(&view(&r), 80, 24);
    }

    #[test]
    fn test_render_dashboard_tiny_terminal_does_not_panic() {
        let r = report(30, 40);
        draw(&view(&r), 20, 8);
    }

    #[test]
    fn test_render_dashboard_light_theme_minutes() {
        let mut r = report(5, 5);
        r.metric = Metric::Minutes;
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let theme = Theme::light();
        terminal
            .draw(|frame| render_dashboard(frame, frame.area(), &view(&r), &theme))
            .unwrap();
        assert!(buffer_text(&terminal).contains("Minutes per day"));
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Short", 10), "Short");
        assert_eq!(truncate_to_width("Exactly10!", 10), "Exactly10!");
        assert_eq!(truncate_to_width("A much longer title", 8), "A much …");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_truncate_to_width_wide_chars() {
        // Each CJK character occupies two columns.
        assert_eq!(truncate_to_width("進撃の巨人", 10), "進撃の巨人");
        assert_eq!(truncate_to_width("進撃の巨人", 6), "進撃…");
    }
}
