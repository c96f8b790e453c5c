use crate::models::Metric;

/// Format an integer with thousands separators.
///
/// # Examples
///
/// ```
/// use watchlog_core::formatting::format_number;
///
/// assert_eq!(format_number(0), "0");
/// assert_eq!(format_number(999), "999");
/// assert_eq!(format_number(1234567), "1,234,567");
/// ```
pub fn format_number(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format a duration in minutes as a human-readable string.
///
/// * `< 60` minutes → `"45m"`
/// * `≥ 60` minutes, no remainder → `"3h"`
/// * `≥ 60` minutes, with remainder → `"3h 45m"`
///
/// # Examples
///
/// ```
/// use watchlog_core::formatting::format_minutes;
///
/// assert_eq!(format_minutes(45), "45m");
/// assert_eq!(format_minutes(60), "1h");
/// assert_eq!(format_minutes(225), "3h 45m");
/// ```
pub fn format_minutes(minutes: u64) -> String {
    if minutes < 60 {
        format!("{}m", minutes)
    } else {
        let hours = minutes / 60;
        let mins = minutes % 60;
        if mins == 0 {
            format!("{}h", format_number(hours))
        } else {
            format!("{}h {}m", format_number(hours), mins)
        }
    }
}

/// Format a metric value the way the dashboard shows it: plain counts for
/// views, hours and minutes for watch time.
pub fn format_metric(metric: Metric, value: u64) -> String {
    match metric {
        Metric::Count => format_number(value),
        Metric::Minutes => format_minutes(value),
    }
}

/// Insert `,` separators every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
