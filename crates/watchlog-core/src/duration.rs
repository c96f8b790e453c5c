//! Lenient parsing of free-text watch durations into whole minutes.

use std::sync::OnceLock;

use regex::Regex;

struct DurationPatterns {
    hms: Regex,
    ms: Regex,
    hours_minutes: Regex,
    minutes: Regex,
    bare: Regex,
}

fn patterns() -> &'static DurationPatterns {
    static PATTERNS: OnceLock<DurationPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| DurationPatterns {
        hms: Regex::new(r"^(\d+):(\d{1,2}):(\d{1,2})$").expect("regex is valid"),
        ms: Regex::new(r"^(\d+):(\d{1,2})$").expect("regex is valid"),
        hours_minutes: Regex::new(r"(?i)^(\d+)\s*h(?:\s*(\d+)\s*m(?:in(?:s)?)?)?$")
            .expect("regex is valid"),
        minutes: Regex::new(r"(?i)^(\d+)\s*m(?:in(?:s)?)?$").expect("regex is valid"),
        bare: Regex::new(r"^\d+$").expect("regex is valid"),
    })
}

/// Parse a duration string into whole minutes.
///
/// Accepted forms, first match wins:
///
/// * `H:MM:SS`  → `H*60 + MM + SS/60`
/// * `MM:SS`    → `MM + SS/60`
/// * `Xh Ym` / `Xh`
/// * `Xm` / `X min` / `X mins`
/// * a bare integer, taken as minutes
///
/// Seconds are floored. Anything else (including `None`) yields `0`.
///
/// # Examples
///
/// ```
/// use watchlog_core::duration::parse_duration_minutes;
///
/// assert_eq!(parse_duration_minutes(Some("1:02:03")), 62);
/// assert_eq!(parse_duration_minutes(Some("45:30")), 45);
/// assert_eq!(parse_duration_minutes(Some("2h 5m")), 125);
/// assert_eq!(parse_duration_minutes(Some("10m")), 10);
/// assert_eq!(parse_duration_minutes(Some("abc")), 0);
/// ```
pub fn parse_duration_minutes(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };
    let s = raw.trim();
    if s.is_empty() {
        return 0;
    }

    let p = patterns();

    if let Some(caps) = p.hms.captures(s) {
        return num(&caps, 1) * 60 + num(&caps, 2) + num(&caps, 3) / 60;
    }
    if let Some(caps) = p.ms.captures(s) {
        return num(&caps, 1) + num(&caps, 2) / 60;
    }
    if let Some(caps) = p.hours_minutes.captures(s) {
        return num(&caps, 1) * 60 + num(&caps, 2);
    }
    if let Some(caps) = p.minutes.captures(s) {
        return num(&caps, 1);
    }
    if p.bare.is_match(s) {
        return s.parse().unwrap_or(0);
    }

    0
}

/// Numeric value of capture group `idx`, or 0 when absent or overflowing.
fn num(caps: &regex::Captures<'_>, idx: usize) -> u64 {
    caps.get(idx)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .unwrap_or(0)
}
