use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone as _, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

/// Validate that `tz_name` is a recognised IANA timezone identifier.
pub fn validate_timezone(tz_name: &str) -> bool {
    tz_name.parse::<Tz>().is_ok()
}

// ── DayKeyResolver ────────────────────────────────────────────────────────────

/// Naive date-time layouts tried in order, most specific first.
const NAIVE_DATETIME_FMTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Naive calendar-date layouts that mean local midnight.
///
/// Two-digit years go first: `%Y` would happily read `24` as year 24.
const NAIVE_DATE_FMTS: &[&str] = &["%m/%d/%y", "%m/%d/%Y"];

/// Turns exported start-time strings into UTC calendar-day keys.
///
/// Naive values (no offset) from a local-time column are interpreted in the
/// configured timezone; values from a UTC column are interpreted as UTC.
/// Either way the resulting instant is reduced to its UTC `YYYY-MM-DD`.
#[derive(Debug, Clone)]
pub struct DayKeyResolver {
    local_tz: Tz,
}

impl DayKeyResolver {
    /// Create a resolver whose local timezone is `tz_name`.
    ///
    /// Unknown names fall back to UTC with a warning.
    pub fn new(tz_name: &str) -> Self {
        let tz = tz_name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "DayKeyResolver: unrecognised timezone \"{}\", falling back to UTC",
                tz_name
            );
            Tz::UTC
        });
        Self { local_tz: tz }
    }

    /// The timezone used for naive local start times.
    pub fn local_tz(&self) -> Tz {
        self.local_tz
    }

    /// Day key for a wall-clock start time in the local timezone.
    pub fn local_day_key(&self, s: &str) -> Option<String> {
        parse_instant(s, self.local_tz).map(day_key)
    }

    /// Day key for a start time already expressed in UTC.
    pub fn utc_day_key(&self, s: &str) -> Option<String> {
        parse_instant(s, Tz::UTC).map(day_key)
    }
}

impl Default for DayKeyResolver {
    fn default() -> Self {
        Self { local_tz: Tz::UTC }
    }
}

/// Format a UTC instant as an ISO calendar-day key.
pub fn day_key(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// Parse a date or date-time string into a UTC instant.
///
/// * RFC 3339 values carry their own offset.
/// * A bare ISO date (`2024-01-15`) is UTC midnight.
/// * Other naive values are interpreted in `naive_tz`.
///
/// Returns `None` for empty strings, unrecognised layouts, and local times
/// that fall in a DST gap.
pub fn parse_instant(s: &str, naive_tz: Tz) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    let naive = NAIVE_DATETIME_FMTS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NAIVE_DATE_FMTS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        });

    match naive {
        Some(naive) => naive_tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
        None => {
            debug!("could not parse start time \"{}\"", s);
            None
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
