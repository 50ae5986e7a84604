//! Display Formatting
//!
//! Relative dates and durations. `now` is always passed in so rendering
//! stays a pure function.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 86_400_000;
const WEEK_MS: i64 = 604_800_000;

/// RFC 3339, or a naive `YYYY-MM-DD[T ]HH:MM:SS[.fff]` read as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn plural(n: i64, unit: &str) -> String {
    format!("{} {}{} ago", n, unit, if n == 1 { "" } else { "s" })
}

/// "Never", "Just now", "N minutes ago" ... or the calendar date after a week
pub fn format_date(raw: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return "Never".to_string();
    };
    let Some(date) = parse_timestamp(raw) else {
        return raw.to_string();
    };

    let diff = (now - date).num_milliseconds();
    if diff < MINUTE_MS {
        "Just now".to_string()
    } else if diff < HOUR_MS {
        plural(diff / MINUTE_MS, "minute")
    } else if diff < DAY_MS {
        plural(diff / HOUR_MS, "hour")
    } else if diff < WEEK_MS {
        plural(diff / DAY_MS, "day")
    } else {
        date.format("%Y-%m-%d").to_string()
    }
}

/// Elapsed time between start and end (or now while still running)
pub fn format_duration(start: Option<&str>, end: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(start) = start.and_then(parse_timestamp) else {
        return String::new();
    };
    let end = end.and_then(parse_timestamp).unwrap_or(now);

    let diff = (end - start).num_milliseconds();
    if diff < 1000 {
        return "< 1s".to_string();
    }

    let seconds = diff / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes % 60, seconds % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}
