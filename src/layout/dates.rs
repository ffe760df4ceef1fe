use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

const DATE_TIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a workflow date into a UTC wall-clock time.
///
/// Accepts RFC 3339 timestamps (offsets are normalized to UTC), naive
/// date-times and plain `YYYY-MM-DD` dates, which resolve to midnight.
/// Anything else is treated as an absent date.
pub fn parse_workflow_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_utc());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Whole calendar days from `today` to `date`.
pub fn days_between(today: NaiveDate, date: NaiveDate) -> i64 {
    date.signed_duration_since(today).num_days()
}

/// `ceil((date - now) / 1 day)` on millisecond precision.
pub fn ceil_days(now: NaiveDateTime, date: NaiveDateTime) -> i64 {
    let millis = date.signed_duration_since(now).num_milliseconds();
    let days = millis.div_euclid(DAY_MS);
    if millis.rem_euclid(DAY_MS) > 0 {
        days + 1
    } else {
        days
    }
}

pub fn add_days(base: NaiveDateTime, days: u64) -> NaiveDateTime {
    base.checked_add_days(Days::new(days)).unwrap_or(base)
}

pub fn format_iso(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
