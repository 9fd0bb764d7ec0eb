//! Parsing and relative formatting of server timestamps.
//!
//! The service has emitted creation times both as RFC 3339 strings and as
//! unix epochs (seconds or milliseconds) stored as strings.

use chrono::{DateTime, TimeDelta, Utc};

/// Epoch values above this are treated as milliseconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Parse a server timestamp. Returns `None` for anything unrecognized.
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(epoch) = raw.parse::<i64>() {
        return if epoch.abs() > MILLIS_THRESHOLD {
            DateTime::from_timestamp_millis(epoch)
        } else {
            DateTime::from_timestamp(epoch, 0)
        };
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Human distance between `then` and `now`, with an "ago" suffix.
///
/// Times in the future are clamped to "less than a minute ago".
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - then).max(TimeDelta::zero());
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "less than a minute ago".to_string()
    } else if minutes < 45 {
        plural(minutes, "minute")
    } else if hours < 24 {
        format!("about {}", plural(hours.max(1), "hour"))
    } else if days < 30 {
        plural(days, "day")
    } else if days < 365 {
        plural(days / 30, "month")
    } else {
        format!("about {}", plural(days / 365, "year"))
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_known_forms() {
        let secs = parse("1718000000").unwrap();
        let millis = parse("1718000000000").unwrap();
        let rfc = parse("2024-06-10T06:13:20Z").unwrap();

        assert_eq!(secs, millis);
        assert_eq!(secs, rfc);
        assert!(parse("yesterday").is_none());
        assert!(parse("  ").is_none());
    }

    #[test]
    fn formats_relative_distance() {
        let now = parse("2024-06-10T12:00:00Z").unwrap();
        let at = |s: &str| parse(s).unwrap();

        assert_eq!(time_ago(at("2024-06-10T11:59:30Z"), now), "less than a minute ago");
        assert_eq!(time_ago(at("2024-06-10T11:59:00Z"), now), "1 minute ago");
        assert_eq!(time_ago(at("2024-06-10T11:30:00Z"), now), "30 minutes ago");
        assert_eq!(time_ago(at("2024-06-10T09:00:00Z"), now), "about 3 hours ago");
        assert_eq!(time_ago(at("2024-06-07T12:00:00Z"), now), "3 days ago");
        assert_eq!(time_ago(at("2024-03-10T12:00:00Z"), now), "3 months ago");
        assert_eq!(time_ago(at("2022-06-10T12:00:00Z"), now), "about 2 years ago");
        assert_eq!(time_ago(at("2024-06-11T12:00:00Z"), now), "less than a minute ago");
    }
}
