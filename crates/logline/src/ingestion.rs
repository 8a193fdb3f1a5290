//! Splitting the injected ingestion timestamp off a raw pod log line.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Split a raw log line into its ingestion timestamp and application body.
///
/// Kubernetes prepends an RFC 3339 timestamp and a single space when logs are
/// fetched with timestamps enabled. The prefix is recognized by shape
/// (`YYYY-MM-DDT...` before the first space); anything else leaves the whole
/// line as the body.
pub fn split_ingestion_timestamp(line: &str) -> (Option<DateTime<Utc>>, &str) {
    if let Some((head, rest)) = line.split_once(' ') {
        if looks_like_iso_prefix(head) {
            return (parse_date_string(head), rest);
        }
    }
    (None, line)
}

/// `YYYY-MM-DDT` shape check on the leading token.
fn looks_like_iso_prefix(token: &str) -> bool {
    let b = token.as_bytes();
    b.len() > 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
        && b[10] == b'T'
}

/// Lenient date-string parsing: RFC 3339 first, then zoneless variants
/// interpreted as UTC. Returns `None` rather than guessing on garbage.
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Zoneless formats emitted by development encoders.
    const NAIVE_FORMATS: [&str; 3] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S%.f",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    None
}

/// Unix-epoch seconds (fractional allowed) to a UTC timestamp.
pub fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((secs * 1000.0) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_split_with_ingestion_prefix() {
        let (ts, body) = split_ingestion_timestamp("2024-01-15T10:30:00Z hello world");
        assert_eq!(ts, Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()));
        assert_eq!(body, "hello world");
    }

    #[test]
    fn test_split_without_prefix() {
        let (ts, body) = split_ingestion_timestamp("hello world");
        assert_eq!(ts, None);
        assert_eq!(body, "hello world");
    }

    #[test]
    fn test_split_non_date_first_token() {
        let (ts, body) = split_ingestion_timestamp("ERROR something broke");
        assert_eq!(ts, None);
        assert_eq!(body, "ERROR something broke");
    }

    #[test]
    fn test_split_no_space() {
        let (ts, body) = split_ingestion_timestamp("2024-01-15T10:30:00Z");
        assert_eq!(ts, None);
        assert_eq!(body, "2024-01-15T10:30:00Z");
    }

    #[test]
    fn test_parse_date_string_variants() {
        assert!(parse_date_string("2024-01-15T10:30:00Z").is_some());
        assert!(parse_date_string("2024-01-15T10:30:00.123456789Z").is_some());
        assert!(parse_date_string("2024-01-15T10:30:00+02:00").is_some());
        assert!(parse_date_string("2024-01-15T10:30:00.123").is_some());
        assert!(parse_date_string("2024-01-15 10:30:00").is_some());
        assert!(parse_date_string("not a date").is_none());
        assert!(parse_date_string("").is_none());
    }

    #[test]
    fn test_from_epoch_seconds() {
        let dt = from_epoch_seconds(1706789012.0).unwrap();
        assert_eq!(dt, Utc.timestamp_opt(1706789012, 0).unwrap());
        let dt = from_epoch_seconds(1706789012.5).unwrap();
        assert_eq!(dt.timestamp_millis(), 1706789012500);
        assert!(from_epoch_seconds(f64::NAN).is_none());
    }
}
