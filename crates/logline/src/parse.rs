//! Tier driver: strict precedence over the body formats.

use crate::formats::plain::Plain;
use crate::formats::structured::StructuredJson;
use crate::formats::tabbed::TabDelimited;
use crate::formats::{BodyParser, LineContext};
use crate::ingestion::split_ingestion_timestamp;
use crate::model::{LogEntry, LogLevel};

/// Parse one raw pod log line into a normalized entry.
///
/// Total over arbitrary input: malformed content degrades tier by tier down
/// to the plain fallback, and the returned timestamp is always populated.
pub fn parse_log_line(line: &str, container: &str) -> LogEntry {
    let (ingested_at, body) = split_ingestion_timestamp(line);
    let ctx = LineContext {
        container,
        ingested_at,
    };

    let tiers: [&dyn BodyParser; 3] = [&StructuredJson, &TabDelimited, &Plain];
    for tier in tiers {
        if let Some(entry) = tier.try_parse(body, &ctx) {
            return entry;
        }
    }

    // Plain always matches; this only guards against a future tier refactor.
    LogEntry {
        timestamp: ctx.fallback_timestamp(),
        level: LogLevel::Unknown,
        message: body.to_string(),
        container: container.to_string(),
        fields: None,
    }
}

/// Parse a multi-line log blob, skipping blank lines. Ordering is preserved;
/// sorting by timestamp is the viewer's concern.
pub fn parse_log_lines(blob: &str, container: &str) -> Vec<LogEntry> {
    blob.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_log_line(line, container))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_structured_line_with_ingestion_prefix() {
        let line = r#"2024-01-15T10:30:00Z {"level":"warn","ts":1706789012.0,"msg":"high latency"}"#;
        let entry = parse_log_line(line, "facade");

        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.message, "high latency");
        assert_eq!(entry.container, "facade");
        // Application-reported ts wins over the ingestion prefix.
        assert_eq!(entry.timestamp, Utc.timestamp_opt(1706789012, 0).unwrap());
    }

    #[test]
    fn test_plain_line() {
        let entry = parse_log_line("plain text line", "runtime");
        assert_eq!(entry.level, LogLevel::Unknown);
        assert_eq!(entry.message, "plain text line");
        assert_eq!(entry.container, "runtime");
        assert!(entry.fields.is_none());
    }

    #[test]
    fn test_structured_precedes_tabbed() {
        // A JSON body containing tabs must be handled by the structured tier.
        let line = "{\"level\":\"info\",\"msg\":\"a\\tb\\tc\\td\"}";
        let entry = parse_log_line(line, "c");
        assert_eq!(entry.message, "a\tb\tc\td");
        assert_eq!(entry.level, LogLevel::Info);
    }

    #[test]
    fn test_malformed_json_degrades_to_plain() {
        let line = "2024-01-15T10:30:00Z {not valid json";
        let entry = parse_log_line(line, "c");
        assert_eq!(entry.level, LogLevel::Unknown);
        assert_eq!(entry.message, "{not valid json");
        assert_eq!(
            entry.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_top_level_array_degrades_to_plain() {
        let entry = parse_log_line("[\"a\",\"b\"]", "c");
        assert_eq!(entry.level, LogLevel::Unknown);
        assert_eq!(entry.message, "[\"a\",\"b\"]");
    }

    #[test]
    fn test_empty_line_is_total() {
        let entry = parse_log_line("", "c");
        assert_eq!(entry.message, "");
        assert_eq!(entry.level, LogLevel::Unknown);
    }

    #[test]
    fn test_tabbed_shape_with_bad_level_degrades_to_plain() {
        let line = "2024-01-15T10:31:05\tNOTICE\tx.go:1\tmsg";
        let entry = parse_log_line(line, "c");
        assert_eq!(entry.level, LogLevel::Unknown);
        assert_eq!(entry.message, line);
    }

    #[test]
    fn test_multi_line_blob_skips_blanks() {
        let blob = "first line\n\n  \n{\"level\":\"error\",\"msg\":\"second\"}\n";
        let entries = parse_log_lines(blob, "c");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first line");
        assert_eq!(entries[1].message, "second");
        assert_eq!(entries[1].level, LogLevel::Error);
    }
}
