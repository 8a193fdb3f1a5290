use crate::formats::{BodyParser, LineContext};
use crate::model::{LogEntry, LogLevel};

/// Tier 3: unstructured fallback. Always matches.
pub struct Plain;

impl BodyParser for Plain {
    fn try_parse(&self, body: &str, ctx: &LineContext<'_>) -> Option<LogEntry> {
        Some(LogEntry {
            timestamp: ctx.fallback_timestamp(),
            level: LogLevel::Unknown,
            message: body.to_string(),
            container: ctx.container.to_string(),
            fields: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_plain_passthrough() {
        let ingested = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let ctx = LineContext {
            container: "runtime",
            ingested_at: Some(ingested),
        };
        let entry = Plain.try_parse("plain text line", &ctx).unwrap();

        assert_eq!(entry.level, LogLevel::Unknown);
        assert_eq!(entry.message, "plain text line");
        assert_eq!(entry.timestamp, ingested);
        assert!(entry.fields.is_none());
    }

    #[test]
    fn test_plain_without_ingestion_time_uses_wall_clock() {
        let ctx = LineContext {
            container: "runtime",
            ingested_at: None,
        };
        let before = Utc::now();
        let entry = Plain.try_parse("x", &ctx).unwrap();
        assert!(entry.timestamp >= before);
    }
}
