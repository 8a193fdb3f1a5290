use serde_json::Value;

use crate::formats::{BodyParser, LineContext};
use crate::ingestion::parse_date_string;
use crate::model::{map_level, LogEntry};

/// Tier 2: tab-delimited development output of the form
/// `time \t LEVEL \t caller \t message [\t json-fields]`.
///
/// The tier only claims a body when it splits into at least four parts and
/// the second part is a recognizable level token; a right-shaped line with an
/// unknown level falls through to the plain tier.
pub struct TabDelimited;

impl BodyParser for TabDelimited {
    fn try_parse(&self, body: &str, ctx: &LineContext<'_>) -> Option<LogEntry> {
        let parts: Vec<&str> = body.split('\t').collect();
        if parts.len() < 4 {
            return None;
        }
        let level = map_level(parts[1])?;

        let timestamp = parse_date_string(parts[0]).unwrap_or_else(|| ctx.fallback_timestamp());

        // Trailing parts are one JSON object that may itself contain tabs.
        let fields = if parts.len() > 4 {
            let tail = parts[4..].join("\t");
            match serde_json::from_str::<Value>(&tail) {
                Ok(Value::Object(map)) if !map.is_empty() => Some(map),
                _ => None,
            }
        } else {
            None
        };

        Some(LogEntry {
            timestamp,
            level,
            message: parts[3].to_string(),
            container: ctx.container.to_string(),
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LogLevel;
    use chrono::{TimeZone, Utc};

    fn ctx() -> LineContext<'static> {
        LineContext {
            container: "runtime",
            ingested_at: Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()),
        }
    }

    #[test]
    fn test_dev_line_basic() {
        let body = "2024-01-15T10:31:05.123\tINFO\tserver/serve.go:42\tlistening on :8080";
        let entry = TabDelimited.try_parse(body, &ctx()).unwrap();

        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message, "listening on :8080");
        assert!(entry.fields.is_none());
        assert_eq!(
            entry.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 31, 5).unwrap()
                + chrono::Duration::milliseconds(123)
        );
    }

    #[test]
    fn test_trailing_json_fields() {
        let body = "2024-01-15T10:31:05\tWARN\tcache/store.go:9\tevicting\t{\"keys\": 12, \"reason\": \"pressure\"}";
        let entry = TabDelimited.try_parse(body, &ctx()).unwrap();
        let fields = entry.fields.unwrap();
        assert_eq!(fields["keys"], 12);
        assert_eq!(fields["reason"], "pressure");
    }

    #[test]
    fn test_trailing_garbage_leaves_fields_unset() {
        let body = "2024-01-15T10:31:05\tERROR\tx.go:1\tboom\tnot json at all";
        let entry = TabDelimited.try_parse(body, &ctx()).unwrap();
        assert_eq!(entry.level, LogLevel::Error);
        assert!(entry.fields.is_none());
    }

    #[test]
    fn test_unrecognized_level_token_rejects_line() {
        let body = "2024-01-15T10:31:05\tNOTICE\tx.go:1\tmsg";
        assert!(TabDelimited.try_parse(body, &ctx()).is_none());
    }

    #[test]
    fn test_too_few_parts_rejects_line() {
        assert!(TabDelimited.try_parse("a\tINFO\tb", &ctx()).is_none());
        assert!(TabDelimited.try_parse("no tabs here", &ctx()).is_none());
    }

    #[test]
    fn test_unparseable_time_falls_back_to_ingestion() {
        let body = "???\tDEBUG\tx.go:1\tmsg";
        let entry = TabDelimited.try_parse(body, &ctx()).unwrap();
        assert_eq!(entry.timestamp, ctx().ingested_at.unwrap());
        assert_eq!(entry.level, LogLevel::Debug);
    }
}
