use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::formats::{BodyParser, LineContext};
use crate::ingestion::{from_epoch_seconds, parse_date_string};
use crate::model::{map_level, LogEntry, LogLevel};

/// Top-level keys consumed by normalization; everything else lands in
/// `fields`.
const RESERVED_KEYS: [&str; 7] = ["level", "msg", "ts", "time", "caller", "stacktrace", "logger"];

/// Tier 1: single-line JSON object bodies (zap-style production encoder).
pub struct StructuredJson;

impl BodyParser for StructuredJson {
    fn try_parse(&self, body: &str, ctx: &LineContext<'_>) -> Option<LogEntry> {
        // Cheap precondition before paying for a parse.
        if !body.starts_with('{') {
            return None;
        }
        let value: Value = serde_json::from_str(body).ok()?;
        let obj = value.as_object()?;

        // A record with no usable msg still shows the raw body rather
        // than nothing.
        let message = match obj.get("msg") {
            Some(Value::String(s)) => s.clone(),
            _ => body.to_string(),
        };

        let level = obj
            .get("level")
            .and_then(Value::as_str)
            .and_then(map_level)
            .unwrap_or(LogLevel::Unknown);

        let timestamp = app_timestamp(obj).unwrap_or_else(|| ctx.fallback_timestamp());

        let mut fields = Map::new();
        for (key, val) in obj {
            if !RESERVED_KEYS.contains(&key.as_str()) {
                fields.insert(key.clone(), val.clone());
            }
        }
        let fields = if fields.is_empty() { None } else { Some(fields) };

        Some(LogEntry {
            timestamp,
            level,
            message,
            container: ctx.container.to_string(),
            fields,
        })
    }
}

/// Application-reported time takes precedence over ingestion time:
/// numeric `ts` is Unix-epoch seconds, string `ts` and `time` are date
/// strings.
fn app_timestamp(obj: &Map<String, Value>) -> Option<DateTime<Utc>> {
    match obj.get("ts") {
        Some(Value::Number(n)) => {
            if let Some(dt) = n.as_f64().and_then(from_epoch_seconds) {
                return Some(dt);
            }
        }
        Some(Value::String(s)) => {
            if let Some(dt) = parse_date_string(s) {
                return Some(dt);
            }
        }
        _ => {}
    }
    obj.get("time").and_then(Value::as_str).and_then(parse_date_string)
}
