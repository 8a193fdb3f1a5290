use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Severity recognized across the supported body formats.
///
/// `Unknown` covers unstructured lines and unrecognized level tokens; it
/// serializes as the empty string so viewers can render it unstyled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Unknown,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Unknown => "",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, LogLevel::Unknown)
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Map an application-emitted level token onto the fixed level set.
///
/// The zap aliases collapse: `warning` folds into `warn`, and the
/// panic-family tokens (`dpanic`, `panic`, `fatal`) fold into `error`.
/// Unrecognized tokens yield `None`.
pub fn map_level(token: &str) -> Option<LogLevel> {
    match token.to_ascii_lowercase().as_str() {
        "debug" => Some(LogLevel::Debug),
        "info" => Some(LogLevel::Info),
        "warn" | "warning" => Some(LogLevel::Warn),
        "error" | "dpanic" | "panic" | "fatal" => Some(LogLevel::Error),
        _ => None,
    }
}

/// Normalized record for one pod log line.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Always populated: application time when the body carried one,
    /// otherwise the ingestion time, otherwise wall clock at parse time.
    pub timestamp: DateTime<Utc>,

    pub level: LogLevel,

    pub message: String,

    /// Name of the source container.
    pub container: String,

    /// Auxiliary structured data. Omitted entirely when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Map<String, Value>>,
}
