//! Body-format tiers, tried in strict precedence order by the driver.

pub mod plain;
pub mod structured;
pub mod tabbed;

use chrono::{DateTime, Utc};

use crate::model::LogEntry;

/// Per-line context shared by every tier.
pub struct LineContext<'a> {
    pub container: &'a str,
    /// Ingestion timestamp stripped from the line, when one was present.
    pub ingested_at: Option<DateTime<Utc>>,
}

impl LineContext<'_> {
    /// Timestamp fallback chain shared by the tiers: ingestion time if the
    /// line carried one, otherwise wall clock.
    pub fn fallback_timestamp(&self) -> DateTime<Utc> {
        self.ingested_at.unwrap_or_else(Utc::now)
    }
}

/// One tier of the body-format cascade.
///
/// Returns `None` when the body does not meet the tier's structural
/// preconditions; the driver then falls through to the next tier.
pub trait BodyParser: Send + Sync {
    fn try_parse(&self, body: &str, ctx: &LineContext<'_>) -> Option<LogEntry>;
}
