//! Normalization of raw Kubernetes pod log lines into structured entries.
//!
//! Pod logs interleave an injected ingestion timestamp with whatever the
//! application wrote. Bodies arrive in three shapes, tried in strict order:
//!
//! - `formats/structured.rs`: single-line JSON objects (zap production encoder)
//! - `formats/tabbed.rs`: tab-delimited development output
//! - `formats/plain.rs`: everything else, passed through untouched
//!
//! The entry point is [`parse_log_line`]. It is total: malformed content is
//! control flow for tier fallback, never an error that escapes.

pub mod formats;
pub mod ingestion;
pub mod model;
pub mod parse;

pub use model::{LogEntry, LogLevel};
pub use parse::{parse_log_line, parse_log_lines};
