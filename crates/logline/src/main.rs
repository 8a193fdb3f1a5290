//! Normalize a raw pod log stream from stdin to NDJSON on stdout.
//!
//! Usage: `kubectl logs --timestamps <pod> -c <container> | logline <container>`

use std::io::{self, BufRead, Write};

use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let container = std::env::args().nth(1).unwrap_or_else(|| "unknown".to_string());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!("stopping on stdin read error: {}", err);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let entry = logline::parse_log_line(&line, &container);
        match serde_json::to_string(&entry) {
            Ok(json) => {
                if writeln!(out, "{}", json).is_err() {
                    // Downstream closed the pipe.
                    break;
                }
            }
            Err(err) => tracing::error!("failed to serialize entry: {}", err),
        }
    }
}
