//! Console sink
//!
//! Renders entries as `[<local time>] [<LEVEL>] [<category>] [<component>]
//! <message> <data>` and routes them through the `tracing` macro matching
//! the severity (VERBOSE maps to `trace!`).

use crate::entry::{LogEntry, LogLevel, Payload};
use chrono::Local;

/// Format an entry header for console output (without the payload)
pub fn format_entry(entry: &LogEntry) -> String {
    let time = entry.timestamp.with_timezone(&Local).format("%H:%M:%S%.3f");
    let mut line = format!("[{}] [{}] [{}]", time, entry.level.as_str(), entry.category);
    if let Some(component) = &entry.component {
        line.push_str(" [");
        line.push_str(component);
        line.push(']');
    }
    line.push(' ');
    line.push_str(&entry.message);
    line
}

/// Emit an entry through `tracing` at the matching severity
pub fn emit(entry: &LogEntry) {
    let mut line = format_entry(entry);
    if let Some(payload) = &entry.data {
        line.push(' ');
        line.push_str(&format_payload(payload));
    }
    match entry.level {
        LogLevel::Error => tracing::error!(target: "flowlog", "{}", line),
        LogLevel::Warn => tracing::warn!(target: "flowlog", "{}", line),
        LogLevel::Info => tracing::info!(target: "flowlog", "{}", line),
        LogLevel::Debug => tracing::debug!(target: "flowlog", "{}", line),
        LogLevel::Verbose => tracing::trace!(target: "flowlog", "{}", line),
    }
}

/// Compact JSON rendering of the payload
fn format_payload(payload: &Payload) -> String {
    serde_json::to_string(payload).unwrap_or_else(|_| "<unprintable>".to_string())
}
