//! Log entry types
//!
//! Core types for representing diagnostic events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity of a diagnostic event, ordered from most to least severe.
///
/// The numeric rank runs from `Error` (0) to `Verbose` (4); an entry is
/// recorded when its rank is at most the configured minimum level's rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Verbose,
}

impl LogLevel {
    /// Numeric severity rank (0 = most severe)
    pub fn rank(self) -> u8 {
        match self {
            LogLevel::Error => 0,
            LogLevel::Warn => 1,
            LogLevel::Info => 2,
            LogLevel::Debug => 3,
            LogLevel::Verbose => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Verbose => "VERBOSE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "verbose" => Some(LogLevel::Verbose),
            _ => None,
        }
    }
}

/// Structured payload attached to an entry.
///
/// Closed over the two representable states: sanitized JSON, or the marker
/// left behind when sanitization failed. Absence is `Option<Payload>` on
/// the entry. Serialized untagged so the marker round-trips as a plain
/// `{error, original}` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    SanitizeFailure { error: String, original: String },
    Json(Value),
}

/// One recorded diagnostic event. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Creation time; serializes to RFC 3339
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    /// Free-form label, e.g. "API Call" or "Component Lifecycle"
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<Payload>,
    /// Originating UI component, when known
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub component: Option<String>,
    /// Navigation path at log time, derived by the logger
    pub route: String,
    /// Shared by all entries from one logger lifetime
    pub session_id: String,
}
