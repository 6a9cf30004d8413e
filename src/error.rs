//! Centralized error types for the logger
//!
//! All flowlog errors are represented by the `LogError` enum.
//! Use `Result<T>` as shorthand for `std::result::Result<T, LogError>`.
//!
//! None of these ever reach a call site of `DebugLogger::log` or its
//! wrappers; they surface only from store construction and the receiver.

use std::fmt;
use std::path::PathBuf;

/// All flowlog errors
#[derive(Debug)]
pub enum LogError {
    // === Storage ===
    /// Store root directory could not be created
    StorageDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write a value to the durable store
    StorageWrite {
        key: String,
        source: std::io::Error,
    },
    /// Failed to remove a value from the durable store
    StorageRemove {
        key: String,
        source: std::io::Error,
    },

    // === Configuration ===
    /// Persisted configuration could not be parsed
    ConfigParse { reason: String },

    // === Network ===
    /// Failed to bind the receiver socket
    SocketBind {
        addr: String,
        source: std::io::Error,
    },
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StorageDir { source, .. }
            | Self::StorageWrite { source, .. }
            | Self::StorageRemove { source, .. }
            | Self::SocketBind { source, .. } => Some(source),
            Self::ConfigParse { .. } => None,
        }
    }
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StorageDir { path, .. } => {
                write!(f, "Cannot create store directory: {}", path.display())
            }
            Self::StorageWrite { key, .. } => write!(f, "Cannot write store key: {}", key),
            Self::StorageRemove { key, .. } => write!(f, "Cannot remove store key: {}", key),
            Self::ConfigParse { reason } => write!(f, "Invalid logger config: {}", reason),
            Self::SocketBind { addr, .. } => write!(f, "Cannot bind receiver socket {}", addr),
        }
    }
}

/// Alias for Result with LogError
pub type Result<T> = std::result::Result<T, LogError>;
