//! Client-side diagnostic event logging for ProjectFlow
//!
//! A `DebugLogger` accepts leveled, categorized events from anywhere in
//! the application, redacts sensitive payload fields, keeps a bounded
//! in-memory buffer, and fans out to the enabled sinks:
//!
//! - console rendering through `tracing`
//! - a durable key-value store (one entry array per session, plus the
//!   persisted configuration)
//! - a UDP JSON-line stream for external monitors (production only)
//!
//! The logger never raises an error or panic out of a logging call; sink
//! failures degrade to warnings. See `DebugLogger` for the full surface.

pub mod broadcast;
pub mod buffer;
pub mod config;
pub mod console;
pub mod constants;
pub mod entry;
pub mod error;
pub mod filter;
pub mod hooks;
pub mod logger;
pub mod receiver;
pub mod redact;
pub mod storage;

pub use config::{CategoryFilter, Environment, LoggerConfig};
pub use entry::{LogEntry, LogLevel, Payload};
pub use error::{LogError, Result};
pub use filter::QueryFilter;
pub use hooks::{FaultEvent, FaultHandler, FaultKind, FaultObserver, PanicHook};
pub use logger::{create_logger, DebugLogger, TimerGuard};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

/// Initialize the `tracing` backend the console sink renders through.
///
/// Call early in main() before any logging occurs. Set `verbose` to true
/// to surface DEBUG and VERBOSE entries.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = if verbose { "trace" } else { "info" };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(false)
                .compact(),
        )
        .with(tracing_subscriber::EnvFilter::new(level))
        .try_init();
}
