//! Process fault hooks
//!
//! Converts uncaught faults from the host runtime into observable events.
//! The `FaultObserver` trait isolates the logger from any particular
//! runtime's global-error API; `PanicHook` is the adapter for process
//! panics. The logger subscribes via `DebugLogger::attach_fault_observer`
//! and records every observed fault as an ERROR entry.

use crate::constants::MAX_FAULT_PAYLOAD_CHARS;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What kind of fault was observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Synchronous uncaught error
    UncaughtError,
    /// Asynchronous failure nobody handled
    UnhandledRejection,
}

/// An uncaught fault reported by the host runtime
#[derive(Debug, Clone)]
pub struct FaultEvent {
    pub kind: FaultKind,
    pub message: String,
    /// `file:line` where the fault surfaced, when known
    pub source: Option<String>,
    /// Captured stack trace, when the runtime provides one
    pub stack: Option<String>,
}

pub type FaultHandler = Arc<dyn Fn(FaultEvent) + Send + Sync>;

/// A source of uncaught-fault notifications
pub trait FaultObserver {
    /// Register the handler invoked for every observed fault
    fn on_uncaught(&self, handler: FaultHandler);
}

static PANIC_HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Fault observer backed by the process panic hook.
///
/// Installation is process-wide and happens once; later registrations are
/// no-ops. The previously installed hook keeps running after the handler.
pub struct PanicHook;

impl FaultObserver for PanicHook {
    fn on_uncaught(&self, handler: FaultHandler) {
        if PANIC_HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
            return;
        }

        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let source = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()));
            handler(FaultEvent {
                kind: FaultKind::UncaughtError,
                message: payload_summary(info),
                source,
                stack: Some(std::backtrace::Backtrace::force_capture().to_string()),
            });
            previous(info);
        }));
    }
}

fn payload_summary(info: &panic::PanicHookInfo<'_>) -> String {
    let payload = if let Some(message) = info.payload().downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = info.payload().downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };
    cap_message(&payload, MAX_FAULT_PAYLOAD_CHARS)
}

/// Flatten newlines and cap length; fault payloads can contain anything
fn cap_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut capped = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        capped.push_str("...");
    }
    capped
}
