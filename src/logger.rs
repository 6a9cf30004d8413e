//! The diagnostic logger facade
//!
//! `DebugLogger` accepts leveled events from anywhere in the call graph,
//! filters them by configured verbosity and category, redacts payloads,
//! and fans out to the enabled sinks (console, durable storage, network).
//! Nothing in here surfaces an error or panic to a caller: sink failures
//! are downgraded to `tracing` warnings and the call returns normally.
//!
//! Construct one instance at the application's composition root (or use
//! `create_logger` for the file-backed default) and share it by `Arc`.

use crate::broadcast::Broadcaster;
use crate::buffer::EntryBuffer;
use crate::config::{CategoryFilter, Environment, LoggerConfig};
use crate::console;
use crate::constants::{CONFIG_STORAGE_KEY, STORAGE_KEY_PREFIX};
use crate::entry::{LogEntry, LogLevel, Payload};
use crate::filter::QueryFilter;
use crate::hooks::{FaultKind, FaultObserver};
use crate::redact;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Everything behind the one coarse mutex: config, buffer, route, store,
/// and the network sink handle. A config change is a single replace of
/// the whole struct field, never an incremental field write.
struct Inner {
    config: LoggerConfig,
    buffer: EntryBuffer,
    route: String,
    store: Box<dyn KeyValueStore>,
    network: Option<Broadcaster>,
}

impl Inner {
    /// Deliver a recorded entry to the buffer and every enabled sink.
    /// Each sink is fault-isolated from the others.
    fn fan_out(&mut self, storage_key: &str, entry: LogEntry) {
        self.buffer.push(entry.clone());

        if self.config.enable_console {
            console::emit(&entry);
        }
        if self.config.enable_storage {
            self.persist_buffer(storage_key);
        }
        if let Some(network) = &self.network {
            network.send(entry);
        }
    }

    fn persist_buffer(&mut self, storage_key: &str) {
        match serde_json::to_string(self.buffer.entries()) {
            Ok(json) => {
                if let Err(e) = self.store.set(storage_key, &json) {
                    warn!("log storage write failed: {}", e);
                }
            }
            Err(e) => warn!("log buffer serialization failed: {}", e),
        }
    }
}

pub struct DebugLogger {
    session_id: String,
    storage_key: String,
    inner: Mutex<Inner>,
}

impl DebugLogger {
    /// Create a logger with an in-memory store
    pub fn new(config: LoggerConfig) -> Self {
        Self::with_store(config, Box::new(MemoryStore::new()))
    }

    /// Create a logger backed by the given durable store.
    ///
    /// A configuration persisted under `debug_logger_config` overrides the
    /// supplied defaults; an unparsable one is ignored with a warning.
    pub fn with_store(mut config: LoggerConfig, store: Box<dyn KeyValueStore>) -> Self {
        if let Some(raw) = store.get(CONFIG_STORAGE_KEY) {
            match LoggerConfig::from_toml(&raw) {
                Ok(saved) => config = saved,
                Err(e) => warn!("ignoring persisted logger config: {}", e),
            }
        }

        let session_id = generate_session_id();
        let storage_key = format!("{}{}", STORAGE_KEY_PREFIX, session_id);
        let network = spawn_network(&config);

        Self {
            storage_key,
            session_id,
            inner: Mutex::new(Inner {
                buffer: EntryBuffer::new(config.max_storage_entries),
                route: "/".to_string(),
                store,
                network,
                config,
            }),
        }
    }

    /// Identifier shared by all entries from this logger's lifetime
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> LoggerConfig {
        self.inner.lock().config.clone()
    }

    // =========================================================================
    // Core logging
    // =========================================================================

    /// Record one event. Never blocks on I/O, never panics, never returns
    /// an error; a filtered call is a no-op with no side effects.
    pub fn log<T: Serialize + ?Sized>(
        &self,
        level: LogLevel,
        category: &str,
        message: &str,
        data: Option<&T>,
        component: Option<&str>,
    ) {
        self.record(level, category, message, || data.map(redact::sanitize), component);
    }

    pub fn error<T: Serialize + ?Sized>(
        &self,
        category: &str,
        message: &str,
        data: Option<&T>,
        component: Option<&str>,
    ) {
        self.log(LogLevel::Error, category, message, data, component);
    }

    pub fn warn<T: Serialize + ?Sized>(
        &self,
        category: &str,
        message: &str,
        data: Option<&T>,
        component: Option<&str>,
    ) {
        self.log(LogLevel::Warn, category, message, data, component);
    }

    pub fn info<T: Serialize + ?Sized>(
        &self,
        category: &str,
        message: &str,
        data: Option<&T>,
        component: Option<&str>,
    ) {
        self.log(LogLevel::Info, category, message, data, component);
    }

    pub fn debug<T: Serialize + ?Sized>(
        &self,
        category: &str,
        message: &str,
        data: Option<&T>,
        component: Option<&str>,
    ) {
        self.log(LogLevel::Debug, category, message, data, component);
    }

    pub fn verbose<T: Serialize + ?Sized>(
        &self,
        category: &str,
        message: &str,
        data: Option<&T>,
        component: Option<&str>,
    ) {
        self.log(LogLevel::Verbose, category, message, data, component);
    }

    /// Shared recording path. The filter check runs before the payload
    /// closure, so a dropped call does no sanitization work.
    fn record<F>(
        &self,
        level: LogLevel,
        category: &str,
        message: &str,
        payload: F,
        component: Option<&str>,
    ) where
        F: FnOnce() -> Option<Payload>,
    {
        let mut inner = self.inner.lock();
        if !inner.config.records(level, category) {
            return;
        }

        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            category: category.to_string(),
            message: message.to_string(),
            data: payload(),
            component: component.map(str::to_string),
            route: inner.route.clone(),
            session_id: self.session_id.clone(),
        };
        inner.fan_out(&self.storage_key, entry);
    }

    // =========================================================================
    // Specialized events
    // =========================================================================

    pub fn page_load(&self, url: &str, load_time_ms: Option<f64>) {
        self.log(
            LogLevel::Info,
            "Page Load",
            &format!("Page loaded: {}", url),
            Some(&json!({ "url": url, "loadTimeMs": load_time_ms })),
            None,
        );
    }

    pub fn page_error(&self, message: &str, source: Option<&str>, line: Option<u32>) {
        self.log(
            LogLevel::Error,
            "Page Error",
            message,
            Some(&json!({ "source": source, "line": line })),
            None,
        );
    }

    pub fn component_mount(&self, component: &str) {
        self.log(
            LogLevel::Debug,
            "Component Lifecycle",
            &format!("{} mounted", component),
            None::<&Value>,
            Some(component),
        );
    }

    pub fn component_unmount(&self, component: &str) {
        self.log(
            LogLevel::Debug,
            "Component Lifecycle",
            &format!("{} unmounted", component),
            None::<&Value>,
            Some(component),
        );
    }

    pub fn component_error(&self, component: &str, message: &str, stack: Option<&str>) {
        self.log(
            LogLevel::Error,
            "Component Error",
            message,
            Some(&json!({ "error": message, "stack": stack })),
            Some(component),
        );
    }

    /// HTTP statuses of 400 and above log at ERROR, everything else INFO
    pub fn api_call(
        &self,
        method: &str,
        endpoint: &str,
        status: Option<u16>,
        duration_ms: Option<f64>,
    ) {
        let level = match status {
            Some(s) if s >= 400 => LogLevel::Error,
            _ => LogLevel::Info,
        };
        self.log(
            level,
            "API Call",
            &format!("{} {}", method, endpoint),
            Some(&json!({
                "method": method,
                "endpoint": endpoint,
                "status": status,
                "durationMs": duration_ms,
            })),
            None,
        );
    }

    /// The payload passes through the user-field scrubber (field deletion
    /// and email masking) before the generic key redaction.
    pub fn user_action<T: Serialize + ?Sized>(&self, action: &str, data: Option<&T>) {
        self.record(
            LogLevel::Info,
            "User Action",
            action,
            || data.map(redact::sanitize_user_data),
            None,
        );
    }

    /// Log a navigation and replace the tracked route. The route updates
    /// even when the entry itself is filtered out.
    pub fn route_change(&self, to: &str) {
        let mut inner = self.inner.lock();
        let from = std::mem::replace(&mut inner.route, to.to_string());

        if !inner.config.records(LogLevel::Info, "Navigation") {
            return;
        }
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Info,
            category: "Navigation".to_string(),
            message: format!("Route changed: {} -> {}", from, to),
            data: Some(Payload::Json(json!({ "from": from, "to": to }))),
            component: None,
            route: to.to_string(),
            session_id: self.session_id.clone(),
        };
        inner.fan_out(&self.storage_key, entry);
    }

    /// Records a hashed correlation label, never the raw user id
    pub fn auth_event(&self, event: &str, user_id: Option<&str>) {
        let user = user_id.map(redact::hash_user_id);
        self.record(
            LogLevel::Info,
            "Auth",
            &format!("Auth event: {}", event),
            || Some(Payload::Json(json!({ "event": event, "user": user }))),
            None,
        );
    }

    /// Begin a named timing span. Consuming `TimerGuard::stop` records the
    /// completion entry; a stopped timer cannot be stopped again.
    pub fn start_timer(&self, name: &str) -> TimerGuard<'_> {
        self.log(
            LogLevel::Debug,
            "Performance",
            &format!("Timer started: {}", name),
            None::<&Value>,
            None,
        );
        TimerGuard {
            logger: self,
            name: name.to_string(),
            started: Instant::now(),
        }
    }

    /// Log resident memory at INFO when the platform exposes it;
    /// otherwise silently do nothing
    pub fn log_memory_usage(&self, context: Option<&str>) {
        if let Some(rss_mb) = resident_memory_mb() {
            let message = match context {
                Some(c) => format!("Memory usage ({})", c),
                None => "Memory usage".to_string(),
            };
            self.log(
                LogLevel::Info,
                "Memory",
                &message,
                Some(&json!({ "rssMb": rss_mb })),
                None,
            );
        }
    }

    // =========================================================================
    // Queries and export
    // =========================================================================

    /// Snapshot of recorded entries matching the filter, in insertion order
    pub fn get_logs(&self, filter: &QueryFilter) -> Vec<LogEntry> {
        self.inner.lock().buffer.query(filter)
    }

    /// Serialize session id, config, and the full buffer to JSON.
    /// Succeeds on an empty buffer (the log array is just empty).
    pub fn export_logs(&self) -> String {
        let inner = self.inner.lock();
        let doc = ExportDocument {
            session_id: &self.session_id,
            config: &inner.config,
            logs: inner.buffer.entries().iter().collect(),
            exported_at: Utc::now(),
        };
        serde_json::to_string(&doc).unwrap_or_else(|_| "{}".to_string())
    }

    /// Drop all recorded entries and the persisted copy for this session.
    /// Idempotent.
    pub fn clear_logs(&self) {
        let mut inner = self.inner.lock();
        inner.buffer.clear();
        let key = self.storage_key.clone();
        if let Err(e) = inner.store.remove(&key) {
            warn!("failed to remove persisted logs: {}", e);
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn set_log_level(&self, level: LogLevel) {
        self.update_config(|c| c.level = level);
    }

    pub fn set_categories(&self, categories: CategoryFilter) {
        self.update_config(|c| c.categories = categories);
    }

    pub fn enable_category(&self, category: &str) {
        self.update_config(|c| c.categories.enable(category));
    }

    pub fn disable_category(&self, category: &str) {
        self.update_config(|c| c.categories.disable(category));
    }

    /// Apply a config mutation as a single replace and persist the result.
    /// Log calls either see the old config or the new one, never a mix.
    fn update_config(&self, mutate: impl FnOnce(&mut LoggerConfig)) {
        let mut inner = self.inner.lock();
        let mut next = inner.config.clone();
        mutate(&mut next);

        inner.buffer.set_max_entries(next.max_storage_entries);
        inner.config = next;

        let toml = inner.config.to_toml();
        if let Err(e) = inner.store.set(CONFIG_STORAGE_KEY, &toml) {
            warn!("failed to persist logger config: {}", e);
        }
    }

    // =========================================================================
    // Fault hooks
    // =========================================================================

    /// Subscribe to a fault source; every observed fault becomes an
    /// ERROR entry
    pub fn attach_fault_observer(self: &Arc<Self>, observer: &dyn FaultObserver) {
        let logger = Arc::clone(self);
        observer.on_uncaught(Arc::new(move |event| {
            let category = match event.kind {
                FaultKind::UncaughtError => "Global Error",
                FaultKind::UnhandledRejection => "Unhandled Promise Rejection",
            };
            logger.log(
                LogLevel::Error,
                category,
                &event.message,
                Some(&json!({
                    "message": event.message,
                    "source": event.source,
                    "stack": event.stack,
                })),
                None,
            );
        }));
    }
}

/// Build a logger from config with the default file-backed store rooted
/// at `dir`
pub fn create_logger(config: LoggerConfig, dir: impl Into<PathBuf>) -> crate::error::Result<Arc<DebugLogger>> {
    let store = FileStore::open(dir)?;
    Ok(Arc::new(DebugLogger::with_store(config, Box::new(store))))
}

/// Guard for a running timer started with `DebugLogger::start_timer`
pub struct TimerGuard<'a> {
    logger: &'a DebugLogger,
    name: String,
    started: Instant,
}

impl TimerGuard<'_> {
    /// Record the completion entry and return elapsed milliseconds
    pub fn stop(self) -> f64 {
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        self.logger.log(
            LogLevel::Info,
            "Performance",
            &format!("Timer completed: {}", self.name),
            Some(&json!({ "durationMs": elapsed_ms })),
            None,
        );
        elapsed_ms
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    session_id: &'a str,
    config: &'a LoggerConfig,
    logs: Vec<&'a LogEntry>,
    exported_at: DateTime<Utc>,
}

/// The network sink runs only in production; everywhere else it is a
/// placeholder that records nothing.
fn spawn_network(config: &LoggerConfig) -> Option<Broadcaster> {
    (config.environment == Environment::Production && config.enable_network)
        .then(|| Broadcaster::spawn(config.network_target.clone()))
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// One id per logger lifetime; the sequence keeps ids distinct even for
/// loggers created within the same millisecond
fn generate_session_id() -> String {
    let seq = SESSION_SEQUENCE.fetch_add(1, Ordering::SeqCst);
    let millis = Utc::now().timestamp_millis();
    let pid = std::process::id() as i64;
    let hash = (millis ^ (pid << 16)) & 0xFFFF_FFFF;
    format!("session-{:08x}-{:04x}", hash, seq & 0xFFFF)
}

#[cfg(target_os = "linux")]
fn resident_memory_mb() -> Option<f64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kb: f64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb / 1024.0)
}

#[cfg(not(target_os = "linux"))]
fn resident_memory_mb() -> Option<f64> {
    None
}

// ============================================================================
// Tests
// ============================================================================
