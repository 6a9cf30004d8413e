//! Crate-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// Durable storage
// =============================================================================

/// Key prefix for the per-session persisted entry array
pub const STORAGE_KEY_PREFIX: &str = "debug_log_";

/// Fixed key holding the persisted logger configuration
pub const CONFIG_STORAGE_KEY: &str = "debug_logger_config";

// =============================================================================
// Buffering
// =============================================================================

/// Default bound on the in-memory and persisted entry buffers
pub const DEFAULT_MAX_ENTRIES: usize = 500;

/// Capacity of the bounded channel feeding the network sink thread
pub const NETWORK_CHANNEL_CAPACITY: usize = 256;

// =============================================================================
// Network
// =============================================================================

/// Default target address for the UDP entry stream
pub const DEFAULT_NETWORK_TARGET: &str = "127.0.0.1:9417";

// =============================================================================
// Redaction
// =============================================================================

/// Replacement value for sensitive fields
pub const REDACTED: &str = "[REDACTED]";

/// Cap on fault payload text carried into an entry
pub const MAX_FAULT_PAYLOAD_CHARS: usize = 160;
