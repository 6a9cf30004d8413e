//! Logger configuration
//!
//! Persisted to the durable store under the `debug_logger_config` key as
//! TOML, and loaded at construction to override defaults. Configuration
//! changes are applied as a single replace of the whole struct, so a log
//! call never observes a partially updated config.

use crate::constants::{DEFAULT_MAX_ENTRIES, DEFAULT_NETWORK_TARGET};
use crate::entry::LogLevel;
use crate::error::{LogError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;

// =============================================================================
// Environment
// =============================================================================

/// Runtime environment of the host application.
///
/// Affects the default minimum level and whether durable storage is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    fn default_level(self) -> LogLevel {
        match self {
            Environment::Development => LogLevel::Verbose,
            Environment::Production => LogLevel::Info,
            Environment::Testing => LogLevel::Error,
        }
    }

    fn default_storage(self) -> bool {
        matches!(self, Environment::Development)
    }
}

// =============================================================================
// Category filter
// =============================================================================

/// Which categories are recorded.
///
/// `All` is the `"all"` sentinel; `Only` holds an explicit allowlist.
/// Serialized as a string array where any `"all"` element (case-insensitive)
/// means the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(BTreeSet<String>),
}

impl Default for CategoryFilter {
    fn default() -> Self {
        CategoryFilter::All
    }
}

impl CategoryFilter {
    /// Whether a call with this category is recorded (exact match or `All`)
    pub fn records(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(names) => names.contains(category),
        }
    }

    /// Add a category to the allowlist. No-op on `All` or when present.
    pub fn enable(&mut self, category: &str) {
        if let CategoryFilter::Only(names) = self {
            if !names.contains(category) {
                names.insert(category.to_string());
            }
        }
    }

    /// Remove a category from the allowlist. No-op on `All` or when absent.
    pub fn disable(&mut self, category: &str) {
        if let CategoryFilter::Only(names) = self {
            names.remove(category);
        }
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CategoryFilter::All => serializer.collect_seq(["all"]),
            CategoryFilter::Only(names) => serializer.collect_seq(names),
        }
    }
}

impl<'de> Deserialize<'de> for CategoryFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        if names.iter().any(|n| n.eq_ignore_ascii_case("all")) {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Only(names.into_iter().collect()))
        }
    }
}

// =============================================================================
// Logger configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggerConfig {
    pub environment: Environment,
    /// Minimum severity to record; entries less severe are dropped
    pub level: LogLevel,
    /// Categories to record
    pub categories: CategoryFilter,
    /// Render entries to the console sink
    pub enable_console: bool,
    /// Persist the entry buffer to the durable store
    pub enable_storage: bool,
    /// Stream entries over UDP (production only)
    pub enable_network: bool,
    /// Bound on the in-memory and persisted buffers
    pub max_storage_entries: usize,
    /// Target address for the network sink
    pub network_target: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Development)
    }
}

impl LoggerConfig {
    /// Config with the defaults appropriate for the given environment
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            level: environment.default_level(),
            categories: CategoryFilter::All,
            enable_console: true,
            enable_storage: environment.default_storage(),
            enable_network: false,
            max_storage_entries: DEFAULT_MAX_ENTRIES,
            network_target: DEFAULT_NETWORK_TARGET.to_string(),
        }
    }

    /// Whether a call at this level and category produces an entry
    pub fn records(&self, level: LogLevel, category: &str) -> bool {
        level.rank() <= self.level.rank() && self.categories.records(category)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| LogError::ConfigParse {
            reason: e.to_string(),
        })
    }

    /// Serialize for persistence. All fields map to plain TOML values.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
