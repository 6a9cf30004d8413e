//! Snapshot query filters
//!
//! Filters applied by `DebugLogger::get_logs` when reading the in-memory
//! buffer. All set fields must match (conjunctive); the default filter
//! matches every entry.

use crate::entry::{LogEntry, LogLevel};
use chrono::{DateTime, Utc};

/// Query filter over recorded entries
#[derive(Debug, Clone, Default)]
pub struct QueryFilter {
    /// Keep entries at most this severe in rank (e.g. `Warn` keeps
    /// ERROR and WARN)
    pub level: Option<LogLevel>,
    /// Case-insensitive substring match on the category
    pub category: Option<String>,
    /// Case-insensitive substring match on the component
    pub component: Option<String>,
    /// Keep entries at or after this instant
    pub since: Option<DateTime<Utc>>,
}

impl QueryFilter {
    /// Check if an entry passes the filter
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(level) = self.level {
            if entry.level.rank() > level.rank() {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !contains_ignore_case(&entry.category, category) {
                return false;
            }
        }
        if let Some(component) = &self.component {
            match &entry.component {
                Some(c) if contains_ignore_case(c, component) => {}
                _ => return false,
            }
        }
        if let Some(since) = self.since {
            if entry.timestamp < since {
                return false;
            }
        }
        true
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    // === Helper functions ===

    fn make_entry(level: LogLevel, category: &str, component: Option<&str>) -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            level,
            category: category.to_string(),
            message: "test message".to_string(),
            data: None,
            component: component.map(str::to_string),
            route: "/".to_string(),
            session_id: "session-0".to_string(),
        }
    }

    #[test]
    fn test_default_matches_all() {
        let filter = QueryFilter::default();

        assert!(filter.matches(&make_entry(LogLevel::Error, "API Call", None)));
        assert!(filter.matches(&make_entry(LogLevel::Verbose, "Auth", Some("TaskBoard"))));
    }

    #[test]
    fn test_level_keeps_at_most_this_severe() {
        let filter = QueryFilter {
            level: Some(LogLevel::Warn),
            ..Default::default()
        };

        assert!(filter.matches(&make_entry(LogLevel::Error, "x", None)));
        assert!(filter.matches(&make_entry(LogLevel::Warn, "x", None)));
        assert!(!filter.matches(&make_entry(LogLevel::Info, "x", None)));
        assert!(!filter.matches(&make_entry(LogLevel::Verbose, "x", None)));
    }

    #[test]
    fn test_category_substring_case_insensitive() {
        let filter = QueryFilter {
            category: Some("api".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&make_entry(LogLevel::Info, "API Call", None)));
        assert!(!filter.matches(&make_entry(LogLevel::Info, "Auth", None)));
    }

    #[test]
    fn test_component_substring_case_insensitive() {
        let filter = QueryFilter {
            component: Some("board".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&make_entry(LogLevel::Info, "x", Some("TaskBoard"))));
        assert!(!filter.matches(&make_entry(LogLevel::Info, "x", Some("Sidebar"))));
        // Entries without a component never match a component filter
        assert!(!filter.matches(&make_entry(LogLevel::Info, "x", None)));
    }

    #[test]
    fn test_since_cutoff() {
        let filter = QueryFilter {
            since: Some(Utc::now() + Duration::hours(1)),
            ..Default::default()
        };
        assert!(!filter.matches(&make_entry(LogLevel::Info, "x", None)));

        let filter = QueryFilter {
            since: Some(Utc::now() - Duration::hours(1)),
            ..Default::default()
        };
        assert!(filter.matches(&make_entry(LogLevel::Info, "x", None)));
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let filter = QueryFilter {
            level: Some(LogLevel::Warn),
            category: Some("auth".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&make_entry(LogLevel::Error, "Auth", None)));
        // Right category, wrong level
        assert!(!filter.matches(&make_entry(LogLevel::Info, "Auth", None)));
        // Right level, wrong category
        assert!(!filter.matches(&make_entry(LogLevel::Error, "API Call", None)));
    }
}
