//! Bounded in-memory entry buffer
//!
//! Pure data structure for holding recorded entries with no I/O side
//! effects. Uses a ring buffer (`VecDeque`) with a maximum capacity;
//! when full, the oldest entries rotate out first.

use crate::entry::LogEntry;
use crate::filter::QueryFilter;
use std::collections::VecDeque;

pub struct EntryBuffer {
    entries: VecDeque<LogEntry>,
    max_entries: usize,
}

impl EntryBuffer {
    /// Create a buffer holding at most `max_entries` entries
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    /// Add an entry, rotating out the oldest entries if at capacity.
    /// A zero-capacity buffer holds nothing.
    pub fn push(&mut self, entry: LogEntry) {
        if self.max_entries == 0 {
            return;
        }
        while self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Change the capacity, trimming oldest entries to fit
    pub fn set_max_entries(&mut self, max_entries: usize) {
        self.max_entries = max_entries;
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &VecDeque<LogEntry> {
        &self.entries
    }

    /// Snapshot of entries matching the filter, in insertion order
    pub fn query(&self, filter: &QueryFilter) -> Vec<LogEntry> {
        self.entries
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::LogLevel;
    use chrono::Utc;
    use proptest::prelude::*;

    fn make_entry(message: &str) -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Info,
            category: "Test".to_string(),
            message: message.to_string(),
            data: None,
            component: None,
            route: "/".to_string(),
            session_id: "session-0".to_string(),
        }
    }

    #[test]
    fn test_push_rotates_when_full() {
        let mut buffer = EntryBuffer::new(3);
        buffer.push(make_entry("1"));
        buffer.push(make_entry("2"));
        buffer.push(make_entry("3"));
        assert_eq!(buffer.len(), 3);

        buffer.push(make_entry("4"));
        assert_eq!(buffer.len(), 3);

        // "1" rotated out; "2" is now the oldest
        let messages: Vec<&str> = buffer.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["2", "3", "4"]);
    }

    #[test]
    fn test_zero_capacity_holds_nothing() {
        let mut buffer = EntryBuffer::new(0);
        buffer.push(make_entry("1"));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_shrinking_capacity_trims_oldest() {
        let mut buffer = EntryBuffer::new(5);
        for i in 0..5 {
            buffer.push(make_entry(&i.to_string()));
        }

        buffer.set_max_entries(2);
        let messages: Vec<&str> = buffer.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["3", "4"]);
    }

    #[test]
    fn test_clear() {
        let mut buffer = EntryBuffer::new(10);
        buffer.push(make_entry("1"));
        buffer.push(make_entry("2"));

        buffer.clear();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_query_is_a_snapshot() {
        let mut buffer = EntryBuffer::new(10);
        buffer.push(make_entry("1"));

        let snapshot = buffer.query(&QueryFilter::default());
        buffer.push(make_entry("2"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_query_applies_filter() {
        let mut buffer = EntryBuffer::new(10);
        let mut error = make_entry("boom");
        error.level = LogLevel::Error;
        buffer.push(error);
        buffer.push(make_entry("fine"));

        let filter = QueryFilter {
            level: Some(LogLevel::Error),
            ..Default::default()
        };
        let matched = buffer.query(&filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].message, "boom");
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_capacity(max in 1usize..50, count in 0usize..200) {
            let mut buffer = EntryBuffer::new(max);
            for i in 0..count {
                buffer.push(make_entry(&i.to_string()));
            }

            prop_assert!(buffer.len() <= max);
            if count >= max {
                // Retained entries are exactly the most recent, in order
                prop_assert_eq!(buffer.len(), max);
                let first = &buffer.entries()[0];
                prop_assert_eq!(first.message.as_str(), (count - max).to_string());
            }
        }
    }
}
