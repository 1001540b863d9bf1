//! Per-symbol usage counters.
//!
//! # Invariants
//! - Counts never decrease; entries are created at `0 -> 1`.
//! - Every recorded use gets a strictly larger sequence number than the last.

use crate::search::query::UsageStats;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct UsageEntry {
    count: u64,
    last_sequence: u64,
}

/// Selection counter keyed by symbol title.
#[derive(Debug, Clone, Default)]
pub struct UsageTracker {
    entries: HashMap<String, UsageEntry>,
    next_sequence: u64,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one use of `key` and returns its new count.
    pub fn record_use(&mut self, key: &str) -> u64 {
        self.next_sequence += 1;
        let entry = self.entries.entry(key.to_string()).or_default();
        entry.count += 1;
        entry.last_sequence = self.next_sequence;
        entry.count
    }

    pub fn count(&self, key: &str) -> u64 {
        self.entries.get(key).map(|entry| entry.count).unwrap_or(0)
    }

    /// Number of distinct keys with at least one use.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops all counters; only used on session reset.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_sequence = 0;
    }
}

impl UsageStats for UsageTracker {
    fn use_count(&self, key: &str) -> u64 {
        self.count(key)
    }

    fn last_used(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(|entry| entry.last_sequence)
    }
}
