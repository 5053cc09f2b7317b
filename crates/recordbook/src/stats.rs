//! Derived statistics about the record collection.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Record count and the time the collection was last synchronized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Number of records in the collection.
    pub total_count: usize,
    /// When the collection was last loaded or written.
    pub last_update: DateTime<Utc>,
}

impl Stats {
    /// Snapshot stats for a collection of `total_count` records at `now`.
    #[must_use]
    pub fn new(total_count: usize, now: DateTime<Utc>) -> Self {
        Self {
            total_count,
            last_update: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_serialize() {
        let stats = Stats::new(4, Utc::now());
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["total_count"], 4);
        assert!(json["last_update"].is_string());
    }
}
