//! `SQLite` schema definitions for recordbook.
//!
//! The database is a plain key-value table: the record collection lives as
//! one encoded value under a single key. The schema version is kept in
//! `PRAGMA user_version`.

/// Schema version recorded in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the entries table.
pub const CREATE_ENTRIES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS entries (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_entries_table_contains_required_columns() {
        assert!(CREATE_ENTRIES_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_ENTRIES_TABLE.contains("value TEXT NOT NULL"));
        assert!(CREATE_ENTRIES_TABLE.contains("updated_at TEXT NOT NULL"));
    }
}
