//! Error types for recordbook.
//!
//! This module defines all error types used throughout the recordbook crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for recordbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// The database was written by a newer schema than this build knows.
    #[error("database schema version {found} is newer than supported version {supported}")]
    UnsupportedSchema {
        /// Version recorded in the database.
        found: i32,
        /// Highest version this build can read.
        supported: i32,
    },

    /// The value stored under a key could not be decoded into records.
    #[error("stored records under '{key}' are corrupt: {source}")]
    StorageCorrupt {
        /// Storage key holding the corrupt value.
        key: String,
        /// The decode error.
        #[source]
        source: serde_json::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Operation Errors ===
    /// A search was requested with nothing to search for.
    #[error("enter a search term")]
    EmptyQuery,

    /// No id above the current maximum is left for a new record.
    #[error("no record id is available above {max}")]
    IdsExhausted {
        /// The highest id in the collection.
        max: i64,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for recordbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a storage corruption error for the given key.
    #[must_use]
    pub fn storage_corrupt(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::StorageCorrupt {
            key: key.into(),
            source,
        }
    }

    /// Check if this error means the persisted records could not be decoded.
    #[must_use]
    pub fn is_storage_corrupt(&self) -> bool {
        matches!(self, Self::StorageCorrupt { .. })
    }

    /// Check if this error is the empty search query rejection.
    #[must_use]
    pub fn is_empty_query(&self) -> bool {
        matches!(self, Self::EmptyQuery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<Vec<i32>>("{not json").unwrap_err()
    }

    #[test]
    fn test_error_display() {
        assert_eq!(Error::EmptyQuery.to_string(), "enter a search term");

        let err = Error::IdsExhausted { max: i64::MAX };
        assert_eq!(
            err.to_string(),
            "no record id is available above 9223372036854775807"
        );
    }

    #[test]
    fn test_storage_corrupt_display() {
        let err = Error::storage_corrupt("appData", json_error());
        let msg = err.to_string();
        assert!(msg.contains("appData"));
        assert!(msg.contains("corrupt"));
    }

    #[test]
    fn test_is_storage_corrupt() {
        assert!(Error::storage_corrupt("k", json_error()).is_storage_corrupt());
        assert!(!Error::EmptyQuery.is_storage_corrupt());
    }

    #[test]
    fn test_is_empty_query() {
        assert!(Error::EmptyQuery.is_empty_query());
        assert!(!Error::IdsExhausted { max: 1 }.is_empty_query());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let err: Error = json_error().into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_unsupported_schema_display() {
        let err = Error::UnsupportedSchema {
            found: 3,
            supported: 1,
        };
        assert_eq!(
            err.to_string(),
            "database schema version 3 is newer than supported version 1"
        );
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "rule_width must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("rule_width"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
