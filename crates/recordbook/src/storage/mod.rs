//! Storage layer for recordbook.
//!
//! The record collection is persisted as a single JSON array under one key
//! of a synchronous key-value store. [`SqliteStore`] keeps that store in an
//! `SQLite` file; [`MemoryStore`] keeps it in a `HashMap`. [`RecordStore`]
//! encodes and decodes the collection on top of either.

mod memory;
pub mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use tracing::debug;

use crate::error::{Error, Result};
use crate::record::Record;

/// Key the record collection is stored under unless configured otherwise.
pub const DEFAULT_KEY: &str = "appData";

/// A synchronous string key-value store.
pub trait KeyValueStore: std::fmt::Debug {
    /// Read the value under `key`, or `None` if nothing was ever written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Encodes the record collection into a [`KeyValueStore`] under one key.
#[derive(Debug)]
pub struct RecordStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Wrap `store`, keeping records under `key`.
    #[must_use]
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The key records are stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the underlying store.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Read the stored collection.
    ///
    /// Returns `None` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageCorrupt`] if the stored value is not a valid
    /// record array, or a storage error if the store cannot be read.
    pub fn load(&self) -> Result<Option<Vec<Record>>> {
        let Some(raw) = self.store.get(&self.key)? else {
            debug!("No records stored under '{}'", self.key);
            return Ok(None);
        };

        let records: Vec<Record> =
            serde_json::from_str(&raw).map_err(|source| Error::storage_corrupt(&self.key, source))?;
        debug!("Loaded {} records from '{}'", records.len(), self.key);
        Ok(Some(records))
    }

    /// Overwrite the stored collection with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the store cannot be written.
    pub fn save(&mut self, records: &[Record]) -> Result<()> {
        let encoded = serde_json::to_string(records)?;
        self.store.set(&self.key, &encoded)?;
        debug!("Saved {} records to '{}'", records.len(), self.key);
        Ok(())
    }
}
