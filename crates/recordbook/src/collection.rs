//! The in-memory record collection.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::record::{NewRecord, Record};

/// Ordered records for the current session, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordCollection {
    records: Vec<Record>,
}

impl RecordCollection {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt records loaded from storage, keeping their order.
    ///
    /// Later duplicates of an id already seen are dropped so ids stay unique.
    #[must_use]
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut seen = std::collections::HashSet::with_capacity(records.len());
        let records = records
            .into_iter()
            .filter(|record| {
                let fresh = seen.insert(record.id);
                if !fresh {
                    tracing::warn!(id = record.id, "Dropping record with duplicate id");
                }
                fresh
            })
            .collect();
        Self { records }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, newest first.
    #[must_use]
    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    /// The highest id in the collection.
    #[must_use]
    pub fn max_id(&self) -> Option<i64> {
        self.records.iter().map(|record| record.id).max()
    }

    /// Create a record from `draft` at time `now` and put it in front.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IdsExhausted`] when no unused id is left; the
    /// collection is unchanged in that case.
    pub fn prepend(&mut self, draft: NewRecord, now: DateTime<Utc>) -> Result<&Record> {
        let id = Record::next_id(now, self.max_id())?;
        self.records.insert(0, Record::new(id, draft, now));
        Ok(&self.records[0])
    }

    /// Remove the record with `id`, if present.
    pub fn remove(&mut self, id: i64) -> Option<Record> {
        let index = self.records.iter().position(|record| record.id == id)?;
        Some(self.records.remove(index))
    }

    /// Remove every record, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let removed = self.records.len();
        self.records.clear();
        removed
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
