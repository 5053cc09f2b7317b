//! Core record types for recordbook.
//!
//! A [`Record`] is one user-entered name/email/message entry with an id and
//! creation timestamp. Records are immutable once created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::search::fold_case;

/// A stored name/email/message entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier, derived from the creation time in milliseconds.
    pub id: i64,

    /// Who left the record.
    pub name: String,

    /// Contact email, free-form.
    pub email: String,

    /// Message body.
    pub message: String,

    /// When the record was created.
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

/// The user-supplied fields of a record that has not been stored yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRecord {
    /// Who is leaving the record.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Message body.
    pub message: String,
}

impl NewRecord {
    /// Collect the fields of a new record.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }
}

impl Record {
    /// Build a record from its fields, stamping it with `timestamp`.
    #[must_use]
    pub fn new(id: i64, draft: NewRecord, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            message: draft.message,
            timestamp,
        }
    }

    /// Pick the id for a record created at `now`.
    ///
    /// Ids come from the creation time in milliseconds but never fall at or
    /// below `max_existing`, so they stay unique and increasing even when two
    /// records land in the same millisecond.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdsExhausted`] when `max_existing` is `i64::MAX`.
    pub fn next_id(now: DateTime<Utc>, max_existing: Option<i64>) -> Result<i64> {
        let millis = now.timestamp_millis();
        match max_existing {
            Some(max) if max >= millis => max.checked_add(1).ok_or(Error::IdsExhausted { max }),
            _ => Ok(millis),
        }
    }

    /// Check whether any text field contains `needle`.
    ///
    /// `needle` must already be folded with [`fold_case`].
    #[must_use]
    pub fn contains_folded(&self, needle: &str) -> bool {
        [&self.name, &self.email, &self.message]
            .iter()
            .any(|field| fold_case(field).contains(needle))
    }
}

/// The two records written on first run, when nothing has been stored yet.
#[must_use]
pub fn sample_records(now: DateTime<Utc>) -> Vec<Record> {
    vec![
        Record::new(
            1,
            NewRecord::new(
                "Hong Gildong",
                "hong@example.com",
                "Hello! This is the first record.",
            ),
            now,
        ),
        Record::new(
            2,
            NewRecord::new(
                "Kim Cheolsu",
                "kim@example.com",
                "This is the second sample record.",
            ),
            now,
        ),
    ]
}

/// Serde helpers writing timestamps as RFC 3339 UTC with millisecond precision.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
