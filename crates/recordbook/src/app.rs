//! The application controller.
//!
//! [`RecordBook`] owns the record collection and its store, and runs every
//! user operation to completion: mutate, persist, then expose what changed
//! through its view state and notice queue. Destructive operations ask a
//! [`Confirm`] implementation first and do nothing when declined.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::collection::RecordCollection;
use crate::error::Result;
use crate::export::{self, ExportDocument};
use crate::record::{sample_records, NewRecord, Record};
use crate::render::Renderer;
use crate::search::SearchQuery;
use crate::stats::Stats;
use crate::storage::{KeyValueStore, RecordStore};

/// Prompt shown before deleting one record.
pub const DELETE_PROMPT: &str = "Really delete this record?";

/// Prompt shown before deleting every record.
pub const CLEAR_PROMPT: &str = "Delete all records?";

/// Asks the user to approve a destructive operation.
pub trait Confirm {
    /// Return `true` to go ahead with the operation described by `prompt`.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// The view currently shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// All records.
    #[default]
    List,
    /// Results of the last search.
    Search,
    /// The new-record form.
    Add,
}

/// A message the presentation layer should show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A record was added.
    RecordAdded {
        /// Id of the new record.
        id: i64,
    },
    /// Every record was deleted.
    AllCleared,
    /// A search was attempted without a term.
    EmptyQuery,
    /// Stored data could not be read and the collection started empty.
    StorageReset {
        /// Why the stored data was rejected.
        reason: String,
    },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RecordAdded { id } => write!(f, "Record {id} added."),
            Self::AllCleared => write!(f, "All records deleted."),
            Self::EmptyQuery => write!(f, "Enter a search term."),
            Self::StorageReset { reason } => {
                write!(f, "Stored records could not be read and were reset: {reason}")
            }
        }
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record was removed.
    Removed(Record),
    /// No record had that id.
    NotFound,
    /// The user declined.
    Declined,
}

/// Result of a clear request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The collection was emptied.
    Cleared {
        /// How many records were removed.
        removed: usize,
    },
    /// The user declined.
    Declined,
}

/// Owns the record collection and keeps it mirrored to storage.
#[derive(Debug)]
pub struct RecordBook<S> {
    store: RecordStore<S>,
    records: RecordCollection,
    view: View,
    last_search: Option<SearchQuery>,
    last_update: DateTime<Utc>,
    notices: Vec<Notice>,
}

impl<S: KeyValueStore> RecordBook<S> {
    /// Load the collection from `store`.
    ///
    /// When nothing has been stored yet and `seed_samples` is set, two sample
    /// records are written. When the stored value cannot be decoded, the
    /// collection starts empty and a [`Notice::StorageReset`] is queued; the
    /// stored value is left alone until the next write.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read, or if seeding fails.
    pub fn open(store: RecordStore<S>, seed_samples: bool) -> Result<Self> {
        let now = Utc::now();
        let mut book = Self {
            store,
            records: RecordCollection::new(),
            view: View::default(),
            last_search: None,
            last_update: now,
            notices: Vec::new(),
        };

        match book.store.load() {
            Ok(Some(records)) => {
                book.records = RecordCollection::from_records(records);
                debug!("Opened record book with {} records", book.records.len());
            }
            Ok(None) if seed_samples => {
                info!("No stored records, writing samples");
                book.records = RecordCollection::from_records(sample_records(now));
                book.store.save(book.records.as_slice())?;
            }
            Ok(None) => {}
            Err(err) if err.is_storage_corrupt() => {
                warn!(error = %err, "Stored records are unreadable, starting empty");
                book.notices.push(Notice::StorageReset {
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }

        Ok(book)
    }

    /// All records, newest first.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        self.records.as_slice()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The active view.
    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    /// Switch the active view.
    pub fn show(&mut self, view: View) {
        self.view = view;
    }

    /// The last accepted search term.
    #[must_use]
    pub fn last_search(&self) -> Option<&SearchQuery> {
        self.last_search.as_ref()
    }

    /// Drain queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// The underlying record store.
    #[must_use]
    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    /// Give back the underlying record store.
    #[must_use]
    pub fn into_store(self) -> RecordStore<S> {
        self.store
    }

    /// Current record count and last synchronization time.
    #[must_use]
    pub fn stats(&self) -> Stats {
        Stats::new(self.records.len(), self.last_update)
    }

    /// Add a record in front of the collection and switch to the list view.
    ///
    /// # Errors
    ///
    /// Returns an error if no id is left for the record or the collection
    /// cannot be persisted; the collection is left unchanged in both cases.
    pub fn add(&mut self, draft: NewRecord) -> Result<Record> {
        let previous = self.records.clone();
        let record = self.records.prepend(draft, Utc::now())?.clone();
        self.commit(previous)?;

        info!(id = record.id, "Added record");
        self.view = View::List;
        self.notices.push(Notice::RecordAdded { id: record.id });
        Ok(record)
    }

    /// Delete the record with `id` once `confirm` approves.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be persisted; the collection
    /// is left unchanged in that case.
    pub fn delete(&mut self, id: i64, confirm: &mut impl Confirm) -> Result<DeleteOutcome> {
        if !confirm.confirm(DELETE_PROMPT) {
            debug!(id, "Delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        let previous = self.records.clone();
        let Some(removed) = self.records.remove(id) else {
            debug!(id, "Delete requested for unknown record");
            return Ok(DeleteOutcome::NotFound);
        };
        self.commit(previous)?;

        info!(id, "Deleted record");
        Ok(DeleteOutcome::Removed(removed))
    }

    /// Delete every record once `confirm` approves.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be persisted; the collection
    /// is left unchanged in that case.
    pub fn clear(&mut self, confirm: &mut impl Confirm) -> Result<ClearOutcome> {
        if !confirm.confirm(CLEAR_PROMPT) {
            debug!("Clear declined");
            return Ok(ClearOutcome::Declined);
        }

        let previous = self.records.clone();
        let removed = self.records.clear();
        self.commit(previous)?;

        info!(removed, "Cleared all records");
        self.notices.push(Notice::AllCleared);
        Ok(ClearOutcome::Cleared { removed })
    }

    /// Search the collection and switch to the search view.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EmptyQuery`] and queues
    /// [`Notice::EmptyQuery`] when `raw` is blank; the view and the previous
    /// search are kept.
    pub fn search(&mut self, raw: &str) -> Result<Vec<&Record>> {
        let query = match SearchQuery::parse(raw) {
            Ok(query) => query,
            Err(err) => {
                self.notices.push(Notice::EmptyQuery);
                return Err(err);
            }
        };

        debug!(query = %query, "Searching records");
        self.view = View::Search;
        self.last_search = Some(query);
        Ok(self.search_results())
    }

    /// Records matching the last accepted search.
    #[must_use]
    pub fn search_results(&self) -> Vec<&Record> {
        self.last_search
            .as_ref()
            .map(|query| query.filter(&self.records))
            .unwrap_or_default()
    }

    /// Export the collection as a text document.
    #[must_use]
    pub fn export_text(&self, renderer: &Renderer, rule_width: usize) -> ExportDocument {
        export::export_text(self.records.as_slice(), renderer, rule_width, Utc::now())
    }

    /// Render the active view as an HTML fragment.
    #[must_use]
    pub fn render_active(&self, renderer: &Renderer) -> String {
        match (self.view, &self.last_search) {
            (View::Search, Some(query)) => {
                renderer.render_search_results(&self.search_results(), query)
            }
            (View::Add, _) => String::new(),
            _ => renderer.render_list(self.records.as_slice()),
        }
    }

    /// Render a standalone page with stats and all views.
    #[must_use]
    pub fn render_page(&self, renderer: &Renderer) -> String {
        let results = self.search_results();
        let search = self
            .last_search
            .as_ref()
            .map(|query| (results.as_slice(), query));
        renderer.render_page(self.records.as_slice(), search, &self.stats(), self.view)
    }

    /// Persist the collection, restoring `previous` if the write fails.
    fn commit(&mut self, previous: RecordCollection) -> Result<()> {
        if let Err(err) = self.store.save(self.records.as_slice()) {
            warn!(error = %err, "Failed to persist records, rolling back");
            self.records = previous;
            return Err(err);
        }
        self.last_update = Utc::now();
        Ok(())
    }
}
