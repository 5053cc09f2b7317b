//! `recordbook` - A local book of names, emails and messages
//!
//! This library keeps an ordered collection of records mirrored to a
//! key-value store after every change, with case-insensitive search, HTML
//! rendering with match highlighting, and plain-text export.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod cli;
pub mod collection;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod record;
pub mod render;
pub mod search;
pub mod stats;
pub mod storage;

pub use app::{ClearOutcome, Confirm, DeleteOutcome, Notice, RecordBook, View};
pub use collection::RecordCollection;
pub use config::Config;
pub use error::{Error, Result};
pub use export::ExportDocument;
pub use logging::init_logging;
pub use record::{NewRecord, Record};
pub use render::Renderer;
pub use search::SearchQuery;
pub use stats::Stats;
pub use storage::{KeyValueStore, MemoryStore, RecordStore, SqliteStore};
