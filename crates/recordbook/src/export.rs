//! Plain-text export of the record collection.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{Error, Result};
use crate::record::Record;
use crate::render::Renderer;
use crate::search::SearchQuery;

/// Default width of the rule line closing each exported record.
pub const DEFAULT_RULE_WIDTH: usize = 50;

/// A rendered export, ready to be written or printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    /// Suggested file name, `data_<epoch_millis>.txt`.
    pub file_name: String,
    /// The exported text.
    pub contents: String,
}

impl ExportDocument {
    /// Write the document into `dir`, creating it if needed.
    ///
    /// Returns the path of the written file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.contents)?;
        info!("Exported records to {}", path.display());
        Ok(path)
    }
}

/// File name for an export taken at `now`.
#[must_use]
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("data_{}.txt", now.timestamp_millis())
}

/// Format records as labeled text blocks, in the order given.
///
/// Each block ends with a rule of `rule_width` dashes; blocks are separated
/// by a blank line.
#[must_use]
pub fn format_records(records: &[Record], renderer: &Renderer, rule_width: usize) -> String {
    let rule = "-".repeat(rule_width);
    records
        .iter()
        .map(|record| {
            format!(
                "ID: {}\nName: {}\nEmail: {}\nMessage: {}\nRegistered: {}\n{rule}\n",
                record.id,
                record.name,
                record.email,
                record.message,
                renderer.format_timestamp(&record.timestamp),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plain-text list view: the record blocks, or a placeholder line when there
/// are none.
#[must_use]
pub fn format_list(records: &[Record], renderer: &Renderer, rule_width: usize) -> String {
    if records.is_empty() {
        return "No records.\n".to_string();
    }
    format_records(records, renderer, rule_width)
}

/// Plain-text search results: the matching blocks, or a line naming the term
/// when nothing matched.
#[must_use]
pub fn format_search_results(
    results: &[Record],
    query: &SearchQuery,
    renderer: &Renderer,
    rule_width: usize,
) -> String {
    if results.is_empty() {
        return format!("No results for \"{query}\".\n");
    }
    format_records(results, renderer, rule_width)
}

/// Build the export document for `records` taken at `now`.
#[must_use]
pub fn export_text(
    records: &[Record],
    renderer: &Renderer,
    rule_width: usize,
    now: DateTime<Utc>,
) -> ExportDocument {
    ExportDocument {
        file_name: export_file_name(now),
        contents: format_records(records, renderer, rule_width),
    }
}
