//! HTML rendering for the list and search views.
//!
//! All user-supplied text goes through [`escape_html`] before it is embedded.
//! Search highlighting locates matches in the raw text, escapes each piece,
//! and only then wraps matches in `<mark>` tags.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Utc};

use crate::app::View;
use crate::error::{Error, Result};
use crate::record::Record;
use crate::search::SearchQuery;
use crate::stats::Stats;

/// Default strftime pattern for rendered timestamps.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Escape text for embedding in HTML element content or attribute values.
#[must_use]
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Check that `format` is a usable strftime pattern.
///
/// # Errors
///
/// Returns [`Error::ConfigValidation`] if the pattern is empty or contains
/// an unknown specifier.
pub fn validate_date_format(format: &str) -> Result<()> {
    if format.trim().is_empty() {
        return Err(Error::ConfigValidation {
            message: "date_format must not be empty".to_string(),
        });
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(Error::ConfigValidation {
            message: format!("invalid date_format: {format}"),
        });
    }
    Ok(())
}

/// Escape `text`, wrapping every match of `query` in `<mark>`.
fn highlight(text: &str, query: &SearchQuery) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for span in query.match_spans(text) {
        out.push_str(&escape_html(&text[last..span.start]));
        out.push_str("<mark>");
        out.push_str(&escape_html(&text[span.clone()]));
        out.push_str("</mark>");
        last = span.end;
    }
    out.push_str(&escape_html(&text[last..]));
    out
}

/// Turns records into HTML fragments.
#[derive(Debug, Clone)]
pub struct Renderer {
    date_format: String,
    offset: FixedOffset,
}

impl Renderer {
    /// Create a renderer with a strftime pattern and a display offset.
    ///
    /// # Errors
    ///
    /// Returns an error if `date_format` is not a valid strftime pattern.
    pub fn new(date_format: impl Into<String>, offset: FixedOffset) -> Result<Self> {
        let date_format = date_format.into();
        validate_date_format(&date_format)?;
        Ok(Self {
            date_format,
            offset,
        })
    }

    /// Format a timestamp for display.
    #[must_use]
    pub fn format_timestamp(&self, timestamp: &DateTime<Utc>) -> String {
        timestamp
            .with_timezone(&self.offset)
            .format(&self.date_format)
            .to_string()
    }

    /// Render the full list view.
    #[must_use]
    pub fn render_list(&self, records: &[Record]) -> String {
        if records.is_empty() {
            return concat!(
                r#"<div class="empty-state">"#,
                "<h3>No data</h3>",
                "<p>Add a new record to get started!</p>",
                "</div>"
            )
            .to_string();
        }

        let mut out = String::new();
        for record in records {
            let _ = write!(
                out,
                concat!(
                    r#"<div class="data-item" data-id="{id}">"#,
                    "<h3>{name}</h3>",
                    "<p><strong>Email:</strong> {email}</p>",
                    "<p><strong>Message:</strong> {message}</p>",
                    r#"<p class="timestamp">Registered: {timestamp}</p>"#,
                    r#"<div class="data-item-actions">"#,
                    r#"<button class="btn-delete" data-action="delete" data-id="{id}">Delete</button>"#,
                    "</div>",
                    "</div>\n"
                ),
                id = record.id,
                name = escape_html(&record.name),
                email = escape_html(&record.email),
                message = escape_html(&record.message),
                timestamp = self.format_timestamp(&record.timestamp),
            );
        }
        out
    }

    /// Render search results with matches highlighted.
    #[must_use]
    pub fn render_search_results(&self, results: &[&Record], query: &SearchQuery) -> String {
        if results.is_empty() {
            return format!(
                concat!(
                    r#"<div class="empty-state">"#,
                    "<h3>No results</h3>",
                    "<p>No results for &quot;{}&quot;.</p>",
                    "</div>"
                ),
                escape_html(query.as_str())
            );
        }

        let mut out = String::new();
        for record in results {
            let _ = write!(
                out,
                concat!(
                    r#"<div class="data-item" data-id="{id}">"#,
                    "<h3>{name}</h3>",
                    "<p><strong>Email:</strong> {email}</p>",
                    "<p><strong>Message:</strong> {message}</p>",
                    r#"<p class="timestamp">Registered: {timestamp}</p>"#,
                    "</div>\n"
                ),
                id = record.id,
                name = highlight(&record.name, query),
                email = highlight(&record.email, query),
                message = highlight(&record.message, query),
                timestamp = self.format_timestamp(&record.timestamp),
            );
        }
        out
    }

    /// Render the record count and last-update time.
    #[must_use]
    pub fn render_stats(&self, stats: &Stats) -> String {
        format!(
            concat!(
                r#"<div class="stats">"#,
                r#"<p>Total records: <span id="total-count">{}</span></p>"#,
                r#"<p>Last update: <span id="last-update">{}</span></p>"#,
                "</div>"
            ),
            stats.total_count,
            self.format_timestamp(&stats.last_update)
        )
    }

    /// Render a standalone HTML document with stats and both views.
    ///
    /// `search` carries the current results and term; without it the search
    /// container is left empty.
    #[must_use]
    pub fn render_page(
        &self,
        records: &[Record],
        search: Option<(&[&Record], &SearchQuery)>,
        stats: &Stats,
        active: View,
    ) -> String {
        let section_class = |view: View| {
            if view == active {
                "section active"
            } else {
                "section"
            }
        };
        let search_html = search
            .map(|(results, query)| self.render_search_results(results, query))
            .unwrap_or_default();
        let search_value = search
            .map(|(_, query)| escape_html(query.as_str()))
            .unwrap_or_default();

        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str("<title>Record Book</title>\n</head>\n<body>\n");
        out.push_str(&self.render_stats(stats));
        out.push('\n');
        let _ = writeln!(
            out,
            r#"<section id="list-section" class="{}"><div id="data-list">{}</div></section>"#,
            section_class(View::List),
            self.render_list(records)
        );
        let _ = writeln!(
            out,
            concat!(
                r#"<section id="search-section" class="{}">"#,
                r#"<input id="search-input" type="text" value="{}">"#,
                r#"<div id="search-results">{}</div></section>"#
            ),
            section_class(View::Search),
            search_value,
            search_html
        );
        let _ = writeln!(
            out,
            concat!(
                r#"<section id="add-section" class="{}"><form id="add-form">"#,
                r#"<input name="name" type="text" required>"#,
                r#"<input name="email" type="email" required>"#,
                r#"<textarea name="message" required></textarea>"#,
                "</form></section>"
            ),
            section_class(View::Add)
        );
        out.push_str("</body>\n</html>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NewRecord;
    use chrono::TimeZone;

    fn renderer() -> Renderer {
        Renderer::new(DEFAULT_DATE_FORMAT, FixedOffset::east_opt(0).unwrap()).unwrap()
    }

    fn record(id: i64, name: &str, email: &str, message: &str) -> Record {
        Record::new(
            id,
            NewRecord::new(name, email, message),
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain 한글"), "plain 한글");
    }

    #[test]
    fn test_validate_date_format() {
        assert!(validate_date_format("%Y-%m-%d").is_ok());
        assert!(validate_date_format("").is_err());
        assert!(validate_date_format("%Q").is_err());
        assert!(Renderer::new("%Q", FixedOffset::east_opt(0).unwrap()).is_err());
    }

    #[test]
    fn test_format_timestamp_applies_offset() {
        let renderer = Renderer::new("%Y-%m-%d %H:%M", FixedOffset::east_opt(9 * 3600).unwrap())
            .unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 20, 15, 0).unwrap();
        assert_eq!(renderer.format_timestamp(&ts), "2024-03-02 05:15");
    }

    #[test]
    fn test_render_list_empty_placeholder() {
        let html = renderer().render_list(&[]);
        assert!(html.contains("empty-state"));
        assert!(html.contains("No data"));
    }

    #[test]
    fn test_render_list_items_in_order() {
        let records = vec![
            record(2, "Second", "b@example.com", "two"),
            record(1, "First", "a@example.com", "one"),
        ];
        let html = renderer().render_list(&records);

        let second = html.find("Second").unwrap();
        let first = html.find("First").unwrap();
        assert!(second < first);
        assert_eq!(html.matches(r#"class="data-item""#).count(), 2);
        assert!(html.contains(r#"data-action="delete" data-id="2""#));
        assert!(html.contains("Registered: 2024-03-01 09:30"));
    }

    #[test]
    fn test_render_list_escapes_markup() {
        let records = vec![record(1, "<script>", "x@y.z", "a & b")];
        let html = renderer().render_list(&records);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
    }

    #[test]
    fn test_render_search_highlights_case_insensitive() {
        let records = vec![record(1, "Hong Gildong", "hong@example.com", "hello")];
        let refs: Vec<&Record> = records.iter().collect();
        let query = SearchQuery::parse("HONG").unwrap();
        let html = renderer().render_search_results(&refs, &query);

        assert!(html.contains("<h3><mark>Hong</mark> Gildong</h3>"));
        assert!(html.contains("<mark>hong</mark>@example.com"));
        assert!(!html.contains("btn-delete"));
    }

    #[test]
    fn test_render_search_no_results_placeholder() {
        let query = SearchQuery::parse("<zz>").unwrap();
        let html = renderer().render_search_results(&[], &query);

        assert!(html.contains("No results"));
        assert!(html.contains("&lt;zz&gt;"));
        assert!(!html.contains("<zz>"));
    }

    #[test]
    fn test_highlight_escapes_before_marking() {
        let records = vec![record(1, "<b>bold</b>", "e", "m")];
        let refs: Vec<&Record> = records.iter().collect();
        let query = SearchQuery::parse("b").unwrap();
        let html = renderer().render_search_results(&refs, &query);

        assert!(html.contains("&lt;<mark>b</mark>&gt;<mark>b</mark>old&lt;/<mark>b</mark>&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_highlight_does_not_split_entities() {
        let records = vec![record(1, "fish & chips", "e", "m")];
        let refs: Vec<&Record> = records.iter().collect();
        let query = SearchQuery::parse("amp").unwrap();
        let html = renderer().render_search_results(&refs, &query);

        assert!(html.contains("fish &amp; chips"));
        assert!(!html.contains("<mark>amp</mark>"));
    }

    #[test]
    fn test_highlight_treats_query_literally() {
        let records = vec![record(1, "cost (usd)", "e", "a.b")];
        let refs: Vec<&Record> = records.iter().collect();

        let html = renderer().render_search_results(&refs, &SearchQuery::parse("(usd)").unwrap());
        assert!(html.contains("cost <mark>(usd)</mark>"));

        let html = renderer().render_search_results(&refs, &SearchQuery::parse(".").unwrap());
        assert!(html.contains("a<mark>.</mark>b"));
    }

    #[test]
    fn test_highlight_follows_unicode_case_folding() {
        let records = vec![record(1, "İstanbul", "e", "m")];
        let refs: Vec<&Record> = records.iter().collect();
        let html = renderer().render_search_results(&refs, &SearchQuery::parse("İ").unwrap());

        assert!(html.contains("<h3><mark>İ</mark>stanbul</h3>"));
    }

    #[test]
    fn test_render_stats() {
        let stats = Stats {
            total_count: 3,
            last_update: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        };
        let html = renderer().render_stats(&stats);
        assert!(html.contains(r#"<span id="total-count">3</span>"#));
        assert!(html.contains(r#"<span id="last-update">2024-03-01 09:30</span>"#));
    }

    #[test]
    fn test_render_page_marks_active_view() {
        let records = vec![record(1, "Hong", "h@example.com", "hi")];
        let stats = Stats {
            total_count: 1,
            last_update: Utc::now(),
        };
        let html = renderer().render_page(&records, None, &stats, View::List);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"id="list-section" class="section active""#));
        assert!(html.contains(r#"id="search-section" class="section""#));
        assert!(html.contains(r#"<div id="data-list"><div class="data-item""#));
        assert!(html.contains(r#"<div id="search-results"></div>"#));
    }

    #[test]
    fn test_render_page_with_search() {
        let records = vec![record(1, "Hong", "h@example.com", "hi")];
        let refs: Vec<&Record> = records.iter().collect();
        let query = SearchQuery::parse("hong").unwrap();
        let stats = Stats {
            total_count: 1,
            last_update: Utc::now(),
        };
        let html = renderer().render_page(&records, Some((&refs, &query)), &stats, View::Search);

        assert!(html.contains(r#"id="search-section" class="section active""#));
        assert!(html.contains(r#"value="hong""#));
        assert!(html.contains("<mark>Hong</mark>"));
    }
}
