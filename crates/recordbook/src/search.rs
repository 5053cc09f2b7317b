//! Case-insensitive substring search over records.

use std::ops::Range;

use crate::error::{Error, Result};
use crate::record::Record;

/// Lowercase `text` one character at a time.
///
/// Both the record filter and match highlighting compare text folded this
/// way, so every record that matches also shows where it matched.
#[must_use]
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// A normalized, non-empty search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    folded: String,
}

impl SearchQuery {
    /// Normalize raw input: trim whitespace and case-fold.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyQuery`] if nothing is left after trimming.
    pub fn parse(raw: &str) -> Result<Self> {
        let folded = fold_case(raw.trim());
        if folded.is_empty() {
            return Err(Error::EmptyQuery);
        }
        Ok(Self { folded })
    }

    /// The case-folded term.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.folded
    }

    /// Whether the name, email or message of `record` contains the term.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        record.contains_folded(&self.folded)
    }

    /// Byte ranges of `text` holding the term, under [`fold_case`].
    ///
    /// A match that begins or ends inside the lowercase expansion of one
    /// character covers that whole character. Ranges are sorted and never
    /// overlap.
    #[must_use]
    pub fn match_spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut folded = String::with_capacity(text.len());
        // Source character of every folded byte.
        let mut origin: Vec<(usize, usize)> = Vec::with_capacity(text.len());
        for (start, ch) in text.char_indices() {
            let source = (start, start + ch.len_utf8());
            for lower in ch.to_lowercase() {
                folded.push(lower);
                for _ in 0..lower.len_utf8() {
                    origin.push(source);
                }
            }
        }

        let mut spans: Vec<Range<usize>> = Vec::new();
        for (at, found) in folded.match_indices(self.folded.as_str()) {
            let start = origin[at].0;
            let end = origin[at + found.len() - 1].1;
            match spans.last_mut() {
                Some(last) if start < last.end => last.end = last.end.max(end),
                _ => spans.push(start..end),
            }
        }
        spans
    }

    /// Every matching record, in the order given.
    pub fn filter<'a, I>(&self, records: I) -> Vec<&'a Record>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect()
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.folded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NewRecord;
    use chrono::Utc;

    fn record(id: i64, name: &str, email: &str, message: &str) -> Record {
        Record::new(id, NewRecord::new(name, email, message), Utc::now())
    }

    fn fixture() -> Vec<Record> {
        vec![
            record(3, "Hong Gildong", "hong@example.com", "hello"),
            record(2, "Kim Cheolsu", "kim@example.com", "Greetings from HONG KONG"),
            record(1, "Lee", "lee@example.org", "nothing here"),
        ]
    }

    #[test]
    fn test_parse_trims_and_folds() {
        let query = SearchQuery::parse("  HoNg  ").unwrap();
        assert_eq!(query.as_str(), "hong");
        assert_eq!(query.to_string(), "hong");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(SearchQuery::parse("").unwrap_err().is_empty_query());
        assert!(SearchQuery::parse(" \t\n ").unwrap_err().is_empty_query());
    }

    #[test]
    fn test_matches_any_field() {
        let records = fixture();
        let query = SearchQuery::parse("HONG").unwrap();

        let ids: Vec<i64> = query.filter(&records).iter().map(|r| r.id).collect();
        assert_eq!(ids, [3, 2]);
    }

    #[test]
    fn test_matches_email() {
        let records = fixture();
        let query = SearchQuery::parse("example.org").unwrap();
        let hits = query.filter(&records);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn test_no_matches() {
        let records = fixture();
        let query = SearchQuery::parse("zz").unwrap();
        assert!(query.filter(&records).is_empty());
    }

    #[test]
    fn test_filter_equals_definition() {
        let records = fixture();
        for raw in ["e", "O", "kim", "@", "hello", "xyz"] {
            let query = SearchQuery::parse(raw).unwrap();
            let expected: Vec<i64> = records
                .iter()
                .filter(|r| {
                    let q = raw.to_lowercase();
                    r.name.to_lowercase().contains(&q)
                        || r.email.to_lowercase().contains(&q)
                        || r.message.to_lowercase().contains(&q)
                })
                .map(|r| r.id)
                .collect();
            let actual: Vec<i64> = query.filter(&records).iter().map(|r| r.id).collect();
            assert_eq!(actual, expected, "query {raw}");
        }
    }

    #[test]
    fn test_match_spans_ascii() {
        let query = SearchQuery::parse("hong").unwrap();
        assert_eq!(query.match_spans("Hong Kong, HONG"), [0..4, 11..15]);
        assert!(query.match_spans("nothing").is_empty());
    }

    #[test]
    fn test_match_spans_multibyte() {
        let query = SearchQuery::parse("세요").unwrap();
        let text = "안녕하세요";
        let spans = query.match_spans(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(&text[spans[0].clone()], "세요");
    }

    #[test]
    fn test_expanding_lowercase_matches_and_spans_agree() {
        // 'İ' lowercases to "i\u{307}", two characters.
        let records = vec![record(1, "İstanbul", "e", "m")];

        let query = SearchQuery::parse("İ").unwrap();
        assert_eq!(query.filter(&records).len(), 1);
        assert_eq!(query.match_spans("İstanbul"), [0.."İ".len()]);

        let plain_i = SearchQuery::parse("i").unwrap();
        assert_eq!(plain_i.filter(&records).len(), 1);
        assert_eq!(plain_i.match_spans("İstanbul"), [0.."İ".len()]);

        let mid_char = SearchQuery::parse("\u{307}st").unwrap();
        assert_eq!(mid_char.filter(&records).len(), 1);
        assert_eq!(mid_char.match_spans("İstanbul"), [0.."İst".len()]);
    }

    #[test]
    fn test_every_filtered_record_has_a_span() {
        let records = vec![
            record(1, "ΣΟΦΙΑ", "e", "m"),
            record(2, "Straße", "e", "m"),
            record(3, "İzmir", "e", "m"),
        ];
        for raw in ["σ", "ς", "ß", "i\u{307}", "İZ", "a"] {
            let query = SearchQuery::parse(raw).unwrap();
            for hit in query.filter(&records) {
                assert!(!query.match_spans(&hit.name).is_empty(), "{raw} in {}", hit.name);
            }
        }
    }

    #[test]
    fn test_inner_whitespace_kept() {
        let records = fixture();
        let query = SearchQuery::parse(" hong kong ").unwrap();
        let hits = query.filter(&records);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);
    }
}
