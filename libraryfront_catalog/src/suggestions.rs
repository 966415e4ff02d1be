use std::fmt;

use regex::RegexBuilder;

use crate::api::BookRecord;
use crate::projection::matches_query;
use crate::routes::Route;

pub const MAX_SUGGESTIONS: usize = 8;

const EMPHASIS_OPEN: &str = "<mark>";
const EMPHASIS_CLOSE: &str = "</mark>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightSegment {
    Plain(String),
    Emphasis(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Title split into plain parts and parts matching the query, casing preserved
pub struct HighlightedText {
    pub segments: Vec<HighlightSegment>,
}

impl fmt::Display for HighlightedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                HighlightSegment::Plain(text) => f.write_str(text)?,
                HighlightSegment::Emphasis(text) => {
                    write!(f, "{}{}{}", EMPHASIS_OPEN, text, EMPHASIS_CLOSE)?
                }
            }
        }
        Ok(())
    }
}

/// Wraps every case-insensitive occurrence of the trimmed query
pub fn highlight(text: &str, query: &str) -> HighlightedText {
    let query = query.trim();
    let plain = || HighlightedText {
        segments: vec![HighlightSegment::Plain(text.to_string())],
    };
    if query.is_empty() {
        return plain();
    }
    let Ok(pattern) = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    else {
        return plain();
    };

    let mut segments = vec![];
    let mut last_end = 0;
    for found in pattern.find_iter(text) {
        if found.start() > last_end {
            segments.push(HighlightSegment::Plain(
                text[last_end..found.start()].to_string(),
            ));
        }
        segments.push(HighlightSegment::Emphasis(found.as_str().to_string()));
        last_end = found.end();
    }
    if last_end < text.len() {
        segments.push(HighlightSegment::Plain(text[last_end..].to_string()));
    }
    HighlightedText { segments }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub book: BookRecord,
    pub title: HighlightedText,
    /// Author and first two genres
    pub subtitle: Option<String>,
    pub target: Route,
}

/// Type-ahead suggestions for the navigation bar. A blank query yields nothing,
/// which suppresses the dropdown rather than showing an empty result state.
pub fn suggest(dataset: &[BookRecord], query: &str) -> Vec<Suggestion> {
    let query_lower = query.trim().to_lowercase();
    if query_lower.is_empty() {
        return vec![];
    }

    dataset
        .iter()
        .filter(|book| matches_query(book, &query_lower))
        .take(MAX_SUGGESTIONS)
        .map(|book| Suggestion {
            book: book.clone(),
            title: highlight(&book.title, query),
            subtitle: subtitle(book),
            target: Route::book_details(book),
        })
        .collect()
}

fn subtitle(book: &BookRecord) -> Option<String> {
    let genres = book.genres.iter().take(2).cloned().collect::<Vec<_>>().join(", ");
    let parts: Vec<&str> = [book.author.as_deref().unwrap_or_default(), genres.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(" · "))
}
