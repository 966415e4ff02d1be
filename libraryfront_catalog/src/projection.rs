use std::cmp::Ordering;

use itertools::Itertools;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::api::BookRecord;

/// Filter value that disables the status or type stage
pub const ALL: &str = "all";

/// Statuses offered by the status dropdown
pub const KNOWN_STATUSES: [&str; 3] = ["Completed", "Ongoing", "N/A"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    TitleAsc,
    TitleDesc,
    RatingDesc,
    RatingAsc,
    /// Keeps the filtered order
    Unsorted,
}

impl SortKey {
    /// Parses the dropdown value, unknown values keep the filtered order
    pub fn parse(value: &str) -> Self {
        match value {
            "title-asc" => SortKey::TitleAsc,
            "title-desc" => SortKey::TitleDesc,
            "rating-desc" => SortKey::RatingDesc,
            "rating-asc" => SortKey::RatingAsc,
            _ => SortKey::Unsorted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::TitleAsc => "title-asc",
            SortKey::TitleDesc => "title-desc",
            SortKey::RatingDesc => "rating-desc",
            SortKey::RatingAsc => "rating-asc",
            SortKey::Unsorted => "unsorted",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    pub query: String,
    pub status_filter: String,
    pub type_filter: String,
    pub sort_key: SortKey,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            query: String::new(),
            status_filter: ALL.to_string(),
            type_filter: ALL.to_string(),
            sort_key: SortKey::default(),
        }
    }
}

/// Case-insensitive substring match against title, author or any genre.
/// `query_lower` must already be trimmed and lower cased.
pub fn matches_query(book: &BookRecord, query_lower: &str) -> bool {
    book.title.to_lowercase().contains(query_lower)
        || book
            .author
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
            .contains(query_lower)
        || book
            .genres
            .iter()
            .any(|genre| genre.to_lowercase().contains(query_lower))
}

/// Applies search, status filter, type filter and sorting, in that order.
/// The input is left untouched, ties keep their relative order.
pub fn project(list: &[BookRecord], config: &ProjectionConfig) -> Vec<BookRecord> {
    let query = config.query.trim().to_lowercase();
    let status_filter = config.status_filter.to_lowercase();

    let mut result: Vec<BookRecord> = list
        .iter()
        .filter(|book| query.is_empty() || matches_query(book, &query))
        .filter(|book| {
            config.status_filter == ALL
                || book.status.as_deref().unwrap_or_default().to_lowercase() == status_filter
        })
        .filter(|book| {
            config.type_filter == ALL
                || book.book_type.as_deref() == Some(config.type_filter.as_str())
        })
        .cloned()
        .collect();

    // sort_by is stable
    match config.sort_key {
        SortKey::TitleAsc => result.sort_by(|a, b| locale_compare(&a.title, &b.title)),
        SortKey::TitleDesc => result.sort_by(|a, b| locale_compare(&b.title, &a.title)),
        SortKey::RatingDesc => result.sort_by(|a, b| rating_or_zero(b).total_cmp(&rating_or_zero(a))),
        SortKey::RatingAsc => result.sort_by(|a, b| rating_or_zero(a).total_cmp(&rating_or_zero(b))),
        SortKey::Unsorted => {}
    }
    result
}

fn rating_or_zero(book: &BookRecord) -> f64 {
    book.rating.unwrap_or(0.0)
}

/// Dictionary order: letters compare without accents or case first,
/// then unaccented before accented, then lower case before upper case
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| {
            a.nfd()
                .flat_map(char::to_lowercase)
                .cmp(b.nfd().flat_map(char::to_lowercase))
        })
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

fn base_letters(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Distinct non-empty types in first-seen order, used for the type dropdown
pub fn available_types(list: &[BookRecord]) -> Vec<String> {
    list.iter()
        .filter_map(|book| book.book_type.as_deref())
        .filter(|book_type| !book_type.is_empty())
        .unique()
        .map(str::to_string)
        .collect()
}
