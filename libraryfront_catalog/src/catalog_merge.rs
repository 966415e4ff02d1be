use std::collections::HashSet;

use itertools::Itertools;

use crate::api::{BookRecord, BorrowRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Copy counts summed over books fetched from the API, bundled books never contribute
pub struct CatalogStats {
    pub total_copies: u64,
    pub available: u64,
    pub borrowed: u64,
}

impl CatalogStats {
    pub fn from_remote(remote: &[BookRecord]) -> Self {
        let total_copies: u64 = remote
            .iter()
            .map(|book| u64::from(book.quantity_or_zero()))
            .sum();
        let available: u64 = remote
            .iter()
            .map(|book| u64::from(book.counted_available()))
            .sum();
        Self {
            total_copies,
            available,
            borrowed: total_copies.saturating_sub(available),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    /// Books to display before filtering and sorting
    pub working: Vec<BookRecord>,
    /// Number of distinct normalized titles across remote and bundled books
    pub unique_titles: usize,
    pub stats: CatalogStats,
}

/// Combines books fetched from the API with the bundled ones.
/// Remote books fully replace the bundled list when there is at least one of them.
pub fn merge(remote: &[BookRecord], static_books: &[BookRecord]) -> CatalogSnapshot {
    let working = if remote.is_empty() {
        static_books.to_vec()
    } else {
        remote.to_vec()
    };

    CatalogSnapshot {
        working,
        unique_titles: unique_title_count(remote, static_books),
        stats: CatalogStats::from_remote(remote),
    }
}

pub fn unique_title_count(remote: &[BookRecord], static_books: &[BookRecord]) -> usize {
    remote
        .iter()
        .chain(static_books.iter())
        .map(BookRecord::normalized_title)
        .filter(|title| !title.is_empty())
        .unique()
        .count()
}

/// Bundled books with no remote counterpart, in bundled order
pub fn static_only_rows<'a>(
    remote: &[BookRecord],
    static_books: &'a [BookRecord],
) -> Vec<&'a BookRecord> {
    let remote_titles: HashSet<String> = remote
        .iter()
        .map(BookRecord::normalized_title)
        .filter(|title| !title.is_empty())
        .collect();

    static_books
        .iter()
        .filter(|book| {
            let title = book.normalized_title();
            !title.is_empty() && !remote_titles.contains(&title)
        })
        .collect()
}

/// Number of borrowed books that still need to be returned
pub fn outstanding_returns(records: &[BorrowRecord]) -> usize {
    records
        .iter()
        .filter(|record| record.is_outstanding())
        .count()
}
