use std::cmp::Ordering;

use crate::api::BookRecord;
use crate::projection::locale_compare;

const NO_OF_RECOMMENDATIONS: usize = 12;
const MISSING_SCORE_LABEL: &str = "—";

/// Books for the "new books" slider, anything that is not completed yet
pub fn slider_books(dataset: &[BookRecord]) -> Vec<&BookRecord> {
    dataset
        .iter()
        .filter(|book| {
            !book
                .status
                .as_deref()
                .unwrap_or_default()
                .eq_ignore_ascii_case("completed")
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedBook {
    pub rank: usize,
    pub book: BookRecord,
}

impl RankedBook {
    /// Rating on a five point scale with one decimal
    pub fn score_label(&self) -> String {
        self.book
            .rating
            .map(|rating| format!("{:.1}", rating / 2.0))
            .unwrap_or_else(|| MISSING_SCORE_LABEL.to_string())
    }
}

/// Flagged books when any are flagged, otherwise all of them.
/// Highest rating first, unrated last, then by title.
pub fn recommendations(dataset: &[BookRecord]) -> Vec<RankedBook> {
    let flagged: Vec<&BookRecord> = dataset
        .iter()
        .filter(|book| book.recommended == Some(true))
        .collect();
    let mut base: Vec<&BookRecord> = if flagged.is_empty() {
        dataset.iter().collect()
    } else {
        flagged
    };
    base.retain(|book| !book.title.is_empty());

    base.sort_by(|a, b| {
        let rating_a = a.rating.unwrap_or(-1.0);
        let rating_b = b.rating.unwrap_or(-1.0);
        match rating_b.total_cmp(&rating_a) {
            Ordering::Equal => locale_compare(&a.title, &b.title),
            ordering => ordering,
        }
    });

    base.into_iter()
        .take(NO_OF_RECOMMENDATIONS)
        .enumerate()
        .map(|(index, book)| RankedBook {
            rank: index + 1,
            book: book.clone(),
        })
        .collect()
}
