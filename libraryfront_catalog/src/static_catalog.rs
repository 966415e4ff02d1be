use once_cell::sync::Lazy;

use crate::api::BookRecord;

static STATIC_BOOKS: Lazy<Vec<BookRecord>> = Lazy::new(|| {
    vec![
        static_book(
            "Lord of the Mysteries",
            "LIGHT NOVEL",
            9.0,
            &["Mystery", "Fantasy", "Steampunk"],
            "Completed",
            "Cuttlefish",
            "A tale of intrigue and occultism where a young man unravels the secrets of the Beyonder world.",
            "/58826678.jpg",
        ),
        static_book(
            "Klein Moretti Journal",
            "NOVEL",
            8.0,
            &["Diary", "Occult"],
            "N/A",
            "Klein",
            "Records of a Beyonder’s rise through sequences, meetings above the gray fog, and fate’s pull.",
            "/lotm-general-the-essence-of-the-fool-v0-vc39e5jq9x2e1.webp",
        ),
        static_book(
            "Justice’s Notes",
            "NOVEL",
            8.0,
            &["Psychology", "Growth"],
            "Ongoing",
            "Audrey Hall",
            "The journey of a noble lady as she learns hypnosis, growth, and responsibility as The Justice.",
            "/Audrey_Hall_Official.webp",
        ),
        static_book(
            "Hanged Man’s Log",
            "WEB NOVEL",
            8.0,
            &["Sailing", "Adventure"],
            "Ongoing",
            "Alger Wilson",
            "Sail the dangerous seas while climbing the path of the Hanged Man and navigating faith.",
            "/Alger_Wilson_Official.webp",
        ),
        static_book(
            "City of Silver Records",
            "WEB NOVEL",
            9.0,
            &["Survival", "Myth"],
            "Ongoing",
            "Derrick Berg",
            "Chronicles from a forgotten city battling ancient darkness and pursuing the light of the Sun.",
            "/Derrick_Berg_Official.webp",
        ),
        static_book(
            "Magician’s Travels",
            "LIGHT NOVEL",
            8.0,
            &["Adventure", "Mystery"],
            "Ongoing",
            "Fors Wall",
            "A writer’s wandering path through the extraordinary, where every trip hides an arcane clue.",
            "/Fors_Wall_Official.webp",
        ),
        static_book(
            "Evernight’s Veil",
            "WEB NOVEL",
            7.0,
            &["Concept", "Myth"],
            "N/A",
            "Fan Art",
            "An artistic rendition capturing the solemn veil of the Evernight and quiet miracles of dusk.",
            "/1yxy15u.jpg",
        ),
        static_book(
            "Relics of the Ages",
            "NOVEL",
            7.0,
            &["Artifacts", "Lore"],
            "N/A",
            "Fan Art",
            "A gallery of mystical relics that shaped the world—each with a price, each with a story.",
            "/1373839.png",
        ),
    ]
});

#[allow(clippy::too_many_arguments)]
fn static_book(
    title: &str,
    book_type: &str,
    rating: f64,
    genres: &[&str],
    status: &str,
    author: &str,
    summary: &str,
    cover: &str,
) -> BookRecord {
    BookRecord {
        title: title.to_string(),
        book_type: Some(book_type.to_string()),
        rating: Some(rating),
        genres: genres.iter().map(|genre| genre.to_string()).collect(),
        status: Some(status.to_string()),
        author: Some(author.to_string()),
        summary: Some(summary.to_string()),
        cover: Some(cover.to_string()),
        ..BookRecord::default()
    }
}

/// Books bundled with the application, shown when the API is unreachable or empty.
/// They carry no identity and no copy counts.
pub fn static_books() -> &'static [BookRecord] {
    &STATIC_BOOKS
}
