use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::BookRecord;

static HEX_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-fA-F0-9]{24}$").expect("valid identity pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Entry point, where expired sessions are sent
    Entry,
    Home,
    Featured,
    Books { search: Option<String> },
    BookDetails(String),
    Login,
    ManageBooks,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Entry => "/".to_string(),
            Route::Home => "/home".to_string(),
            Route::Featured => "/featured".to_string(),
            Route::Books { search: None } => "/books".to_string(),
            Route::Books {
                search: Some(search),
            } => format!("/books?search={}", urlencoding::encode(search)),
            Route::BookDetails(param) => format!("/books/{}", param),
            Route::Login => "/login".to_string(),
            Route::ManageBooks => "/manage-books".to_string(),
        }
    }

    /// Link to a book: its identity when known, otherwise its encoded title
    pub fn book_details(book: &BookRecord) -> Self {
        match &book.identity {
            Some(identity) => Route::BookDetails(identity.clone()),
            None => Route::BookDetails(urlencoding::encode(&book.title).into_owned()),
        }
    }

    /// Quick search target, a blank term opens the full list
    pub fn search(term: &str) -> Self {
        let term = term.trim();
        Route::Books {
            search: (!term.is_empty()).then(|| term.to_string()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Remote identities are 24 character hex strings
pub fn is_remote_identity(param: &str) -> bool {
    HEX_ID.is_match(param)
}
