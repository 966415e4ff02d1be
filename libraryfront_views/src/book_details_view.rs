use std::sync::Arc;

use libraryfront_catalog::api::BookRecord;
use libraryfront_catalog::borrow_gate::{borrow, borrow_disabled};
use libraryfront_catalog::remote_catalog::RemoteCatalog;
use libraryfront_catalog::routes::{is_remote_identity, Route};
use libraryfront_catalog::static_catalog::static_books;

use crate::notice::{redirect_for, Notice};
use crate::request_generation::RequestGeneration;

pub const BOOK_NOT_FOUND_MESSAGE: &str = "Book not found";

pub struct BookDetailsView {
    remote: Arc<dyn RemoteCatalog>,
    generation: RequestGeneration,
    book: Option<BookRecord>,
    error: Option<String>,
    notice: Option<Notice>,
    redirect: Option<Route>,
}

impl BookDetailsView {
    pub fn new(remote: Arc<dyn RemoteCatalog>) -> Self {
        Self {
            remote,
            generation: RequestGeneration::default(),
            book: None,
            error: None,
            notice: None,
            redirect: None,
        }
    }

    /// Resolves the route parameter, either a remote identity or an encoded static title
    pub async fn open(&mut self, param: &str) {
        let ticket = self.generation.begin();
        let found = lookup(self.remote.as_ref(), param).await;
        if !self.generation.is_current(ticket) {
            return;
        }

        self.notice = None;
        match found {
            Some(book) => {
                self.book = Some(book);
                self.error = None;
            }
            None => {
                self.book = None;
                self.error = Some(BOOK_NOT_FOUND_MESSAGE.to_string());
            }
        }
    }

    pub async fn borrow(&mut self) {
        let Some(book) = self.book.as_mut() else {
            return;
        };

        self.notice = Some(match borrow(self.remote.as_ref(), book).await {
            Ok(()) => Notice::success("Borrowed"),
            Err(err) => {
                tracing::warn!("Failed to borrow {}: {}", book.title, err);
                self.redirect = redirect_for(&err);
                Notice::failure(&err, "Borrow failed")
            }
        });
    }

    pub fn borrow_disabled(&self) -> bool {
        self.book.as_ref().map_or(true, borrow_disabled)
    }

    pub fn book(&self) -> Option<&BookRecord> {
        self.book.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_redirect(&mut self) -> Option<Route> {
        self.redirect.take()
    }
}

async fn lookup(remote: &dyn RemoteCatalog, param: &str) -> Option<BookRecord> {
    if is_remote_identity(param) {
        match remote.get_book(param).await {
            Ok(book) => return Some(book),
            Err(err) => tracing::warn!("Failed to fetch book {}: {}", param, err),
        }
    }
    find_static_by_title(param)
}

fn find_static_by_title(param: &str) -> Option<BookRecord> {
    let title = match urlencoding::decode(param) {
        Ok(title) => title.into_owned(),
        Err(err) => {
            tracing::warn!("Book parameter is not valid UTF-8: {}", err);
            param.to_string()
        }
    };
    let title = title.to_lowercase();
    static_books()
        .iter()
        .find(|book| book.title.to_lowercase() == title)
        .cloned()
}

#[cfg(test)]
mod book_details_view_tests {
    use std::sync::Arc;

    use libraryfront_catalog::api::BookRecord;
    use libraryfront_catalog::error::LibraryError;
    use libraryfront_catalog::remote_catalog::InMemoryRemoteCatalog;
    use libraryfront_catalog::routes::Route;

    use crate::book_details_view::{BookDetailsView, BOOK_NOT_FOUND_MESSAGE};
    use crate::notice::Notice;

    fn catalog() -> Arc<InMemoryRemoteCatalog> {
        Arc::new(InMemoryRemoteCatalog::with_books(vec![BookRecord {
            quantity: Some(2),
            available: Some(1),
            ..BookRecord::new("Dune")
        }]))
    }

    const DUNE_ID: &str = "000000000000000000000001";

    #[tokio::test]
    async fn test_open_remote_book_and_borrow() {
        let remote = catalog();
        let mut view = BookDetailsView::new(remote.clone());

        view.open(DUNE_ID).await;
        assert_eq!(view.book().map(|b| b.title.as_str()), Some("Dune"));
        assert!(!view.borrow_disabled());

        view.borrow().await;
        assert_eq!(view.notice(), Some(&Notice::success("Borrowed")));
        assert_eq!(view.book().unwrap().available, Some(0));
        assert!(view.borrow_disabled());
        assert_eq!(remote.book(DUNE_ID).unwrap().available, Some(0));
    }

    #[tokio::test]
    async fn test_open_static_book_by_encoded_title() {
        let remote = catalog();
        let mut view = BookDetailsView::new(remote.clone());

        view.open("hanged%20man%E2%80%99s%20log").await;

        assert_eq!(
            view.book().map(|b| b.title.as_str()),
            Some("Hanged Man’s Log")
        );
        assert!(view.borrow_disabled());

        view.borrow().await;
        assert_eq!(
            view.notice(),
            Some(&Notice::error("This item cannot be borrowed here."))
        );
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_book() {
        let mut view = BookDetailsView::new(catalog());
        view.open("ffffffffffffffffffffffff").await;
        assert_eq!(view.book(), None);
        assert_eq!(view.error(), Some(BOOK_NOT_FOUND_MESSAGE));

        view.open("No%20Such%20Title").await;
        assert_eq!(view.error(), Some(BOOK_NOT_FOUND_MESSAGE));
    }

    #[tokio::test]
    async fn test_expired_session_on_borrow() {
        let remote = catalog();
        let mut view = BookDetailsView::new(remote.clone());
        view.open(DUNE_ID).await;

        remote.set_failure(Some(LibraryError::Auth("Token expired".to_string())));
        view.borrow().await;

        assert_eq!(view.notice(), Some(&Notice::error("Token expired")));
        assert_eq!(view.take_redirect(), Some(Route::Entry));
        assert_eq!(view.book().unwrap().available, Some(1));
    }
}
