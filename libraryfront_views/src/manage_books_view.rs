use std::sync::Arc;

use libraryfront_catalog::api::{BookRecord, Role};
use libraryfront_catalog::catalog_merge::{
    outstanding_returns, static_only_rows, unique_title_count, CatalogStats,
};
use libraryfront_catalog::error::LibraryError;
use libraryfront_catalog::remote_catalog::RemoteCatalog;
use libraryfront_catalog::routes::Route;
use libraryfront_catalog::static_catalog::static_books;

use crate::forms::BookForm;
use crate::notice::{redirect_for, Notice};
use crate::request_generation::RequestGeneration;

pub const ACCESS_DENIED_MESSAGE: &str = "Access denied";
const MISSING_IDENTITY_MESSAGE: &str = "This book has no identity and cannot be changed";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManageSummary {
    pub unique_titles: usize,
    pub available: u64,
    pub borrowed: u64,
    pub need_return: usize,
}

/// Admin page listing remote books, gated on the role of the logged in user
pub struct ManageBooksView {
    remote: Arc<dyn RemoteCatalog>,
    role: Role,
    generation: RequestGeneration,
    books: Vec<BookRecord>,
    need_return: usize,
    form: BookForm,
    editing: Option<String>,
    notice: Option<Notice>,
    redirect: Option<Route>,
}

impl ManageBooksView {
    pub fn new(remote: Arc<dyn RemoteCatalog>, role: Role) -> Self {
        Self {
            remote,
            role,
            generation: RequestGeneration::default(),
            books: vec![],
            need_return: 0,
            form: BookForm::default(),
            editing: None,
            notice: None,
            redirect: None,
        }
    }

    pub fn access_granted(&self) -> bool {
        self.role.can_manage_books()
    }

    pub async fn load(&mut self) {
        if !self.ensure_access() {
            return;
        }

        let ticket = self.generation.begin();
        let books = match self.remote.list_books().await {
            Err(err) if err.is_auth() => {
                if self.generation.is_current(ticket) {
                    tracing::warn!("Failed to load books: {}", err);
                    self.fail(err, "Failed to load books");
                }
                return;
            }
            books => books,
        };
        let records = self.remote.list_borrow_records().await;
        if !self.generation.is_current(ticket) {
            return;
        }

        match books {
            Ok(books) => self.books = books,
            Err(err) => {
                tracing::warn!("Failed to load books: {}", err);
                self.fail(err, "Failed to load books");
            }
        }
        self.need_return = match records {
            Ok(records) => outstanding_returns(&records),
            Err(err) => {
                tracing::warn!("Failed to load borrow records: {}", err);
                0
            }
        };
    }

    /// Creates a new book, or updates the one being edited
    pub async fn submit(&mut self) {
        if !self.ensure_access() {
            return;
        }
        let payload = match self.form.to_payload() {
            Ok(payload) => payload,
            Err(err) => {
                self.notice = Some(Notice::error(err.to_string()));
                return;
            }
        };

        let result = match self.editing.clone() {
            Some(identity) => self
                .remote
                .update_book(&identity, payload)
                .await
                .map(|updated| {
                    if let Some(slot) = self
                        .books
                        .iter_mut()
                        .find(|book| book.identity.as_deref() == Some(identity.as_str()))
                    {
                        *slot = updated;
                    }
                    "Book updated"
                }),
            None => self.remote.create_book(payload).await.map(|created| {
                self.books.insert(0, created);
                "Book created"
            }),
        };

        match result {
            Ok(message) => {
                tracing::info!("{}", message);
                self.notice = Some(Notice::success(message));
                self.reset_form();
            }
            Err(err) => {
                tracing::error!("Failed to save book: {}", err);
                self.fail(err, "Save failed");
            }
        }
    }

    /// Pre-fills the form with the book
    pub fn edit(&mut self, book: &BookRecord) {
        let Some(identity) = book.identity.clone() else {
            self.notice = Some(Notice::error(MISSING_IDENTITY_MESSAGE));
            return;
        };
        self.form = BookForm::from_record(book);
        self.editing = Some(identity);
    }

    pub fn reset_form(&mut self) {
        self.form = BookForm::default();
        self.editing = None;
    }

    pub async fn delete(&mut self, book: &BookRecord) {
        if !self.ensure_access() {
            return;
        }
        let Some(identity) = book.identity.as_deref() else {
            self.notice = Some(Notice::error(MISSING_IDENTITY_MESSAGE));
            return;
        };

        match self.remote.delete_book(identity).await {
            Ok(()) => {
                self.books
                    .retain(|book| book.identity.as_deref() != Some(identity));
                if self.editing.as_deref() == Some(identity) {
                    self.reset_form();
                }
                tracing::info!("Deleted book {}", identity);
                self.notice = Some(Notice::success("Book deleted"));
            }
            Err(err) => {
                tracing::error!("Failed to delete book {}: {}", identity, err);
                self.fail(err, "Delete failed");
            }
        }
    }

    pub async fn delete_all(&mut self) {
        if !self.ensure_access() {
            return;
        }
        match self.remote.delete_all_books().await {
            Ok(()) => {
                self.books.clear();
                self.reset_form();
                tracing::info!("Deleted all books");
                self.notice = Some(Notice::success("All books removed"));
            }
            Err(err) => {
                tracing::error!("Failed to delete all books: {}", err);
                self.fail(err, "Bulk delete failed");
            }
        }
    }

    /// Marks a loan as returned and refreshes the books and the return count
    pub async fn mark_returned(&mut self, user_id: &str, book_id: &str) {
        if !self.ensure_access() {
            return;
        }
        match self.remote.return_book(user_id, book_id).await {
            Ok(()) => {
                self.notice = Some(Notice::success("Book returned"));
                self.load().await;
            }
            Err(err) => {
                tracing::error!("Failed to return book {}: {}", book_id, err);
                self.fail(err, "Return failed");
            }
        }
    }

    pub fn summary(&self) -> ManageSummary {
        let stats = CatalogStats::from_remote(&self.books);
        ManageSummary {
            unique_titles: unique_title_count(&self.books, static_books()),
            available: stats.available,
            borrowed: stats.borrowed,
            need_return: self.need_return,
        }
    }

    /// Bundled books shown below the remote ones, read only
    pub fn static_rows(&self) -> Vec<&'static BookRecord> {
        static_only_rows(&self.books, static_books())
    }

    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn form(&self) -> &BookForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut BookForm {
        &mut self.form
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_redirect(&mut self) -> Option<Route> {
        self.redirect.take()
    }

    fn ensure_access(&mut self) -> bool {
        if !self.access_granted() {
            self.notice = Some(Notice::error(ACCESS_DENIED_MESSAGE));
            return false;
        }
        true
    }

    fn fail(&mut self, err: LibraryError, fallback: &str) {
        self.redirect = redirect_for(&err);
        self.notice = Some(Notice::failure(&err, fallback));
    }
}
