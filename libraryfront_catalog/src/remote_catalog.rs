pub use in_memory_remote_catalog::InMemoryRemoteCatalog;

use crate::api::{BookPayload, BookRecord, BorrowRecord, LoginResponse, ProfileUpdate, Role, User};
use crate::error::LibraryError;

mod in_memory_remote_catalog;

#[async_trait::async_trait]
pub trait RemoteCatalog: Send + Sync {
    /// Lists all books known to the API
    async fn list_books(&self) -> Result<Vec<BookRecord>, LibraryError>;
    /// Retrieves a single book, fails with NotFound for unknown identities
    async fn get_book(&self, book_id: &str) -> Result<BookRecord, LibraryError>;
    /// Creates a book, returns it with its assigned identity
    async fn create_book(&self, payload: BookPayload) -> Result<BookRecord, LibraryError>;
    /// Updates a book, returns the stored version
    async fn update_book(
        &self,
        book_id: &str,
        payload: BookPayload,
    ) -> Result<BookRecord, LibraryError>;
    async fn delete_book(&self, book_id: &str) -> Result<(), LibraryError>;
    async fn delete_all_books(&self) -> Result<(), LibraryError>;
    /// Borrows one copy, fails with Conflict when no copies are left
    async fn borrow_book(&self, book_id: &str) -> Result<(), LibraryError>;
    async fn return_book(&self, user_id: &str, book_id: &str) -> Result<(), LibraryError>;
    async fn list_borrow_records(&self) -> Result<Vec<BorrowRecord>, LibraryError>;
}

#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, LibraryError>;
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<(), LibraryError>;
    /// Profile of the user owning the current session
    async fn get_me(&self) -> Result<User, LibraryError>;
    async fn update_me(&self, update: ProfileUpdate) -> Result<(), LibraryError>;
}
