use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde_json::json;

use crate::api::{
    BookId, BookPayload, BookRecord, BorrowRecord, LoginResponse, ProfileUpdate, Role, User,
    UserId,
};
use crate::error::LibraryError;
use crate::remote_catalog::{AccountService, RemoteCatalog};

struct Loan {
    user_id: Option<UserId>,
    book_id: BookId,
    record: BorrowRecord,
}

struct Account {
    password: String,
    user: User,
}

/// Remote catalog kept in memory, used by tests and offline demos.
/// Identities are 24 character hex strings like the ones the API hands out.
pub struct InMemoryRemoteCatalog {
    book_sequence_generator: AtomicU64,
    user_sequence_generator: AtomicU64,
    books: parking_lot::RwLock<BTreeMap<BookId, BookRecord>>,
    loans: parking_lot::RwLock<Vec<Loan>>,
    accounts: parking_lot::RwLock<HashMap<String, Account>>,
    logged_in_email: parking_lot::RwLock<Option<String>>,
    failure: parking_lot::RwLock<Option<LibraryError>>,
    calls: AtomicUsize,
}

impl Default for InMemoryRemoteCatalog {
    fn default() -> Self {
        Self {
            book_sequence_generator: Default::default(),
            user_sequence_generator: Default::default(),
            books: Default::default(),
            loans: Default::default(),
            accounts: Default::default(),
            logged_in_email: Default::default(),
            failure: Default::default(),
            calls: Default::default(),
        }
    }
}

impl InMemoryRemoteCatalog {
    /// Creates a catalog holding the given books, each one gets a fresh identity
    pub fn with_books(books: Vec<BookRecord>) -> Self {
        let catalog = Self::default();
        {
            let mut locked_books = catalog.books.write();
            for book in books {
                let id = catalog.next_book_id();
                locked_books.insert(
                    id.clone(),
                    BookRecord {
                        identity: Some(id),
                        ..book
                    },
                );
            }
        }
        catalog
    }

    /// Every following call fails with the given error until cleared with None
    pub fn set_failure(&self, failure: Option<LibraryError>) {
        *self.failure.write() = failure;
    }

    /// Number of calls received, including failed ones
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn book(&self, book_id: &str) -> Option<BookRecord> {
        self.books.read().get(book_id).cloned()
    }

    fn next_book_id(&self) -> BookId {
        format!(
            "{:024x}",
            self.book_sequence_generator.fetch_add(1, Ordering::Relaxed) + 1
        )
    }

    fn receive_call(&self) -> Result<(), LibraryError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match self.failure.read().clone() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    fn current_user(&self) -> Result<User, LibraryError> {
        let email = self
            .logged_in_email
            .read()
            .clone()
            .ok_or_else(|| LibraryError::Auth("Not authenticated".to_string()))?;
        self.accounts
            .read()
            .get(&email)
            .map(|account| account.user.clone())
            .ok_or_else(|| LibraryError::Auth("Not authenticated".to_string()))
    }
}

fn book_not_found(book_id: &str) -> LibraryError {
    LibraryError::NotFound(format!("Book {} not found", book_id))
}

#[async_trait::async_trait]
impl RemoteCatalog for InMemoryRemoteCatalog {
    async fn list_books(&self) -> Result<Vec<BookRecord>, LibraryError> {
        self.receive_call()?;
        Ok(self.books.read().values().cloned().collect())
    }

    async fn get_book(&self, book_id: &str) -> Result<BookRecord, LibraryError> {
        self.receive_call()?;
        self.books
            .read()
            .get(book_id)
            .cloned()
            .ok_or_else(|| book_not_found(book_id))
    }

    async fn create_book(&self, payload: BookPayload) -> Result<BookRecord, LibraryError> {
        self.receive_call()?;
        let id = self.next_book_id();
        let mut book: BookRecord = serde_json::from_value(json!(payload))
            .map_err(|err| LibraryError::Api(err.to_string()))?;
        book.identity = Some(id.clone());
        self.books.write().insert(id, book.clone());
        Ok(book)
    }

    async fn update_book(
        &self,
        book_id: &str,
        payload: BookPayload,
    ) -> Result<BookRecord, LibraryError> {
        self.receive_call()?;
        let mut locked_books = self.books.write();
        let book = locked_books
            .get_mut(book_id)
            .ok_or_else(|| book_not_found(book_id))?;

        let mut result_book = json!(book);
        json_patch::merge(&mut result_book, &json!(payload));
        let result_book: BookRecord = serde_json::from_value(result_book)
            .map_err(|err| LibraryError::Api(err.to_string()))?;
        *book = result_book.clone();
        Ok(result_book)
    }

    async fn delete_book(&self, book_id: &str) -> Result<(), LibraryError> {
        self.receive_call()?;
        self.books
            .write()
            .remove(book_id)
            .map(|_| ())
            .ok_or_else(|| book_not_found(book_id))
    }

    async fn delete_all_books(&self) -> Result<(), LibraryError> {
        self.receive_call()?;
        self.books.write().clear();
        Ok(())
    }

    async fn borrow_book(&self, book_id: &str) -> Result<(), LibraryError> {
        self.receive_call()?;
        let user_id = self.current_user().ok().and_then(|user| user.id);
        let mut locked_books = self.books.write();
        let book = locked_books
            .get_mut(book_id)
            .ok_or_else(|| book_not_found(book_id))?;

        match book.available {
            Some(available) if available > 0 => {
                book.available = Some(available - 1);
                self.loans.write().push(Loan {
                    user_id,
                    book_id: book_id.to_string(),
                    record: BorrowRecord::with_return_date("pending"),
                });
                Ok(())
            }
            _ => Err(LibraryError::Conflict("No copies available".to_string())),
        }
    }

    async fn return_book(&self, user_id: &str, book_id: &str) -> Result<(), LibraryError> {
        self.receive_call()?;
        // books before loans, same order as borrow_book
        let mut locked_books = self.books.write();
        let mut locked_loans = self.loans.write();
        let loan = locked_loans
            .iter_mut()
            .find(|loan| {
                loan.book_id == book_id
                    && loan.user_id.as_deref() == Some(user_id)
                    && loan.record.is_outstanding()
            })
            .ok_or_else(|| LibraryError::NotFound("Borrow record not found".to_string()))?;
        loan.record = BorrowRecord::with_return_date("returned");

        if let Some(book) = locked_books.get_mut(book_id) {
            let available = book.available_or_zero() + 1;
            book.available = Some(match book.quantity {
                Some(quantity) => available.min(quantity),
                None => available,
            });
        }
        Ok(())
    }

    async fn list_borrow_records(&self) -> Result<Vec<BorrowRecord>, LibraryError> {
        self.receive_call()?;
        Ok(self
            .loans
            .read()
            .iter()
            .map(|loan| loan.record.clone())
            .collect())
    }
}

#[async_trait::async_trait]
impl AccountService for InMemoryRemoteCatalog {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, LibraryError> {
        self.receive_call()?;
        let locked_accounts = self.accounts.read();
        let account = locked_accounts
            .get(email)
            .filter(|account| account.password == password)
            .ok_or_else(|| LibraryError::Auth("Invalid email or password".to_string()))?;
        *self.logged_in_email.write() = Some(email.to_string());

        Ok(LoginResponse {
            token: Some(format!(
                "token-{}",
                account.user.id.clone().unwrap_or_default()
            )),
            data: Some(account.user.clone()),
        })
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<(), LibraryError> {
        self.receive_call()?;
        let mut locked_accounts = self.accounts.write();
        if locked_accounts.contains_key(email) {
            return Err(LibraryError::Conflict("User already exists".to_string()));
        }
        let id = format!(
            "{:024x}",
            self.user_sequence_generator.fetch_add(1, Ordering::Relaxed) + 1
        );
        locked_accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user: User {
                    id: Some(id),
                    name: name.to_string(),
                    email: email.to_string(),
                    role,
                },
            },
        );
        Ok(())
    }

    async fn get_me(&self) -> Result<User, LibraryError> {
        self.receive_call()?;
        self.current_user()
    }

    async fn update_me(&self, update: ProfileUpdate) -> Result<(), LibraryError> {
        self.receive_call()?;
        let email = self
            .logged_in_email
            .read()
            .clone()
            .ok_or_else(|| LibraryError::Auth("Not authenticated".to_string()))?;
        let mut locked_accounts = self.accounts.write();
        let mut account = locked_accounts
            .remove(&email)
            .ok_or_else(|| LibraryError::Auth("Not authenticated".to_string()))?;
        account.user.name = update.name;
        account.user.email = update.email.clone();
        locked_accounts.insert(update.email.clone(), account);
        *self.logged_in_email.write() = Some(update.email);
        Ok(())
    }
}
