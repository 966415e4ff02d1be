use crate::api::BookRecord;
use crate::error::LibraryError;
use crate::remote_catalog::RemoteCatalog;

pub const NOT_BORROWABLE_MESSAGE: &str = "This item cannot be borrowed here.";
pub const NO_COPIES_MESSAGE: &str = "No copies available";

/// Pre-flight check run before any remote borrow, returns the identity to borrow
pub fn check_borrowable(book: &BookRecord) -> Result<&str, LibraryError> {
    let identity = book
        .identity
        .as_deref()
        .ok_or_else(|| LibraryError::validation(NOT_BORROWABLE_MESSAGE))?;
    if book.available_or_zero() == 0 {
        return Err(LibraryError::Conflict(NO_COPIES_MESSAGE.to_string()));
    }
    Ok(identity)
}

pub fn borrow_disabled(book: &BookRecord) -> bool {
    check_borrowable(book).is_err()
}

/// Borrows one copy and decrements the local availability on success.
/// Nothing is sent and nothing changes when the pre-flight check fails.
pub async fn borrow(remote: &dyn RemoteCatalog, book: &mut BookRecord) -> Result<(), LibraryError> {
    let identity = check_borrowable(book)?.to_string();
    remote.borrow_book(&identity).await?;
    book.available = Some(book.available_or_zero().saturating_sub(1));
    tracing::info!("Borrowed book {}", identity);
    Ok(())
}
