use libraryfront_catalog::error::LibraryError;
use libraryfront_catalog::routes::Route;

/// Short message shown to the user after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice::Success(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice::Error(message.into())
    }

    /// Error notice with the message of `err`, or `fallback` when it has none
    pub fn failure(err: &LibraryError, fallback: &str) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            Notice::Error(fallback.to_string())
        } else {
            Notice::Error(message)
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success(message) | Notice::Error(message) => message,
        }
    }
}

/// Where to navigate after a failed action, expired sessions go back to the entry point
pub fn redirect_for(err: &LibraryError) -> Option<Route> {
    err.is_auth().then_some(Route::Entry)
}
