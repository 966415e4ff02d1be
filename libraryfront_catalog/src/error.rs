#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LibraryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Api(String),
}

impl LibraryError {
    /// Auth failures clear the session and send the user back to the entry point
    pub fn is_auth(&self) -> bool {
        matches!(self, LibraryError::Auth(_))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        LibraryError::Validation(message.into())
    }
}
