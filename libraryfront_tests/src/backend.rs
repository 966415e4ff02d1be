use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use libraryfront_catalog::client::{LibraryApiClient, DEFAULT_TIMEOUT};
use libraryfront_catalog::remote_catalog::AccountService;
use libraryfront_catalog::session::{InMemorySessionStore, SessionStore, TOKEN_KEY};

const DEFAULT_LOCAL_API_URL: &str = "http://127.0.0.1:5000/api";

pub fn api_url() -> String {
    std::env::var("LIBRARYFRONT_API_URL").unwrap_or_else(|_| DEFAULT_LOCAL_API_URL.to_string())
}

pub fn unique_suffix() -> u128 {
    std::time::SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis()
}

/// Client with its own session, so each test logs in independently
pub fn new_client() -> (LibraryApiClient, Arc<InMemorySessionStore>) {
    let session = Arc::new(InMemorySessionStore::default());
    let client = LibraryApiClient::new(&api_url(), DEFAULT_TIMEOUT, session.clone())
        .expect("Failed to create client");
    (client, session)
}

/// Logs in with the account from LIBRARYFRONT_ADMIN_EMAIL and LIBRARYFRONT_ADMIN_PASSWORD
pub async fn admin_client() -> (LibraryApiClient, Arc<InMemorySessionStore>) {
    let email = std::env::var("LIBRARYFRONT_ADMIN_EMAIL").expect("LIBRARYFRONT_ADMIN_EMAIL not set");
    let password =
        std::env::var("LIBRARYFRONT_ADMIN_PASSWORD").expect("LIBRARYFRONT_ADMIN_PASSWORD not set");

    let (client, session) = new_client();
    let response = client
        .login(&email, &password)
        .await
        .expect("Failed to log in as admin");
    let token = response.token.expect("Login returned no token");
    session.set(TOKEN_KEY, &token);
    (client, session)
}
