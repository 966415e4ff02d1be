use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use reqwest::{Method, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;

use crate::api::{
    BookPayload, BookRecord, BookResponse, BorrowRecord, BorrowRecordsResponse, BorrowRequest,
    ErrorBody, GetAllBooksResponse, LoginRequest, LoginResponse, MeResponse, ProfileUpdate,
    RegisterRequest, ReturnRequest, Role, User,
};
use crate::error::LibraryError;
use crate::remote_catalog::{AccountService, RemoteCatalog};
use crate::session::{SessionStore, TOKEN_KEY};

pub const DEFAULT_API_URL: &str = "https://backend-8o4k.onrender.com/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct LibraryApiClient {
    url: String,
    client: ClientWithMiddleware,
    session: Arc<dyn SessionStore>,
}

impl LibraryApiClient {
    pub fn new(url: &str, timeout: Duration, session: Arc<dyn SessionStore>) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            session,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{}", self.url, path));
        match self.session.get(TOKEN_KEY) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and maps every non-success status to a LibraryError.
    /// An unauthorized response also clears the stored session token.
    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, LibraryError> {
        let response = builder
            .send()
            .await
            .map_err(|err| LibraryError::Network(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        tracing::warn!("Request failed with status {}: {}", status, message);

        Err(match status {
            StatusCode::UNAUTHORIZED => {
                self.session.remove(TOKEN_KEY);
                LibraryError::Auth(message)
            }
            StatusCode::NOT_FOUND => LibraryError::NotFound(message),
            StatusCode::CONFLICT => LibraryError::Conflict(message),
            _ => LibraryError::Api(message),
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, LibraryError> {
        self.send(builder)
            .await?
            .json()
            .await
            .map_err(|err| LibraryError::Api(format!("Invalid response: {}", err)))
    }
}

#[async_trait::async_trait]
impl RemoteCatalog for LibraryApiClient {
    /// Calls GET /books endpoint
    async fn list_books(&self) -> Result<Vec<BookRecord>, LibraryError> {
        let response: GetAllBooksResponse =
            self.send_json(self.request(Method::GET, "/books")).await?;
        Ok(response.books)
    }

    /// Calls GET /books/{book_id} endpoint
    async fn get_book(&self, book_id: &str) -> Result<BookRecord, LibraryError> {
        let response: BookResponse = self
            .send_json(self.request(Method::GET, &format!("/books/{}", book_id)))
            .await?;
        Ok(response.book)
    }

    /// Calls POST /books endpoint
    async fn create_book(&self, payload: BookPayload) -> Result<BookRecord, LibraryError> {
        let response: BookResponse = self
            .send_json(self.request(Method::POST, "/books").json(&payload))
            .await?;
        Ok(response.book)
    }

    /// Calls PUT /books/{book_id} endpoint
    async fn update_book(
        &self,
        book_id: &str,
        payload: BookPayload,
    ) -> Result<BookRecord, LibraryError> {
        let response: BookResponse = self
            .send_json(
                self.request(Method::PUT, &format!("/books/{}", book_id))
                    .json(&payload),
            )
            .await?;
        Ok(response.book)
    }

    /// Calls DELETE /books/{book_id} endpoint
    async fn delete_book(&self, book_id: &str) -> Result<(), LibraryError> {
        self.send(self.request(Method::DELETE, &format!("/books/{}", book_id)))
            .await?;
        Ok(())
    }

    /// Calls DELETE /books endpoint
    async fn delete_all_books(&self) -> Result<(), LibraryError> {
        self.send(self.request(Method::DELETE, "/books")).await?;
        Ok(())
    }

    /// Calls POST /borrow endpoint
    async fn borrow_book(&self, book_id: &str) -> Result<(), LibraryError> {
        self.send(self.request(Method::POST, "/borrow").json(&BorrowRequest {
            book_id: book_id.to_string(),
        }))
        .await?;
        Ok(())
    }

    /// Calls POST /borrow/return endpoint
    async fn return_book(&self, user_id: &str, book_id: &str) -> Result<(), LibraryError> {
        self.send(
            self.request(Method::POST, "/borrow/return")
                .json(&ReturnRequest {
                    user_id: user_id.to_string(),
                    book_id: book_id.to_string(),
                }),
        )
        .await?;
        Ok(())
    }

    /// Calls GET /borrow/records endpoint
    async fn list_borrow_records(&self) -> Result<Vec<BorrowRecord>, LibraryError> {
        let response: BorrowRecordsResponse = self
            .send_json(self.request(Method::GET, "/borrow/records"))
            .await?;
        Ok(response.borrow_records)
    }
}

#[async_trait::async_trait]
impl AccountService for LibraryApiClient {
    /// Calls POST /auth/login endpoint
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, LibraryError> {
        self.send_json(self.request(Method::POST, "/auth/login").json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }))
        .await
    }

    /// Calls POST /auth/register endpoint
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<(), LibraryError> {
        self.send(
            self.request(Method::POST, "/auth/register")
                .json(&RegisterRequest {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                    role,
                }),
        )
        .await?;
        Ok(())
    }

    /// Calls GET /users/me endpoint
    async fn get_me(&self) -> Result<User, LibraryError> {
        let response: MeResponse = self
            .send_json(self.request(Method::GET, "/users/me"))
            .await?;
        Ok(response.user.unwrap_or_default())
    }

    /// Calls PATCH /users/me endpoint
    async fn update_me(&self, update: ProfileUpdate) -> Result<(), LibraryError> {
        self.send(self.request(Method::PATCH, "/users/me").json(&update))
            .await?;
        Ok(())
    }
}
