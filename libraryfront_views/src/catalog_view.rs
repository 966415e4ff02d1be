use std::sync::Arc;

use libraryfront_catalog::api::BookRecord;
use libraryfront_catalog::catalog_merge::{merge, CatalogSnapshot};
use libraryfront_catalog::error::LibraryError;
use libraryfront_catalog::projection::{available_types, project, ProjectionConfig, SortKey};
use libraryfront_catalog::remote_catalog::RemoteCatalog;
use libraryfront_catalog::routes::Route;
use libraryfront_catalog::static_catalog::static_books;

use crate::notice::redirect_for;
use crate::request_generation::{LoadTicket, RequestGeneration};

/// State of the public books page
pub struct CatalogView {
    remote: Arc<dyn RemoteCatalog>,
    generation: RequestGeneration,
    config: ProjectionConfig,
    snapshot: CatalogSnapshot,
    loading: bool,
    error: Option<String>,
    redirect: Option<Route>,
}

impl CatalogView {
    /// `search` is the value of the `search` query parameter, if any
    pub fn new(remote: Arc<dyn RemoteCatalog>, search: Option<&str>) -> Self {
        Self::with_projection(
            remote,
            ProjectionConfig {
                query: search.unwrap_or_default().to_string(),
                ..ProjectionConfig::default()
            },
        )
    }

    pub fn with_projection(remote: Arc<dyn RemoteCatalog>, config: ProjectionConfig) -> Self {
        Self {
            remote,
            generation: RequestGeneration::default(),
            config,
            snapshot: CatalogSnapshot::default(),
            loading: false,
            error: None,
            redirect: None,
        }
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.loading = true;
        self.generation.begin()
    }

    /// Applies the result of a load, unless a newer load started in the meantime.
    /// Returns whether the result was applied.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<BookRecord>, LibraryError>,
    ) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::info!("Dropping stale catalog response");
            return false;
        }

        self.loading = false;
        match result {
            Ok(remote) => {
                tracing::info!("Loaded {} books", remote.len());
                self.snapshot = merge(&remote, static_books());
                self.error = None;
            }
            Err(err) => {
                tracing::warn!("Failed to load books: {}", err);
                self.snapshot = merge(&[], static_books());
                self.redirect = redirect_for(&err);
                self.error = Some(err.to_string());
            }
        }
        true
    }

    pub async fn load(&mut self) {
        let ticket = self.begin_load();
        let result = self.remote.list_books().await;
        self.finish_load(ticket, result);
    }

    /// Keeps the local search in sync with the `search` query parameter
    pub fn sync_search_param(&mut self, search: Option<&str>) {
        self.set_query(search.unwrap_or_default());
    }

    pub fn set_query(&mut self, query: &str) {
        self.config.query = query.to_string();
    }

    pub fn set_status_filter(&mut self, status: &str) {
        self.config.status_filter = status.to_string();
    }

    pub fn set_type_filter(&mut self, book_type: &str) {
        self.config.type_filter = book_type.to_string();
    }

    pub fn set_sort(&mut self, sort_key: &str) {
        self.config.sort_key = SortKey::parse(sort_key);
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Books to display, recomputed from the working list on every call
    pub fn visible(&self) -> Vec<BookRecord> {
        project(&self.snapshot.working, &self.config)
    }

    pub fn types(&self) -> Vec<String> {
        available_types(&self.snapshot.working)
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    pub fn summary(&self) -> String {
        format!(
            "Showing {} of {}",
            self.visible().len(),
            self.snapshot.working.len()
        )
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Route to navigate to, taken once
    pub fn take_redirect(&mut self) -> Option<Route> {
        self.redirect.take()
    }
}

#[cfg(test)]
mod catalog_view_tests {
    use std::sync::Arc;

    use libraryfront_catalog::api::BookRecord;
    use libraryfront_catalog::error::LibraryError;
    use libraryfront_catalog::remote_catalog::InMemoryRemoteCatalog;
    use libraryfront_catalog::routes::Route;
    use libraryfront_catalog::static_catalog::static_books;

    use crate::catalog_view::CatalogView;

    fn remote_books() -> Vec<BookRecord> {
        vec![
            BookRecord {
                quantity: Some(3),
                available: Some(1),
                rating: Some(7.0),
                book_type: Some("NOVEL".to_string()),
                status: Some("Ongoing".to_string()),
                ..BookRecord::new("Dune")
            },
            BookRecord {
                quantity: Some(1),
                available: Some(1),
                book_type: Some("NOVEL".to_string()),
                status: Some("Completed".to_string()),
                ..BookRecord::new("Anathem")
            },
        ]
    }

    #[tokio::test]
    async fn test_load_uses_remote_books() {
        let remote = Arc::new(InMemoryRemoteCatalog::with_books(remote_books()));
        let mut view = CatalogView::new(remote, None);

        view.load().await;

        assert!(!view.is_loading());
        assert_eq!(view.error(), None);
        let titles: Vec<String> = view.visible().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["Anathem", "Dune"]);
        assert_eq!(view.snapshot().stats.borrowed, 2);
        assert_eq!(view.summary(), "Showing 2 of 2");
    }

    #[tokio::test]
    async fn test_failed_load_falls_back_to_static_books() {
        let remote = Arc::new(InMemoryRemoteCatalog::default());
        remote.set_failure(Some(LibraryError::Network("timeout".to_string())));
        let mut view = CatalogView::new(remote, Some("mysteries"));

        view.load().await;

        assert_eq!(view.error(), Some("Network error: timeout"));
        assert_eq!(view.snapshot().working.len(), static_books().len());
        assert_eq!(view.snapshot().stats.total_copies, 0);
        let titles: Vec<String> = view.visible().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["Lord of the Mysteries"]);
        assert_eq!(view.take_redirect(), None);
    }

    #[tokio::test]
    async fn test_empty_remote_falls_back_without_error() {
        let mut view = CatalogView::new(Arc::new(InMemoryRemoteCatalog::default()), None);
        view.load().await;
        assert_eq!(view.error(), None);
        assert_eq!(view.summary(), "Showing 8 of 8");
        assert_eq!(view.types(), vec!["LIGHT NOVEL", "NOVEL", "WEB NOVEL"]);
    }

    #[tokio::test]
    async fn test_expired_session_redirects_to_entry() {
        let remote = Arc::new(InMemoryRemoteCatalog::default());
        remote.set_failure(Some(LibraryError::Auth("Token expired".to_string())));
        let mut view = CatalogView::new(remote, None);

        view.load().await;

        assert_eq!(view.take_redirect(), Some(Route::Entry));
        assert_eq!(view.take_redirect(), None);
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut view = CatalogView::new(Arc::new(InMemoryRemoteCatalog::default()), None);
        let first = view.begin_load();
        let second = view.begin_load();

        assert!(view.finish_load(second, Ok(remote_books())));
        assert!(!view.finish_load(first, Ok(vec![])));

        assert_eq!(view.snapshot().working.len(), 2);
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn test_filters_and_sort_from_dropdowns() {
        let remote = Arc::new(InMemoryRemoteCatalog::with_books(remote_books()));
        let mut view = CatalogView::new(remote, None);
        view.load().await;

        view.set_status_filter("completed");
        assert_eq!(view.summary(), "Showing 1 of 2");

        view.set_status_filter("all");
        view.set_type_filter("NOVEL");
        view.set_sort("rating-desc");
        let titles: Vec<String> = view.visible().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["Dune", "Anathem"]);

        view.sync_search_param(Some("ana"));
        assert_eq!(view.summary(), "Showing 1 of 2");
        view.sync_search_param(None);
        assert_eq!(view.config().query, "");
    }
}
