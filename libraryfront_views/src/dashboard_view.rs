use std::sync::Arc;

use libraryfront_catalog::catalog_merge::{merge, CatalogStats};
use libraryfront_catalog::remote_catalog::RemoteCatalog;
use libraryfront_catalog::routes::Route;
use libraryfront_catalog::static_catalog::static_books;

use crate::notice::redirect_for;
use crate::request_generation::RequestGeneration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardCards {
    pub unique_titles: usize,
    pub total_copies: u64,
    pub available: u64,
    pub on_loan: u64,
}

pub struct DashboardView {
    remote: Arc<dyn RemoteCatalog>,
    generation: RequestGeneration,
    cards: DashboardCards,
    redirect: Option<Route>,
}

impl DashboardView {
    pub fn new(remote: Arc<dyn RemoteCatalog>) -> Self {
        Self {
            remote,
            generation: RequestGeneration::default(),
            cards: DashboardCards::default(),
            redirect: None,
        }
    }

    /// A failed load leaves the previous cards in place
    pub async fn load(&mut self) {
        let ticket = self.generation.begin();
        let result = self.remote.list_books().await;
        if !self.generation.is_current(ticket) {
            return;
        }

        match result {
            Ok(remote) => {
                let snapshot = merge(&remote, static_books());
                let CatalogStats {
                    total_copies,
                    available,
                    borrowed,
                } = snapshot.stats;
                self.cards = DashboardCards {
                    unique_titles: snapshot.unique_titles,
                    total_copies,
                    available,
                    on_loan: borrowed,
                };
            }
            Err(err) => {
                tracing::warn!("Failed to load dashboard stats: {}", err);
                self.redirect = redirect_for(&err);
            }
        }
    }

    pub fn cards(&self) -> DashboardCards {
        self.cards
    }

    pub fn take_redirect(&mut self) -> Option<Route> {
        self.redirect.take()
    }
}

#[cfg(test)]
mod dashboard_view_tests {
    use std::sync::Arc;

    use libraryfront_catalog::api::BookRecord;
    use libraryfront_catalog::error::LibraryError;
    use libraryfront_catalog::remote_catalog::InMemoryRemoteCatalog;

    use crate::dashboard_view::{DashboardCards, DashboardView};

    #[tokio::test]
    async fn test_cards_from_remote_books() {
        let remote = Arc::new(InMemoryRemoteCatalog::with_books(vec![
            BookRecord {
                quantity: Some(3),
                available: Some(1),
                ..BookRecord::new("Dune")
            },
            BookRecord {
                quantity: Some(2),
                available: Some(5),
                ..BookRecord::new("Anathem")
            },
        ]));
        let mut view = DashboardView::new(remote);

        view.load().await;

        assert_eq!(
            view.cards(),
            DashboardCards {
                unique_titles: 10,
                total_copies: 5,
                available: 3,
                on_loan: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_failed_load_keeps_zeroed_cards() {
        let remote = Arc::new(InMemoryRemoteCatalog::default());
        remote.set_failure(Some(LibraryError::Network("offline".to_string())));
        let mut view = DashboardView::new(remote);

        view.load().await;

        assert_eq!(view.cards(), DashboardCards::default());
        assert_eq!(view.take_redirect(), None);
    }
}
