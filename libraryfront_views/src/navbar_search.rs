use libraryfront_catalog::routes::Route;
use libraryfront_catalog::static_catalog::static_books;
use libraryfront_catalog::suggestions::{suggest, Suggestion};

/// Type-ahead search box of the navigation bar, matched against the bundled books
#[derive(Debug, Default)]
pub struct NavbarSearch {
    query: String,
    open: bool,
    suggestions: Vec<Suggestion>,
}

impl NavbarSearch {
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.suggestions = suggest(static_books(), query);
        self.open = true;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn dropdown_visible(&self) -> bool {
        self.open && !self.suggestions.is_empty()
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Picking a suggestion navigates to its details page and clears the box
    pub fn select(&mut self, index: usize) -> Option<Route> {
        let target = self.suggestions.get(index)?.target.clone();
        self.clear();
        Some(target)
    }

    /// Enter in the search box opens the books list filtered by the query
    pub fn submit(&mut self) -> Route {
        let route = Route::search(&self.query);
        self.close();
        route
    }

    fn clear(&mut self) {
        self.query.clear();
        self.suggestions.clear();
        self.open = false;
    }
}
