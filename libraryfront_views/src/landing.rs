use libraryfront_catalog::routes::Route;
use libraryfront_catalog::session::{SessionStore, FLASH_KEY, SEEN_HOME_KEY};

/// Resolves the entry route: home on the first visit, the featured page afterwards
pub fn resolve_entry(session: &dyn SessionStore) -> Route {
    if session.get(SEEN_HOME_KEY).is_some() {
        return Route::Featured;
    }
    session.set(SEEN_HOME_KEY, "1");
    Route::Home
}

/// Leaves a message for the next page
pub fn set_flash(session: &dyn SessionStore, message: &str) {
    session.set(FLASH_KEY, message);
}

#[cfg(test)]
mod landing_tests {
    use libraryfront_catalog::routes::Route;
    use libraryfront_catalog::session::{take_flash, InMemorySessionStore};

    use crate::landing::{resolve_entry, set_flash};

    #[test]
    fn test_home_only_on_first_visit() {
        let session = InMemorySessionStore::default();
        assert_eq!(resolve_entry(&session), Route::Home);
        assert_eq!(resolve_entry(&session), Route::Featured);
        assert_eq!(resolve_entry(&session), Route::Featured);
    }

    #[test]
    fn test_flash_is_shown_once() {
        let session = InMemorySessionStore::default();
        set_flash(&session, "Book deleted");
        assert_eq!(take_flash(&session).as_deref(), Some("Book deleted"));
        assert_eq!(take_flash(&session), None);
    }
}
