use std::collections::HashMap;

/// Key holding the bearer token of the logged in user
pub const TOKEN_KEY: &str = "token";
/// Key of the flag set once the landing page was shown
pub const SEEN_HOME_KEY: &str = "seenHomeOnce";
/// Key of a short-lived message shown on the next page
pub const FLASH_KEY: &str = "flash";

/// Client-side key value storage injected into every component that needs session state
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Default)]
pub struct InMemorySessionStore {
    values: parking_lot::RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn with_token(token: &str) -> Self {
        let store = Self::default();
        store.set(TOKEN_KEY, token);
        store
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.write().remove(key);
    }
}

/// Reads the flash message and clears it, so it is shown only once
pub fn take_flash(store: &dyn SessionStore) -> Option<String> {
    let message = store.get(FLASH_KEY);
    if message.is_some() {
        store.remove(FLASH_KEY);
    }
    message
}
