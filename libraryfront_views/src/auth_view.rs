use std::sync::Arc;

use libraryfront_catalog::api::{Role, User};
use libraryfront_catalog::error::LibraryError;
use libraryfront_catalog::remote_catalog::AccountService;
use libraryfront_catalog::routes::Route;
use libraryfront_catalog::session::{SessionStore, TOKEN_KEY};

use crate::forms::{LoginForm, RegisterForm};
use crate::landing::set_flash;
use crate::notice::Notice;

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful!";
pub const REGISTER_SUCCESS_MESSAGE: &str = "Registered. You can now log in.";

/// Login and registration screens
pub struct AuthView {
    accounts: Arc<dyn AccountService>,
    session: Arc<dyn SessionStore>,
    user: Option<User>,
    notice: Option<Notice>,
}

impl AuthView {
    pub fn new(accounts: Arc<dyn AccountService>, session: Arc<dyn SessionStore>) -> Self {
        Self {
            accounts,
            session,
            user: None,
            notice: None,
        }
    }

    /// Returns where to go next on success
    pub async fn login(&mut self, form: &LoginForm) -> Option<Route> {
        if let Err(err) = form.validate() {
            self.notice = Some(Notice::error(err.to_string()));
            return None;
        }

        match self.try_login(form).await {
            Ok(user) => {
                tracing::info!("Logged in as {}", user.email);
                self.user = Some(user);
                set_flash(self.session.as_ref(), LOGIN_SUCCESS_MESSAGE);
                self.notice = Some(Notice::success(LOGIN_SUCCESS_MESSAGE));
                Some(Route::Home)
            }
            Err(err) => {
                tracing::warn!("Login failed: {}", err);
                self.notice = Some(Notice::failure(&err, "Login failed"));
                None
            }
        }
    }

    async fn try_login(&self, form: &LoginForm) -> Result<User, LibraryError> {
        let response = self.accounts.login(&form.email, &form.password).await?;
        let token = response
            .token
            .ok_or_else(|| LibraryError::Auth("Login response has no token".to_string()))?;
        self.session.set(TOKEN_KEY, &token);
        Ok(response.data.unwrap_or_else(|| User {
            email: form.email.clone(),
            ..User::default()
        }))
    }

    /// New accounts always get the borrower role
    pub async fn register(&mut self, form: &RegisterForm) -> bool {
        if let Err(err) = form.validate() {
            self.notice = Some(Notice::error(err.to_string()));
            return false;
        }

        match self
            .accounts
            .register(&form.name, &form.email, &form.password, Role::Borrower)
            .await
        {
            Ok(()) => {
                tracing::info!("Registered {}", form.email);
                self.notice = Some(Notice::success(REGISTER_SUCCESS_MESSAGE));
                true
            }
            Err(err) => {
                tracing::warn!("Registration failed: {}", err);
                self.notice = Some(Notice::failure(&err, "Registration failed"));
                false
            }
        }
    }

    pub fn logout(&mut self) -> Route {
        self.session.remove(TOKEN_KEY);
        self.user = None;
        Route::Login
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.get(TOKEN_KEY).is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }
}

#[cfg(test)]
mod auth_view_tests {
    use std::sync::Arc;

    use libraryfront_catalog::api::Role;
    use libraryfront_catalog::remote_catalog::InMemoryRemoteCatalog;
    use libraryfront_catalog::routes::Route;
    use libraryfront_catalog::session::{take_flash, InMemorySessionStore, SessionStore, TOKEN_KEY};

    use crate::auth_view::{AuthView, LOGIN_SUCCESS_MESSAGE, REGISTER_SUCCESS_MESSAGE};
    use crate::forms::{LoginForm, RegisterForm};
    use crate::notice::Notice;

    fn register_form() -> RegisterForm {
        RegisterForm {
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            password: "secret1".to_string(),
            confirm: "secret1".to_string(),
        }
    }

    fn login_form(password: &str) -> LoginForm {
        LoginForm {
            email: "ann@example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let accounts = Arc::new(InMemoryRemoteCatalog::default());
        let session = Arc::new(InMemorySessionStore::default());
        let mut view = AuthView::new(accounts, session.clone());

        assert!(view.register(&register_form()).await);
        assert_eq!(
            view.notice(),
            Some(&Notice::success(REGISTER_SUCCESS_MESSAGE))
        );

        let route = view.login(&login_form("secret1")).await;

        assert_eq!(route, Some(Route::Home));
        assert!(view.is_logged_in());
        assert_eq!(view.user().map(|user| &user.role), Some(&Role::Borrower));
        assert_eq!(take_flash(session.as_ref()).as_deref(), Some(LOGIN_SUCCESS_MESSAGE));

        assert_eq!(view.logout(), Route::Login);
        assert_eq!(session.get(TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn test_wrong_password_keeps_session_empty() {
        let accounts = Arc::new(InMemoryRemoteCatalog::default());
        let session = Arc::new(InMemorySessionStore::default());
        let mut view = AuthView::new(accounts, session.clone());
        view.register(&register_form()).await;

        let route = view.login(&login_form("wrong")).await;

        assert_eq!(route, None);
        assert_eq!(
            view.notice(),
            Some(&Notice::error("Invalid email or password"))
        );
        assert!(!view.is_logged_in());
    }

    #[tokio::test]
    async fn test_invalid_forms_are_not_sent() {
        let accounts = Arc::new(InMemoryRemoteCatalog::default());
        let mut view = AuthView::new(accounts.clone(), Arc::new(InMemorySessionStore::default()));

        let short_password = RegisterForm {
            password: "123".to_string(),
            confirm: "123".to_string(),
            ..register_form()
        };
        assert!(!view.register(&short_password).await);
        assert_eq!(
            view.notice(),
            Some(&Notice::error("Password must be at least 6 characters"))
        );

        assert_eq!(view.login(&login_form("")).await, None);
        assert_eq!(accounts.calls(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let mut view = AuthView::new(
            Arc::new(InMemoryRemoteCatalog::default()),
            Arc::new(InMemorySessionStore::default()),
        );
        view.register(&register_form()).await;

        assert!(!view.register(&register_form()).await);
        assert_eq!(view.notice(), Some(&Notice::error("User already exists")));
    }
}
