use std::sync::Arc;

use libraryfront_catalog::api::ProfileUpdate;
use libraryfront_catalog::remote_catalog::AccountService;
use libraryfront_catalog::routes::Route;
use libraryfront_catalog::session::{SessionStore, TOKEN_KEY};

use crate::notice::{redirect_for, Notice};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
}

pub struct ProfileView {
    accounts: Arc<dyn AccountService>,
    session: Arc<dyn SessionStore>,
    form: ProfileForm,
    notice: Option<Notice>,
    redirect: Option<Route>,
}

impl ProfileView {
    pub fn new(accounts: Arc<dyn AccountService>, session: Arc<dyn SessionStore>) -> Self {
        Self {
            accounts,
            session,
            form: ProfileForm::default(),
            notice: None,
            redirect: None,
        }
    }

    /// Only loads when the session holds a token
    pub async fn load(&mut self) {
        if self.session.get(TOKEN_KEY).is_none() {
            return;
        }

        match self.accounts.get_me().await {
            Ok(user) => {
                self.form = ProfileForm {
                    name: user.name,
                    email: user.email,
                };
            }
            Err(err) => {
                tracing::warn!("Failed to load profile: {}", err);
                self.redirect = redirect_for(&err);
                self.notice = Some(Notice::error(err.to_string()));
            }
        }
    }

    pub async fn save(&mut self) {
        let update = ProfileUpdate {
            name: self.form.name.clone(),
            email: self.form.email.clone(),
        };
        self.notice = Some(match self.accounts.update_me(update).await {
            Ok(()) => {
                tracing::info!("Profile saved");
                Notice::success("Saved")
            }
            Err(err) => {
                tracing::warn!("Failed to save profile: {}", err);
                self.redirect = redirect_for(&err);
                Notice::error(err.to_string())
            }
        });
    }

    pub fn form(&self) -> &ProfileForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ProfileForm {
        &mut self.form
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_redirect(&mut self) -> Option<Route> {
        self.redirect.take()
    }
}
