use std::collections::BTreeMap;
use std::sync::Arc;

use newsly_sdk::{NewslyApi, User, UserStats};
use tracing::{info, instrument, warn};

use super::Route;
use super::auth::refresh_user;
use super::error::{AccountError, StorageError};
use super::preferences::{InterestFlag, Preferences};
use super::session::{LocalAccount, Session};

/// Everything the settings page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountOverview {
    pub account: LocalAccount,
    /// Server record, when signed in and reachable.
    pub user: Option<User>,
    pub stats: Option<UserStats>,
    pub dark_mode: bool,
    pub interests: BTreeMap<String, InterestFlag>,
    pub saved_articles: Vec<String>,
}

pub struct AccountService {
    api: Arc<dyn NewslyApi>,
    session: Session,
    preferences: Preferences,
}

impl AccountService {
    #[must_use]
    pub fn new(api: Arc<dyn NewslyApi>, session: Session, preferences: Preferences) -> Self {
        Self {
            api,
            session,
            preferences,
        }
    }

    /// Load the settings page. Refreshes the server user when a token is
    /// stored; a failed refresh ends the session and a failed stats call
    /// leaves `stats` empty.
    ///
    /// # Errors
    /// `NoAccount` when nobody has signed in on this device, or a storage
    /// failure.
    #[instrument(skip_all)]
    pub async fn overview(&self) -> Result<AccountOverview, AccountError> {
        let user = refresh_user(self.api.as_ref(), &self.session).await?;
        let account = match (self.session.local_account()?, user.as_ref()) {
            (Some(account), _) => account,
            (None, Some(user)) => LocalAccount {
                name: user.name.clone(),
                email: user.email.clone(),
            },
            (None, None) => return Err(AccountError::NoAccount),
        };

        Ok(AccountOverview {
            account,
            stats: self.stats().await?,
            user,
            dark_mode: self.preferences.dark_mode()?,
            interests: self.preferences.interests()?,
            saved_articles: self.preferences.saved_articles()?,
        })
    }

    async fn stats(&self) -> Result<Option<UserStats>, StorageError> {
        let Some(token) = self.session.token()? else {
            return Ok(None);
        };
        match self.api.user_stats(&token).await {
            Ok(stats) => Ok(Some(stats)),
            Err(e) => {
                warn!(error = %e, "failed to fetch stats");
                Ok(None)
            }
        }
    }

    /// Change the locally kept name and email.
    ///
    /// # Errors
    /// A blank field, an email without `@`, no account on this device, or a
    /// storage failure.
    pub fn update_account(&self, name: &str, email: &str) -> Result<LocalAccount, AccountError> {
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() {
            return Err(AccountError::MissingField("Username"));
        }
        if email.is_empty() {
            return Err(AccountError::MissingField("Email"));
        }
        if !email.contains('@') {
            return Err(AccountError::InvalidEmail);
        }
        if !self.session.has_signed_in_before()? {
            return Err(AccountError::NoAccount);
        }

        let account = LocalAccount {
            name: name.to_owned(),
            email: email.to_owned(),
        };
        self.session.save_local_account(&account)?;
        info!("account details updated");
        Ok(account)
    }

    /// # Errors
    /// Storage failure.
    pub fn toggle_dark_mode(&self) -> Result<bool, StorageError> {
        self.preferences.toggle_dark_mode()
    }

    /// End the session and forget the account record. The profile and the
    /// onboarding answers stay for the next sign-in.
    ///
    /// # Errors
    /// Storage failure.
    pub fn sign_out(&self) -> Result<Route, StorageError> {
        self.session.logout()?;
        self.session.remove_local_account()?;
        info!("signed out from settings");
        Ok(Route::Home)
    }

    /// Wipe everything this device knows.
    ///
    /// # Errors
    /// Storage failure.
    pub fn delete_account(&self) -> Result<Route, StorageError> {
        self.session.clear_all()?;
        info!("local account data deleted");
        Ok(Route::SignIn)
    }

    /// Reopen the questionnaire. A completed profile opens in editing mode.
    #[must_use]
    pub fn edit_profile() -> Route {
        Route::Onboarding
    }
}
