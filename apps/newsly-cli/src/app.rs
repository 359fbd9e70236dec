use std::sync::Arc;

use anyhow::{Context, Result};
use newsly::config::FeedConfig;
use newsly::domain::access::AccessGate;
use newsly::domain::account::AccountService;
use newsly::domain::auth::AuthService;
use newsly::domain::feed::FeedService;
use newsly::domain::preferences::Preferences;
use newsly::domain::session::Session;
use newsly::domain::store::{KeyValueStore, ProfileStore};
use newsly::domain::wizard::Wizard;
use newsly::{FileStore, MemoryStore, NewslyClient};
use newsly_sdk::NewslyApi;
use tracing::debug;

use crate::config::AppConfig;

/// Wiring of one run: the API client, the persistent store under the data
/// directory and a session store that lives as long as the process.
pub struct App {
    config: AppConfig,
    api: Arc<dyn NewslyApi>,
    local: Arc<dyn KeyValueStore>,
    transient: Arc<dyn KeyValueStore>,
}

impl App {
    /// # Errors
    /// Invalid API settings, or local storage that cannot be opened.
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = NewslyClient::new(&config.api).context("failed to build the API client")?;
        let dir = config.data_dir()?;
        let local = FileStore::in_dir(&dir).context("failed to open local storage")?;
        debug!(path = %local.path().display(), api = %client.base_url(), "client ready");
        Ok(Self::from_parts(config, Arc::new(client), Arc::new(local)))
    }

    #[must_use]
    pub fn from_parts(
        config: AppConfig,
        api: Arc<dyn NewslyApi>,
        local: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            config,
            api,
            local,
            transient: Arc::new(MemoryStore::new()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn api(&self) -> &dyn NewslyApi {
        self.api.as_ref()
    }

    #[must_use]
    pub fn session(&self) -> Session {
        Session::new(self.local.clone(), self.transient.clone())
    }

    #[must_use]
    pub fn profiles(&self) -> ProfileStore {
        ProfileStore::new(self.local.clone())
    }

    #[must_use]
    pub fn preferences(&self) -> Preferences {
        Preferences::new(self.local.clone())
    }

    #[must_use]
    pub fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone(), self.session(), self.config.auth.clone())
    }

    #[must_use]
    pub fn feed(&self) -> FeedService {
        self.feed_with(self.config.feed.clone())
    }

    #[must_use]
    pub fn feed_with(&self, config: FeedConfig) -> FeedService {
        FeedService::new(
            self.api.clone(),
            self.session(),
            self.profiles(),
            self.preferences(),
            config,
        )
    }

    #[must_use]
    pub fn account(&self) -> AccountService {
        AccountService::new(self.api.clone(), self.session(), self.preferences())
    }

    #[must_use]
    pub fn access_gate(&self) -> AccessGate {
        AccessGate::new(self.api.clone(), self.session())
    }

    /// # Errors
    /// As [`Wizard::open`].
    pub fn wizard(&self) -> Result<Wizard, newsly::domain::error::WizardError> {
        Wizard::open(self.profiles(), self.session(), &self.config.onboarding)
    }
}
