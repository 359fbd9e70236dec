use std::sync::Arc;

use newsly_sdk::User;
use newsly_utils::SecretString;
use serde::{Deserialize, Serialize};

use super::error::StorageError;
use super::store::{KeyValueStore, keys, load_json, save_json};

/// Name and email kept locally for the account page and the feed header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalAccount {
    pub name: String,
    pub email: String,
}

/// Bearer token, cached user and the local account record.
#[derive(Clone)]
pub struct Session {
    local: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl Session {
    #[must_use]
    pub fn new(local: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { local, session }
    }

    /// # Errors
    /// Backend failure.
    pub fn token(&self) -> Result<Option<SecretString>, StorageError> {
        Ok(self
            .local
            .get(keys::TOKEN)?
            .filter(|t| !t.is_empty())
            .map(SecretString::from))
    }

    /// # Errors
    /// Backend failure.
    pub fn store_token(&self, token: &SecretString) -> Result<(), StorageError> {
        self.local.set(keys::TOKEN, token.expose())
    }

    /// # Errors
    /// Backend failure or an undecodable record.
    pub fn cached_user(&self) -> Result<Option<User>, StorageError> {
        load_json(self.local.as_ref(), keys::USER)
    }

    /// # Errors
    /// Backend failure.
    pub fn cache_user(&self, user: &User) -> Result<(), StorageError> {
        save_json(self.local.as_ref(), keys::USER, user)
    }

    /// # Errors
    /// Backend failure or an undecodable record.
    pub fn local_account(&self) -> Result<Option<LocalAccount>, StorageError> {
        load_json(self.local.as_ref(), keys::LOCAL_ACCOUNT)
    }

    /// # Errors
    /// Backend failure.
    pub fn save_local_account(&self, account: &LocalAccount) -> Result<(), StorageError> {
        save_json(self.local.as_ref(), keys::LOCAL_ACCOUNT, account)
    }

    /// # Errors
    /// Backend failure.
    pub fn remove_local_account(&self) -> Result<(), StorageError> {
        self.local.remove(keys::LOCAL_ACCOUNT)
    }

    /// Whether someone signed in on this device before, token or not.
    ///
    /// # Errors
    /// Backend failure.
    pub fn has_signed_in_before(&self) -> Result<bool, StorageError> {
        Ok(self.local.get(keys::USER)?.is_some() || self.local.get(keys::LOCAL_ACCOUNT)?.is_some())
    }

    /// Forget the token and the cached user. The profile and the local
    /// account record stay.
    ///
    /// # Errors
    /// Backend failure.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.local.remove(keys::TOKEN)?;
        self.local.remove(keys::USER)
    }

    /// # Errors
    /// Backend failure.
    pub fn has_onboarding_access(&self) -> Result<bool, StorageError> {
        Ok(self.session.get(keys::ONBOARDING_ACCESS)?.as_deref() == Some("granted"))
    }

    /// # Errors
    /// Backend failure.
    pub fn grant_onboarding_access(&self) -> Result<(), StorageError> {
        self.session.set(keys::ONBOARDING_ACCESS, "granted")
    }

    /// Wipe every locally persisted key.
    ///
    /// # Errors
    /// Backend failure.
    pub fn clear_all(&self) -> Result<(), StorageError> {
        self.local.clear()?;
        self.session.clear()
    }
}
