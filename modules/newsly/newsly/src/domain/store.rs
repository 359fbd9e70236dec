use std::sync::Arc;

use newsly_sdk::UserProfile;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::StorageError;

/// Keys of the persisted client state.
pub mod keys {
    pub const PROFILE: &str = "noozers-profile";
    pub const ONBOARDING_COMPLETE: &str = "noozers-onboarding-complete";
    pub const DARK_MODE: &str = "noozers-dark-mode";
    pub const SAVED_ARTICLES: &str = "noozers-saved";
    pub const INTERESTS: &str = "noozers-interests";
    pub const LOCAL_ACCOUNT: &str = "noozers-user";
    pub const TOKEN: &str = "newsly-token";
    pub const USER: &str = "newsly-user";
    /// Session store only.
    pub const ONBOARDING_ACCESS: &str = "newsly-onboarding-access";
}

/// String key/value persistence with last-write-wins semantics.
///
/// The local store outlives the process; the session store lives as long as
/// one run of the application.
pub trait KeyValueStore: Send + Sync {
    /// # Errors
    /// Backend failures only; a missing key is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    /// Backend failures.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    /// Backend failures. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Drop every key.
    ///
    /// # Errors
    /// Backend failures.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Read and decode a JSON value.
///
/// # Errors
/// `StorageError::Decode` when the stored text is not the expected JSON.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    store
        .get(key)?
        .map(|raw| {
            serde_json::from_str(&raw).map_err(|source| StorageError::Decode {
                key: key.to_owned(),
                source,
            })
        })
        .transpose()
}

/// Encode and write a JSON value.
///
/// # Errors
/// `StorageError::Encode`, or the backend failure.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_owned(),
        source,
    })?;
    store.set(key, &raw)
}

/// Onboarding answers and the completion flag.
#[derive(Clone)]
pub struct ProfileStore {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// # Errors
    /// Backend failure or an undecodable record.
    pub fn load(&self) -> Result<Option<UserProfile>, StorageError> {
        load_json(self.store.as_ref(), keys::PROFILE)
    }

    /// # Errors
    /// Backend failure.
    pub fn save(&self, profile: &UserProfile) -> Result<(), StorageError> {
        save_json(self.store.as_ref(), keys::PROFILE, profile)
    }

    /// # Errors
    /// Backend failure.
    pub fn exists(&self) -> Result<bool, StorageError> {
        Ok(self.store.get(keys::PROFILE)?.is_some())
    }

    /// # Errors
    /// Backend failure.
    pub fn is_complete(&self) -> Result<bool, StorageError> {
        Ok(self.store.get(keys::ONBOARDING_COMPLETE)?.as_deref() == Some("true"))
    }

    /// # Errors
    /// Backend failure.
    pub fn mark_complete(&self) -> Result<(), StorageError> {
        self.store.set(keys::ONBOARDING_COMPLETE, "true")
    }
}
