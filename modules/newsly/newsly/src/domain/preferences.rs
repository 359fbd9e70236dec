use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::StorageError;
use super::store::{KeyValueStore, keys, load_json, save_json};

/// Per-category reaction set from a news card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterestFlag {
    Interested,
    NotInterested,
}

/// Display and reading preferences kept on the device.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// # Errors
    /// Backend failure.
    pub fn dark_mode(&self) -> Result<bool, StorageError> {
        Ok(self.store.get(keys::DARK_MODE)?.as_deref() == Some("true"))
    }

    /// # Errors
    /// Backend failure.
    pub fn set_dark_mode(&self, enabled: bool) -> Result<(), StorageError> {
        self.store.set(keys::DARK_MODE, if enabled { "true" } else { "false" })
    }

    /// Flip dark mode and return the new value.
    ///
    /// # Errors
    /// Backend failure.
    pub fn toggle_dark_mode(&self) -> Result<bool, StorageError> {
        let enabled = !self.dark_mode()?;
        self.set_dark_mode(enabled)?;
        Ok(enabled)
    }

    /// Keys of saved articles, sorted.
    ///
    /// # Errors
    /// Backend failure or an undecodable record.
    pub fn saved_articles(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.saved_map()?.into_keys().collect())
    }

    /// # Errors
    /// Backend failure or an undecodable record.
    pub fn is_saved(&self, article: &str) -> Result<bool, StorageError> {
        Ok(self.saved_map()?.contains_key(article))
    }

    /// Add or remove `article` from the saved set; returns whether it is now saved.
    ///
    /// # Errors
    /// Backend failure or an undecodable record.
    pub fn toggle_saved(&self, article: &str) -> Result<bool, StorageError> {
        let mut saved = self.saved_map()?;
        let now_saved = if saved.remove(article).is_some() {
            false
        } else {
            saved.insert(article.to_owned(), true);
            true
        };
        save_json(self.store.as_ref(), keys::SAVED_ARTICLES, &saved)?;
        Ok(now_saved)
    }

    fn saved_map(&self) -> Result<BTreeMap<String, bool>, StorageError> {
        Ok(load_json(self.store.as_ref(), keys::SAVED_ARTICLES)?.unwrap_or_default())
    }

    /// # Errors
    /// Backend failure or an undecodable record.
    pub fn interests(&self) -> Result<BTreeMap<String, InterestFlag>, StorageError> {
        let stored: BTreeMap<String, Option<InterestFlag>> =
            load_json(self.store.as_ref(), keys::INTERESTS)?.unwrap_or_default();
        Ok(stored
            .into_iter()
            .filter_map(|(category, flag)| flag.map(|f| (category, f)))
            .collect())
    }

    /// Toggle `flag` for `category`. Setting the flag already present clears
    /// it; setting the other one replaces it. Returns the resulting flag.
    ///
    /// # Errors
    /// Backend failure or an undecodable record.
    pub fn toggle_interest(
        &self,
        category: &str,
        flag: InterestFlag,
    ) -> Result<Option<InterestFlag>, StorageError> {
        let mut stored: BTreeMap<String, Option<InterestFlag>> =
            load_json(self.store.as_ref(), keys::INTERESTS)?.unwrap_or_default();
        let next = match stored.get(category).copied().flatten() {
            Some(current) if current == flag => None,
            _ => Some(flag),
        };
        stored.insert(category.to_owned(), next);
        save_json(self.store.as_ref(), keys::INTERESTS, &stored)?;
        Ok(next)
    }
}
