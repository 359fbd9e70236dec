use std::sync::Arc;

use newsly_sdk::{Interaction, NewslyApi, Recommendation};
use tracing::{debug, info, instrument, warn};

use super::error::StorageError;
use super::preferences::{InterestFlag, Preferences};
use super::session::Session;
use super::store::ProfileStore;
use crate::config::FeedConfig;

/// One recommendation as the feed shows it.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedCard {
    pub recommendation: Recommendation,
    /// 1-based rank in the feed.
    pub position: u32,
    pub saved: bool,
}

impl FeedCard {
    #[must_use]
    pub fn article_key(&self) -> String {
        article_key(&self.recommendation)
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.recommendation
            .article_title
            .as_deref()
            .unwrap_or("Untitled article")
    }
}

/// Key an article is saved under: its title, or its id when untitled.
#[must_use]
pub fn article_key(recommendation: &Recommendation) -> String {
    match recommendation.article_title.as_deref() {
        Some(title) if !title.trim().is_empty() => title.to_owned(),
        _ => format!("article-{}", recommendation.article_id),
    }
}

/// What the home page shows.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedView {
    Recommendations(Vec<FeedCard>),
    /// Signed in, but nothing came back.
    NoRecommendations,
    /// Signed in on this device before, no token now.
    SignedOut,
    /// Nobody has answered the questionnaire here.
    NoProfile,
    /// Answered locally, never signed in to sync it.
    ProfileNotSynced,
}

pub struct FeedService {
    api: Arc<dyn NewslyApi>,
    session: Session,
    profiles: ProfileStore,
    preferences: Preferences,
    config: FeedConfig,
}

impl FeedService {
    #[must_use]
    pub fn new(
        api: Arc<dyn NewslyApi>,
        session: Session,
        profiles: ProfileStore,
        preferences: Preferences,
        config: FeedConfig,
    ) -> Self {
        Self {
            api,
            session,
            profiles,
            preferences,
            config,
        }
    }

    /// Decide what the home page shows, fetching recommendations when signed in.
    ///
    /// # Errors
    /// Local storage failures. A failed fetch degrades to `NoRecommendations`.
    #[instrument(skip_all, fields(page = self.config.page, limit = self.config.limit))]
    pub async fn load(&self) -> Result<FeedView, StorageError> {
        let Some(token) = self.session.token()? else {
            return self.signed_out_view();
        };

        let recommendations = match self
            .api
            .recommendations(&token, self.config.page, self.config.limit)
            .await
        {
            Ok(recommendations) => recommendations,
            Err(e) => {
                warn!(error = %e, "failed to fetch recommendations");
                return Ok(FeedView::NoRecommendations);
            }
        };
        if recommendations.is_empty() {
            info!("no recommendations yet");
            return Ok(FeedView::NoRecommendations);
        }

        let saved = self.preferences.saved_articles()?;
        let cards = recommendations
            .into_iter()
            .zip(1u32..)
            .map(|(recommendation, position)| {
                let saved = saved.contains(&article_key(&recommendation));
                FeedCard {
                    recommendation,
                    position,
                    saved,
                }
            })
            .collect::<Vec<_>>();
        debug!(count = cards.len(), "recommendations loaded");
        Ok(FeedView::Recommendations(cards))
    }

    fn signed_out_view(&self) -> Result<FeedView, StorageError> {
        if self.session.has_signed_in_before()? {
            Ok(FeedView::SignedOut)
        } else if self.profiles.exists()? {
            Ok(FeedView::ProfileNotSynced)
        } else {
            Ok(FeedView::NoProfile)
        }
    }

    /// Report an interaction. Returns whether the server accepted it; failures
    /// are logged and never block the page.
    ///
    /// # Errors
    /// Storage failure while reading the token.
    #[instrument(skip_all, fields(article_id = interaction.article_id, kind = interaction.interaction_type.as_str()))]
    pub async fn record_interaction(&self, interaction: &Interaction) -> Result<bool, StorageError> {
        let Some(token) = self.session.token()? else {
            debug!("not signed in, interaction dropped");
            return Ok(false);
        };
        match self.api.record_interaction(&token, interaction).await {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!(error = %e, "failed to record interaction");
                Ok(false)
            }
        }
    }

    /// Save or unsave the card's article; returns whether it is now saved.
    ///
    /// # Errors
    /// Storage failure.
    pub fn toggle_saved(&self, card: &mut FeedCard) -> Result<bool, StorageError> {
        card.saved = self.preferences.toggle_saved(&card.article_key())?;
        Ok(card.saved)
    }

    /// # Errors
    /// Storage failure.
    pub fn flag_interest(
        &self,
        category: &str,
        flag: InterestFlag,
    ) -> Result<Option<InterestFlag>, StorageError> {
        self.preferences.toggle_interest(category, flag)
    }
}
