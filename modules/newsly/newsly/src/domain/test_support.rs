#![allow(clippy::must_use_candidate, clippy::return_self_not_must_use)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use newsly_sdk::{
    ApiError, ApiOperation, AuthResponse, GenerateResponse, Health, Interaction, InteractionAck,
    NewslyApi, PasswordCheck, ProfileUpdate, Recommendation, User, UserStats,
};
use newsly_utils::SecretString;
use parking_lot::Mutex;

use super::session::Session;
use super::store::ProfileStore;
use crate::infra::storage::MemoryStore;

/// Canned answers for a `NewslyApi` caller under test.
#[derive(Default)]
pub struct MockApi {
    failures: Mutex<HashMap<ApiOperation, ApiError>>,
    pub calls: Mutex<Vec<ApiOperation>>,
    pub recommendations: Mutex<Vec<Recommendation>>,
    pub synced_profiles: Mutex<Vec<ProfileUpdate>>,
    pub interactions: Mutex<Vec<Interaction>>,
    pub tokens_seen: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `op` fail as if the server were down.
    pub fn unreachable(self, op: ApiOperation) -> Self {
        self.failures.lock().insert(
            op,
            ApiError::Unreachable {
                operation: op,
                reason: "connection refused".to_owned(),
            },
        );
        self
    }

    /// Make `op` fail with a server rejection.
    pub fn rejecting(self, op: ApiOperation, status: u16, detail: Option<&str>) -> Self {
        self.failures
            .lock()
            .insert(op, ApiError::rejected(op, status, detail.map(str::to_owned)));
        self
    }

    pub fn with_recommendations(self, recs: Vec<Recommendation>) -> Self {
        *self.recommendations.lock() = recs;
        self
    }

    pub fn calls(&self) -> Vec<ApiOperation> {
        self.calls.lock().clone()
    }

    fn enter(&self, op: ApiOperation, token: Option<&SecretString>) -> Result<(), ApiError> {
        self.calls.lock().push(op);
        if let Some(token) = token {
            self.tokens_seen.lock().push(token.expose().to_owned());
        }
        let failure = self.failures.lock().get(&op).map(clone_error);
        failure.map_or(Ok(()), Err)
    }
}

fn clone_error(err: &ApiError) -> ApiError {
    match err {
        ApiError::Rejected {
            operation,
            status,
            message,
        } => ApiError::Rejected {
            operation: *operation,
            status: *status,
            message: message.clone(),
        },
        ApiError::Unreachable { operation, reason } => ApiError::Unreachable {
            operation: *operation,
            reason: reason.clone(),
        },
        ApiError::InvalidResponse { operation, reason } => ApiError::InvalidResponse {
            operation: *operation,
            reason: reason.clone(),
        },
        ApiError::Unauthenticated => ApiError::Unauthenticated,
    }
}

pub fn user(name: &str, email: &str) -> User {
    User {
        id: 7,
        email: email.to_owned(),
        name: name.to_owned(),
        picture_url: None,
        primary_interests: vec![],
        secondary_interests: vec![],
        email_verified: false,
    }
}

pub fn recommendation(article_id: i64, title: &str) -> Recommendation {
    Recommendation {
        id: article_id * 10,
        article_id,
        relevance_score: 0.9,
        recommendation_reason: Some("Matches your interests".to_owned()),
        article_title: Some(title.to_owned()),
        article_source: Some("Newsly Wire".to_owned()),
        article_url: Some(format!("https://news.example/{article_id}")),
        article_description: None,
        created_at: "2026-03-01T09:00:00".to_owned(),
        published_at: None,
    }
}

fn auth_response(name: &str, email: &str) -> AuthResponse {
    AuthResponse {
        access_token: format!("token-for-{email}"),
        token_type: "bearer".to_owned(),
        user_id: 7,
        name: name.to_owned(),
        email: email.to_owned(),
    }
}

#[async_trait]
impl NewslyApi for MockApi {
    async fn verify_password(&self, password: &SecretString) -> Result<PasswordCheck, ApiError> {
        self.enter(ApiOperation::VerifyPassword, None)?;
        if password.expose() == "open-sesame" {
            Ok(PasswordCheck {
                valid: true,
                message: "Password verified".to_owned(),
            })
        } else {
            Err(ApiError::rejected(
                ApiOperation::VerifyPassword,
                401,
                Some("Invalid password".to_owned()),
            ))
        }
    }

    async fn register(
        &self,
        email: &str,
        _password: &SecretString,
        name: &str,
    ) -> Result<AuthResponse, ApiError> {
        self.enter(ApiOperation::Register, None)?;
        Ok(auth_response(name, email))
    }

    async fn login(&self, email: &str, _password: &SecretString) -> Result<AuthResponse, ApiError> {
        self.enter(ApiOperation::Login, None)?;
        Ok(auth_response("Ada", email))
    }

    async fn current_user(&self, token: &SecretString) -> Result<User, ApiError> {
        self.enter(ApiOperation::CurrentUser, Some(token))?;
        Ok(user("Ada", "ada@example.com"))
    }

    async fn update_profile(
        &self,
        token: &SecretString,
        update: &ProfileUpdate,
    ) -> Result<(), ApiError> {
        self.enter(ApiOperation::UpdateProfile, Some(token))?;
        self.synced_profiles.lock().push(update.clone());
        Ok(())
    }

    fn google_login_url(&self) -> String {
        "http://api.test/auth/google".to_owned()
    }

    async fn recommendations(
        &self,
        token: &SecretString,
        _page: u32,
        _limit: u32,
    ) -> Result<Vec<Recommendation>, ApiError> {
        self.enter(ApiOperation::Recommendations, Some(token))?;
        Ok(self.recommendations.lock().clone())
    }

    async fn generate_recommendations(
        &self,
        token: &SecretString,
    ) -> Result<GenerateResponse, ApiError> {
        self.enter(ApiOperation::GenerateRecommendations, Some(token))?;
        Ok(GenerateResponse {
            message: "Generated 3 recommendations".to_owned(),
            count: 3,
        })
    }

    async fn record_interaction(
        &self,
        token: &SecretString,
        interaction: &Interaction,
    ) -> Result<InteractionAck, ApiError> {
        self.enter(ApiOperation::RecordInteraction, Some(token))?;
        self.interactions.lock().push(interaction.clone());
        Ok(InteractionAck {
            status: "success".to_owned(),
            message: "Interaction recorded".to_owned(),
        })
    }

    async fn user_stats(&self, token: &SecretString) -> Result<UserStats, ApiError> {
        self.enter(ApiOperation::UserStats, Some(token))?;
        Ok(UserStats {
            total_recommendations: 20,
            served_count: 20,
            clicked_count: 5,
            avg_relevance_score: 0.75,
            last_recommendation_at: None,
            click_through_rate: 25.0,
        })
    }

    async fn health(&self) -> Result<Health, ApiError> {
        self.enter(ApiOperation::Health, None)?;
        Ok(Health {
            status: "healthy".to_owned(),
            timestamp: "2026-03-01T09:00:00".to_owned(),
            service: Some("newsly-recommendations-api".to_owned()),
            version: Some("1.0.0".to_owned()),
        })
    }
}

/// Local store, session store and the typed views over them.
pub struct Stores {
    pub local: Arc<MemoryStore>,
    pub transient: Arc<MemoryStore>,
    pub profiles: ProfileStore,
    pub session: Session,
}

impl Stores {
    pub fn new() -> Self {
        let local = Arc::new(MemoryStore::new());
        let transient = Arc::new(MemoryStore::new());
        Self {
            profiles: ProfileStore::new(local.clone()),
            session: Session::new(local.clone(), transient.clone()),
            local,
            transient,
        }
    }

    pub fn signed_in(self) -> Self {
        self.session
            .store_token(&SecretString::from("tok-123"))
            .unwrap();
        self
    }
}
