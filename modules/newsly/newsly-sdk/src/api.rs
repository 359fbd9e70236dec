use async_trait::async_trait;
use newsly_utils::SecretString;

use crate::errors::ApiError;
use crate::models::{
    AuthResponse, GenerateResponse, Health, Interaction, InteractionAck, PasswordCheck,
    ProfileUpdate, Recommendation, User, UserStats,
};

/// Client-side contract of the Newsly API.
///
/// Every call is a single request with no retry. Calls that take a `token`
/// send it as a bearer credential. Errors are [`ApiError::Rejected`] for a
/// non-2xx answer, [`ApiError::Unreachable`] when no answer arrived and
/// [`ApiError::InvalidResponse`] for an unexpected body.
#[async_trait]
pub trait NewslyApi: Send + Sync {
    /// Check the shared onboarding access password.
    ///
    /// # Errors
    /// A wrong password is `Rejected` with status 401.
    async fn verify_password(&self, password: &SecretString) -> Result<PasswordCheck, ApiError>;

    /// # Errors
    /// `Rejected` when the email is already registered.
    async fn register(
        &self,
        email: &str,
        password: &SecretString,
        name: &str,
    ) -> Result<AuthResponse, ApiError>;

    /// # Errors
    /// `Rejected` with status 401 for bad credentials.
    async fn login(&self, email: &str, password: &SecretString) -> Result<AuthResponse, ApiError>;

    /// # Errors
    /// `Rejected` with status 401 when the token is no longer accepted.
    async fn current_user(&self, token: &SecretString) -> Result<User, ApiError>;

    /// # Errors
    /// See the trait docs.
    async fn update_profile(
        &self,
        token: &SecretString,
        update: &ProfileUpdate,
    ) -> Result<(), ApiError>;

    /// Address the browser is sent to for Google sign-in. No request is made.
    fn google_login_url(&self) -> String;

    /// # Errors
    /// See the trait docs.
    async fn recommendations(
        &self,
        token: &SecretString,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Recommendation>, ApiError>;

    /// # Errors
    /// See the trait docs.
    async fn generate_recommendations(
        &self,
        token: &SecretString,
    ) -> Result<GenerateResponse, ApiError>;

    /// # Errors
    /// See the trait docs.
    async fn record_interaction(
        &self,
        token: &SecretString,
        interaction: &Interaction,
    ) -> Result<InteractionAck, ApiError>;

    /// # Errors
    /// See the trait docs.
    async fn user_stats(&self, token: &SecretString) -> Result<UserStats, ApiError>;

    /// # Errors
    /// Any failure means the API is not healthy.
    async fn health(&self) -> Result<Health, ApiError>;
}
