//! REST implementation of [`NewslyApi`] over `newsly-http`.

use async_trait::async_trait;
use newsly_http::{HttpClientBuilder, HttpError, HttpResponse, RequestBuilder, format_http_error};
use newsly_sdk::{
    ApiError, ApiOperation, AuthResponse, GenerateResponse, Health, Interaction, InteractionAck,
    NewslyApi, PasswordCheck, ProfileUpdate, Recommendation, User, UserStats,
};
use newsly_utils::SecretString;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiConfig;

#[derive(Error, Debug)]
pub enum ClientInitError {
    #[error("invalid API base URL '{url}': {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API base URL '{0}' must use http or https")]
    Scheme(String),

    #[error(transparent)]
    Http(#[from] HttpError),
}

#[derive(Serialize)]
struct PasswordBody<'a> {
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    email: &'a str,
    name: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

/// `{detail}` error body. Validation failures carry a list instead of a
/// string; those fall back to the operation message.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Client for the Newsly recommendations API.
#[derive(Clone)]
pub struct NewslyClient {
    http: newsly_http::HttpClient,
    base: Url,
}

impl NewslyClient {
    /// # Errors
    /// An unparsable base URL or a transport that cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ClientInitError> {
        let base = parse_base(&config.base_url)?;
        let http = HttpClientBuilder::with_config(config.http_client_config()).build()?;
        debug!(base = %base, "Newsly API client ready");
        Ok(Self { http, base })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        let joined = format!("{}{path}", self.base.path().trim_end_matches('/'));
        url.set_path(&joined);
        url
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: ApiOperation,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(operation, request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| self.failure(operation, e))
    }

    async fn send(
        &self,
        operation: ApiOperation,
        request: RequestBuilder,
    ) -> Result<HttpResponse, ApiError> {
        debug!(operation = operation.name(), "calling Newsly API");
        request
            .send()
            .await
            .map_err(|e| self.failure(operation, e))
    }

    fn with_json<B: Serialize>(
        &self,
        operation: ApiOperation,
        request: RequestBuilder,
        body: &B,
    ) -> Result<RequestBuilder, ApiError> {
        request.json(body).map_err(|e| self.failure(operation, e))
    }

    fn failure(&self, operation: ApiOperation, err: HttpError) -> ApiError {
        let context = format!("{} {}", operation.name(), self.base);
        warn!(error = %format_http_error(&err, &context), "Newsly API call failed");
        api_error(operation, err)
    }
}

fn parse_base(raw: &str) -> Result<Url, ClientInitError> {
    let mut base = Url::parse(raw.trim()).map_err(|source| ClientInitError::BaseUrl {
        url: raw.to_owned(),
        source,
    })?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(ClientInitError::Scheme(raw.to_owned()));
    }
    let trimmed = base.path().trim_end_matches('/').to_owned();
    base.set_path(&trimmed);
    base.set_query(None);
    base.set_fragment(None);
    Ok(base)
}

/// Map a transport-level failure onto the SDK taxonomy.
fn api_error(operation: ApiOperation, err: HttpError) -> ApiError {
    match err {
        HttpError::HttpStatus {
            status,
            body_preview,
            ..
        } => {
            let detail = match operation {
                ApiOperation::Health => None,
                _ => detail_of(&body_preview),
            };
            ApiError::rejected(operation, status.as_u16(), detail)
        }
        HttpError::Json(e) => ApiError::InvalidResponse {
            operation,
            reason: e.to_string(),
        },
        HttpError::BodyTooLarge { limit, actual } => ApiError::InvalidResponse {
            operation,
            reason: format!("response of {actual} bytes exceeds the {limit} byte limit"),
        },
        other => ApiError::Unreachable {
            operation,
            reason: format_http_error(&other, operation.name()),
        },
    }
}

fn detail_of(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed.detail?.as_str().map(str::to_owned)
}

#[async_trait]
impl NewslyApi for NewslyClient {
    async fn verify_password(&self, password: &SecretString) -> Result<PasswordCheck, ApiError> {
        let op = ApiOperation::VerifyPassword;
        let request = self.with_json(
            op,
            self.http.post(self.endpoint("/auth/verify-password").as_str()),
            &PasswordBody {
                password: password.expose(),
            },
        )?;
        self.call(op, request).await
    }

    async fn register(
        &self,
        email: &str,
        password: &SecretString,
        name: &str,
    ) -> Result<AuthResponse, ApiError> {
        let op = ApiOperation::Register;
        let request = self.with_json(
            op,
            self.http.post(self.endpoint("/auth/register").as_str()),
            &RegisterBody {
                email,
                name,
                password: password.expose(),
            },
        )?;
        self.call(op, request).await
    }

    async fn login(&self, email: &str, password: &SecretString) -> Result<AuthResponse, ApiError> {
        let op = ApiOperation::Login;
        let request = self.with_json(
            op,
            self.http.post(self.endpoint("/auth/login").as_str()),
            &LoginBody {
                email,
                password: password.expose(),
            },
        )?;
        self.call(op, request).await
    }

    async fn current_user(&self, token: &SecretString) -> Result<User, ApiError> {
        let request = self
            .http
            .get(self.endpoint("/auth/me").as_str())
            .bearer_auth(token.expose());
        self.call(ApiOperation::CurrentUser, request).await
    }

    async fn update_profile(
        &self,
        token: &SecretString,
        update: &ProfileUpdate,
    ) -> Result<(), ApiError> {
        let op = ApiOperation::UpdateProfile;
        let request = self.with_json(
            op,
            self.http
                .put(self.endpoint("/auth/profile").as_str())
                .bearer_auth(token.expose()),
            update,
        )?;
        self.send(op, request)
            .await?
            .checked_bytes()
            .await
            .map_err(|e| self.failure(op, e))?;
        Ok(())
    }

    fn google_login_url(&self) -> String {
        self.endpoint("/auth/google").into()
    }

    async fn recommendations(
        &self,
        token: &SecretString,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Recommendation>, ApiError> {
        let mut url = self.endpoint("/recommendations");
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());
        let request = self.http.get(url.as_str()).bearer_auth(token.expose());
        self.call(ApiOperation::Recommendations, request).await
    }

    async fn generate_recommendations(
        &self,
        token: &SecretString,
    ) -> Result<GenerateResponse, ApiError> {
        let request = self
            .http
            .post(self.endpoint("/recommendations/generate").as_str())
            .bearer_auth(token.expose());
        self.call(ApiOperation::GenerateRecommendations, request).await
    }

    async fn record_interaction(
        &self,
        token: &SecretString,
        interaction: &Interaction,
    ) -> Result<InteractionAck, ApiError> {
        let op = ApiOperation::RecordInteraction;
        let request = self.with_json(
            op,
            self.http
                .post(self.endpoint("/interactions").as_str())
                .bearer_auth(token.expose()),
            interaction,
        )?;
        self.call(op, request).await
    }

    async fn user_stats(&self, token: &SecretString) -> Result<UserStats, ApiError> {
        let request = self
            .http
            .get(self.endpoint("/stats").as_str())
            .bearer_auth(token.expose());
        self.call(ApiOperation::UserStats, request).await
    }

    async fn health(&self) -> Result<Health, ApiError> {
        let request = self.http.get(self.endpoint("/health").as_str());
        self.call(ApiOperation::Health, request).await
    }
}
