//! Sign-up, sign-in, Google OAuth and the callback page.

use std::sync::Arc;
use std::time::Duration;

use newsly_sdk::{AuthResponse, NewslyApi, User};
use newsly_utils::SecretString;
use tracing::{debug, info, instrument, warn};

use super::Route;
use super::error::{AuthPageError, PasswordRuleError, StorageError};
use super::session::{LocalAccount, Session};
use crate::config::AuthConfig;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Client-side password rules. The first broken rule wins.
///
/// # Errors
/// The first [`PasswordRuleError`] that applies.
pub fn validate_password(password: &str, confirm: &str) -> Result<(), PasswordRuleError> {
    if password != confirm {
        return Err(PasswordRuleError::Mismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordRuleError::TooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordRuleError::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PasswordRuleError::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordRuleError::MissingDigit);
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

#[derive(Debug, Clone)]
pub struct SignInForm {
    pub email: String,
    pub password: SecretString,
}

/// Query parameters the OAuth provider sends back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub token: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    /// Parse a query string such as `token=abc` or `?error=access_denied`.
    /// Empty values count as absent.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "token" => params.token = Some(value.into_owned()),
                "error" => params.error = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackStatus {
    Success,
    Error,
}

/// What the callback page shows, and where it goes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackOutcome {
    pub status: CallbackStatus,
    pub message: &'static str,
    pub redirect: Route,
    pub redirect_after: Duration,
}

pub struct AuthService {
    api: Arc<dyn NewslyApi>,
    session: Session,
    config: AuthConfig,
}

impl AuthService {
    #[must_use]
    pub fn new(api: Arc<dyn NewslyApi>, session: Session, config: AuthConfig) -> Self {
        Self {
            api,
            session,
            config,
        }
    }

    /// Register a new account, remember it and continue to onboarding.
    ///
    /// # Errors
    /// A missing field, a broken password rule, the server's rejection, or a
    /// storage failure. Nothing is stored unless registration succeeds.
    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<Route, AuthPageError> {
        require("Name", &form.name)?;
        require("Email", &form.email)?;
        validate_password(form.password.expose(), form.confirm_password.expose())?;

        let auth = self
            .api
            .register(form.email.trim(), &form.password, form.name.trim())
            .await?;
        self.remember(&auth)?;
        info!(user_id = auth.user_id, "account registered");
        Ok(Route::Onboarding)
    }

    /// # Errors
    /// A missing field, the server's rejection, or a storage failure.
    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn sign_in(&self, form: &SignInForm) -> Result<Route, AuthPageError> {
        require("Email", &form.email)?;
        if form.password.is_empty() {
            return Err(AuthPageError::MissingField("Password"));
        }

        let auth = self.api.login(form.email.trim(), &form.password).await?;
        self.remember(&auth)?;
        info!(user_id = auth.user_id, "signed in");
        Ok(Route::Home)
    }

    /// Where the browser goes to start Google sign-in.
    #[must_use]
    pub fn google_url(&self) -> String {
        self.api.google_login_url()
    }

    /// Settle the OAuth callback. An error parameter wins over a token.
    ///
    /// # Errors
    /// Storage failure while saving the token.
    pub fn handle_callback(&self, params: &CallbackParams) -> Result<CallbackOutcome, StorageError> {
        if let Some(error) = params.error.as_deref() {
            warn!(error, "OAuth sign-in failed");
            let message = if error == "access_denied" {
                "Authentication was cancelled"
            } else {
                "Authentication failed. Please try again."
            };
            return Ok(self.failed(message));
        }

        match params.token.as_deref() {
            Some(token) => {
                self.session.store_token(&SecretString::from(token))?;
                info!("signed in with Google");
                Ok(CallbackOutcome {
                    status: CallbackStatus::Success,
                    message: "Successfully signed in! Redirecting...",
                    redirect: Route::Home,
                    redirect_after: self.config.success_redirect_delay,
                })
            }
            None => Ok(self.failed("Invalid callback response")),
        }
    }

    /// Fetch the current user and cache it. Any failure ends the session.
    ///
    /// # Errors
    /// Storage failure.
    pub async fn refresh_user(&self) -> Result<Option<User>, StorageError> {
        refresh_user(self.api.as_ref(), &self.session).await
    }

    /// # Errors
    /// Storage failure.
    pub fn logout(&self) -> Result<Route, StorageError> {
        self.session.logout()?;
        info!("signed out");
        Ok(Route::SignIn)
    }

    fn remember(&self, auth: &AuthResponse) -> Result<(), StorageError> {
        self.session
            .store_token(&SecretString::from(auth.access_token.as_str()))?;
        self.session.cache_user(&user_from_auth(auth))?;
        self.session.save_local_account(&LocalAccount {
            name: auth.name.clone(),
            email: auth.email.clone(),
        })
    }

    fn failed(&self, message: &'static str) -> CallbackOutcome {
        CallbackOutcome {
            status: CallbackStatus::Error,
            message,
            redirect: Route::SignIn,
            redirect_after: self.config.failure_redirect_delay,
        }
    }
}

/// `GET /auth/me` with the stored token, caching the result. Any failure
/// logs the session out.
///
/// Returns `None` when signed out or when the session was just ended.
///
/// # Errors
/// Storage failure.
#[instrument(skip_all)]
pub async fn refresh_user(api: &dyn NewslyApi, session: &Session) -> Result<Option<User>, StorageError> {
    let Some(token) = session.token()? else {
        debug!("no session token, nothing to refresh");
        return Ok(None);
    };
    match api.current_user(&token).await {
        Ok(user) => {
            session.cache_user(&user)?;
            Ok(Some(user))
        }
        Err(e) => {
            warn!(error = %e, "failed to refresh user, signing out");
            session.logout()?;
            Ok(None)
        }
    }
}

fn require(label: &'static str, value: &str) -> Result<(), AuthPageError> {
    if value.trim().is_empty() {
        Err(AuthPageError::MissingField(label))
    } else {
        Ok(())
    }
}

fn user_from_auth(auth: &AuthResponse) -> User {
    User {
        id: auth.user_id,
        email: auth.email.clone(),
        name: auth.name.clone(),
        picture_url: None,
        primary_interests: Vec::new(),
        secondary_interests: Vec::new(),
        email_verified: false,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::test_support::{MockApi, Stores};
    use newsly_sdk::ApiOperation;

    fn service(api: MockApi, stores: &Stores) -> AuthService {
        AuthService::new(Arc::new(api), stores.session.clone(), AuthConfig::default())
    }

    fn sign_up_form(password: &str) -> SignUpForm {
        SignUpForm {
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            password: password.into(),
            confirm_password: password.into(),
        }
    }

    #[test]
    fn password_rules_apply_in_order() {
        let cases = [
            ("Abcdefg1", "Abcdefg2", Err(PasswordRuleError::Mismatch)),
            ("Ab1", "Ab1", Err(PasswordRuleError::TooShort)),
            ("abcdefg1", "abcdefg1", Err(PasswordRuleError::MissingUppercase)),
            ("ABCDEFG1", "ABCDEFG1", Err(PasswordRuleError::MissingLowercase)),
            ("Abcdefgh", "Abcdefgh", Err(PasswordRuleError::MissingDigit)),
            ("Abcdefg1", "Abcdefg1", Ok(())),
        ];
        for (password, confirm, expected) in cases {
            assert_eq!(validate_password(password, confirm), expected, "{password}");
        }
        assert_eq!(
            validate_password("short", "other").unwrap_err().to_string(),
            "Passwords don't match"
        );
    }

    #[tokio::test]
    async fn sign_up_stores_session_and_goes_to_onboarding() {
        let stores = Stores::new();
        let service = service(MockApi::new(), &stores);

        let route = service.sign_up(&sign_up_form("Sup3rSecret")).await.unwrap();

        assert_eq!(route, Route::Onboarding);
        let token = stores.session.token().unwrap().unwrap();
        assert_eq!(token.expose(), "token-for-ada@example.com");
        assert_eq!(stores.session.cached_user().unwrap().unwrap().name, "Ada");
        assert_eq!(
            stores.session.local_account().unwrap().unwrap().email,
            "ada@example.com"
        );
    }

    #[tokio::test]
    async fn sign_up_rule_violation_never_reaches_server() {
        let stores = Stores::new();
        let api = Arc::new(MockApi::new());
        let service = AuthService::new(api.clone(), stores.session.clone(), AuthConfig::default());

        let err = service.sign_up(&sign_up_form("weakpass")).await.unwrap_err();

        assert_eq!(err.to_string(), "Password must contain an uppercase letter");
        assert!(api.calls().is_empty());
        assert!(stores.session.token().unwrap().is_none());
    }

    #[tokio::test]
    async fn sign_up_shows_server_detail() {
        let stores = Stores::new();
        let api = MockApi::new().rejecting(
            ApiOperation::Register,
            400,
            Some("User with this email already exists"),
        );
        let service = service(api, &stores);

        let err = service.sign_up(&sign_up_form("Sup3rSecret")).await.unwrap_err();

        assert_eq!(err.to_string(), "User with this email already exists");
        assert!(stores.session.token().unwrap().is_none());
    }

    #[tokio::test]
    async fn sign_in_goes_home() {
        let stores = Stores::new();
        let service = service(MockApi::new(), &stores);
        let form = SignInForm {
            email: " ada@example.com ".to_owned(),
            password: "Sup3rSecret".into(),
        };

        assert_eq!(service.sign_in(&form).await.unwrap(), Route::Home);
        assert!(stores.session.token().unwrap().is_some());
    }

    #[tokio::test]
    async fn sign_in_failure_uses_fallback_message() {
        let stores = Stores::new();
        let service = service(MockApi::new().rejecting(ApiOperation::Login, 500, None), &stores);
        let form = SignInForm {
            email: "ada@example.com".to_owned(),
            password: "Sup3rSecret".into(),
        };

        let err = service.sign_in(&form).await.unwrap_err();
        assert_eq!(err.to_string(), "Login failed");
    }

    #[test]
    fn callback_with_token_redirects_home_after_a_second() {
        let stores = Stores::new();
        let service = service(MockApi::new(), &stores);

        let outcome = service
            .handle_callback(&CallbackParams::from_query("?token=abc123"))
            .unwrap();

        assert_eq!(outcome.status, CallbackStatus::Success);
        assert_eq!(outcome.message, "Successfully signed in! Redirecting...");
        assert_eq!(outcome.redirect, Route::Home);
        assert_eq!(outcome.redirect_after, Duration::from_secs(1));
        assert_eq!(stores.session.token().unwrap().unwrap().expose(), "abc123");
    }

    #[test]
    fn callback_errors_redirect_to_sign_in() {
        let stores = Stores::new();
        let service = service(MockApi::new(), &stores);
        let cases = [
            ("error=access_denied", "Authentication was cancelled"),
            ("error=server_error&token=abc", "Authentication failed. Please try again."),
            ("", "Invalid callback response"),
            ("token=", "Invalid callback response"),
        ];
        for (query, message) in cases {
            let outcome = service
                .handle_callback(&CallbackParams::from_query(query))
                .unwrap();
            assert_eq!(outcome.status, CallbackStatus::Error, "{query}");
            assert_eq!(outcome.message, message);
            assert_eq!(outcome.redirect, Route::SignIn);
            assert_eq!(outcome.redirect_after, Duration::from_secs(3));
        }
        assert!(stores.session.token().unwrap().is_none());
    }

    #[tokio::test]
    async fn refresh_user_caches_on_success() {
        let stores = Stores::new().signed_in();
        let service = service(MockApi::new(), &stores);

        let user = service.refresh_user().await.unwrap().unwrap();

        assert_eq!(user.email, "ada@example.com");
        assert_eq!(stores.session.cached_user().unwrap(), Some(user));
    }

    #[tokio::test]
    async fn refresh_user_failure_logs_out() {
        let stores = Stores::new().signed_in();
        stores
            .session
            .cache_user(&crate::domain::test_support::user("Ada", "ada@example.com"))
            .unwrap();
        let service = service(
            MockApi::new().rejecting(ApiOperation::CurrentUser, 401, None),
            &stores,
        );

        assert!(service.refresh_user().await.unwrap().is_none());
        assert!(stores.session.token().unwrap().is_none());
        assert!(stores.session.cached_user().unwrap().is_none());
    }

    #[tokio::test]
    async fn refresh_without_token_is_quiet() {
        let stores = Stores::new();
        let api = Arc::new(MockApi::new());
        let service = AuthService::new(api.clone(), stores.session.clone(), AuthConfig::default());

        assert!(service.refresh_user().await.unwrap().is_none());
        assert!(api.calls().is_empty());
    }

    #[test]
    fn google_url_comes_from_client() {
        let stores = Stores::new();
        let service = service(MockApi::new(), &stores);
        assert_eq!(service.google_url(), "http://api.test/auth/google");
    }
}
