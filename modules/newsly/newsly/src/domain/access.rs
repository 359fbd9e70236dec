use std::sync::Arc;

use newsly_sdk::{ApiError, NewslyApi};
use newsly_utils::SecretString;
use tracing::{info, instrument, warn};

use super::Route;
use super::error::{AccessGateError, StorageError};
use super::session::Session;

/// Password gate in front of the onboarding questionnaire.
///
/// Passing it once is remembered in the session store for the rest of the run.
pub struct AccessGate {
    api: Arc<dyn NewslyApi>,
    session: Session,
}

impl AccessGate {
    #[must_use]
    pub fn new(api: Arc<dyn NewslyApi>, session: Session) -> Self {
        Self { api, session }
    }

    /// # Errors
    /// Backend failure.
    pub fn is_open(&self) -> Result<bool, StorageError> {
        self.session.has_onboarding_access()
    }

    /// Check `password` against the server and open the gate on success.
    ///
    /// # Errors
    /// `Incorrect` when the server refuses the password, `Connection` when it
    /// could not be asked.
    #[instrument(skip_all)]
    pub async fn unlock(&self, password: &SecretString) -> Result<Route, AccessGateError> {
        match self.api.verify_password(password).await {
            Ok(check) if check.valid => {
                self.session.grant_onboarding_access()?;
                info!("onboarding access granted");
                Ok(Route::Onboarding)
            }
            Ok(_) | Err(ApiError::Rejected { .. }) => Err(AccessGateError::Incorrect),
            Err(e) => {
                warn!(error = %e, "password verification failed");
                Err(AccessGateError::Connection(e))
            }
        }
    }
}
