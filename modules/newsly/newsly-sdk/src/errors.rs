use thiserror::Error;

/// Remote operation a failure belongs to. Picks the message shown when the
/// server gives no reason of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    VerifyPassword,
    Register,
    Login,
    CurrentUser,
    UpdateProfile,
    Recommendations,
    GenerateRecommendations,
    RecordInteraction,
    UserStats,
    Health,
}

impl ApiOperation {
    /// Short name used in log lines.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::VerifyPassword => "verify_password",
            Self::Register => "register",
            Self::Login => "login",
            Self::CurrentUser => "current_user",
            Self::UpdateProfile => "update_profile",
            Self::Recommendations => "recommendations",
            Self::GenerateRecommendations => "generate_recommendations",
            Self::RecordInteraction => "record_interaction",
            Self::UserStats => "user_stats",
            Self::Health => "health",
        }
    }

    #[must_use]
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::VerifyPassword => "Password verification failed",
            Self::Register => "Registration failed",
            Self::Login => "Login failed",
            Self::CurrentUser => "Failed to get user",
            Self::UpdateProfile => "Failed to update profile",
            Self::Recommendations => "Failed to fetch recommendations",
            Self::GenerateRecommendations => "Failed to generate recommendations",
            Self::RecordInteraction => "Failed to record interaction",
            Self::UserStats => "Failed to fetch stats",
            Self::Health => "API is not healthy",
        }
    }
}

/// Failure of a call against the Newsly API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status. `message` is the server's
    /// `detail` when present, otherwise the operation's fallback text.
    #[error("{message}")]
    Rejected {
        operation: ApiOperation,
        status: u16,
        message: String,
    },

    /// The request never produced a response.
    #[error("{}", operation.fallback_message())]
    Unreachable {
        operation: ApiOperation,
        reason: String,
    },

    /// A 2xx response whose body did not match the expected shape.
    #[error("{}", operation.fallback_message())]
    InvalidResponse {
        operation: ApiOperation,
        reason: String,
    },

    /// The call needs a stored session token and none is present.
    #[error("Not authenticated")]
    Unauthenticated,
}

impl ApiError {
    #[must_use]
    pub fn rejected(operation: ApiOperation, status: u16, detail: Option<String>) -> Self {
        let message = detail
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| operation.fallback_message().to_owned());
        Self::Rejected {
            operation,
            status,
            message,
        }
    }

    /// Text suitable for the user-facing error slot of a page.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthenticated) || self.status() == Some(401)
    }

    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn rejected_prefers_server_detail() {
        let err = ApiError::rejected(
            ApiOperation::Register,
            400,
            Some("User with this email already exists".to_owned()),
        );
        assert_eq!(err.user_message(), "User with this email already exists");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn rejected_without_detail_uses_fallback() {
        let err = ApiError::rejected(ApiOperation::Login, 500, None);
        assert_eq!(err.user_message(), "Login failed");

        let blank = ApiError::rejected(ApiOperation::UserStats, 502, Some("  ".to_owned()));
        assert_eq!(blank.user_message(), "Failed to fetch stats");
    }

    #[test]
    fn transport_failure_uses_fallback() {
        let err = ApiError::Unreachable {
            operation: ApiOperation::Recommendations,
            reason: "connection refused".to_owned(),
        };
        assert_eq!(err.user_message(), "Failed to fetch recommendations");
        assert!(err.is_transport());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn unauthorized_detection() {
        assert!(ApiError::Unauthenticated.is_unauthorized());
        assert!(ApiError::rejected(ApiOperation::CurrentUser, 401, None).is_unauthorized());
        assert!(!ApiError::rejected(ApiOperation::CurrentUser, 404, None).is_unauthorized());
    }
}
