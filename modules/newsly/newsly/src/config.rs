use std::path::PathBuf;
use std::time::Duration;

use newsly_http::{HttpClientConfig, TransportSecurity};
use serde::{Deserialize, Serialize};

/// Configuration of the Newsly client, one section per page family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct NewslyConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub onboarding: OnboardingConfig,
    pub feed: FeedConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_timeout", with = "newsly_utils::humantime_serde")]
    pub timeout: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Accept plain `http://` base URLs. On by default because the API is
    /// usually run locally during development.
    #[serde(default = "default_true")]
    pub allow_insecure_http: bool,
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_api_timeout(),
            user_agent: None,
            allow_insecure_http: true,
            max_body_size: default_max_body_size(),
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut config = HttpClientConfig {
            request_timeout: self.timeout,
            max_body_size: self.max_body_size,
            ..HttpClientConfig::default()
        };
        if let Some(ua) = &self.user_agent {
            config.user_agent.clone_from(ua);
        }
        if self.allow_insecure_http {
            config.transport = TransportSecurity::AllowInsecureHttp;
        }
        config
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding `local-storage.json`. The binary falls back to the
    /// platform data directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Where a returning user lands when the wizard is reopened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumePolicy {
    /// First visible required step whose answer is missing or invalid.
    #[default]
    FirstIncomplete,
    /// Always the first step.
    FirstStep,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OnboardingConfig {
    #[serde(default)]
    pub resume_policy: ResumePolicy,
    /// Require the shared access password before the wizard opens.
    #[serde(default)]
    pub access_gate: bool,
    #[serde(default = "default_preview_delay", with = "newsly_utils::humantime_serde")]
    pub preview_delay: Duration,
    #[serde(default = "default_preview_duration", with = "newsly_utils::humantime_serde")]
    pub preview_duration: Duration,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            resume_policy: ResumePolicy::default(),
            access_gate: false,
            preview_delay: default_preview_delay(),
            preview_duration: default_preview_duration(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(default = "default_success_redirect", with = "newsly_utils::humantime_serde")]
    pub success_redirect_delay: Duration,
    #[serde(default = "default_failure_redirect", with = "newsly_utils::humantime_serde")]
    pub failure_redirect_delay: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            success_redirect_delay: default_success_redirect(),
            failure_redirect_delay: default_failure_redirect(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8002".to_owned()
}

fn default_api_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_true() -> bool {
    true
}

fn default_max_body_size() -> usize {
    4 * 1024 * 1024
}

fn default_preview_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_preview_duration() -> Duration {
    Duration::from_secs(3)
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

fn default_success_redirect() -> Duration {
    Duration::from_secs(1)
}

fn default_failure_redirect() -> Duration {
    Duration::from_secs(3)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg: NewslyConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, NewslyConfig::default());
        assert_eq!(cfg.api.base_url, "http://localhost:8002");
        assert_eq!(cfg.feed.limit, 20);
        assert_eq!(cfg.onboarding.preview_delay, Duration::from_millis(500));
        assert_eq!(cfg.auth.failure_redirect_delay, Duration::from_secs(3));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let yaml = r"
api:
  base_url: https://api.newsly.example
  timeout: 2s
onboarding:
  resume_policy: first_step
  access_gate: true
";
        let cfg: NewslyConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.api.base_url, "https://api.newsly.example");
        assert_eq!(cfg.api.timeout, Duration::from_secs(2));
        assert!(cfg.api.allow_insecure_http);
        assert_eq!(cfg.onboarding.resume_policy, ResumePolicy::FirstStep);
        assert!(cfg.onboarding.access_gate);
        assert_eq!(cfg.onboarding.preview_duration, Duration::from_secs(3));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = serde_yaml::from_str::<NewslyConfig>("feed:\n  per_page: 5\n").unwrap_err();
        assert!(err.to_string().contains("per_page"));
    }

    #[test]
    fn http_client_config_follows_api_section() {
        let api = ApiConfig {
            user_agent: Some("newsly-test/1".to_owned()),
            allow_insecure_http: false,
            ..ApiConfig::default()
        };
        let http = api.http_client_config();
        assert_eq!(http.user_agent, "newsly-test/1");
        assert_eq!(http.transport, TransportSecurity::TlsOnly);
        assert_eq!(http.request_timeout, Duration::from_secs(10));
    }
}
