use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use newsly::config::{ApiConfig, AuthConfig, FeedConfig, OnboardingConfig, StorageConfig};
use serde::{Deserialize, Serialize};

/// Environment prefix; `NEWSLY__API__BASE_URL` sets `api.base_url`.
pub const ENV_PREFIX: &str = "NEWSLY__";

const DATA_DIR_NAME: &str = "newsly";

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Effective configuration of the `newsly` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub onboarding: OnboardingConfig,
    pub feed: FeedConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
    /// One JSON object per event instead of human-readable lines.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "warn".to_owned()
}

/// Flags that override configuration after every other layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub verbose: u8,
    pub api_url: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Defaults, then the YAML file, then `NEWSLY__*` environment variables.
    ///
    /// # Errors
    /// A missing or malformed file, unknown keys, or values of the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }

    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(url) = &overrides.api_url {
            self.api.base_url.clone_from(url);
        }
        if let Some(dir) = &overrides.data_dir {
            self.storage.data_dir = Some(dir.clone());
        }
        self.logging.level = raise_level(&self.logging.level, overrides.verbose);
    }

    /// Storage directory, defaulting to the platform data directory.
    ///
    /// # Errors
    /// No directory configured and none known for this platform.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(DATA_DIR_NAME))
            .context("no data directory for this platform; set storage.data_dir")
    }

    /// # Errors
    /// Serialization failure.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("failed to render configuration")
    }
}

/// Raise a plain level by the `-v` count (`-v` info, `-vv` debug, `-vvv`
/// trace). Never lowers it. Directives other than a bare level are kept as
/// written unless `-v` was given.
fn raise_level(level: &str, verbose: u8) -> String {
    if verbose == 0 {
        return level.to_owned();
    }
    let requested = (usize::from(verbose) + 1).min(LEVELS.len() - 1);
    let current = LEVELS
        .iter()
        .position(|l| l.eq_ignore_ascii_case(level.trim()))
        .unwrap_or(0);
    LEVELS[requested.max(current)].to_owned()
}
