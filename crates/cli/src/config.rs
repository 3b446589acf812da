//! CLI configuration: defaults, optional TOML file, then environment

use anyhow::{Context, Result};
use raiser_session::ApiConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub api: ApiSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Backend base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Directory holding the session record (platform data dir when unset)
    pub state_dir: Option<PathBuf>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: ApiConfig::DEFAULT_BASE_URL.to_string(),
            timeout_secs: ApiConfig::REQUEST_TIMEOUT.as_secs(),
        }
    }
}

impl ApiSettings {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl CliConfig {
    /// Load configuration
    ///
    /// Sources in increasing precedence: built-in defaults, the TOML file at
    /// `path` (skipped when missing), `RAISER_*` variables with `__` as the
    /// section separator, and finally `RAISER_API_URL` for the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = ApiSettings::default();

        let mut builder = config::Config::builder()
            .set_default("api.base_url", defaults.base_url)?
            .set_default("api.timeout_secs", defaults.timeout_secs)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix("RAISER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option(
                "api.base_url",
                std::env::var(ApiConfig::BASE_URL_ENV)
                    .ok()
                    .filter(|url| !url.trim().is_empty()),
            )?
            .build()
            .context("Failed to load configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_values_override_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\ntimeout_secs = 3\n\n[session]\nstate_dir = \"/tmp/raiser-state\"\n",
        )
        .unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.api.timeout_secs, 3);
        assert_eq!(
            config.session.state_dir,
            Some(PathBuf::from("/tmp/raiser-state"))
        );
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let config = CliConfig::load(Some(&temp.path().join("absent.toml"))).unwrap();
        assert!(config.api.timeout_secs > 0);
        assert!(!config.api.base_url.is_empty());
    }
}
