use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

use super::currency::CurrencyCode;

/// Environment variable holding the API access key.
pub const ACCESS_KEY_ENV: &str = "EXCHANGERATE_ACCESS_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate.host";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_cache() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Overridden by [`ACCESS_KEY_ENV`] when that is set.
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub base: CurrencyCode,
    #[serde(default = "default_cache")]
    pub cache: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_url: default_base_url(),
            access_key: None,
            base: CurrencyCode::default(),
            cache: default_cache(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Loads the config at the default location, or the defaults if there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("host", "exchangerate", "exrates")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// The access key to send: the environment wins over the file, and an
    /// empty key is used when neither has one.
    pub fn access_key(&self) -> String {
        resolve_access_key(std::env::var(ACCESS_KEY_ENV).ok(), self.access_key.as_deref())
    }
}

fn resolve_access_key(from_env: Option<String>, from_file: Option<&str>) -> String {
    from_env
        .filter(|key| !key.is_empty())
        .or_else(|| from_file.map(str::to_string))
        .unwrap_or_default()
}
