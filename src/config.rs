//! Client configuration.
//!
//! Reads `~/.todo-admin/config.toml`, then lets environment variables override it:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `TODO_ADMIN_BASE_API` | `base_api` |
//! | `TODO_ADMIN_TOKEN_NAME` | `token_name` |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const BASE_API_VAR: &str = "TODO_ADMIN_BASE_API";
pub const TOKEN_NAME_VAR: &str = "TODO_ADMIN_TOKEN_NAME";

pub const DEFAULT_TOKEN_NAME: &str = "todo_admin_token";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no API base URL configured (set base_api or TODO_ADMIN_BASE_API)")]
    MissingBaseApi,
    #[error("API base URL is not an http(s) URL: {0}")]
    InvalidBaseApi(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the API, e.g. `https://todo.example.com/api`.
    pub base_api: String,

    /// Name the auth token is stored under.
    pub token_name: String,

    /// Directory holding the token file. Defaults to the config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_dir: Option<PathBuf>,

    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_api: String::new(),
            token_name: DEFAULT_TOKEN_NAME.to_string(),
            token_dir: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Default config file path: ~/.todo-admin/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save config to disk.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Applies overrides from `lookup` (the environment, in production).
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_api) = lookup(BASE_API_VAR).filter(|v| !v.is_empty()) {
            self.base_api = base_api;
        }
        if let Some(token_name) = lookup(TOKEN_NAME_VAR).filter(|v| !v.is_empty()) {
            self.token_name = token_name;
        }
        self
    }

    pub fn with_env(self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_api.trim().is_empty() {
            return Err(ConfigError::MissingBaseApi);
        }
        let url = reqwest::Url::parse(&self.base_api)
            .map_err(|_| ConfigError::InvalidBaseApi(self.base_api.clone()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseApi(self.base_api.clone()));
        }
        Ok(())
    }

    /// Loads from `path` (or the default path), applies the environment and validates.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        let config = Self::load(&path)?.with_env();
        config.validate()?;
        Ok(config)
    }

    pub fn token_dir(&self) -> PathBuf {
        self.token_dir.clone().unwrap_or_else(dirs_path)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Return the config directory (~/.todo-admin).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".todo-admin")
}
