//! Client configuration: defaults, `.env`/environment overrides and TOML
//! files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domains::indexing::poller::DEFAULT_POLL_INTERVAL;
use crate::domains::upload::DEFAULT_UPLOAD_LIMIT;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8085";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_SERVER_URL: &str = "MATSEARCH_SERVER_URL";
pub const ENV_REQUEST_TIMEOUT: &str = "MATSEARCH_REQUEST_TIMEOUT";
pub const ENV_POLL_INTERVAL: &str = "MATSEARCH_POLL_INTERVAL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid duration for {key}: {value:?} ({source})")]
    InvalidDuration {
        key: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error("{key} must be greater than zero")]
    ZeroDuration { key: &'static str },
    #[error("invalid server URL {value:?}: {reason}")]
    InvalidServerUrl { value: String, reason: String },
    #[error("upload_limit_bytes must be greater than zero")]
    ZeroUploadLimit,
}

/// Runtime configuration for a client session.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the matching service, without a trailing slash
    pub server_url: String,
    pub request_timeout: Duration,
    pub status_poll_interval: Duration,
    pub upload_limit_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            status_poll_interval: DEFAULT_POLL_INTERVAL,
            upload_limit_bytes: DEFAULT_UPLOAD_LIMIT,
        }
    }
}

/// Same keys as [`AppConfig`], durations as humantime strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    server_url: Option<String>,
    request_timeout: Option<String>,
    status_poll_interval: Option<String>,
    upload_limit_bytes: Option<u64>,
}

impl AppConfig {
    /// Defaults pointed at `server_url`. The URL is not validated here.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Loads `.env` when present, then applies `MATSEARCH_*` variables over
    /// the defaults.
    pub fn from_environment() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("[AppConfig] loaded {}", path.display()),
            Err(err) if err.not_found() => {}
            Err(err) => return Err(err.into()),
        }
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SERVER_URL) {
            self.server_url = url;
        }
        if let Some(value) = lookup(ENV_REQUEST_TIMEOUT) {
            self.request_timeout = parse_duration(ENV_REQUEST_TIMEOUT, &value)?;
        }
        if let Some(value) = lookup(ENV_POLL_INTERVAL) {
            self.status_poll_interval = parse_duration(ENV_POLL_INTERVAL, &value)?;
        }
        self.validated()
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(contents)?;
        let mut config = Self::default();
        if let Some(url) = file.server_url {
            config.server_url = url;
        }
        if let Some(value) = file.request_timeout {
            config.request_timeout = parse_duration("request_timeout", &value)?;
        }
        if let Some(value) = file.status_poll_interval {
            config.status_poll_interval = parse_duration("status_poll_interval", &value)?;
        }
        if let Some(limit) = file.upload_limit_bytes {
            config.upload_limit_bytes = limit;
        }
        config.validated()
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn with_server_url(mut self, url: impl Into<String>) -> Result<Self, ConfigError> {
        self.server_url = url.into();
        self.validated()
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        self.request_timeout = timeout;
        self.validated()
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Result<Self, ConfigError> {
        self.status_poll_interval = interval;
        self.validated()
    }

    /// Checks every field and strips a trailing slash from the server URL.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        let trimmed = self.server_url.trim().trim_end_matches('/').to_string();
        let parsed = Url::parse(&trimmed).map_err(|e| ConfigError::InvalidServerUrl {
            value: self.server_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidServerUrl {
                value: self.server_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        self.server_url = trimmed;

        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroDuration {
                key: "request_timeout",
            });
        }
        if self.status_poll_interval.is_zero() {
            return Err(ConfigError::ZeroDuration {
                key: "status_poll_interval",
            });
        }
        if self.upload_limit_bytes == 0 {
            return Err(ConfigError::ZeroUploadLimit);
        }
        Ok(self)
    }
}

fn parse_duration(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|source| ConfigError::InvalidDuration {
        key,
        value: value.to_string(),
        source,
    })
}
