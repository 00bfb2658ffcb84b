//! Client configuration loaded from environment variables.
//!
//! The API base address can be baked in at build time through
//! `MARIAGE_API_URL`; a runtime variable of the same name wins over it.

use std::env;
use std::path::PathBuf;

/// Address used when nothing else is configured (local backend).
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Backend base URL without trailing slash
    pub api_base_url: String,
    /// File holding the persisted access token
    pub token_file: PathBuf,
    /// Per-request timeout
    pub request_timeout_secs: u64,
}

impl Default for Config {
    /// Local development defaults.
    fn default() -> Self {
        Self {
            api_base_url: build_time_base_url().to_string(),
            token_file: default_token_file(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honoured for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base_url = match env::var("MARIAGE_API_URL") {
            Ok(url) => normalize_base_url(&url)?,
            Err(_) => normalize_base_url(build_time_base_url())?,
        };

        let token_file = env::var("MARIAGE_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_token_file());

        let request_timeout_secs = match env::var("MARIAGE_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            api_base_url,
            token_file,
            request_timeout_secs,
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_file: PathBuf::from("test-session.json"),
            request_timeout_secs: 5,
        }
    }

    /// Copy of this config pointing at another backend.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api_base_url = base_url.trim().trim_end_matches('/').to_string();
        self
    }

    /// Join the base URL and an API path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim().trim_start_matches('/')
        )
    }
}

fn build_time_base_url() -> &'static str {
    option_env!("MARIAGE_API_URL").unwrap_or(DEFAULT_API_BASE_URL)
}

fn default_token_file() -> PathBuf {
    match env::var("HOME") {
        Ok(home) if !home.is_empty() => PathBuf::from(home).join(".mariage").join("session.json"),
        _ => PathBuf::from(".mariage-session.json"),
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid {
            name: "MARIAGE_API_URL",
            reason: "must not be empty".to_string(),
        });
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            name: "MARIAGE_API_URL",
            reason: format!("expected an http(s) URL, got {trimmed}"),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::Invalid {
            name: "MARIAGE_REQUEST_TIMEOUT_SECS",
            reason: format!("expected a positive number of seconds, got {raw}"),
        }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
