// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types with a consistent taxonomy.
//!
//! Only authorization-class failures are interpreted by the session core;
//! every other backend failure is carried through unchanged in `Http`.

use crate::config::ConfigError;
use crate::store::StoreError;
use serde::Deserialize;

/// Maximum number of error body characters surfaced to callers.
const MAX_ERROR_CHARS: usize = 200;

/// Fallback message shown when the backend gave nothing usable.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Client error type.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("Invalid access token: {0}")]
    TokenDecode(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Unable to reach the server: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to decode response: {0}")]
    Parse(String),

    #[error("Token storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Too many redirects while resolving {0}")]
    RedirectLoop(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error body returned by the backend (`{"error": "..."}`).
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ClientError {
    /// Build an error from a non-success status and its raw body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = error_message(body);
        if status == 401 {
            ClientError::Unauthorized(message)
        } else {
            ClientError::Http { status, message }
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    /// True when the error means the local session is gone and the user must
    /// authenticate again.
    pub fn ends_session(&self) -> bool {
        matches!(
            self,
            ClientError::SessionExpired(_) | ClientError::TokenDecode(_)
        )
    }

    /// Message suitable for showing on a page.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Unauthorized(message) | ClientError::Http { message, .. } => {
                message.clone()
            }
            ClientError::SessionExpired(_) | ClientError::TokenDecode(_) => {
                "Your session has ended. Please log in again.".to_string()
            }
            ClientError::Timeout => "Request timed out. Please try again.".to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

/// Extract the backend's `error` field, falling back to the trimmed and
/// truncated body.
fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if !parsed.error.trim().is_empty() {
            return parsed.error;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
