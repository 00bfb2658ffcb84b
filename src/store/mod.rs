// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token storage layer.
//!
//! The store is the only mutable state shared by concurrent request flows.
//! Writes are last-write-wins and `clear` is idempotent.

pub mod file;
pub mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

use crate::models::AccessToken;

/// Durable key names.
pub mod keys {
    /// The single persisted slot holding the access token.
    pub const AUTH_TOKEN: &str = "authToken";
}

/// Persisted slot for the current access token.
///
/// `get` is synchronous so guards can consult the latest value on every
/// navigation without awaiting.
pub trait TokenStore: Send + Sync {
    /// Current token, or `None` when signed out.
    fn get(&self) -> Option<AccessToken>;

    /// Replace the stored token.
    fn set(&self, token: &AccessToken) -> Result<(), StoreError>;

    /// Remove the stored token. Safe to call when already empty.
    fn clear(&self) -> Result<(), StoreError>;

    /// Whether a token is present right now.
    fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

/// Token storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
