// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory token store, for tests and short-lived sessions.

use super::{StoreError, TokenStore};
use crate::models::AccessToken;
use std::sync::{PoisonError, RwLock};

/// Token store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<AccessToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token.
    pub fn with_token(token: AccessToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<AccessToken> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, token: &AccessToken) -> Result<(), StoreError> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_clear() {
        let store = MemoryTokenStore::new();
        assert!(store.get().is_none());

        let token = AccessToken::new("abc").unwrap();
        store.set(&token).unwrap();
        assert_eq!(store.get(), Some(token));
        assert!(store.is_authenticated());

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_last_write_wins() {
        let store = MemoryTokenStore::with_token(AccessToken::new("first").unwrap());
        store.set(&AccessToken::new("second").unwrap()).unwrap();
        store.set(&AccessToken::new("third").unwrap()).unwrap();
        assert_eq!(store.get().unwrap().as_str(), "third");
    }
}
