// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed token store.
//!
//! The file plays the role of the browser's local storage: a JSON object
//! with a single `authToken` key that survives restarts. It is re-read on
//! every `get`, so a logout performed by another process is observed by the
//! next guard check.

use super::{keys, StoreError, TokenStore};
use crate::models::AccessToken;
use serde_json::{Map, Value};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Token store persisted to a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> Result<Option<Map<String, Value>>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };

        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn write_slots(&self, slots: &Map<String, Value>) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;

        // Each write gets its own uniquely named sibling, created owner-only,
        // and is renamed over the target so readers never see a torn write.
        let payload = serde_json::to_vec(slots)?;
        let mut file = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        file.write_all(&payload).map_err(|e| self.io_error(e))?;
        file.as_file().sync_all().map_err(|e| self.io_error(e))?;
        file.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<AccessToken> {
        match self.read_slots() {
            Ok(Some(slots)) => slots
                .get(keys::AUTH_TOKEN)
                .and_then(Value::as_str)
                .and_then(AccessToken::new),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Token file unreadable, treating session as signed out");
                None
            }
        }
    }

    fn set(&self, token: &AccessToken) -> Result<(), StoreError> {
        let mut slots = Map::new();
        slots.insert(
            keys::AUTH_TOKEN.to_string(),
            Value::String(token.as_str().to_string()),
        );
        self.write_slots(&slots)?;
        tracing::debug!(path = %self.path.display(), "Access token persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Access token removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
