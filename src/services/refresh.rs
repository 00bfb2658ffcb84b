// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access token renewal.
//!
//! Only one refresh call is in flight at a time. Requests that are rejected
//! while a refresh runs wait on the same lock, then re-check the store: if the
//! token they were sent with has already been replaced they reuse the new one
//! instead of refreshing again.

use super::api::Stage;
use crate::error::{ClientError, Result};
use crate::models::{AccessToken, RefreshResponse};
use crate::routes::{Navigation, Navigator};
use crate::store::TokenStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Serializes refresh calls for one client.
#[derive(Clone, Default)]
pub struct RefreshCoordinator {
    lock: Arc<Mutex<()>>,
    refreshes: Arc<AtomicU64>,
}

impl RefreshCoordinator {
    /// Number of refresh calls actually sent to the backend.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::SeqCst)
    }

    /// Obtain a token to replay a request that was rejected while carrying
    /// `rejected`.
    ///
    /// On success the token is stored and returned. On failure the store is
    /// cleared, the user is sent to the login screen and `SessionExpired` is
    /// returned.
    pub(crate) async fn refresh(
        &self,
        http: &reqwest::Client,
        refresh_url: &str,
        tokens: &dyn TokenStore,
        navigator: &dyn Navigator,
        rejected: Option<&AccessToken>,
    ) -> Result<AccessToken> {
        let _guard = self.lock.lock().await;

        // Another request may have settled the session while we waited.
        match (tokens.get(), rejected) {
            (Some(current), Some(rejected)) if current != *rejected => {
                tracing::debug!("Token already renewed, reusing it");
                return Ok(current);
            }
            (Some(current), None) => {
                tracing::debug!("Session started while waiting, reusing its token");
                return Ok(current);
            }
            (None, Some(_)) => {
                tracing::debug!(stage = %Stage::Failed, "Session ended while waiting for refresh");
                return Err(ClientError::SessionExpired(
                    "session ended before the request could be replayed".to_string(),
                ));
            }
            _ => {}
        }

        self.refreshes.fetch_add(1, Ordering::SeqCst);

        match request_token(http, refresh_url).await {
            Ok(token) => {
                if let Err(e) = tokens.set(&token) {
                    tracing::warn!(error = %e, "Failed to persist refreshed access token");
                }
                tracing::info!("Access token refreshed");
                Ok(token)
            }
            Err(e) => {
                tracing::warn!(
                    stage = %Stage::Failed,
                    error = %e,
                    "Token refresh failed, ending session"
                );
                if let Err(e) = tokens.clear() {
                    tracing::warn!(error = %e, "Failed to clear token store");
                }
                navigator.navigate(Navigation::to_login());
                Err(ClientError::SessionExpired(e.to_string()))
            }
        }
    }
}

/// Call the refresh endpoint. The refresh credential travels as a cookie,
/// so the request carries no body and no bearer token.
async fn request_token(http: &reqwest::Client, refresh_url: &str) -> Result<AccessToken> {
    let response = http.post(refresh_url).send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::from_status(status.as_u16(), &body));
    }

    let body: RefreshResponse = response
        .json()
        .await
        .map_err(|e| ClientError::Parse(format!("Invalid refresh response: {}", e)))?;

    AccessToken::new(body.access_token)
        .ok_or_else(|| ClientError::Parse("Refresh response carried an empty token".to_string()))
}
