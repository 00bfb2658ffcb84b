// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backend API client.
//!
//! Handles:
//! - Bearer token attachment from the token store
//! - Silent refresh and a single replay on 401
//! - Pass-through of every other failure
//!
//! A request moves through the stages `Sending` → (`RefreshPending` →
//! `Replaying`) or ends in `Failed`. The at-most-one replay rule is carried
//! by the attempt's type: only an `Attempt<Initial>` can be turned into a
//! replay, and a replayed attempt has no way back.

use super::refresh::RefreshCoordinator;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::AccessToken;
use crate::routes::Navigator;
use crate::store::TokenStore;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Backend endpoint paths.
pub mod paths {
    pub const LOGIN: &str = "/auth/login";
    pub const LOGOUT: &str = "/auth/logout";
    pub const REFRESH: &str = "/auth/refresh-token";
    pub const VERIFY_EMAIL: &str = "/auth/verify-email";
    pub const REGISTER: &str = "/auth/register";
    pub const REQUEST_PASSWORD_RESET: &str = "/auth/request-password-reset";
    pub const RESET_PASSWORD: &str = "/auth/reset-password";
    pub const WEDDINGS: &str = "/weddings";
    pub const ACCEPT_INVITATION: &str = "/team/accept-invitation";
    pub const CURRENT_USER: &str = "/users/me";
}

/// Named stages of the request pipeline, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Sending,
    RefreshPending,
    Replaying,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Sending => "sending",
            Stage::RefreshPending => "refresh_pending",
            Stage::Replaying => "replaying",
            Stage::Failed => "failed",
        })
    }
}

/// A request that can be sent, and replayed verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, None)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path, None)
    }

    /// POST without a body.
    pub fn post_empty(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path, None)
    }

    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::Parse(format!("Failed to encode request: {}", e)))?;
        Ok(Self::new(Method::POST, path, Some(value)))
    }


    fn new(method: Method, path: impl Into<String>, body: Option<serde_json::Value>) -> Self {
        Self {
            method,
            path: path.into(),
            body,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// Login and logout failures must reach the caller untouched: a 401
    /// there means bad credentials or an already-dead session, and refreshing
    /// would loop or mask the error.
    pub fn bypasses_refresh(&self) -> bool {
        let path = self.path.split('?').next().unwrap_or_default();
        path == paths::LOGIN || path == paths::LOGOUT
    }
}

/// Raw backend response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ClientError::Parse(format!("JSON parse error: {}", e)))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Success passes through; any other status becomes an error carrying
    /// the backend's message.
    fn into_result(self) -> Result<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(ClientError::from_status(self.status.as_u16(), &self.text()))
        }
    }
}

/// First send of a request.
pub struct Initial;
/// The single replay permitted after a successful refresh.
pub struct Retried;

/// One send of a request together with the token it carries.
struct Attempt<S> {
    request: ApiRequest,
    token: Option<AccessToken>,
    _stage: PhantomData<S>,
}

impl Attempt<Initial> {
    fn new(request: ApiRequest, token: Option<AccessToken>) -> Self {
        Self {
            request,
            token,
            _stage: PhantomData,
        }
    }

    /// Consume the first attempt into its replay with the renewed token.
    fn into_replay(self, token: AccessToken) -> Attempt<Retried> {
        Attempt {
            request: self.request,
            token: Some(token),
            _stage: PhantomData,
        }
    }
}

/// API client shared by every service.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Config,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    refresher: RefreshCoordinator,
    /// Bumped whenever a session starts or ends
    session: Arc<AtomicU64>,
}

impl ApiClient {
    /// Create a client. The cookie store holds the refresh credential set by
    /// the backend; application code never reads it.
    pub fn new(
        config: &Config,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            config: config.clone(),
            tokens,
            navigator,
            refresher: RefreshCoordinator::default(),
            session: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }

    /// Number of refresh calls issued by this client so far.
    pub fn refresh_count(&self) -> u64 {
        self.refresher.refresh_count()
    }

    /// Identifies the current session. Changes on login, logout and refresh
    /// failure, never on a successful refresh.
    pub fn session_epoch(&self) -> u64 {
        self.session.load(Ordering::SeqCst)
    }

    pub(crate) fn bump_session(&self) {
        self.session.fetch_add(1, Ordering::SeqCst);
    }

    /// Send a request through the full pipeline.
    ///
    /// Resolves only once the request succeeded directly, succeeded after
    /// exactly one replay, or failed for good.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let attempt = Attempt::new(request, self.tokens.get());

        tracing::debug!(
            stage = %Stage::Sending,
            method = %attempt.request.method,
            path = %attempt.request.path,
            authenticated = attempt.token.is_some(),
            "Sending request"
        );
        let response = self
            .dispatch(&attempt.request, attempt.token.as_ref())
            .await?;

        if response.status != StatusCode::UNAUTHORIZED || attempt.request.bypasses_refresh() {
            return response.into_result();
        }

        tracing::debug!(
            stage = %Stage::RefreshPending,
            path = %attempt.request.path,
            "Request unauthorized, renewing session"
        );
        let token = self
            .refresher
            .refresh(
                &self.http,
                &self.config.url(paths::REFRESH),
                self.tokens.as_ref(),
                self.navigator.as_ref(),
                attempt.token.as_ref(),
            )
            .await
            .inspect_err(|_| self.bump_session())?;

        let replay = attempt.into_replay(token);
        tracing::debug!(
            stage = %Stage::Replaying,
            path = %replay.request.path,
            "Replaying request with renewed token"
        );
        self.dispatch(&replay.request, replay.token.as_ref())
            .await?
            .into_result()
    }

    /// GET and parse JSON.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(ApiRequest::get(path)).await?.json()
    }

    /// POST a JSON body and parse the JSON response.
    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.execute(ApiRequest::post(path, body)?).await?.json()
    }

    /// POST without a body, ignoring the response body.
    pub async fn post_empty(&self, path: &str) -> Result<()> {
        self.execute(ApiRequest::post_empty(path)).await?;
        Ok(())
    }

    /// DELETE and parse JSON.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(ApiRequest::delete(path)).await?.json()
    }

    /// Send one HTTP request. Network failures are errors; every HTTP status
    /// comes back as a response for the pipeline to judge.
    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&AccessToken>,
    ) -> Result<ApiResponse> {
        let mut builder = self
            .http
            .request(request.method.clone(), self.config.url(&request.path));

        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, token.bearer());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        Ok(ApiResponse { status, body })
    }
}
