// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process mock of the planning backend plus client helpers.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use mariage_client::config::Config;
use mariage_client::models::AccessToken;
use mariage_client::store::{MemoryTokenStore, StoreError, TokenStore};
use mariage_client::AppState;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Password accepted by the mock login.
#[allow(dead_code)]
pub const GOOD_PASSWORD: &str = "correct-horse";
/// Code accepted by email verification and password reset.
#[allow(dead_code)]
pub const GOOD_CODE: &str = "123456";
/// Invitation token the mock rejects as expired.
#[allow(dead_code)]
pub const EXPIRED_INVITATION: &str = "expired";
/// Wedding joined by accepting any other invitation.
#[allow(dead_code)]
pub const INVITED_WEDDING_ID: i64 = 77;

const REFRESH_COOKIE: &str = "refresh_token";

#[derive(Serialize)]
struct Claims {
    id: u64,
    name: String,
    email: String,
    iat: u64,
    exp: u64,
    seq: u64,
}

/// Mutable state and counters of the mock backend.
#[derive(Default)]
pub struct MockState {
    /// The only access token the backend currently accepts
    valid_token: Mutex<Option<String>>,
    issued: AtomicU64,
    pub refresh_calls: AtomicUsize,
    pub login_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub accept_calls: AtomicUsize,
    pub refresh_fails: AtomicBool,
    pub refresh_requires_cookie: AtomicBool,
    pub logout_unauthorized: AtomicBool,
    pub refresh_delay_ms: AtomicU64,
    pub weddings_delay_ms: AtomicU64,
    weddings: Mutex<Vec<Value>>,
    pending_invitations: Mutex<Option<Value>>,
    next_wedding_id: AtomicU64,
    /// (path, Authorization header) of every authenticated endpoint hit
    seen_authorization: Mutex<Vec<(String, Option<String>)>>,
}

#[allow(dead_code)]
impl MockState {
    /// Mint a new access token and make it the only valid one.
    pub fn issue_token(&self) -> String {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = Claims {
            id: 1,
            name: "Maria Clara Souza".to_string(),
            email: "maria@example.com".to_string(),
            iat: now,
            exp: now + 900,
            seq,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"mock-backend-secret"),
        )
        .expect("Failed to mint token");

        *self.valid_token.lock().unwrap() = Some(token.clone());
        token
    }

    /// Invalidate the current access token (as if it expired).
    pub fn expire_access_token(&self) {
        *self.valid_token.lock().unwrap() = None;
    }

    pub fn set_weddings(&self, weddings: Vec<Value>) {
        *self.weddings.lock().unwrap() = weddings;
    }

    pub fn set_pending_invitations(&self, invitations: Option<Value>) {
        *self.pending_invitations.lock().unwrap() = invitations;
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Authorization headers seen on `path`, oldest first.
    pub fn authorization_seen(&self, path: &str) -> Vec<Option<String>> {
        self.seen_authorization
            .lock()
            .unwrap()
            .iter()
            .filter(|(seen, _)| seen == path)
            .map(|(_, auth)| auth.clone())
            .collect()
    }

    fn authorize(&self, path: &str, headers: &HeaderMap) -> Result<(), Response> {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.seen_authorization
            .lock()
            .unwrap()
            .push((path.to_string(), auth.clone()));

        let valid = self.valid_token.lock().unwrap().clone();
        match (auth.as_deref().and_then(|h| h.strip_prefix("Bearer ")), valid) {
            (Some(sent), Some(valid)) if sent == valid => Ok(()),
            _ => Err(error(StatusCode::UNAUTHORIZED, "Invalid or expired token")),
        }
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn session_response(state: &MockState) -> Response {
    let token = state.issue_token();
    let mut body = json!({ "accessToken": token });
    if let Some(invitations) = state.pending_invitations.lock().unwrap().clone() {
        body["pendingInvitations"] = invitations;
    }
    (
        [(
            header::SET_COOKIE,
            format!("{}=rt-{}; Path=/; HttpOnly", REFRESH_COOKIE, token.len()),
        )],
        Json(body),
    )
        .into_response()
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.login_calls.fetch_add(1, Ordering::SeqCst);
    if body["password"] != GOOD_PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }
    session_response(&state)
}

async fn verify_email(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if body["code"] != GOOD_CODE {
        return error(StatusCode::BAD_REQUEST, "Invalid verification code");
    }
    session_response(&state)
}

async fn refresh_token(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);

    let delay = state.refresh_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    if state.refresh_fails.load(Ordering::SeqCst) {
        return error(StatusCode::UNAUTHORIZED, "Invalid refresh token");
    }

    if state.refresh_requires_cookie.load(Ordering::SeqCst) {
        let has_cookie = headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|cookies| cookies.contains(&format!("{}=", REFRESH_COOKIE)));
        if !has_cookie {
            return error(StatusCode::UNAUTHORIZED, "Refresh token missing");
        }
    }

    Json(json!({ "accessToken": state.issue_token() })).into_response()
}

async fn logout(State(state): State<Arc<MockState>>) -> Response {
    state.logout_calls.fetch_add(1, Ordering::SeqCst);
    if state.logout_unauthorized.load(Ordering::SeqCst) {
        return error(StatusCode::UNAUTHORIZED, "Not logged in");
    }
    state.expire_access_token();
    Json(json!({ "message": "Logged out" })).into_response()
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@example.com" {
        return error(StatusCode::CONFLICT, "Email already registered");
    }
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Check your email", "email": body["email"] })),
    )
        .into_response()
}

async fn request_password_reset() -> Response {
    Json(json!({ "message": "If the account exists, a code was sent" })).into_response()
}

async fn reset_password(Json(body): Json<Value>) -> Response {
    if body["code"] != GOOD_CODE {
        return error(StatusCode::BAD_REQUEST, "Invalid reset code");
    }
    Json(json!({ "message": "Password updated" })).into_response()
}

async fn list_weddings(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(response) = state.authorize("/weddings", &headers) {
        return response;
    }

    let delay = state.weddings_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    Json(Value::Array(state.weddings.lock().unwrap().clone())).into_response()
}

async fn create_wedding(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = state.authorize("/weddings", &headers) {
        return response;
    }

    let id = 100 + state.next_wedding_id.fetch_add(1, Ordering::SeqCst);
    let wedding = json!({
        "wedding_id": id,
        "bride_name": body["bride_name"],
        "groom_name": body["groom_name"],
        "wedding_date": body.get("wedding_date").cloned().unwrap_or(Value::Null),
        "permission_level": "edit",
    });
    state.weddings.lock().unwrap().push(wedding.clone());

    // Creation responses carry no permission level.
    let mut created = wedding;
    if let Some(map) = created.as_object_mut() {
        map.remove("permission_level");
    }
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn accept_invitation(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = state.authorize("/team/accept-invitation", &headers) {
        return response;
    }
    state.accept_calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(20)).await;

    if body["token"] == EXPIRED_INVITATION {
        return error(StatusCode::GONE, "Invitation expired");
    }

    state.weddings.lock().unwrap().push(json!({
        "wedding_id": INVITED_WEDDING_ID,
        "bride_name": "Julia",
        "groom_name": "Rafael",
        "wedding_date": "2027-09-18",
        "permission_level": "view",
    }));
    Json(json!({ "message": "Invitation accepted", "weddingId": INVITED_WEDDING_ID }))
        .into_response()
}

async fn delete_account(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(response) = state.authorize("/users/me", &headers) {
        return response;
    }
    state.expire_access_token();
    Json(json!({ "message": "Account deleted" })).into_response()
}

async fn probe(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(response) = state.authorize("/probe", &headers) {
        return response;
    }
    Json(json!({ "ok": true })).into_response()
}

async fn always_unauthorized(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    let _ = state.authorize("/always-401", &headers);
    error(StatusCode::UNAUTHORIZED, "Forbidden resource")
}

async fn validation_failure() -> Response {
    error(StatusCode::UNPROCESSABLE_ENTITY, "Guest name is required")
}

async fn server_failure() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
}

/// A running mock backend.
pub struct MockBackend {
    pub state: Arc<MockState>,
    pub base_url: String,
}

/// Start the mock backend on an ephemeral port.
pub async fn spawn_backend() -> MockBackend {
    let state = Arc::new(MockState::default());

    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/verify-email", post(verify_email))
        .route("/auth/refresh-token", post(refresh_token))
        .route("/auth/logout", post(logout))
        .route("/auth/register", post(register))
        .route("/auth/request-password-reset", post(request_password_reset))
        .route("/auth/reset-password", post(reset_password))
        .route("/weddings", get(list_weddings).post(create_wedding))
        .route("/team/accept-invitation", post(accept_invitation))
        .route("/users/me", delete(delete_account))
        .route("/probe", get(probe))
        .route("/always-401", get(always_unauthorized))
        .route("/fails/validation", get(validation_failure))
        .route("/fails/server", get(server_failure))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock backend failed");
    });

    MockBackend {
        state,
        base_url: format!("http://{}", addr),
    }
}

/// A token store operation, as observed by `RecordingStore`.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum StoreOp {
    Set(String),
    Clear,
}

/// In-memory store that records every write.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryTokenStore,
    ops: Mutex<Vec<StoreOp>>,
}

#[allow(dead_code)]
impl RecordingStore {
    pub fn ops(&self) -> Vec<StoreOp> {
        self.ops.lock().unwrap().clone()
    }

    /// Put a token in place without recording it.
    pub fn seed(&self, raw: &str) {
        self.inner
            .set(&AccessToken::new(raw).expect("blank token"))
            .expect("seed failed");
    }

    pub fn raw(&self) -> Option<String> {
        self.inner.get().map(|token| token.as_str().to_string())
    }
}

impl TokenStore for RecordingStore {
    fn get(&self) -> Option<AccessToken> {
        self.inner.get()
    }

    fn set(&self, token: &AccessToken) -> Result<(), StoreError> {
        self.ops
            .lock()
            .unwrap()
            .push(StoreOp::Set(token.as_str().to_string()));
        self.inner.set(token)
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.ops.lock().unwrap().push(StoreOp::Clear);
        self.inner.clear()
    }
}

/// Client wired to the mock backend over a recording store.
#[allow(dead_code)]
pub fn create_test_app(backend: &MockBackend) -> (AppState, Arc<RecordingStore>) {
    let store = Arc::new(RecordingStore::default());
    let state = create_test_app_with_store(backend, store.clone());
    (state, store)
}

#[allow(dead_code)]
pub fn create_test_app_with_store(
    backend: &MockBackend,
    store: Arc<dyn TokenStore>,
) -> AppState {
    let config = Config::test_default().with_base_url(&backend.base_url);
    AppState::new(config, store).expect("Failed to build client")
}

/// Client that already holds a token the backend accepts.
#[allow(dead_code)]
pub fn signed_in_app(backend: &MockBackend) -> (AppState, Arc<RecordingStore>) {
    let (state, store) = create_test_app(backend);
    store.seed(&backend.state.issue_token());
    (state, store)
}

#[allow(dead_code)]
pub fn wedding_json(id: &str, permission: &str) -> Value {
    json!({
        "wedding_id": id,
        "bride_name": "Ana Luiza",
        "groom_name": "Pedro Henrique",
        "wedding_date": "2027-05-01",
        "permission_level": permission,
    })
}
