// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request and response bodies of the `/auth` endpoints.

use super::PendingInvitation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct VerifyEmailRequest<'a> {
    pub email: &'a str,
    pub code: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub consent: bool,
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct PasswordResetRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordRequest<'a> {
    pub email: &'a str,
    pub code: &'a str,
    pub password: &'a str,
}

/// Response of login and email verification.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub pending_invitations: Option<Vec<PendingInvitation>>,
}

impl AuthResponse {
    /// Invitations to surface, empty when absent.
    pub fn invitations(&self) -> &[PendingInvitation] {
        self.pending_invitations.as_deref().unwrap_or_default()
    }
}

/// Response of `POST /auth/refresh-token`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Generic `{message}` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
