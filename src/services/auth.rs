// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lifecycle: login, verification, registration, password reset,
//! logout and account deletion.

use super::api::{paths, ApiClient};
use crate::error::{ClientError, Result};
use crate::middleware::SessionState;
use crate::models::{
    auth::{
        LoginRequest, PasswordResetRequest, RegisterRequest, RegisterResponse,
        ResetPasswordRequest, VerifyEmailRequest,
    },
    AccessToken, AuthResponse, MessageResponse, PendingInvitation,
};
use crate::routes::{NavState, Navigation, Route};

/// Message shown on the login page after a successful password reset.
pub const PASSWORD_RESET_MESSAGE: &str = "Password reset successfully! You can now log in.";

/// Where a fresh session goes: straight to the invitations when there are
/// any, otherwise to wedding selection.
pub fn post_auth_navigation(invitations: Vec<PendingInvitation>) -> Navigation {
    if invitations.is_empty() {
        Navigation::push(Route::SelectWedding)
    } else {
        Navigation::push(Route::PendingInvitations).with_state(NavState::Invitations(invitations))
    }
}

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn session_state(&self) -> SessionState {
        SessionState::current(self.api.tokens().as_ref())
    }

    /// Log in with email and password.
    ///
    /// A rejected login leaves the store untouched and returns the backend
    /// error as-is.
    pub async fn login(&self, email: &str, password: &str) -> Result<Navigation> {
        let response: AuthResponse = self
            .api
            .post(paths::LOGIN, &LoginRequest { email, password })
            .await?;
        self.start_session(response)
    }

    /// Complete registration with the emailed code. Succeeds exactly like a
    /// login.
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<Navigation> {
        let response: AuthResponse = self
            .api
            .post(paths::VERIFY_EMAIL, &VerifyEmailRequest { email, code })
            .await?;
        self.start_session(response)
    }

    fn start_session(&self, response: AuthResponse) -> Result<Navigation> {
        let token = AccessToken::new(response.access_token.as_str())
            .ok_or_else(|| ClientError::Parse("Response carried an empty access token".into()))?;
        self.api.tokens().set(&token)?;
        self.api.bump_session();

        let invitations = response.invitations().to_vec();
        tracing::info!(pending_invitations = invitations.len(), "Session started");

        let navigation = post_auth_navigation(invitations);
        self.api.navigator().navigate(navigation.clone());
        Ok(navigation)
    }

    /// Create an account. The verification screen receives the email.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        consent: bool,
    ) -> Result<Navigation> {
        let response: RegisterResponse = self
            .api
            .post(
                paths::REGISTER,
                &RegisterRequest {
                    name,
                    email,
                    password,
                    consent,
                },
            )
            .await?;
        tracing::info!("Account registered, awaiting verification");

        let navigation =
            Navigation::push(Route::VerifyEmail).with_state(NavState::Email(response.email));
        self.api.navigator().navigate(navigation.clone());
        Ok(navigation)
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<Navigation> {
        let _: MessageResponse = self
            .api
            .post(paths::REQUEST_PASSWORD_RESET, &PasswordResetRequest { email })
            .await?;

        let navigation =
            Navigation::push(Route::ResetPassword).with_state(NavState::Email(email.to_string()));
        self.api.navigator().navigate(navigation.clone());
        Ok(navigation)
    }

    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        password: &str,
    ) -> Result<Navigation> {
        let _: MessageResponse = self
            .api
            .post(
                paths::RESET_PASSWORD,
                &ResetPasswordRequest {
                    email,
                    code,
                    password,
                },
            )
            .await?;
        tracing::info!("Password reset");

        let navigation = Navigation::push(Route::Login)
            .with_state(NavState::Message(PASSWORD_RESET_MESSAGE.to_string()));
        self.api.navigator().navigate(navigation.clone());
        Ok(navigation)
    }

    /// End the session. The backend call is best effort; local cleanup and
    /// the redirect to login always happen.
    pub async fn logout(&self) {
        if let Err(e) = self.api.post_empty(paths::LOGOUT).await {
            tracing::warn!(error = %e, "Logout request failed, clearing session locally");
        }
        self.end_session();
    }

    /// Delete the account, then end the session. Returns the backend's
    /// confirmation message.
    pub async fn delete_account(&self) -> Result<String> {
        let response: MessageResponse = self.api.delete(paths::CURRENT_USER).await?;
        tracing::info!("Account deleted");
        self.end_session();
        Ok(response.message)
    }

    /// First name of the signed-in user, `None` when signed out.
    ///
    /// A token whose claims cannot be decoded ends the session.
    pub async fn display_name(&self) -> Result<Option<String>> {
        let Some(token) = self.api.tokens().get() else {
            return Ok(None);
        };

        match token.claims() {
            Ok(claims) => Ok(Some(claims.first_name().to_string())),
            Err(e) => {
                tracing::warn!(error = %e, "Stored token is unreadable, logging out");
                self.logout().await;
                Err(e)
            }
        }
    }

    fn end_session(&self) {
        if let Err(e) = self.api.tokens().clear() {
            tracing::warn!(error = %e, "Failed to clear token store");
        }
        self.api.bump_session();
        self.api.navigator().navigate(Navigation::to_login());
    }
}
