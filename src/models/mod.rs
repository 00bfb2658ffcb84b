// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models exchanged with the backend.

pub mod auth;
pub mod invitation;
pub mod token;
pub mod wedding;

pub use auth::{AuthResponse, MessageResponse, RefreshResponse};
pub use invitation::{AcceptInvitationResponse, InvitationStatus, PendingInvitation};
pub use token::{AccessToken, TokenClaims};
pub use wedding::{NewWedding, PermissionLevel, Wedding, WeddingId};
