// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - session and domain logic.

pub mod api;
pub mod auth;
pub mod invitations;
pub mod refresh;
pub mod weddings;

pub use api::{ApiClient, ApiRequest, ApiResponse, Stage};
pub use auth::{post_auth_navigation, AuthService};
pub use invitations::{
    accept_from_link, go_to_wedding, AcceptOutcome, LinkOutcome, PendingInvitations,
};
pub use refresh::RefreshCoordinator;
pub use weddings::WeddingSelection;
