// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Navigation guards (session, page preconditions).

pub mod auth;
pub mod pages;

pub use auth::{require_auth, GuardDecision, SessionState};
pub use pages::{require_invitation_state, require_selected_wedding};
