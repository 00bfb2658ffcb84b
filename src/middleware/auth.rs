// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session guard for protected routes.
//!
//! Decisions are made from the token store alone, on every navigation. There
//! is no cached "logged in" flag: a token cleared by a refresh failure or a
//! logout is seen by the very next guard check.

use crate::routes::{Navigation, Route};
use crate::store::TokenStore;

/// Whether a session is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Authenticated,
    Unauthenticated,
}

impl SessionState {
    /// Read the current state from the store.
    pub fn current(tokens: &dyn TokenStore) -> Self {
        if tokens.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }
}

/// Outcome of a guard.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    /// Render the requested route.
    Allow,
    /// Go elsewhere instead.
    Redirect(Navigation),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Allow public routes; allow protected routes only with a token present.
///
/// The redirect replaces the current entry, so going back never lands on
/// the protected page that was refused.
pub fn require_auth(tokens: &dyn TokenStore, route: &Route) -> GuardDecision {
    if !route.is_protected() {
        return GuardDecision::Allow;
    }

    match SessionState::current(tokens) {
        SessionState::Authenticated => GuardDecision::Allow,
        SessionState::Unauthenticated => {
            tracing::debug!(path = %route.path(), "No session, redirecting to login");
            GuardDecision::Redirect(Navigation::to_login())
        }
    }
}
