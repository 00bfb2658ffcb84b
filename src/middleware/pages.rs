// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-page guards that run after the session guard.

use super::auth::GuardDecision;
use crate::routes::{Location, NavState, Navigation, Route};
use crate::services::WeddingSelection;

/// Dashboard pages need an active wedding; without one the user picks again.
pub fn require_selected_wedding(route: &Route, weddings: &WeddingSelection) -> GuardDecision {
    if !route.requires_selected_wedding() || weddings.selected().is_some() {
        return GuardDecision::Allow;
    }

    tracing::debug!(path = %route.path(), "No wedding selected, redirecting");
    GuardDecision::Redirect(Navigation::replace(Route::SelectWedding))
}

/// The pending-invitations screen only exists as the continuation of a login
/// that returned invitations. Opened any other way it hands over to wedding
/// selection.
pub fn require_invitation_state(location: &Location) -> GuardDecision {
    if location.route != Route::PendingInvitations {
        return GuardDecision::Allow;
    }

    match &location.state {
        Some(NavState::Invitations(_)) => GuardDecision::Allow,
        _ => {
            tracing::debug!("Pending invitations opened without state, redirecting");
            GuardDecision::Redirect(Navigation::replace(Route::SelectWedding))
        }
    }
}
