// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team invitation acceptance.
//!
//! Two entry points: the pending-invitations screen shown right after login,
//! and the standalone page opened from an invitation link.

use super::api::{paths, ApiClient};
use super::weddings::WeddingSelection;
use crate::error::{ClientError, Result};
use crate::models::{
    invitation::AcceptInvitationRequest, AcceptInvitationResponse, InvitationStatus,
    PendingInvitation, WeddingId,
};
use crate::routes::{DashboardPage, NavState, Navigation, Route};
use dashmap::DashSet;
use std::sync::Arc;

/// Message shown when an invitation link carries no token.
pub const MISSING_TOKEN_MESSAGE: &str = "Invitation token not found. The link may be broken.";

/// Result of an accept action.
#[derive(Debug, Clone, PartialEq)]
pub enum AcceptOutcome {
    Accepted(AcceptInvitationResponse),
    /// Already accepted (or in flight) on this screen; nothing was sent.
    AlreadyAccepted,
}

/// The screen listing invitations returned by login or verification.
pub struct PendingInvitations {
    api: ApiClient,
    weddings: Arc<WeddingSelection>,
    invitations: Vec<PendingInvitation>,
    accepted: DashSet<String>,
}

impl PendingInvitations {
    pub fn new(
        api: ApiClient,
        weddings: Arc<WeddingSelection>,
        invitations: Vec<PendingInvitation>,
    ) -> Self {
        Self {
            api,
            weddings,
            invitations,
            accepted: DashSet::new(),
        }
    }

    /// Open the screen from navigation state. Without invitations in the
    /// state there is nothing to show.
    pub fn from_state(
        api: ApiClient,
        weddings: Arc<WeddingSelection>,
        state: Option<&NavState>,
    ) -> Option<Self> {
        match state {
            Some(NavState::Invitations(invitations)) => {
                Some(Self::new(api, weddings, invitations.clone()))
            }
            _ => None,
        }
    }

    /// Invitations exactly as handed over by login.
    pub fn invitations(&self) -> &[PendingInvitation] {
        &self.invitations
    }

    pub fn status(&self, token: &str) -> InvitationStatus {
        if self.accepted.contains(token) {
            InvitationStatus::Accepted
        } else {
            InvitationStatus::Pending
        }
    }

    /// Whether the accept control for this invitation is enabled.
    pub fn can_accept(&self, token: &str) -> bool {
        self.status(token) == InvitationStatus::Pending
    }

    /// Accept one invitation.
    ///
    /// The token is marked before the call goes out, so a second accept of
    /// the same invitation never reaches the backend. On failure the mark is
    /// removed and the control is enabled again.
    pub async fn accept(&self, token: &str) -> Result<AcceptOutcome> {
        if !self.accepted.insert(token.to_string()) {
            tracing::debug!("Invitation already accepted on this screen");
            return Ok(AcceptOutcome::AlreadyAccepted);
        }

        let response: AcceptInvitationResponse = match self
            .api
            .post(paths::ACCEPT_INVITATION, &AcceptInvitationRequest { token })
            .await
        {
            Ok(response) => response,
            Err(e) => {
                self.accepted.remove(token);
                tracing::warn!(error = %e, "Failed to accept invitation");
                return Err(e);
            }
        };

        tracing::info!(wedding_id = ?response.wedding_id, "Invitation accepted");
        reload_weddings(&self.weddings).await;
        Ok(AcceptOutcome::Accepted(response))
    }

    /// Leave the screen for wedding selection.
    pub fn continue_to_selection(&self) -> Navigation {
        let navigation = Navigation::push(Route::SelectWedding);
        self.api.navigator().navigate(navigation.clone());
        navigation
    }
}

/// Result shown on the standalone acceptance page.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkOutcome {
    Accepted {
        message: String,
        wedding_id: Option<WeddingId>,
    },
    Failed {
        message: String,
    },
}

/// Accept the invitation carried by a link.
pub async fn accept_from_link(
    api: &ApiClient,
    weddings: &WeddingSelection,
    token: Option<&str>,
) -> LinkOutcome {
    let Some(token) = token.map(str::trim).filter(|token| !token.is_empty()) else {
        return LinkOutcome::Failed {
            message: MISSING_TOKEN_MESSAGE.to_string(),
        };
    };

    match api
        .post::<_, AcceptInvitationResponse>(
            paths::ACCEPT_INVITATION,
            &AcceptInvitationRequest { token },
        )
        .await
    {
        Ok(response) => {
            tracing::info!(wedding_id = ?response.wedding_id, "Invitation accepted from link");
            reload_weddings(weddings).await;
            LinkOutcome::Accepted {
                message: response.message,
                wedding_id: response.wedding_id,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to accept invitation from link");
            LinkOutcome::Failed {
                message: failure_message(&e),
            }
        }
    }
}

/// Select the wedding just joined and open its dashboard.
pub fn go_to_wedding(
    api: &ApiClient,
    weddings: &WeddingSelection,
    wedding_id: &WeddingId,
) -> Navigation {
    weddings.select_by_id(wedding_id);
    let navigation = Navigation::push(Route::Dashboard(DashboardPage::Overview));
    api.navigator().navigate(navigation.clone());
    navigation
}

fn failure_message(error: &ClientError) -> String {
    match error {
        ClientError::Http { .. }
        | ClientError::Unauthorized(_)
        | ClientError::SessionExpired(_) => error.user_message(),
        _ => "Could not accept the invitation.".to_string(),
    }
}

/// Acceptance already happened on the backend; a failed reload only
/// leaves the list stale.
async fn reload_weddings(weddings: &WeddingSelection) {
    if let Err(e) = weddings.load_all().await {
        tracing::warn!(error = %e, "Failed to reload weddings after accepting invitation");
    }
}
