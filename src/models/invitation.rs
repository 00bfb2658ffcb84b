// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team invitations.

use super::{PermissionLevel, WeddingId};
use serde::{Deserialize, Serialize};

/// An unresolved offer of team membership, surfaced at login time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingInvitation {
    /// One-time token identifying the invitation
    pub invitation_token: String,
    #[serde(default)]
    pub wedding_id: Option<WeddingId>,
    #[serde(default)]
    pub bride_name: String,
    #[serde(default)]
    pub groom_name: String,
    /// How the invitee relates to the couple (e.g. "Maid of honor")
    #[serde(default)]
    pub relationship: String,
    pub permission_level: PermissionLevel,
}

/// Body for `POST /team/accept-invitation`.
#[derive(Debug, Serialize)]
pub struct AcceptInvitationRequest<'a> {
    pub token: &'a str,
}

/// Response of `POST /team/accept-invitation`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInvitationResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub wedding_id: Option<WeddingId>,
}

/// Acceptance state of one invitation on a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationStatus {
    Pending,
    Accepted,
}
