// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route table and navigation requests.

pub mod history;
pub mod router;

pub use history::{History, Navigator};
pub use router::{Router, Screen};

use crate::models::PendingInvitation;

/// Sections of the main dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardPage {
    Overview,
    EditWedding,
    Guests,
    SiteEditor,
    Vendors,
    Budget,
    Team,
}

impl DashboardPage {
    const ALL: [DashboardPage; 7] = [
        DashboardPage::Overview,
        DashboardPage::EditWedding,
        DashboardPage::Guests,
        DashboardPage::SiteEditor,
        DashboardPage::Vendors,
        DashboardPage::Budget,
        DashboardPage::Team,
    ];

    fn segment(self) -> &'static str {
        match self {
            DashboardPage::Overview => "",
            DashboardPage::EditWedding => "edit-wedding",
            DashboardPage::Guests => "guests",
            DashboardPage::SiteEditor => "site-editor",
            DashboardPage::Vendors => "vendors",
            DashboardPage::Budget => "budget",
            DashboardPage::Team => "team",
        }
    }
}

/// Every location of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Register,
    VerifyEmail,
    RequestPasswordReset,
    ResetPassword,
    /// Public couple website
    CoupleSite { slug: String },
    /// Guest RSVP link
    Rsvp { token: String },
    SelectWedding,
    CreateWedding,
    /// Standalone acceptance page opened from an invitation email
    AcceptInvitation { token: Option<String> },
    PendingInvitations,
    Dashboard(DashboardPage),
}

impl Route {
    /// Parse a path (with optional query string). Unknown paths yield `None`.
    pub fn parse(raw: &str) -> Option<Route> {
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (raw, None),
        };
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        let route = match path {
            "/" => Route::Landing,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/verify-email" => Route::VerifyEmail,
            "/request-password-reset" => Route::RequestPasswordReset,
            "/reset-password" => Route::ResetPassword,
            "/select-wedding" => Route::SelectWedding,
            "/create-wedding" => Route::CreateWedding,
            "/pending-invitations" => Route::PendingInvitations,
            "/accept-invitation" => Route::AcceptInvitation {
                token: query.and_then(|q| query_param(q, "token")),
            },
            "/dashboard" => Route::Dashboard(DashboardPage::Overview),
            other => {
                if let Some(section) = other.strip_prefix("/dashboard/") {
                    let page = DashboardPage::ALL
                        .into_iter()
                        .find(|page| !page.segment().is_empty() && page.segment() == section)?;
                    Route::Dashboard(page)
                } else if let Some(slug) = single_segment(other, "/site/") {
                    Route::CoupleSite { slug }
                } else if let Some(token) = single_segment(other, "/rsvp/") {
                    Route::Rsvp { token }
                } else {
                    return None;
                }
            }
        };

        Some(route)
    }

    /// Canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::VerifyEmail => "/verify-email".to_string(),
            Route::RequestPasswordReset => "/request-password-reset".to_string(),
            Route::ResetPassword => "/reset-password".to_string(),
            Route::CoupleSite { slug } => format!("/site/{}", urlencoding::encode(slug)),
            Route::Rsvp { token } => format!("/rsvp/{}", urlencoding::encode(token)),
            Route::SelectWedding => "/select-wedding".to_string(),
            Route::CreateWedding => "/create-wedding".to_string(),
            Route::AcceptInvitation { token: Some(token) } => {
                format!("/accept-invitation?token={}", urlencoding::encode(token))
            }
            Route::AcceptInvitation { token: None } => "/accept-invitation".to_string(),
            Route::PendingInvitations => "/pending-invitations".to_string(),
            Route::Dashboard(DashboardPage::Overview) => "/dashboard".to_string(),
            Route::Dashboard(page) => format!("/dashboard/{}", page.segment()),
        }
    }

    /// Routes that require a session.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::SelectWedding
                | Route::CreateWedding
                | Route::AcceptInvitation { .. }
                | Route::PendingInvitations
                | Route::Dashboard(_)
        )
    }

    /// Routes that additionally need an active wedding.
    pub fn requires_selected_wedding(&self) -> bool {
        matches!(self, Route::Dashboard(_))
    }
}

fn single_segment(path: &str, prefix: &str) -> Option<String> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() || rest.contains('/') {
        return None;
    }
    urlencoding::decode(rest).ok().map(|s| s.into_owned())
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .and_then(|(_, value)| {
            urlencoding::decode(&value.replace('+', " "))
                .ok()
                .map(|decoded| decoded.into_owned())
        })
        .filter(|value| !value.is_empty())
}

/// Transient per-entry navigation state. Lives only in the history and is
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum NavState {
    /// Invitations handed from login/verification to the acceptance screen
    Invitations(Vec<PendingInvitation>),
    /// Email carried between registration, verification and reset screens
    Email(String),
    /// One-off message shown on arrival (e.g. after a password reset)
    Message(String),
}

/// A location in the history: a route plus its transient state.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub route: Route,
    pub state: Option<NavState>,
}

impl Location {
    pub fn new(route: Route) -> Self {
        Self { route, state: None }
    }
}

/// A request to move to another location.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    pub location: Location,
    /// Replace the current entry instead of pushing a new one
    pub replace: bool,
}

impl Navigation {
    pub fn push(route: Route) -> Self {
        Self {
            location: Location::new(route),
            replace: false,
        }
    }

    pub fn replace(route: Route) -> Self {
        Self {
            location: Location::new(route),
            replace: true,
        }
    }

    /// The redirect issued whenever the session is gone.
    pub fn to_login() -> Self {
        Self::replace(Route::Login)
    }

    pub fn with_state(mut self, state: NavState) -> Self {
        self.location.state = Some(state);
        self
    }

    pub fn route(&self) -> &Route {
        &self.location.route
    }
}
