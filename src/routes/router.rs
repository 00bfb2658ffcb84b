// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Guarded rendering of the current history entry.
//!
//! The wedding selection state is scoped to the authenticated part of the
//! app: it is created and loaded on the first protected render of a session
//! and dropped as soon as a public route is shown or the session changes.

use super::{History, Location, NavState, Navigation, Navigator, Route};
use crate::error::{ClientError, Result};
use crate::middleware::{
    require_auth, require_invitation_state, require_selected_wedding, GuardDecision,
};
use crate::models::PendingInvitation;
use crate::services::{ApiClient, WeddingSelection};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Redirects followed for a single render before giving up.
const MAX_REDIRECTS: usize = 8;

/// What ended up on screen.
#[derive(Clone)]
pub struct Screen {
    pub location: Location,
    /// Wedding state, present on protected routes only
    pub weddings: Option<Arc<WeddingSelection>>,
}

impl Screen {
    pub fn route(&self) -> &Route {
        &self.location.route
    }

    /// Invitations handed to this screen, if any.
    pub fn invitations(&self) -> Option<&[PendingInvitation]> {
        match &self.location.state {
            Some(NavState::Invitations(invitations)) => Some(invitations),
            _ => None,
        }
    }
}

enum Resolution {
    Render(Screen),
    Redirect(Navigation),
}

pub struct Router {
    api: ApiClient,
    history: Arc<History>,
    scope: Mutex<Option<Scope>>,
}

/// Wedding state together with the session it was loaded for.
struct Scope {
    epoch: u64,
    weddings: Arc<WeddingSelection>,
}

impl Router {
    pub fn new(api: ApiClient, history: Arc<History>) -> Self {
        Self {
            api,
            history,
            scope: Mutex::new(None),
        }
    }

    pub fn history(&self) -> &Arc<History> {
        &self.history
    }

    /// Navigate, then render wherever the guards let us land.
    pub async fn visit(&self, navigation: Navigation) -> Result<Screen> {
        self.history.navigate(navigation);
        self.render().await
    }

    /// Go back one entry and render it.
    pub async fn back(&self) -> Result<Screen> {
        self.history.back();
        self.render().await
    }

    /// Render the current history entry.
    ///
    /// Guard redirects replace the refused entry, and are followed until a
    /// route renders.
    pub async fn render(&self) -> Result<Screen> {
        for _ in 0..MAX_REDIRECTS {
            let location = self.history.current();
            match self.resolve(location).await {
                Resolution::Render(screen) => return Ok(screen),
                Resolution::Redirect(navigation) => self.history.navigate(navigation),
            }
        }

        Err(ClientError::RedirectLoop(self.history.current().route.path()))
    }

    /// The wedding state of the authenticated scope, if mounted.
    pub async fn weddings(&self) -> Option<Arc<WeddingSelection>> {
        self.scope
            .lock()
            .await
            .as_ref()
            .map(|scope| scope.weddings.clone())
    }

    async fn resolve(&self, location: Location) -> Resolution {
        let tokens = self.api.tokens();

        if !location.route.is_protected() {
            self.unmount_scope().await;
            return Resolution::Render(Screen {
                location,
                weddings: None,
            });
        }

        if let GuardDecision::Redirect(navigation) =
            require_auth(tokens.as_ref(), &location.route)
        {
            self.unmount_scope().await;
            return Resolution::Redirect(navigation);
        }

        let weddings = self.mount_scope().await;

        // Loading the weddings may have ended the session.
        if let GuardDecision::Redirect(navigation) =
            require_auth(tokens.as_ref(), &location.route)
        {
            self.unmount_scope().await;
            return Resolution::Redirect(navigation);
        }

        for decision in [
            require_selected_wedding(&location.route, &weddings),
            require_invitation_state(&location),
        ] {
            if let GuardDecision::Redirect(navigation) = decision {
                return Resolution::Redirect(navigation);
            }
        }

        Resolution::Render(Screen {
            location,
            weddings: Some(weddings),
        })
    }

    async fn mount_scope(&self) -> Arc<WeddingSelection> {
        let epoch = self.api.session_epoch();
        let weddings = {
            let mut scope = self.scope.lock().await;
            match scope.take() {
                Some(existing) if existing.epoch == epoch => {
                    let weddings = existing.weddings.clone();
                    *scope = Some(existing);
                    return weddings;
                }
                Some(stale) => {
                    tracing::debug!("Session changed, dropping previous wedding state");
                    stale.weddings.clear();
                    stale.weddings.unmount();
                }
                None => {}
            }
            let weddings = Arc::new(WeddingSelection::new(self.api.clone()));
            *scope = Some(Scope {
                epoch,
                weddings: weddings.clone(),
            });
            weddings
        };

        tracing::debug!("Entering authenticated scope");
        if let Err(e) = weddings.load_all().await {
            tracing::warn!(error = %e, "Failed to load weddings");
        }
        weddings
    }

    async fn unmount_scope(&self) {
        if let Some(scope) = self.scope.lock().await.take() {
            tracing::debug!("Leaving authenticated scope");
            scope.weddings.unmount();
        }
    }
}
