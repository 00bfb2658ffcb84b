// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Mariage: session core of the wedding planning client
//!
//! This crate keeps a user signed in against the planning backend: it stores
//! the access token, renews it transparently when the backend rejects it,
//! guards protected pages, tracks which wedding is being worked on and
//! carries invitations from login to acceptance.

pub mod config;
pub mod error;
pub mod format;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use config::Config;
use error::Result;
use routes::{History, Navigator, Router};
use services::{ApiClient, AuthService};
use std::sync::Arc;
use store::TokenStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub tokens: Arc<dyn TokenStore>,
    pub history: Arc<History>,
    pub api: ApiClient,
    pub auth: AuthService,
    pub router: Router,
}

impl AppState {
    /// Wire up a client over the given token store, starting at the landing
    /// page.
    pub fn new(config: Config, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let history = Arc::new(History::default());
        let navigator: Arc<dyn Navigator> = history.clone();
        let api = ApiClient::new(&config, tokens.clone(), navigator)?;

        Ok(Self {
            config,
            tokens,
            history: history.clone(),
            auth: AuthService::new(api.clone()),
            router: Router::new(api.clone(), history),
            api,
        })
    }
}
