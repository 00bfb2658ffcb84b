// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Accessible weddings and the active selection.
//!
//! One `WeddingSelection` lives for the duration of the authenticated part of
//! the app. The selected wedding is always derived from the current list, so
//! after a reload it either points at fresh data or at nothing.

use super::api::{paths, ApiClient};
use crate::error::Result;
use crate::models::{NewWedding, Wedding, WeddingId};
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Minimal view of the `POST /weddings` response.
#[derive(Deserialize)]
struct CreatedWedding {
    wedding_id: WeddingId,
}

pub struct WeddingSelection {
    api: ApiClient,
    weddings: RwLock<Vec<Wedding>>,
    selected: RwLock<Option<WeddingId>>,
    loading: AtomicBool,
    /// Bumped by every load and by unmount; a load only commits if it is
    /// still the latest one.
    generation: AtomicU64,
    mounted: AtomicBool,
}

impl WeddingSelection {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            weddings: RwLock::new(Vec::new()),
            selected: RwLock::new(None),
            loading: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            mounted: AtomicBool::new(true),
        }
    }

    /// Fetch the accessible weddings and replace the list wholesale.
    ///
    /// A response that arrives after unmount, or after a newer load started,
    /// is dropped without touching state.
    pub async fn load_all(&self) -> Result<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.loading.store(true, Ordering::SeqCst);

        let result = self.api.get::<Vec<Wedding>>(paths::WEDDINGS).await;

        if !self.is_current(generation) {
            tracing::debug!("Discarding superseded wedding list");
            return result.map(|_| ());
        }
        self.loading.store(false, Ordering::SeqCst);

        let weddings = result?;
        tracing::debug!(count = weddings.len(), "Weddings loaded");
        *self.weddings.write().unwrap_or_else(PoisonError::into_inner) = weddings;
        Ok(())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.mounted.load(Ordering::SeqCst) && self.generation.load(Ordering::SeqCst) == generation
    }

    /// Make the wedding with this id active.
    ///
    /// Pure lookup: an id missing from the list leaves nothing selected
    /// rather than keeping the previous wedding.
    pub fn select_by_id(&self, id: &WeddingId) -> Option<Wedding> {
        let found = self
            .weddings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|wedding| wedding.wedding_id == *id)
            .cloned();

        if found.is_none() {
            tracing::debug!(wedding_id = %id, "Selected wedding not in list");
        }

        *self.selected.write().unwrap_or_else(PoisonError::into_inner) =
            found.as_ref().map(|wedding| wedding.wedding_id.clone());
        found
    }

    pub fn clear(&self) {
        *self.selected.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// The active wedding, resolved against the current list.
    pub fn selected(&self) -> Option<Wedding> {
        let selected = self.selected.read().unwrap_or_else(PoisonError::into_inner);
        let id = selected.as_ref()?;
        self.weddings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|wedding| wedding.wedding_id == *id)
            .cloned()
    }

    /// Whether the user may edit the active wedding.
    pub fn can_edit(&self) -> bool {
        self.selected().is_some_and(|wedding| wedding.can_edit())
    }

    pub fn weddings(&self) -> Vec<Wedding> {
        self.weddings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Leave the authenticated scope. Loads still in flight are discarded.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.loading.store(false, Ordering::SeqCst);
    }

    /// Create a wedding, reload the list and select the new wedding.
    pub async fn create(&self, wedding: &NewWedding) -> Result<Option<Wedding>> {
        let created: CreatedWedding = self.api.post(paths::WEDDINGS, wedding).await?;
        tracing::info!(wedding_id = %created.wedding_id, "Wedding created");

        self.load_all().await?;
        Ok(self.select_by_id(&created.wedding_id))
    }

    #[cfg(test)]
    fn replace_all(&self, weddings: Vec<Wedding>) {
        *self.weddings.write().unwrap_or_else(PoisonError::into_inner) = weddings;
    }
}
