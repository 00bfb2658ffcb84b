// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory navigation history.

use super::{Location, Navigation, Route};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Something that can move the user to another location.
///
/// The session core only depends on this trait, so refresh failures and
/// logouts can force navigation without knowing about the router.
pub trait Navigator: Send + Sync {
    fn navigate(&self, navigation: Navigation);
}

struct Entries {
    stack: Vec<Location>,
    cursor: usize,
}

/// Browser-style history stack with push, replace and back.
pub struct History {
    entries: Mutex<Entries>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Landing)
    }
}

impl History {
    pub fn new(initial: Route) -> Self {
        Self {
            entries: Mutex::new(Entries {
                stack: vec![Location::new(initial)],
                cursor: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The location currently shown.
    pub fn current(&self) -> Location {
        let entries = self.lock();
        entries.stack[entries.cursor].clone()
    }

    /// Go one entry back. Returns `false` at the start of the history.
    pub fn back(&self) -> bool {
        let mut entries = self.lock();
        if entries.cursor == 0 {
            return false;
        }
        entries.cursor -= 1;
        true
    }

    /// Number of entries up to and including the current one.
    pub fn depth(&self) -> usize {
        self.lock().cursor + 1
    }
}

impl Navigator for History {
    fn navigate(&self, navigation: Navigation) {
        let mut entries = self.lock();
        let cursor = entries.cursor;

        tracing::debug!(
            to = %navigation.location.route.path(),
            replace = navigation.replace,
            "Navigating"
        );

        if navigation.replace {
            entries.stack[cursor] = navigation.location;
        } else {
            // Pushing discards any forward entries.
            entries.stack.truncate(cursor + 1);
            entries.stack.push(navigation.location);
            entries.cursor = cursor + 1;
        }
    }
}
