/// Image load state machine
///
/// This is the heart of the widget: given a target source it decides whether
/// the image is already available, starts a fetch otherwise, and resolves the
/// asynchronous outcome into a status transition. Completions are bound to
/// the exact source string they were started for, so a slow fetch that has
/// been superseded can never overwrite a newer one's result.

use std::sync::Arc;

use super::status::{LoadState, LoadStatus};
use crate::load::{ImageFetcher, LoadError};

/// Callback invoked once per status transition, after the state update
pub type StatusCallback = Box<dyn Fn(LoadStatus)>;

/// Drives one slot's `LoadState` through its transitions.
pub struct LoadMachine {
    state: LoadState,
    images: Arc<dyn ImageFetcher>,
    on_changes: Option<StatusCallback>,
}

impl LoadMachine {
    pub fn new(images: Arc<dyn ImageFetcher>, on_changes: Option<StatusCallback>) -> Self {
        LoadMachine {
            state: LoadState::new(),
            images,
            on_changes,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn status(&self) -> LoadStatus {
        self.state.status
    }

    /// Begin loading `src`.
    ///
    /// Returns the source the caller must fetch asynchronously, or `None`
    /// when no fetch is needed: the source probed as already available, or it
    /// was empty.
    ///
    /// An empty `src` while nothing was ever requested keeps the slot at
    /// `Mounted`; an empty `src` after a real source clears the image with an
    /// immediate `Loaded` transition, the way platforms report degenerate
    /// sources as complete.
    pub fn begin(&mut self, src: &str) -> Option<String> {
        if src.is_empty() {
            if !self.state.next.is_empty() {
                self.apply(LoadStatus::Loaded, Some(String::new()));
            }
            return None;
        }

        // check if the image is already in memory
        if self.images.is_ready(src) {
            self.apply(LoadStatus::Loaded, Some(src.to_string()));
            return None;
        }

        self.apply(LoadStatus::Busy, Some(src.to_string()));
        Some(src.to_string())
    }

    /// Resolve the outcome of an asynchronous fetch for `src`.
    ///
    /// Only honored while the slot is still busy with that exact source;
    /// stale completions (the source was superseded) and duplicates are
    /// no-ops.
    pub fn finish(&mut self, src: &str, outcome: Result<(), LoadError>) {
        if self.state.status != LoadStatus::Busy || self.state.next != src {
            return;
        }

        match outcome {
            Ok(()) => self.apply(LoadStatus::Loaded, None),
            Err(_) => self.apply(LoadStatus::Failed, None),
        }
    }

    /// Apply a transition and notify.
    ///
    /// `prev` only moves when the requested source actually changes, keeping
    /// it exactly one source-change old. Transitions that change neither
    /// status nor source are no-ops and do not notify.
    fn apply(&mut self, status: LoadStatus, next: Option<String>) {
        let next_changed = matches!(&next, Some(n) if *n != self.state.next);

        if status == self.state.status && !next_changed {
            return;
        }

        if next_changed {
            if let Some(n) = next {
                self.state.prev = std::mem::replace(&mut self.state.next, n);
            }
        }

        self.state.status = status;

        if let Some(on_changes) = self.on_changes.as_ref() {
            on_changes(status);
        }
    }
}

impl std::fmt::Debug for LoadMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadMachine")
            .field("state", &self.state)
            .finish()
    }
}
