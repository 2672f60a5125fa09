// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Atomic shared-state handle.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::state::SharedState;

/// A shared, atomically updated [`SharedState`].
///
/// Cloning a handle shares the underlying state. Readers get an immutable
/// snapshot; writers publish a replacement with compare-and-swap and retry
/// from the latest snapshot when another writer got there first, so no
/// concurrent contribution is lost.
///
/// # Example
///
/// ```rust
/// use arbor_state::{SharedState, StateHandle};
///
/// let handle = StateHandle::new();
/// let other = handle.clone();
///
/// other.merge(&SharedState::delta(Some("ok"), &["btns"], 1_u32));
/// handle.merge(&SharedState::delta::<&str>(None, &[], 2_u32));
///
/// let state = handle.read();
/// assert_eq!(state.id("ok"), Some(&1));
/// assert_eq!(state.root(), Some(&1));
/// ```
pub struct StateHandle<O> {
    inner: Arc<ArcSwap<SharedState<O>>>,
}

impl<O> StateHandle<O> {
    /// Creates a handle over an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::from_state(SharedState::new())
    }

    /// Creates a handle over `state`.
    #[must_use]
    pub fn from_state(state: SharedState<O>) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(state)),
        }
    }

    /// Returns the current snapshot.
    ///
    /// The snapshot is immutable; later updates publish new snapshots and
    /// do not affect it.
    #[must_use]
    pub fn read(&self) -> Arc<SharedState<O>> {
        self.inner.load_full()
    }

    /// Replaces the state with `f(current)` atomically.
    ///
    /// If another writer publishes first, `f` is re-run against the newer
    /// state, so it may be called more than once and should be free of side
    /// effects. Returns the snapshot that was replaced.
    pub fn update<F>(&self, mut f: F) -> Arc<SharedState<O>>
    where
        F: FnMut(&SharedState<O>) -> SharedState<O>,
    {
        self.inner.rcu(|current| f(&**current))
    }

    /// Returns `true` if both handles share the same state.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<O: Clone> StateHandle<O> {
    /// Merges `delta` into the state with [`SharedState::merge`].
    ///
    /// Each merge copies the current snapshot, so its cost grows with the
    /// size of the state: building a tree of `n` nodes into one handle is
    /// quadratic in `n`. Readers holding an earlier snapshot are unaffected.
    pub fn merge(&self, delta: &SharedState<O>) {
        let previous = self.update(|current| current.merge(delta));
        tracing::trace!(
            ids = delta.ids().count(),
            groups = delta.group_names().count(),
            had_root = previous.root().is_some(),
            "merged state delta"
        );
    }
}

impl<O> Clone for StateHandle<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O> Default for StateHandle<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: fmt::Debug> fmt::Debug for StateHandle<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateHandle").field(&self.read()).finish()
    }
}
