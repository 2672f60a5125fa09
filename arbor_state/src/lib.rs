// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor State: the shared registry built up while constructing trees.
//!
//! Every node constructed by an arbor tree builder contributes a small
//! *delta* to one [`SharedState`]: its identifier, its group memberships, and
//! a claim on the root. Deltas are combined by [`merge`], which is the only
//! way state changes:
//!
//! - `ids`: the later registration for an identifier wins.
//! - `groups`: membership is additive; members accumulate in encounter order.
//! - `root`: the first established root is permanent.
//! - custom keys: plain last-write-wins.
//!
//! [`StateHandle`] shares one state between many construction calls, possibly
//! on different threads. Updates go through a compare-and-swap loop over an
//! [`arc_swap::ArcSwap`], so concurrent writers never lose each other's
//! contributions and readers never observe a partially applied delta.
//!
//! ```rust
//! use arbor_state::{SharedState, StateHandle};
//!
//! let handle = StateHandle::new();
//! handle.merge(&SharedState::delta::<&str>(None, &[], "window"));
//! handle.merge(&SharedState::delta(Some("b1"), &["row"], "button"));
//!
//! let state = handle.read();
//! assert_eq!(state.root(), Some(&"window"));
//! assert_eq!(state.id("b1"), Some(&"button"));
//! assert_eq!(state.group("row"), ["button"]);
//! ```

mod handle;
mod state;

pub use handle::StateHandle;
pub use state::{SharedState, merge};
