// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while building style specifications.

use thiserror::Error;

/// Errors produced by [`StyleSpec::from_properties`](crate::StyleSpec::from_properties).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StyleError {
    /// A reserved key held a value of the wrong type.
    #[error("special property `{key}` must be {expected}, found `{found}`")]
    InvalidSpecial {
        /// The reserved key, e.g. `*id`.
        key: &'static str,
        /// Human-readable description of the accepted types.
        expected: &'static str,
        /// Type name of the rejected value.
        found: &'static str,
    },
}
