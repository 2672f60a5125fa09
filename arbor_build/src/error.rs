// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while parsing descriptors or building trees.

use std::error::Error;

use arbor_style::StyleError;
use thiserror::Error;

/// Errors produced by parsing and building.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A descriptor named a class with no registered constructor.
    #[error("class `{class}` not found")]
    ClassNotFound {
        /// The unresolved class name.
        class: String,
    },
    /// A constructor was invoked with an unsupported number of arguments.
    #[error("class `{class}` has no constructor taking {arity} argument(s), supported: {supported:?}")]
    ArityMismatch {
        /// The class whose constructor was invoked.
        class: String,
        /// The number of arguments supplied.
        arity: usize,
        /// The arities the class supports, ascending.
        supported: Vec<usize>,
    },
    /// An instantiator failed to create an object.
    #[error("failed to instantiate `{class}`")]
    Instantiate {
        /// The class being instantiated.
        class: String,
        /// The underlying failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A node's inline style was malformed.
    #[error(transparent)]
    Style(#[from] StyleError),
}

impl BuildError {
    /// Wraps an instantiator failure for `class`.
    pub fn instantiate(
        class: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::Instantiate {
            class: class.into(),
            source: source.into(),
        }
    }
}
