// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborators that create objects and apply properties to them.
//!
//! The tree builder never allocates or attaches objects itself. An
//! [`Instantiator`] creates each object and attaches it to its parent; a
//! [`PropertyApplier`] applies the node's plain properties afterwards.
//! [`Toolkit`] bundles one of each.

use std::fmt;
use std::sync::Arc;

use arbor_state::StateHandle;
use arbor_style::StyleSpec;

use crate::constructor::Constructor;
use crate::error::BuildError;

/// Creates an object for one node and attaches it to its parent.
pub trait Instantiator<O> {
    /// Creates the object described by `style` with `constructor`.
    ///
    /// `parent` is the node's parent object (`None` for a root), and
    /// `parent_style` is the parent's effective style.
    fn instantiate(
        &self,
        constructor: &Constructor<O>,
        style: &StyleSpec,
        parent: Option<&O>,
        parent_style: Option<&StyleSpec>,
    ) -> Result<O, BuildError>;
}

impl<O, F> Instantiator<O> for F
where
    F: Fn(&Constructor<O>, &StyleSpec, Option<&O>, Option<&StyleSpec>) -> Result<O, BuildError>,
{
    #[inline]
    fn instantiate(
        &self,
        constructor: &Constructor<O>,
        style: &StyleSpec,
        parent: Option<&O>,
        parent_style: Option<&StyleSpec>,
    ) -> Result<O, BuildError> {
        self(constructor, style, parent, parent_style)
    }
}

/// Applies a node's plain properties to its object.
pub trait PropertyApplier<O> {
    /// Applies every property of [`StyleSpec::properties`] to `object`.
    fn apply(&self, style: &StyleSpec, state: &StateHandle<O>, object: &O);
}

impl<O, F> PropertyApplier<O> for F
where
    F: Fn(&StyleSpec, &StateHandle<O>, &O),
{
    #[inline]
    fn apply(&self, style: &StyleSpec, state: &StateHandle<O>, object: &O) {
        self(style, state, object);
    }
}

/// An [`Instantiator`] paired with a [`PropertyApplier`].
///
/// Cloning is cheap; every node compiled by one parser shares its toolkit.
pub struct Toolkit<O> {
    instantiator: Arc<dyn Instantiator<O> + Send + Sync>,
    applier: Arc<dyn PropertyApplier<O> + Send + Sync>,
}

impl<O> Toolkit<O> {
    /// Creates a toolkit from trait implementations.
    pub fn new<I, A>(instantiator: I, applier: A) -> Self
    where
        I: Instantiator<O> + Send + Sync + 'static,
        A: PropertyApplier<O> + Send + Sync + 'static,
    {
        Self {
            instantiator: Arc::new(instantiator),
            applier: Arc::new(applier),
        }
    }

    /// Creates a toolkit from closures.
    ///
    /// # Example
    ///
    /// ```rust
    /// use arbor_build::Toolkit;
    ///
    /// let toolkit: Toolkit<String> = Toolkit::from_fns(
    ///     |constructor, _style, _parent, _parent_style| constructor.invoke(&[]),
    ///     |_style, _state, _object| {},
    /// );
    /// # let _ = toolkit;
    /// ```
    pub fn from_fns<I, A>(instantiate: I, apply: A) -> Self
    where
        I: Fn(&Constructor<O>, &StyleSpec, Option<&O>, Option<&StyleSpec>) -> Result<O, BuildError>
            + Send
            + Sync
            + 'static,
        A: Fn(&StyleSpec, &StateHandle<O>, &O) + Send + Sync + 'static,
    {
        Self::new(instantiate, apply)
    }

    pub(crate) fn instantiate(
        &self,
        constructor: &Constructor<O>,
        style: &StyleSpec,
        parent: Option<&O>,
        parent_style: Option<&StyleSpec>,
    ) -> Result<O, BuildError> {
        self.instantiator
            .instantiate(constructor, style, parent, parent_style)
    }

    pub(crate) fn apply(&self, style: &StyleSpec, state: &StateHandle<O>, object: &O) {
        self.applier.apply(style, state, object);
    }
}

impl<O> Clone for Toolkit<O> {
    fn clone(&self) -> Self {
        Self {
            instantiator: Arc::clone(&self.instantiator),
            applier: Arc::clone(&self.applier),
        }
    }
}

impl<O> fmt::Debug for Toolkit<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolkit").finish_non_exhaustive()
    }
}
