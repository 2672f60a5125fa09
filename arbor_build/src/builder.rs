// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compiled tree builders and their execution.

use std::fmt;
use std::sync::Arc;

use arbor_state::{SharedState, StateHandle};
use arbor_style::{StyleSpec, resolve_style};

use crate::constructor::Constructor;
use crate::error::BuildError;
use crate::options::BuildOptions;
use crate::toolkit::Toolkit;

/// Something that builds a (sub)tree into a shared state.
///
/// [`TreeBuilder`] is the compiled form of a descriptor node. Closures with
/// the same signature act as opaque pre-built sub-builders.
pub trait Build<O> {
    /// Builds into `options.gui` (or a fresh state) and returns the state.
    fn build(&self, options: BuildOptions<O>) -> Result<StateHandle<O>, BuildError>;
}

impl<O, F> Build<O> for F
where
    F: Fn(BuildOptions<O>) -> Result<StateHandle<O>, BuildError>,
{
    #[inline]
    fn build(&self, options: BuildOptions<O>) -> Result<StateHandle<O>, BuildError> {
        self(options)
    }
}

/// A shared, type-erased [`Build`] implementation.
pub type SharedBuild<O> = Arc<dyn Build<O> + Send + Sync>;

/// A generator producing children anew on every invocation.
pub type ChildGenerator<O> = Arc<dyn Fn() -> Vec<Child<O>> + Send + Sync>;

/// A compiled child of a tree node.
pub enum Child<O> {
    /// A single builder.
    Builder(SharedBuild<O>),
    /// A nested collection, flattened in order.
    Many(Vec<Child<O>>),
    /// Children generated when the parent is built.
    Dynamic(ChildGenerator<O>),
}

impl<O> Child<O> {
    /// Wraps a builder.
    pub fn builder(builder: impl Build<O> + Send + Sync + 'static) -> Self {
        Self::Builder(Arc::new(builder))
    }

    /// Wraps a nested collection of children.
    pub fn many(children: impl IntoIterator<Item = Self>) -> Self {
        Self::Many(children.into_iter().collect())
    }

    /// Wraps a generator run on every invocation of the parent.
    pub fn dynamic<F>(generator: F) -> Self
    where
        F: Fn() -> Vec<Self> + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(generator))
    }
}

impl<O> Clone for Child<O> {
    fn clone(&self) -> Self {
        match self {
            Self::Builder(builder) => Self::Builder(Arc::clone(builder)),
            Self::Many(children) => Self::Many(children.clone()),
            Self::Dynamic(generator) => Self::Dynamic(Arc::clone(generator)),
        }
    }
}

impl<O> fmt::Debug for Child<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builder(_) => f.write_str("Builder"),
            Self::Many(children) => f.debug_tuple("Many").field(children).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic"),
        }
    }
}

impl<O: Clone + 'static> From<TreeBuilder<O>> for Child<O> {
    fn from(builder: TreeBuilder<O>) -> Self {
        Self::Builder(Arc::new(builder))
    }
}

/// Flattens `children` depth-first into one ordered sequence of builders.
///
/// Nested collections are spliced in place and generators are run, so the
/// result reflects the children of this particular invocation.
#[must_use]
pub fn flatten_children<O>(children: &[Child<O>]) -> Vec<SharedBuild<O>> {
    fn walk<O>(children: &[Child<O>], out: &mut Vec<SharedBuild<O>>) {
        for child in children {
            match child {
                Child::Builder(builder) => out.push(Arc::clone(builder)),
                Child::Many(nested) => walk(nested, out),
                Child::Dynamic(generator) => walk(&generator(), out),
            }
        }
    }

    let mut out = Vec::with_capacity(children.len());
    walk(children, &mut out);
    out
}

struct Node<O> {
    constructor: Constructor<O>,
    style: StyleSpec,
    toolkit: Toolkit<O>,
    children: Vec<Child<O>>,
}

/// A compiled tree node, ready to be built any number of times.
///
/// Building a node:
///
/// 1. uses `options.gui`, or creates an empty state;
/// 2. resolves the effective style from the inline style and
///    `options.stylesheets`;
/// 3. picks the parent: `options.parent`, or else the state's current root;
/// 4. creates the object through the toolkit's instantiator;
/// 5. applies the plain properties through the toolkit's applier;
/// 6. merges `{ids, groups, root}` for the new object into the state;
/// 7. builds every flattened child with the same state and stylesheets,
///    the new object as parent, and this node's effective style as
///    parent style;
/// 8. returns the state.
pub struct TreeBuilder<O> {
    inner: Arc<Node<O>>,
}

impl<O> TreeBuilder<O> {
    /// Assembles a node from already-compiled parts.
    ///
    /// Most callers get builders from [`Parser::parse`](crate::Parser::parse).
    pub fn new(
        constructor: Constructor<O>,
        style: StyleSpec,
        toolkit: Toolkit<O>,
        children: Vec<Child<O>>,
    ) -> Self {
        Self {
            inner: Arc::new(Node {
                constructor,
                style,
                toolkit,
                children,
            }),
        }
    }

    /// Returns the class this node constructs.
    #[must_use]
    pub fn class(&self) -> &str {
        self.inner.constructor.class()
    }

    /// Returns the node's inline style, including its specials.
    #[must_use]
    pub fn style(&self) -> &StyleSpec {
        &self.inner.style
    }

    /// Returns the node's compiled children.
    #[must_use]
    pub fn children(&self) -> &[Child<O>] {
        &self.inner.children
    }
}

impl<O: Clone> TreeBuilder<O> {
    /// Builds this node and its subtree.
    ///
    /// # Errors
    ///
    /// Propagates the first error from an instantiator or a child; objects
    /// built before the failure stay registered in the state.
    pub fn build(&self, options: BuildOptions<O>) -> Result<StateHandle<O>, BuildError> {
        let node = &*self.inner;
        let span = tracing::debug_span!("build", class = node.constructor.class());
        let _enter = span.enter();

        let BuildOptions {
            gui,
            parent,
            parent_style,
            stylesheets,
        } = options;
        let gui = gui.unwrap_or_default();

        let style = resolve_style(&node.style, &stylesheets);
        let parent = parent.or_else(|| gui.read().root().cloned());

        let object = node.toolkit.instantiate(
            &node.constructor,
            &style,
            parent.as_ref(),
            parent_style.as_ref(),
        )?;
        node.toolkit.apply(&style, &gui, &object);
        gui.merge(&SharedState::delta(
            style.id(),
            style.groups(),
            object.clone(),
        ));

        let children = flatten_children(&node.children);
        tracing::debug!(
            id = style.id(),
            children = children.len(),
            "constructed node"
        );
        for child in children {
            let options = BuildOptions::new()
                .gui(gui.clone())
                .parent(object.clone())
                .parent_style(style.clone())
                .stylesheets(stylesheets.iter().cloned());
            child.build(options)?;
        }
        Ok(gui)
    }
}

impl<O: Clone> Build<O> for TreeBuilder<O> {
    fn build(&self, options: BuildOptions<O>) -> Result<StateHandle<O>, BuildError> {
        Self::build(self, options)
    }
}

impl<O> Clone for TreeBuilder<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O> fmt::Debug for TreeBuilder<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("class", &self.class())
            .field("style", &self.inner.style)
            .field("children", &self.inner.children)
            .finish_non_exhaustive()
    }
}
