// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative tree descriptors and their compilation into builders.
//!
//! A [`Descriptor`] names a class, optionally carries inline properties, and
//! lists children. [`Parser::parse`] compiles a descriptor once into a
//! [`TreeBuilder`], which can then be built any number of times.

use std::fmt;
use std::sync::Arc;

use arbor_style::{GROUPS_KEY, ID_KEY, Style, StyleSpec, Value};

use crate::builder::{Build, Child, ChildGenerator, SharedBuild, TreeBuilder};
use crate::constructor::ConstructorRegistry;
use crate::error::BuildError;
use crate::toolkit::Toolkit;

/// A child entry in a [`Descriptor`].
pub enum DescriptorChild<O> {
    /// A nested node, compiled along with its parent.
    Node(Descriptor<O>),
    /// A pre-built builder, passed through unchanged.
    Builder(SharedBuild<O>),
    /// A nested collection of children, flattened in order when built.
    Many(Vec<DescriptorChild<O>>),
    /// Children generated each time the parent is built.
    Dynamic(ChildGenerator<O>),
}

impl<O> From<Descriptor<O>> for DescriptorChild<O> {
    fn from(descriptor: Descriptor<O>) -> Self {
        Self::Node(descriptor)
    }
}

impl<O> Clone for DescriptorChild<O> {
    fn clone(&self) -> Self {
        match self {
            Self::Node(node) => Self::Node(node.clone()),
            Self::Builder(builder) => Self::Builder(Arc::clone(builder)),
            Self::Many(children) => Self::Many(children.clone()),
            Self::Dynamic(generator) => Self::Dynamic(Arc::clone(generator)),
        }
    }
}

impl<O> fmt::Debug for DescriptorChild<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Self::Builder(_) => f.write_str("Builder"),
            Self::Many(children) => f.debug_tuple("Many").field(children).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic"),
        }
    }
}

/// A declarative description of one node and its children.
///
/// # Example
///
/// ```rust
/// use arbor_build::Descriptor;
///
/// let tree: Descriptor<u32> = Descriptor::new("Window")
///     .property("title", "Demo")
///     .child(
///         Descriptor::new("Button")
///             .id("b1")
///             .groups(["row"])
///             .property("text", "OK"),
///     );
///
/// assert_eq!(tree.class(), "Window");
/// assert_eq!(tree.child_count(), 1);
/// ```
pub struct Descriptor<O> {
    class: String,
    style: Option<Style>,
    children: Vec<DescriptorChild<O>>,
}

impl<O> Descriptor<O> {
    /// Creates a descriptor for `class` with no style and no children.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            style: None,
            children: Vec::new(),
        }
    }

    /// Sets the inline style, replacing any properties set so far.
    ///
    /// `style` may contain the reserved keys `*id` and `*groups`.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    /// Sets one inline property.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.style.get_or_insert_with(Style::new).set(name, value);
        self
    }

    /// Sets the node's identifier (`*id`).
    #[must_use]
    pub fn id(self, id: impl Into<String>) -> Self {
        self.property(ID_KEY, id.into())
    }

    /// Sets the node's group memberships (`*groups`).
    #[must_use]
    pub fn groups<I, S>(self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let groups: Vec<String> = groups.into_iter().map(Into::into).collect();
        self.property(GROUPS_KEY, groups)
    }

    /// Appends a child.
    #[must_use]
    pub fn child(mut self, child: impl Into<DescriptorChild<O>>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Appends a nested collection of children, kept together in order.
    #[must_use]
    pub fn children<I, C>(self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<DescriptorChild<O>>,
    {
        let many = children.into_iter().map(Into::into).collect();
        self.child(DescriptorChild::Many(many))
    }

    /// Appends a pre-built builder.
    #[must_use]
    pub fn builder(self, builder: impl Build<O> + Send + Sync + 'static) -> Self {
        self.child(DescriptorChild::Builder(Arc::new(builder)))
    }

    /// Appends a generator producing children each time this node is built.
    #[must_use]
    pub fn dynamic<F>(self, generator: F) -> Self
    where
        F: Fn() -> Vec<Child<O>> + Send + Sync + 'static,
    {
        self.child(DescriptorChild::Dynamic(Arc::new(generator)))
    }

    /// Returns the class name.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Returns `true` if the descriptor carries inline properties.
    #[must_use]
    pub fn has_style(&self) -> bool {
        self.style.is_some()
    }

    /// Returns the number of direct children, counting a nested collection
    /// as one.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

impl<O> Clone for Descriptor<O> {
    fn clone(&self) -> Self {
        Self {
            class: self.class.clone(),
            style: self.style.clone(),
            children: self.children.clone(),
        }
    }
}

impl<O> fmt::Debug for Descriptor<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("class", &self.class)
            .field("style", &self.style)
            .field("children", &self.children)
            .finish()
    }
}

/// Compiles [`Descriptor`]s into [`TreeBuilder`]s.
///
/// Parsing happens once per tree shape. Every class in the tree is resolved
/// up front, so a single unknown class fails the whole parse and nothing
/// is ever built from it.
pub struct Parser<O> {
    registry: ConstructorRegistry<O>,
    toolkit: Toolkit<O>,
}

impl<O> Parser<O> {
    /// Creates a parser resolving classes in `registry` and building with
    /// `toolkit`.
    pub fn new(registry: ConstructorRegistry<O>, toolkit: Toolkit<O>) -> Self {
        Self { registry, toolkit }
    }

    /// Returns the constructor registry.
    #[must_use]
    pub fn registry(&self) -> &ConstructorRegistry<O> {
        &self.registry
    }

    /// Returns the toolkit shared by every compiled node.
    #[must_use]
    pub fn toolkit(&self) -> &Toolkit<O> {
        &self.toolkit
    }
}

impl<O: Clone + 'static> Parser<O> {
    /// Compiles `descriptor` and all nested node descriptors.
    ///
    /// The inline style becomes a [`StyleSpec`] with the node's class
    /// injected. Pre-built builders and generators are passed through.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::ClassNotFound`] for the first unregistered
    /// class and [`BuildError::Style`] for a malformed `*id` or `*groups`.
    pub fn parse(&self, descriptor: &Descriptor<O>) -> Result<TreeBuilder<O>, BuildError> {
        let constructor = self.registry.resolve(&descriptor.class)?;
        let raw = descriptor.style.clone().unwrap_or_default();
        let style = StyleSpec::from_properties(raw, descriptor.class.as_str())?;
        let children = descriptor
            .children
            .iter()
            .map(|child| self.parse_child(child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TreeBuilder::new(
            constructor,
            style,
            self.toolkit.clone(),
            children,
        ))
    }

    fn parse_child(&self, child: &DescriptorChild<O>) -> Result<Child<O>, BuildError> {
        Ok(match child {
            DescriptorChild::Node(node) => Child::from(self.parse(node)?),
            DescriptorChild::Builder(builder) => Child::Builder(Arc::clone(builder)),
            DescriptorChild::Many(children) => Child::Many(
                children
                    .iter()
                    .map(|child| self.parse_child(child))
                    .collect::<Result<_, _>>()?,
            ),
            DescriptorChild::Dynamic(generator) => Child::Dynamic(Arc::clone(generator)),
        })
    }
}

impl<O> fmt::Debug for Parser<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
