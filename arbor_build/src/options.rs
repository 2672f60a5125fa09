// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-invocation build options.

use arbor_state::StateHandle;
use arbor_style::{StyleSheet, StyleSpec};

/// Options for one invocation of a tree builder. Every field is optional.
///
/// - `gui`: the shared state to register into. A fresh, empty state is
///   created when absent.
/// - `parent`: the object to attach the node to. When absent, the node
///   attaches to the shared state's current root, if any.
/// - `parent_style`: the parent's effective style, passed to the
///   instantiator.
/// - `stylesheets`: ambient stylesheets, in precedence order.
///
/// Setting `gui`, `parent`, or `parent_style` twice keeps the last value.
/// Stylesheets accumulate in the order they are supplied.
///
/// # Example
///
/// ```rust
/// use arbor_build::BuildOptions;
/// use arbor_state::StateHandle;
/// use arbor_style::StyleSheetBuilder;
///
/// let state = StateHandle::new();
/// let options = BuildOptions::new()
///     .gui(state.clone())
///     .parent("window")
///     .stylesheet(StyleSheetBuilder::new().build())
///     .stylesheets([StyleSheetBuilder::new().build()]);
///
/// assert_eq!(options.stylesheets_ref().len(), 2);
/// assert_eq!(options.parent_ref(), Some(&"window"));
/// ```
#[derive(Clone, Debug)]
pub struct BuildOptions<O> {
    pub(crate) gui: Option<StateHandle<O>>,
    pub(crate) parent: Option<O>,
    pub(crate) parent_style: Option<StyleSpec>,
    pub(crate) stylesheets: Vec<StyleSheet>,
}

impl<O> Default for BuildOptions<O> {
    fn default() -> Self {
        Self {
            gui: None,
            parent: None,
            parent_style: None,
            stylesheets: Vec::new(),
        }
    }
}

impl<O> BuildOptions<O> {
    /// Creates options with every field absent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the shared state, replacing any previously set state.
    #[must_use]
    pub fn gui(mut self, gui: StateHandle<O>) -> Self {
        self.gui = Some(gui);
        self
    }

    /// Sets the parent object, replacing any previously set parent.
    #[must_use]
    pub fn parent(mut self, parent: O) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets or clears the parent object.
    ///
    /// `None` means "no explicit parent": the node falls back to the root.
    #[must_use]
    pub fn maybe_parent(mut self, parent: Option<O>) -> Self {
        self.parent = parent;
        self
    }

    /// Sets the parent's effective style, replacing any previous value.
    #[must_use]
    pub fn parent_style(mut self, style: StyleSpec) -> Self {
        self.parent_style = Some(style);
        self
    }

    /// Appends one stylesheet.
    #[must_use]
    pub fn stylesheet(mut self, sheet: StyleSheet) -> Self {
        self.stylesheets.push(sheet);
        self
    }

    /// Appends several stylesheets, preserving their order.
    #[must_use]
    pub fn stylesheets(mut self, sheets: impl IntoIterator<Item = StyleSheet>) -> Self {
        self.stylesheets.extend(sheets);
        self
    }

    /// Returns the shared state, if set.
    #[must_use]
    pub fn gui_ref(&self) -> Option<&StateHandle<O>> {
        self.gui.as_ref()
    }

    /// Returns the explicit parent, if set.
    #[must_use]
    pub fn parent_ref(&self) -> Option<&O> {
        self.parent.as_ref()
    }

    /// Returns the parent's effective style, if set.
    #[must_use]
    pub fn parent_style_ref(&self) -> Option<&StyleSpec> {
        self.parent_style.as_ref()
    }

    /// Returns the accumulated stylesheets.
    #[must_use]
    pub fn stylesheets_ref(&self) -> &[StyleSheet] {
        &self.stylesheets
    }
}
