// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Effective style resolution.
//!
//! Stylesheet rules provide defaults; a node's inline properties override
//! them. [`resolve_style`] runs the whole chain for one node.

use smallvec::SmallVec;

use crate::selector::SelectorInputs;
use crate::style::{Style, StyleSpec, is_special};
use crate::stylesheet::{StyleSheet, reduce};

/// Overlays `inline` on top of a stylesheet `fragment`.
///
/// The result starts from the fragment's properties; every inline property
/// replaces the fragment's value for the same name. Specials are taken from
/// `inline`; reserved keys in `fragment` are dropped.
///
/// # Example
///
/// ```rust
/// use arbor_style::{Style, StyleSpec, cascade};
///
/// let fragment = Style::new().with("color", "red").with("size", 10_i64);
/// let inline = StyleSpec::new().with_property("color", "blue");
///
/// let effective = cascade(&fragment, &inline);
/// assert_eq!(effective.properties().get_as::<&str>("color"), Some(&"blue"));
/// assert_eq!(effective.properties().get_as::<i64>("size"), Some(&10));
/// ```
#[must_use]
pub fn cascade(fragment: &Style, inline: &StyleSpec) -> StyleSpec {
    let mut properties: Style = fragment
        .iter()
        .filter(|(name, _)| !is_special(name))
        .map(|(name, value)| (name, value.clone()))
        .collect();
    properties.overlay(inline.properties());
    inline.with_properties(properties)
}

/// Resolves a node's effective style against the ambient stylesheets.
///
/// The node's class, identifier, and groups select rules from `sheets`
/// (see [`reduce`]). If any rule matched, the result is
/// [`cascade`]`(fragment, inline)`; otherwise it is `inline` unchanged.
///
/// # Example
///
/// ```rust
/// use arbor_style::{Selector, Style, StyleSheetBuilder, StyleSpec, resolve_style};
///
/// let sheet = StyleSheetBuilder::new()
///     .rule(Selector::group("btns"), Style::new().with("width", 80_i64))
///     .build();
/// let inline = StyleSpec::new()
///     .with_class("Button")
///     .with_groups(["btns"])
///     .with_property("text", "OK");
///
/// let effective = resolve_style(&inline, &[sheet]);
/// assert_eq!(effective.properties().get_as::<i64>("width"), Some(&80));
/// assert_eq!(effective.groups(), ["btns"]);
/// ```
#[must_use]
pub fn resolve_style(inline: &StyleSpec, sheets: &[StyleSheet]) -> StyleSpec {
    if sheets.is_empty() {
        return inline.clone();
    }

    let mut groups: SmallVec<[&str; 4]> = inline.groups().iter().map(String::as_str).collect();
    groups.sort_unstable();
    groups.dedup();
    let inputs = SelectorInputs::new(inline.class(), inline.id(), &groups);

    match reduce(sheets, &inputs) {
        Some(fragment) => {
            tracing::trace!(
                class = inline.class(),
                id = inline.id(),
                properties = fragment.len(),
                "cascading stylesheet fragment"
            );
            cascade(&fragment, inline)
        }
        None => inline.clone(),
    }
}
