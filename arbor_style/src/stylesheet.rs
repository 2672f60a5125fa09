// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rule-based style selection.
//!
//! A [`StyleSheet`] is a collection of [`StyleRule`]s. Each rule combines a
//! [`Selector`] predicate and a [`Style`] payload (property setters).
//! [`reduce`] folds every matching rule of an ordered list of sheets into a
//! single fragment.

use std::sync::Arc;

use crate::selector::{Selector, SelectorInputs, Specificity};
use crate::style::Style;

/// A single rule in a [`StyleSheet`].
#[derive(Clone, Debug)]
pub struct StyleRule {
    selector: Selector,
    style: Style,
    order: u32,
}

impl StyleRule {
    /// Returns the selector.
    #[must_use]
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Returns the rule's style payload.
    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }
}

#[derive(Debug, Default)]
struct StyleSheetData {
    rules: Vec<StyleRule>,
}

/// A collection of style rules.
///
/// `StyleSheet` is immutable after creation and cheap to clone. Use
/// [`StyleSheetBuilder`] to construct instances.
#[derive(Clone, Debug, Default)]
pub struct StyleSheet {
    inner: Arc<StyleSheetData>,
}

impl StyleSheet {
    /// Returns the number of rules in this sheet.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.rules.len()
    }

    /// Returns `true` if this sheet has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.rules.is_empty()
    }

    /// Returns an iterator over rules in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = &StyleRule> + '_ {
        self.inner.rules.iter()
    }

    /// Returns an iterator over the rules matching `inputs`.
    pub fn matching<'s>(
        &'s self,
        inputs: &'s SelectorInputs<'_>,
    ) -> impl Iterator<Item = &'s StyleRule> + 's {
        self.rules().filter(|rule| rule.selector.matches(inputs))
    }
}

/// Builder for constructing [`StyleSheet`] instances.
///
/// # Example
///
/// ```rust
/// use arbor_style::{Selector, Style, StyleSheetBuilder};
///
/// let sheet = StyleSheetBuilder::new()
///     .rule(Selector::class("Button"), Style::new().with("color", "red"))
///     .rule(Selector::id("ok"), Style::new().with("color", "green"))
///     .build();
///
/// assert_eq!(sheet.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct StyleSheetBuilder {
    rules: Vec<StyleRule>,
    next_order: u32,
}

impl StyleSheetBuilder {
    /// Creates a new empty stylesheet builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the sheet.
    #[must_use]
    pub fn rule(mut self, selector: Selector, style: Style) -> Self {
        let order = self.next_order;
        self.next_order = self.next_order.saturating_add(1);
        self.rules.push(StyleRule {
            selector,
            style,
            order,
        });
        self
    }

    /// Builds the stylesheet.
    #[must_use]
    pub fn build(self) -> StyleSheet {
        StyleSheet {
            inner: Arc::new(StyleSheetData { rules: self.rules }),
        }
    }
}

/// Combines every rule matching `inputs`, across all `sheets`, into one
/// fragment.
///
/// Matching rules are applied in ascending
/// `(specificity, sheet index, rule order)`, each overlaying the ones before
/// it, so a more specific selector wins, then a later sheet, then a later
/// rule.
///
/// Returns `None` if `sheets` is empty or no rule matches.
#[must_use]
pub fn reduce(sheets: &[StyleSheet], inputs: &SelectorInputs<'_>) -> Option<Style> {
    type Key = (Specificity, usize, u32);
    let mut matched: Vec<(Key, &Style)> = sheets
        .iter()
        .enumerate()
        .flat_map(|(sheet_index, sheet)| {
            sheet.matching(inputs).map(move |rule| {
                (
                    (rule.selector.specificity(), sheet_index, rule.order),
                    &rule.style,
                )
            })
        })
        .collect();

    if matched.is_empty() {
        return None;
    }
    matched.sort_by_key(|(key, _)| *key);

    let mut fragment = Style::new();
    for (_, style) in matched {
        fragment.overlay(style);
    }
    Some(fragment)
}
