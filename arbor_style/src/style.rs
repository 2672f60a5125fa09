// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property maps and per-node style specifications.
//!
//! This module provides [`Style`], an insertion-ordered map from property
//! name to [`Value`], and [`StyleSpec`], a [`Style`] paired with the special
//! properties (`*class`, `*id`, `*groups`) that the tree builder consumes
//! itself rather than forwarding to property application.

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::error::StyleError;
use crate::value::Value;

/// Reserved key naming a node's identifier.
pub const ID_KEY: &str = "*id";
/// Reserved key naming a node's group memberships.
pub const GROUPS_KEY: &str = "*groups";
/// Reserved key naming a node's class. Injected by the parser.
pub const CLASS_KEY: &str = "*class";

/// Returns `true` if `name` is one of the reserved special keys.
#[must_use]
pub fn is_special(name: &str) -> bool {
    matches!(name, ID_KEY | GROUPS_KEY | CLASS_KEY)
}

/// An insertion-ordered collection of property setters.
///
/// Setting a property that is already present replaces its value but keeps
/// its original position.
///
/// # Example
///
/// ```rust
/// use arbor_style::Style;
///
/// let style = Style::new()
///     .with("color", "red")
///     .with("size", 10_i64)
///     .with("color", "blue");
///
/// assert_eq!(style.len(), 2);
/// assert_eq!(style.get_as::<&str>("color"), Some(&"blue"));
/// assert_eq!(style.names().collect::<Vec<_>>(), ["color", "size"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Style {
    entries: IndexMap<String, Value>,
}

impl Style {
    /// Creates a new empty style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property and returns the style, for chaining.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a property, returning the previous value if there was one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(name.into(), value.into())
    }

    /// Gets the value for a property, if set.
    #[must_use]
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Gets the value for a property downcast to `T`.
    ///
    /// Returns `None` if the property is unset or holds another type.
    #[must_use]
    pub fn get_as<T: 'static>(&self, name: &str) -> Option<&T> {
        self.get(name).and_then(Value::downcast_ref)
    }

    /// Returns `true` if this style has a value for the property.
    #[must_use]
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Removes a property, preserving the order of the remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries.shift_remove(name)
    }

    /// Returns the number of property setters.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if this style has no property setters.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns an iterator over property names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Overlays `other` on top of `self`: every property of `other` is set
    /// on `self`, replacing existing values.
    pub fn overlay(&mut self, other: &Self) {
        for (name, value) in &other.entries {
            self.entries.insert(name.clone(), value.clone());
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Style
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut style = Self::new();
        for (name, value) in iter {
            style.set(name, value);
        }
        style
    }
}

/// A node's style: plain properties plus the special properties.
///
/// [`StyleSpec::properties`] never contains reserved keys, so it can be
/// handed to property application as is. [`StyleSpec::get`] and
/// [`StyleSpec::to_flat`] expose the specials alongside the properties.
#[derive(Clone, Debug, Default)]
pub struct StyleSpec {
    class: Option<String>,
    id: Option<String>,
    groups: SmallVec<[String; 2]>,
    properties: Style,
}

impl StyleSpec {
    /// Creates an empty spec with no class, id, groups, or properties.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a spec from raw properties and an injected class.
    ///
    /// `*id` and `*groups` are moved out of `raw` into their dedicated fields.
    /// A user-supplied `*class` is discarded in favor of `class`.
    ///
    /// `*id` accepts a `String` or `&'static str`. `*groups` accepts a
    /// `Vec<String>`, a `Vec<&'static str>`, or a single string.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::InvalidSpecial`] if a special holds a value of
    /// another type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use arbor_style::{Style, StyleSpec};
    ///
    /// let raw = Style::new()
    ///     .with("*id", "ok")
    ///     .with("*groups", vec!["btns"])
    ///     .with("text", "OK");
    /// let spec = StyleSpec::from_properties(raw, "Button").unwrap();
    ///
    /// assert_eq!(spec.class(), Some("Button"));
    /// assert_eq!(spec.id(), Some("ok"));
    /// assert_eq!(spec.groups(), ["btns"]);
    /// assert!(!spec.properties().contains("*id"));
    /// ```
    pub fn from_properties(mut raw: Style, class: impl Into<String>) -> Result<Self, StyleError> {
        let id = raw.remove(ID_KEY).map(|v| parse_id(&v)).transpose()?;
        let groups = match raw.remove(GROUPS_KEY) {
            Some(v) => parse_groups(&v)?,
            None => SmallVec::new(),
        };
        raw.remove(CLASS_KEY);
        Ok(Self {
            class: Some(class.into()),
            id,
            groups,
            properties: raw,
        })
    }

    /// Sets the class and returns the spec, for chaining.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Sets the identifier and returns the spec, for chaining.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Replaces the group memberships and returns the spec, for chaining.
    #[must_use]
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Sets a property and returns the spec, for chaining.
    ///
    /// Reserved keys go to their dedicated fields, as with
    /// [`StyleSpec::from_properties`]. A reserved key holding a value of the
    /// wrong type is ignored.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        if !is_special(&name) {
            self.properties.set(name, value);
            return self;
        }
        let routed = match name.as_str() {
            ID_KEY => parse_id(&value).map(|id| self.id = Some(id)),
            GROUPS_KEY => parse_groups(&value).map(|groups| self.groups = groups),
            _ => parse_class(&value).map(|class| self.class = Some(class)),
        };
        if let Err(err) = routed {
            tracing::debug!(%err, "ignoring malformed special property");
        }
        self
    }

    /// Returns the node's class, if known.
    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// Returns the node's identifier, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the node's group memberships in declaration order.
    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Returns the plain properties, without any special keys.
    #[must_use]
    pub fn properties(&self) -> &Style {
        &self.properties
    }

    /// Looks up a property by name, including the special keys.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            CLASS_KEY => self.class.clone().map(Value::from),
            ID_KEY => self.id.clone().map(Value::from),
            GROUPS_KEY if !self.groups.is_empty() => Some(Value::new(self.groups.to_vec())),
            GROUPS_KEY => None,
            _ => self.properties.get(name).cloned(),
        }
    }

    /// Returns a flat property map that includes the specials.
    ///
    /// Specials come first (`*class`, `*id`, `*groups`), followed by the
    /// plain properties in insertion order. `*groups` is a `Vec<String>`.
    #[must_use]
    pub fn to_flat(&self) -> Style {
        let mut flat = Style::new();
        for key in [CLASS_KEY, ID_KEY, GROUPS_KEY] {
            if let Some(value) = self.get(key) {
                flat.set(key, value);
            }
        }
        flat.overlay(&self.properties);
        flat
    }

    pub(crate) fn with_properties(&self, properties: Style) -> Self {
        Self {
            class: self.class.clone(),
            id: self.id.clone(),
            groups: self.groups.clone(),
            properties,
        }
    }
}

fn parse_id(value: &Value) -> Result<String, StyleError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or(StyleError::InvalidSpecial {
            key: ID_KEY,
            expected: "a string",
            found: value.type_name(),
        })
}

fn parse_class(value: &Value) -> Result<String, StyleError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or(StyleError::InvalidSpecial {
            key: CLASS_KEY,
            expected: "a string",
            found: value.type_name(),
        })
}

fn parse_groups(value: &Value) -> Result<SmallVec<[String; 2]>, StyleError> {
    if let Some(groups) = value.downcast_ref::<Vec<String>>() {
        return Ok(groups.iter().cloned().collect());
    }
    if let Some(groups) = value.downcast_ref::<Vec<&'static str>>() {
        return Ok(groups.iter().map(|g| (*g).to_owned()).collect());
    }
    if let Some(group) = value.as_str() {
        return Ok(SmallVec::from_iter([group.to_owned()]));
    }
    Err(StyleError::InvalidSpecial {
        key: GROUPS_KEY,
        expected: "a string or a list of strings",
        found: value.type_name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_replace_keeps_position() {
        let style = Style::new()
            .with("a", 1_i64)
            .with("b", 2_i64)
            .with("a", 3_i64);

        assert_eq!(style.len(), 2);
        assert_eq!(style.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(style.get_as::<i64>("a"), Some(&3));
    }

    #[test]
    fn style_overlay_other_wins() {
        let mut base = Style::new().with("color", "red").with("size", 10_i64);
        let top = Style::new().with("color", "blue").with("weight", "bold");
        base.overlay(&top);

        assert_eq!(base.get_as::<&str>("color"), Some(&"blue"));
        assert_eq!(base.get_as::<i64>("size"), Some(&10));
        assert_eq!(base.names().collect::<Vec<_>>(), ["color", "size", "weight"]);
    }

    #[test]
    fn style_remove_preserves_order() {
        let mut style: Style = [("a", 1_i64), ("b", 2), ("c", 3)].into_iter().collect();
        assert!(style.remove("b").is_some());
        assert_eq!(style.names().collect::<Vec<_>>(), ["a", "c"]);
        assert!(style.remove("b").is_none());
    }

    #[test]
    fn from_properties_peels_specials() {
        let raw = Style::new()
            .with(ID_KEY, String::from("b1"))
            .with(GROUPS_KEY, vec![String::from("row"), String::from("btns")])
            .with(CLASS_KEY, "Spoofed")
            .with("text", "Go");
        let spec = StyleSpec::from_properties(raw, "Button").unwrap();

        assert_eq!(spec.class(), Some("Button"));
        assert_eq!(spec.id(), Some("b1"));
        assert_eq!(spec.groups(), ["row", "btns"]);
        assert_eq!(spec.properties().names().collect::<Vec<_>>(), ["text"]);
    }

    #[test]
    fn from_properties_accepts_single_group() {
        let raw = Style::new().with(GROUPS_KEY, "row");
        let spec = StyleSpec::from_properties(raw, "Label").unwrap();
        assert_eq!(spec.groups(), ["row"]);
        assert_eq!(spec.id(), None);
    }

    #[test]
    fn from_properties_rejects_bad_specials() {
        let err = StyleSpec::from_properties(Style::new().with(ID_KEY, 7_i64), "Button")
            .unwrap_err();
        assert!(
            matches!(err, StyleError::InvalidSpecial { key: ID_KEY, .. }),
            "unexpected error: {err:?}"
        );

        let err = StyleSpec::from_properties(Style::new().with(GROUPS_KEY, true), "Button")
            .unwrap_err();
        assert!(
            matches!(err, StyleError::InvalidSpecial { key: GROUPS_KEY, .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn get_and_flat_include_specials() {
        let spec = StyleSpec::new()
            .with_class("Button")
            .with_id("ok")
            .with_groups(["btns"])
            .with_property("text", "OK");

        let id = spec.get(ID_KEY).expect("id is set");
        assert_eq!(id.as_str(), Some("ok"));
        assert_eq!(
            spec.get(GROUPS_KEY)
                .and_then(|v| v.downcast_ref::<Vec<String>>().cloned()),
            Some(vec![String::from("btns")])
        );

        let flat = spec.to_flat();
        assert_eq!(
            flat.names().collect::<Vec<_>>(),
            [CLASS_KEY, ID_KEY, GROUPS_KEY, "text"]
        );
        assert!(!spec.properties().names().any(is_special));
    }

    #[test]
    fn with_property_routes_reserved_keys() {
        let spec = StyleSpec::new()
            .with_property(CLASS_KEY, "Button")
            .with_property(ID_KEY, "ok")
            .with_property(GROUPS_KEY, vec!["btns", "row"])
            .with_property("text", "OK");

        assert_eq!(spec.class(), Some("Button"));
        assert_eq!(spec.id(), Some("ok"));
        assert_eq!(spec.groups(), ["btns", "row"]);
        assert_eq!(spec.properties().names().collect::<Vec<_>>(), ["text"]);
    }

    #[test]
    fn with_property_ignores_malformed_reserved_keys() {
        let spec = StyleSpec::new()
            .with_id("kept")
            .with_property(ID_KEY, 3_i64)
            .with_property(GROUPS_KEY, true);

        assert_eq!(spec.id(), Some("kept"));
        assert!(spec.groups().is_empty());
        assert!(spec.properties().is_empty());
    }

    #[test]
    fn empty_groups_are_absent() {
        let spec = StyleSpec::new().with_class("Panel");
        assert!(spec.get(GROUPS_KEY).is_none());
        assert!(spec.get(ID_KEY).is_none());
        assert_eq!(spec.to_flat().len(), 1);
    }
}
