// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared state snapshots and the merge rules between them.

use hashbrown::HashMap;

use arbor_style::Value;

/// A snapshot of the registries built up while constructing a tree.
///
/// `O` is the caller's object handle type; it is stored and related but
/// never inspected.
///
/// - `ids`: identifier → object.
/// - `groups`: group name → members, in registration order.
/// - `root`: the first object ever registered as root.
/// - `custom`: caller-defined application state.
///
/// Snapshots are combined with [`SharedState::merge`].
#[derive(Clone, Debug)]
pub struct SharedState<O> {
    ids: HashMap<String, O>,
    groups: HashMap<String, Vec<O>>,
    root: Option<O>,
    custom: HashMap<String, Value>,
}

impl<O> Default for SharedState<O> {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            groups: HashMap::new(),
            root: None,
            custom: HashMap::new(),
        }
    }
}

impl<O> SharedState<O> {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the object registered under `id`.
    #[must_use]
    pub fn id(&self, id: &str) -> Option<&O> {
        self.ids.get(id)
    }

    /// Returns an iterator over all `(id, object)` registrations.
    pub fn ids(&self) -> impl Iterator<Item = (&str, &O)> + '_ {
        self.ids.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the members of `group` in registration order.
    ///
    /// Unknown groups are empty.
    #[must_use]
    pub fn group(&self, group: &str) -> &[O] {
        self.groups.get(group).map_or(&[], Vec::as_slice)
    }

    /// Returns an iterator over the names of all non-empty groups.
    pub fn group_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.keys().map(String::as_str)
    }

    /// Returns the root object, if one has been established.
    #[must_use]
    pub fn root(&self) -> Option<&O> {
        self.root.as_ref()
    }

    /// Returns a caller-defined value.
    #[must_use]
    pub fn custom(&self, key: &str) -> Option<&Value> {
        self.custom.get(key)
    }

    /// Returns a caller-defined value downcast to `T`.
    #[must_use]
    pub fn custom_as<T: 'static>(&self, key: &str) -> Option<&T> {
        self.custom(key).and_then(Value::downcast_ref)
    }

    /// Returns `true` if no id, group, root, or custom key is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.groups.is_empty() && self.root.is_none() && self.custom.is_empty()
    }

    /// Registers `object` under `id`, replacing any previous registration.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>, object: O) -> Self {
        self.ids.insert(id.into(), object);
        self
    }

    /// Appends `object` to `group`.
    #[must_use]
    pub fn with_group_member(mut self, group: impl Into<String>, object: O) -> Self {
        self.groups.entry(group.into()).or_default().push(object);
        self
    }

    /// Sets the root, replacing any previous root in this snapshot.
    #[must_use]
    pub fn with_root(mut self, root: O) -> Self {
        self.root = Some(root);
        self
    }

    /// Sets a caller-defined value.
    #[must_use]
    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }
}

impl<O: Clone> SharedState<O> {
    /// Builds the delta recorded for one constructed node.
    ///
    /// The delta registers `object` under `id` (if any), as the sole member
    /// of each of `groups`, and as root. Merging it into a state that already
    /// has a root leaves that root in place.
    #[must_use]
    pub fn delta<S: AsRef<str>>(id: Option<&str>, groups: &[S], object: O) -> Self {
        let mut delta = Self::new();
        if let Some(id) = id {
            delta.ids.insert(id.to_owned(), object.clone());
        }
        for group in groups {
            delta
                .groups
                .insert(group.as_ref().to_owned(), vec![object.clone()]);
        }
        delta.root = Some(object);
        delta
    }

    /// Combines `self` (older) with `newer`.
    ///
    /// - `ids`: union, `newer` wins per key.
    /// - `groups`: per key, `self`'s members followed by `newer`'s.
    /// - `root`: `self`'s root if present, otherwise `newer`'s.
    /// - custom keys: union, `newer` wins per key.
    ///
    /// # Example
    ///
    /// ```rust
    /// use arbor_state::SharedState;
    ///
    /// let old = SharedState::new().with_root("window").with_group_member("row", "a");
    /// let new = SharedState::new().with_root("button").with_group_member("row", "b");
    ///
    /// let merged = old.merge(&new);
    /// assert_eq!(merged.root(), Some(&"window"));
    /// assert_eq!(merged.group("row"), ["a", "b"]);
    /// ```
    #[must_use]
    pub fn merge(&self, newer: &Self) -> Self {
        let mut merged = self.clone();
        for (id, object) in &newer.ids {
            merged.ids.insert(id.clone(), object.clone());
        }
        for (group, members) in &newer.groups {
            merged
                .groups
                .entry(group.clone())
                .or_default()
                .extend(members.iter().cloned());
        }
        if merged.root.is_none() {
            merged.root.clone_from(&newer.root);
        }
        for (key, value) in &newer.custom {
            merged.custom.insert(key.clone(), value.clone());
        }
        merged
    }
}

/// Combines two snapshots; see [`SharedState::merge`].
#[must_use]
pub fn merge<O: Clone>(old: &SharedState<O>, new: &SharedState<O>) -> SharedState<O> {
    old.merge(new)
}
