// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selector inputs and selector predicates for style matching.
//!
//! Selectors are single-node predicates over a [`SelectorInputs`] snapshot:
//! a node's class, identifier, and group memberships. There are no
//! combinators.

use std::borrow::Borrow;
use std::cmp::Ordering;

/// Bucketed selector specificity: `(ids, groups, class)`.
///
/// The fields are ordered highest-weight-first so that derived `Ord`
/// gives lexicographic ordering: an identifier requirement outranks any
/// number of group requirements, which outrank a class requirement.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity(pub u32, pub u32, pub u32);

/// An owned, sorted, deduplicated set.
///
/// Membership is O(log n), subset checks are O(n+m) via merge walk.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IdSet<T>(Box<[T]>);

impl<T> Default for IdSet<T> {
    fn default() -> Self {
        Self(Vec::new().into_boxed_slice())
    }
}

impl<T: Ord> IdSet<T> {
    /// Constructs a set from an iterator, sorting and deduplicating.
    #[must_use]
    pub fn from_ids(iter: impl IntoIterator<Item = T>) -> Self {
        let mut ids: Vec<T> = iter.into_iter().collect();
        ids.sort();
        ids.dedup();
        Self(ids.into_boxed_slice())
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of entries in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the set as a sorted slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Returns `true` if this set is a subset of `other`.
    ///
    /// `other` must be sorted and deduplicated.
    #[must_use]
    pub fn is_subset_of_slice<Q>(&self, other: &[&Q]) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut j = 0;
        for needle in self.0.iter() {
            loop {
                let Some(candidate) = other.get(j) else {
                    return false;
                };
                j += 1;
                match <T as Borrow<Q>>::borrow(needle).cmp(*candidate) {
                    Ordering::Equal => break,
                    Ordering::Less => return false,
                    Ordering::Greater => {}
                }
            }
        }
        true
    }
}

impl<T: Ord> FromIterator<T> for IdSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_ids(iter)
    }
}

/// A borrowed snapshot of selector inputs for a single node.
///
/// The `groups` slice must be sorted and deduplicated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SelectorInputs<'a> {
    /// The node's class, if known.
    pub class: Option<&'a str>,
    /// The node's identifier, if any.
    pub id: Option<&'a str>,
    /// Sorted, unique group names.
    pub groups: &'a [&'a str],
}

impl SelectorInputs<'static> {
    /// Empty selector inputs (no class, id, or groups).
    pub const EMPTY: Self = Self {
        class: None,
        id: None,
        groups: &[],
    };
}

impl<'a> SelectorInputs<'a> {
    /// Constructs selector inputs from borrowed parts.
    ///
    /// # Panics (debug only)
    ///
    /// Panics in debug builds if `groups` is not sorted and deduplicated.
    #[must_use]
    pub fn new(class: Option<&'a str>, id: Option<&'a str>, groups: &'a [&'a str]) -> Self {
        debug_assert!(
            groups.windows(2).all(|w| w[0] < w[1]),
            "`groups` must be sorted and unique"
        );
        Self { class, id, groups }
    }
}

/// A selector predicate over [`SelectorInputs`].
///
/// Every requirement that is present must hold; the default selector has
/// none and matches every node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    /// Required class.
    pub class: Option<String>,
    /// Required identifier.
    pub id: Option<String>,
    /// Required group memberships.
    pub groups: IdSet<String>,
}

impl Selector {
    /// A selector matching every node.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// A selector matching nodes of the given class.
    #[must_use]
    pub fn class(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            ..Self::default()
        }
    }

    /// A selector matching the node with the given identifier.
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// A selector matching members of the given group.
    #[must_use]
    pub fn group(group: impl Into<String>) -> Self {
        Self {
            groups: IdSet::from_ids([group.into()]),
            ..Self::default()
        }
    }

    /// Adds a group requirement.
    #[must_use]
    pub fn and_group(self, group: impl Into<String>) -> Self {
        let groups = self
            .groups
            .as_slice()
            .iter()
            .cloned()
            .chain([group.into()])
            .collect();
        Self { groups, ..self }
    }

    /// Returns `true` if this selector matches the given inputs.
    #[must_use]
    pub fn matches(&self, inputs: &SelectorInputs<'_>) -> bool {
        if let Some(required) = &self.class
            && inputs.class != Some(required.as_str())
        {
            return false;
        }
        if let Some(required) = &self.id
            && inputs.id != Some(required.as_str())
        {
            return false;
        }
        self.groups.is_subset_of_slice::<str>(inputs.groups)
    }

    /// Returns a bucketed specificity score.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        let ids = u32::from(self.id.is_some());
        let groups = u32::try_from(self.groups.len()).unwrap_or(u32::MAX);
        let class = u32::from(self.class.is_some());
        Specificity(ids, groups, class)
    }
}
