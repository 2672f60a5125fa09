// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased property values.
//!
//! This module provides [`Value`] for storing style property values of any
//! type in a heterogeneous, insertion-ordered [`Style`](crate::Style).

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A type-erased, shareable property value.
///
/// This wraps a value of any `Send + Sync + 'static` type behind an [`Arc`],
/// keeping its type information for later downcasting. Cloning is cheap and
/// never clones the underlying value.
///
/// # Example
///
/// ```rust
/// use arbor_style::Value;
///
/// let value = Value::new(42_i64);
/// assert!(value.is::<i64>());
/// assert_eq!(value.downcast_ref::<i64>(), Some(&42));
///
/// let text = Value::from("hello");
/// assert_eq!(text.as_str(), Some("hello"));
/// ```
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl Value {
    /// Creates a new value from a concrete value.
    #[must_use]
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`] of the contained value.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the type name of the contained value, for diagnostics.
    #[must_use]
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the contained value is of type `T`.
    #[must_use]
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Attempts to downcast to a reference of type `T`.
    ///
    /// Returns `None` if the contained value is not of type `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    /// Returns the value as a string slice if it holds a `String` or a
    /// `&'static str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        if let Some(s) = self.downcast_ref::<String>() {
            return Some(s);
        }
        self.downcast_ref::<&'static str>().copied()
    }

    /// Returns `true` if both values share the same allocation.
    #[must_use]
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(s) = self.as_str() {
            return write!(f, "Value({s:?})");
        }
        f.debug_struct("Value")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl From<&'static str> for Value {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::new(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Self::new(value)
    }
}

impl From<Vec<&'static str>> for Value {
    fn from(value: Vec<&'static str>) -> Self {
        Self::new(value)
    }
}
