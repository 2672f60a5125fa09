// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Class registry and arity-dispatching constructors.
//!
//! This module provides [`ConstructorRegistry`] for registering factories by
//! class name and argument count, and [`Constructor`], the resolved
//! capability that dispatches on the number of arguments it is invoked with.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use arbor_style::Value;
use hashbrown::HashMap;

use crate::error::BuildError;

/// A factory creating an object from exactly as many arguments as its arity.
pub type Factory<O> = Arc<dyn Fn(&[Value]) -> O + Send + Sync>;

type Arities<O> = Arc<BTreeMap<usize, Factory<O>>>;

/// A resolved construction capability for one class.
///
/// A constructor can be invoked with any argument count that was registered
/// for its class; each count selects its own factory.
pub struct Constructor<O> {
    class: Arc<str>,
    factories: Arities<O>,
}

impl<O> Constructor<O> {
    /// Returns the class this constructor creates.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Returns the supported argument counts, ascending and deduplicated.
    pub fn arities(&self) -> impl Iterator<Item = usize> + '_ {
        self.factories.keys().copied()
    }

    /// Returns `true` if this constructor accepts `arity` arguments.
    #[must_use]
    pub fn supports(&self, arity: usize) -> bool {
        self.factories.contains_key(&arity)
    }

    /// Invokes the factory registered for `args.len()` arguments.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::ArityMismatch`] if no factory takes that many
    /// arguments.
    pub fn invoke(&self, args: &[Value]) -> Result<O, BuildError> {
        let factory = self
            .factories
            .get(&args.len())
            .ok_or_else(|| BuildError::ArityMismatch {
                class: self.class.to_string(),
                arity: args.len(),
                supported: self.arities().collect(),
            })?;
        Ok(factory(args))
    }
}

impl<O> Clone for Constructor<O> {
    fn clone(&self) -> Self {
        Self {
            class: Arc::clone(&self.class),
            factories: Arc::clone(&self.factories),
        }
    }
}

impl<O> fmt::Debug for Constructor<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("class", &self.class)
            .field("arities", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A registry of constructors keyed by class name.
///
/// Classes are registered once at startup, one factory per supported
/// argument count. Resolution fails immediately for unknown classes, so a
/// bad class reference is caught before any object is built.
///
/// # Example
///
/// ```rust
/// use arbor_build::ConstructorRegistry;
/// use arbor_style::Value;
///
/// let mut registry = ConstructorRegistry::new();
/// registry
///     .register("Label", 0, |_| String::new())
///     .register("Label", 1, |args: &[Value]| {
///         args[0].as_str().unwrap_or_default().to_owned()
///     });
///
/// let label = registry.resolve("Label").unwrap();
/// assert_eq!(label.arities().collect::<Vec<_>>(), [0, 1]);
/// assert_eq!(label.invoke(&[Value::from("hi")]).unwrap(), "hi");
/// assert!(label.invoke(&[Value::from(1_i64), Value::from(2_i64)]).is_err());
/// assert!(registry.resolve("Slider").is_err());
/// ```
pub struct ConstructorRegistry<O> {
    classes: HashMap<String, Arities<O>>,
}

impl<O> Default for ConstructorRegistry<O> {
    fn default() -> Self {
        Self {
            classes: HashMap::new(),
        }
    }
}

impl<O> ConstructorRegistry<O> {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` for `class` invoked with `arity` arguments.
    ///
    /// Only the argument count is distinguished: if `class` already has a
    /// factory for `arity`, the first registration is kept and this one is
    /// ignored.
    pub fn register<F>(&mut self, class: impl Into<String>, arity: usize, factory: F) -> &mut Self
    where
        F: Fn(&[Value]) -> O + Send + Sync + 'static,
    {
        let class = class.into();
        let arities = self.classes.entry(class.clone()).or_default();
        if arities.contains_key(&arity) {
            tracing::debug!(class = class.as_str(), arity, "ignoring duplicate constructor arity");
            return self;
        }
        Arc::make_mut(arities).insert(arity, Arc::new(factory));
        self
    }

    /// Returns `true` if `class` has at least one constructor.
    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    /// Returns the number of registered classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if no class is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Resolves `class` to its constructor.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::ClassNotFound`] if `class` is not registered.
    pub fn resolve(&self, class: &str) -> Result<Constructor<O>, BuildError> {
        let Some(factories) = self.classes.get(class) else {
            tracing::debug!(class, "unresolved class");
            return Err(BuildError::ClassNotFound {
                class: class.to_owned(),
            });
        };
        Ok(Constructor {
            class: Arc::from(class),
            factories: Arc::clone(factories),
        })
    }
}

impl<O> fmt::Debug for ConstructorRegistry<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.classes
                    .iter()
                    .map(|(class, arities)| (class, arities.keys().collect::<Vec<_>>())),
            )
            .finish()
    }
}
