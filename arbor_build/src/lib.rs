// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Build: declarative construction of object trees.
//!
//! A tree is described once as a [`Descriptor`]: a class name, inline
//! properties, and children. A [`Parser`] compiles the descriptor into a
//! [`TreeBuilder`], resolving every class against a [`ConstructorRegistry`]
//! up front. The compiled builder can then be invoked any number of times.
//!
//! **Descriptor → (parse) → `TreeBuilder` → (build) → objects + shared state**
//!
//! ## Building
//!
//! Each invocation takes [`BuildOptions`]: an optional shared state, parent
//! object, parent style, and ambient stylesheets. For every node the builder
//! resolves the effective style, creates the object through the
//! [`Toolkit`]'s [`Instantiator`], applies the plain properties through its
//! [`PropertyApplier`], and registers the object's id, groups, and root claim
//! in the shared [`arbor_state::StateHandle`]. Children are built in order
//! with the new object as their parent.
//!
//! The builder itself never allocates or attaches objects. Those decisions
//! belong to the toolkit, which makes the engine independent of any
//! particular object model.
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use arbor_build::{BuildOptions, ConstructorRegistry, Descriptor, Parser, Toolkit};
//!
//! #[derive(Debug, Default)]
//! struct Widget {
//!     class: String,
//!     children: Mutex<Vec<Arc<Widget>>>,
//! }
//!
//! let mut registry = ConstructorRegistry::new();
//! for class in ["Window", "Button"] {
//!     registry.register(class, 0, move |_| {
//!         Arc::new(Widget { class: class.into(), ..Widget::default() })
//!     });
//! }
//!
//! let toolkit = Toolkit::from_fns(
//!     |constructor, _style, parent: Option<&Arc<Widget>>, _parent_style| {
//!         let widget = constructor.invoke(&[])?;
//!         if let Some(parent) = parent {
//!             parent.children.lock().unwrap().push(widget.clone());
//!         }
//!         Ok(widget)
//!     },
//!     |_style, _state, _widget| {},
//! );
//!
//! let parser = Parser::new(registry, toolkit);
//! let builder = parser
//!     .parse(&Descriptor::new("Window").child(Descriptor::new("Button").id("b1").groups(["row"])))
//!     .unwrap();
//!
//! let state = builder.build(BuildOptions::new()).unwrap().read();
//! let window = state.root().unwrap();
//! let button = state.id("b1").unwrap();
//! assert_eq!(window.class, "Window");
//! assert!(Arc::ptr_eq(&window.children.lock().unwrap()[0], button));
//! assert_eq!(state.group("row").len(), 1);
//! ```

mod builder;
mod constructor;
mod descriptor;
mod error;
mod options;
mod toolkit;

pub use builder::{Build, Child, ChildGenerator, SharedBuild, TreeBuilder, flatten_children};
pub use constructor::{Constructor, ConstructorRegistry, Factory};
pub use descriptor::{Descriptor, DescriptorChild, Parser};
pub use error::BuildError;
pub use options::BuildOptions;
pub use toolkit::{Instantiator, PropertyApplier, Toolkit};
