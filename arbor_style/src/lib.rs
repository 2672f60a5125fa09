// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Style: stylesheets and style cascading for arbor object trees.
//!
//! Every node in an arbor tree carries an inline [`StyleSpec`]: a set of
//! plain properties plus the *special* properties the tree builder consumes
//! itself (`*class`, `*id`, `*groups`). Ambient [`StyleSheet`]s supply
//! defaults selected by class, identifier, or group; the node's own
//! properties always win.
//!
//! **Stylesheet rules (by specificity, sheet, rule order) → inline properties**
//!
//! ## Core Concepts
//!
//! ### Values and styles
//!
//! [`Value`] is a cheaply clonable, type-erased property value. [`Style`]
//! is an insertion-ordered map from property name to [`Value`].
//!
//! ```rust
//! use arbor_style::Style;
//!
//! let style = Style::new().with("text", "OK").with("width", 80_i64);
//! assert_eq!(style.get_as::<i64>("width"), Some(&80));
//! ```
//!
//! ### Specials
//!
//! [`StyleSpec::from_properties`] moves the reserved keys [`ID_KEY`] and
//! [`GROUPS_KEY`] out of a raw [`Style`] and records the injected class.
//! [`StyleSpec::properties`] therefore never contains a reserved key and can
//! be forwarded to property application directly.
//!
//! ### Stylesheets and cascade
//!
//! ```rust
//! use arbor_style::{Selector, Style, StyleSheetBuilder, StyleSpec, resolve_style};
//!
//! let sheet = StyleSheetBuilder::new()
//!     .rule(Selector::class("Button"), Style::new().with("color", "red").with("size", 10_i64))
//!     .build();
//!
//! let raw = Style::new().with("*id", "ok").with("color", "blue");
//! let inline = StyleSpec::from_properties(raw, "Button").unwrap();
//!
//! let effective = resolve_style(&inline, &[sheet]);
//! assert_eq!(effective.properties().get_as::<&str>("color"), Some(&"blue"));
//! assert_eq!(effective.properties().get_as::<i64>("size"), Some(&10));
//! assert_eq!(effective.id(), Some("ok"));
//! ```

mod error;
mod resolve;
mod selector;
mod style;
mod stylesheet;
mod value;

pub use error::StyleError;
pub use resolve::{cascade, resolve_style};
pub use selector::{IdSet, Selector, SelectorInputs, Specificity};
pub use style::{CLASS_KEY, GROUPS_KEY, ID_KEY, Style, StyleSpec, is_special};
pub use stylesheet::{StyleRule, StyleSheet, StyleSheetBuilder, reduce};
pub use value::Value;
