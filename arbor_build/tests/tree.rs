// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tests: descriptors are parsed and built against a small mock
//! widget toolkit.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use arbor_build::{
    BuildError, BuildOptions, Child, ConstructorRegistry, Descriptor, Parser, Toolkit,
};
use arbor_state::{SharedState, StateHandle};
use arbor_style::{Selector, Style, StyleSheet, StyleSheetBuilder, StyleSpec, Value};

#[derive(Debug, Default)]
struct Widget {
    class: String,
    args: usize,
    parent_style: Mutex<Option<StyleSpec>>,
    properties: Mutex<Style>,
    children: Mutex<Vec<W>>,
}

type W = Arc<Widget>;

impl Widget {
    fn prop<T: Clone + 'static>(&self, name: &str) -> Option<T> {
        self.properties.lock().unwrap().get_as::<T>(name).cloned()
    }

    fn children(&self) -> Vec<W> {
        self.children.lock().unwrap().clone()
    }

    fn texts(&self) -> Vec<&'static str> {
        self.children()
            .iter()
            .map(|child| child.prop::<&'static str>("text").unwrap())
            .collect()
    }
}

const ARGS: &str = "args";
const FAIL: &str = "fail";

struct Fixture {
    parser: Parser<W>,
    created: Arc<AtomicUsize>,
}

fn fixture() -> Fixture {
    let mut registry = ConstructorRegistry::new();
    for class in ["Window", "Panel", "Button", "Label"] {
        registry.register(class, 0, move |_| widget(class, 0));
    }
    registry
        .register("Point", 0, |_| widget("Point", 0))
        .register("Point", 2, |args: &[Value]| widget("Point", args.len()));

    let created = Arc::new(AtomicUsize::new(0));
    let counter = created.clone();
    let toolkit = Toolkit::from_fns(
        move |constructor, style: &StyleSpec, parent: Option<&W>, parent_style| {
            if style.properties().contains(FAIL) {
                return Err(BuildError::instantiate(
                    constructor.class(),
                    "refused by toolkit",
                ));
            }
            let args = style
                .properties()
                .get_as::<Vec<Value>>(ARGS)
                .cloned()
                .unwrap_or_default();
            let object = constructor.invoke(&args)?;
            counter.fetch_add(1, Ordering::SeqCst);
            *object.parent_style.lock().unwrap() = parent_style.cloned();
            if let Some(parent) = parent {
                parent.children.lock().unwrap().push(object.clone());
            }
            Ok(object)
        },
        |style: &StyleSpec, _state: &StateHandle<W>, object: &W| {
            let mut properties = object.properties.lock().unwrap();
            for (name, value) in style.properties().iter() {
                if name != ARGS {
                    properties.set(name, value.clone());
                }
            }
        },
    );

    Fixture {
        parser: Parser::new(registry, toolkit),
        created,
    }
}

fn widget(class: &str, args: usize) -> W {
    Arc::new(Widget {
        class: class.to_owned(),
        args,
        ..Widget::default()
    })
}

fn label(text: &'static str) -> Descriptor<W> {
    Descriptor::new("Label").property("text", text)
}

#[test]
fn window_with_identified_button() {
    let f = fixture();
    let tree = Descriptor::new("Window").child(
        Descriptor::new("Button")
            .id("b1")
            .groups(["row"])
            .property("text", "OK"),
    );

    let state = f
        .parser
        .parse(&tree)
        .unwrap()
        .build(BuildOptions::new())
        .unwrap()
        .read();

    let window = state.root().unwrap();
    let button = state.id("b1").unwrap();
    assert_eq!(window.class, "Window");
    assert_eq!(button.class, "Button");
    assert_eq!(state.group("row").len(), 1);
    assert!(Arc::ptr_eq(&state.group("row")[0], button));
    assert!(Arc::ptr_eq(&window.children()[0], button));
    assert_eq!(button.prop::<&str>("text"), Some("OK"));
    assert_eq!(button.prop::<String>("*id"), None, "specials are not applied");
}

#[test]
fn ids_and_groups_register_into_given_state() {
    let f = fixture();
    let state = StateHandle::new();
    let tree = Descriptor::new("Panel").children([
        Descriptor::new("Button").id("ok").groups(["btns"]),
        Descriptor::new("Button").id("cancel").groups(["btns", "danger"]),
    ]);

    let returned = f
        .parser
        .parse(&tree)
        .unwrap()
        .build(BuildOptions::new().gui(state.clone()))
        .unwrap();
    assert!(returned.ptr_eq(&state));

    let state = state.read();
    let ok = state.id("ok").unwrap();
    let cancel = state.id("cancel").unwrap();
    let btns = state.group("btns");
    assert_eq!(btns.len(), 2);
    assert!(Arc::ptr_eq(&btns[0], ok));
    assert!(Arc::ptr_eq(&btns[1], cancel));
    assert_eq!(state.group("danger").len(), 1);
    assert_eq!(state.root().unwrap().class, "Panel");
}

#[test]
fn later_tree_attaches_to_existing_root() {
    let f = fixture();
    let state = StateHandle::new();
    let window = f.parser.parse(&Descriptor::new("Window")).unwrap();
    let button = f.parser.parse(&Descriptor::new("Button").id("late")).unwrap();

    window.build(BuildOptions::new().gui(state.clone())).unwrap();
    button.build(BuildOptions::new().gui(state.clone())).unwrap();

    let state = state.read();
    let root = state.root().unwrap();
    assert_eq!(root.class, "Window", "the first root is kept");
    assert!(Arc::ptr_eq(&root.children()[0], state.id("late").unwrap()));
}

#[test]
fn explicit_parent_overrides_root() {
    let f = fixture();
    let state = StateHandle::new();
    let host = widget("Host", 0);
    f.parser
        .parse(&Descriptor::new("Window"))
        .unwrap()
        .build(BuildOptions::new().gui(state.clone()))
        .unwrap();
    f.parser
        .parse(&label("hosted"))
        .unwrap()
        .build(BuildOptions::new().gui(state.clone()).parent(host.clone()))
        .unwrap();

    assert_eq!(host.texts(), ["hosted"]);
    assert!(state.read().root().unwrap().children().is_empty());
}

#[test]
fn last_gui_and_parent_settings_win() {
    let f = fixture();
    let discarded = StateHandle::new();
    let kept = StateHandle::new();
    let first = widget("First", 0);
    let second = widget("Second", 0);

    f.parser
        .parse(&label("x").id("x"))
        .unwrap()
        .build(
            BuildOptions::new()
                .gui(discarded.clone())
                .parent(first.clone())
                .gui(kept.clone())
                .parent(second.clone()),
        )
        .unwrap();

    assert!(discarded.read().is_empty());
    assert!(kept.read().id("x").is_some());
    assert!(first.children().is_empty());
    assert_eq!(second.texts(), ["x"]);
}

fn sheets() -> Vec<StyleSheet> {
    let base = StyleSheetBuilder::new()
        .rule(
            Selector::class("Button"),
            Style::new()
                .with("color", "grey")
                .with("size", 10_i64)
                .with("border", 1_i64),
        )
        .rule(Selector::group("primary"), Style::new().with("color", "blue"))
        .build();
    let site = StyleSheetBuilder::new()
        .rule(Selector::id("ok"), Style::new().with("size", 14_i64))
        .rule(Selector::class("Button"), Style::new().with("border", 2_i64))
        .build();
    vec![base, site]
}

#[test]
fn stylesheets_cascade_under_inline_properties() {
    let f = fixture();
    let tree = Descriptor::new("Panel").children([
        Descriptor::new("Button").id("ok").groups(["primary"]),
        Descriptor::new("Button").groups(["primary"]).property("color", "red"),
        Descriptor::new("Button"),
    ]);

    let state = f
        .parser
        .parse(&tree)
        .unwrap()
        .build(BuildOptions::new().stylesheets(sheets()))
        .unwrap()
        .read();

    let buttons = state.root().unwrap().children();
    let ok = &buttons[0];
    assert_eq!(ok.prop::<&str>("color"), Some("blue"));
    assert_eq!(ok.prop::<i64>("size"), Some(14));
    assert_eq!(ok.prop::<i64>("border"), Some(2), "later sheet wins a tie");

    let red = &buttons[1];
    assert_eq!(red.prop::<&str>("color"), Some("red"), "inline wins");
    assert_eq!(red.prop::<i64>("size"), Some(10));

    let plain = &buttons[2];
    assert_eq!(plain.prop::<&str>("color"), Some("grey"));
    assert_eq!(plain.prop::<i64>("border"), Some(2));
}

#[test]
fn later_stylesheet_call_wins_ties() {
    let f = fixture();
    let sheet = |color: &'static str| {
        StyleSheetBuilder::new()
            .rule(Selector::class("Button"), Style::new().with("color", color))
            .build()
    };
    let builder = f.parser.parse(&Descriptor::new("Button")).unwrap();

    let state = builder
        .build(
            BuildOptions::new()
                .stylesheet(sheet("first"))
                .stylesheet(sheet("second")),
        )
        .unwrap()
        .read();
    assert_eq!(state.root().unwrap().prop::<&str>("color"), Some("second"));

    let state = builder
        .build(
            BuildOptions::new()
                .stylesheet(sheet("second"))
                .stylesheets([sheet("first")]),
        )
        .unwrap()
        .read();
    assert_eq!(state.root().unwrap().prop::<&str>("color"), Some("first"));
}

#[test]
fn children_see_parent_effective_style() {
    let f = fixture();
    let tree = Descriptor::new("Panel")
        .id("outer")
        .property("padding", 4_i64)
        .child(Descriptor::new("Button"));
    let sheet = StyleSheetBuilder::new()
        .rule(Selector::class("Panel"), Style::new().with("gap", 2_i64))
        .build();

    let state = f
        .parser
        .parse(&tree)
        .unwrap()
        .build(BuildOptions::new().stylesheet(sheet))
        .unwrap()
        .read();

    let panel = state.root().unwrap();
    assert!(panel.parent_style.lock().unwrap().is_none());

    let button = &panel.children()[0];
    let parent_style = button.parent_style.lock().unwrap().clone().unwrap();
    assert_eq!(parent_style.class(), Some("Panel"));
    assert_eq!(parent_style.id(), Some("outer"));
    assert_eq!(parent_style.properties().get_as::<i64>("padding"), Some(&4));
    assert_eq!(parent_style.properties().get_as::<i64>("gap"), Some(&2));
}

#[test]
fn constructor_dispatches_on_argument_count() {
    let f = fixture();
    let pair = vec![Value::from(1_i64), Value::from(2_i64)];
    let tree = Descriptor::new("Panel")
        .child(Descriptor::new("Point"))
        .child(Descriptor::new("Point").property(ARGS, Value::new(pair)));

    let state = f
        .parser
        .parse(&tree)
        .unwrap()
        .build(BuildOptions::new())
        .unwrap()
        .read();
    let points = state.root().unwrap().children();
    assert_eq!(points[0].args, 0);
    assert_eq!(points[1].args, 2);

    let single = Descriptor::new("Point").property(ARGS, Value::new(vec![Value::from(1_i64)]));
    let err = f
        .parser
        .parse(&single)
        .unwrap()
        .build(BuildOptions::new())
        .unwrap_err();
    assert!(
        matches!(&err, BuildError::ArityMismatch { arity: 1, supported, .. } if *supported == [0, 2]),
        "unexpected error: {err}"
    );
}

#[test]
fn unknown_class_builds_nothing() {
    let f = fixture();
    let tree = Descriptor::new("Window").children([
        label("a"),
        Descriptor::new("Panel").child(Descriptor::new("Slider")),
    ]);

    let err = f.parser.parse(&tree).unwrap_err();
    assert_eq!(err.to_string(), "class `Slider` not found");
    assert_eq!(f.created.load(Ordering::SeqCst), 0);
}

#[test]
fn instantiator_failure_aborts_the_build() {
    let f = fixture();
    let tree = Descriptor::new("Window")
        .child(label("first").id("first"))
        .child(Descriptor::new("Button").property(FAIL, true))
        .child(label("never").id("never"));
    let state = StateHandle::new();

    let err = f
        .parser
        .parse(&tree)
        .unwrap()
        .build(BuildOptions::new().gui(state.clone()))
        .unwrap_err();
    assert!(
        matches!(&err, BuildError::Instantiate { class, .. } if class == "Button"),
        "unexpected error: {err}"
    );
    assert_eq!(
        std::error::Error::source(&err).map(ToString::to_string),
        Some("refused by toolkit".to_owned())
    );

    let state = state.read();
    assert!(state.id("first").is_some());
    assert!(state.id("never").is_none());
}

#[test]
fn nested_and_dynamic_children_flatten_in_order() {
    let f = fixture();
    let inner = f.parser.parse(&label("d")).unwrap();
    let tree = Descriptor::new("Panel")
        .child(label("a"))
        .children([label("b"), label("c")])
        .dynamic(move || vec![Child::many([Child::from(inner.clone())])])
        .child(label("e"));

    let state = f
        .parser
        .parse(&tree)
        .unwrap()
        .build(BuildOptions::new())
        .unwrap()
        .read();
    assert_eq!(state.root().unwrap().texts(), ["a", "b", "c", "d", "e"]);
}

#[test]
fn dynamic_children_are_regenerated_per_build() {
    let f = fixture();
    let round = Arc::new(AtomicUsize::new(0));
    let label_builder = f.parser.parse(&label("x")).unwrap();
    let tree = Descriptor::new("Panel").dynamic({
        let round = round.clone();
        move || {
            let n = round.fetch_add(1, Ordering::SeqCst) + 1;
            (0..n).map(|_| Child::from(label_builder.clone())).collect()
        }
    });
    let builder = f.parser.parse(&tree).unwrap();

    let first = builder.build(BuildOptions::new()).unwrap().read();
    let second = builder.build(BuildOptions::new()).unwrap().read();
    assert_eq!(first.root().unwrap().children().len(), 1);
    assert_eq!(second.root().unwrap().children().len(), 2);
    assert_eq!(round.load(Ordering::SeqCst), 2);
}

#[test]
fn repeated_builds_create_fresh_objects() {
    let f = fixture();
    let builder = f
        .parser
        .parse(&Descriptor::new("Window").child(label("hi").id("hi")))
        .unwrap();

    let a = builder.build(BuildOptions::new()).unwrap();
    let b = builder.build(BuildOptions::new()).unwrap();
    assert!(!a.ptr_eq(&b));

    let (a, b) = (a.read(), b.read());
    assert!(!Arc::ptr_eq(a.root().unwrap(), b.root().unwrap()));
    assert!(!Arc::ptr_eq(a.id("hi").unwrap(), b.id("hi").unwrap()));
    assert_eq!(f.created.load(Ordering::SeqCst), 4);
}

#[test]
fn prebuilt_sub_builders_receive_build_context() {
    let f = fixture();
    let seen = Arc::new(Mutex::new(None::<StyleSpec>));
    let sub = {
        let seen = seen.clone();
        move |options: BuildOptions<W>| -> Result<StateHandle<W>, BuildError> {
            let gui = options.gui_ref().cloned().unwrap_or_default();
            let parent = options.parent_ref().cloned().unwrap();
            *seen.lock().unwrap() = options.parent_style_ref().cloned();
            let extra = widget("Extra", 0);
            parent.children.lock().unwrap().push(extra.clone());
            gui.merge(&SharedState::delta(Some("extra"), &["custom"], extra));
            Ok(gui)
        }
    };
    let tree = Descriptor::new("Window")
        .id("main")
        .builder(sub)
        .child(label("after"));

    let state = f
        .parser
        .parse(&tree)
        .unwrap()
        .build(BuildOptions::new())
        .unwrap()
        .read();

    let window = state.root().unwrap();
    let children = window.children();
    assert_eq!(children.len(), 2);
    assert!(Arc::ptr_eq(&children[0], state.id("extra").unwrap()));
    assert_eq!(children[1].prop::<&str>("text"), Some("after"));
    assert_eq!(state.group("custom").len(), 1);
    let parent_style = seen.lock().unwrap().clone().unwrap();
    assert_eq!(parent_style.id(), Some("main"));
}

#[test]
fn concurrent_builds_share_one_state() {
    const THREADS: usize = 8;
    const BUILDS: usize = 16;

    let f = fixture();
    let state = StateHandle::new();
    f.parser
        .parse(&Descriptor::new("Window"))
        .unwrap()
        .build(BuildOptions::new().gui(state.clone()))
        .unwrap();
    let button = f
        .parser
        .parse(&Descriptor::new("Button").groups(["all"]))
        .unwrap();

    thread::scope(|scope| {
        for _ in 0..THREADS {
            let (state, button) = (state.clone(), button.clone());
            scope.spawn(move || {
                for _ in 0..BUILDS {
                    button.build(BuildOptions::new().gui(state.clone())).unwrap();
                }
            });
        }
    });

    let state = state.read();
    assert_eq!(state.group("all").len(), THREADS * BUILDS);
    assert_eq!(state.root().unwrap().class, "Window");
    assert_eq!(state.root().unwrap().children().len(), THREADS * BUILDS);
}
