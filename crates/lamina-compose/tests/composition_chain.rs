//! Scenario chain over a single namespace: the lifecycle a host embedding
//! the registry observes, from hidden members through deferred
//! definitions to instance construction.

use lamina_compose::Namespace;
use serde_json::{Value, json};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[test]
fn hidden_members_stay_hidden() {
    let namespace = Namespace::new();
    namespace
        .define("a", [], |this_class, _, mask| {
            this_class.set_value("secret_value", "secret");
            this_class.set_value("exposed_value", "fnord");
            mask.expose("exposed_value");
        })
        .expect("define should register");

    let view = namespace.get("a").expect("a should be ready");
    assert!(!view.contains("secret_value"));
    assert_eq!(view.value("exposed_value"), Some(&json!("fnord")));
}

#[test]
fn redefinition_leaves_the_original_untouched() {
    let namespace = Namespace::new();
    namespace
        .define("a", [], |this_class, _, mask| {
            this_class.set_value("exposed_value", "fnord");
            mask.expose("exposed_value");
        })
        .expect("define should register");
    namespace
        .define("a", [], |this_class, _, mask| {
            this_class.set_value("other_value", true);
            mask.expose("other_value");
        })
        .expect("define should register");

    let view = namespace.get("a").expect("a should stay defined");
    assert_eq!(view.value("exposed_value"), Some(&json!("fnord")));
    assert!(!view.contains("other_value"));
}

#[test]
fn satisfied_prerequisites_define_immediately() {
    let namespace = Namespace::new();
    namespace
        .define("a", [], |this_class, _, mask| {
            this_class.set_value("value", "A");
            mask.expose("value");
        })
        .expect("define should register");
    namespace
        .define("b", [], |this_class, _, mask| {
            this_class.set_value("value", "B");
            mask.expose("value");
        })
        .expect("define should register");
    namespace
        .define("c", ["a", "b"], |this_class, _, mask| {
            this_class.set_value("value", "C");
            mask.expose("value");
        })
        .expect("define should register");

    let view = namespace.get("c").expect("c should be ready immediately");
    assert_eq!(view.value("value"), Some(&json!("C")));
}

#[test]
fn unavailable_prerequisite_defers_definition() {
    let namespace = Namespace::new();
    namespace
        .define("e", ["d"], |this_class, _, mask| {
            this_class.set_value("value", "E");
            mask.expose("value");
        })
        .expect("define should register");
    assert!(namespace.get("e").is_none());

    namespace
        .define("d", [], |_, _, _| {})
        .expect("define should register");
    let view = namespace.get("e").expect("e should be ready once d is");
    assert_eq!(view.value("value"), Some(&json!("E")));
}

#[test]
fn once_fires_in_definition_order() {
    let namespace = Namespace::new();
    namespace
        .define("d", [], |_, _, _| {})
        .expect("define should register");

    let events: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let push = |events: &Rc<RefCell<Vec<String>>>, entry: &str| {
        events.borrow_mut().push(entry.to_string());
    };

    push(&events, "watch-d");
    let got_d = Rc::clone(&events);
    namespace.once("d", move |_| got_d.borrow_mut().push("got-d".to_string()));

    push(&events, "watch-f");
    let got_f = Rc::clone(&events);
    namespace.once("f", move |_| got_f.borrow_mut().push("got-f".to_string()));

    let during_define = Rc::clone(&events);
    namespace
        .define("f", [], move |this_class, _, _| {
            during_define.borrow_mut().push("define-f".to_string());
            this_class.set_method("get_value", |_| json!("F"));
        })
        .expect("define should register");

    assert_eq!(
        events.borrow().join(","),
        "watch-d,got-d,watch-f,define-f,got-f"
    );
}

#[test]
fn base_method_is_callable_on_this_and_proto() {
    let namespace = Namespace::new();
    namespace
        .define("f", [], |this_class, _, _| {
            this_class.set_method("get_value", |_| json!("F"));
        })
        .expect("define should register");

    let checked = Rc::new(Cell::new(false));
    let checked_inner = Rc::clone(&checked);
    namespace
        .define("g", "f", move |this_class, proto_class, _| {
            let via_this = this_class
                .method("get_value")
                .expect("inherited method on this")
                .call(&[]);
            let via_proto = proto_class
                .method("get_value")
                .expect("inherited method on proto")
                .call(&[]);
            assert_eq!(via_this, json!("F"));
            assert_eq!(via_proto, json!("F"));
            checked_inner.set(true);
        })
        .expect("define should register");
    assert!(checked.get(), "g's factory must have run");
}

#[test]
fn overridden_method_reaches_the_original_through_proto() {
    let namespace = Namespace::new();
    namespace
        .define("f", [], |this_class, _, _| {
            this_class.set_method("get_value", |_| json!("F"));
        })
        .expect("define should register");
    namespace
        .define("g", "f", |_, _, _| {})
        .expect("define should register");
    namespace
        .define("h", "g", |this_class, proto_class, mask| {
            let original = proto_class
                .method("get_value")
                .cloned()
                .expect("inherited method should exist");
            this_class.set_method("get_value", move |args| {
                let Value::String(base) = original.call(args) else {
                    panic!("base get_value should yield a string");
                };
                Value::String(format!("{base}H"))
            });
            mask.expose("get_value");
        })
        .expect("define should register");

    let view = namespace.get("h").expect("h should be ready");
    let got = view
        .method("get_value")
        .expect("get_value should be exposed")
        .call(&[]);
    assert_eq!(got, json!("FH"));
}

#[test]
fn classes_instantiate_without_an_instance_factory() {
    let namespace = Namespace::new();
    namespace
        .define("d", [], |_, _, _| {})
        .expect("define should register");

    let views = namespace
        .instantiate("d", |_| {})
        .expect("d should instantiate synchronously");
    assert_eq!(views.len(), 1);
    // No factory ran, so the instance view is delivered but empty.
    assert!(views[0].is_empty());

    let class_view = namespace.get("d").expect("d should be ready");
    assert!(class_view.contains("instance"));
}

#[test]
fn instance_members_stay_hidden_unless_exposed() {
    let namespace = Namespace::new();
    namespace
        .define("i", [], |this_class, _, _| {
            this_class.set_instance(|this_instance, _, expose| {
                this_instance.set_value("secret_value", "secret");
                this_instance.set_value("exposed_value", "fnord");
                expose.expose("exposed_value");
            });
        })
        .expect("define should register");

    let views = namespace
        .instantiate("i", |_| {})
        .expect("i should instantiate synchronously");
    let instance = &views[0];
    assert!(!instance.contains("secret_value"));
    assert_eq!(instance.value("exposed_value"), Some(&json!("fnord")));
}

#[test]
fn instances_share_class_closures_but_not_instance_state() {
    let namespace = Namespace::new();
    namespace
        .define("counter", [], |this_class, _, _| {
            let next_id = Rc::new(Cell::new(0u64));
            this_class.set_instance(move |this_instance, _, expose| {
                next_id.set(next_id.get() + 1);
                this_instance.set_value("id", next_id.get());
                expose.expose("id");
            });
        })
        .expect("define should register");

    let first = namespace
        .instantiate("counter", |_| {})
        .expect("counter should instantiate synchronously");
    let second = namespace
        .instantiate("counter", |_| {})
        .expect("counter should instantiate synchronously");

    // The shared class-level closure hands out distinct ids; each call's
    // instance bag is its own.
    assert_eq!(first[0].value("id"), Some(&json!(1)));
    assert_eq!(second[0].value("id"), Some(&json!(2)));
}

#[test]
fn instance_factories_chain_ancestor_then_self_with_proto_snapshots() {
    let namespace = Namespace::new();
    namespace
        .define("parent", [], |this_class, _, _| {
            this_class.set_instance(|this_instance, _, expose| {
                this_instance.set_value("depth", 1);
                expose.expose("depth");
            });
        })
        .expect("define should register");
    namespace
        .define("child", "parent", |this_class, _, _| {
            this_class.set_instance(|this_instance, proto_instance, _| {
                let inherited = proto_instance
                    .value("depth")
                    .and_then(Value::as_i64)
                    .expect("proto should carry the parent's member");
                this_instance.set_value("depth", inherited + 1);
            });
        })
        .expect("define should register");

    let views = namespace
        .instantiate("child", |_| {})
        .expect("child should instantiate synchronously");
    assert_eq!(views[0].value("depth"), Some(&json!(2)));
}

#[test]
fn instantiating_many_names_delivers_request_order() {
    let namespace = Namespace::new();
    for (name, tag) in [("x", "X"), ("y", "Y")] {
        namespace
            .define(name, [], move |this_class, _, _| {
                this_class.set_instance(move |this_instance, _, expose| {
                    this_instance.set_value("tag", tag);
                    expose.expose("tag");
                });
            })
            .expect("define should register");
    }

    let views = namespace
        .instantiate(["y", "x"], |_| {})
        .expect("both should instantiate synchronously");
    assert_eq!(views[0].value("tag"), Some(&json!("Y")));
    assert_eq!(views[1].value("tag"), Some(&json!("X")));
}

#[test]
fn inherited_exposure_keeps_the_resolved_value_of_unexposed_overrides() {
    let namespace = Namespace::new();
    namespace
        .define("a", [], |this_class, _, mask| {
            this_class.set_value("v", 1);
            mask.expose("v");
        })
        .expect("define should register");
    namespace
        .define("b", "a", |_, _, _| {})
        .expect("define should register");
    namespace
        .define("c", "a", |this_class, _, _| {
            this_class.set_value("v", 2);
        })
        .expect("define should register");
    namespace
        .define("d", "a", |this_class, _, mask| {
            this_class.set_value("v", 2);
            mask.expose("v");
        })
        .expect("define should register");

    assert_eq!(
        namespace.get("a").expect("a ready").value("v"),
        Some(&json!(1))
    );
    // Empty factory: the inherited exposure carries through unchanged.
    assert_eq!(
        namespace.get("b").expect("b ready").value("v"),
        Some(&json!(1))
    );
    // Override without re-exposing: the view keeps the ancestor's
    // resolved value, not the override.
    assert_eq!(
        namespace.get("c").expect("c ready").value("v"),
        Some(&json!(1))
    );
    // Override with re-exposure publishes the new value.
    assert_eq!(
        namespace.get("d").expect("d ready").value("v"),
        Some(&json!(2))
    );
}

#[test]
fn rightmost_prerequisite_wins_across_the_chain() {
    let namespace = Namespace::new();
    namespace
        .define("l", [], |this_class, _, mask| {
            this_class.set_value("f", "from-l");
            mask.expose("f");
        })
        .expect("define should register");
    namespace
        .define("m", [], |this_class, _, mask| {
            this_class.set_value("f", "from-m");
            mask.expose("f");
        })
        .expect("define should register");
    namespace
        .define("n", ["l", "m"], |_, _, _| {})
        .expect("define should register");

    let view = namespace.get("n").expect("n should be ready");
    assert_eq!(view.value("f"), Some(&json!("from-m")));
}

#[test]
fn deep_chains_resolve_as_prerequisites_arrive_in_any_order() {
    let namespace = Namespace::new();
    let defined_order: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

    for (name, extend) in [("top", vec!["mid"]), ("mid", vec!["root"])] {
        let log = Rc::clone(&defined_order);
        namespace
            .define(name, extend, move |this_class, _, mask| {
                log.borrow_mut().push(name.to_string());
                this_class.set_value("layer", name);
                mask.expose("layer");
            })
            .expect("define should register");
    }
    assert!(namespace.get("top").is_none());
    assert!(namespace.get("mid").is_none());
    assert_eq!(namespace.pending_definitions(), 2);

    let log = Rc::clone(&defined_order);
    namespace
        .define("root", [], move |_, _, _| {
            log.borrow_mut().push("root".to_string());
        })
        .expect("define should register");

    assert_eq!(
        defined_order.borrow().as_slice(),
        ["root".to_string(), "mid".to_string(), "top".to_string()]
    );
    assert_eq!(
        namespace.get("top").expect("top ready").value("layer"),
        Some(&json!("top"))
    );
    assert_eq!(namespace.pending_definitions(), 0);
}
