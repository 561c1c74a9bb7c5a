#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use latch_dom::host::Document;
    use latch_dom::live::{LiveNode, dispatch, find_by_attr};
    use latch_dom::value::Value;
    use latch_dom::vnode::{Event, VNode, el, h, text};

    use crate::effects::Cleanup;
    use crate::runtime::{Hooks, Setter, mount};

    type Log = Rc<RefCell<Vec<String>>>;
    type SetterSlot = Rc<RefCell<Option<Setter>>>;

    fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn n_of(state: &Value) -> i64 {
        state.get("n").and_then(Value::as_int).unwrap_or(0)
    }

    #[test]
    fn untracked_effect_runs_on_every_commit() {
        let doc = Document::new();
        let runs = Rc::new(RefCell::new(0));
        let slot: SetterSlot = Rc::new(RefCell::new(None));

        let runs2 = runs.clone();
        let slot2 = slot.clone();
        mount(
            &doc,
            move |hooks: &Hooks, _input: &Value| {
                let (_state, set) = hooks.use_state(Value::map([("n", Value::Int(0))]));
                *slot2.borrow_mut() = Some(set);
                let runs = runs2.clone();
                hooks.use_effect(
                    move || {
                        *runs.borrow_mut() += 1;
                        None
                    },
                    None,
                );
                el("div", vec![])
            },
            Value::Null,
        )
        .unwrap();
        assert_eq!(*runs.borrow(), 1);

        let set = slot.borrow().clone().unwrap();
        set.set(Value::map([("n", Value::Int(1))])).unwrap();
        set.set(Value::map([("n", Value::Int(1))])).unwrap(); // unchanged state still commits
        assert_eq!(*runs.borrow(), 3);
    }

    #[test]
    fn empty_deps_run_exactly_once_for_the_lifetime() {
        let doc = Document::new();
        let runs = Rc::new(RefCell::new(0));
        let slot: SetterSlot = Rc::new(RefCell::new(None));

        let runs2 = runs.clone();
        let slot2 = slot.clone();
        mount(
            &doc,
            move |hooks: &Hooks, _input: &Value| {
                let (state, set) = hooks.use_state(Value::map([("n", Value::Int(0))]));
                *slot2.borrow_mut() = Some(set);
                let runs = runs2.clone();
                hooks.use_effect(
                    move || {
                        *runs.borrow_mut() += 1;
                        None
                    },
                    Some(&[]),
                );
                el("div", vec![text(format!("{}", n_of(&state)))])
            },
            Value::Null,
        )
        .unwrap();

        let set = slot.borrow().clone().unwrap();
        set.set(Value::map([("n", Value::Int(1))])).unwrap();
        set.set(Value::map([("n", Value::Int(2))])).unwrap();
        assert_eq!(*runs.borrow(), 1);
    }

    #[test]
    fn unchanged_dep_across_three_renders_runs_once() {
        let doc = Document::new();
        let runs = Rc::new(RefCell::new(0));
        let slot: SetterSlot = Rc::new(RefCell::new(None));

        let runs2 = runs.clone();
        let slot2 = slot.clone();
        mount(
            &doc,
            move |hooks: &Hooks, _input: &Value| {
                let (state, set) = hooks.use_state(Value::map([("n", Value::Int(0))]));
                *slot2.borrow_mut() = Some(set);
                let runs = runs2.clone();
                // Freshly built but structurally identical every render.
                let x = Value::map([("key", Value::from("constant"))]);
                hooks.use_effect(
                    move || {
                        *runs.borrow_mut() += 1;
                        None
                    },
                    Some(&[x]),
                );
                el("div", vec![text(format!("{}", n_of(&state)))])
            },
            Value::Null,
        )
        .unwrap();

        let set = slot.borrow().clone().unwrap();
        set.set(Value::map([("n", Value::Int(1))])).unwrap();
        set.set(Value::map([("n", Value::Int(2))])).unwrap();
        assert_eq!(*runs.borrow(), 1);
    }

    #[test]
    fn rerun_is_preceded_by_previous_cleanup_and_detach_runs_it_once() {
        let doc = Document::new();
        let events = log();
        let slot: SetterSlot = Rc::new(RefCell::new(None));

        let events2 = events.clone();
        let slot2 = slot.clone();
        mount(
            &doc,
            move |hooks: &Hooks, _input: &Value| {
                let (state, set) = hooks.use_state(Value::map([("n", Value::Int(0))]));
                *slot2.borrow_mut() = Some(set);
                let n = n_of(&state);
                let events = events2.clone();
                hooks.use_effect(
                    move || {
                        events.borrow_mut().push(format!("run {n}"));
                        let events = events.clone();
                        Some(Box::new(move || {
                            events.borrow_mut().push(format!("cleanup {n}"));
                        }) as Cleanup)
                    },
                    Some(&[Value::Int(n)]),
                );
                el("div", vec![text(format!("{n}"))])
            },
            Value::Null,
        )
        .unwrap();

        let set = slot.borrow().clone().unwrap();
        set.set(Value::map([("n", Value::Int(1))])).unwrap();
        // Deps unchanged: no cleanup, no run.
        set.set(Value::map([("n", Value::Int(1))])).unwrap();

        doc.unmount().unwrap();
        doc.unmount().unwrap(); // second detach must not re-fire anything

        assert_eq!(
            *events.borrow(),
            vec!["run 0", "cleanup 0", "run 1", "cleanup 1"]
        );
    }

    #[test]
    fn live_tree_always_reflects_the_cumulative_merged_state() {
        let doc = Document::new();
        let slot: SetterSlot = Rc::new(RefCell::new(None));

        let slot2 = slot.clone();
        let live = mount(
            &doc,
            move |hooks: &Hooks, _input: &Value| {
                let (state, set) = hooks.use_state(Value::map([
                    ("a", Value::Int(1)),
                    ("b", Value::Int(10)),
                ]));
                *slot2.borrow_mut() = Some(set);
                let a = state.get("a").and_then(Value::as_int).unwrap_or(0);
                let b = state.get("b").and_then(Value::as_int).unwrap_or(0);
                el("div", vec![text(format!("a={a} b={b}"))])
            },
            Value::Null,
        )
        .unwrap();

        let rendered = |live: &crate::prelude::LiveHandle| {
            let tree = live.borrow();
            let LiveNode::Element(root) = &*tree else {
                panic!("expected element root");
            };
            let LiveNode::Text(s) = &root.children[0] else {
                panic!("expected text child");
            };
            s.clone()
        };
        assert_eq!(rendered(&live), "a=1 b=10");

        let set = slot.borrow().clone().unwrap();
        set.set(Value::map([("b", Value::Int(20))])).unwrap();
        assert_eq!(rendered(&live), "a=1 b=20"); // a survives the shallow merge

        set.set(Value::map([("a", Value::Int(2))])).unwrap();
        assert_eq!(rendered(&live), "a=2 b=20");
    }

    #[test]
    fn two_call_sites_keep_separate_identities() {
        let doc = Document::new();
        let events = log();
        let slot: SetterSlot = Rc::new(RefCell::new(None));

        let events2 = events.clone();
        let slot2 = slot.clone();
        mount(
            &doc,
            move |hooks: &Hooks, _input: &Value| {
                let (state, set) = hooks.use_state(Value::map([
                    ("a", Value::Int(0)),
                    ("b", Value::Int(0)),
                ]));
                *slot2.borrow_mut() = Some(set);
                let a = state.get("a").and_then(Value::as_int).unwrap_or(0);
                let b = state.get("b").and_then(Value::as_int).unwrap_or(0);

                let events_a = events2.clone();
                hooks.use_effect(
                    move || {
                        events_a.borrow_mut().push(format!("A {a}"));
                        None
                    },
                    Some(&[Value::Int(a)]),
                );
                let events_b = events2.clone();
                hooks.use_effect(
                    move || {
                        events_b.borrow_mut().push(format!("B {b}"));
                        None
                    },
                    Some(&[Value::Int(b)]),
                );
                el("div", vec![text(format!("{a}/{b}"))])
            },
            Value::Null,
        )
        .unwrap();

        let set = slot.borrow().clone().unwrap();
        set.set(Value::map([("b", Value::Int(5))])).unwrap();

        assert_eq!(*events.borrow(), vec!["A 0", "B 0", "B 5"]);
    }

    #[test]
    fn reentrant_set_from_inside_an_effect_is_ordered_after_the_pass() {
        let doc = Document::new();
        let events = log();

        let events2 = events.clone();
        let live = mount(
            &doc,
            move |hooks: &Hooks, _input: &Value| {
                let (state, set) = hooks.use_state(Value::map([("n", Value::Int(0))]));
                let n = n_of(&state);
                let events = events2.clone();
                hooks.use_effect(
                    move || {
                        events.borrow_mut().push(format!("effect {n}"));
                        if n == 0 {
                            set.set(Value::map([("n", Value::Int(1))])).unwrap();
                            // The write above already rendered and patched;
                            // its effect pass runs after this one finishes.
                            events.borrow_mut().push("write returned".into());
                        }
                        None
                    },
                    Some(&[Value::Int(n)]),
                );
                el("div", vec![text(format!("{n}"))])
            },
            Value::Null,
        )
        .unwrap();

        assert_eq!(
            *events.borrow(),
            vec!["effect 0", "write returned", "effect 1"]
        );
        let tree = live.borrow();
        let LiveNode::Element(root) = &*tree else {
            panic!("expected element root");
        };
        let LiveNode::Text(s) = &root.children[0] else {
            panic!("expected text child");
        };
        assert_eq!(s, "1");
    }

    #[test]
    fn uncomparable_deps_surface_as_an_error() {
        let doc = Document::new();
        let slot: SetterSlot = Rc::new(RefCell::new(None));

        let slot2 = slot.clone();
        mount(
            &doc,
            move |hooks: &Hooks, _input: &Value| {
                let (state, set) = hooks.use_state(Value::map([("n", Value::Int(0))]));
                *slot2.borrow_mut() = Some(set);
                hooks.use_effect(|| None, Some(&[Value::Float(f64::NAN)]));
                el("div", vec![text(format!("{}", n_of(&state)))])
            },
            Value::Null,
        )
        .unwrap(); // first evaluation never compares, so mounting succeeds

        let set = slot.borrow().clone().unwrap();
        let err = set.set(Value::map([("n", Value::Int(1))])).unwrap_err();
        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    #[should_panic(expected = "exactly one state cell")]
    fn second_state_cell_fails_fast() {
        let doc = Document::new();
        let _ = mount(
            &doc,
            |hooks: &Hooks, _input: &Value| {
                let (_a, _) = hooks.use_state(Value::Int(0));
                let (_b, _) = hooks.use_state(Value::Int(1));
                el("div", vec![])
            },
            Value::Null,
        );
    }

    #[test]
    fn members_scenario_end_to_end() {
        let doc = Document::new();
        doc.set_title("latch members demo");
        let events = log();

        let live = mount(&doc, members_component(doc.clone(), events.clone()), {
            Value::map([("members", Value::list([Value::from("Ann")]))])
        })
        .unwrap();
        assert_eq!(doc.title(), "Members: 1");
        assert_eq!(*events.borrow(), vec!["title 1"]);

        // Add-interaction path: the event payload carries the new name.
        let add = find_by_attr(&live, "id", &Value::from("add")).unwrap();
        dispatch(&live, &add, "click", &Event::new("Bo")).unwrap();
        assert_eq!(doc.title(), "Members: 2");
        assert_eq!(*events.borrow(), vec!["title 1", "reset", "title 2"]);

        {
            let tree = live.borrow();
            let LiveNode::Element(root) = &*tree else {
                panic!("expected element root");
            };
            let LiveNode::Element(list) = &root.children[1] else {
                panic!("expected list element");
            };
            assert_eq!(list.children.len(), 2);
        }

        doc.unmount().unwrap();
        assert_eq!(doc.title(), "latch members demo");
        assert_eq!(
            *events.borrow(),
            vec!["title 1", "reset", "title 2", "reset"]
        );
    }

    fn members_component(doc: Document, events: Log) -> impl Fn(&Hooks, &Value) -> VNode {
        move |hooks, input| {
            let (state, set) = hooks.use_state(input.clone());
            let members: Vec<Value> = state
                .get("members")
                .and_then(Value::as_list)
                .unwrap_or(&[])
                .to_vec();
            let count = members.len();

            let title_doc = doc.clone();
            let title_events = events.clone();
            hooks.use_effect(
                {
                    move || {
                        title_doc.set_title(format!("Members: {count}"));
                        title_events.borrow_mut().push(format!("title {count}"));
                        let doc = title_doc.clone();
                        let events = title_events.clone();
                        Some(Box::new(move || {
                            doc.set_title("latch members demo");
                            events.borrow_mut().push("reset".into());
                        }) as Cleanup)
                    }
                },
                Some(&[Value::List(members.clone())]),
            );

            let add = {
                let members = members.clone();
                move |ev: &Event| {
                    let mut next = members.clone();
                    next.push(ev.payload.clone());
                    if let Err(e) = set.set(Value::map([("members", Value::List(next))])) {
                        log::error!("add failed: {e}");
                    }
                }
            };

            el(
                "div",
                vec![
                    h("button", [("id", Value::from("add"))], vec![text("Add")]).on("click", add),
                    h(
                        "div",
                        [("id", Value::from("list"))],
                        members
                            .iter()
                            .map(|m| el("span", vec![text(m.as_str().unwrap_or_default())]))
                            .collect(),
                    ),
                ],
            )
        }
    }
}
