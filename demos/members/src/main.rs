//! The Members demo: one state cell holding a member list, an effect with
//! `[members]` deps that keeps the document title in sync, and a scripted
//! interaction run against the live tree.

use anyhow::Result;
use latch_core::prelude::*;

const DEFAULT_TITLE: &str = "latch members demo";

fn members_app(doc: Document) -> impl Fn(&Hooks, &Value) -> VNode {
    move |hooks, input| {
        let (state, set) = hooks.use_state(input.clone());
        let members: Vec<Value> = state
            .get("members")
            .and_then(Value::as_list)
            .unwrap_or(&[])
            .to_vec();
        let count = members.len();

        let title_doc = doc.clone();
        hooks.use_effect(
            move || {
                title_doc.set_title(format!("The roster has {count} members."));
                let doc = title_doc.clone();
                Some(Box::new(move || doc.set_title(DEFAULT_TITLE)) as Cleanup)
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
                el(
                    "div",
                    vec![
                        h("input", [("id", Value::from("memberInput"))], vec![]),
                        h("button", [("id", Value::from("add"))], vec![text("Add")])
                            .on("click", add),
                    ],
                ),
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

fn show(doc: &Document) {
    println!("title: {}", doc.title());
    match doc.root() {
        Some(live) => print!("{}", live.borrow()),
        None => println!("(nothing mounted)"),
    }
    println!();
}

fn main() -> Result<()> {
    env_logger::init();

    let doc = Document::new();
    doc.set_title(DEFAULT_TITLE);

    let initial = Value::map([("members", Value::list([Value::from("Ann")]))]);
    let live = latch_core::mount(&doc, members_app(doc.clone()), initial)?;
    show(&doc);

    for name in ["Bo", "Cyd"] {
        let add = find_by_attr(&live, "id", &Value::from("add"))
            .ok_or_else(|| anyhow::anyhow!("add button not rendered"))?;
        log::info!("clicking Add with {name:?}");
        dispatch(&live, &add, "click", &Event::new(name))?;
        show(&doc);
    }

    doc.unmount()?;
    show(&doc);
    Ok(())
}
