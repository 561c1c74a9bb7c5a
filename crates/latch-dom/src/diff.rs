//! Positional tree diff.
//!
//! `diff` produces an ordered patch set addressing nodes by child-index path
//! from the root. Children are matched by position; a changed tag replaces the
//! whole subtree. Handler maps are opaque closures and cannot be compared, so
//! any element carrying handlers on either side gets its handler map refreshed.
//! Trees without handlers diff to an empty patch set when they are identical.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::value::Value;
use crate::vnode::{Element, Handler, VNode};

/// Child-index path from the root; empty path is the root itself.
pub type NodePath = SmallVec<[usize; 8]>;

pub enum Patch {
    Replace {
        path: NodePath,
        node: VNode,
    },
    SetText {
        path: NodePath,
        text: String,
    },
    SetAttr {
        path: NodePath,
        name: String,
        value: Value,
    },
    RemoveAttr {
        path: NodePath,
        name: String,
    },
    SetHandlers {
        path: NodePath,
        handlers: BTreeMap<String, Handler>,
    },
    AppendChild {
        path: NodePath,
        node: VNode,
    },
    RemoveChild {
        path: NodePath,
        index: usize,
    },
}

pub type PatchSet = Vec<Patch>;

pub fn diff(prev: &VNode, next: &VNode) -> PatchSet {
    let mut patches = Vec::new();
    diff_node(prev, next, &NodePath::new(), &mut patches);
    patches
}

fn diff_node(prev: &VNode, next: &VNode, path: &NodePath, out: &mut PatchSet) {
    match (prev, next) {
        (VNode::Text(a), VNode::Text(b)) => {
            if a != b {
                out.push(Patch::SetText {
                    path: path.clone(),
                    text: b.clone(),
                });
            }
        }
        (VNode::Element(a), VNode::Element(b)) if a.tag == b.tag => {
            diff_attrs(a, b, path, out);
            if !a.handlers.is_empty() || !b.handlers.is_empty() {
                out.push(Patch::SetHandlers {
                    path: path.clone(),
                    handlers: b.handlers.clone(),
                });
            }
            diff_children(a, b, path, out);
        }
        _ => out.push(Patch::Replace {
            path: path.clone(),
            node: next.clone(),
        }),
    }
}

fn diff_attrs(prev: &Element, next: &Element, path: &NodePath, out: &mut PatchSet) {
    for (name, value) in &next.attrs {
        if prev.attrs.get(name) != Some(value) {
            out.push(Patch::SetAttr {
                path: path.clone(),
                name: name.clone(),
                value: value.clone(),
            });
        }
    }
    for name in prev.attrs.keys() {
        if !next.attrs.contains_key(name) {
            out.push(Patch::RemoveAttr {
                path: path.clone(),
                name: name.clone(),
            });
        }
    }
}

fn diff_children(prev: &Element, next: &Element, path: &NodePath, out: &mut PatchSet) {
    let shared = prev.children.len().min(next.children.len());
    for i in 0..shared {
        let mut child_path = path.clone();
        child_path.push(i);
        diff_node(&prev.children[i], &next.children[i], &child_path, out);
    }
    for node in &next.children[shared..] {
        out.push(Patch::AppendChild {
            path: path.clone(),
            node: node.clone(),
        });
    }
    // Trailing removals run back to front so earlier indices stay valid.
    for index in (shared..prev.children.len()).rev() {
        out.push(Patch::RemoveChild {
            path: path.clone(),
            index,
        });
    }
}

impl std::fmt::Debug for Patch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Patch::Replace { path, node } => f
                .debug_struct("Replace")
                .field("path", path)
                .field("node", node)
                .finish(),
            Patch::SetText { path, text } => f
                .debug_struct("SetText")
                .field("path", path)
                .field("text", text)
                .finish(),
            Patch::SetAttr { path, name, value } => f
                .debug_struct("SetAttr")
                .field("path", path)
                .field("name", name)
                .field("value", value)
                .finish(),
            Patch::RemoveAttr { path, name } => f
                .debug_struct("RemoveAttr")
                .field("path", path)
                .field("name", name)
                .finish(),
            Patch::SetHandlers { path, handlers } => f
                .debug_struct("SetHandlers")
                .field("path", path)
                .field("events", &handlers.keys().collect::<Vec<_>>())
                .finish(),
            Patch::AppendChild { path, node } => f
                .debug_struct("AppendChild")
                .field("path", path)
                .field("node", node)
                .finish(),
            Patch::RemoveChild { path, index } => f
                .debug_struct("RemoveChild")
                .field("path", path)
                .field("index", index)
                .finish(),
        }
    }
}
