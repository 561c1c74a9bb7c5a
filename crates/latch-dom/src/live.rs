//! Live host tree: the mutable representation patches are applied to.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use thiserror::Error;

use crate::diff::{NodePath, Patch, PatchSet};
use crate::value::Value;
use crate::vnode::{Event, Handler, VNode};

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("no node at path {0:?}")]
    PathNotFound(Vec<usize>),
    #[error("patch targets a {found} node where {expected} was expected")]
    NodeKind {
        expected: &'static str,
        found: &'static str,
    },
    #[error("child index {index} out of bounds (len {len})")]
    ChildIndex { index: usize, len: usize },
    #[error("no {event:?} handler at path {path:?}")]
    NoHandler { path: Vec<usize>, event: String },
}

pub enum LiveNode {
    Element(LiveElement),
    Text(String),
}

pub struct LiveElement {
    pub tag: String,
    pub attrs: BTreeMap<String, Value>,
    pub handlers: BTreeMap<String, Handler>,
    pub children: Vec<LiveNode>,
}

/// Shared handle to a mounted live tree.
pub type LiveHandle = Rc<RefCell<LiveNode>>;

/// Builds a fresh live tree from a description.
pub fn create(node: &VNode) -> LiveNode {
    match node {
        VNode::Text(s) => LiveNode::Text(s.clone()),
        VNode::Element(el) => LiveNode::Element(LiveElement {
            tag: el.tag.clone(),
            attrs: el.attrs.clone(),
            handlers: el.handlers.clone(),
            children: el.children.iter().map(create).collect(),
        }),
    }
}

pub fn create_handle(node: &VNode) -> LiveHandle {
    Rc::new(RefCell::new(create(node)))
}

/// Applies a patch set in order. Untouched subtrees keep their nodes.
pub fn apply(root: &LiveHandle, patches: &PatchSet) -> Result<(), PatchError> {
    let mut tree = root.borrow_mut();
    for patch in patches {
        apply_one(&mut tree, patch)?;
    }
    Ok(())
}

fn apply_one(root: &mut LiveNode, patch: &Patch) -> Result<(), PatchError> {
    match patch {
        Patch::Replace { path, node } => {
            *node_at(root, path)? = create(node);
        }
        Patch::SetText { path, text } => match node_at(root, path)? {
            LiveNode::Text(s) => *s = text.clone(),
            LiveNode::Element(_) => {
                return Err(PatchError::NodeKind {
                    expected: "text",
                    found: "element",
                });
            }
        },
        Patch::SetAttr { path, name, value } => {
            element_at(root, path)?
                .attrs
                .insert(name.clone(), value.clone());
        }
        Patch::RemoveAttr { path, name } => {
            element_at(root, path)?.attrs.remove(name);
        }
        Patch::SetHandlers { path, handlers } => {
            element_at(root, path)?.handlers = handlers.clone();
        }
        Patch::AppendChild { path, node } => {
            element_at(root, path)?.children.push(create(node));
        }
        Patch::RemoveChild { path, index } => {
            let el = element_at(root, path)?;
            if *index >= el.children.len() {
                return Err(PatchError::ChildIndex {
                    index: *index,
                    len: el.children.len(),
                });
            }
            el.children.remove(*index);
        }
    }
    Ok(())
}

fn node_at<'a>(root: &'a mut LiveNode, path: &NodePath) -> Result<&'a mut LiveNode, PatchError> {
    let mut node = root;
    for &index in path {
        match node {
            LiveNode::Element(el) => {
                let len = el.children.len();
                node = el
                    .children
                    .get_mut(index)
                    .ok_or(PatchError::ChildIndex { index, len })?;
            }
            LiveNode::Text(_) => return Err(PatchError::PathNotFound(path.to_vec())),
        }
    }
    Ok(node)
}

fn element_at<'a>(
    root: &'a mut LiveNode,
    path: &NodePath,
) -> Result<&'a mut LiveElement, PatchError> {
    match node_at(root, path)? {
        LiveNode::Element(el) => Ok(el),
        LiveNode::Text(_) => Err(PatchError::NodeKind {
            expected: "element",
            found: "text",
        }),
    }
}

/// Depth-first search for the first element whose attribute matches.
pub fn find_by_attr(root: &LiveHandle, name: &str, value: &Value) -> Option<Vec<usize>> {
    fn walk(node: &LiveNode, name: &str, value: &Value, path: &mut Vec<usize>) -> bool {
        if let LiveNode::Element(el) = node {
            if el.attrs.get(name) == Some(value) {
                return true;
            }
            for (i, child) in el.children.iter().enumerate() {
                path.push(i);
                if walk(child, name, value, path) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }
    let tree = root.borrow();
    let mut path = Vec::new();
    walk(&tree, name, value, &mut path).then_some(path)
}

/// Invokes the handler registered for `event` on the element at `path`.
///
/// The tree borrow is released before the handler runs, so handlers are free
/// to trigger renders that patch this same tree.
pub fn dispatch(root: &LiveHandle, path: &[usize], event: &str, payload: &Event) -> Result<(), PatchError> {
    let handler = {
        let mut tree = root.borrow_mut();
        let node_path: NodePath = path.iter().copied().collect();
        let el = element_at(&mut tree, &node_path)?;
        el.handlers
            .get(event)
            .cloned()
            .ok_or_else(|| PatchError::NoHandler {
                path: path.to_vec(),
                event: event.to_string(),
            })?
    };
    handler(payload);
    Ok(())
}

impl LiveNode {
    fn fmt_indented(&self, f: &mut std::fmt::Formatter<'_>, depth: usize) -> std::fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            LiveNode::Text(s) => writeln!(f, "{pad}{s:?}"),
            LiveNode::Element(el) => {
                write!(f, "{pad}<{}", el.tag)?;
                for (name, value) in &el.attrs {
                    write!(f, " {name}={value:?}")?;
                }
                writeln!(f, ">")?;
                for child in &el.children {
                    child.fmt_indented(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for LiveNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_indented(f, 0)
    }
}
