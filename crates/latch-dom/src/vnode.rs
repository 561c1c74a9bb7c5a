use std::collections::BTreeMap;
use std::rc::Rc;

use crate::value::Value;

/// Interaction data delivered to a handler. Handlers always receive the
/// triggering event's payload explicitly; there is no ambient input source.
#[derive(Clone, Debug, Default)]
pub struct Event {
    pub payload: Value,
}

impl Event {
    pub fn new(payload: impl Into<Value>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

pub type Handler = Rc<dyn Fn(&Event)>;

/// One node of an immutable tree description produced by a render.
#[derive(Clone)]
pub enum VNode {
    Element(Element),
    Text(String),
}

#[derive(Clone, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: BTreeMap<String, Value>,
    pub handlers: BTreeMap<String, Handler>,
    pub children: Vec<VNode>,
}

impl VNode {
    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element(el) => Some(&el.tag),
            VNode::Text(_) => None,
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        if let VNode::Element(el) = &mut self {
            el.attrs.insert(name.into(), value.into());
        }
        self
    }

    pub fn on(mut self, event: impl Into<String>, handler: impl Fn(&Event) + 'static) -> Self {
        if let VNode::Element(el) = &mut self {
            el.handlers.insert(event.into(), Rc::new(handler));
        }
        self
    }

    pub fn with_children(mut self, kids: Vec<VNode>) -> Self {
        if let VNode::Element(el) = &mut self {
            el.children = kids;
        }
        self
    }
}

/// Builds an element node from a tag, attributes, and children.
pub fn h<K: Into<String>>(
    tag: impl Into<String>,
    attrs: impl IntoIterator<Item = (K, Value)>,
    children: Vec<VNode>,
) -> VNode {
    VNode::Element(Element {
        tag: tag.into(),
        attrs: attrs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        handlers: BTreeMap::new(),
        children,
    })
}

/// [`h`] without attributes.
pub fn el(tag: impl Into<String>, children: Vec<VNode>) -> VNode {
    h(tag, [] as [(&str, Value); 0], children)
}

pub fn text(content: impl Into<String>) -> VNode {
    VNode::Text(content.into())
}

impl std::fmt::Debug for VNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VNode::Text(s) => f.debug_tuple("Text").field(s).finish(),
            VNode::Element(el) => f
                .debug_struct("Element")
                .field("tag", &el.tag)
                .field("attrs", &el.attrs)
                .field("handlers", &el.handlers.keys().collect::<Vec<_>>())
                .field("children", &el.children)
                .finish(),
        }
    }
}
