pub use crate::effects::{Cleanup, Deps, EffectFn};
pub use crate::error::RuntimeError;
pub use crate::runtime::{Component, Hooks, Setter, mount};
pub use crate::state::StateCell;
pub use latch_dom::host::{CommitEvent, Document};
pub use latch_dom::live::{LiveHandle, dispatch, find_by_attr};
pub use latch_dom::value::Value;
pub use latch_dom::vnode::{Event, VNode, el, h, text};
