//! # Trees, Patches, and the Document
//!
//! Latch renders by description: a component produces an immutable [`VNode`]
//! tree, the runtime diffs it against the previous description, and the
//! resulting [`PatchSet`] is applied to a mutable [`LiveNode`] tree owned by
//! the [`Document`]. This crate holds those collaborator pieces; the hook
//! scheduling core lives in `latch-core`.
//!
//! ## Describing a tree
//!
//! ```rust
//! use latch_dom::*;
//!
//! let tree = h("div", [("id", Value::from("greeting"))], vec![
//!     text("hello"),
//! ]);
//! assert_eq!(tree.tag(), Some("div"));
//! ```
//!
//! ## Diffing and patching
//!
//! ```rust
//! use latch_dom::*;
//!
//! let prev = el("div", vec![text("a")]);
//! let next = el("div", vec![text("b")]);
//!
//! let live = create_handle(&prev);
//! let patches = diff(&prev, &next);
//! apply(&live, &patches).unwrap();
//! ```
//!
//! Identical handler-free trees diff to an empty patch set; untouched
//! subtrees keep their live nodes across patches.
//!
//! ## The commit channel
//!
//! The [`Document`] announces `Attached` after every mount or re-patch and
//! `Detached` on unmount, synchronously, to every subscriber. Effect
//! scheduling in `latch-core` is driven entirely by those two events.

pub mod diff;
pub mod host;
pub mod live;
pub mod structural;
pub mod value;
pub mod vnode;

pub use diff::*;
pub use host::*;
pub use live::*;
pub use structural::{CompareError, equal, fingerprint};
pub use value::*;
pub use vnode::*;
