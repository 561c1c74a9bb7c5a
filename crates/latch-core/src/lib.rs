//! # State, Effects, and the Commit-Driven Scheduler
//!
//! Latch re-runs a component function on every state change and gives it two
//! hooks that survive across those runs:
//!
//! - [`Hooks::use_state`] — the instance's one persistent state cell, read
//!   with a seed value and written through a [`Setter`] that shallow-merges
//!   and synchronously re-renders.
//! - [`Hooks::use_effect`] — a side effect whose re-execution is gated by
//!   structural comparison of its dependency snapshot across renders.
//!
//! ## A component
//!
//! ```rust
//! use latch_core::prelude::*;
//!
//! fn counter(hooks: &Hooks, _input: &Value) -> VNode {
//!     let (state, set) = hooks.use_state(Value::map([("n", Value::Int(0))]));
//!     let n = state.get("n").and_then(Value::as_int).unwrap_or(0);
//!
//!     hooks.use_effect(
//!         move || {
//!             log::info!("count is {n}");
//!             Some(Box::new(|| log::info!("count changing")) as Cleanup)
//!         },
//!         Some(&[Value::Int(n)]),
//!     );
//!
//!     el("div", vec![text(format!("{n}"))]).on("click", {
//!         move |_ev| {
//!             if let Err(e) = set.set(Value::map([("n", Value::Int(n + 1))])) {
//!                 log::error!("render failed: {e}");
//!             }
//!         }
//!     })
//! }
//! ```
//!
//! ## When effects run
//!
//! Never during the render. The render cycle diffs and patches the live tree
//! first; only when the [`Document`](latch_dom::host::Document) announces the
//! commit does the scheduler walk the registry, running each due effect after
//! its previous cleanup. On detachment every outstanding cleanup fires exactly
//! once. Effects therefore always observe the post-commit host tree.
//!
//! ## Rules
//!
//! Hook calls must happen at the same call-sites, in the same order, on every
//! render — identity is the call index. One `use_state` per instance. Both
//! are preconditions: the first is undefined behavior if broken, the second
//! fails fast.

pub mod effects;
pub mod error;
pub mod prelude;
pub mod runtime;
pub mod scheduler;
pub mod state;
pub mod tests;

pub use effects::{Cleanup, Deps, EffectFn};
pub use error::RuntimeError;
pub use prelude::*;
pub use runtime::{Component, Hooks, Setter, mount};
pub use state::StateCell;
