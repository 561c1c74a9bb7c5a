//! Component instance, render cycle, and the mount factory.
//!
//! An instance owns its state cell and effect registry explicitly; nothing is
//! captured in ambient globals. The hook context [`Hooks`] is handed to the
//! component on every render, with the effect cursor reset at the start, so
//! the Nth hook call always lands on the Nth record. Components must make the
//! same hook calls in the same order on every render; violating that is
//! undefined behavior, not detected.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use latch_dom::diff::diff;
use latch_dom::host::{CommitEvent, Document, SubKey};
use latch_dom::live::{LiveHandle, apply, create_handle};
use latch_dom::value::Value;
use latch_dom::vnode::VNode;

use crate::effects::{Cleanup, EffectRegistry};
use crate::error::RuntimeError;
use crate::scheduler;
use crate::state::StateCell;

pub type Component = Rc<dyn Fn(&Hooks, &Value) -> VNode>;

struct Shared {
    component: Component,
    state: StateCell,
    effects: RefCell<EffectRegistry>,
    cursor: Cell<usize>,
    state_read: Cell<bool>,
    tree: RefCell<Option<VNode>>,
    live: RefCell<Option<LiveHandle>>,
    doc: Document,
    detached: Cell<bool>,
    sub_key: Cell<Option<SubKey>>,
}

/// Hook context threaded into every render of one component instance.
pub struct Hooks {
    shared: Rc<Shared>,
}

impl Hooks {
    /// Reads the instance's state cell, seeding it with `initial` on the very
    /// first read, and returns the current value with its setter.
    ///
    /// One cell per instance: a second call within the same render is a
    /// configuration error and fails fast.
    pub fn use_state(&self, initial: impl Into<Value>) -> (Value, Setter) {
        assert!(
            !self.shared.state_read.replace(true),
            "use_state called twice in one render; a component has exactly one state cell"
        );
        let current = self.shared.state.read(initial.into());
        let setter = Setter {
            shared: Rc::downgrade(&self.shared),
        };
        (current, setter)
    }

    /// Registers an effect for this render's next call-site.
    ///
    /// With `deps: None` the effect runs on every commit; with `Some(deps)`
    /// it runs when the snapshot differs structurally from the previous one
    /// (an empty array therefore runs exactly once). Registration stores the
    /// callback and snapshot only — execution is deferred until the document
    /// announces the commit.
    pub fn use_effect(
        &self,
        callback: impl Fn() -> Option<Cleanup> + 'static,
        deps: Option<&[Value]>,
    ) {
        let index = self.shared.cursor.get();
        self.shared.cursor.set(index + 1);
        self.shared
            .effects
            .borrow_mut()
            .register(index, Rc::new(callback), deps);
    }
}

/// Cloneable write handle to a component's state cell.
///
/// `set` shallow-merges into the held value and synchronously drives a full
/// render cycle — the tree is re-rendered and patched before `set` returns.
/// Safe to call from handlers and from running effects.
#[derive(Clone)]
pub struct Setter {
    shared: Weak<Shared>,
}

impl Setter {
    pub fn set(&self, next: impl Into<Value>) -> Result<(), RuntimeError> {
        let Some(shared) = self.shared.upgrade() else {
            log::warn!("state write ignored: component instance is gone");
            return Ok(());
        };
        if shared.detached.get() {
            log::warn!("state write ignored: live tree is detached");
            return Ok(());
        }
        let merged = shared.state.write_merged(next.into());
        render_cycle(&shared, &merged)?;
        shared.doc.committed()?;
        Ok(())
    }
}

/// Constructs a component instance, renders it once, and mounts the live
/// tree into `doc`. The returned handle is the live host representation; all
/// further interaction goes through rendered handlers and the document.
pub fn mount(
    doc: &Document,
    component: impl Fn(&Hooks, &Value) -> VNode + 'static,
    initial: impl Into<Value>,
) -> Result<LiveHandle, RuntimeError> {
    let shared = Rc::new(Shared {
        component: Rc::new(component),
        state: StateCell::new(),
        effects: RefCell::new(EffectRegistry::default()),
        cursor: Cell::new(0),
        state_read: Cell::new(false),
        tree: RefCell::new(None),
        live: RefCell::new(None),
        doc: doc.clone(),
        detached: Cell::new(false),
        sub_key: Cell::new(None),
    });

    // Subscribed once, here; the subscription keeps the instance alive until
    // the tree is detached.
    let key = doc.subscribe({
        let shared = Rc::clone(&shared);
        move |event| match event {
            CommitEvent::Attached => {
                scheduler::run_attached(&shared.effects).map_err(anyhow::Error::new)
            }
            CommitEvent::Detached => {
                shared.detached.set(true);
                scheduler::run_detached(&shared.effects);
                if let Some(key) = shared.sub_key.take() {
                    shared.doc.unsubscribe(key);
                }
                Ok(())
            }
        }
    });
    shared.sub_key.set(Some(key));

    render_cycle(&shared, &initial.into())?;
    let live = shared
        .live
        .borrow()
        .clone()
        .expect("first render creates the live tree");
    doc.mount(live.clone())?;
    Ok(live)
}

/// One render cycle: run the component, diff against the retained tree,
/// patch the live representation, retain the new tree. The first cycle has
/// nothing to diff against and creates the live tree instead.
fn render_cycle(shared: &Rc<Shared>, input: &Value) -> Result<(), RuntimeError> {
    shared.cursor.set(0);
    shared.state_read.set(false);
    let hooks = Hooks {
        shared: Rc::clone(shared),
    };
    let next = (shared.component)(&hooks, input);

    let prev = shared.tree.borrow_mut().take();
    match prev {
        None => {
            *shared.live.borrow_mut() = Some(create_handle(&next));
            *shared.tree.borrow_mut() = Some(next);
        }
        Some(prev) => {
            let patches = diff(&prev, &next);
            log::debug!("render produced {} patches", patches.len());
            *shared.tree.borrow_mut() = Some(next);
            let live = shared
                .live
                .borrow()
                .clone()
                .expect("live tree exists after first render");
            apply(&live, &patches)?;
        }
    }
    Ok(())
}
