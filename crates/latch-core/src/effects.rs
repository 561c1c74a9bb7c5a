//! Effect records and their registry.
//!
//! Effects are keyed by call index: the Nth `use_effect` call of a render
//! always resolves to the Nth record, with the cursor reset at the start of
//! every render. That makes call-site identity explicit instead of deriving
//! it from the callback's shape; it also makes conditional or reordered hook
//! calls a precondition violation rather than something this module detects.

use std::rc::Rc;

use latch_dom::value::Value;
use smallvec::SmallVec;

/// Teardown returned by an effect, run before its next execution and on
/// detachment. Consumed on invocation.
pub type Cleanup = Box<dyn FnOnce()>;

/// An effect body: zero arguments, optionally returns a cleanup.
pub type EffectFn = Rc<dyn Fn() -> Option<Cleanup>>;

/// Dependency snapshot captured at registration time.
pub type Deps = SmallVec<[Value; 4]>;

pub(crate) struct EffectRecord {
    pub callback: EffectFn,
    /// Baseline the scheduler last decided against; absent until the first
    /// scheduler evaluation.
    pub prev_deps: Option<Deps>,
    /// Snapshot captured by the most recent render.
    pub pending_deps: Option<Deps>,
    pub cleanup: Option<Cleanup>,
    /// False for effects registered without a dependency array: those run on
    /// every pass and never carry snapshots.
    pub tracked: bool,
}

#[derive(Default)]
pub(crate) struct EffectRegistry {
    records: Vec<EffectRecord>,
}

impl EffectRegistry {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn record(&self, index: usize) -> &EffectRecord {
        &self.records[index]
    }

    pub fn record_mut(&mut self, index: usize) -> &mut EffectRecord {
        &mut self.records[index]
    }

    /// Registers the call-site at `index` for the render in progress.
    ///
    /// First registration creates the record; every later one stores the
    /// fresh callback and, for tracked effects, a deep snapshot of `deps`.
    /// Registration never executes anything.
    pub fn register(&mut self, index: usize, callback: EffectFn, deps: Option<&[Value]>) {
        if index == self.records.len() {
            self.records.push(EffectRecord {
                callback,
                prev_deps: None,
                pending_deps: deps.map(snapshot),
                cleanup: None,
                tracked: deps.is_some(),
            });
            return;
        }

        let record = &mut self.records[index];
        if record.tracked != deps.is_some() {
            // Same call-site switching between tracked and untracked is a
            // hook-ordering violation; keep the original mode.
            log::warn!("effect {index} re-registered with a different dependency shape");
        }
        record.callback = callback;
        if record.tracked {
            if let Some(deps) = deps {
                record.pending_deps = Some(snapshot(deps));
            }
        }
    }
}

/// Deep, independent copy: later mutation of the caller's array cannot
/// corrupt the stored comparison baseline.
pub(crate) fn snapshot(deps: &[Value]) -> Deps {
    deps.iter().cloned().collect()
}
