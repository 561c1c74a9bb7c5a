//! Commit-driven effect scheduler.
//!
//! Effects never run during a render; they run when the document announces
//! that the rendered tree has actually been committed. The attached pass
//! visits every record in call-index order and re-runs exactly the ones whose
//! dependency snapshot changed, each preceded by its previous cleanup. The
//! detached pass fires every outstanding cleanup exactly once.
//!
//! No registry borrow is ever held while a callback or cleanup runs, so an
//! effect is free to write state re-entrantly; the render that write triggers
//! re-registers into the same records, and the follow-up attached pass is
//! queued by the document behind the one in flight.

use std::cell::RefCell;

use latch_dom::structural;

use crate::effects::{Cleanup, Deps, EffectFn, EffectRegistry};
use crate::error::RuntimeError;

enum Verdict {
    Skip,
    Run,
    /// Run, then promote this snapshot to the new comparison baseline.
    RunAndPromote(Deps),
}

pub(crate) fn run_attached(effects: &RefCell<EffectRegistry>) -> Result<(), RuntimeError> {
    let count = effects.borrow().len();
    for index in 0..count {
        let verdict = decide(&effects.borrow(), index)?;

        let (callback, cleanup) = match verdict {
            Verdict::Skip => continue,
            Verdict::Run | Verdict::RunAndPromote(_) => {
                let mut registry = effects.borrow_mut();
                let record = registry.record_mut(index);
                (record.callback.clone(), record.cleanup.take())
            }
        };

        let next_cleanup = execute(index, callback, cleanup);

        let mut registry = effects.borrow_mut();
        let record = registry.record_mut(index);
        record.cleanup = next_cleanup;
        if let Verdict::RunAndPromote(deps) = verdict {
            record.prev_deps = Some(deps);
        }
    }
    Ok(())
}

fn decide(registry: &EffectRegistry, index: usize) -> Result<Verdict, RuntimeError> {
    let record = registry.record(index);
    if !record.tracked {
        return Ok(Verdict::Run);
    }

    // Tracked records always hold a pending snapshot once registered.
    let pending = record.pending_deps.as_ref().expect("tracked effect without snapshot");
    let Some(prev) = record.prev_deps.as_ref() else {
        // First evaluation: run, and adopt the fresh snapshot as baseline.
        return Ok(Verdict::RunAndPromote(pending.clone()));
    };

    if deps_equal(prev, pending)? {
        log::trace!("effect {index}: deps unchanged, skipping");
        Ok(Verdict::Skip)
    } else {
        log::trace!("effect {index}: deps changed, re-running");
        Ok(Verdict::RunAndPromote(pending.clone()))
    }
}

fn deps_equal(prev: &Deps, pending: &Deps) -> Result<bool, RuntimeError> {
    if prev.len() != pending.len() {
        return Ok(false);
    }
    for (a, b) in prev.iter().zip(pending) {
        if !structural::equal(a, b)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Cleanup-then-execute, with no registry borrow held.
fn execute(index: usize, callback: EffectFn, cleanup: Option<Cleanup>) -> Option<Cleanup> {
    if let Some(cleanup) = cleanup {
        log::trace!("effect {index}: running previous cleanup");
        cleanup();
    }
    callback()
}

/// Full teardown on detachment: every outstanding cleanup fires exactly once,
/// whether the effect's last evaluation ran or was skipped.
pub(crate) fn run_detached(effects: &RefCell<EffectRegistry>) {
    let count = effects.borrow().len();
    for index in 0..count {
        let cleanup = effects.borrow_mut().record_mut(index).cleanup.take();
        if let Some(cleanup) = cleanup {
            log::trace!("effect {index}: final cleanup");
            cleanup();
        }
    }
}
