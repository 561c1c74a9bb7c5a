//! Commit-notification document.
//!
//! The document is the host side of the commit contract: it owns the mounted
//! live tree, a window title, and a subscriber list that is told synchronously
//! whenever a tree has been attached (created or re-patched into the document)
//! or detached. An event emitted while another is still being delivered is
//! queued and delivered right after — that queue is what keeps re-entrant
//! state writes from inside effects correctly ordered.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use crate::live::LiveHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitEvent {
    Attached,
    Detached,
}

new_key_type! {
    pub struct SubKey;
}

type Subscriber = Rc<dyn Fn(CommitEvent) -> anyhow::Result<()>>;

#[derive(Clone, Default)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

#[derive(Default)]
struct DocumentInner {
    title: RefCell<String>,
    root: RefCell<Option<LiveHandle>>,
    subs: RefCell<SlotMap<SubKey, Subscriber>>,
    queue: RefCell<VecDeque<CommitEvent>>,
    delivering: Cell<bool>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> String {
        self.inner.title.borrow().clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        *self.inner.title.borrow_mut() = title.into();
    }

    pub fn root(&self) -> Option<LiveHandle> {
        self.inner.root.borrow().clone()
    }

    pub fn subscribe(
        &self,
        f: impl Fn(CommitEvent) -> anyhow::Result<()> + 'static,
    ) -> SubKey {
        self.inner.subs.borrow_mut().insert(Rc::new(f))
    }

    pub fn unsubscribe(&self, key: SubKey) {
        self.inner.subs.borrow_mut().remove(key);
    }

    /// Mounts a live tree and announces the attachment.
    pub fn mount(&self, root: LiveHandle) -> anyhow::Result<()> {
        *self.inner.root.borrow_mut() = Some(root);
        self.emit(CommitEvent::Attached)
    }

    /// Announces that the mounted tree was re-patched in place.
    pub fn committed(&self) -> anyhow::Result<()> {
        self.emit(CommitEvent::Attached)
    }

    /// Removes the mounted tree and announces the detachment.
    pub fn unmount(&self) -> anyhow::Result<()> {
        self.inner.root.borrow_mut().take();
        self.emit(CommitEvent::Detached)
    }

    fn emit(&self, event: CommitEvent) -> anyhow::Result<()> {
        self.inner.queue.borrow_mut().push_back(event);
        if self.inner.delivering.get() {
            // A delivery pass is already draining the queue above us.
            return Ok(());
        }
        self.inner.delivering.set(true);
        let result = self.drain();
        self.inner.delivering.set(false);
        if result.is_err() {
            self.inner.queue.borrow_mut().clear();
        }
        result
    }

    fn drain(&self) -> anyhow::Result<()> {
        loop {
            let Some(event) = self.inner.queue.borrow_mut().pop_front() else {
                return Ok(());
            };
            log::debug!("delivering commit event {event:?}");
            let subscribers: Vec<Subscriber> = self.inner.subs.borrow().values().cloned().collect();
            for sub in subscribers {
                sub(event)?;
            }
        }
    }
}
