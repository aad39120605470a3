//! Run several playables at once.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::frame::FrameHandle;
use crate::playable::{CompletionListeners, Playable};
use crate::scheduler::Scheduler;

struct ParallelInner {
    this: Weak<ParallelInner>,
    children: Vec<Rc<dyn Playable>>,
    scheduler: Scheduler,
    remaining: Cell<usize>,
    active: Cell<bool>,
    deferred: Cell<Option<FrameHandle>>,
    listeners: CompletionListeners,
}

/// Plays every child in the same call and completes once all of them have.
pub struct ParallelPlayable {
    inner: Rc<ParallelInner>,
}

impl ParallelPlayable {
    pub fn new(scheduler: &Scheduler, children: Vec<Rc<dyn Playable>>) -> Self {
        let inner = Rc::new_cyclic(|this: &Weak<ParallelInner>| ParallelInner {
            this: this.clone(),
            children,
            scheduler: scheduler.clone(),
            remaining: Cell::new(0),
            active: Cell::new(false),
            deferred: Cell::new(None),
            listeners: CompletionListeners::new(),
        });
        for child in &inner.children {
            let weak = Rc::downgrade(&inner);
            child.on_complete(Box::new(move || {
                if let Some(parallel) = weak.upgrade() {
                    parallel.child_completed();
                }
            }));
        }
        Self { inner }
    }

    pub fn children(&self) -> &[Rc<dyn Playable>] {
        &self.inner.children
    }
}

impl ParallelInner {
    fn child_completed(&self) {
        if !self.active.get() {
            return;
        }
        let left = self.remaining.get().saturating_sub(1);
        self.remaining.set(left);
        if left == 0 {
            self.finish();
        }
    }

    fn finish(&self) {
        if !self.active.replace(false) {
            return;
        }
        debug!(children = self.children.len(), "parallel playable completed");
        self.listeners.fire();
    }

    fn cancel_deferred(&self) {
        if let Some(handle) = self.deferred.take() {
            self.scheduler.cancel_deferred(handle);
        }
    }

    fn play_now(&self) {
        self.cancel_deferred();
        if self.active.get() {
            return;
        }
        self.active.set(true);
        self.remaining.set(self.children.len());
        debug!(children = self.children.len(), "parallel playable started");

        if self.children.is_empty() {
            // Never complete synchronously.
            let weak = self.this.clone();
            let handle = self.scheduler.defer(Box::new(move || {
                if let Some(parallel) = weak.upgrade() {
                    parallel.deferred.set(None);
                    parallel.finish();
                }
            }));
            self.deferred.set(Some(handle));
            return;
        }

        for child in &self.children {
            child.initialize();
            child.play_now();
        }
    }

    fn play_deferred(&self) {
        if self.deferred.get().is_some() || self.active.get() {
            return;
        }
        let weak = self.this.clone();
        let handle = self.scheduler.defer(Box::new(move || {
            if let Some(parallel) = weak.upgrade() {
                parallel.deferred.set(None);
                parallel.play_now();
            }
        }));
        self.deferred.set(Some(handle));
    }

    fn stop(&self, jump_to_end: bool) {
        if self.deferred.get().is_some() {
            // A pending start still counts as a play.
            self.cancel_deferred();
            self.active.set(true);
        }
        if !self.active.get() {
            return;
        }
        debug!(jump_to_end, "parallel playable stopped");
        for child in &self.children {
            if child.is_running() {
                child.stop(jump_to_end);
            }
        }
        // Children that had already finished cannot report again.
        self.finish();
    }
}

impl Playable for ParallelPlayable {
    fn play_now(&self) {
        self.inner.play_now();
    }

    fn play_deferred(&self) {
        self.inner.play_deferred();
    }

    fn stop(&self, jump_to_end: bool) {
        self.inner.stop(jump_to_end);
    }

    /// Longest child duration.
    fn duration(&self) -> f64 {
        self.inner
            .children
            .iter()
            .map(|c| c.duration())
            .fold(0.0, f64::max)
    }

    fn is_running(&self) -> bool {
        self.inner.active.get() || self.inner.deferred.get().is_some()
    }

    fn initialize(&self) {
        for child in &self.inner.children {
            child.initialize();
        }
    }

    fn on_complete(&self, listener: Box<dyn FnMut()>) {
        self.inner.listeners.add(listener);
    }
}
