//! Run playables one after another.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::frame::FrameHandle;
use crate::playable::{CompletionListeners, Playable};
use crate::scheduler::Scheduler;

struct SequentialInner {
    this: Weak<SequentialInner>,
    children: Vec<Rc<dyn Playable>>,
    scheduler: Scheduler,
    index: Cell<usize>,
    active: Cell<bool>,
    stopping: Cell<bool>,
    deferred: Cell<Option<FrameHandle>>,
    listeners: CompletionListeners,
}

/// Starts each child when its predecessor completes; completes after the
/// last one.
///
/// Children are initialized only when they start, so a relative animation
/// such as a move-by picks up where the previous child left the target.
pub struct SequentialPlayable {
    inner: Rc<SequentialInner>,
}

impl SequentialPlayable {
    pub fn new(scheduler: &Scheduler, children: Vec<Rc<dyn Playable>>) -> Self {
        let inner = Rc::new_cyclic(|this: &Weak<SequentialInner>| SequentialInner {
            this: this.clone(),
            children,
            scheduler: scheduler.clone(),
            index: Cell::new(0),
            active: Cell::new(false),
            stopping: Cell::new(false),
            deferred: Cell::new(None),
            listeners: CompletionListeners::new(),
        });
        for (i, child) in inner.children.iter().enumerate() {
            let weak = Rc::downgrade(&inner);
            child.on_complete(Box::new(move || {
                if let Some(sequence) = weak.upgrade() {
                    sequence.child_completed(i);
                }
            }));
        }
        Self { inner }
    }

    pub fn children(&self) -> &[Rc<dyn Playable>] {
        &self.inner.children
    }

    /// Index of the child currently playing.
    pub fn current_index(&self) -> Option<usize> {
        self.inner.active.get().then(|| self.inner.index.get())
    }
}

impl SequentialInner {
    fn start_child(&self, index: usize) {
        self.index.set(index);
        if let Some(child) = self.children.get(index) {
            debug!(index, "sequential playable advancing");
            child.initialize();
            child.play_now();
        }
    }

    fn child_completed(&self, index: usize) {
        if !self.active.get() || index != self.index.get() {
            return;
        }
        if self.stopping.get() || index + 1 >= self.children.len() {
            self.finish();
        } else {
            self.start_child(index + 1);
        }
    }

    fn finish(&self) {
        if !self.active.replace(false) {
            return;
        }
        self.stopping.set(false);
        debug!(children = self.children.len(), "sequential playable completed");
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
        self.stopping.set(false);

        if self.children.is_empty() {
            let weak = self.this.clone();
            let handle = self.scheduler.defer(Box::new(move || {
                if let Some(sequence) = weak.upgrade() {
                    sequence.deferred.set(None);
                    sequence.finish();
                }
            }));
            self.deferred.set(Some(handle));
            return;
        }

        self.start_child(0);
    }

    fn play_deferred(&self) {
        if self.deferred.get().is_some() || self.active.get() {
            return;
        }
        let weak = self.this.clone();
        let handle = self.scheduler.defer(Box::new(move || {
            if let Some(sequence) = weak.upgrade() {
                sequence.deferred.set(None);
                sequence.play_now();
            }
        }));
        self.deferred.set(Some(handle));
    }

    /// Stop the active child only; the rest never start.
    fn stop(&self, jump_to_end: bool) {
        if self.deferred.get().is_some() {
            self.cancel_deferred();
            self.active.set(true);
        }
        if !self.active.get() {
            return;
        }
        debug!(jump_to_end, index = self.index.get(), "sequential playable stopped");
        self.stopping.set(true);
        if let Some(child) = self.children.get(self.index.get()) {
            if child.is_running() {
                child.stop(jump_to_end);
            }
        }
        self.finish();
    }
}

impl Playable for SequentialPlayable {
    fn play_now(&self) {
        self.inner.play_now();
    }

    fn play_deferred(&self) {
        self.inner.play_deferred();
    }

    fn stop(&self, jump_to_end: bool) {
        self.inner.stop(jump_to_end);
    }

    /// Sum of child durations.
    fn duration(&self) -> f64 {
        self.inner.children.iter().map(|c| c.duration()).sum()
    }

    fn is_running(&self) -> bool {
        self.inner.active.get() || self.inner.deferred.get().is_some()
    }

    /// Only the first child can be prepared ahead of time.
    fn initialize(&self) {
        if let Some(first) = self.inner.children.first() {
            first.initialize();
        }
    }

    fn on_complete(&self, listener: Box<dyn FnMut()>) {
        self.inner.listeners.add(listener);
    }
}
