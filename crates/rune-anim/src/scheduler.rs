//! Frame-driven task scheduler.
//!
//! One [`Scheduler`] exists per rendering context. It keeps an ordered
//! registry of [`ScheduledTask`]s and a single frame subscription on the
//! context's [`FrameHost`]:
//!
//! - Registering into an empty registry requests a frame.
//! - Each frame advances every registered task once, in registration order,
//!   and drops the ones that report they are finished.
//! - When the registry empties the subscription is dropped, so an idle
//!   scheduler requests no frames at all.
//!
//! The scheduler is a cheap cloneable handle. Animations receive it
//! explicitly instead of reaching for a global.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rune_config::AnimationConfig;
use tracing::trace;

use crate::frame::{FrameHandle, FrameHost};

/// Something advanced once per frame while registered.
pub trait ScheduledTask {
    /// Advance to `now_ms`. Returns true when the task is finished and should
    /// be dropped from the registry.
    fn process_time(&self, now_ms: f64) -> bool;
}

/// Identity of a task, independent of its vtable.
fn task_id(task: &Rc<dyn ScheduledTask>) -> *const () {
    Rc::as_ptr(task) as *const ()
}

struct SchedulerInner {
    host: Rc<dyn FrameHost>,
    config: AnimationConfig,
    tasks: RefCell<Vec<Rc<dyn ScheduledTask>>>,
    subscription: Cell<Option<FrameHandle>>,
}

/// Handle to a per-context scheduler.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<SchedulerInner>,
}

impl Scheduler {
    /// Create a scheduler with default configuration.
    pub fn new(host: Rc<dyn FrameHost>) -> Self {
        Self::with_config(host, &AnimationConfig::default())
    }

    pub fn with_config(host: Rc<dyn FrameHost>, config: &AnimationConfig) -> Self {
        Self {
            inner: Rc::new(SchedulerInner {
                host,
                config: config.clone(),
                tasks: RefCell::new(Vec::new()),
                subscription: Cell::new(None),
            }),
        }
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.inner.config
    }

    /// Current host time in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.inner.host.now_ms()
    }

    /// True when the host is offscreen and the configuration allows
    /// animations to jump to their end.
    pub fn is_offscreen(&self) -> bool {
        self.inner.config.scheduler.jump_when_offscreen && self.inner.host.is_offscreen()
    }

    /// Number of registered tasks.
    pub fn active_count(&self) -> usize {
        self.inner.tasks.borrow().len()
    }

    /// True while a frame callback is outstanding.
    pub fn is_subscribed(&self) -> bool {
        self.inner.subscription.get().is_some()
    }

    pub fn is_scheduled(&self, task: &Rc<dyn ScheduledTask>) -> bool {
        let id = task_id(task);
        self.inner.tasks.borrow().iter().any(|t| task_id(t) == id)
    }

    /// Register a task. Registering the same task twice has no effect.
    pub fn add_scheduled(&self, task: Rc<dyn ScheduledTask>) {
        if self.is_scheduled(&task) {
            return;
        }
        self.inner.tasks.borrow_mut().push(task);
        if !self.is_subscribed() {
            self.subscribe();
        }
    }

    /// Deregister a task. Unknown tasks are ignored.
    pub fn remove_scheduled(&self, task: &Rc<dyn ScheduledTask>) {
        let id = task_id(task);
        let now_empty = {
            let mut tasks = self.inner.tasks.borrow_mut();
            tasks.retain(|t| task_id(t) != id);
            tasks.is_empty()
        };
        if now_empty {
            self.unsubscribe();
        }
    }

    /// Run `callback` on the next frame. The returned handle cancels it.
    pub fn defer(&self, callback: Box<dyn FnOnce()>) -> FrameHandle {
        trace!("deferring callback to next frame");
        self.inner.host.request_frame(Box::new(move |_| callback()))
    }

    pub fn cancel_deferred(&self, handle: FrameHandle) {
        self.inner.host.cancel_frame(handle);
    }

    fn subscribe(&self) {
        let weak = Rc::downgrade(&self.inner);
        let handle = self.inner.host.request_frame(Box::new(move |now| {
            if let Some(inner) = weak.upgrade() {
                Scheduler { inner }.tick(now);
            }
        }));
        self.inner.subscription.set(Some(handle));
        trace!(tasks = self.active_count(), "scheduler subscribed to frames");
    }

    fn unsubscribe(&self) {
        if let Some(handle) = self.inner.subscription.take() {
            self.inner.host.cancel_frame(handle);
            trace!("scheduler idle, frame subscription dropped");
        }
    }

    /// Advance every registered task once.
    fn tick(&self, now: f64) {
        // The callback that got us here is spent.
        self.inner.subscription.set(None);

        let snapshot: Vec<Rc<dyn ScheduledTask>> = self.inner.tasks.borrow().clone();
        for task in snapshot {
            // Earlier tasks may have removed this one.
            if !self.is_scheduled(&task) {
                continue;
            }
            if task.process_time(now) {
                let id = task_id(&task);
                self.inner.tasks.borrow_mut().retain(|t| task_id(t) != id);
            }
        }

        if self.active_count() == 0 {
            trace!("scheduler idle");
        } else if !self.is_subscribed() {
            self.subscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ManualFrameHost;

    /// Finishes after a fixed number of frames, recording into a shared log.
    struct CountdownTask {
        name: &'static str,
        remaining: Cell<u32>,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl CountdownTask {
        fn new(name: &'static str, frames: u32, log: &Rc<RefCell<Vec<&'static str>>>) -> Rc<Self> {
            Rc::new(Self {
                name,
                remaining: Cell::new(frames),
                log: log.clone(),
            })
        }
    }

    impl ScheduledTask for CountdownTask {
        fn process_time(&self, _now_ms: f64) -> bool {
            self.log.borrow_mut().push(self.name);
            let left = self.remaining.get().saturating_sub(1);
            self.remaining.set(left);
            left == 0
        }
    }

    fn setup() -> (Rc<ManualFrameHost>, Scheduler) {
        let host = Rc::new(ManualFrameHost::new());
        let scheduler = Scheduler::new(host.clone());
        (host, scheduler)
    }

    #[test]
    fn test_idle_scheduler_requests_nothing() {
        let (host, scheduler) = setup();
        assert!(!scheduler.is_subscribed());
        host.advance(16.0);
        assert_eq!(host.request_count(), 0);
    }

    #[test]
    fn test_add_is_idempotent() {
        let (host, scheduler) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let task: Rc<dyn ScheduledTask> = CountdownTask::new("a", 5, &log);

        scheduler.add_scheduled(task.clone());
        scheduler.add_scheduled(task.clone());
        assert_eq!(scheduler.active_count(), 1);
        assert_eq!(host.request_count(), 1);

        host.advance(16.0);
        assert_eq!(*log.borrow(), vec!["a"]);
    }

    #[test]
    fn test_tasks_run_in_order_and_drain() {
        let (host, scheduler) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler.add_scheduled(CountdownTask::new("a", 1, &log));
        scheduler.add_scheduled(CountdownTask::new("b", 2, &log));

        host.advance(16.0);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert_eq!(scheduler.active_count(), 1);
        assert!(scheduler.is_subscribed());

        host.advance(16.0);
        assert_eq!(*log.borrow(), vec!["a", "b", "b"]);
        assert_eq!(scheduler.active_count(), 0);
        assert!(!scheduler.is_subscribed());

        // Drained: further frames request nothing.
        let requests = host.request_count();
        host.advance(16.0);
        host.advance(16.0);
        assert_eq!(host.request_count(), requests);
    }

    #[test]
    fn test_remove_last_cancels_subscription() {
        let (host, scheduler) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let task: Rc<dyn ScheduledTask> = CountdownTask::new("a", 3, &log);

        scheduler.add_scheduled(task.clone());
        scheduler.remove_scheduled(&task);
        assert!(!scheduler.is_subscribed());
        assert_eq!(host.pending_count(), 0);

        host.advance(16.0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_defer_and_cancel() {
        let (host, scheduler) = setup();
        let fired = Rc::new(Cell::new(0));

        let f = fired.clone();
        scheduler.defer(Box::new(move || f.set(f.get() + 1)));
        let f = fired.clone();
        let handle = scheduler.defer(Box::new(move || f.set(f.get() + 10)));
        scheduler.cancel_deferred(handle);

        assert_eq!(fired.get(), 0);
        host.advance(16.0);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_offscreen_respects_config() {
        let host = Rc::new(ManualFrameHost::new());
        host.set_offscreen(true);

        let scheduler = Scheduler::new(host.clone());
        assert!(scheduler.is_offscreen());

        let mut config = AnimationConfig::default();
        config.scheduler.jump_when_offscreen = false;
        let scheduler = Scheduler::with_config(host, &config);
        assert!(!scheduler.is_offscreen());
    }
}
