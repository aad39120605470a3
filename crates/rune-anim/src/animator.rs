//! Multi-property animator.
//!
//! An [`Animator`] drives any number of properties along one shared
//! timeline. Each property is reached through a [`PropertyAccessor`]
//! (a getter/setter pair) and carries the caller-declared [`ValueKind`]
//! that tells the interpolator how to blend it.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --play--> Running --progress 1--> Uninitialized
//!                            |
//!                         stop (progress < 1)
//!                            v
//!                          Begun --play--> Running (resumes at last progress)
//! ```
//!
//! Start values are read from the getters once, on the transition out of
//! `Uninitialized`. A stopped animation keeps them and resumes from its last
//! progress; a completed one forgets them so the next play starts afresh.
//!
//! # Timeline
//!
//! The timeline is `duration + delay` seconds long. The delay comes first:
//! while raw progress is below `delay / (duration + delay)` nothing is
//! applied, and the remainder is rescaled to `[0, 1]` before easing.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::easing::Easing;
use crate::frame::FrameHandle;
use crate::interpolate::interpolate;
use crate::playable::{CompletionListeners, Playable};
use crate::scheduler::{ScheduledTask, Scheduler};
use crate::value::{AnimValue, ValueKind};

/// Identity of an animated property: the target object plus a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyKey {
    target: usize,
    name: String,
}

impl PropertyKey {
    /// Key a property of `target` by the target's address.
    pub fn new<T: ?Sized>(target: &Rc<T>, name: impl Into<String>) -> Self {
        Self {
            target: Rc::as_ptr(target) as *const () as usize,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Getter/setter pair for one property of one target.
#[derive(Clone)]
pub struct PropertyAccessor {
    key: PropertyKey,
    getter: Rc<dyn Fn() -> AnimValue>,
    setter: Rc<dyn Fn(AnimValue)>,
}

impl PropertyAccessor {
    pub fn new(
        key: PropertyKey,
        getter: impl Fn() -> AnimValue + 'static,
        setter: impl Fn(AnimValue) + 'static,
    ) -> Self {
        Self {
            key,
            getter: Rc::new(getter),
            setter: Rc::new(setter),
        }
    }

    /// Build an accessor over a shared, mutable target.
    ///
    /// The target is borrowed only for the duration of each get or set.
    pub fn for_target<T: ?Sized + 'static>(
        target: &Rc<RefCell<T>>,
        name: &str,
        get: impl Fn(&T) -> AnimValue + 'static,
        set: impl Fn(&mut T, AnimValue) + 'static,
    ) -> Self {
        let (g, s) = (target.clone(), target.clone());
        Self::new(
            PropertyKey::new(target, name),
            move || get(&g.borrow()),
            move |value| set(&mut s.borrow_mut(), value),
        )
    }

    pub fn key(&self) -> &PropertyKey {
        &self.key
    }

    pub fn get(&self) -> AnimValue {
        (self.getter)()
    }

    pub fn set(&self, value: AnimValue) {
        (self.setter)(value)
    }
}

impl fmt::Debug for PropertyAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyAccessor")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Where an animator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorPhase {
    /// Start values not captured yet.
    Uninitialized,
    /// Start values captured, not advancing.
    Begun,
    /// Registered with the scheduler and advancing.
    Running,
}

#[derive(Debug)]
struct AnimatedProperty {
    accessor: PropertyAccessor,
    kind: ValueKind,
    start: Option<AnimValue>,
    dest: AnimValue,
}

struct AnimatorState {
    phase: AnimatorPhase,
    duration: f64,
    delay: f64,
    easing: Easing,
    progress: f64,
    start_time: f64,
    /// Completion already fired for the current play.
    ended: bool,
    deferred: Option<FrameHandle>,
    properties: Vec<AnimatedProperty>,
}

impl AnimatorState {
    fn total_ms(&self) -> f64 {
        1000.0 * (self.duration + self.delay)
    }

    fn delay_fraction(&self) -> f64 {
        let total = self.duration + self.delay;
        if total > 0.0 { self.delay / total } else { 0.0 }
    }
}

struct AnimatorInner {
    this: Weak<AnimatorInner>,
    scheduler: Scheduler,
    state: RefCell<AnimatorState>,
    listeners: CompletionListeners,
}

/// Handle to a shared animator. Clones refer to the same animation.
#[derive(Clone)]
pub struct Animator {
    inner: Rc<AnimatorInner>,
}

impl Animator {
    /// Create an animator with the timing defaults of the scheduler's
    /// configuration.
    pub fn new(scheduler: &Scheduler) -> Self {
        let defaults = &scheduler.config().defaults;
        let easing = defaults.easing.parse::<Easing>().unwrap_or_else(|err| {
            warn!(%err, "falling back to linear easing");
            Easing::Linear
        });
        Self::with_timing(scheduler, defaults.duration, defaults.delay, easing)
    }

    pub fn with_timing(scheduler: &Scheduler, duration: f64, delay: f64, easing: Easing) -> Self {
        let state = AnimatorState {
            phase: AnimatorPhase::Uninitialized,
            duration: duration.max(0.0),
            delay: delay.max(0.0),
            easing,
            progress: 0.0,
            start_time: 0.0,
            ended: true,
            deferred: None,
            properties: Vec::new(),
        };
        Self {
            inner: Rc::new_cyclic(|this| AnimatorInner {
                this: this.clone(),
                scheduler: scheduler.clone(),
                state: RefCell::new(state),
                listeners: CompletionListeners::new(),
            }),
        }
    }

    pub fn with_duration(self, duration: f64) -> Self {
        self.set_duration(duration);
        self
    }

    pub fn with_delay(self, delay: f64) -> Self {
        self.set_delay(delay);
        self
    }

    pub fn with_easing(self, easing: Easing) -> Self {
        self.set_easing(easing);
        self
    }

    pub fn set_duration(&self, duration: f64) {
        self.inner.state.borrow_mut().duration = duration.max(0.0);
    }

    pub fn delay(&self) -> f64 {
        self.inner.state.borrow().delay
    }

    pub fn set_delay(&self, delay: f64) {
        self.inner.state.borrow_mut().delay = delay.max(0.0);
    }

    pub fn easing(&self) -> Easing {
        self.inner.state.borrow().easing
    }

    pub fn set_easing(&self, easing: Easing) {
        self.inner.state.borrow_mut().easing = easing;
    }

    /// Raw timeline progress in `[0, 1]`, delay included.
    pub fn progress(&self) -> f64 {
        self.inner.state.borrow().progress
    }

    pub fn phase(&self) -> AnimatorPhase {
        self.inner.state.borrow().phase
    }

    pub fn property_count(&self) -> usize {
        self.inner.state.borrow().properties.len()
    }

    /// Animate the property behind `accessor` to `dest`.
    ///
    /// A property with the same key replaces the earlier kind and
    /// destination. If the animation has already begun, the start value is
    /// read now.
    pub fn add_property(&self, accessor: PropertyAccessor, kind: ValueKind, dest: impl Into<AnimValue>) {
        let dest = dest.into();
        let capture_now = self.phase() != AnimatorPhase::Uninitialized;

        let mut state = self.inner.state.borrow_mut();
        if let Some(existing) = state
            .properties
            .iter_mut()
            .find(|p| p.accessor.key == accessor.key)
        {
            existing.kind = kind;
            existing.dest = dest;
            existing.accessor = accessor;
            return;
        }
        drop(state);

        let start = capture_now.then(|| accessor.get());
        self.inner.state.borrow_mut().properties.push(AnimatedProperty {
            accessor,
            kind,
            start,
            dest,
        });
    }

    /// Current start and destination of a property, if registered.
    pub fn endpoints(&self, key: &PropertyKey) -> Option<(Option<AnimValue>, AnimValue)> {
        let state = self.inner.state.borrow();
        state
            .properties
            .iter()
            .find(|p| &p.accessor.key == key)
            .map(|p| (p.start.clone(), p.dest.clone()))
    }

    /// Apply the value at `progress` and return whether the timeline is over.
    ///
    /// Exposed for hosts that want to drive an animator by hand.
    pub fn process_time(&self, now_ms: f64) -> bool {
        self.inner.process_time(now_ms)
    }
}

impl AnimatorInner {
    fn task(&self) -> Option<Rc<dyn ScheduledTask>> {
        self.this.upgrade().map(|rc| rc as Rc<dyn ScheduledTask>)
    }

    fn deregister(&self) {
        if let Some(task) = self.task() {
            self.scheduler.remove_scheduled(&task);
        }
    }

    fn cancel_deferred(&self) {
        let handle = self.state.borrow_mut().deferred.take();
        if let Some(handle) = handle {
            self.scheduler.cancel_deferred(handle);
        }
    }

    /// Read every missing start value. Getters run without the state borrowed.
    fn capture_starts(&self) {
        let pending: Vec<(usize, PropertyAccessor)> = {
            let state = self.state.borrow();
            state
                .properties
                .iter()
                .enumerate()
                .filter(|(_, p)| p.start.is_none())
                .map(|(i, p)| (i, p.accessor.clone()))
                .collect()
        };
        let values: Vec<(usize, AnimValue)> =
            pending.into_iter().map(|(i, a)| (i, a.get())).collect();

        let mut state = self.state.borrow_mut();
        for (i, value) in values {
            if let Some(property) = state.properties.get_mut(i) {
                property.start = Some(value);
            }
        }
    }

    fn play_now(&self) {
        self.cancel_deferred();

        if self.state.borrow().phase == AnimatorPhase::Uninitialized {
            self.capture_starts();
        }

        let now = self.scheduler.now_ms();
        {
            let mut state = self.state.borrow_mut();
            state.start_time = now - state.progress * state.total_ms();
            state.phase = AnimatorPhase::Running;
            state.ended = false;
            debug!(
                duration = state.duration,
                delay = state.delay,
                progress = state.progress,
                properties = state.properties.len(),
                "animator playing"
            );
        }

        if let Some(task) = self.task() {
            self.scheduler.add_scheduled(task);
        }
    }

    fn play_deferred(&self) {
        if self.state.borrow().deferred.is_some() {
            return;
        }
        let weak = self.this.clone();
        let handle = self.scheduler.defer(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.state.borrow_mut().deferred = None;
                inner.play_now();
            }
        }));
        let mut state = self.state.borrow_mut();
        state.deferred = Some(handle);
        state.ended = false;
    }

    /// Set every property to its value at raw timeline `progress`.
    fn apply(&self, progress: f64) {
        let (adjusted, easing, work) = {
            let mut state = self.state.borrow_mut();
            state.progress = progress;
            let delay_fraction = state.delay_fraction();
            if progress < delay_fraction {
                return;
            }
            let adjusted = if delay_fraction < 1.0 {
                (progress - delay_fraction) / (1.0 - delay_fraction)
            } else {
                1.0
            };
            let work: Vec<_> = state
                .properties
                .iter()
                .filter_map(|p| {
                    p.start
                        .clone()
                        .map(|start| (p.accessor.clone(), p.kind, start, p.dest.clone()))
                })
                .collect();
            (adjusted, state.easing, work)
        };

        let eased = easing.evaluate(adjusted);
        for (accessor, kind, start, dest) in work {
            match interpolate(kind, &start, &dest, eased) {
                Some(value) => accessor.set(value),
                // Singular matrix: skip the frame, but settle on the last one.
                None if progress >= 1.0 => accessor.set(dest),
                None => {}
            }
        }
    }

    /// Reset for the next play and fire completion.
    fn finish(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.phase = AnimatorPhase::Uninitialized;
            state.progress = 0.0;
            state.ended = true;
            for property in &mut state.properties {
                property.start = None;
            }
        }
        self.deregister();
        debug!("animator completed");
        self.listeners.fire();
    }

    fn stop(&self, jump_to_end: bool) {
        let was_deferred = self.state.borrow().deferred.is_some();
        self.cancel_deferred();
        self.deregister();

        if jump_to_end {
            let phase = self.state.borrow().phase;
            // A pending deferred start has not read its start values yet.
            if phase == AnimatorPhase::Uninitialized && was_deferred {
                self.capture_starts();
            }
            if phase != AnimatorPhase::Uninitialized || was_deferred {
                self.apply(1.0);
            }
        }

        let already_ended = {
            let mut state = self.state.borrow_mut();
            if state.progress >= 1.0 {
                state.phase = AnimatorPhase::Uninitialized;
                state.progress = 0.0;
                for property in &mut state.properties {
                    property.start = None;
                }
            } else if state.phase == AnimatorPhase::Running {
                state.phase = AnimatorPhase::Begun;
            }
            std::mem::replace(&mut state.ended, true)
        };

        debug!(jump_to_end, "animator stopped");
        if !already_ended {
            self.listeners.fire();
        }
    }

    fn is_running(&self) -> bool {
        let state = self.state.borrow();
        state.phase == AnimatorPhase::Running || state.deferred.is_some()
    }
}

impl ScheduledTask for AnimatorInner {
    fn process_time(&self, now_ms: f64) -> bool {
        let progress = {
            let state = self.state.borrow();
            if state.phase != AnimatorPhase::Running {
                return true;
            }
            let elapsed = now_ms - state.start_time;
            if elapsed < 0.0 {
                return false;
            }
            let total = state.total_ms();
            if total <= 0.0 {
                1.0
            } else {
                (elapsed / total).min(1.0)
            }
        };
        let progress = if self.scheduler.is_offscreen() { 1.0 } else { progress };

        self.apply(progress);
        if progress < 1.0 {
            return false;
        }

        self.finish();
        // A completion listener may have replayed us.
        !self.is_running()
    }
}

impl Playable for Animator {
    fn play_now(&self) {
        self.inner.play_now();
    }

    fn play_deferred(&self) {
        self.inner.play_deferred();
    }

    fn stop(&self, jump_to_end: bool) {
        self.inner.stop(jump_to_end);
    }

    /// Duration plus delay, in seconds.
    fn duration(&self) -> f64 {
        let state = self.inner.state.borrow();
        state.duration + state.delay
    }

    fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    fn on_complete(&self, listener: Box<dyn FnMut()>) {
        self.inner.listeners.add(listener);
    }
}
