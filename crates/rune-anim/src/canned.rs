//! Single-property animations over a scene object.
//!
//! [`BaseAnimation`] pairs one [`Animator`] with an [`AnimationHooks`]
//! implementation that decides the start and end state. The presets here
//! (fade, move, scale, pop-in) cover the common cases; custom hooks cover
//! the rest.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::animator::{Animator, PropertyAccessor};
use crate::easing::Easing;
use crate::playable::Playable;
use crate::scheduler::Scheduler;
use crate::value::{AnimValue, Point, ValueKind};

/// The properties a canned animation can drive.
pub trait AnimationTarget {
    fn alpha(&self) -> f64;
    fn set_alpha(&mut self, alpha: f64);
    fn position(&self) -> Point;
    fn set_position(&mut self, position: Point);
    fn scale(&self) -> Point;
    fn set_scale(&mut self, scale: Point);
}

/// Shared handle to an animation target.
pub type SharedTarget = Rc<RefCell<dyn AnimationTarget>>;

pub fn alpha_accessor(target: &SharedTarget) -> PropertyAccessor {
    PropertyAccessor::for_target(
        target,
        "alpha",
        |t| AnimValue::Number(t.alpha()),
        |t, v| {
            if let Some(alpha) = v.as_number() {
                t.set_alpha(alpha);
            }
        },
    )
}

pub fn position_accessor(target: &SharedTarget) -> PropertyAccessor {
    PropertyAccessor::for_target(
        target,
        "position",
        |t| AnimValue::Point(t.position()),
        |t, v| {
            if let Some(p) = v.as_point() {
                t.set_position(*p);
            }
        },
    )
}

pub fn scale_accessor(target: &SharedTarget) -> PropertyAccessor {
    PropertyAccessor::for_target(
        target,
        "scale",
        |t| AnimValue::Point(t.scale()),
        |t, v| {
            if let Some(s) = v.as_point() {
                t.set_scale(*s);
            }
        },
    )
}

/// Start/end state setup for a [`BaseAnimation`].
pub trait AnimationHooks {
    /// Put the target in its starting state before the animator reads it.
    fn init_start_state(&self, _target: &SharedTarget) {}

    /// Register the destination properties on the animator.
    fn init_end_state(&self, target: &SharedTarget, animator: &Animator);
}

/// An animator bound to one target, set up by hooks on first play.
pub struct BaseAnimation<H: AnimationHooks> {
    target: SharedTarget,
    animator: Animator,
    hooks: H,
    initialized: Cell<bool>,
}

impl<H: AnimationHooks> BaseAnimation<H> {
    pub fn new(target: SharedTarget, animator: Animator, hooks: H) -> Self {
        Self {
            target,
            animator,
            hooks,
            initialized: Cell::new(false),
        }
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn target(&self) -> &SharedTarget {
        &self.target
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }
}

impl<H: AnimationHooks> Playable for BaseAnimation<H> {
    fn play_now(&self) {
        self.initialize();
        self.animator.play_now();
    }

    fn play_deferred(&self) {
        self.initialize();
        self.animator.play_deferred();
    }

    fn stop(&self, jump_to_end: bool) {
        self.animator.stop(jump_to_end);
    }

    fn duration(&self) -> f64 {
        self.animator.duration()
    }

    fn is_running(&self) -> bool {
        self.animator.is_running()
    }

    fn initialize(&self) {
        if self.initialized.replace(true) {
            return;
        }
        self.hooks.init_start_state(&self.target);
        self.hooks.init_end_state(&self.target, &self.animator);
    }

    fn on_complete(&self, listener: Box<dyn FnMut()>) {
        self.animator.on_complete(listener);
    }
}

/// Alpha from 0 to 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct FadeIn;

impl AnimationHooks for FadeIn {
    fn init_start_state(&self, target: &SharedTarget) {
        target.borrow_mut().set_alpha(0.0);
    }

    fn init_end_state(&self, target: &SharedTarget, animator: &Animator) {
        animator.add_property(alpha_accessor(target), ValueKind::Number, 1.0);
    }
}

/// Alpha to 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct FadeOut;

impl AnimationHooks for FadeOut {
    fn init_end_state(&self, target: &SharedTarget, animator: &Animator) {
        animator.add_property(alpha_accessor(target), ValueKind::Number, 0.0);
    }
}

/// Position offset by `(dx, dy)` from wherever the target is at initialization.
#[derive(Debug, Clone, Copy)]
pub struct MoveBy {
    pub dx: f64,
    pub dy: f64,
}

impl AnimationHooks for MoveBy {
    fn init_end_state(&self, target: &SharedTarget, animator: &Animator) {
        let from = target.borrow().position();
        let dest = Point::new(from.x + self.dx, from.y + self.dy);
        animator.add_property(position_accessor(target), ValueKind::Point, dest);
    }
}

/// Position to an absolute point.
#[derive(Debug, Clone, Copy)]
pub struct MoveTo {
    pub position: Point,
}

impl AnimationHooks for MoveTo {
    fn init_end_state(&self, target: &SharedTarget, animator: &Animator) {
        animator.add_property(position_accessor(target), ValueKind::Point, self.position);
    }
}

/// Scale to an absolute per-axis factor.
#[derive(Debug, Clone, Copy)]
pub struct ScaleTo {
    pub scale: Point,
}

impl AnimationHooks for ScaleTo {
    fn init_end_state(&self, target: &SharedTarget, animator: &Animator) {
        animator.add_property(scale_accessor(target), ValueKind::Point, self.scale);
    }
}

/// Scale from 0 to 1 with a back-out overshoot.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopIn;

impl AnimationHooks for PopIn {
    fn init_start_state(&self, target: &SharedTarget) {
        target.borrow_mut().set_scale(Point::new(0.0, 0.0));
    }

    fn init_end_state(&self, target: &SharedTarget, animator: &Animator) {
        animator.set_easing(Easing::back_out());
        animator.add_property(scale_accessor(target), ValueKind::Point, Point::new(1.0, 1.0));
    }
}

pub fn fade_in(target: &SharedTarget, scheduler: &Scheduler) -> BaseAnimation<FadeIn> {
    BaseAnimation::new(target.clone(), Animator::new(scheduler), FadeIn)
}

pub fn fade_out(target: &SharedTarget, scheduler: &Scheduler) -> BaseAnimation<FadeOut> {
    BaseAnimation::new(target.clone(), Animator::new(scheduler), FadeOut)
}

pub fn move_by(target: &SharedTarget, scheduler: &Scheduler, dx: f64, dy: f64) -> BaseAnimation<MoveBy> {
    BaseAnimation::new(target.clone(), Animator::new(scheduler), MoveBy { dx, dy })
}

pub fn move_to(target: &SharedTarget, scheduler: &Scheduler, position: Point) -> BaseAnimation<MoveTo> {
    BaseAnimation::new(target.clone(), Animator::new(scheduler), MoveTo { position })
}

pub fn scale_to(target: &SharedTarget, scheduler: &Scheduler, scale: Point) -> BaseAnimation<ScaleTo> {
    BaseAnimation::new(target.clone(), Animator::new(scheduler), ScaleTo { scale })
}

pub fn pop_in(target: &SharedTarget, scheduler: &Scheduler) -> BaseAnimation<PopIn> {
    BaseAnimation::new(target.clone(), Animator::new(scheduler), PopIn)
}
