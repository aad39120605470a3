//! Property animation and frame scheduling for the rune 2-D scene toolkit.
//!
//! This crate provides:
//! - **Matrix**: immutable 2-D affine transforms with decomposition
//! - **Easing**: polynomial, back and elastic timing curves
//! - **Interpolation**: kind-dispatched blending of numbers, colors, matrices,
//!   paints, polylines and paths (including draw-on "grow" kinds)
//! - **Scheduler**: one frame loop per rendering context, idle when empty
//! - **Animator**: several properties on one shared timeline
//! - **Playables**: canned animations plus parallel and sequential combinators
//!
//! # Architecture
//!
//! ```text
//! FrameHost (window backend or ManualFrameHost)
//!   └── Scheduler (per context, one frame subscription)
//!         └── Animator tasks ──> interpolate(kind, start, dest, eased)
//!                                  └── PropertyAccessor setters
//!
//! Playable
//!   ├── Animator
//!   ├── BaseAnimation<FadeIn | FadeOut | MoveBy | MoveTo | ScaleTo | PopIn>
//!   ├── ParallelPlayable
//!   └── SequentialPlayable
//! ```
//!
//! Everything is single-threaded and callback driven. No entry point blocks,
//! and user callbacks (setters, completion listeners) may re-enter the engine.

pub mod animator;
pub mod canned;
pub mod color;
pub mod easing;
pub mod error;
pub mod frame;
pub mod interpolate;
pub mod matrix;
pub mod paint;
pub mod parallel;
pub mod path;
pub mod playable;
pub mod scheduler;
pub mod sequential;
pub mod value;

pub use animator::{Animator, AnimatorPhase, PropertyAccessor, PropertyKey};
pub use canned::{
    AnimationHooks, AnimationTarget, BaseAnimation, FadeIn, FadeOut, MoveBy, MoveTo, PopIn,
    ScaleTo, SharedTarget,
};
pub use color::{Color, Rgba};
pub use easing::Easing;
pub use error::{Result, ValueError};
pub use frame::{FrameCallback, FrameHandle, FrameHost, ManualFrameHost};
pub use interpolate::{Interpolate, interpolate};
pub use matrix::Matrix;
pub use paint::{GradientStop, Paint, Stroke};
pub use parallel::ParallelPlayable;
pub use path::{Path, PathCommand};
pub use playable::{CompletionListeners, Playable};
pub use scheduler::{ScheduledTask, Scheduler};
pub use sequential::SequentialPlayable;
pub use value::{AnimValue, Point, Rect, ValueKind};

pub use rune_config::AnimationConfig;
