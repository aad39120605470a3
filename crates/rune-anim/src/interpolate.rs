//! Interpolation of animated property values.
//!
//! Two layers live here:
//!
//! - The [`Interpolate`] trait, implemented by the plain value types
//!   (`f64`, [`Point`], [`Rect`], colors, decomposed matrices).
//! - [`interpolate`], the kind-dispatched entry point used by the animator.
//!   It takes the caller-declared [`ValueKind`] and decides how a start and
//!   destination value blend.
//!
//! Interpolation never fails loudly. A kind/value mismatch, unparseable
//! color, or structurally different path simply resolves to the destination
//! value. The single exception is a singular matrix, which yields `None` so
//! the caller can skip the property for that frame.
//!
//! # Growth kinds
//!
//! `GrowPolyline` and `GrowPath` ignore the start value. They reveal the
//! destination from its first vertex by arc length, where the length of a
//! curve is approximated by the chord between its endpoints.

use kurbo::{CubicBez, ParamCurve, QuadBez};

use crate::color::{Color, Rgba};
use crate::matrix::Matrix;
use crate::paint::{Paint, Stroke};
use crate::path::{Path, PathCommand};
use crate::value::{AnimValue, Point, Rect, ValueKind};

/// Linear blending of a value towards another.
///
/// `t` is an eased fraction and is not clamped: back and elastic curves
/// push it past either end, and the result extrapolates along the same line.
pub trait Interpolate: Sized {
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    #[inline]
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Interpolate for Point {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Point::new(self.x.interpolate(&to.x, t), self.y.interpolate(&to.y, t))
    }
}

impl Interpolate for Rect {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Rect::new(
            self.x.interpolate(&to.x, t),
            self.y.interpolate(&to.y, t),
            self.w.interpolate(&to.w, t),
            self.h.interpolate(&to.h, t),
        )
    }
}

/// Compute the value between `start` and `dest` at `progress`.
///
/// Returns `None` only when a matrix endpoint cannot be decomposed.
pub fn interpolate(
    kind: ValueKind,
    start: &AnimValue,
    dest: &AnimValue,
    progress: f64,
) -> Option<AnimValue> {
    use AnimValue as V;

    let p = progress;
    let value = match (kind, start, dest) {
        (ValueKind::Number, V::Number(a), V::Number(b)) => V::Number(a.interpolate(b, p)),
        (ValueKind::NumberArray, V::NumberArray(a), V::NumberArray(b)) => {
            V::NumberArray(zip_hold_last(a, b, |x, y| x.interpolate(y, p)))
        }
        (ValueKind::Color, V::Color(a), V::Color(b)) => V::Color(interpolate_color(a, b, p)),
        (ValueKind::ColorArray, V::ColorArray(a), V::ColorArray(b)) => {
            V::ColorArray(zip_hold_last(a, b, |x, y| interpolate_color(x, y, p)))
        }
        (ValueKind::Matrix, V::Matrix(a), V::Matrix(b)) => V::Matrix(interpolate_matrix(a, b, p)?),
        (ValueKind::Rectangle, V::Rect(a), V::Rect(b)) => V::Rect(a.interpolate(b, p)),
        (ValueKind::Point, V::Point(a), V::Point(b)) => V::Point(a.interpolate(b, p)),
        (ValueKind::Fill, V::Fill(a), V::Fill(b)) => V::Fill(interpolate_paint(a, b, p)),
        (ValueKind::Stroke, V::Stroke(a), V::Stroke(b)) => V::Stroke(interpolate_stroke(a, b, p)),
        (ValueKind::Polyline, V::Polyline(a), V::Polyline(b)) => {
            V::Polyline(interpolate_polyline(a, b, p))
        }
        (ValueKind::Path, V::Path(a), V::Path(b)) => V::Path(interpolate_path(a, b, p)),
        (ValueKind::GrowPolyline, _, V::Polyline(b)) => V::Polyline(grow_polyline(b, p)),
        (ValueKind::GrowPath, _, V::Path(b)) => V::Path(grow_path(b, p)),
        _ => dest.clone(),
    };
    Some(value)
}

/// Element-wise blend. Where lengths differ the shorter side repeats its
/// last element; an empty side resolves to `dest`.
fn zip_hold_last<T: Clone>(start: &[T], dest: &[T], mut blend: impl FnMut(&T, &T) -> T) -> Vec<T> {
    let (Some(start_last), Some(dest_last)) = (start.last(), dest.last()) else {
        return dest.to_vec();
    };
    let len = start.len().max(dest.len());
    (0..len)
        .map(|i| {
            let s = start.get(i).unwrap_or(start_last);
            let d = dest.get(i).unwrap_or(dest_last);
            blend(s, d)
        })
        .collect()
}

fn interpolate_color(start: &Color, dest: &Color, p: f64) -> Color {
    if p == 0.0 {
        return start.clone();
    }
    if p == 1.0 {
        return dest.clone();
    }
    match (start.to_rgba(), dest.to_rgba()) {
        (Ok(a), Ok(b)) => Color::from(Rgba::interpolate(&a, &b, p)),
        _ => dest.clone(),
    }
}

fn interpolate_matrix(start: &Matrix, dest: &Matrix, p: f64) -> Option<Matrix> {
    if p == 0.0 {
        return Some(*start);
    }
    if p == 1.0 {
        return Some(*dest);
    }
    let from = start.decompose()?;
    let to = dest.decompose()?;
    Some(from.interpolate(&to, p).recompose())
}

/// Solid to solid blends color and opacity; anything involving a gradient
/// snaps to `dest`.
fn interpolate_paint(start: &Paint, dest: &Paint, p: f64) -> Paint {
    match (start, dest) {
        (
            Paint::Solid {
                color: c1,
                opacity: o1,
            },
            Paint::Solid {
                color: c2,
                opacity: o2,
            },
        ) => Paint::Solid {
            color: interpolate_color(c1, c2, p),
            opacity: o1.interpolate(o2, p),
        },
        _ => dest.clone(),
    }
}

fn interpolate_stroke(start: &Stroke, dest: &Stroke, p: f64) -> Stroke {
    if !(start.paint.is_solid() && dest.paint.is_solid()) {
        return dest.clone();
    }
    Stroke {
        paint: interpolate_paint(&start.paint, &dest.paint, p),
        width: start.width.interpolate(&dest.width, p),
    }
}

fn interpolate_polyline(start: &[Point], dest: &[Point], p: f64) -> Vec<Point> {
    let mut points = zip_hold_last(start, dest, |a, b| a.interpolate(b, p));
    // A shorter destination collapses the extra vertices onto its last one.
    while points.len() > dest.len() && points.len() >= 2 {
        let n = points.len();
        if points[n - 1] != points[n - 2] {
            break;
        }
        points.pop();
    }
    points
}

fn interpolate_path(start: &Path, dest: &Path, p: f64) -> Path {
    let same_shape = start.len() == dest.len()
        && start
            .commands
            .iter()
            .zip(&dest.commands)
            .all(|(a, b)| a.same_kind(b));
    if !same_shape {
        return dest.clone();
    }

    let lerp = |a: &Point, b: &Point| a.interpolate(b, p);
    let commands = start
        .commands
        .iter()
        .zip(&dest.commands)
        .map(|(a, b)| match (a, b) {
            (PathCommand::MoveTo(a), PathCommand::MoveTo(b)) => PathCommand::MoveTo(lerp(a, b)),
            (PathCommand::LineTo(a), PathCommand::LineTo(b)) => PathCommand::LineTo(lerp(a, b)),
            (PathCommand::QuadTo(c1, a), PathCommand::QuadTo(c2, b)) => {
                PathCommand::QuadTo(lerp(c1, c2), lerp(a, b))
            }
            (PathCommand::CubicTo(c1, d1, a), PathCommand::CubicTo(c2, d2, b)) => {
                PathCommand::CubicTo(lerp(c1, c2), lerp(d1, d2), lerp(a, b))
            }
            _ => *b,
        })
        .collect();
    Path::new(commands)
}

fn grow_polyline(dest: &[Point], p: f64) -> Vec<Point> {
    let Some(first) = dest.first() else {
        return Vec::new();
    };
    if p <= 0.0 {
        return vec![*first];
    }
    if p >= 1.0 {
        return dest.to_vec();
    }

    let total: f64 = dest.windows(2).map(|w| w[0].distance_to(&w[1])).sum();
    if total == 0.0 {
        return dest.to_vec();
    }

    let target = p * total;
    let mut walked = 0.0;
    let mut points = vec![*first];
    for w in dest.windows(2) {
        if walked >= target {
            break;
        }
        let len = w[0].distance_to(&w[1]);
        let remaining = target - walked;
        if len <= remaining {
            points.push(w[1]);
            walked += len;
        } else {
            points.push(w[0].interpolate(&w[1], remaining / len));
            break;
        }
    }
    points
}

/// The part of a quadratic from its start up to `t`.
fn split_quad(from: Point, ctrl: Point, to: Point, t: f64) -> PathCommand {
    let head = QuadBez::new(from, ctrl, to).subsegment(0.0..t);
    PathCommand::QuadTo(head.p1.into(), head.p2.into())
}

/// The part of a cubic from its start up to `t`.
fn split_cubic(from: Point, c1: Point, c2: Point, to: Point, t: f64) -> PathCommand {
    let head = CubicBez::new(from, c1, c2, to).subsegment(0.0..t);
    PathCommand::CubicTo(head.p1.into(), head.p2.into(), head.p3.into())
}

/// Chord length of each command from the running pen position.
fn command_lengths(commands: &[PathCommand]) -> Vec<f64> {
    let mut current = Point::default();
    let mut subpath_start = Point::default();
    commands
        .iter()
        .map(|cmd| match *cmd {
            PathCommand::MoveTo(p) => {
                current = p;
                subpath_start = p;
                0.0
            }
            PathCommand::LineTo(p) | PathCommand::QuadTo(_, p) | PathCommand::CubicTo(_, _, p) => {
                let len = current.distance_to(&p);
                current = p;
                len
            }
            PathCommand::Close => {
                let len = current.distance_to(&subpath_start);
                current = subpath_start;
                len
            }
        })
        .collect()
}

fn grow_path(dest: &Path, p: f64) -> Path {
    let Some(first) = dest.commands.first() else {
        return Path::default();
    };
    if p <= 0.0 {
        return Path::new(vec![*first]);
    }
    if p >= 1.0 {
        return dest.clone();
    }

    let lengths = command_lengths(&dest.commands);
    let total: f64 = lengths.iter().sum();
    if total == 0.0 {
        return dest.clone();
    }

    let target = p * total;
    let mut walked = 0.0;
    let mut current = Point::default();
    let mut subpath_start = Point::default();
    let mut commands = Vec::new();

    for (cmd, &len) in dest.commands.iter().zip(&lengths) {
        if !commands.is_empty() && walked >= target {
            break;
        }
        let remaining = target - walked;
        if len <= remaining {
            commands.push(*cmd);
            walked += len;
            match *cmd {
                PathCommand::MoveTo(p) => {
                    current = p;
                    subpath_start = p;
                }
                PathCommand::Close => current = subpath_start,
                other => {
                    if let Some(end) = other.end_point() {
                        current = end;
                    }
                }
            }
            continue;
        }

        let t = remaining / len;
        let partial = match *cmd {
            PathCommand::LineTo(to) => PathCommand::LineTo(current.interpolate(&to, t)),
            PathCommand::QuadTo(ctrl, to) => split_quad(current, ctrl, to, t),
            PathCommand::CubicTo(c1, c2, to) => split_cubic(current, c1, c2, to, t),
            PathCommand::Close => PathCommand::LineTo(current.interpolate(&subpath_start, t)),
            // Zero length, always taken above.
            PathCommand::MoveTo(to) => PathCommand::MoveTo(to),
        };
        commands.push(partial);
        break;
    }

    Path::new(commands)
}
