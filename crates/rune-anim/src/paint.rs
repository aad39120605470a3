//! Fill and stroke paint styles.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::value::Point;

/// A color stop on a gradient ramp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the ramp in `[0, 1]`.
    pub offset: f64,
    pub color: Color,
}

impl GradientStop {
    pub fn new(offset: f64, color: impl Into<Color>) -> Self {
        Self {
            offset,
            color: color.into(),
        }
    }
}

/// How an area or outline is painted.
///
/// Only solid paints interpolate smoothly; any animation involving a
/// gradient snaps to its destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Paint {
    Solid {
        color: Color,
        opacity: f64,
    },
    LinearGradient {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
    },
    RadialGradient {
        center: Point,
        radius: f64,
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    /// Fully opaque solid paint.
    pub fn solid(color: impl Into<Color>) -> Self {
        Self::Solid {
            color: color.into(),
            opacity: 1.0,
        }
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, Self::Solid { .. })
    }
}

/// An outline: paint plus line width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f64,
}

impl Stroke {
    pub fn new(paint: Paint, width: f64) -> Self {
        Self { paint, width }
    }
}
