//! Animatable value types.
//!
//! - `Point`, `Rect`: plain geometry value objects
//! - `AnimValue`: the data of an animated property
//! - `ValueKind`: how a property is interpolated, declared by the caller
//!
//! The kind is never inferred from the value. The same point list can be
//! animated vertex by vertex (`Polyline`) or drawn on by arc length
//! (`GrowPolyline`), and only the caller knows which one it wants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::ValueError;
use crate::matrix::Matrix;
use crate::paint::{Paint, Stroke};
use crate::path::Path;

/// A 2-D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// Declared interpolation kind of an animated property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    Number,
    NumberArray,
    Color,
    ColorArray,
    Matrix,
    Rectangle,
    Point,
    Fill,
    Stroke,
    Polyline,
    Path,
    /// Polyline revealed by arc-length fraction.
    GrowPolyline,
    /// Path revealed by arc-length fraction.
    GrowPath,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::NumberArray => "number-array",
            Self::Color => "color",
            Self::ColorArray => "color-array",
            Self::Matrix => "matrix",
            Self::Rectangle => "rectangle",
            Self::Point => "point",
            Self::Fill => "fill",
            Self::Stroke => "stroke",
            Self::Polyline => "polyline",
            Self::Path => "path",
            Self::GrowPolyline => "grow-polyline",
            Self::GrowPath => "grow-path",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "number" => Self::Number,
            "number-array" => Self::NumberArray,
            "color" => Self::Color,
            "color-array" => Self::ColorArray,
            "matrix" => Self::Matrix,
            "rectangle" => Self::Rectangle,
            "point" => Self::Point,
            "fill" => Self::Fill,
            "stroke" => Self::Stroke,
            "polyline" => Self::Polyline,
            "path" => Self::Path,
            "grow-polyline" => Self::GrowPolyline,
            "grow-path" => Self::GrowPath,
            other => return Err(ValueError::UnknownKind(other.to_string())),
        })
    }
}

/// The data of an animated property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum AnimValue {
    Number(f64),
    NumberArray(Vec<f64>),
    Color(Color),
    ColorArray(Vec<Color>),
    Matrix(Matrix),
    Rect(Rect),
    Point(Point),
    Fill(Paint),
    Stroke(Stroke),
    Polyline(Vec<Point>),
    Path(Path),
}

impl AnimValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_number_array(&self) -> Option<&[f64]> {
        match self {
            Self::NumberArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<&Color> {
        match self {
            Self::Color(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_color_array(&self) -> Option<&[Color]> {
        match self {
            Self::ColorArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&Matrix> {
        match self {
            Self::Matrix(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_rect(&self) -> Option<&Rect> {
        match self {
            Self::Rect(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self {
            Self::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_fill(&self) -> Option<&Paint> {
        match self {
            Self::Fill(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_stroke(&self) -> Option<&Stroke> {
        match self {
            Self::Stroke(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_polyline(&self) -> Option<&[Point]> {
        match self {
            Self::Polyline(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }
}

impl From<f64> for AnimValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<Vec<f64>> for AnimValue {
    fn from(v: Vec<f64>) -> Self {
        Self::NumberArray(v)
    }
}

impl From<Color> for AnimValue {
    fn from(c: Color) -> Self {
        Self::Color(c)
    }
}

impl From<Vec<Color>> for AnimValue {
    fn from(v: Vec<Color>) -> Self {
        Self::ColorArray(v)
    }
}

impl From<Matrix> for AnimValue {
    fn from(m: Matrix) -> Self {
        Self::Matrix(m)
    }
}

impl From<Rect> for AnimValue {
    fn from(r: Rect) -> Self {
        Self::Rect(r)
    }
}

impl From<Point> for AnimValue {
    fn from(p: Point) -> Self {
        Self::Point(p)
    }
}

impl From<Paint> for AnimValue {
    fn from(p: Paint) -> Self {
        Self::Fill(p)
    }
}

impl From<Stroke> for AnimValue {
    fn from(s: Stroke) -> Self {
        Self::Stroke(s)
    }
}

impl From<Vec<Point>> for AnimValue {
    fn from(v: Vec<Point>) -> Self {
        Self::Polyline(v)
    }
}

impl From<Path> for AnimValue {
    fn from(p: Path) -> Self {
        Self::Path(p)
    }
}
