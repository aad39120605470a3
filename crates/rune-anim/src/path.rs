//! Path command lists.
//!
//! Commands are stored in absolute coordinates. SVG path data parses into a
//! [`Path`] through kurbo, and a path prints back as absolute SVG data.

use std::fmt;
use std::str::FromStr;

use kurbo::{BezPath, PathEl};
use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::value::Point;

/// One drawing command with absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "points", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Control point, end point.
    QuadTo(Point, Point),
    /// Two control points, end point.
    CubicTo(Point, Point, Point),
    Close,
}

impl PathCommand {
    /// The point the pen rests on after this command, if the command carries one.
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) | Self::QuadTo(_, p) | Self::CubicTo(_, _, p) => {
                Some(p)
            }
            Self::Close => None,
        }
    }

    /// Same variant, ignoring coordinates.
    pub fn same_kind(&self, other: &PathCommand) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// An ordered list of path commands.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    pub commands: Vec<PathCommand>,
}

impl Path {
    pub fn new(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

impl From<Vec<PathCommand>> for Path {
    fn from(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match cmd {
                PathCommand::MoveTo(p) => write!(f, "M{},{}", p.x, p.y)?,
                PathCommand::LineTo(p) => write!(f, "L{},{}", p.x, p.y)?,
                PathCommand::QuadTo(c, p) => write!(f, "Q{},{} {},{}", c.x, c.y, p.x, p.y)?,
                PathCommand::CubicTo(c1, c2, p) => write!(
                    f,
                    "C{},{} {},{} {},{}",
                    c1.x, c1.y, c2.x, c2.y, p.x, p.y
                )?,
                PathCommand::Close => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = ValueError;

    /// Parse SVG path data. Smooth curves and arcs are expanded into
    /// quadratic and cubic segments.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data = s.trim();
        if data.is_empty() {
            return Ok(Path::default());
        }
        if !data.starts_with(['M', 'm']) {
            return Err(ValueError::InvalidPath(
                "path data must start with a move".to_string(),
            ));
        }
        let bez = BezPath::from_svg(data).map_err(|e| ValueError::InvalidPath(e.to_string()))?;
        Ok(Path::from(&bez))
    }
}

impl From<&BezPath> for Path {
    fn from(bez: &BezPath) -> Self {
        let commands = bez
            .elements()
            .iter()
            .map(|el| match *el {
                PathEl::MoveTo(p) => PathCommand::MoveTo(p.into()),
                PathEl::LineTo(p) => PathCommand::LineTo(p.into()),
                PathEl::QuadTo(c, p) => PathCommand::QuadTo(c.into(), p.into()),
                PathEl::CurveTo(c1, c2, p) => PathCommand::CubicTo(c1.into(), c2.into(), p.into()),
                PathEl::ClosePath => PathCommand::Close,
            })
            .collect();
        Self { commands }
    }
}

impl From<&Path> for BezPath {
    fn from(path: &Path) -> Self {
        let mut bez = BezPath::new();
        for cmd in &path.commands {
            match *cmd {
                PathCommand::MoveTo(p) => bez.move_to(p),
                PathCommand::LineTo(p) => bez.line_to(p),
                PathCommand::QuadTo(c, p) => bez.quad_to(c, p),
                PathCommand::CubicTo(c1, c2, p) => bez.curve_to(c1, c2, p),
                PathCommand::Close => bez.close_path(),
            }
        }
        bez
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Point::new(p.x, p.y)
    }
}

impl From<Point> for kurbo::Point {
    fn from(p: Point) -> Self {
        kurbo::Point::new(p.x, p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_parse_absolute() {
        let path: Path = "M10 20 L30,40 Q50 60 70 80 C1 2 3 4 5 6 Z".parse().unwrap();
        assert_eq!(
            path.commands,
            vec![
                PathCommand::MoveTo(p(10.0, 20.0)),
                PathCommand::LineTo(p(30.0, 40.0)),
                PathCommand::QuadTo(p(50.0, 60.0), p(70.0, 80.0)),
                PathCommand::CubicTo(p(1.0, 2.0), p(3.0, 4.0), p(5.0, 6.0)),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn test_parse_relative_and_shorthand() {
        let path: Path = "m10,10 l5,0 h5 v-10 H0 V0 z".parse().unwrap();
        assert_eq!(
            path.commands,
            vec![
                PathCommand::MoveTo(p(10.0, 10.0)),
                PathCommand::LineTo(p(15.0, 10.0)),
                PathCommand::LineTo(p(20.0, 10.0)),
                PathCommand::LineTo(p(20.0, 0.0)),
                PathCommand::LineTo(p(0.0, 0.0)),
                PathCommand::LineTo(p(0.0, 0.0)),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn test_implicit_line_after_move() {
        let path: Path = "M0 0 10 0 10 10".parse().unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.commands[2], PathCommand::LineTo(p(10.0, 10.0)));
    }

    #[test]
    fn test_compact_numbers() {
        let path: Path = "M-1.5-2.5L.5.5 1e1,-2".parse().unwrap();
        assert_eq!(
            path.commands,
            vec![
                PathCommand::MoveTo(p(-1.5, -2.5)),
                PathCommand::LineTo(p(0.5, 0.5)),
                PathCommand::LineTo(p(10.0, -2.0)),
            ]
        );
    }

    #[test]
    fn test_smooth_cubic_reflects_control() {
        let path: Path = "M0 0 C0 10 10 10 10 0 S20 -10 20 0".parse().unwrap();
        assert_eq!(
            path.commands[2],
            PathCommand::CubicTo(p(10.0, -10.0), p(20.0, -10.0), p(20.0, 0.0))
        );
    }

    #[test]
    fn test_arc_becomes_cubics() {
        let path: Path = "M0 0 A5 5 0 0 1 10 0".parse().unwrap();
        assert!(path.len() > 1);
        assert!(
            path.commands[1..]
                .iter()
                .all(|c| matches!(c, PathCommand::CubicTo(..)))
        );
        let end = path.commands[path.len() - 1].end_point().unwrap();
        assert!((end.x - 10.0).abs() < 1e-6 && end.y.abs() < 1e-6);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            "M0 0 X5 5".parse::<Path>(),
            Err(ValueError::InvalidPath(_))
        ));
        assert!("M0".parse::<Path>().is_err());
        assert!("10 10".parse::<Path>().is_err());
        assert_eq!("".parse::<Path>(), Ok(Path::default()));
        assert_eq!("  ".parse::<Path>(), Ok(Path::default()));
    }

    #[test]
    fn test_bezpath_conversion() {
        let path: Path = "M0,0 L10,0 Q15,5 10,10 Z".parse().unwrap();
        let bez = BezPath::from(&path);
        assert_eq!(bez.elements().len(), 4);
        assert_eq!(Path::from(&bez), path);
    }

    #[test]
    fn test_display_reparses() {
        let src = "M0,0 L10,0 Q15,5 10,10 C5,15 0,15 0,10 Z";
        let path: Path = src.parse().unwrap();
        assert_eq!(path.to_string(), src);
    }
}
