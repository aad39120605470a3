//! Immutable 2-D affine matrices.
//!
//! A [`Matrix`] stores six scalars laid out as
//!
//! ```text
//! | a  b  tx |
//! | c  d  ty |
//! | 0  0  1  |
//! ```
//!
//! so a point maps to `(a·x + b·y + tx, c·x + d·y + ty)`. Every operation
//! returns a new matrix; the fields are never mutated after construction.
//!
//! Composition is child-to-parent: `child.concat(&parent)` applies `child`
//! first and `parent` second. The builder-style helpers (`translate`,
//! `scale`, `rotate`, `skew`) follow the same convention and append their
//! transform after `self`.
//!
//! # Decomposition
//!
//! Interpolating the raw `a/b/c/d` entries of two matrices produces shear
//! artifacts for combined rotate + scale transforms, so the interpolator
//! works on [`DecomposedMatrix`] components instead and rebuilds a matrix
//! with [`DecomposedMatrix::recompose`], which always applies
//! scale → skew → rotate → translate in that order.

use serde::{Deserialize, Serialize};

use crate::interpolate::Interpolate;
use crate::value::Point;

/// A 2-D affine transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    tx: f64,
    ty: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Create a matrix from its six entries.
    pub const fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    /// Create a pure translation.
    pub const fn translation(dx: f64, dy: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    /// Create a pure scale about the origin.
    pub const fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Create a pure rotation (radians, counter-clockwise in a y-up frame).
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, -sin, sin, cos, 0.0, 0.0)
    }

    /// Create a pure skew from two angles in radians.
    pub fn skewing(rad_x: f64, rad_y: f64) -> Self {
        Self::new(1.0, rad_x.tan(), rad_y.tan(), 1.0, 0.0, 0.0)
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    pub fn tx(&self) -> f64 {
        self.tx
    }

    pub fn ty(&self) -> f64 {
        self.ty
    }

    /// The entries as `[a, b, c, d, tx, ty]`.
    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.tx, self.ty]
    }

    /// Compose with a parent transform: `self` happens first, then `parent`.
    pub fn concat(&self, parent: &Matrix) -> Matrix {
        let p = parent;
        Matrix {
            a: p.a * self.a + p.b * self.c,
            b: p.a * self.b + p.b * self.d,
            c: p.c * self.a + p.d * self.c,
            d: p.c * self.b + p.d * self.d,
            tx: p.a * self.tx + p.b * self.ty + p.tx,
            ty: p.c * self.tx + p.d * self.ty + p.ty,
        }
    }

    /// Append a translation.
    pub fn translate(&self, dx: f64, dy: f64) -> Matrix {
        self.concat(&Matrix::translation(dx, dy))
    }

    /// Append a scale about the origin.
    pub fn scale(&self, sx: f64, sy: f64) -> Matrix {
        self.concat(&Matrix::scaling(sx, sy))
    }

    /// Append a scale about the pivot `(px, py)`.
    pub fn scale_about(&self, sx: f64, sy: f64, px: f64, py: f64) -> Matrix {
        self.translate(-px, -py).scale(sx, sy).translate(px, py)
    }

    /// Append a rotation in radians.
    pub fn rotate(&self, radians: f64) -> Matrix {
        self.concat(&Matrix::rotation(radians))
    }

    /// Append a skew in radians.
    pub fn skew(&self, rad_x: f64, rad_y: f64) -> Matrix {
        self.concat(&Matrix::skewing(rad_x, rad_y))
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();
        det != 0.0 && det.is_finite()
    }

    /// Compute the inverse transform.
    ///
    /// When the determinant is zero the result has non-finite entries; check
    /// [`Matrix::is_invertible`] first when that matters.
    pub fn invert(&self) -> Matrix {
        let det = self.determinant();
        Matrix {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            tx: (self.b * self.ty - self.d * self.tx) / det,
            ty: (self.c * self.tx - self.a * self.ty) / det,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Matrix::IDENTITY
    }

    /// Map a point through this transform.
    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.b * p.y + self.tx,
            self.c * p.x + self.d * p.y + self.ty,
        )
    }

    /// Split into translate / rotate / skew / scale components.
    ///
    /// Returns `None` for singular matrices (`ad − bc = 0`).
    pub(crate) fn decompose(&self) -> Option<DecomposedMatrix> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }

        // Column 1 gives scale X and the rotated x axis.
        let scale_x = self.a.hypot(self.c);
        let (ux, uy) = (self.a / scale_x, self.c / scale_x);

        // Remove the shear component from column 2.
        let mut shear = ux * self.b + uy * self.d;
        let (rx, ry) = (self.b - shear * ux, self.d - shear * uy);
        let mut scale_y = rx.hypot(ry);
        let (vx, vy) = (rx / scale_y, ry / scale_y);
        shear /= scale_y;

        // Mirrored basis.
        if ux * vy - uy * vx < 0.0 {
            scale_y = -scale_y;
            shear = -shear;
        }

        Some(DecomposedMatrix {
            translate_x: self.tx,
            translate_y: self.ty,
            rotation: uy.atan2(ux),
            skew_x: shear.atan(),
            scale_x,
            scale_y,
        })
    }
}

/// Decomposed affine components, each of which interpolates independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DecomposedMatrix {
    pub translate_x: f64,
    pub translate_y: f64,
    /// Radians.
    pub rotation: f64,
    /// Radians.
    pub skew_x: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl DecomposedMatrix {
    /// Components as `[tx, ty, rotation, skew_x, scale_x, scale_y]`.
    #[cfg(test)]
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.translate_x,
            self.translate_y,
            self.rotation,
            self.skew_x,
            self.scale_x,
            self.scale_y,
        ]
    }

    /// Rebuild a matrix as scale → skew → rotate → translate.
    pub fn recompose(&self) -> Matrix {
        Matrix::IDENTITY
            .scale(self.scale_x, self.scale_y)
            .skew(self.skew_x, 0.0)
            .rotate(self.rotation)
            .translate(self.translate_x, self.translate_y)
    }
}

impl Interpolate for DecomposedMatrix {
    /// Component-wise lerp. Rotation is a plain linear angle, so a turn from
    /// 170° to -170° goes the long way round.
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            translate_x: self.translate_x.interpolate(&to.translate_x, t),
            translate_y: self.translate_y.interpolate(&to.translate_y, t),
            rotation: self.rotation.interpolate(&to.rotation, t),
            skew_x: self.skew_x.interpolate(&to.skew_x, t),
            scale_x: self.scale_x.interpolate(&to.scale_x, t),
            scale_y: self.scale_y.interpolate(&to.scale_y, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn same_effect(m1: &Matrix, m2: &Matrix) -> bool {
        let samples = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(-3.5, 7.25),
            Point::new(100.0, -40.0),
        ];
        samples.iter().all(|p| {
            let a = m1.transform_point(*p);
            let b = m2.transform_point(*p);
            approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
        })
    }

    #[test]
    fn test_identity() {
        assert!(Matrix::default().is_identity());
        let m = Matrix::new(2.0, 0.5, -1.0, 3.0, 10.0, -4.0);
        assert_eq!(m.concat(&Matrix::IDENTITY), m);
        assert_eq!(Matrix::IDENTITY.concat(&m), m);
    }

    #[test]
    fn test_translate_and_scale() {
        let m = Matrix::IDENTITY.translate(50.0, 100.0);
        let p = m.transform_point(Point::new(10.0, 20.0));
        assert!(approx_eq(p.x, 60.0));
        assert!(approx_eq(p.y, 120.0));

        let m = Matrix::IDENTITY.scale(2.0, 3.0);
        let p = m.transform_point(Point::new(10.0, 20.0));
        assert!(approx_eq(p.x, 20.0));
        assert!(approx_eq(p.y, 60.0));
    }

    #[test]
    fn test_concat_order() {
        // Scale first, then translate.
        let m = Matrix::scaling(2.0, 2.0).concat(&Matrix::translation(10.0, 20.0));
        let p = m.transform_point(Point::new(1.0, 1.0));
        assert!(approx_eq(p.x, 12.0));
        assert!(approx_eq(p.y, 22.0));

        // Translate first, then scale.
        let m = Matrix::translation(10.0, 20.0).concat(&Matrix::scaling(2.0, 2.0));
        let p = m.transform_point(Point::new(1.0, 1.0));
        assert!(approx_eq(p.x, 22.0));
        assert!(approx_eq(p.y, 42.0));
    }

    #[test]
    fn test_rotate_90() {
        let m = Matrix::IDENTITY.rotate(PI / 2.0);
        let p = m.transform_point(Point::new(1.0, 0.0));
        assert!(approx_eq(p.x, 0.0));
        assert!(approx_eq(p.y, 1.0));
    }

    #[test]
    fn test_scale_about_pivot() {
        let m = Matrix::IDENTITY.scale_about(2.0, 2.0, 50.0, 50.0);
        let center = m.transform_point(Point::new(50.0, 50.0));
        assert!(approx_eq(center.x, 50.0));
        assert!(approx_eq(center.y, 50.0));

        let corner = m.transform_point(Point::new(0.0, 0.0));
        assert!(approx_eq(corner.x, -50.0));
        assert!(approx_eq(corner.y, -50.0));
    }

    #[test]
    fn test_skew() {
        let m = Matrix::IDENTITY.skew(PI / 4.0, 0.0);
        let p = m.transform_point(Point::new(0.0, 1.0));
        assert!(approx_eq(p.x, 1.0));
        assert!(approx_eq(p.y, 1.0));
    }

    #[test]
    fn test_invert() {
        let m = Matrix::IDENTITY
            .scale(2.0, 3.0)
            .rotate(PI / 4.0)
            .translate(50.0, 100.0);
        assert!(m.is_invertible());
        assert!(same_effect(&m.concat(&m.invert()), &Matrix::IDENTITY));
    }

    #[test]
    fn test_invert_singular() {
        let m = Matrix::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0);
        assert!(!m.is_invertible());
        let inv = m.invert();
        assert!(inv.to_array().iter().any(|v| !v.is_finite()));
    }

    #[test]
    fn test_decompose_singular() {
        assert!(Matrix::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0).decompose().is_none());
    }

    #[test]
    fn test_decompose_components() {
        let m = Matrix::IDENTITY
            .scale(2.0, 3.0)
            .rotate(PI / 6.0)
            .translate(7.0, -9.0);
        let parts = m.decompose().unwrap().to_array();
        assert!(approx_eq(parts[0], 7.0));
        assert!(approx_eq(parts[1], -9.0));
        assert!(approx_eq(parts[2], PI / 6.0));
        assert!(approx_eq(parts[3], 0.0));
        assert!(approx_eq(parts[4], 2.0));
        assert!(approx_eq(parts[5], 3.0));
    }

    #[test]
    fn test_decompose_roundtrip() {
        let cases = [
            Matrix::IDENTITY,
            Matrix::translation(100.0, 200.0),
            Matrix::IDENTITY.rotate(1.2).scale(0.5, 4.0),
            Matrix::IDENTITY.scale(2.0, 1.5).skew(0.3, 0.0).rotate(-0.7).translate(3.0, 4.0),
            Matrix::IDENTITY.skew(0.2, 0.4).translate(-10.0, 5.0),
            // Mirrored.
            Matrix::new(-1.0, 0.0, 0.0, 1.0, 5.0, 5.0),
            Matrix::new(1.0, 0.3, 0.0, -2.0, 0.0, 1.0),
        ];
        for m in cases {
            let rebuilt = m.decompose().unwrap().recompose();
            assert!(same_effect(&m, &rebuilt), "{m:?} rebuilt as {rebuilt:?}");
        }
    }

    #[test]
    fn test_mirror_flips_scale_y() {
        let parts = Matrix::new(1.0, 0.0, 0.0, -1.0, 0.0, 0.0)
            .decompose()
            .unwrap();
        assert!(approx_eq(parts.scale_x, 1.0));
        assert!(approx_eq(parts.scale_y, -1.0));
    }

    #[test]
    fn test_interpolate_decomposed_linear_rotation() {
        let from = Matrix::rotation(170f64.to_radians()).decompose().unwrap();
        let to = Matrix::rotation(-170f64.to_radians()).decompose().unwrap();
        let mid = from.interpolate(&to, 0.5);
        // Linear angle: the midpoint is 0°, not 180°.
        assert!(approx_eq(mid.rotation, 0.0));
    }
}
