//! Homogeneous 4x4 transform composer
//!
//! Every elementary operation left-multiplies the current matrix: with a
//! current matrix `M`, applying `E` yields `E * M`. Issuing operations in
//! call order `E1, E2, .., En` therefore maps a point as
//! `En(..E2(E1 * p)..)`, so a pipeline is written in the order its steps
//! happen to the model.
use nalgebra::{Matrix4, Vector3};

use crate::error::TransformError;
use crate::geometry::Point;

/// An affine map on 3D points kept as a 4x4 homogeneous matrix.
///
/// The bottom row is implicitly `[0, 0, 0, 1]`; points are mapped with
/// `w = 1` and no perspective divide.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    matrix: Matrix4<f64>,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Reset to the identity.
    pub fn reset(&mut self) {
        self.matrix = Matrix4::identity();
    }

    fn compose(&mut self, elementary: Matrix4<f64>) {
        self.matrix = elementary * self.matrix;
    }

    pub fn translate(&mut self, tx: f64, ty: f64, tz: f64) {
        self.compose(Matrix4::new_translation(&Vector3::new(tx, ty, tz)));
    }

    /// Scale about the origin.
    pub fn scale(&mut self, sx: f64, sy: f64, sz: f64) {
        self.compose(Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz)));
    }

    /// Scale about `center`, folded into a single matrix.
    pub fn scale_about(&mut self, sx: f64, sy: f64, sz: f64, center: &Point) {
        let mut m = Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz));
        m[(0, 3)] = (1.0 - sx) * center.x;
        m[(1, 3)] = (1.0 - sy) * center.y;
        m[(2, 3)] = (1.0 - sz) * center.z;
        self.compose(m);
    }

    /// Rotate about the X axis by `angle` degrees.
    pub fn rot_x(&mut self, angle: f64) {
        self.compose(Matrix4::new_rotation(Vector3::x() * angle.to_radians()));
    }

    /// Rotate about the Y axis by `angle` degrees.
    pub fn rot_y(&mut self, angle: f64) {
        self.compose(Matrix4::new_rotation(Vector3::y() * angle.to_radians()));
    }

    /// Rotate about the Z axis by `angle` degrees.
    pub fn rot_z(&mut self, angle: f64) {
        self.compose(Matrix4::new_rotation(Vector3::z() * angle.to_radians()));
    }

    /// Rotate by `angle` degrees about the axis running from `p1` to `p2`.
    ///
    /// The rotation pivots about `p1`. A zero-length (or non-finite) axis
    /// has no defined rotation and is rejected, leaving the matrix as it was.
    pub fn rotate(&mut self, p1: &Point, p2: &Point, angle: f64) -> Result<(), TransformError> {
        let axis = p2 - p1;
        let length = axis.norm();
        if length == 0.0 || !length.is_finite() {
            return Err(TransformError::DegenerateAxis);
        }

        let half = angle.to_radians() / 2.0;
        let (sin_half, cos_half) = half.sin_cos();
        let a = sin_half * axis.x / length;
        let b = sin_half * axis.y / length;
        let c = sin_half * axis.z / length;

        #[rustfmt::skip]
        let rotation = Matrix4::new(
            1.0 - 2.0 * b * b - 2.0 * c * c, 2.0 * a * b - 2.0 * cos_half * c, 2.0 * a * c + 2.0 * cos_half * b, 0.0,
            2.0 * a * b + 2.0 * cos_half * c, 1.0 - 2.0 * a * a - 2.0 * c * c, 2.0 * b * c - 2.0 * cos_half * a, 0.0,
            2.0 * a * c - 2.0 * cos_half * b, 2.0 * b * c + 2.0 * cos_half * a, 1.0 - 2.0 * a * a - 2.0 * b * b, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        self.translate(-p1.x, -p1.y, -p1.z);
        self.compose(rotation);
        self.translate(p1.x, p1.y, p1.z);
        Ok(())
    }

    /// Compose the whole of `other` on top of this transform.
    pub fn mult(&mut self, other: &Transform) {
        self.compose(other.matrix);
    }

    /// Map a single point.
    pub fn apply(&self, p: &Point) -> Point {
        let m = &self.matrix;
        Point::new(
            m[(0, 0)] * p.x + m[(0, 1)] * p.y + m[(0, 2)] * p.z + m[(0, 3)],
            m[(1, 0)] * p.x + m[(1, 1)] * p.y + m[(1, 2)] * p.z + m[(1, 3)],
            m[(2, 0)] * p.x + m[(2, 1)] * p.y + m[(2, 2)] * p.z + m[(2, 3)],
        )
    }

    /// Map every point of `points` into `out`, replacing its contents.
    pub fn transform(&self, points: &[Point], out: &mut Vec<Point>) {
        out.clear();
        out.extend(points.iter().map(|p| self.apply(p)));
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
