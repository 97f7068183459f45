//! Viewport fitting and accumulated orientation
//!
//! The per-frame model matrix is built as: move the model's center to the
//! origin, apply the accumulated orientation, scale to the viewport (with y
//! flipped for screen coordinates), then move to the viewport center.
use crate::geometry::BoundingBox;
use crate::transform::Transform;

/// Share of the viewport the model's largest extent may fill.
const FILL: f64 = 0.7;
/// Screen-space depth range the model is squeezed into around `DEPTH_OFFSET`.
const DEPTH_RANGE: f64 = 16.0;
const DEPTH_OFFSET: f64 = 8.0;

/// Base pose applied before any user or animation rotation, in degrees.
const BASE_PITCH: f64 = 20.0;
const BASE_YAW: f64 = 20.0;

/// Target drawing surface dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Horizontal stretch for surfaces whose cells are taller than wide.
    pub cell_aspect: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            cell_aspect: 1.0,
        }
    }

    pub fn with_cell_aspect(mut self, cell_aspect: f64) -> Self {
        self.cell_aspect = cell_aspect;
        self
    }
}

/// Scale factor that fits `bounds` into `viewport`, times `scale`.
pub fn fit_scale(bounds: &BoundingBox, viewport: &Viewport, scale: f64) -> f64 {
    let extent = bounds.max_extent();
    // A single point has no extent; fit it as a unit box.
    let extent = if extent > 0.0 { extent } else { 1.0 };
    let across = viewport.width / (extent * viewport.cell_aspect);
    let down = viewport.height / extent;
    FILL * across.min(down) * scale
}

/// Rotation accumulated from the base pose, user drags and animation steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Orientation {
    rotation: Transform,
}

impl Orientation {
    /// No rotation at all.
    pub fn identity() -> Self {
        Self {
            rotation: Transform::new(),
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.rotation
    }

    /// Compose a rotation of `dx`, `dy`, `dz` degrees about X, then Y, then Z
    /// on top of the current orientation.
    pub fn spin(&mut self, dx: f64, dy: f64, dz: f64) {
        let mut rotator = Transform::new();
        rotator.rot_x(dx);
        rotator.rot_y(dy);
        rotator.rot_z(dz);
        self.rotation.mult(&rotator);
    }

    /// Rotate for a pointer drag from `from` to `to` (surface coordinates).
    ///
    /// Dragging across the full surface turns the model a full circle.
    pub fn drag(&mut self, from: (f64, f64), to: (f64, f64), viewport: &Viewport) {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return;
        }
        let pitch = (from.1 - to.1) * 360.0 / viewport.width;
        let yaw = (to.0 - from.0) * 360.0 / viewport.height;
        self.spin(pitch, yaw, 0.0);
    }
}

impl Default for Orientation {
    fn default() -> Self {
        let mut rotation = Transform::new();
        rotation.rot_y(BASE_YAW);
        rotation.rot_x(BASE_PITCH);
        Self { rotation }
    }
}

/// Model matrix for one frame.
pub fn frame_transform(
    bounds: &BoundingBox,
    orientation: &Orientation,
    viewport: &Viewport,
    fit: f64,
) -> Transform {
    let center = bounds.center();
    let mut t = Transform::new();
    t.translate(-center.x, -center.y, -center.z);
    t.mult(orientation.transform());
    t.scale(
        fit * viewport.cell_aspect,
        -fit,
        DEPTH_RANGE * fit / viewport.width,
    );
    t.translate(viewport.width / 2.0, viewport.height / 2.0, DEPTH_OFFSET);
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::mesh::Mesh;

    fn cube_bounds() -> BoundingBox {
        *Mesh::cube(2.0).bounds().unwrap()
    }

    #[test]
    fn test_fit_scale() {
        let bounds = cube_bounds();
        let viewport = Viewport::new(400.0, 200.0);
        assert!((fit_scale(&bounds, &viewport, 1.0) - 70.0).abs() < 1e-9);
        assert!((fit_scale(&bounds, &viewport, 2.0) - 140.0).abs() < 1e-9);

        let terminal = Viewport::new(80.0, 40.0).with_cell_aspect(2.0);
        assert!((fit_scale(&bounds, &terminal, 1.0) - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_scale_single_point() {
        let bounds = BoundingBox::from_points(&[Point::new(3.0, 3.0, 3.0)]).unwrap();
        let fit = fit_scale(&bounds, &Viewport::new(100.0, 100.0), 1.0);
        assert!((fit - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_frame_centers_and_flips() {
        let bounds = BoundingBox::from_points(&[
            Point::new(10.0, 10.0, 10.0),
            Point::new(12.0, 12.0, 12.0),
        ])
        .unwrap();
        let viewport = Viewport::new(200.0, 100.0);
        let t = frame_transform(&bounds, &Orientation::identity(), &viewport, 10.0);

        let center = t.apply(&Point::new(11.0, 11.0, 11.0));
        assert!((center - Point::new(100.0, 50.0, 8.0)).norm() < 1e-9);

        // Up in model space is up on screen: smaller y.
        let above = t.apply(&Point::new(11.0, 12.0, 11.0));
        assert!((above - Point::new(100.0, 40.0, 8.0)).norm() < 1e-9);

        let nearer = t.apply(&Point::new(11.0, 11.0, 12.0));
        assert!((nearer.z - (8.0 + 16.0 * 10.0 / 200.0)).abs() < 1e-9);
    }

    #[test]
    fn test_fitted_cube_is_centered() {
        let mut mesh = Mesh::cube(2.0);
        let viewport = Viewport::new(400.0, 300.0);
        let bounds = *mesh.bounds().unwrap();
        let fit = fit_scale(&bounds, &viewport, 1.0);
        let t = frame_transform(&bounds, &Orientation::default(), &viewport, fit);
        mesh.transform(&t);

        let vertices = mesh.transformed_vertices();
        let sum = vertices
            .iter()
            .fold(Point::origin().coords, |acc, p| acc + p.coords);
        let mean = Point::from(sum / vertices.len() as f64);
        assert!((mean - Point::new(200.0, 150.0, 8.0)).norm() < 1e-9);
    }

    #[test]
    fn test_spin_composes_outside() {
        let mut orientation = Orientation::identity();
        orientation.spin(0.0, 0.0, 90.0);
        orientation.spin(90.0, 0.0, 0.0);
        let p = orientation.transform().apply(&Point::new(1.0, 0.0, 0.0));
        assert!((p - Point::new(0.0, 0.0, 1.0)).norm() < 1e-9);
    }

    #[test]
    fn test_drag_rotates_by_surface_fraction() {
        let viewport = Viewport::new(360.0, 360.0);
        let mut orientation = Orientation::identity();
        orientation.drag((0.0, 0.0), (90.0, 0.0), &viewport);
        let p = orientation.transform().apply(&Point::new(0.0, 0.0, 1.0));
        assert!((p - Point::new(1.0, 0.0, 0.0)).norm() < 1e-9);

        let before = orientation.clone();
        orientation.drag((0.0, 0.0), (5.0, 5.0), &Viewport::new(0.0, 10.0));
        assert_eq!(orientation, before);
    }

    #[test]
    fn test_default_pose() {
        let mut expected = Transform::new();
        expected.rot_y(20.0);
        expected.rot_x(20.0);
        assert_eq!(Orientation::default().transform(), &expected);
    }
}
