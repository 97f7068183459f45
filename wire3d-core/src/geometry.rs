//! Geometry primitives shared by the mesh, transform and painter
use nalgebra::Point3;

/// A 3D coordinate.
pub type Point = Point3<f64>;

/// Axis-aligned bounds of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: f64,
    pub zmax: f64,
}

impl BoundingBox {
    /// Bounds of `points`, or `None` when the slice is empty.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self {
            xmin: first.x,
            xmax: first.x,
            ymin: first.y,
            ymax: first.y,
            zmin: first.z,
            zmax: first.z,
        };
        for p in &points[1..] {
            bounds.xmin = bounds.xmin.min(p.x);
            bounds.xmax = bounds.xmax.max(p.x);
            bounds.ymin = bounds.ymin.min(p.y);
            bounds.ymax = bounds.ymax.max(p.y);
            bounds.zmin = bounds.zmin.min(p.z);
            bounds.zmax = bounds.zmax.max(p.z);
        }
        Some(bounds)
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.xmin + self.xmax) / 2.0,
            (self.ymin + self.ymax) / 2.0,
            (self.zmin + self.zmax) / 2.0,
        )
    }

    /// Largest side length of the box.
    pub fn max_extent(&self) -> f64 {
        (self.xmax - self.xmin)
            .max(self.ymax - self.ymin)
            .max(self.zmax - self.zmin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_of_empty_slice() {
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn test_bounds_center_and_extent() {
        let points = [
            Point::new(-1.0, 0.0, 2.0),
            Point::new(3.0, -2.0, 2.5),
            Point::new(0.0, 1.0, 4.0),
        ];
        let bounds = BoundingBox::from_points(&points).unwrap();
        assert_eq!(bounds.xmin, -1.0);
        assert_eq!(bounds.xmax, 3.0);
        assert_eq!(bounds.ymin, -2.0);
        assert_eq!(bounds.ymax, 1.0);
        assert_eq!(bounds.zmin, 2.0);
        assert_eq!(bounds.zmax, 4.0);
        assert_eq!(bounds.center(), Point::new(1.0, -0.5, 3.0));
        assert_eq!(bounds.max_extent(), 4.0);
    }
}
