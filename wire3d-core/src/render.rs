//! Depth-cued wireframe painter
//!
//! Edges are drawn in storage order with a grey picked from the summed depth
//! of their endpoints. There is no occlusion: later lines overwrite earlier
//! ones.
use crate::mesh::Mesh;

/// Number of grey levels in the depth ramp.
pub const RAMP_LEVELS: usize = 16;

const MAX_GREY: f64 = 192.0;
const RAMP_GAMMA: f64 = 2.3;

/// Output surface for line drawings.
pub trait LineSink {
    /// Select the solid grey (0 = black) used by following lines.
    fn select_grey(&mut self, level: u8);

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);
}

/// Brightness per depth bucket, darker as the bucket grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreyRamp([u8; RAMP_LEVELS]);

impl GreyRamp {
    pub fn new() -> Self {
        let mut levels = [0u8; RAMP_LEVELS];
        let last = (RAMP_LEVELS - 1) as f64;
        for (i, level) in levels.iter_mut().enumerate() {
            let t = i as f64 / last;
            *level = (MAX_GREY * (1.0 - t.powf(RAMP_GAMMA))).round() as u8;
        }
        Self(levels)
    }

    /// Grey for `bucket`, clamped into the ramp.
    pub fn level(&self, bucket: usize) -> u8 {
        self.0[bucket.min(RAMP_LEVELS - 1)]
    }

    pub fn levels(&self) -> &[u8; RAMP_LEVELS] {
        &self.0
    }
}

impl Default for GreyRamp {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth bucket of an edge: the integer parts of both endpoint depths,
/// summed and clamped into the ramp.
pub fn depth_bucket(z1: f64, z2: f64) -> usize {
    let sum = (z1 as i64).saturating_add(z2 as i64);
    sum.clamp(0, RAMP_LEVELS as i64 - 1) as usize
}

/// Paints a transformed mesh into a [`LineSink`].
#[derive(Debug, Clone, Default)]
pub struct Painter {
    ramp: GreyRamp,
}

impl Painter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ramp(&self) -> &GreyRamp {
        &self.ramp
    }

    /// Draw every edge of `mesh` using its transformed vertices.
    ///
    /// The grey is only reselected when an edge falls in a different depth
    /// bucket than the edge before it.
    pub fn paint<S: LineSink + ?Sized>(&self, sink: &mut S, mesh: &Mesh) {
        if mesh.edge_count() == 0 || mesh.vertex_count() == 0 {
            return;
        }
        let vertices = mesh.transformed_vertices();
        if vertices.len() < mesh.vertex_count() {
            tracing::warn!("painting a mesh that was never transformed");
            return;
        }

        let mut current = None;
        for edge in mesh.edges() {
            let (i1, i2) = edge.endpoints();
            let (p1, p2) = (&vertices[i1], &vertices[i2]);

            let bucket = depth_bucket(p1.z, p2.z);
            if current != Some(bucket) {
                current = Some(bucket);
                sink.select_grey(self.ramp.level(bucket));
            }

            sink.draw_line(p1.x as i32, p1.y as i32, p2.x as i32, p2.y as i32);
        }
        tracing::trace!(edges = mesh.edge_count(), "painted mesh");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::transform::Transform;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Grey(u8),
        Line(i32, i32, i32, i32),
    }

    #[derive(Default)]
    struct Recorder(Vec<Op>);

    impl LineSink for Recorder {
        fn select_grey(&mut self, level: u8) {
            self.0.push(Op::Grey(level));
        }

        fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
            self.0.push(Op::Line(x1, y1, x2, y2));
        }
    }

    fn triangle() -> Mesh {
        let mut mesh = Mesh::new();
        for p in [
            Point::new(0.2, 0.0, 1.5),
            Point::new(10.9, -0.0, 1.9),
            Point::new(10.0, 10.0, 7.2),
        ] {
            mesh.add_vertex(p).unwrap();
        }
        mesh.add_edge(1, 2);
        mesh.add_edge(2, 0);
        mesh.add_edge(0, 1);
        mesh.compress();
        mesh
    }

    #[test]
    fn test_ramp_shape() {
        let ramp = GreyRamp::new();
        assert_eq!(ramp.level(0), 192);
        assert_eq!(ramp.level(15), 0);
        assert_eq!(ramp.level(40), 0);
        assert!(ramp.levels().windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_ramp_levels_are_rounded() {
        assert_eq!(
            GreyRamp::new().levels(),
            &[192, 192, 190, 187, 183, 177, 169, 159, 147, 133, 116, 98, 77, 54, 28, 0]
        );
        // 191.62 and 182.82 truncate to 191 and 182.
        assert_eq!(GreyRamp::new().level(1), 192);
        assert_eq!(GreyRamp::new().level(4), 183);
    }

    #[test]
    fn test_depth_bucket_truncates_and_clamps() {
        assert_eq!(depth_bucket(1.9, 2.9), 3);
        assert_eq!(depth_bucket(-0.5, 3.7), 3);
        assert_eq!(depth_bucket(-3.0, -1.0), 0);
        assert_eq!(depth_bucket(9.9, 9.9), 15);
        assert_eq!(depth_bucket(f64::NAN, 4.0), 4);
    }

    #[test]
    fn test_paint_selects_grey_only_on_change() {
        let mut mesh = triangle();
        mesh.transform(&Transform::new());

        let painter = Painter::new();
        let mut sink = Recorder::default();
        painter.paint(&mut sink, &mesh);

        let ramp = painter.ramp();
        assert_eq!(
            sink.0,
            vec![
                Op::Grey(ramp.level(2)),
                Op::Line(0, 0, 10, 0),
                Op::Grey(ramp.level(8)),
                Op::Line(0, 0, 10, 10),
                Op::Line(10, 0, 10, 10),
            ]
        );
    }

    #[test]
    fn test_paint_truncates_at_draw_time() {
        let mut mesh = triangle();
        let mut t = Transform::new();
        t.translate(-2.7, 0.5, 0.0);
        mesh.transform(&t);

        let mut sink = Recorder::default();
        Painter::new().paint(&mut sink, &mesh);
        assert!(sink.0.contains(&Op::Line(-2, 0, 8, 0)));
    }

    #[test]
    fn test_paint_skips_empty_and_untransformed_meshes() {
        let painter = Painter::new();
        let mut sink = Recorder::default();

        painter.paint(&mut sink, &Mesh::new());
        painter.paint(&mut sink, &triangle());

        let mut points_only = Mesh::new();
        points_only.add_vertex(Point::origin()).unwrap();
        points_only.transform(&Transform::new());
        painter.paint(&mut sink, &points_only);

        assert!(sink.0.is_empty());
    }

    #[test]
    fn test_paint_cube_draws_every_edge() {
        let mut mesh = Mesh::cube(2.0);
        mesh.transform(&Transform::new());

        let mut sink = Recorder::default();
        Painter::new().paint(&mut sink, &mesh);
        let lines = sink.0.iter().filter(|op| matches!(op, Op::Line(..))).count();
        assert_eq!(lines, 12);
    }
}
