//! Wireframe mesh: original vertices, packed undirected edges and the
//! per-frame transformed vertex cache
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::LoadError;
use crate::geometry::{BoundingBox, Point};
use crate::obj::{self, Statement};
use crate::transform::Transform;

const INITIAL_CAPACITY: usize = 100;

/// Largest vertex count whose indices still fit an [`EdgeKey`] half.
pub const MAX_VERTICES: usize = 1 << 16;

/// An undirected edge packed into 32 bits: the smaller vertex index in the
/// high half, the larger in the low half.
///
/// Equal keys are the same edge, so sorting keys groups duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey(u32);

impl EdgeKey {
    /// Pack an edge, or `None` when either index is not below
    /// [`MAX_VERTICES`].
    pub fn new(a: usize, b: usize) -> Option<Self> {
        if a >= MAX_VERTICES || b >= MAX_VERTICES {
            return None;
        }
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Some(Self(((lo as u32) << 16) | hi as u32))
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    /// The two vertex indices, smaller first.
    pub fn endpoints(self) -> (usize, usize) {
        ((self.0 >> 16) as usize, (self.0 & 0xFFFF) as usize)
    }
}

/// A polygonal model reduced to vertices and edges.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Point>,
    edges: Vec<EdgeKey>,
    bounds: Option<BoundingBox>,
    transformed: Vec<Point>,
    is_transformed: bool,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::with_capacity(INITIAL_CAPACITY),
            edges: Vec::with_capacity(INITIAL_CAPACITY),
            bounds: None,
            transformed: Vec::new(),
            is_transformed: false,
        }
    }

    /// Load, bound and deduplicate a model in one go.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut mesh = Self::new();
        mesh.load(BufReader::new(reader))?;
        mesh.find_boundary();
        mesh.compress();
        Ok(mesh)
    }

    /// Open and prepare the model stored at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "opening model");
        Self::from_reader(File::open(path)?)
    }

    /// A cube of side `size` centered on the origin, as 8 vertices and
    /// 6 quad faces.
    pub fn cube(size: f64) -> Self {
        const CORNERS: [[f64; 3]; 8] = [
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [1.0, 1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
        ];
        const FACES: [[i64; 4]; 6] = [
            [1, 2, 3, 4],
            [5, 8, 7, 6],
            [1, 5, 6, 2],
            [2, 6, 7, 3],
            [3, 7, 8, 4],
            [5, 1, 4, 8],
        ];

        let half = size / 2.0;
        let mut mesh = Self::new();
        mesh.vertices.extend(
            CORNERS
                .iter()
                .map(|c| Point::new(c[0] * half, c[1] * half, c[2] * half)),
        );
        for face in &FACES {
            mesh.add_loop(face);
        }
        mesh.find_boundary();
        mesh.compress();
        mesh
    }

    /// Parse a model description, appending its vertices and edges.
    ///
    /// Edges naming a vertex that has not been defined yet are dropped
    /// without error. A format error stops the scan at the offending line;
    /// statements before it stay in the mesh, which should then be discarded.
    pub fn load<R: BufRead>(&mut self, reader: R) -> Result<(), LoadError> {
        let mut dropped = 0;
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let statement = obj::parse_statement(&line).map_err(|bad| LoadError::Format {
                line: number + 1,
                column: bad.column,
                token: bad.token,
                context: line.trim().to_string(),
            })?;
            match statement {
                Statement::Vertex(point) => {
                    self.add_vertex(point)?;
                }
                Statement::Polygon(indices) => dropped += self.add_loop(&indices),
                Statement::Blank | Statement::Ignored => {}
            }
        }

        if dropped > 0 {
            tracing::debug!(dropped, "ignored edges referencing undefined vertices");
        }
        tracing::debug!(
            vertices = self.vertices.len(),
            edges = self.edges.len(),
            "loaded mesh"
        );
        Ok(())
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, point: Point) -> Result<usize, LoadError> {
        if self.vertices.len() >= MAX_VERTICES {
            return Err(LoadError::TooManyVertices {
                limit: MAX_VERTICES,
            });
        }
        self.vertices.push(point);
        Ok(self.vertices.len() - 1)
    }

    /// Register the edge `a`-`b` (0-based). Returns `false`, registering
    /// nothing, when either end is not an existing vertex.
    pub fn add_edge(&mut self, a: usize, b: usize) -> bool {
        let count = self.vertices.len();
        if a >= count || b >= count {
            return false;
        }
        match EdgeKey::new(a, b) {
            Some(key) => {
                self.edges.push(key);
                true
            }
            None => false,
        }
    }

    /// Register the closed boundary through 1-based `indices`, returning how
    /// many of its edges were dropped.
    fn add_loop(&mut self, indices: &[i64]) -> usize {
        let (Some(&first), Some(&last)) = (indices.first(), indices.last()) else {
            return 0;
        };
        let pairs = indices
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(std::iter::once((first, last)));

        let mut dropped = 0;
        for (a, b) in pairs {
            let registered = match (zero_based(a), zero_based(b)) {
                (Some(a), Some(b)) => self.add_edge(a, b),
                _ => false,
            };
            if !registered {
                dropped += 1;
            }
        }
        dropped
    }

    /// Compute the bounding box of the original vertices. No-op when empty.
    pub fn find_boundary(&mut self) {
        if let Some(bounds) = BoundingBox::from_points(&self.vertices) {
            self.bounds = Some(bounds);
        }
    }

    /// Sort the edges and drop duplicates.
    pub fn compress(&mut self) {
        let before = self.edges.len();
        self.edges.sort_unstable();
        self.edges.dedup();
        tracing::debug!(before, after = self.edges.len(), "compressed edges");
    }

    /// Refresh the transformed vertex cache unless it is already current.
    pub fn transform(&mut self, transform: &Transform) {
        if self.is_transformed || self.vertices.is_empty() {
            return;
        }
        transform.transform(&self.vertices, &mut self.transformed);
        self.is_transformed = true;
    }

    pub fn is_transformed(&self) -> bool {
        self.is_transformed
    }

    /// Mark the cache stale (`false`) so the next [`Mesh::transform`]
    /// recomputes it.
    pub fn set_transformed(&mut self, transformed: bool) {
        self.is_transformed = transformed;
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[EdgeKey] {
        &self.edges
    }

    /// Original, untransformed vertices.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Output of the last [`Mesh::transform`]; empty before the first one.
    pub fn transformed_vertices(&self) -> &[Point] {
        &self.transformed
    }

    /// Bounds of the original vertices, once [`Mesh::find_boundary`] ran.
    pub fn bounds(&self) -> Option<&BoundingBox> {
        self.bounds.as_ref()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

fn zero_based(index: i64) -> Option<usize> {
    usize::try_from(index.checked_sub(1)?).ok()
}
