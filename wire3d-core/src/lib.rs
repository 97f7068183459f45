//! Wire3D core: wireframe meshes, homogeneous transforms and depth-cued
//! line painting.
//!
//! A model is loaded from an OBJ subset into a [`Mesh`] of vertices and
//! deduplicated edges. Each frame a [`Transform`] is composed (see
//! [`view::frame_transform`]), applied with [`Mesh::transform`], and the
//! result drawn by a [`Painter`] into any [`LineSink`].

pub mod animation;
pub mod error;
pub mod geometry;
pub mod mesh;
mod obj;
pub mod render;
pub mod transform;
pub mod view;

// Re-export commonly used types
pub use animation::Animation;
pub use error::{LoadError, TransformError};
pub use geometry::{BoundingBox, Point};
pub use mesh::{EdgeKey, Mesh, MAX_VERTICES};
pub use render::{GreyRamp, LineSink, Painter};
pub use transform::Transform;
pub use view::{Orientation, Viewport};
