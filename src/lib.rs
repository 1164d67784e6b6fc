//! # Lamina
//!
//! Planar region extraction from triangle meshes via normal-space clustering.
//!
//! Lamina takes a triangle mesh of a scanned scene (or a raw depth image),
//! finds the dominant surface orientations by accumulating face normals on a
//! subdivided icosahedron, grows connected near-coplanar triangle regions
//! for each orientation, and recovers each region's boundary as a polygon
//! with holes, cleaned up by morphological buffering and simplification.
//!
//! ## Pipeline
//!
//! 1. **Mesh**: half-edge structure built from indexed triangles or a depth
//!    image ([`mesh`])
//! 2. **Dominant directions**: Gaussian accumulator and peak detection
//!    ([`sphere`])
//! 3. **Planes**: region growing and border-walking ([`extract`])
//! 4. **Polygons**: thresholds, buffering, simplification ([`filter`])
//!
//! [`pipeline::PlaneExtractor`] runs all stages in one call.
//!
//! ## Quick Start
//!
//! ```no_run
//! use lamina::mesh::HalfEdgeMesh;
//! use lamina::pipeline::{PipelineOptions, PlaneExtractor};
//!
//! let mesh: HalfEdgeMesh = lamina::io::load("scan.ply").unwrap();
//!
//! let mut extractor = PlaneExtractor::new(PipelineOptions::default()).unwrap();
//! let extraction = extractor.extract(&mesh).unwrap();
//!
//! for polygon in &extraction.polygons {
//!     println!(
//!         "plane with normal {:?}, area {:.2}, {} holes",
//!         polygon.normal,
//!         polygon.area,
//!         polygon.holes.len()
//!     );
//! }
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use lamina::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![
//!     [0, 2, 1], // bottom
//!     [0, 1, 3], // front
//!     [1, 2, 3], // right
//!     [2, 0, 3], // left
//! ];
//!
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_vertices(), 4);
//! assert_eq!(mesh.num_faces(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod extract;
pub mod filter;
pub mod io;
pub mod mesh;
pub mod pipeline;
pub mod sphere;

/// Prelude module for convenient imports.
///
/// ```
/// use lamina::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{LaminaError, Result};
    pub use crate::extract::{ExtractOptions, ExtractedPlane, Polygon};
    pub use crate::filter::{FilterOptions, FilteredPolygon};
    pub use crate::mesh::{
        build_from_triangles, to_face_vertex, Face, FaceId, FaceNormals, HalfEdge, HalfEdgeId,
        HalfEdgeMesh, MeshIndex, Vertex, VertexId,
    };
    pub use crate::pipeline::{Extraction, PipelineOptions, PlaneExtractor};
    pub use crate::sphere::{GaussianAccumulator, Peak, PeakOptions};
}

// Re-export nalgebra for downstream crates
pub use nalgebra;
