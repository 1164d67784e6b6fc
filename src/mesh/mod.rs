//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation and the builders
//! that produce it from indexed triangle soups and organized depth images.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`], a triangle mesh stored as a
//! half-edge (doubly-connected edge list) structure. O(1) adjacency queries
//! make it the natural substrate for region growing and border walking.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//!
//! These indices are generic over the underlying integer type (the
//! [`MeshIndex`] trait), `u32` by default with `u64` available for massive
//! scans.
//!
//! # Construction
//!
//! ```
//! use lamina::mesh::{HalfEdgeMesh, build_from_triangles};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! ```
//!
//! Organized depth images build directly via [`mesh_from_depth`], which
//! back-projects a pixel grid and triangulates valid cells.

mod builder;
mod depth;
mod halfedge;
mod index;
mod normals;

pub use builder::{build_from_triangles, to_face_vertex};
pub use depth::{mesh_from_depth, DepthImage, DepthMeshTimings, Intrinsics};
pub use halfedge::{Face, HalfEdge, HalfEdgeMesh, Vertex, VertexHalfEdgeIter};
pub use index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
pub use normals::FaceNormals;
