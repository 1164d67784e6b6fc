//! Uniform-grid mesh construction from a float depth image.
//!
//! Organized depth images (e.g. from an RGB-D sensor) carry an implicit grid
//! topology: every `stride`-th pixel back-projects to a 3D point, and each
//! grid cell whose four corners are valid contributes two triangles. This
//! skips Delaunay triangulation entirely and produces a mesh whose half-edge
//! connectivity is exact by construction.

use std::collections::HashMap;
use std::time::Instant;

use nalgebra::{Matrix4, Point3};

use super::builder::build_from_triangles;
use super::halfedge::HalfEdgeMesh;
use super::index::MeshIndex;
use crate::error::{LaminaError, Result};

/// A row-major float depth image in metric units.
///
/// Samples that are zero, negative, or non-finite are treated as missing.
#[derive(Debug, Clone)]
pub struct DepthImage {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl DepthImage {
    /// Create a depth image from row-major samples.
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(LaminaError::invalid_param(
                "data",
                data.len(),
                "length must equal rows * cols",
            ));
        }
        Ok(Self { rows, cols, data })
    }

    /// Number of image rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of image columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Depth at (row, col), or `None` if the sample is missing.
    #[inline]
    pub fn depth(&self, row: usize, col: usize) -> Option<f64> {
        let d = self.data[row * self.cols + col];
        (d.is_finite() && d > 0.0).then_some(d as f64)
    }
}

/// Pinhole camera intrinsics.
#[derive(Debug, Clone, Copy)]
pub struct Intrinsics {
    /// Focal length in pixels, x.
    pub fx: f64,
    /// Focal length in pixels, y.
    pub fy: f64,
    /// Principal point, x.
    pub cx: f64,
    /// Principal point, y.
    pub cy: f64,
}

impl Intrinsics {
    /// Back-project pixel (col, row) at depth `z` into camera space.
    #[inline]
    pub fn back_project(&self, col: f64, row: f64, z: f64) -> Point3<f64> {
        Point3::new((col - self.cx) * z / self.fx, (row - self.cy) * z / self.fy, z)
    }
}

/// Timing figures for depth-image meshing, in milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthMeshTimings {
    /// Time spent triangulating and building connectivity.
    pub mesh_creation_ms: f64,
}

/// Build a uniform-grid triangle mesh from a depth image.
///
/// Every `stride`-th pixel is back-projected through `intrinsics`, transformed
/// by `extrinsics`, and cells with four valid corners are split into two
/// triangles wound so the normal faces the camera. Vertices that end up in no
/// triangle are not emitted.
///
/// # Errors
///
/// Returns [`LaminaError::InvalidParameter`] if `stride` is zero and
/// [`LaminaError::EmptyDepthImage`] if no cell has four valid corners.
pub fn mesh_from_depth<I: MeshIndex>(
    depth: &DepthImage,
    intrinsics: &Intrinsics,
    extrinsics: &Matrix4<f64>,
    stride: usize,
) -> Result<(HalfEdgeMesh<I>, DepthMeshTimings)> {
    if stride == 0 {
        return Err(LaminaError::invalid_param("stride", stride, "must be >= 1"));
    }

    let start = Instant::now();

    let grid_rows: Vec<usize> = (0..depth.rows()).step_by(stride).collect();
    let grid_cols: Vec<usize> = (0..depth.cols()).step_by(stride).collect();

    // Back-project the sampled grid
    let mut points: Vec<Option<Point3<f64>>> =
        Vec::with_capacity(grid_rows.len() * grid_cols.len());
    let mut valid = 0usize;
    for &r in &grid_rows {
        for &c in &grid_cols {
            let p = depth.depth(r, c).map(|z| {
                valid += 1;
                let cam = intrinsics.back_project(c as f64, r as f64, z);
                extrinsics.transform_point(&cam)
            });
            points.push(p);
        }
    }

    // Emit two triangles per fully-valid cell, assigning compact vertex ids
    // on first use so missing regions leave no isolated vertices behind.
    let ncols = grid_cols.len();
    let mut vertex_of: HashMap<usize, usize> = HashMap::new();
    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut faces: Vec<[usize; 3]> = Vec::new();

    let emit = |grid_idx: usize,
                    p: Point3<f64>,
                    vertices: &mut Vec<Point3<f64>>,
                    vertex_of: &mut HashMap<usize, usize>| {
        *vertex_of.entry(grid_idx).or_insert_with(|| {
            let id = vertices.len();
            vertices.push(p);
            id
        })
    };

    for gr in 0..grid_rows.len().saturating_sub(1) {
        for gc in 0..ncols.saturating_sub(1) {
            let tl = gr * ncols + gc;
            let tr = tl + 1;
            let bl = tl + ncols;
            let br = bl + 1;

            if let (Some(ptl), Some(ptr), Some(pbl), Some(pbr)) =
                (points[tl], points[tr], points[bl], points[br])
            {
                let vtl = emit(tl, ptl, &mut vertices, &mut vertex_of);
                let vtr = emit(tr, ptr, &mut vertices, &mut vertex_of);
                let vbl = emit(bl, pbl, &mut vertices, &mut vertex_of);
                let vbr = emit(br, pbr, &mut vertices, &mut vertex_of);

                // With x right, y down, z forward this winding puts the
                // normal toward the camera (-z).
                faces.push([vtl, vbl, vbr]);
                faces.push([vtl, vbr, vtr]);
            }
        }
    }

    if faces.is_empty() {
        return Err(LaminaError::EmptyDepthImage {
            valid,
            total: points.len(),
        });
    }

    let mesh = build_from_triangles(&vertices, &faces)?;
    let timings = DepthMeshTimings {
        mesh_creation_ms: start.elapsed().as_secs_f64() * 1000.0,
    };

    Ok((mesh, timings))
}
