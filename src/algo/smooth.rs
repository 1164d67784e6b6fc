//! Mesh smoothing.
//!
//! Two variants are provided:
//!
//! - [`laplacian_smooth`]: classic Laplacian smoothing (may cause shrinkage)
//! - [`taubin_smooth`]: Taubin's lambda/mu smoothing (reduces shrinkage)
//!
//! Both preserve boundary vertices by default, which matters for depth
//! meshes: the outline of the scanned region should not creep inward while
//! the interior is denoised.
//!
//! # Example
//!
//! ```
//! use lamina::algo::smooth::{laplacian_smooth, SmoothOptions};
//! use lamina::mesh::{build_from_triangles, HalfEdgeMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 0.5),
//! ];
//! let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! laplacian_smooth(&mut mesh, &SmoothOptions::default());
//! ```

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::mesh::{HalfEdgeMesh, MeshIndex, VertexId};

use super::Progress;

/// Options for mesh smoothing.
#[derive(Debug, Clone)]
pub struct SmoothOptions {
    /// Number of smoothing iterations.
    pub iterations: usize,

    /// Smoothing factor in [0, 1]. Higher values smooth more aggressively.
    pub lambda: f64,

    /// Whether to keep boundary vertices fixed.
    pub preserve_boundary: bool,

    /// Whether to compute vertex updates in parallel.
    pub parallel: bool,
}

impl Default for SmoothOptions {
    fn default() -> Self {
        Self {
            iterations: 1,
            lambda: 0.5,
            preserve_boundary: true,
            parallel: true,
        }
    }
}

impl SmoothOptions {
    /// Set the number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the smoothing factor, clamped to [0, 1].
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda.clamp(0.0, 1.0);
        self
    }

    /// Allow boundary vertices to move.
    pub fn allow_boundary_movement(mut self) -> Self {
        self.preserve_boundary = false;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Laplacian smoothing: move each vertex toward the centroid of its
/// neighbors by a factor of `lambda` per iteration.
///
/// Simple and fast, but shrinks closed surfaces over many iterations. Use
/// [`taubin_smooth`] when shrinkage matters.
pub fn laplacian_smooth<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, options: &SmoothOptions) {
    laplacian_smooth_with_progress(mesh, options, &Progress::none());
}

/// Laplacian smoothing with per-iteration progress reporting.
pub fn laplacian_smooth_with_progress<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    options: &SmoothOptions,
    progress: &Progress,
) {
    if options.iterations == 0 || options.lambda == 0.0 {
        return;
    }

    let fixed = fixed_vertices(mesh, options.preserve_boundary);
    for iter in 0..options.iterations {
        progress.report(iter, options.iterations, "Laplacian smoothing");
        apply_laplacian_step(mesh, &fixed, options.lambda, options.parallel);
    }
    progress.report(options.iterations, options.iterations, "Laplacian smoothing");
}

/// Taubin smoothing: alternate a positive Laplacian step (lambda) with a
/// negative inflation step (mu) to counter shrinkage.
///
/// Mu is derived from lambda with a passband frequency of 0.1, following
/// Taubin, "A signal processing approach to fair surface design" (1995).
pub fn taubin_smooth<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, options: &SmoothOptions) {
    taubin_smooth_with_progress(mesh, options, &Progress::none());
}

/// Taubin smoothing with per-iteration progress reporting.
pub fn taubin_smooth_with_progress<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    options: &SmoothOptions,
    progress: &Progress,
) {
    if options.iterations == 0 || options.lambda == 0.0 {
        return;
    }

    let k_pb = 0.1_f64;
    let mu = options.lambda / (k_pb * options.lambda - 1.0);

    let fixed = fixed_vertices(mesh, options.preserve_boundary);
    for iter in 0..options.iterations {
        progress.report(iter, options.iterations, "Taubin smoothing");
        apply_laplacian_step(mesh, &fixed, options.lambda, options.parallel);
        apply_laplacian_step(mesh, &fixed, mu, options.parallel);
    }
    progress.report(options.iterations, options.iterations, "Taubin smoothing");
}

fn fixed_vertices<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, preserve_boundary: bool) -> Vec<bool> {
    if preserve_boundary {
        mesh.vertex_ids()
            .map(|v| mesh.is_boundary_vertex(v))
            .collect()
    } else {
        vec![false; mesh.num_vertices()]
    }
}

/// One uniform-weight Laplacian step over all vertices.
fn apply_laplacian_step<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    fixed: &[bool],
    lambda: f64,
    parallel: bool,
) {
    let num_vertices = mesh.num_vertices();

    let step = |i: usize| {
        let vid = VertexId::new(i);
        if fixed[i] {
            *mesh.position(vid)
        } else {
            laplacian_target(mesh, vid, lambda)
        }
    };

    let new_positions: Vec<Point3<f64>> = if parallel {
        (0..num_vertices).into_par_iter().map(step).collect()
    } else {
        (0..num_vertices).map(step).collect()
    };

    for (i, pos) in new_positions.into_iter().enumerate() {
        mesh.set_position(VertexId::new(i), pos);
    }
}

/// Position of a vertex after one uniform Laplacian step.
fn laplacian_target<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    v: VertexId<I>,
    lambda: f64,
) -> Point3<f64> {
    let pos = mesh.position(v);

    let mut centroid = Vector3::zeros();
    let mut count = 0;
    for neighbor in mesh.vertex_neighbors(v) {
        centroid += mesh.position(neighbor).coords;
        count += 1;
    }
    if count == 0 {
        return *pos;
    }
    centroid /= count as f64;

    Point3::from(pos.coords + lambda * (centroid - pos.coords))
}
