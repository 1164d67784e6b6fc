//! Dominant-plane polygon extraction.
//!
//! For each dominant direction found on the Gaussian sphere, triangles
//! aligned with it are grown into connected near-coplanar regions, and each
//! region's border is walked into a polygon with holes.
//!
//! ```
//! use lamina::extract::{extract_planes, ExtractOptions};
//! use lamina::mesh::{build_from_triangles, FaceNormals, HalfEdgeMesh};
//! use nalgebra::{Point3, Vector3};
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2], [0, 2, 3]];
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! let normals = FaceNormals::compute(&mesh);
//!
//! let options = ExtractOptions {
//!     lmax: 2.0,
//!     min_triangles: 1,
//!     ..Default::default()
//! };
//! let planes = extract_planes(&mesh, &normals, &Vector3::z(), &options);
//! assert_eq!(planes.len(), 1);
//! ```

mod options;
mod polygon;
mod region;

pub use options::ExtractOptions;
pub use polygon::{region_to_polygon, Polygon};
pub use region::{grow_regions, PlaneRegion};

pub(crate) use polygon::tangent_basis;

use std::time::Instant;

use nalgebra::Vector3;
use rayon::prelude::*;
use tracing::debug;

use crate::mesh::{FaceNormals, HalfEdgeMesh, MeshIndex};
use crate::sphere::Peak;

/// A planar region together with its recovered border polygon.
#[derive(Debug, Clone)]
pub struct ExtractedPlane<I: MeshIndex = u32> {
    /// The grown triangle region.
    pub region: PlaneRegion<I>,

    /// The region's border polygon.
    pub polygon: Polygon<I>,
}

/// Timing figures for extraction, in milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractTimings {
    /// Total time spent growing regions and walking borders.
    pub extraction_ms: f64,
}

/// Extract all planes aligned with one dominant direction.
///
/// Regions without a border polygon (closed-surface regions) are skipped.
pub fn extract_planes<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    normals: &FaceNormals,
    peak: &Vector3<f64>,
    options: &ExtractOptions,
) -> Vec<ExtractedPlane<I>> {
    grow_regions(mesh, normals, peak, options)
        .into_iter()
        .filter_map(|region| {
            region_to_polygon(mesh, &region, options)
                .map(|polygon| ExtractedPlane { region, polygon })
        })
        .collect()
}

/// Extract planes for every dominant direction.
///
/// Returns one plane list per peak, in peak order, plus timing figures.
pub fn extract_all<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    normals: &FaceNormals,
    peaks: &[Peak],
    options: &ExtractOptions,
) -> (Vec<Vec<ExtractedPlane<I>>>, ExtractTimings) {
    let start = Instant::now();

    // Peaks are independent, so extraction runs one rayon task per peak
    let per_peak: Vec<Vec<ExtractedPlane<I>>> = peaks
        .par_iter()
        .map(|peak| extract_planes(mesh, normals, &peak.direction, options))
        .collect();

    let timings = ExtractTimings {
        extraction_ms: start.elapsed().as_secs_f64() * 1000.0,
    };
    debug!(
        peaks = peaks.len(),
        planes = per_peak.iter().map(Vec::len).sum::<usize>(),
        extraction_ms = timings.extraction_ms,
        "plane extraction finished"
    );

    (per_peak, timings)
}
