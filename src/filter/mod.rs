//! Polygon post-processing: thresholds, morphological buffering, and
//! simplification of extracted plane polygons.
//!
//! Extraction walks triangle borders, so raw polygons carry one vertex per
//! border edge and a jagged outline at the triangulation scale. This module
//! projects each polygon into its plane frame, discards planes and holes
//! outside the configured area and vertex-count bounds, smooths the outline
//! with an open/close pass of miter offsets, collapses collinear runs with
//! Douglas-Peucker simplification, and lifts the result back to 3D.

mod ring;

pub use ring::{ensure_ccw, offset, signed_area, simplify, Ring};

use std::time::Instant;

use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LaminaError, Result};
use crate::extract::{tangent_basis, ExtractedPlane, Polygon};
use crate::mesh::{HalfEdgeMesh, MeshIndex};

/// Tuning parameters for polygon filtering.
///
/// Areas are in squared model units, buffers and tolerances in model units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Minimum plane area. Smaller polygons are discarded outright.
    pub plane_area_min: f64,

    /// Minimum hole area. Smaller holes are filled.
    pub hole_area_min: f64,

    /// Maximum hole area. Larger holes are filled.
    pub hole_area_max: f64,

    /// Minimum number of vertices in a hole before buffering.
    pub hole_vertices_min: usize,

    /// Outward offset applied first and restored last (open/close pass).
    pub positive_buffer: f64,

    /// Inward offset applied between the outward passes.
    pub negative_buffer: f64,

    /// Douglas-Peucker tolerance applied after buffering.
    pub simplify: f64,
}

impl Default for FilterOptions {
    fn default() -> Self {
        FilterOptions {
            plane_area_min: 0.25,
            hole_area_min: 0.025,
            hole_area_max: 100.0,
            hole_vertices_min: 6,
            positive_buffer: 0.02,
            negative_buffer: 0.05,
            simplify: 0.02,
        }
    }
}

impl FilterOptions {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.plane_area_min < 0.0 {
            return Err(LaminaError::invalid_param(
                "plane_area_min",
                self.plane_area_min,
                "must be non-negative",
            ));
        }
        if self.hole_area_min < 0.0 {
            return Err(LaminaError::invalid_param(
                "hole_area_min",
                self.hole_area_min,
                "must be non-negative",
            ));
        }
        if self.hole_area_max < self.hole_area_min {
            return Err(LaminaError::invalid_param(
                "hole_area_max",
                self.hole_area_max,
                "must be at least hole_area_min",
            ));
        }
        if self.positive_buffer < 0.0 {
            return Err(LaminaError::invalid_param(
                "positive_buffer",
                self.positive_buffer,
                "must be non-negative",
            ));
        }
        if self.negative_buffer < 0.0 {
            return Err(LaminaError::invalid_param(
                "negative_buffer",
                self.negative_buffer,
                "must be non-negative",
            ));
        }
        if self.simplify < 0.0 {
            return Err(LaminaError::invalid_param(
                "simplify",
                self.simplify,
                "must be non-negative",
            ));
        }
        Ok(())
    }

    /// Set the minimum plane area.
    pub fn with_plane_area_min(mut self, min: f64) -> Self {
        self.plane_area_min = min;
        self
    }

    /// Set the hole area bounds.
    pub fn with_hole_area(mut self, min: f64, max: f64) -> Self {
        self.hole_area_min = min;
        self.hole_area_max = max;
        self
    }

    /// Set the open/close buffer distances.
    pub fn with_buffers(mut self, positive: f64, negative: f64) -> Self {
        self.positive_buffer = positive;
        self.negative_buffer = negative;
        self
    }

    /// Set the simplification tolerance.
    pub fn with_simplify(mut self, tol: f64) -> Self {
        self.simplify = tol;
        self
    }
}

/// A filtered polygon, materialized as 3D points in the source plane.
///
/// The shell is counter-clockwise and holes clockwise when viewed from the
/// dominant-direction side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilteredPolygon {
    /// Unit normal of the plane the polygon lies in.
    pub normal: Vector3<f64>,

    /// Outer boundary.
    pub shell: Vec<Point3<f64>>,

    /// Interior holes.
    pub holes: Vec<Vec<Point3<f64>>>,

    /// Shell area minus hole areas.
    pub area: f64,
}

/// Timing figures for filtering, in milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterTimings {
    /// Total time spent projecting, buffering, and simplifying polygons.
    pub filtering_ms: f64,
}

/// Filter one extracted polygon against `options`.
///
/// Returns `None` when the plane is discarded, either because its area is
/// below `plane_area_min` or because buffering collapses the shell.
pub fn filter_polygon<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    polygon: &Polygon<I>,
    peak: &Vector3<f64>,
    options: &FilterOptions,
) -> Option<FilteredPolygon> {
    let (u, v) = tangent_basis(peak);
    let project = |p: &Point3<f64>| {
        let c = p.coords;
        Point2::new(c.dot(&u), c.dot(&v))
    };

    let shell_points = polygon.shell_points(mesh);
    if shell_points.len() < 3 {
        return None;
    }

    // Height of the plane along the peak direction, for lifting back to 3D
    let height =
        shell_points.iter().map(|p| p.coords.dot(peak)).sum::<f64>() / shell_points.len() as f64;

    let mut shell: Ring = shell_points.iter().map(&project).collect();
    ensure_ccw(&mut shell);
    if signed_area(&shell) < options.plane_area_min {
        return None;
    }

    shell = open_close(&shell, options.positive_buffer, options.negative_buffer)?;
    shell = simplify(&shell, options.simplify);
    if shell.len() < 3 || signed_area(&shell) < options.plane_area_min {
        return None;
    }

    let mut holes = Vec::new();
    for h in 0..polygon.holes.len() {
        if polygon.holes[h].len() < options.hole_vertices_min {
            continue;
        }
        let mut hole: Ring = polygon.hole_points(mesh, h).iter().map(&project).collect();
        ensure_ccw(&mut hole);
        let area = signed_area(&hole);
        if area < options.hole_area_min || area > options.hole_area_max {
            continue;
        }
        // Holes buffer in the opposite sense: growing the plane shrinks them.
        // A hole that collapses during the close step is filled.
        let closed = open_close(&hole, -options.positive_buffer, -options.negative_buffer);
        let mut hole = match closed {
            Some(hole) => hole,
            None => continue,
        };
        hole = simplify(&hole, options.simplify);
        if hole.len() >= 3 {
            holes.push(hole);
        }
    }

    let area = signed_area(&shell) - holes.iter().map(|h| signed_area(h)).sum::<f64>();
    let lift = |p: &Point2<f64>| Point3::from(p.x * u + p.y * v + height * *peak);

    Some(FilteredPolygon {
        normal: *peak,
        shell: shell.iter().map(&lift).collect(),
        holes: holes
            .iter()
            .map(|h| h.iter().rev().map(&lift).collect())
            .collect(),
        area,
    })
}

/// Filter every extracted plane, dropping the ones the thresholds reject.
pub fn filter_planes<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    planes: &[ExtractedPlane<I>],
    options: &FilterOptions,
) -> (Vec<FilteredPolygon>, FilterTimings) {
    let start = Instant::now();

    let polygons: Vec<FilteredPolygon> = planes
        .iter()
        .filter_map(|plane| filter_polygon(mesh, &plane.polygon, &plane.region.peak, options))
        .collect();

    let timings = FilterTimings {
        filtering_ms: start.elapsed().as_secs_f64() * 1000.0,
    };
    debug!(
        kept = polygons.len(),
        dropped = planes.len() - polygons.len(),
        filtering_ms = timings.filtering_ms,
        "polygon filtering finished"
    );

    (polygons, timings)
}

/// Morphological open/close: offset out, back past the start, and out again.
///
/// The net offset is zero, but convex spikes narrower than the negative
/// buffer and concave notches narrower than the positive buffer are removed.
fn open_close(ring: &Ring, positive: f64, negative: f64) -> Option<Ring> {
    let ring = offset(ring, positive)?;
    let ring = offset(&ring, -(positive + negative))?;
    offset(&ring, negative)
}
