//! Extraction parameters.

use serde::{Deserialize, Serialize};

use crate::error::{LaminaError, Result};

/// Parameters controlling region growing and polygon recovery.
///
/// Defaults match a tabletop-scale RGB-D scene: metric units, centimeter
/// tolerances.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Maximum triangle edge length; longer edges exclude a triangle.
    pub lmax: f64,

    /// Minimum number of triangles for a region to survive.
    pub min_triangles: usize,

    /// Dot-product threshold with the dominant direction for seed triangles.
    pub norm_thresh: f64,

    /// Looser dot-product threshold for triangles joining a grown region.
    pub norm_thresh_min: f64,

    /// Maximum centroid distance to the seed plane along the dominant
    /// direction; 0 disables the gate.
    pub z_thresh: f64,

    /// Holes with fewer boundary vertices than this are dropped.
    pub min_hole_vertices: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            lmax: 0.10,
            min_triangles: 1000,
            norm_thresh: 0.95,
            norm_thresh_min: 0.92,
            z_thresh: 0.01,
            min_hole_vertices: 6,
        }
    }
}

impl ExtractOptions {
    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.lmax <= 0.0 {
            return Err(LaminaError::invalid_param("lmax", self.lmax, "must be > 0"));
        }
        if self.norm_thresh <= 0.0 || self.norm_thresh > 1.0 {
            return Err(LaminaError::invalid_param(
                "norm_thresh",
                self.norm_thresh,
                "must be in (0, 1]",
            ));
        }
        if self.norm_thresh_min <= 0.0 || self.norm_thresh_min > self.norm_thresh {
            return Err(LaminaError::invalid_param(
                "norm_thresh_min",
                self.norm_thresh_min,
                "must be in (0, norm_thresh]",
            ));
        }
        if self.z_thresh < 0.0 {
            return Err(LaminaError::invalid_param(
                "z_thresh",
                self.z_thresh,
                "must be >= 0",
            ));
        }
        if self.min_triangles == 0 {
            return Err(LaminaError::invalid_param(
                "min_triangles",
                self.min_triangles,
                "must be >= 1",
            ));
        }
        Ok(())
    }
}
