//! End-to-end plane extraction: normals, dominant directions, region
//! growing, border polygons, and polygon filtering in one call.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::extract::{extract_all, ExtractOptions, ExtractedPlane};
use crate::filter::{filter_planes, FilterOptions, FilteredPolygon};
use crate::mesh::{FaceNormals, HalfEdgeMesh, MeshIndex};
use crate::sphere::{downsample_step, find_peaks, GaussianAccumulator, Peak, PeakOptions};

/// Configuration for the full extraction pipeline.
///
/// Deserializes from JSON with every field optional, so a config file only
/// needs to name the parameters it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Icosahedron subdivision level of the Gaussian accumulator.
    pub accumulator_level: usize,

    /// Normal downsampling ratio fed to the accumulator.
    pub downsample: usize,

    /// Lower bound on the number of normals kept after downsampling.
    pub min_samples: usize,

    /// Dominant-direction detection parameters.
    pub peaks: PeakOptions,

    /// Region growing and border walking parameters.
    pub extract: ExtractOptions,

    /// Polygon post-processing parameters.
    pub filter: FilterOptions,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            accumulator_level: 4,
            downsample: 50,
            min_samples: 10_000,
            peaks: PeakOptions::default(),
            extract: ExtractOptions::default(),
            filter: FilterOptions::default(),
        }
    }
}

impl PipelineOptions {
    /// Check all nested parameter ranges.
    pub fn validate(&self) -> Result<()> {
        self.peaks.validate()?;
        self.extract.validate()?;
        self.filter.validate()
    }
}

/// Per-stage timing figures, in milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineTimings {
    /// Face normal computation.
    pub normals_ms: f64,

    /// Accumulator integration and peak detection.
    pub peaks_ms: f64,

    /// Region growing and border walking.
    pub extraction_ms: f64,

    /// Polygon buffering and simplification.
    pub filtering_ms: f64,
}

impl PipelineTimings {
    /// Total time across all stages.
    pub fn total_ms(&self) -> f64 {
        self.normals_ms + self.peaks_ms + self.extraction_ms + self.filtering_ms
    }
}

/// Everything the pipeline produces for one mesh.
#[derive(Debug, Clone)]
pub struct Extraction<I: MeshIndex = u32> {
    /// Dominant directions, strongest first.
    pub peaks: Vec<Peak>,

    /// Raw extracted planes, grouped per peak in peak order.
    pub planes: Vec<Vec<ExtractedPlane<I>>>,

    /// Filtered polygons across all peaks.
    pub polygons: Vec<FilteredPolygon>,

    /// Per-stage timings.
    pub timings: PipelineTimings,
}

/// The full extraction pipeline, configured once and reusable across meshes.
///
/// The Gaussian accumulator's sphere is built at construction time and
/// shared by every [`extract`](PlaneExtractor::extract) call.
#[derive(Debug)]
pub struct PlaneExtractor {
    options: PipelineOptions,
    accumulator: GaussianAccumulator,
}

impl PlaneExtractor {
    /// Build an extractor, validating `options`.
    pub fn new(options: PipelineOptions) -> Result<Self> {
        options.validate()?;
        let accumulator = GaussianAccumulator::new(options.accumulator_level);
        Ok(PlaneExtractor {
            options,
            accumulator,
        })
    }

    /// The configuration this extractor was built with.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Run the pipeline on one mesh.
    pub fn extract<I: MeshIndex>(&mut self, mesh: &HalfEdgeMesh<I>) -> Result<Extraction<I>> {
        let mut timings = PipelineTimings::default();

        let start = Instant::now();
        let normals = FaceNormals::compute(mesh);
        timings.normals_ms = start.elapsed().as_secs_f64() * 1000.0;

        let start = Instant::now();
        let num_valid = normals.valid().count();
        let step = downsample_step(num_valid, self.options.downsample, self.options.min_samples);
        let sampled: Vec<_> = normals.valid().step_by(step).copied().collect();

        self.accumulator.clear();
        self.accumulator.integrate(&sampled);
        let peaks = find_peaks(&self.accumulator, &self.options.peaks);
        timings.peaks_ms = start.elapsed().as_secs_f64() * 1000.0;

        let (planes, extract_timings) = extract_all(mesh, &normals, &peaks, &self.options.extract);
        timings.extraction_ms = extract_timings.extraction_ms;

        let flat: Vec<ExtractedPlane<I>> = planes.iter().flatten().cloned().collect();
        let (polygons, filter_timings) = filter_planes(mesh, &flat, &self.options.filter);
        timings.filtering_ms = filter_timings.filtering_ms;

        info!(
            faces = mesh.num_faces(),
            sampled_normals = sampled.len(),
            peaks = peaks.len(),
            polygons = polygons.len(),
            total_ms = timings.total_ms(),
            "plane extraction pipeline finished"
        );

        Ok(Extraction {
            peaks,
            planes,
            polygons,
            timings,
        })
    }
}
