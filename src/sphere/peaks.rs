//! Peak detection over accumulator counts.
//!
//! A dominant surface orientation shows up as a cluster of heavily-counted
//! buckets. Detection is two-stage: local maxima over the bucket neighbor
//! graph, then single-linkage grouping of nearby maxima into count-weighted
//! average directions.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::accumulator::GaussianAccumulator;
use crate::error::{LaminaError, Result};

/// Options for peak detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakOptions {
    /// Minimum normalized bucket count for a bucket to qualify as a peak.
    pub min_value: f64,

    /// Maximum euclidean distance between two peak directions for them to
    /// join the same group (0.28 is roughly 16 degrees on the unit sphere).
    pub cluster_distance: f64,

    /// Minimum fraction of the total integrated weight a group must carry.
    pub min_cluster_weight: f64,
}

impl Default for PeakOptions {
    fn default() -> Self {
        Self {
            min_value: 0.1,
            cluster_distance: 0.28,
            min_cluster_weight: 0.01,
        }
    }
}

impl PeakOptions {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_value) {
            return Err(LaminaError::invalid_param(
                "min_value",
                self.min_value,
                "must be within [0, 1]",
            ));
        }
        if self.cluster_distance <= 0.0 {
            return Err(LaminaError::invalid_param(
                "cluster_distance",
                self.cluster_distance,
                "must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&self.min_cluster_weight) {
            return Err(LaminaError::invalid_param(
                "min_cluster_weight",
                self.min_cluster_weight,
                "must be within [0, 1]",
            ));
        }
        Ok(())
    }
}

/// A dominant direction recovered from the accumulator.
#[derive(Debug, Clone, Copy)]
pub struct Peak {
    /// Count-weighted average direction, unit length.
    pub direction: Vector3<f64>,

    /// Fraction of the total integrated count carried by this peak's group.
    pub weight: f64,
}

/// Find dominant directions in the accumulator.
///
/// Returns peaks sorted by descending weight. Empty when nothing has been
/// integrated or no bucket clears `min_value`.
pub fn find_peaks(acc: &GaussianAccumulator, options: &PeakOptions) -> Vec<Peak> {
    let total = acc.total();
    if total == 0 {
        return Vec::new();
    }

    let normalized = acc.normalized_counts();
    let sphere = acc.sphere();

    // Local maxima over the bucket neighbor graph. `>=` keeps plateau
    // buckets; grouping below merges them into one peak.
    let candidates: Vec<usize> = (0..acc.num_buckets())
        .filter(|&b| {
            normalized[b] >= options.min_value
                && sphere
                    .neighbors(b)
                    .iter()
                    .all(|&n| normalized[b] >= normalized[n])
        })
        .collect();

    if candidates.is_empty() {
        return Vec::new();
    }

    // Single-linkage grouping by euclidean distance between directions
    let mut group = vec![usize::MAX; candidates.len()];
    let mut num_groups = 0;
    for i in 0..candidates.len() {
        if group[i] != usize::MAX {
            continue;
        }
        group[i] = num_groups;
        let mut stack = vec![i];
        while let Some(a) = stack.pop() {
            let da = sphere.direction(candidates[a]);
            for b in 0..candidates.len() {
                if group[b] == usize::MAX
                    && (sphere.direction(candidates[b]) - da).norm() < options.cluster_distance
                {
                    group[b] = num_groups;
                    stack.push(b);
                }
            }
        }
        num_groups += 1;
    }

    // Count-weighted average direction per group
    let counts = acc.counts();
    let mut sums = vec![Vector3::zeros(); num_groups];
    let mut weights = vec![0u64; num_groups];
    for (i, &bucket) in candidates.iter().enumerate() {
        let g = group[i];
        sums[g] += counts[bucket] as f64 * sphere.direction(bucket);
        weights[g] += counts[bucket];
    }

    let mut peaks: Vec<Peak> = sums
        .into_iter()
        .zip(weights)
        .filter_map(|(sum, w)| {
            let weight = w as f64 / total as f64;
            if weight < options.min_cluster_weight || sum.norm() == 0.0 {
                return None;
            }
            Some(Peak {
                direction: sum.normalize(),
                weight,
            })
        })
        .collect();

    peaks.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    peaks
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic cone of directions around `axis`.
    fn jittered(axis: Vector3<f64>, count: usize, spread: f64) -> Vec<Vector3<f64>> {
        // Any vector not parallel to axis gives a tangent frame
        let helper = if axis.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let u = axis.cross(&helper).normalize();
        let v = axis.cross(&u);

        (0..count)
            .map(|i| {
                let phi = i as f64 * 2.399963; // golden angle
                let r = spread * (i as f64 / count.max(1) as f64);
                (axis + r * (phi.cos() * u + phi.sin() * v)).normalize()
            })
            .collect()
    }

    #[test]
    fn test_empty_accumulator_no_peaks() {
        let acc = GaussianAccumulator::new(2);
        assert!(find_peaks(&acc, &PeakOptions::default()).is_empty());
    }

    #[test]
    fn test_single_dominant_direction() {
        let mut acc = GaussianAccumulator::new(3);
        acc.integrate(&jittered(Vector3::z(), 500, 0.02));

        let peaks = find_peaks(&acc, &PeakOptions::default());
        assert_eq!(peaks.len(), 1);
        assert!(peaks[0].direction.dot(&Vector3::z()) > 0.99);
        assert!(peaks[0].weight > 0.1);
    }

    #[test]
    fn test_two_orthogonal_directions() {
        let mut acc = GaussianAccumulator::new(3);
        acc.integrate(&jittered(Vector3::z(), 600, 0.02));
        acc.integrate(&jittered(Vector3::x(), 300, 0.02));

        let peaks = find_peaks(&acc, &PeakOptions::default());
        assert_eq!(peaks.len(), 2);
        assert!(peaks
            .iter()
            .any(|p| p.direction.dot(&Vector3::z()) > 0.95));
        assert!(peaks
            .iter()
            .any(|p| p.direction.dot(&Vector3::x()) > 0.95));
    }

    #[test]
    fn test_min_value_filters_weak_peaks() {
        let mut acc = GaussianAccumulator::new(3);
        acc.integrate(&jittered(Vector3::z(), 1000, 0.02));
        // A handful of stray normals should not register as a peak
        acc.integrate(&[Vector3::x(), Vector3::x()]);

        let peaks = find_peaks(&acc, &PeakOptions::default());
        assert_eq!(peaks.len(), 1);
        assert!(peaks[0].direction.dot(&Vector3::z()) > 0.99);
    }

    #[test]
    fn test_peak_directions_unit_length() {
        let mut acc = GaussianAccumulator::new(2);
        acc.integrate(&jittered(Vector3::new(1.0, 1.0, 1.0).normalize(), 400, 0.1));

        for peak in find_peaks(&acc, &PeakOptions::default()) {
            assert!((peak.direction.norm() - 1.0).abs() < 1e-12);
        }
    }
}
