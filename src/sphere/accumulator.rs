//! Histogram of surface normals over the discretized sphere.
//!
//! Integrating the face normals of a mesh concentrates counts in the buckets
//! aligned with its planar structure; peak detection over the counts then
//! recovers the dominant surface orientations.

use nalgebra::Vector3;
use rayon::prelude::*;

use super::ico::IcoSphere;

/// A Gaussian accumulator: per-bucket counts over an [`IcoSphere`].
///
/// Counts accumulate across calls to [`integrate`](Self::integrate) until
/// [`clear`](Self::clear) is called.
#[derive(Debug, Clone)]
pub struct GaussianAccumulator {
    sphere: IcoSphere,
    counts: Vec<u64>,
}

impl GaussianAccumulator {
    /// Create an accumulator over an icosphere refined `level` times.
    pub fn new(level: usize) -> Self {
        let sphere = IcoSphere::new(level);
        let counts = vec![0; sphere.num_buckets()];
        Self { sphere, counts }
    }

    /// The underlying sphere discretization.
    #[inline]
    pub fn sphere(&self) -> &IcoSphere {
        &self.sphere
    }

    /// Number of buckets.
    #[inline]
    pub fn num_buckets(&self) -> usize {
        self.counts.len()
    }

    /// Raw per-bucket counts.
    #[inline]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total number of integrated normals.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Integrate a batch of unit normals.
    ///
    /// Each normal lands in the bucket with the largest dot product; zero
    /// normals (degenerate faces) are skipped. Bucket assignment runs in
    /// parallel.
    pub fn integrate(&mut self, normals: &[Vector3<f64>]) {
        let buckets: Vec<usize> = normals
            .par_iter()
            .filter(|n| n.norm_squared() > 0.5)
            .map(|n| self.sphere.bucket_of(n))
            .collect();

        for b in buckets {
            self.counts[b] += 1;
        }
    }

    /// Per-bucket counts normalized by the maximum count.
    ///
    /// All zeros if nothing has been integrated.
    pub fn normalized_counts(&self) -> Vec<f64> {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            return vec![0.0; self.counts.len()];
        }
        self.counts.iter().map(|&c| c as f64 / max as f64).collect()
    }

    /// Reset all counts to zero.
    pub fn clear(&mut self) {
        self.counts.iter_mut().for_each(|c| *c = 0);
    }
}

/// Pick a sampling step for integrating a subset of `num_normals` normals.
///
/// Aims for `max(min(num_normals, min_samples), num_normals / ds)` samples:
/// dense meshes are thinned by roughly `ds`, but never below `min_samples`
/// when that many normals exist.
pub fn downsample_step(num_normals: usize, ds: usize, min_samples: usize) -> usize {
    if num_normals == 0 {
        return 1;
    }
    let ds_normals = num_normals / ds.max(1);
    let to_sample = num_normals.min(min_samples).max(ds_normals).max(1);
    (num_normals / to_sample).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_concentrates_counts() {
        let mut acc = GaussianAccumulator::new(2);
        let normals = vec![Vector3::z(); 100];
        acc.integrate(&normals);

        assert_eq!(acc.total(), 100);

        let best = acc
            .counts()
            .iter()
            .enumerate()
            .max_by_key(|(_, &c)| c)
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(acc.counts()[best], 100);

        let dir = acc.sphere().direction(best);
        assert!(dir.dot(&Vector3::z()) > 0.95);

        let normalized = acc.normalized_counts();
        assert!((normalized[best] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_antipodal_normals_separate() {
        let mut acc = GaussianAccumulator::new(2);
        acc.integrate(&[Vector3::z(), -Vector3::z()]);

        let up = acc.sphere().bucket_of(&Vector3::z());
        let down = acc.sphere().bucket_of(&(-Vector3::z()));
        assert_ne!(up, down);
        assert_eq!(acc.counts()[up], 1);
        assert_eq!(acc.counts()[down], 1);
    }

    #[test]
    fn test_degenerate_normals_skipped() {
        let mut acc = GaussianAccumulator::new(1);
        acc.integrate(&[Vector3::zeros(), Vector3::x()]);
        assert_eq!(acc.total(), 1);
    }

    #[test]
    fn test_clear() {
        let mut acc = GaussianAccumulator::new(1);
        acc.integrate(&[Vector3::x()]);
        acc.clear();
        assert_eq!(acc.total(), 0);
        assert!(acc.normalized_counts().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_downsample_step() {
        // Dense mesh: thinned toward min_samples
        assert_eq!(downsample_step(100_000, 50, 10_000), 10);
        // Small mesh: every normal sampled
        assert_eq!(downsample_step(500, 50, 10_000), 1);
        // ds dominates once n / ds exceeds min_samples
        assert_eq!(downsample_step(1_000_000, 50, 10_000), 50);
        // Degenerate input
        assert_eq!(downsample_step(0, 50, 10_000), 1);
    }
}
