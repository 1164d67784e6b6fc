//! Refined icosahedron used to discretize the unit sphere.
//!
//! Each refinement level splits every triangle into four and re-projects new
//! vertices onto the sphere, giving `20 * 4^level` near-uniform buckets. The
//! accumulator treats each triangle as one histogram bucket whose direction
//! is the unit face centroid.

use std::collections::HashMap;

use nalgebra::Vector3;

/// A subdivided icosahedron over the unit sphere.
#[derive(Debug, Clone)]
pub struct IcoSphere {
    level: usize,
    directions: Vec<Vector3<f64>>,
    neighbors: Vec<[usize; 3]>,
}

impl IcoSphere {
    /// Build an icosphere refined `level` times.
    pub fn new(level: usize) -> Self {
        let t = (1.0 + 5.0_f64.sqrt()) / 2.0;

        let mut vertices: Vec<Vector3<f64>> = [
            (-1.0, t, 0.0),
            (1.0, t, 0.0),
            (-1.0, -t, 0.0),
            (1.0, -t, 0.0),
            (0.0, -1.0, t),
            (0.0, 1.0, t),
            (0.0, -1.0, -t),
            (0.0, 1.0, -t),
            (t, 0.0, -1.0),
            (t, 0.0, 1.0),
            (-t, 0.0, -1.0),
            (-t, 0.0, 1.0),
        ]
        .iter()
        .map(|&(x, y, z)| Vector3::new(x, y, z).normalize())
        .collect();

        let mut faces: Vec<[usize; 3]> = vec![
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];

        for _ in 0..level {
            let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
            let mut next_faces = Vec::with_capacity(faces.len() * 4);

            let mut midpoint = |a: usize, b: usize, vertices: &mut Vec<Vector3<f64>>| {
                let key = (a.min(b), a.max(b));
                *midpoints.entry(key).or_insert_with(|| {
                    let m = (vertices[a] + vertices[b]).normalize();
                    vertices.push(m);
                    vertices.len() - 1
                })
            };

            for &[v0, v1, v2] in &faces {
                let a = midpoint(v0, v1, &mut vertices);
                let b = midpoint(v1, v2, &mut vertices);
                let c = midpoint(v2, v0, &mut vertices);

                next_faces.push([v0, a, c]);
                next_faces.push([v1, b, a]);
                next_faces.push([v2, c, b]);
                next_faces.push([a, b, c]);
            }

            faces = next_faces;
        }

        let directions: Vec<Vector3<f64>> = faces
            .iter()
            .map(|&[v0, v1, v2]| (vertices[v0] + vertices[v1] + vertices[v2]).normalize())
            .collect();

        // Faces sharing an edge are neighbors
        let mut edge_faces: HashMap<(usize, usize), [usize; 2]> = HashMap::new();
        for (fi, &[v0, v1, v2]) in faces.iter().enumerate() {
            for (a, b) in [(v0, v1), (v1, v2), (v2, v0)] {
                let key = (a.min(b), a.max(b));
                let entry = edge_faces.entry(key).or_insert([usize::MAX; 2]);
                if entry[0] == usize::MAX {
                    entry[0] = fi;
                } else {
                    entry[1] = fi;
                }
            }
        }

        let mut neighbors = vec![[usize::MAX; 3]; faces.len()];
        let mut slot = vec![0usize; faces.len()];
        for &[fa, fb] in edge_faces.values() {
            // The sphere is closed; every edge has exactly two faces
            neighbors[fa][slot[fa]] = fb;
            slot[fa] += 1;
            neighbors[fb][slot[fb]] = fa;
            slot[fb] += 1;
        }

        Self {
            level,
            directions,
            neighbors,
        }
    }

    /// Refinement level.
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Number of buckets (triangles).
    #[inline]
    pub fn num_buckets(&self) -> usize {
        self.directions.len()
    }

    /// Unit direction of a bucket.
    #[inline]
    pub fn direction(&self, bucket: usize) -> &Vector3<f64> {
        &self.directions[bucket]
    }

    /// All bucket directions.
    #[inline]
    pub fn directions(&self) -> &[Vector3<f64>] {
        &self.directions
    }

    /// The three edge-adjacent buckets of a bucket.
    #[inline]
    pub fn neighbors(&self, bucket: usize) -> &[usize; 3] {
        &self.neighbors[bucket]
    }

    /// The bucket whose direction is closest (max dot product) to `n`.
    pub fn bucket_of(&self, n: &Vector3<f64>) -> usize {
        let mut best = 0;
        let mut best_dot = f64::NEG_INFINITY;
        for (i, d) in self.directions.iter().enumerate() {
            let dot = d.dot(n);
            if dot > best_dot {
                best_dot = dot;
                best = i;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_counts_by_level() {
        assert_eq!(IcoSphere::new(0).num_buckets(), 20);
        assert_eq!(IcoSphere::new(1).num_buckets(), 80);
        assert_eq!(IcoSphere::new(2).num_buckets(), 320);
    }

    #[test]
    fn test_unit_directions() {
        let sphere = IcoSphere::new(2);
        for d in sphere.directions() {
            assert!((d.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_neighbor_symmetry() {
        let sphere = IcoSphere::new(1);
        for b in 0..sphere.num_buckets() {
            let nbrs = sphere.neighbors(b);
            for &n in nbrs {
                assert!(n < sphere.num_buckets());
                assert!(sphere.neighbors(n).contains(&b));
            }
            // Closed surface: all three neighbor slots filled, all distinct
            assert!(nbrs[0] != nbrs[1] && nbrs[1] != nbrs[2] && nbrs[0] != nbrs[2]);
        }
    }

    #[test]
    fn test_bucket_of_finds_nearest() {
        let sphere = IcoSphere::new(3);
        for probe in [
            Vector3::z(),
            -Vector3::z(),
            Vector3::x(),
            Vector3::new(1.0, 1.0, 1.0).normalize(),
        ] {
            let bucket = sphere.bucket_of(&probe);
            let angle = sphere.direction(bucket).dot(&probe).clamp(-1.0, 1.0).acos();
            // Level-3 buckets subtend only a few degrees
            assert!(angle < 0.1, "angle {} too large", angle);
        }
    }
}
