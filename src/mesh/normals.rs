//! Bulk face normal computation.
//!
//! The accumulator and the plane extractor both consume per-face unit normals.
//! Computing them once, in parallel, and sharing the result avoids recomputing
//! cross products in every stage.

use nalgebra::Vector3;
use rayon::prelude::*;

use super::halfedge::HalfEdgeMesh;
use super::index::{FaceId, MeshIndex};

/// Per-face unit normals for a mesh.
///
/// Faces whose area is below `degenerate_eps` receive a zero normal and are
/// reported as degenerate; downstream consumers skip them.
#[derive(Debug, Clone)]
pub struct FaceNormals {
    normals: Vec<Vector3<f64>>,
    degenerate: Vec<bool>,
}

const DEGENERATE_EPS: f64 = 1e-12;

impl FaceNormals {
    /// Compute unit normals for every face of the mesh in parallel.
    pub fn compute<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Self {
        let raw: Vec<Vector3<f64>> = (0..mesh.num_faces())
            .into_par_iter()
            .map(|i| {
                let [p0, p1, p2] = mesh.face_positions(FaceId::new(i));
                (p1 - p0).cross(&(p2 - p0))
            })
            .collect();

        let degenerate: Vec<bool> = raw.iter().map(|n| n.norm() < DEGENERATE_EPS).collect();
        let normals: Vec<Vector3<f64>> = raw
            .into_iter()
            .zip(degenerate.iter())
            .map(|(n, &d)| if d { Vector3::zeros() } else { n.normalize() })
            .collect();

        Self { normals, degenerate }
    }

    /// Number of faces covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.normals.len()
    }

    /// Whether no faces are covered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.normals.is_empty()
    }

    /// The unit normal of a face (zero vector for degenerate faces).
    #[inline]
    pub fn get<I: MeshIndex>(&self, f: FaceId<I>) -> &Vector3<f64> {
        &self.normals[f.index()]
    }

    /// Whether a face was degenerate.
    #[inline]
    pub fn is_degenerate<I: MeshIndex>(&self, f: FaceId<I>) -> bool {
        self.degenerate[f.index()]
    }

    /// All normals as a slice, indexed by face.
    #[inline]
    pub fn as_slice(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    /// Iterate over non-degenerate normals.
    pub fn valid(&self) -> impl Iterator<Item = &Vector3<f64>> + '_ {
        self.normals
            .iter()
            .zip(self.degenerate.iter())
            .filter_map(|(n, &d)| (!d).then_some(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;
    use nalgebra::Point3;

    #[test]
    fn test_flat_square_normals() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 2, 3]];
        let mesh = build_from_triangles::<u32>(&vertices, &faces).unwrap();

        let normals = FaceNormals::compute(&mesh);
        assert_eq!(normals.len(), 2);
        for f in mesh.face_ids() {
            assert!(!normals.is_degenerate(f));
            assert!((normals.get(f) - Vector3::z()).norm() < 1e-12);
        }
        assert_eq!(normals.valid().count(), 2);
    }

    #[test]
    fn test_degenerate_face_masked() {
        // Third vertex is collinear with the first two; builder accepts it
        // (indices are distinct) but the face has zero area.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3]];
        let mesh = build_from_triangles::<u32>(&vertices, &faces).unwrap();

        let normals = FaceNormals::compute(&mesh);
        assert!(normals.is_degenerate(crate::mesh::FaceId::<u32>::new(0)));
        assert!(!normals.is_degenerate(crate::mesh::FaceId::<u32>::new(1)));
        assert_eq!(normals.get(crate::mesh::FaceId::<u32>::new(0)), &Vector3::zeros());
        assert_eq!(normals.valid().count(), 1);
    }
}
