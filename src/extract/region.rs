//! Region growing of near-coplanar triangles.
//!
//! For a dominant direction, seed triangles are those tightly aligned with it;
//! regions grow across half-edge adjacency into triangles that satisfy the
//! looser growth threshold, stay within the max edge length, and (optionally)
//! remain close to the seed plane.

use nalgebra::Vector3;

use crate::mesh::{FaceId, FaceNormals, HalfEdgeMesh, MeshIndex};

use super::options::ExtractOptions;

/// A connected set of near-coplanar triangles aligned with a dominant
/// direction.
#[derive(Debug, Clone)]
pub struct PlaneRegion<I: MeshIndex = u32> {
    /// The dominant direction this region was grown for.
    pub peak: Vector3<f64>,

    /// The faces of the region.
    pub faces: Vec<FaceId<I>>,
}

impl<I: MeshIndex> PlaneRegion<I> {
    /// Number of triangles in the region.
    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Whether the region is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Total area of the region's triangles.
    pub fn area(&self, mesh: &HalfEdgeMesh<I>) -> f64 {
        self.faces.iter().map(|&f| mesh.face_area(f)).sum()
    }
}

/// Grow all regions for one dominant direction.
///
/// Regions smaller than `min_triangles` are discarded.
pub fn grow_regions<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    normals: &FaceNormals,
    peak: &Vector3<f64>,
    options: &ExtractOptions,
) -> Vec<PlaneRegion<I>> {
    let num_faces = mesh.num_faces();

    // Per-face eligibility, computed once. A face can seed a region only if
    // it clears the tight threshold; it can join one if it clears the loose
    // threshold. Both require every edge within lmax.
    let mut seed = vec![false; num_faces];
    let mut growable = vec![false; num_faces];
    for i in 0..num_faces {
        let f = FaceId::<I>::new(i);
        if normals.is_degenerate(f) {
            continue;
        }
        let dot = normals.get(f).dot(peak);
        if dot < options.norm_thresh_min {
            continue;
        }
        if mesh.face_max_edge_length(f) > options.lmax {
            continue;
        }
        growable[i] = true;
        seed[i] = dot >= options.norm_thresh;
    }

    let mut visited = vec![false; num_faces];
    let mut regions = Vec::new();

    for i in 0..num_faces {
        if !seed[i] || visited[i] {
            continue;
        }

        // Anchor the plane-distance gate at the first seed triangle
        let anchor = mesh.face_centroid(FaceId::<I>::new(i)).coords.dot(peak);

        let mut faces = Vec::new();
        let mut stack = vec![i];
        visited[i] = true;

        while let Some(fi) = stack.pop() {
            let f = FaceId::<I>::new(fi);
            faces.push(f);

            for nf in mesh.face_neighbors(f) {
                let ni = nf.index();
                if visited[ni] || !growable[ni] {
                    continue;
                }
                if options.z_thresh > 0.0 {
                    let d = (mesh.face_centroid(nf).coords.dot(peak) - anchor).abs();
                    if d > options.z_thresh {
                        continue;
                    }
                }
                visited[ni] = true;
                stack.push(ni);
            }
        }

        if faces.len() >= options.min_triangles {
            regions.push(PlaneRegion {
                peak: *peak,
                faces,
            });
        }
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;
    use nalgebra::Point3;

    /// Flat n x n grid in the xy plane at the given height.
    fn grid(n: usize, z: f64) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f64, j as f64, z));
            }
        }
        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1);
                let v11 = v01 + 1;
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }
        (vertices, faces)
    }

    fn loose_options() -> ExtractOptions {
        ExtractOptions {
            lmax: 2.0,
            min_triangles: 4,
            norm_thresh: 0.95,
            norm_thresh_min: 0.92,
            z_thresh: 0.0,
            min_hole_vertices: 3,
        }
    }

    #[test]
    fn test_flat_grid_single_region() {
        let (vertices, faces) = grid(6, 0.0);
        let mesh = build_from_triangles::<u32>(&vertices, &faces).unwrap();
        let normals = FaceNormals::compute(&mesh);

        let regions = grow_regions(&mesh, &normals, &nalgebra::Vector3::z(), &loose_options());
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].len(), 72);
        assert!((regions[0].area(&mesh) - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_min_triangles_discards_small_regions() {
        let (vertices, faces) = grid(2, 0.0);
        let mesh = build_from_triangles::<u32>(&vertices, &faces).unwrap();
        let normals = FaceNormals::compute(&mesh);

        let mut options = loose_options();
        options.min_triangles = 100;
        let regions = grow_regions(&mesh, &normals, &nalgebra::Vector3::z(), &options);
        assert!(regions.is_empty());
    }

    #[test]
    fn test_misaligned_peak_no_regions() {
        let (vertices, faces) = grid(4, 0.0);
        let mesh = build_from_triangles::<u32>(&vertices, &faces).unwrap();
        let normals = FaceNormals::compute(&mesh);

        let regions =
            grow_regions(&mesh, &normals, &nalgebra::Vector3::x(), &loose_options());
        assert!(regions.is_empty());
    }

    #[test]
    fn test_lmax_blocks_growth() {
        let (vertices, faces) = grid(4, 0.0);
        let mesh = build_from_triangles::<u32>(&vertices, &faces).unwrap();
        let normals = FaceNormals::compute(&mesh);

        // Grid edges are 1.0 and diagonals sqrt(2); lmax below 1 rejects all
        let mut options = loose_options();
        options.lmax = 0.5;
        options.min_triangles = 1;
        let regions = grow_regions(&mesh, &normals, &nalgebra::Vector3::z(), &options);
        assert!(regions.is_empty());
    }

    #[test]
    fn test_z_thresh_truncates_connected_slope() {
        // Gently sloping connected strip: every normal clears the seed
        // threshold, so only the plane-distance gate can break growth.
        let n = 20;
        let m = 4;
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for j in 0..=m {
            for i in 0..=n {
                vertices.push(Point3::new(i as f64, j as f64, 0.005 * i as f64));
            }
        }
        for j in 0..m {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1);
                let v11 = v01 + 1;
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }
        let mesh = build_from_triangles::<u32>(&vertices, &faces).unwrap();
        let normals = FaceNormals::compute(&mesh);

        let mut options = loose_options();
        options.min_triangles = 1;
        let regions = grow_regions(&mesh, &normals, &nalgebra::Vector3::z(), &options);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].len(), 2 * n * m);

        // The seed anchor sits near x = 0; faces past x ~ 4 fall outside
        // the gate and must re-seed their own regions further up the slope.
        options.z_thresh = 0.02;
        let regions = grow_regions(&mesh, &normals, &nalgebra::Vector3::z(), &options);
        assert!(regions.len() > 1);
        assert_eq!(
            regions.iter().map(PlaneRegion::len).sum::<usize>(),
            2 * n * m
        );
    }

    #[test]
    fn test_z_thresh_separates_parallel_planes() {
        // Two coplanar-normal grids at different heights, bridged by nothing:
        // they are disconnected, so each grows its own region; with z_thresh
        // active the gate still keeps a single region within its own plane.
        let (mut vertices, mut faces) = grid(4, 0.0);
        let (upper_v, upper_f) = grid(4, 1.0);
        let offset = vertices.len();
        vertices.extend(upper_v);
        faces.extend(upper_f.into_iter().map(|f| f.map(|v| v + offset)));

        let mesh = build_from_triangles::<u32>(&vertices, &faces).unwrap();
        let normals = FaceNormals::compute(&mesh);

        let mut options = loose_options();
        options.z_thresh = 0.01;
        let regions = grow_regions(&mesh, &normals, &nalgebra::Vector3::z(), &options);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].len(), 32);
        assert_eq!(regions[1].len(), 32);
    }
}
