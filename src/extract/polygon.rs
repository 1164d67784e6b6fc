//! Polygon recovery from region borders.
//!
//! A region's border consists of every half-edge whose face is inside the
//! region but whose twin's face is not (or is a mesh boundary). Walking those
//! half-edges dest-to-origin yields closed loops: the loop enclosing the
//! largest projected area is the outer shell, the rest are holes.

use nalgebra::{Point3, Vector3};

use crate::mesh::{HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

use super::options::ExtractOptions;
use super::region::PlaneRegion;

/// A polygon with holes, expressed as vertex loops into the source mesh.
#[derive(Debug, Clone)]
pub struct Polygon<I: MeshIndex = u32> {
    /// Outer boundary loop. Counter-clockwise when viewed from the
    /// dominant-direction side.
    pub shell: Vec<VertexId<I>>,

    /// Interior hole loops, each clockwise when viewed from the same side.
    pub holes: Vec<Vec<VertexId<I>>>,
}

impl<I: MeshIndex> Polygon<I> {
    /// Materialize the shell as 3D points.
    pub fn shell_points(&self, mesh: &HalfEdgeMesh<I>) -> Vec<Point3<f64>> {
        self.shell.iter().map(|&v| *mesh.position(v)).collect()
    }

    /// Materialize a hole as 3D points.
    pub fn hole_points(&self, mesh: &HalfEdgeMesh<I>, hole: usize) -> Vec<Point3<f64>> {
        self.holes[hole].iter().map(|&v| *mesh.position(v)).collect()
    }
}

/// An orthonormal tangent basis for the plane orthogonal to `w`.
pub(crate) fn tangent_basis(w: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let helper = if w.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let u = w.cross(&helper).normalize();
    let v = w.cross(&u);
    (u, v)
}

/// Signed shoelace area of a vertex loop projected onto the plane
/// orthogonal to `w`.
fn projected_signed_area<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    loop_vertices: &[VertexId<I>],
    w: &Vector3<f64>,
) -> f64 {
    let (u, v) = tangent_basis(w);
    let mut area = 0.0;
    for i in 0..loop_vertices.len() {
        let p = mesh.position(loop_vertices[i]).coords;
        let q = mesh.position(loop_vertices[(i + 1) % loop_vertices.len()]).coords;
        let (px, py) = (p.dot(&u), p.dot(&v));
        let (qx, qy) = (q.dot(&u), q.dot(&v));
        area += px * qy - qx * py;
    }
    0.5 * area
}

/// Recover the border polygon of a region.
///
/// Returns `None` for regions without a border (a region covering a closed
/// mesh) or whose shell degenerates below three vertices. Holes shorter than
/// `min_hole_vertices` are dropped.
pub fn region_to_polygon<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    region: &PlaneRegion<I>,
    options: &ExtractOptions,
) -> Option<Polygon<I>> {
    let mut in_region = vec![false; mesh.num_faces()];
    for f in &region.faces {
        in_region[f.index()] = true;
    }

    let is_border = |he: HalfEdgeId<I>| -> bool {
        let f = mesh.face_of(he);
        if !f.is_valid() || !in_region[f.index()] {
            return false;
        }
        let tf = mesh.face_of(mesh.twin(he));
        !tf.is_valid() || !in_region[tf.index()]
    };

    // Collect the border set
    let mut border = vec![false; mesh.num_halfedges()];
    let mut border_list = Vec::new();
    for f in &region.faces {
        for he in mesh.face_halfedges(*f) {
            if is_border(he) {
                border[he.index()] = true;
                border_list.push(he);
            }
        }
    }

    if border_list.is_empty() {
        return None;
    }

    // Walk border loops. From a border half-edge ending at v, the
    // continuation is found by rotating through the in-region fan at v:
    // starting at next(he), repeatedly cross to the twin's face. At a pinch
    // vertex this picks the loop that stays inside the current region fan.
    let mut visited = vec![false; mesh.num_halfedges()];
    let mut loops: Vec<Vec<VertexId<I>>> = Vec::new();

    for &start in &border_list {
        if visited[start.index()] {
            continue;
        }

        let mut loop_vertices = Vec::new();
        let mut he = start;
        let mut guard = 0;
        loop {
            visited[he.index()] = true;
            loop_vertices.push(mesh.origin(he));

            // Rotate around dest(he) to the next border half-edge
            let mut probe = mesh.next(he);
            while !border[probe.index()] {
                probe = mesh.next(mesh.twin(probe));
            }
            he = probe;

            guard += 1;
            if he == start || guard > mesh.num_halfedges() {
                break;
            }
        }

        if loop_vertices.len() >= 3 {
            loops.push(loop_vertices);
        }
    }

    if loops.is_empty() {
        return None;
    }

    // The loop with the largest projected area is the shell
    let areas: Vec<f64> = loops
        .iter()
        .map(|l| projected_signed_area(mesh, l, &region.peak).abs())
        .collect();
    let shell_idx = areas
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)?;

    let shell = loops.swap_remove(shell_idx);
    if shell.len() < 3 {
        return None;
    }

    let holes: Vec<Vec<VertexId<I>>> = loops
        .into_iter()
        .filter(|h| h.len() >= options.min_hole_vertices)
        .collect();

    Some(Polygon { shell, holes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{grow_regions, ExtractOptions};
    use crate::mesh::{build_from_triangles, FaceNormals, HalfEdgeMesh};
    use nalgebra::Point3;

    /// Flat n x n grid with a rectangular block of cells removed.
    fn grid_with_gap(
        n: usize,
        gap: Option<(std::ops::Range<usize>, std::ops::Range<usize>)>,
    ) -> HalfEdgeMesh<u32> {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }
        for j in 0..n {
            for i in 0..n {
                if let Some((ref gi, ref gj)) = gap {
                    if gi.contains(&i) && gj.contains(&j) {
                        continue;
                    }
                }
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1);
                let v11 = v01 + 1;
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }
        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn options() -> ExtractOptions {
        ExtractOptions {
            lmax: 2.0,
            min_triangles: 4,
            norm_thresh: 0.95,
            norm_thresh_min: 0.92,
            z_thresh: 0.0,
            min_hole_vertices: 6,
        }
    }

    fn single_region(mesh: &HalfEdgeMesh<u32>) -> PlaneRegion<u32> {
        let normals = FaceNormals::compute(mesh);
        let mut regions = grow_regions(mesh, &normals, &Vector3::z(), &options());
        assert_eq!(regions.len(), 1);
        regions.pop().unwrap()
    }

    #[test]
    fn test_grid_shell_no_holes() {
        let mesh = grid_with_gap(10, None);
        let region = single_region(&mesh);

        let polygon = region_to_polygon(&mesh, &region, &options()).unwrap();
        // Perimeter of a 10x10 grid: 40 unit edges
        assert_eq!(polygon.shell.len(), 40);
        assert!(polygon.holes.is_empty());

        // Shell is CCW viewed from +z and encloses the full square
        let area = projected_signed_area(&mesh, &polygon.shell, &Vector3::z());
        assert!((area - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_grid_with_hole() {
        // Remove a 2x2 block of cells in the middle
        let mesh = grid_with_gap(10, Some((4..6, 4..6)));
        let region = single_region(&mesh);

        let polygon = region_to_polygon(&mesh, &region, &options()).unwrap();
        assert_eq!(polygon.shell.len(), 40);
        assert_eq!(polygon.holes.len(), 1);
        // Perimeter of the 2x2 gap: 8 unit edges
        assert_eq!(polygon.holes[0].len(), 8);

        // Hole winds opposite to the shell
        let hole_area = projected_signed_area(&mesh, &polygon.holes[0], &Vector3::z());
        assert!((hole_area + 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_small_hole_dropped() {
        // A single missing cell leaves a 4-vertex hole, below the threshold
        let mesh = grid_with_gap(10, Some((4..5, 4..5)));
        let region = single_region(&mesh);

        let polygon = region_to_polygon(&mesh, &region, &options()).unwrap();
        assert_eq!(polygon.shell.len(), 40);
        assert!(polygon.holes.is_empty());
    }

    #[test]
    fn test_pinch_vertex_loops_stay_separate() {
        // Two diagonal cells of a flat 2x2 grid touch only at the center
        // vertex. The fan rotation at that vertex must continue each loop
        // within its own cell instead of fusing them into a figure eight.
        let mesh = grid_with_gap(2, None);
        let region = PlaneRegion {
            peak: Vector3::z(),
            faces: [0usize, 1, 6, 7]
                .iter()
                .map(|&i| crate::mesh::FaceId::new(i))
                .collect(),
        };

        let polygon = region_to_polygon(&mesh, &region, &options()).unwrap();
        // Each cell closes its own 4-vertex square of area 1; the
        // non-shell loop is a 4-vertex "hole" below the threshold.
        assert_eq!(polygon.shell.len(), 4);
        assert!(polygon.holes.is_empty());
        let area = projected_signed_area(&mesh, &polygon.shell, &Vector3::z());
        assert!((area - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_closed_mesh_region_has_no_polygon() {
        // A tetrahedron region covering every face has no border
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        let region = PlaneRegion {
            peak: Vector3::z(),
            faces: mesh.face_ids().collect(),
        };
        assert!(region_to_polygon(&mesh, &region, &options()).is_none());
    }

    #[test]
    fn test_shell_points_materialize() {
        let mesh = grid_with_gap(4, None);
        let region = single_region(&mesh);
        let polygon = region_to_polygon(&mesh, &region, &options()).unwrap();

        let points = polygon.shell_points(&mesh);
        assert_eq!(points.len(), polygon.shell.len());
        assert!(points.iter().all(|p| p.z.abs() < 1e-12));
    }
}
