//! Mesh construction from face-vertex lists.
//!
//! This module builds half-edge meshes from indexed triangle soups, the form
//! in which meshes arrive from file loaders, depth-image triangulation, and
//! callers marshaling data from other toolkits.

use std::collections::HashMap;

use nalgebra::Point3;

use super::halfedge::{Face, HalfEdge, HalfEdgeMesh};
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{LaminaError, Result};

/// Build a half-edge mesh from vertices and triangle faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
///   (counter-clockwise winding)
///
/// # Returns
/// A half-edge mesh, or an error if the input is invalid.
///
/// # Example
/// ```
/// use lamina::mesh::{build_from_triangles, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh<I>> {
    if faces.is_empty() {
        return Err(LaminaError::EmptyMesh);
    }

    // Validate vertex indices and reject degenerate triangles
    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= vertices.len() {
                return Err(LaminaError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(LaminaError::DegenerateFace { face: fi });
        }
    }

    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), faces.len());

    let vertex_ids: Vec<VertexId<I>> =
        vertices.iter().map(|&pos| mesh.add_vertex(pos)).collect();

    // Map from directed edge (v0, v1) to half-edge ID
    let mut edge_map: HashMap<(usize, usize), HalfEdgeId<I>> = HashMap::new();

    // First pass: create all half-edges and faces
    for face in faces {
        let [v0, v1, v2] = *face;

        let he0 = HalfEdgeId::<I>::new(mesh.num_halfedges());
        let he1 = HalfEdgeId::<I>::new(mesh.num_halfedges() + 1);
        let he2 = HalfEdgeId::<I>::new(mesh.num_halfedges() + 2);

        for _ in 0..3 {
            mesh.halfedges.push(HalfEdge::new());
        }

        let face_id = FaceId::<I>::new(mesh.num_faces());
        mesh.faces.push(Face::new(he0));

        for (he, origin, next) in [(he0, v0, he1), (he1, v1, he2), (he2, v2, he0)] {
            let e = mesh.halfedge_mut(he);
            e.origin = vertex_ids[origin];
            e.next = next;
            e.face = face_id;
        }

        // Vertex half-edges are overwritten for shared vertices; fixed up
        // below so boundary vertices end on a boundary half-edge.
        mesh.vertex_mut(vertex_ids[v0]).halfedge = he0;
        mesh.vertex_mut(vertex_ids[v1]).halfedge = he1;
        mesh.vertex_mut(vertex_ids[v2]).halfedge = he2;

        edge_map.insert((v0, v1), he0);
        edge_map.insert((v1, v2), he1);
        edge_map.insert((v2, v0), he2);
    }

    // Second pass: link twins, creating boundary half-edges where needed
    for (&(v0, v1), &he) in &edge_map {
        if let Some(&twin) = edge_map.get(&(v1, v0)) {
            mesh.halfedge_mut(he).twin = twin;
        } else {
            let boundary_he = HalfEdgeId::<I>::new(mesh.num_halfedges());
            mesh.halfedges.push(HalfEdge::new());

            mesh.halfedge_mut(he).twin = boundary_he;
            let bhe = mesh.halfedge_mut(boundary_he);
            bhe.origin = vertex_ids[v1];
            bhe.twin = he;
            // Face stays invalid (boundary)
        }
    }

    link_boundary_loops(&mut mesh);
    fix_boundary_vertex_halfedges(&mut mesh);

    Ok(mesh)
}

/// Link boundary half-edges into closed loops via their `next` pointers.
fn link_boundary_loops<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) {
    let boundary_hes: Vec<HalfEdgeId<I>> = mesh
        .halfedge_ids()
        .filter(|&he| mesh.is_boundary_halfedge(he))
        .collect();

    let mut outgoing: HashMap<usize, HalfEdgeId<I>> = HashMap::new();
    for he in &boundary_hes {
        outgoing.insert(mesh.origin(*he).index(), *he);
    }

    for &he in &boundary_hes {
        // The next boundary half-edge starts where this one ends
        let dest = mesh.dest(he).index();
        if let Some(&next_he) = outgoing.get(&dest) {
            mesh.halfedge_mut(he).next = next_he;
        }
    }
}

/// Ensure boundary vertices point to a boundary half-edge so circulators
/// visit the full fan.
fn fix_boundary_vertex_halfedges<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) {
    for vid in mesh.vertex_ids().collect::<Vec<_>>() {
        let start_he = mesh.vertex(vid).halfedge;
        if !start_he.is_valid() {
            continue;
        }

        let mut he = start_he;
        loop {
            if mesh.is_boundary_halfedge(he) {
                mesh.vertex_mut(vid).halfedge = he;
                break;
            }
            he = mesh.next(mesh.twin(he));
            if he == start_he {
                break;
            }
        }
    }
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Returns a (vertices, faces) tuple.
pub fn to_face_vertex<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<[usize; 3]> = mesh
        .face_ids()
        .map(|f| {
            let [v0, v1, v2] = mesh.face_triangle(f);
            [v0.index(), v1.index(), v2.index()]
        })
        .collect();

    (vertices, faces)
}
