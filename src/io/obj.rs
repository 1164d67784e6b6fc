//! Wavefront OBJ format support.
//!
//! Only the geometry carried by a triangle mesh is read: `v` and `f` lines.
//! Normals, texture coordinates, groups, and materials are skipped. Faces
//! with more than three vertices are fan-triangulated.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{LaminaError, Result};
use crate::mesh::{build_from_triangles, to_face_vertex, HalfEdgeMesh, MeshIndex};

/// Load a mesh from an OBJ file.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read(BufReader::new(file)).map_err(|e| match e {
        LaminaError::LoadError { message, .. } => LaminaError::LoadError {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })
}

/// Read a mesh in OBJ format from any reader.
pub fn read<R: Read, I: MeshIndex>(reader: R) -> Result<HalfEdgeMesh<I>> {
    let reader = BufReader::new(reader);
    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut faces: Vec<[usize; 3]> = Vec::new();

    let parse_error = |line: usize, message: &str| LaminaError::LoadError {
        path: Default::default(),
        message: format!("line {line}: {message}"),
    };

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = lineno + 1;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let mut coord = |name: &str| -> Result<f64> {
                    tokens
                        .next()
                        .and_then(|t| t.parse().ok())
                        .ok_or_else(|| parse_error(lineno, &format!("bad {name} coordinate")))
                };
                let x = coord("x")?;
                let y = coord("y")?;
                let z = coord("z")?;
                vertices.push(Point3::new(x, y, z));
            }
            Some("f") => {
                let mut indices = Vec::with_capacity(4);
                for token in tokens {
                    // "f v", "f v/vt", "f v/vt/vn", and "f v//vn" all start
                    // with the vertex index
                    let index: isize = token
                        .split('/')
                        .next()
                        .and_then(|t| t.parse().ok())
                        .ok_or_else(|| parse_error(lineno, "bad face index"))?;
                    // Negative indices count back from the current vertex list
                    let resolved = if index < 0 {
                        vertices.len() as isize + index
                    } else {
                        index - 1
                    };
                    if resolved < 0 || resolved as usize >= vertices.len() {
                        return Err(parse_error(lineno, "face index out of range"));
                    }
                    indices.push(resolved as usize);
                }
                if indices.len() < 3 {
                    return Err(parse_error(lineno, "face with fewer than 3 vertices"));
                }
                for i in 1..indices.len() - 1 {
                    faces.push([indices[0], indices[i], indices[i + 1]]);
                }
            }
            // Comments, normals, texture coords, groups, materials
            _ => {}
        }
    }

    build_from_triangles(&vertices, &faces)
}

/// Save a mesh to an OBJ file.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write(mesh, BufWriter::new(file))
}

/// Write a mesh in OBJ format to any writer.
pub fn write<W: Write, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, mut writer: W) -> Result<()> {
    let (vertices, faces) = to_face_vertex(mesh);

    for v in &vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for f in &faces {
        // OBJ indices are 1-based
        writeln!(writer, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_read_triangles() {
        let data = "\
# a quad of two triangles
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3
f 1 3 4
";
        let mesh: HalfEdgeMesh = read(data.as_bytes()).unwrap();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 2);
    }

    #[test]
    fn test_read_fan_triangulates_quads() {
        let data = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
        let mesh: HalfEdgeMesh = read(data.as_bytes()).unwrap();
        assert_eq!(mesh.num_faces(), 2);
    }

    #[test]
    fn test_read_skips_attributes() {
        let data = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
vt 0.5 0.5
f 1/1/1 2/1/1 3/1/1
";
        let mesh: HalfEdgeMesh = read(data.as_bytes()).unwrap();
        assert_eq!(mesh.num_faces(), 1);
    }

    #[test]
    fn test_read_negative_indices() {
        let data = "\
v 0 0 0
v 1 0 0
v 0 1 0
f -3 -2 -1
";
        let mesh: HalfEdgeMesh = read(data.as_bytes()).unwrap();
        assert_eq!(mesh.num_faces(), 1);
    }

    #[test]
    fn test_read_rejects_out_of_range() {
        let data = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n";
        let result: Result<HalfEdgeMesh> = read(data.as_bytes());
        assert!(matches!(result, Err(LaminaError::LoadError { .. })));
    }

    #[test]
    fn test_write_read_round_trip() {
        let mesh = tetrahedron();

        let mut buffer = Vec::new();
        write(&mesh, &mut buffer).unwrap();
        let reloaded: HalfEdgeMesh = read(buffer.as_slice()).unwrap();

        assert_eq!(reloaded.num_vertices(), mesh.num_vertices());
        assert_eq!(reloaded.num_faces(), mesh.num_faces());
        assert!((reloaded.surface_area() - mesh.surface_area()).abs() < 1e-9);
    }
}
