//! JSON export of extracted polygons.
//!
//! The output is a single document carrying the polygons and enough context
//! to interpret them without the source mesh. Downstream consumers (mapping,
//! visualization) read this instead of re-running extraction.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LaminaError, Result};
use crate::filter::FilteredPolygon;

/// A set of extracted polygons, as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonDocument {
    /// Number of faces in the source mesh.
    pub mesh_faces: usize,

    /// The polygons, strongest dominant direction first.
    pub polygons: Vec<FilteredPolygon>,
}

/// Save a polygon document as pretty-printed JSON.
pub fn save<P: AsRef<Path>>(document: &PolygonDocument, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, document).map_err(|e| LaminaError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    writer.flush()?;
    Ok(())
}

/// Save a polygon document as OBJ polylines.
///
/// Each ring becomes a closed `l` record; viewers that understand OBJ lines
/// can overlay the result on the source mesh.
pub fn save_obj<P: AsRef<Path>>(document: &PolygonDocument, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_obj(&mut writer, document)?;
    writer.flush()?;
    Ok(())
}

/// Write a polygon document as OBJ polylines to any writer.
pub fn write_obj<W: Write>(writer: &mut W, document: &PolygonDocument) -> Result<()> {
    writeln!(writer, "# lamina extracted polygons")?;
    // OBJ vertex indices are 1-based and global across rings
    let mut next = 1usize;
    for polygon in &document.polygons {
        for ring in std::iter::once(&polygon.shell).chain(polygon.holes.iter()) {
            for p in ring {
                writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
            }
            let ids: Vec<String> = (next..next + ring.len())
                .chain(std::iter::once(next))
                .map(|i| i.to_string())
                .collect();
            writeln!(writer, "l {}", ids.join(" "))?;
            next += ring.len();
        }
    }
    Ok(())
}

/// Load a polygon document from JSON.
pub fn load<P: AsRef<Path>>(path: P) -> Result<PolygonDocument> {
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

/// Read a polygon document from any reader.
pub fn read<R: Read>(reader: R) -> Result<PolygonDocument> {
    serde_json::from_reader(reader).map_err(|e| LaminaError::LoadError {
        path: Default::default(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};
    use tempfile::tempdir;

    fn document() -> PolygonDocument {
        PolygonDocument {
            mesh_faces: 128,
            polygons: vec![FilteredPolygon {
                normal: Vector3::z(),
                shell: vec![
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(1.0, 0.0, 0.0),
                    Point3::new(1.0, 1.0, 0.0),
                    Point3::new(0.0, 1.0, 0.0),
                ],
                holes: Vec::new(),
                area: 1.0,
            }],
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("planes.json");

        let document = document();
        save(&document, &path).unwrap();
        let reloaded = load(&path).unwrap();

        assert_eq!(reloaded.mesh_faces, 128);
        assert_eq!(reloaded.polygons.len(), 1);
        assert_eq!(reloaded.polygons[0].shell.len(), 4);
        assert!((reloaded.polygons[0].area - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_read_rejects_malformed_json() {
        assert!(read("not json".as_bytes()).is_err());
    }

    #[test]
    fn test_write_obj_polylines() {
        let mut buffer = Vec::new();
        write_obj(&mut buffer, &document()).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let vertex_lines = text.lines().filter(|l| l.starts_with("v ")).count();
        assert_eq!(vertex_lines, 4);
        assert!(text.lines().any(|l| l == "l 1 2 3 4 1"));
    }
}
