//! Mesh and polygon file I/O.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save |
//! |--------|-----------|------|------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ |
//! | PLY | `.ply` | ✓ | ✓ |
//!
//! Extracted polygons are saved as JSON, see [`polygons`].
//!
//! # Usage
//!
//! ```no_run
//! use lamina::io::{load, save};
//! use lamina::mesh::HalfEdgeMesh;
//!
//! let mesh: HalfEdgeMesh = load("scan.ply").unwrap();
//! save(&mesh, "scan.obj").unwrap();
//! ```

pub mod obj;
pub mod ply;
pub mod polygons;

use std::path::Path;

use crate::error::{LaminaError, Result};
use crate::mesh::{HalfEdgeMesh, MeshIndex};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect<P: AsRef<Path>>(path: P) -> Result<Format> {
    let path = path.as_ref();
    Format::from_path(path).ok_or_else(|| LaminaError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file, detecting the format from the extension.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    match detect(&path)? {
        Format::Obj => obj::load(path),
        Format::Ply => ply::load(path),
    }
}

/// Save a mesh to a file, detecting the format from the extension.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    match detect(&path)? {
        Format::Obj => obj::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_extension("obj"), Some(Format::Obj));
        assert_eq!(Format::from_extension("PLY"), Some(Format::Ply));
        assert_eq!(Format::from_extension("stl"), None);

        assert_eq!(Format::from_path("a/b/scan.ply"), Some(Format::Ply));
        assert_eq!(Format::from_path("noext"), None);
    }

    #[test]
    fn test_unknown_extension_errors() {
        let result: Result<HalfEdgeMesh> = load("scan.xyz");
        assert!(matches!(
            result,
            Err(LaminaError::UnsupportedFormat { .. })
        ));
    }
}
