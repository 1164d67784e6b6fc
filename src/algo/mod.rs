//! Mesh processing algorithms.
//!
//! Depth-camera meshes carry sensor noise that disturbs face normals and,
//! through them, dominant-direction detection. Smoothing before extraction
//! tightens the normal distribution considerably.

pub mod progress;
pub mod smooth;

pub use progress::Progress;
pub use smooth::{laplacian_smooth, taubin_smooth, SmoothOptions};
