//! Gaussian sphere: normal accumulation and dominant-direction detection.
//!
//! Surface normals of a mesh are histogrammed over a refined icosahedron
//! (the "Gaussian sphere"); peaks in the histogram are the dominant plane
//! orientations the extractor then works through one by one.
//!
//! ```
//! use lamina::sphere::{find_peaks, GaussianAccumulator, PeakOptions};
//! use nalgebra::Vector3;
//!
//! let mut acc = GaussianAccumulator::new(4);
//! acc.integrate(&[Vector3::z(); 64]);
//!
//! let peaks = find_peaks(&acc, &PeakOptions::default());
//! assert!(peaks[0].direction.dot(&Vector3::z()) > 0.99);
//! ```

mod accumulator;
mod ico;
mod peaks;

pub use accumulator::{downsample_step, GaussianAccumulator};
pub use ico::IcoSphere;
pub use peaks::{find_peaks, Peak, PeakOptions};
