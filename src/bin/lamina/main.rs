//! Lamina CLI - planar region extraction from triangle meshes.
//!
//! Usage: lamina <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `lamina --help` for available commands.

use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use lamina::algo::{smooth, Progress};
use lamina::io;
use lamina::mesh::{mesh_from_depth, DepthImage, HalfEdgeMesh, Intrinsics};
use lamina::pipeline::{PipelineOptions, PlaneExtractor};
use nalgebra::Matrix4;

#[derive(Parser)]
#[command(name = "lamina")]
#[command(author, version, about = "Planar region extraction CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Smooth a mesh
    Smooth {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Smoothing method
        #[arg(short, long, value_enum, default_value = "laplacian")]
        method: SmoothMethod,

        /// Number of iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,

        /// Smoothing factor (0.0 to 1.0)
        #[arg(short, long, default_value = "0.5")]
        lambda: f64,

        /// Allow boundary vertices to move
        #[arg(long)]
        move_boundary: bool,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// Extract planar polygons from a mesh
    Extract {
        /// Input mesh file
        input: PathBuf,

        /// Output polygon file (.json document, or .obj polylines)
        output: PathBuf,

        /// Pipeline configuration JSON file (defaults apply to omitted fields)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Build a mesh from a raw depth image (row-major f32, meters)
    Depth {
        /// Input raw depth file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Image rows
        #[arg(long)]
        rows: usize,

        /// Image columns
        #[arg(long)]
        cols: usize,

        /// Focal length in pixels, x
        #[arg(long)]
        fx: f64,

        /// Focal length in pixels, y
        #[arg(long)]
        fy: f64,

        /// Principal point, x
        #[arg(long)]
        cx: f64,

        /// Principal point, y
        #[arg(long)]
        cy: f64,

        /// Pixel stride (1 = full resolution)
        #[arg(long, default_value = "1")]
        stride: usize,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum SmoothMethod {
    /// Uniform Laplacian smoothing
    Laplacian,
    /// Taubin smoothing (shrinkage-resistant)
    Taubin,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Smooth {
            input,
            output,
            method,
            iterations,
            lambda,
            move_boundary,
            sequential,
        } => {
            cmd_smooth(
                &input,
                &output,
                method,
                iterations,
                lambda,
                move_boundary,
                sequential,
            )?;
        }

        Commands::Extract {
            input,
            output,
            config,
        } => {
            cmd_extract(&input, &output, config.as_deref())?;
        }

        Commands::Depth {
            input,
            output,
            rows,
            cols,
            fx,
            fy,
            cx,
            cy,
            stride,
        } => {
            cmd_depth(&input, &output, rows, cols, fx, fy, cx, cy, stride)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    Progress::new(|current, total, message| {
        if total == 0 {
            return;
        }
        let percent = (current * 100) / total;

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar: String = std::iter::repeat('=').take(filled).collect();
        let space: String = std::iter::repeat(' ').take(bar_width - filled).collect();

        eprint!("\r[{}{}] {:3}% {}", bar, space, percent, message);
        let _ = std::io::stderr().flush();
        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: HalfEdgeMesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Half-edges: {}", mesh.num_halfedges());

    let mut total_area = 0.0;
    let mut min_area = f64::MAX;
    let mut max_area = 0.0_f64;
    for fid in mesh.face_ids() {
        let area = mesh.face_area(fid);
        total_area += area;
        min_area = min_area.min(area);
        max_area = max_area.max(area);
    }
    println!("Surface area: {:.6}", total_area);
    println!("Face area range: [{:.6}, {:.6}]", min_area, max_area);

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    let boundary_verts = mesh
        .vertex_ids()
        .filter(|&v| mesh.is_boundary_vertex(v))
        .count();
    if boundary_verts == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary vertices)", boundary_verts);
    }

    Ok(())
}

fn cmd_smooth(
    input: &PathBuf,
    output: &PathBuf,
    method: SmoothMethod,
    iterations: usize,
    lambda: f64,
    move_boundary: bool,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh: HalfEdgeMesh = io::load(input)?;

    println!(
        "Loaded: {} vertices, {} faces",
        mesh.num_vertices(),
        mesh.num_faces()
    );

    let options = smooth::SmoothOptions {
        iterations,
        lambda,
        preserve_boundary: !move_boundary,
        parallel: !sequential,
    };

    let mode = if sequential { "sequential" } else { "parallel" };
    let progress = create_progress();

    let start = Instant::now();
    match method {
        SmoothMethod::Laplacian => {
            println!(
                "Applying Laplacian smoothing ({} iterations, lambda={}, {})...",
                iterations, lambda, mode
            );
            smooth::laplacian_smooth_with_progress(&mut mesh, &options, &progress);
        }
        SmoothMethod::Taubin => {
            println!(
                "Applying Taubin smoothing ({} iterations, lambda={}, {})...",
                iterations, lambda, mode
            );
            smooth::taubin_smooth_with_progress(&mut mesh, &options, &progress);
        }
    }
    let elapsed = start.elapsed();

    io::save(&mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_extract(
    input: &PathBuf,
    output: &PathBuf,
    config: Option<&std::path::Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = match config {
        Some(path) => {
            let file = File::open(path)?;
            serde_json::from_reader(file)?
        }
        None => PipelineOptions::default(),
    };

    let mesh: HalfEdgeMesh = io::load(input)?;
    println!(
        "Loaded: {} vertices, {} faces",
        mesh.num_vertices(),
        mesh.num_faces()
    );

    let mut extractor = PlaneExtractor::new(options)?;
    let extraction = extractor.extract(&mesh)?;

    println!("Dominant directions: {}", extraction.peaks.len());
    for peak in &extraction.peaks {
        println!(
            "  [{:+.3}, {:+.3}, {:+.3}] weight {:.3}",
            peak.direction.x, peak.direction.y, peak.direction.z, peak.weight
        );
    }
    println!("Polygons: {}", extraction.polygons.len());
    let timings = &extraction.timings;
    println!(
        "Timing: normals {:.1}ms, peaks {:.1}ms, extraction {:.1}ms, filtering {:.1}ms",
        timings.normals_ms, timings.peaks_ms, timings.extraction_ms, timings.filtering_ms
    );

    let document = io::polygons::PolygonDocument {
        mesh_faces: mesh.num_faces(),
        polygons: extraction.polygons,
    };
    let is_obj = output
        .extension()
        .map(|e| e.eq_ignore_ascii_case("obj"))
        .unwrap_or(false);
    if is_obj {
        io::polygons::save_obj(&document, output)?;
    } else {
        io::polygons::save(&document, output)?;
    }
    println!("Saved: {}", output.display());

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_depth(
    input: &PathBuf,
    output: &PathBuf,
    rows: usize,
    cols: usize,
    fx: f64,
    fy: f64,
    cx: f64,
    cy: f64,
    stride: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut bytes = Vec::new();
    File::open(input)?.read_to_end(&mut bytes)?;
    if bytes.len() != rows * cols * 4 {
        return Err(format!(
            "expected {} bytes for a {}x{} f32 image, got {}",
            rows * cols * 4,
            rows,
            cols,
            bytes.len()
        )
        .into());
    }
    let data: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    let depth = DepthImage::new(rows, cols, data)?;
    let intrinsics = Intrinsics { fx, fy, cx, cy };
    let (mesh, timings): (HalfEdgeMesh, _) =
        mesh_from_depth(&depth, &intrinsics, &Matrix4::identity(), stride)?;

    println!(
        "Meshed: {} vertices, {} faces ({:.1}ms)",
        mesh.num_vertices(),
        mesh.num_faces(),
        timings.mesh_creation_ms
    );
    io::save(&mesh, output)?;
    println!("Saved: {}", output.display());

    Ok(())
}
