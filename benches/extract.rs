//! Benchmarks for the extraction pipeline.

use criterion::{criterion_group, criterion_main, Criterion};
use lamina::prelude::*;
use lamina::sphere::find_peaks;
use nalgebra::{Point3, Vector3};

fn create_grid_mesh(n: usize) -> HalfEdgeMesh {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            // Gentle height variation keeps the normals from all landing in
            // one accumulator bucket
            let z = 0.05 * ((i as f64) * 0.7).sin() * ((j as f64) * 0.4).cos();
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

    build_from_triangles(&vertices, &faces).unwrap()
}

fn bench_mesh_construction(c: &mut Criterion) {
    let mesh = create_grid_mesh(100);
    let (vertices, faces) = to_face_vertex(&mesh);

    c.bench_function("build_grid_100x100", |b| {
        b.iter(|| {
            let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
            mesh
        });
    });
}

fn bench_accumulator(c: &mut Criterion) {
    let mesh = create_grid_mesh(100);
    let normals = FaceNormals::compute(&mesh);
    let valid: Vec<Vector3<f64>> = normals.valid().copied().collect();

    c.bench_function("face_normals_100x100", |b| {
        b.iter(|| FaceNormals::compute(&mesh));
    });

    c.bench_function("accumulator_integrate_20k", |b| {
        let mut acc = GaussianAccumulator::new(4);
        b.iter(|| {
            acc.clear();
            acc.integrate(&valid);
            acc.total()
        });
    });

    c.bench_function("find_peaks_level4", |b| {
        let mut acc = GaussianAccumulator::new(4);
        acc.integrate(&valid);
        let options = PeakOptions::default();
        b.iter(|| find_peaks(&acc, &options));
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let mesh = create_grid_mesh(100);

    c.bench_function("pipeline_grid_100x100", |b| {
        let options = PipelineOptions {
            extract: ExtractOptions {
                min_triangles: 100,
                lmax: 2.0,
                z_thresh: 0.0,
                ..ExtractOptions::default()
            },
            ..PipelineOptions::default()
        };
        let mut extractor = PlaneExtractor::new(options).unwrap();
        b.iter(|| extractor.extract(&mesh).unwrap());
    });
}

criterion_group!(
    benches,
    bench_mesh_construction,
    bench_accumulator,
    bench_pipeline
);
criterion_main!(benches);
