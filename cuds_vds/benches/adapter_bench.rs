//! Criterion benchmarks for adapter and export throughput.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cuds_core::prelude::*;
use cuds_vds::{cuds2vds, BaseVectors, CudsRef, VdsLattice, VdsMesh, VdsParticles};

fn particle_rows(n: usize) -> Vec<Particle> {
    (0..n)
        .map(|i| {
            let row = DataContainer::new()
                .with(AttributeKey::Mass, 1.0 + i as f64)
                .unwrap()
                .with(AttributeKey::Velocity, [0.0, 0.1, i as f64])
                .unwrap();
            Particle::new([i as f64, 0.0, 0.0], row)
        })
        .collect()
}

fn make_particles(n: usize) -> VdsParticles {
    let mut particles = VdsParticles::empty("bench");
    particles.add_particles(particle_rows(n)).unwrap();
    particles
}

/// Grid of hexahedra, `n` cells per side.
fn make_mesh(n: usize) -> VdsMesh {
    let mut mesh = VdsMesh::empty("bench");
    let side = n + 1;
    let ids = mesh
        .add_points((0..side * side * side).map(|flat| {
            let (i, j, k) = (flat % side, (flat / side) % side, flat / (side * side));
            Point::new([i as f64, j as f64, k as f64], DataContainer::new())
        }))
        .unwrap();
    let at = |i: usize, j: usize, k: usize| ids[i + j * side + k * side * side];
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                let points = vec![
                    at(i, j, k),
                    at(i + 1, j, k),
                    at(i + 1, j + 1, k),
                    at(i, j + 1, k),
                    at(i, j, k + 1),
                    at(i + 1, j, k + 1),
                    at(i + 1, j + 1, k + 1),
                    at(i, j + 1, k + 1),
                ];
                let row = DataContainer::new().with(AttributeKey::Density, 1.0).unwrap();
                mesh.add_cell(Element::new(points, row)).unwrap();
            }
        }
    }
    mesh
}

fn bench_particles(c: &mut Criterion) {
    let mut group = c.benchmark_group("particles");

    for size in [100, 1000, 10000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("add", size), &size, |b, &size| {
            b.iter_batched(
                || particle_rows(size),
                |rows| {
                    let mut particles = VdsParticles::empty("bench");
                    black_box(particles.add_particles(rows).unwrap())
                },
                criterion::BatchSize::LargeInput,
            )
        });

        let particles = make_particles(size);
        group.bench_with_input(BenchmarkId::new("iterate", size), &particles, |b, p| {
            b.iter(|| black_box(p.iter_particles().count()))
        });
    }

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");

    let particles = make_particles(10000);
    group.throughput(Throughput::Elements(10000));
    group.bench_function("particles_10000", |b| {
        b.iter(|| black_box(cuds2vds(CudsRef::Particles(&particles)).unwrap()))
    });

    let mesh = make_mesh(10);
    group.throughput(Throughput::Elements(1000));
    group.bench_function("mesh_1000_hexahedra", |b| {
        b.iter(|| black_box(cuds2vds(CudsRef::Mesh(&mesh)).unwrap()))
    });

    group.finish();
}

fn bench_lattice(c: &mut Criterion) {
    let mut group = c.benchmark_group("lattice");

    for n in [10usize, 40] {
        let nodes = (n * n * n) as u64;
        group.throughput(Throughput::Elements(nodes));

        group.bench_with_input(BenchmarkId::new("fcc_points", nodes), &n, |b, &n| {
            let cell = PrimitiveCell::face_centered_cubic(0.5);
            b.iter(|| {
                black_box(
                    VdsLattice::empty(
                        "fcc",
                        BravaisLattice::FaceCenteredCubic,
                        BaseVectors::Primitive(cell.vectors()),
                        [n, n, n],
                        [0.0; 3],
                    )
                    .unwrap(),
                )
            })
        });

        let lattice = VdsLattice::empty(
            "cubic",
            BravaisLattice::Cubic,
            BaseVectors::Spacing([0.1; 3]),
            [n, n, n],
            [0.0; 3],
        )
        .unwrap();
        group.bench_with_input(BenchmarkId::new("iter_nodes", nodes), &lattice, |b, l| {
            b.iter(|| black_box(l.iter_nodes().count()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_particles, bench_export, bench_lattice);
criterion_main!(benches);
