use bevy_flow_field::sim::sample::{seed_field, seed_particles};
use bevy_flow_field::sim::topology::GridTopology;
use criterion::{criterion_group, criterion_main, Criterion};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_seed(c: &mut Criterion) {
    let extent = Vec3::splat(16.0);
    let topo = GridTopology::compute(0.5, extent).unwrap(); // 32^3 = 32768 samples

    c.bench_function("seed_field_32k", |b| {
        b.iter(|| seed_field(&topo, Vec3::ZERO, &mut StdRng::seed_from_u64(42)))
    });

    c.bench_function("seed_particles_65k", |b| {
        b.iter(|| seed_particles(65_536, extent, &mut StdRng::seed_from_u64(42)))
    });
}

fn bench_topology(c: &mut Criterion) {
    let topo = GridTopology::compute(0.5, Vec3::splat(16.0)).unwrap();

    c.bench_function("flat_index_roundtrip_32k", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for coords in topo.iter_coords() {
                acc = acc.wrapping_add(topo.flat_index(coords));
            }
            acc
        })
    });
}

criterion_group!(benches, bench_seed, bench_topology);
criterion_main!(benches);
