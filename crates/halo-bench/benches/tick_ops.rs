//! Criterion benchmarks for a whole cluster run and a single band update.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use halo_arena::WorldState;
use halo_bench::{reference_profile, stress_profile};
use halo_core::{Cell, RankId, StreamIndex};
use halo_engine::{CellRule, GlobalRow, LocalOffset, Simulation};
use halo_rng::{ChaChaStreams, RandomStreams};
use halo_space::RankLayout;

/// Benchmark: 10 ticks of the reference profile, cluster setup included.
fn bench_cluster_run(c: &mut Criterion) {
    let (config, ranks) = reference_profile(42, 10);
    let simulation = Simulation::builder(config).ranks(ranks).build().unwrap();

    c.bench_function("cluster_run_256x256_10ticks", |b| {
        b.iter(|| black_box(simulation.run().unwrap()));
    });
}

/// Benchmark: 2 ticks of the stress profile.
fn bench_cluster_stress(c: &mut Criterion) {
    let (config, ranks) = stress_profile(42, 2);
    let simulation = Simulation::builder(config).ranks(ranks).build().unwrap();

    let mut group = c.benchmark_group("stress");
    group.sample_size(10);
    group.bench_function("cluster_run_1024x1024_2ticks", |b| {
        b.iter(|| black_box(simulation.run().unwrap()));
    });
    group.finish();
}

/// Benchmark: one compute pass over a 64-row band of width 256.
fn bench_update_band(c: &mut Criterion) {
    let layout = RankLayout::new(256, 256, 4, RankId(1)).unwrap();
    let world = WorldState::new(layout).unwrap();
    let streams = ChaChaStreams::new(7).unwrap();
    world.fill_next(|r, _| Cell::from_coin(streams.draw(StreamIndex(r))));
    world.swap();
    let rows = world.layout().owned_rows();

    let mut group = c.benchmark_group("update_band_64x256");
    for (name, threshold) in [("ungated", 0.0), ("gated_20", 0.2)] {
        let rule = CellRule::new(threshold);
        group.bench_function(format!("{name}_global_row"), |b| {
            b.iter(|| rule.update_rows(&world, rows.clone(), &streams, &GlobalRow));
        });
        group.bench_function(format!("{name}_local_offset"), |b| {
            b.iter(|| rule.update_rows(&world, rows.clone(), &streams, &LocalOffset));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cluster_run, bench_cluster_stress, bench_update_band);
criterion_main!(benches);
