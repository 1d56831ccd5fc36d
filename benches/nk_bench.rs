//! Criterion benchmarks for the NK simulation engine.
//!
//! Compares the stationary landscape against per-mutant regeneration and
//! measures landscape generation on its own.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nk_landscape::nk::{generate_landscape, LandscapeMode, NkConfig, PopulationKeying, Simulation};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn run_generations(config: &NkConfig, generations: usize) -> f64 {
    let mut sim = Simulation::new(config.clone()).expect("valid benchmark config");
    for _ in 0..generations {
        if sim.advance().is_err() {
            break;
        }
    }
    sim.average_fitness()
}

fn bench_landscape_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_landscape");
    group.sample_size(10);

    for &n in &[8usize, 12, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| black_box(generate_landscape(black_box(n), 2, &mut rng)))
        });
    }
    group.finish();
}

fn bench_stationary(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_stationary");
    group.sample_size(10);

    for (n, k) in [(5usize, 1usize), (10, 3), (14, 6)] {
        let config = NkConfig::new(n, k).with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("n{n}_k{k}"), n),
            &config,
            |b, config| b.iter(|| black_box(run_generations(black_box(config), 50))),
        );
    }
    group.finish();
}

fn bench_per_mutant(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_per_mutant");
    group.sample_size(10);

    for (n, k) in [(5usize, 1usize), (8, 2)] {
        let config = NkConfig::new(n, k)
            .with_landscape_mode(LandscapeMode::PerMutant)
            .with_keying(PopulationKeying::ByIdentity)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("n{n}_k{k}"), n),
            &config,
            |b, config| b.iter(|| black_box(run_generations(black_box(config), 20))),
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_landscape_generation,
    bench_stationary,
    bench_per_mutant
);
criterion_main!(benches);
