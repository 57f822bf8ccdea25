//! Closed-loop benchmarks
//!
//! Compares the reintegrating loop (one full plant pass per step) with the
//! incremental loop, and times the raw Euler step.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pdsim::solvers::{Euler, ExplicitSolver, Solver, State2};
use pdsim::{simulate, LoopStrategy, PlantParameters, SignalKind, SimulationConfig};

fn config(horizon: f64, strategy: LoopStrategy) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.plant = PlantParameters::new(1.0, 0.0, 1.0, 2.0, 1.0).unwrap();
    config.controller.kp = 10.0;
    config.controller.kd = 2.0;
    config.signal.kind = SignalKind::Harmonic;
    config.timing.horizon = horizon;
    config.timing.strategy = strategy;
    config
}

/// Both loop strategies over growing horizons (dt = 0.01)
fn bench_loop_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("Closed Loop");

    for horizon in [0.5, 1.0, 2.0, 5.0] {
        for strategy in [LoopStrategy::Reintegrate, LoopStrategy::Incremental] {
            let config = config(horizon, strategy);
            group.bench_with_input(
                BenchmarkId::new(strategy.as_str(), horizon),
                &config,
                |b, config| b.iter(|| black_box(simulate(black_box(config)).unwrap())),
            );
        }
    }

    group.finish();
}

/// Incremental loop over the default 10 s horizon
fn bench_incremental_full_horizon(c: &mut Criterion) {
    let config = config(10.0, LoopStrategy::Incremental);

    c.bench_function("Incremental 1000 steps", |b| {
        b.iter(|| black_box(simulate(black_box(&config)).unwrap()));
    });
}

/// Forward Euler on the open-loop plant right-hand side
fn bench_euler_step(c: &mut Criterion) {
    let dt = 0.01;

    c.bench_function("Euler 1000 steps", |b| {
        b.iter(|| {
            let mut solver = Euler::default();
            for i in 0..1000 {
                solver.step(
                    |x, _t| State2::new(x[1], 1.0 - 2.0 * x[1] - x[0]),
                    i as f64 * dt,
                    black_box(dt),
                );
            }
            black_box(*solver.state());
        });
    });
}

criterion_group!(
    benches,
    bench_loop_strategies,
    bench_incremental_full_horizon,
    bench_euler_step,
);
criterion_main!(benches);
