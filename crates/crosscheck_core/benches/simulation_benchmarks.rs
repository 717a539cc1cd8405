//! Criterion benchmarks for crosscheck_core
//!
//! Run with: cargo bench -p crosscheck_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use crosscheck_core::model::{CrossCheckModel, EfficiencyModel};
use crosscheck_core::monte_carlo::simulate;
use crosscheck_core::sensitivity::analyze;

fn bench_evaluate(c: &mut Criterion) {
    let model = CrossCheckModel::default();
    let base = CrossCheckModel::reference_parameters();

    c.bench_function("cross_check_evaluate", |b| {
        b.iter(|| model.evaluate(black_box(&base)))
    });
}

fn bench_sensitivity(c: &mut Criterion) {
    let model = CrossCheckModel::default();
    let base = CrossCheckModel::reference_parameters();

    c.bench_function("cross_check_sensitivity", |b| {
        b.iter(|| analyze(&model, black_box(&base), None))
    });
}

fn bench_monte_carlo(c: &mut Criterion) {
    let model = CrossCheckModel::default();
    let base = CrossCheckModel::reference_parameters();
    let specs = model
        .uncertainty_profile(&base)
        .expect("reference profile is valid");

    let mut group = c.benchmark_group("monte_carlo");
    group.sample_size(20);

    for n_samples in [1_000, 10_000, 100_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(n_samples),
            &n_samples,
            |b, &n| b.iter(|| simulate(&model, &base, &specs, black_box(n), 42)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_sensitivity, bench_monte_carlo);
criterion_main!(benches);
