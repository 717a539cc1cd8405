//! Tests for Monte Carlo simulation
//!
//! These tests verify that:
//! - Same seed, specs and sample count reproduce the batch exactly
//! - Longer runs extend shorter ones chunk by chunk
//! - The cross-check uncertainty profile keeps draws inside their domains
//! - Summary statistics line up with the sampled distributions
//! - Percentiles on demand agree with the sorted draws
//! - A negative spread is rejected before any draw

use crate::error::{ConfigError, SimulationError};
use crate::model::{A1, B0, CrossCheckModel, LOSS_UNIT, T1};
use crate::monte_carlo::{
    BatchMetric, CHUNK_SIZE, Distribution, DistributionSpec, percentile_sorted, simulate,
};
use crate::params::ParameterVector;

fn reference() -> (CrossCheckModel, ParameterVector) {
    (
        CrossCheckModel::default(),
        CrossCheckModel::reference_parameters(),
    )
}

#[test]
fn test_cross_check_batch_is_reproducible() {
    let (model, base) = reference();
    let specs = model.uncertainty_profile(&base).unwrap();

    let first = simulate(&model, &base, &specs, 5_000, 2024).unwrap();
    let second = simulate(&model, &base, &specs, 5_000, 2024).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.seed(), 2024);
    assert_eq!(first.requested(), 5_000);
    assert_eq!(first.excluded(), 0);
}

#[test]
fn test_longer_run_extends_shorter_one() {
    let (model, base) = reference();
    let specs = model.uncertainty_profile(&base).unwrap();

    let short = simulate(&model, &base, &specs, 2 * CHUNK_SIZE, 5).unwrap();
    let long = simulate(&model, &base, &specs, 3 * CHUNK_SIZE + 17, 5).unwrap();

    assert_eq!(long.len(), 3 * CHUNK_SIZE + 17);
    assert_eq!(short.samples(), &long.samples()[..2 * CHUNK_SIZE]);
}

#[test]
fn test_profile_draws_stay_in_domain() {
    let (model, base) = reference();
    let specs = model.uncertainty_profile(&base).unwrap();
    let batch = simulate(&model, &base, &specs, 4_000, 11).unwrap();

    for name in ["a1", "a2", "a3"] {
        let values = batch.values(&BatchMetric::Parameter(name.to_string()));
        assert!(values.iter().all(|v| (0.0..=1.0).contains(v)), "{name}");
    }

    let b0 = batch.summary(&BatchMetric::Parameter(B0.to_string())).unwrap();
    assert!(b0.min >= 0.70 && b0.max <= 0.90);

    let loss = batch.summary(&BatchMetric::Parameter(LOSS_UNIT.to_string())).unwrap();
    assert!(loss.min > 0.0);

    // Hours carry no spec and stay at base
    let t1 = batch.summary(&BatchMetric::Parameter(T1.to_string())).unwrap();
    assert_eq!((t1.min, t1.max), (10.0, 10.0));
}

#[test]
fn test_summary_statistics_track_distribution() {
    let (model, base) = reference();
    let specs = model.uncertainty_profile(&base).unwrap();
    let batch = simulate(&model, &base, &specs, 20_000, 3).unwrap();

    let b0 = batch.summary(&BatchMetric::Parameter(B0.to_string())).unwrap();
    assert!((b0.mean - 0.80).abs() < 0.005);
    // Uniform(0.7, 0.9) has σ = 0.2 / √12
    assert!((b0.std_dev - 0.2 / 12f64.sqrt()).abs() < 0.003);

    let cost = batch.summary(&BatchMetric::CostPerQuality).unwrap();
    assert!(cost.p5 <= cost.median && cost.median <= cost.p95);
    assert_eq!(cost.count, batch.len());

    let bins = batch.histogram(&BatchMetric::CostPerQuality, 35);
    assert_eq!(bins.len(), 35);
    assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), batch.len());
}

#[test]
fn test_percentile_on_demand() {
    let (model, base) = reference();
    let specs = model.uncertainty_profile(&base).unwrap();
    let batch = simulate(&model, &base, &specs, 3_000, 17).unwrap();

    let metric = BatchMetric::CostPerQuality;
    let mut sorted = batch.values(&metric);
    sorted.sort_by(f64::total_cmp);

    for p in [0.0, 0.05, 0.25, 0.5, 0.9, 1.0] {
        assert_eq!(batch.percentile(&metric, p), percentile_sorted(&sorted, p));
    }
    assert_eq!(batch.percentile(&metric, 0.0), Some(sorted[0]));
    assert_eq!(batch.percentile(&metric, 2.0), None);

    let summary = batch.summary(&metric).unwrap();
    assert_eq!(batch.percentile(&metric, 0.95), Some(summary.p95));
}

#[test]
fn test_negative_spread_is_config_error() {
    let (model, base) = reference();

    let mut specs = model.uncertainty_profile(&base).unwrap();
    specs.insert(
        A1.to_string(),
        DistributionSpec::new(Distribution::Normal {
            mean: 0.95,
            std_dev: -0.1,
        }),
    );
    assert!(matches!(
        simulate(&model, &base, &specs, 100, 1),
        Err(SimulationError::Config(ConfigError::InvalidDistribution { .. }))
    ));

    let mut specs = model.uncertainty_profile(&base).unwrap();
    specs.insert(
        LOSS_UNIT.to_string(),
        DistributionSpec::new(Distribution::LogNormal {
            mu: 0.0,
            sigma: -0.3,
        }),
    );
    assert!(matches!(
        simulate(&model, &base, &specs, 100, 1),
        Err(SimulationError::Config(ConfigError::InvalidDistribution { .. }))
    ));
}
