//! End-to-end tests: records through model, analyzer and simulator
//!
//! These tests verify that:
//! - Extracted ratios feed a model directly as parameters
//! - The base efficiency sits strictly between the tornado extremes
//! - The cross-check pipeline yields a full report with a clear top driver

use super::timed_change;
use crate::model::{A1, CrossCheckModel, EfficiencyModel, FnModel, T1};
use crate::monte_carlo::simulate;
use crate::params::{Domain, ParameterDef, ParameterVector};
use crate::records::RecordExtractor;
use crate::sensitivity::{SlopeSensitivity, analyze};

#[test]
fn test_p1_ratio_through_minimal_model() {
    let records = vec![
        timed_change("P1", "2024-05-01T09:00:00Z", 2, 1),
        timed_change("P1", "2024-05-02T09:00:00Z", 4, 1),
        timed_change("P1", "2024-05-03T09:00:00Z", 3, 2),
    ];
    let report = RecordExtractor::default().extract(records);
    let params = report.project("P1").unwrap().to_parameters();

    // cost = a_hat, quality = 1 / a_hat
    let model = FnModel::new(
        [ParameterDef::fixed("a_hat", Domain::NON_NEGATIVE)],
        |p: &ParameterVector| {
            let a_hat = p.require("a_hat")?;
            Ok((a_hat, 1.0 / a_hat))
        },
    );

    let base = model.evaluate(&params).unwrap();
    let sensitivity = analyze(&model, &params, None).unwrap();
    let a_hat = sensitivity.entry("a_hat").unwrap();

    assert!((a_hat.base_value - 2.25).abs() < 1e-12);
    let (low, high) = (
        a_hat.low_efficiency.unwrap(),
        a_hat.high_efficiency.unwrap(),
    );
    assert!(low.min(high) < base.efficiency && base.efficiency < low.max(high));
    // E = a_hat⁻², so the elasticity is -2
    assert!((a_hat.relative_sensitivity.unwrap() + 2.0).abs() < 1e-3);
    assert!(a_hat.standardized_sensitivity.is_none());
}

#[test]
fn test_cross_check_full_report() {
    let model = CrossCheckModel::default();
    let base = CrossCheckModel::reference_parameters();
    let specs = model.uncertainty_profile(&base).unwrap();
    let batch = simulate(&model, &base, &specs, 10_000, 0).unwrap();

    let report = analyze(&model, &base, Some(&batch)).unwrap();

    assert_eq!(report.entries.len(), model.parameters().len());
    assert!(report.top_driver().is_some());
    assert!(report.efficiency_std_dev.unwrap() > 0.0);
    assert!(report.entry(A1).unwrap().standardized_sensitivity.is_some());
    assert!(report.entry(T1).unwrap().standardized_sensitivity.is_none());

    // More hours always cost more per success
    assert!(report.entry(T1).unwrap().derivative.unwrap() < 0.0);

    let swings: Vec<_> = report.entries.iter().filter_map(|e| e.swing()).collect();
    assert!(swings.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_slopes_from_reference_breakdown() {
    let model = CrossCheckModel::default();
    let breakdown = model
        .breakdown(&CrossCheckModel::reference_parameters())
        .unwrap();
    let slopes = SlopeSensitivity::from_breakdown(&breakdown);

    assert!((slopes.labor - 1.0 / breakdown.success).abs() < 1e-12);
    assert!(slopes.success > slopes.labor);
    assert_eq!(slopes.bars()[0].0, "Loss unit");
}
