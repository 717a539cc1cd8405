use crosscheck_core::model::{B0, CrossCheckModel, EfficiencyModel, EfficiencyResult, T1};
use crosscheck_core::monte_carlo::simulate;
use crosscheck_core::params::ParameterVector;
use crosscheck_core::sensitivity::analyze;
use crosscheck_core::{FnModel, ParameterDef};
use proptest::prelude::*;

fn cross_check_params(a: [f64; 3], b0: f64, hours: f64, loss: f64) -> ParameterVector {
    CrossCheckModel::reference_parameters()
        .with("a1", a[0])
        .with("a2", a[1])
        .with("a3", a[2])
        .with(B0, b0)
        .with(T1, hours)
        .with("loss_unit", loss)
}

proptest! {
    #[test]
    fn efficiency_rises_with_quality(
        cost in 0.01f64..1e4,
        quality in 0.0f64..1e4,
        bump in 0.01f64..100.0,
    ) {
        let lower = EfficiencyResult::from_scores(cost, quality).unwrap();
        let higher = EfficiencyResult::from_scores(cost, quality + bump).unwrap();
        prop_assert!(higher.efficiency > lower.efficiency);
    }

    #[test]
    fn efficiency_falls_with_cost(
        cost in 0.01f64..1e4,
        quality in 0.01f64..1e4,
        bump in 0.01f64..100.0,
    ) {
        let cheaper = EfficiencyResult::from_scores(cost, quality).unwrap();
        let dearer = EfficiencyResult::from_scores(cost + bump, quality).unwrap();
        prop_assert!(dearer.efficiency < cheaper.efficiency);
    }

    #[test]
    fn better_checker_is_more_efficient(
        a in prop::array::uniform3(0.1f64..0.99),
        b0 in 0.0f64..0.98,
        step in 0.001f64..0.02,
        loss in 0.0f64..20.0,
    ) {
        let model = CrossCheckModel::default();
        let base = model.evaluate(&cross_check_params(a, b0, 10.0, loss)).unwrap();
        let better = model.evaluate(&cross_check_params(a, b0 + step, 10.0, loss)).unwrap();
        prop_assert!(better.efficiency > base.efficiency);
    }

    #[test]
    fn more_hours_are_less_efficient(
        a in prop::array::uniform3(0.1f64..0.99),
        b0 in 0.0f64..1.0,
        hours in 0.0f64..100.0,
        extra in 0.5f64..50.0,
    ) {
        let model = CrossCheckModel::default();
        let base = model.evaluate(&cross_check_params(a, b0, hours, 1.0)).unwrap();
        let longer = model.evaluate(&cross_check_params(a, b0, hours + extra, 1.0)).unwrap();
        prop_assert!(longer.efficiency < base.efficiency);
    }

    #[test]
    fn evaluation_is_bit_identical(
        a in prop::array::uniform3(0.0f64..=1.0),
        b0 in 0.01f64..=1.0,
        hours in 0.1f64..100.0,
        loss in 0.0f64..50.0,
    ) {
        let model = CrossCheckModel::default();
        let params = cross_check_params(a, b0, hours, loss);
        let first = model.evaluate(&params).unwrap();
        let second = model.evaluate(&params).unwrap();
        prop_assert_eq!(first.efficiency.to_bits(), second.efficiency.to_bits());
        prop_assert_eq!(first.cost_score.to_bits(), second.cost_score.to_bits());
    }

    #[test]
    fn simulation_is_reproducible(seed in any::<u64>(), n in 1usize..300) {
        let model = CrossCheckModel::default();
        let base = CrossCheckModel::reference_parameters();
        let specs = model.uncertainty_profile(&base).unwrap();
        let first = simulate(&model, &base, &specs, n, seed).unwrap();
        let second = simulate(&model, &base, &specs, n, seed).unwrap();
        prop_assert_eq!(first.len(), n);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn tornado_is_sorted_by_swing(weights in prop::collection::vec(-5.0f64..5.0, 1..8)) {
        let names: Vec<String> = (0..weights.len()).map(|i| format!("w{i}")).collect();
        let defs = names.iter().cloned().map(ParameterDef::unbounded);
        let coefficients = weights.clone();
        let keys = names.clone();
        let model = FnModel::new(defs, move |p: &ParameterVector| {
            let mut quality = 100.0;
            for (name, w) in keys.iter().zip(&coefficients) {
                quality += w * p.require(name)?;
            }
            Ok((1.0, quality))
        });
        let base: ParameterVector = names.iter().map(|n| (n.clone(), 1.0)).collect();

        let report = analyze(&model, &base, None).unwrap();
        let swings: Vec<f64> = report.entries.iter().map(|e| e.swing().unwrap()).collect();
        prop_assert!(swings.windows(2).all(|w| w[0] >= w[1]));
    }
}
