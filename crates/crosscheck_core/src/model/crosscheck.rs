//! The three-step worker/checker cross-check model.
//!
//! A unit of work passes through three worker steps (success probabilities
//! `a1..a3`) and a checker who catches a failure with probability `b0`. The
//! process succeeds unless the workers fail and the checker misses it:
//! `S = 1 - (1 - a1·a2·a3)(1 - b_eff)`. Labor hours are inflated by the
//! cross-check and preparation overheads, and a failed outcome adds
//! `loss_unit` times the labor cost.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, ModelError};
use crate::monte_carlo::{Distribution, DistributionSpec, DistributionSpecs};
use crate::params::{Domain, ParameterDef, ParameterVector};

use super::EfficiencyModel;

pub const A1: &str = "a1";
pub const A2: &str = "a2";
pub const A3: &str = "a3";
pub const B0: &str = "b0";
pub const T1: &str = "t1";
pub const T2: &str = "t2";
pub const T3: &str = "t3";
pub const CROSS_RATIO: &str = "cross_ratio";
pub const PREP_RATIO: &str = "prep_ratio";
pub const LOSS_UNIT: &str = "loss_unit";

static PARAMETERS: [ParameterDef; 10] = [
    ParameterDef::fixed(A1, Domain::UNIT),
    ParameterDef::fixed(A2, Domain::UNIT),
    ParameterDef::fixed(A3, Domain::UNIT),
    ParameterDef::fixed(B0, Domain::UNIT),
    ParameterDef::fixed(T1, Domain::NON_NEGATIVE),
    ParameterDef::fixed(T2, Domain::NON_NEGATIVE),
    ParameterDef::fixed(T3, Domain::NON_NEGATIVE),
    ParameterDef::fixed(CROSS_RATIO, Domain::NON_NEGATIVE),
    ParameterDef::fixed(PREP_RATIO, Domain::NON_NEGATIVE),
    ParameterDef::fixed(LOSS_UNIT, Domain::NON_NEGATIVE),
];

/// Quality grade demanded of the deliverable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QualityGrade {
    #[default]
    Standard,
    Low,
}

impl QualityGrade {
    /// (time factor, checker factor)
    #[must_use]
    pub fn factors(self) -> (f64, f64) {
        match self {
            QualityGrade::Standard => (1.0, 1.0),
            QualityGrade::Low => (2.0 / 3.0, 0.8),
        }
    }

    #[must_use]
    pub fn short_label(self) -> &'static str {
        match self {
            QualityGrade::Standard => "Std",
            QualityGrade::Low => "Low",
        }
    }
}

/// Schedule pressure on the work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Schedule {
    #[default]
    OnTime,
    Late,
}

impl Schedule {
    /// (time factor, checker factor)
    #[must_use]
    pub fn factors(self) -> (f64, f64) {
        match self {
            Schedule::OnTime => (1.0, 1.0),
            Schedule::Late => (2.0 / 3.0, 0.8),
        }
    }

    #[must_use]
    pub fn short_label(self) -> &'static str {
        match self {
            Schedule::OnTime => "On",
            Schedule::Late => "Lt",
        }
    }
}

/// Every intermediate quantity of one cross-check evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossCheckBreakdown {
    /// Probability all three worker steps succeed
    pub a_total: f64,
    /// Checker detection probability after grade and schedule
    pub b_eff: f64,
    /// Overall success rate S
    pub success: f64,
    /// Step hours after grade and schedule
    pub labor_hours: f64,
    /// Labor cost including cross-check and prep overhead (C)
    pub cost: f64,
    pub loss_unit: f64,
    /// Cost including expected failure loss (C_total)
    pub total_cost: f64,
    /// C / S
    pub base_cost_per_success: f64,
    /// C_total / S
    pub cost_per_success: f64,
}

/// One cell of the grade × schedule comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub label: String,
    pub grade: QualityGrade,
    pub schedule: Schedule,
    pub success: f64,
    pub cost_per_success: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossCheckModel {
    pub grade: QualityGrade,
    pub schedule: Schedule,
}

impl CrossCheckModel {
    #[must_use]
    pub fn new(grade: QualityGrade, schedule: Schedule) -> Self {
        Self { grade, schedule }
    }

    /// The framework's reference inputs
    #[must_use]
    pub fn reference_parameters() -> ParameterVector {
        [
            (A1, 0.95),
            (A2, 0.95),
            (A3, 0.80),
            (B0, 0.80),
            (T1, 10.0),
            (T2, 10.0),
            (T3, 30.0),
            (CROSS_RATIO, 0.30),
            (PREP_RATIO, 0.40),
            (LOSS_UNIT, 0.0),
        ]
        .into_iter()
        .collect()
    }

    /// Evaluate and keep every intermediate term.
    pub fn breakdown(&self, params: &ParameterVector) -> Result<CrossCheckBreakdown, ModelError> {
        crate::params::check_parameters(&PARAMETERS, params)?;

        let (grade_time, grade_check) = self.grade.factors();
        let (sched_time, sched_check) = self.schedule.factors();

        let a_total = params.require(A1)? * params.require(A2)? * params.require(A3)?;
        let b_eff = params.require(B0)? * grade_check * sched_check;
        let success = 1.0 - (1.0 - a_total) * (1.0 - b_eff);

        let labor_hours = (params.require(T1)? + params.require(T2)? + params.require(T3)?)
            * grade_time
            * sched_time;
        let cost =
            labor_hours * (1.0 + params.require(CROSS_RATIO)? + params.require(PREP_RATIO)?);
        let loss_unit = params.require(LOSS_UNIT)?;
        let total_cost = cost + loss_unit * cost * (1.0 - success);

        if success <= 0.0 {
            return Err(DomainError::ZeroDenominator { term: "success" }.into());
        }
        if cost <= 0.0 {
            return Err(DomainError::ZeroDenominator { term: "cost" }.into());
        }

        Ok(CrossCheckBreakdown {
            a_total,
            b_eff,
            success,
            labor_hours,
            cost,
            loss_unit,
            total_cost,
            base_cost_per_success: cost / success,
            cost_per_success: total_cost / success,
        })
    }

    /// Evaluate the same inputs under all four grade/schedule combinations.
    pub fn scenario_matrix(
        &self,
        params: &ParameterVector,
    ) -> Result<Vec<ScenarioOutcome>, ModelError> {
        let combos = [
            (QualityGrade::Standard, Schedule::OnTime),
            (QualityGrade::Standard, Schedule::Late),
            (QualityGrade::Low, Schedule::OnTime),
            (QualityGrade::Low, Schedule::Late),
        ];

        combos
            .into_iter()
            .map(|(grade, schedule)| {
                let breakdown = CrossCheckModel::new(grade, schedule).breakdown(params)?;
                Ok(ScenarioOutcome {
                    label: format!("{}/{}", grade.short_label(), schedule.short_label()),
                    grade,
                    schedule,
                    success: breakdown.success,
                    cost_per_success: breakdown.cost_per_success,
                })
            })
            .collect()
    }

    /// Input uncertainty used for the framework's Monte Carlo study.
    ///
    /// Worker probabilities get ±0.03 normal noise clipped to `[0, 1]`, the
    /// overhead ratios a ±20% triangular spread, the checker a uniform
    /// `0.70..0.90`, and the loss unit a log-normal centred on `ln(ℓ + 1)`.
    pub fn uncertainty_profile(&self, base: &ParameterVector) -> Result<DistributionSpecs, ModelError> {
        let mut specs = DistributionSpecs::new();

        for name in [A1, A2, A3] {
            let mean = base.require(name)?;
            specs.insert(
                name.to_string(),
                DistributionSpec::clipped(
                    Distribution::Normal {
                        mean,
                        std_dev: 0.03,
                    },
                    Domain::UNIT,
                ),
            );
        }

        for name in [CROSS_RATIO, PREP_RATIO] {
            let mode = base.require(name)?;
            let distribution = if mode > 0.0 {
                Distribution::Triangular {
                    low: mode * 0.8,
                    mode,
                    high: mode * 1.2,
                }
            } else {
                Distribution::Fixed { value: mode }
            };
            specs.insert(name.to_string(), DistributionSpec::new(distribution));
        }

        specs.insert(
            B0.to_string(),
            DistributionSpec::new(Distribution::Uniform {
                low: 0.70,
                high: 0.90,
            }),
        );

        let loss_unit = base.require(LOSS_UNIT)?;
        specs.insert(
            LOSS_UNIT.to_string(),
            DistributionSpec::new(Distribution::LogNormal {
                mu: (loss_unit + 1.0).ln(),
                sigma: 0.3,
            }),
        );

        Ok(specs)
    }
}

impl EfficiencyModel for CrossCheckModel {
    fn parameters(&self) -> &[ParameterDef] {
        &PARAMETERS
    }

    fn scores(&self, params: &ParameterVector) -> Result<(f64, f64), ModelError> {
        let breakdown = self.breakdown(params)?;
        Ok((breakdown.total_cost, breakdown.success))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_declared_parameters() {
        let low = CrossCheckModel::new(QualityGrade::Low, Schedule::Late);
        let model = CrossCheckModel::default();

        // Every model shares the same declaration table
        assert!(std::ptr::eq(low.parameters(), model.parameters()));

        let names: Vec<_> = model.parameters().iter().map(|d| d.name.as_ref()).collect();
        assert_eq!(names.len(), 10);
        assert_eq!(names[0], A1);
        assert_eq!(names[9], LOSS_UNIT);

        assert_eq!(model.parameter(B0).map(|d| d.domain), Some(Domain::UNIT));
        assert_eq!(
            model.parameter(T3).map(|d| d.domain),
            Some(Domain::NON_NEGATIVE)
        );
    }

    #[test]
    fn test_reference_breakdown() {
        let model = CrossCheckModel::default();
        let b = model
            .breakdown(&CrossCheckModel::reference_parameters())
            .unwrap();

        assert_close(b.a_total, 0.722);
        assert_close(b.b_eff, 0.8);
        assert_close(b.success, 1.0 - 0.278 * 0.2);
        assert_close(b.labor_hours, 50.0);
        assert_close(b.cost, 85.0);
        // loss_unit = 0 so no loss is added
        assert_close(b.total_cost, 85.0);
        assert_close(b.cost_per_success, 85.0 / b.success);
    }

    #[test]
    fn test_low_grade_late_schedule_factors() {
        let model = CrossCheckModel::new(QualityGrade::Low, Schedule::Late);
        let b = model
            .breakdown(&CrossCheckModel::reference_parameters())
            .unwrap();

        assert_close(b.b_eff, 0.8 * 0.8 * 0.8);
        assert_close(b.labor_hours, 50.0 * 4.0 / 9.0);
    }

    #[test]
    fn test_loss_unit_inflates_total_cost() {
        let model = CrossCheckModel::default();
        let params = CrossCheckModel::reference_parameters().with(LOSS_UNIT, 10.0);
        let b = model.breakdown(&params).unwrap();
        assert_close(b.total_cost, 85.0 + 10.0 * 85.0 * (1.0 - b.success));
    }

    #[test]
    fn test_evaluate_matches_breakdown() {
        let model = CrossCheckModel::default();
        let params = CrossCheckModel::reference_parameters().with(LOSS_UNIT, 5.0);
        let b = model.breakdown(&params).unwrap();
        let r = model.evaluate(&params).unwrap();

        assert_eq!(r.cost_score, b.total_cost);
        assert_eq!(r.quality_score, b.success);
        assert_close(r.efficiency, 1.0 / b.cost_per_success);
    }

    #[test]
    fn test_zero_success_is_domain_error() {
        let model = CrossCheckModel::default();
        let params = CrossCheckModel::reference_parameters()
            .with(A1, 0.0)
            .with(B0, 0.0);
        assert_eq!(
            model.evaluate(&params),
            Err(ModelError::Domain(DomainError::ZeroDenominator {
                term: "success"
            }))
        );
    }

    #[test]
    fn test_zero_hours_is_domain_error() {
        let model = CrossCheckModel::default();
        let params = CrossCheckModel::reference_parameters()
            .with(T1, 0.0)
            .with(T2, 0.0)
            .with(T3, 0.0);
        assert_eq!(
            model.evaluate(&params),
            Err(ModelError::Domain(DomainError::ZeroDenominator { term: "cost" }))
        );
    }

    #[test]
    fn test_probability_above_one_is_rejected() {
        let model = CrossCheckModel::default();
        let params = CrossCheckModel::reference_parameters().with(B0, 1.1);
        assert!(matches!(
            model.evaluate(&params),
            Err(ModelError::Domain(DomainError::OutOfDomain { .. }))
        ));
    }

    #[test]
    fn test_scenario_matrix_order_and_ranking() {
        let model = CrossCheckModel::default();
        let matrix = model
            .scenario_matrix(&CrossCheckModel::reference_parameters())
            .unwrap();

        let labels: Vec<_> = matrix.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["Std/On", "Std/Lt", "Low/On", "Low/Lt"]);

        // Weaker checking lowers success in every degraded scenario
        assert!(matrix[0].success > matrix[1].success);
        assert!(matrix[1].success > matrix[3].success);
    }

    #[test]
    fn test_uncertainty_profile_covers_sampled_inputs() {
        let model = CrossCheckModel::default();
        let specs = model
            .uncertainty_profile(&CrossCheckModel::reference_parameters())
            .unwrap();

        for name in [A1, A2, A3, B0, CROSS_RATIO, PREP_RATIO, LOSS_UNIT] {
            assert!(specs.contains_key(name), "missing spec for {name}");
        }
        assert!(!specs.contains_key(T1));
        assert_eq!(specs[A1].clip, Some(Domain::UNIT));
    }
}
