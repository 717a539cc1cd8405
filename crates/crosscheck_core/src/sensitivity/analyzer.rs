//! Elasticity, standardized sensitivity and the tornado sweep.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::{EfficiencyModel, EfficiencyResult};
use crate::monte_carlo::{BatchMetric, MonteCarloBatch};
use crate::params::{ParameterDef, ParameterVector};

use super::SensitivityConfig;

/// Sensitivity of efficiency to one parameter.
///
/// Quantities that cannot be computed are `None`, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityEntry {
    pub name: String,
    pub base_value: f64,
    /// Finite-difference estimate of ∂E/∂x at the base point
    pub derivative: Option<f64>,
    /// (∂E/∂x)·(x/E)
    pub relative_sensitivity: Option<f64>,
    /// (∂E/∂x)·(σx/σE)
    pub standardized_sensitivity: Option<f64>,
    pub low_value: f64,
    pub high_value: f64,
    pub low_efficiency: Option<f64>,
    pub high_efficiency: Option<f64>,
}

impl SensitivityEntry {
    /// Width of the tornado bar
    #[must_use]
    pub fn swing(&self) -> Option<f64> {
        Some((self.high_efficiency? - self.low_efficiency?).abs())
    }
}

/// Full sensitivity picture around one base point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityReport {
    pub base: EfficiencyResult,
    /// Standard deviation of efficiency in the reference batch, if one was given
    pub efficiency_std_dev: Option<f64>,
    /// Widest tornado bar first
    pub entries: Vec<SensitivityEntry>,
}

impl SensitivityReport {
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&SensitivityEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// The parameter driving the largest efficiency swing
    #[must_use]
    pub fn top_driver(&self) -> Option<&SensitivityEntry> {
        self.entries.first().filter(|e| e.swing().is_some())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SensitivityAnalyzer {
    config: SensitivityConfig,
}

impl SensitivityAnalyzer {
    #[must_use]
    pub fn new(config: SensitivityConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SensitivityConfig {
        &self.config
    }

    /// Analyze every parameter `model` declares around `base`.
    ///
    /// `reference` is a Monte Carlo batch drawn around the same base point;
    /// without it standardized sensitivities are undefined. Fails only if
    /// the base point itself cannot be evaluated.
    pub fn analyze<M: EfficiencyModel + ?Sized>(
        &self,
        model: &M,
        base: &ParameterVector,
        reference: Option<&MonteCarloBatch>,
    ) -> Result<SensitivityReport, ModelError> {
        let base_result = model.evaluate(base)?;
        let efficiency_std_dev = reference
            .and_then(|batch| batch.summary(&BatchMetric::Efficiency))
            .map(|s| s.std_dev);

        let mut entries = Vec::with_capacity(model.parameters().len());
        for def in model.parameters() {
            let x = base.require(&def.name)?;
            let entry = self.analyze_parameter(
                model,
                base,
                def,
                x,
                base_result.efficiency,
                reference,
                efficiency_std_dev,
            );
            tracing::debug!(
                parameter = %entry.name,
                relative = ?entry.relative_sensitivity,
                swing = ?entry.swing(),
                "sensitivity computed"
            );
            entries.push(entry);
        }

        sort_tornado(&mut entries);

        Ok(SensitivityReport {
            base: base_result,
            efficiency_std_dev,
            entries,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn analyze_parameter<M: EfficiencyModel + ?Sized>(
        &self,
        model: &M,
        base: &ParameterVector,
        def: &ParameterDef,
        x: f64,
        e0: f64,
        reference: Option<&MonteCarloBatch>,
        efficiency_std_dev: Option<f64>,
    ) -> SensitivityEntry {
        let derivative = self.derivative(model, base, def, x, e0);

        let relative_sensitivity = match derivative {
            Some(d) if x != 0.0 && e0 != 0.0 => Some(d * x / e0),
            _ => None,
        };

        let standardized_sensitivity = (|| {
            let d = derivative?;
            let sigma_e = efficiency_std_dev.filter(|s| *s > 0.0)?;
            let sigma_x = parameter_std_dev(reference?, &def.name)?;
            Some(d * sigma_x / sigma_e)
        })();

        let fraction = self.config.sweep_fraction;
        let low_value = def.domain.clamp(x * (1.0 - fraction));
        let high_value = def.domain.clamp(x * (1.0 + fraction));

        SensitivityEntry {
            name: def.name.to_string(),
            base_value: x,
            derivative,
            relative_sensitivity,
            standardized_sensitivity,
            low_value,
            high_value,
            low_efficiency: efficiency_at(model, base, def, low_value),
            high_efficiency: efficiency_at(model, base, def, high_value),
        }
    }

    /// Central difference, falling back to a one-sided difference when a
    /// neighbour is outside the model's domain.
    fn derivative<M: EfficiencyModel + ?Sized>(
        &self,
        model: &M,
        base: &ParameterVector,
        def: &ParameterDef,
        x: f64,
        e0: f64,
    ) -> Option<f64> {
        let h = if x != 0.0 {
            (x * self.config.derivative_step).abs()
        } else {
            self.config.derivative_step
        };

        let up = efficiency_at(model, base, def, x + h);
        let down = efficiency_at(model, base, def, x - h);
        match (up, down) {
            (Some(u), Some(d)) => Some((u - d) / (2.0 * h)),
            (Some(u), None) => Some((u - e0) / h),
            (None, Some(d)) => Some((e0 - d) / h),
            (None, None) => None,
        }
    }
}

/// Efficiency with one parameter moved, `None` if the model rejects it.
fn efficiency_at<M: EfficiencyModel + ?Sized>(
    model: &M,
    base: &ParameterVector,
    def: &ParameterDef,
    value: f64,
) -> Option<f64> {
    if !def.domain.contains(value) {
        return None;
    }
    model
        .evaluate(&base.with(&def.name, value))
        .ok()
        .map(|r| r.efficiency)
}

/// σx for a parameter of the reference batch.
///
/// Clipped specs no longer follow their nominal distribution, so the spread
/// actually drawn is used for them.
fn parameter_std_dev(batch: &MonteCarloBatch, name: &str) -> Option<f64> {
    let spec = batch.specs().get(name)?;
    if spec.clip.is_some() {
        batch.empirical_std_dev(name)
    } else {
        Some(spec.distribution.std_dev())
    }
}

/// Widest swing first; undefined swings last; ties keep declaration order.
fn sort_tornado(entries: &mut [SensitivityEntry]) {
    entries.sort_by(|a, b| match (a.swing(), b.swing()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Analyze with the default ±1% derivative step and ±20% sweep.
pub fn analyze<M: EfficiencyModel + ?Sized>(
    model: &M,
    base: &ParameterVector,
    reference: Option<&MonteCarloBatch>,
) -> Result<SensitivityReport, ModelError> {
    SensitivityAnalyzer::default().analyze(model, base, reference)
}
