//! Efficiency models.
//!
//! A model maps a [`ParameterVector`] to a cost score and a quality score. The
//! efficiency combining them is fixed here so every model shares the same
//! monotonicity: more quality at equal cost is better, more cost at equal
//! quality is worse.

mod crosscheck;

pub use crosscheck::*;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, ModelError};
use crate::params::{ParameterDef, ParameterVector, check_parameters};

/// Outcome of one model evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyResult {
    pub cost_score: f64,
    pub quality_score: f64,
    /// Quality delivered per unit of cost
    pub efficiency: f64,
}

impl EfficiencyResult {
    /// Combine a cost and a quality score.
    ///
    /// Cost must be strictly positive and both scores finite.
    pub fn from_scores(cost_score: f64, quality_score: f64) -> Result<Self, DomainError> {
        if !cost_score.is_finite() {
            return Err(DomainError::NonFinite { term: "cost_score" });
        }
        if !quality_score.is_finite() {
            return Err(DomainError::NonFinite {
                term: "quality_score",
            });
        }
        if cost_score <= 0.0 {
            return Err(DomainError::ZeroDenominator { term: "cost_score" });
        }
        Ok(Self {
            cost_score,
            quality_score,
            efficiency: quality_score / cost_score,
        })
    }

    /// Cost spent per unit of quality, the reciprocal of efficiency
    #[must_use]
    pub fn cost_per_quality(&self) -> Option<f64> {
        (self.quality_score > 0.0).then(|| self.cost_score / self.quality_score)
    }
}

/// A stateless mapping from parameters to cost and quality scores
pub trait EfficiencyModel: Send + Sync {
    /// Inputs the model reads, in reporting order
    fn parameters(&self) -> &[ParameterDef];

    /// Raw `(cost_score, quality_score)` for a vector already checked against
    /// [`EfficiencyModel::parameters`]
    fn scores(&self, params: &ParameterVector) -> Result<(f64, f64), ModelError>;

    fn evaluate(&self, params: &ParameterVector) -> Result<EfficiencyResult, ModelError> {
        check_parameters(self.parameters(), params)?;
        let (cost, quality) = self.scores(params)?;
        Ok(EfficiencyResult::from_scores(cost, quality)?)
    }

    fn parameter(&self, name: &str) -> Option<&ParameterDef> {
        self.parameters().iter().find(|def| def.name == name)
    }
}

/// A model built from a closure, for ad-hoc and synthetic models
pub struct FnModel<F> {
    parameters: Vec<ParameterDef>,
    scores: F,
}

impl<F> FnModel<F>
where
    F: Fn(&ParameterVector) -> Result<(f64, f64), ModelError> + Send + Sync,
{
    pub fn new(parameters: impl IntoIterator<Item = ParameterDef>, scores: F) -> Self {
        Self {
            parameters: parameters.into_iter().collect(),
            scores,
        }
    }
}

impl<F> EfficiencyModel for FnModel<F>
where
    F: Fn(&ParameterVector) -> Result<(f64, f64), ModelError> + Send + Sync,
{
    fn parameters(&self) -> &[ParameterDef] {
        &self.parameters
    }

    fn scores(&self, params: &ParameterVector) -> Result<(f64, f64), ModelError> {
        (self.scores)(params)
    }
}

impl<F> std::fmt::Debug for FnModel<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnModel")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}
