//! Configuration for sensitivity analysis.

use serde::{Deserialize, Serialize};

/// Step sizes used by [`super::SensitivityAnalyzer`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityConfig {
    /// Relative step for the finite-difference derivative (0.01 = ±1%)
    pub derivative_step: f64,
    /// Relative perturbation for the tornado sweep (0.2 = ±20%)
    pub sweep_fraction: f64,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            derivative_step: 0.01,
            sweep_fraction: 0.2,
        }
    }
}
