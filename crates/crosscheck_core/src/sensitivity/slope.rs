//! Closed-form slopes of the cross-check cost-per-success figure.

use serde::{Deserialize, Serialize};

use crate::model::CrossCheckBreakdown;

/// How steeply `E_total = C_total / S` reacts to its three drivers.
///
/// Smaller slopes mean a more robust process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlopeSensitivity {
    /// Per unit of loss ℓ, normalised by labor cost: (1 − S) / S
    pub loss_unit: f64,
    /// Per hour of labor cost: 1 / S
    pub labor: f64,
    /// Magnitude per unit of success rate: C(1 + ℓ) / S²
    pub success: f64,
}

impl SlopeSensitivity {
    #[must_use]
    pub fn from_breakdown(breakdown: &CrossCheckBreakdown) -> Self {
        let s = breakdown.success;
        Self {
            loss_unit: (1.0 - s) / s,
            labor: 1.0 / s,
            success: (breakdown.cost * (1.0 + breakdown.loss_unit) / (s * s)).abs(),
        }
    }

    /// `(label, slope)` pairs in chart order
    #[must_use]
    pub fn bars(&self) -> [(&'static str, f64); 3] {
        [
            ("Loss unit", self.loss_unit),
            ("Labor C", self.labor),
            ("Success S", self.success),
        ]
    }
}
