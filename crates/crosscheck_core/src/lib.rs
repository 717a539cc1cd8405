//! Cross-check efficiency and sensitivity analysis engine
//!
//! This crate evaluates how efficiently a review process turns labor into
//! quality, and how strongly that efficiency depends on each input:
//! - Record extraction: per-project `a_hat`/`b_dir` ratios from exported
//!   review records
//! - Efficiency models: pluggable parameter-to-efficiency mappings, including
//!   the three-step worker/checker cross-check model
//! - Sensitivity analysis: elasticities, standardized sensitivities and
//!   ±20% tornado sweeps
//! - Monte Carlo: seeded, reproducible uncertainty propagation
//!
//! ```ignore
//! use crosscheck_core::model::CrossCheckModel;
//! use crosscheck_core::monte_carlo::simulate;
//! use crosscheck_core::sensitivity::SensitivityAnalyzer;
//!
//! let model = CrossCheckModel::default();
//! let base = CrossCheckModel::reference_parameters();
//! let specs = model.uncertainty_profile(&base)?;
//! let batch = simulate(&model, &base, &specs, 10_000, 42)?;
//! let report = SensitivityAnalyzer::default().analyze(&model, &base, Some(&batch))?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod model;
pub mod monte_carlo;
pub mod params;
pub mod records;
pub mod sensitivity;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{ConfigError, DomainError, ModelError, ParseError, SimulationError};
pub use model::{CrossCheckModel, EfficiencyModel, EfficiencyResult, FnModel};
pub use monte_carlo::{MonteCarloBatch, simulate};
pub use params::{Domain, ParameterDef, ParameterVector};
pub use records::{ExtractionReport, ProjectRecord, RecordExtractor};
pub use sensitivity::{SensitivityAnalyzer, SensitivityReport};
