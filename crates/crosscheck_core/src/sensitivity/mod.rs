//! Sensitivity analysis of the efficiency metric.
//!
//! Two coefficients are reported per parameter:
//! - relative sensitivity (elasticity), `(∂E/∂x)·(x/E)`, from a small
//!   symmetric finite difference
//! - standardized sensitivity, `(∂E/∂x)·(σx/σE)`, which needs a reference
//!   Monte Carlo batch for the standard deviations
//!
//! Independently of the derivative step, each parameter is swept to ±20% of
//! its base value to produce tornado-diagram bars, widest first.
//!
//! ```ignore
//! let batch = simulate(&model, &base, &specs, 10_000, 0)?;
//! let report = SensitivityAnalyzer::default().analyze(&model, &base, Some(&batch))?;
//! for entry in &report.entries {
//!     println!("{} {:?}", entry.name, entry.swing());
//! }
//! ```

mod analyzer;
mod config;
mod slope;

pub use analyzer::*;
pub use config::*;
pub use slope::*;
