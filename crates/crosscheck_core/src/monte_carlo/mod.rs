//! Monte Carlo uncertainty propagation.
//!
//! ```ignore
//! use crosscheck_core::model::CrossCheckModel;
//! use crosscheck_core::monte_carlo::{simulate, BatchMetric};
//!
//! let model = CrossCheckModel::default();
//! let base = CrossCheckModel::reference_parameters();
//! let specs = model.uncertainty_profile(&base)?;
//!
//! let batch = simulate(&model, &base, &specs, 100_000, 0)?;
//! let stats = batch.summary(&BatchMetric::CostPerQuality);
//! let bins = batch.histogram(&BatchMetric::CostPerQuality, 35);
//! ```

mod batch;
mod distribution;
mod simulator;

pub use batch::*;
pub use distribution::{Distribution, DistributionSpec, DistributionSpecs};
pub use simulator::*;
