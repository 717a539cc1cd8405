//! Scenario files and record exports
//!
//! A scenario is a YAML file; every field is optional and falls back to the
//! framework's reference setup:
//!
//! ```yaml
//! grade: Low
//! schedule: OnTime
//! parameters:
//!   loss_unit: 5.0
//!   t3: 40
//! distributions:
//!   b0:
//!     distribution:
//!       type: Uniform
//!       low: 0.6
//!       high: 0.95
//! samples: 20000
//! seed: 7
//! ```

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use crosscheck_core::error::{ModelError, ParseErrorKind};
use crosscheck_core::model::{CrossCheckModel, QualityGrade, Schedule};
use crosscheck_core::monte_carlo::DistributionSpecs;
use crosscheck_core::params::ParameterVector;
use crosscheck_core::records::{RatioFormula, RawChangeRecord};
use serde::{Deserialize, Serialize};

/// Draws per Monte Carlo run unless a scenario says otherwise
pub const DEFAULT_SAMPLES: usize = 100_000;
/// Histogram bins for cost-per-success
pub const DEFAULT_BINS: usize = 35;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub grade: QualityGrade,
    pub schedule: Schedule,
    /// Overrides layered over the reference parameters
    pub parameters: ParameterVector,
    /// Overrides layered over the default uncertainty profile
    pub distributions: DistributionSpecs,
    pub samples: usize,
    pub seed: u64,
    pub histogram_bins: usize,
    pub ratio_formula: RatioFormula,
    /// Projects left out of the second pooled row of the extraction table
    pub pooled_exclude: Vec<String>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            grade: QualityGrade::default(),
            schedule: Schedule::default(),
            parameters: ParameterVector::new(),
            distributions: DistributionSpecs::new(),
            samples: DEFAULT_SAMPLES,
            seed: 0,
            histogram_bins: DEFAULT_BINS,
            ratio_formula: RatioFormula::default(),
            pooled_exclude: Vec::new(),
        }
    }
}

impl ScenarioConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read scenario {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .wrap_err_with(|| format!("Failed to parse scenario {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            grade = ?config.grade,
            schedule = ?config.schedule,
            "loaded scenario"
        );
        Ok(config)
    }

    /// The scenario file at `path`, or the reference scenario when none is given
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    #[must_use]
    pub fn model(&self) -> CrossCheckModel {
        CrossCheckModel::new(self.grade, self.schedule)
    }

    /// Reference parameters with this scenario's overrides applied
    #[must_use]
    pub fn base_parameters(&self) -> ParameterVector {
        self.parameters
            .merged_over(&CrossCheckModel::reference_parameters())
    }

    /// Default uncertainty profile around `base` with this scenario's
    /// per-parameter overrides applied
    pub fn distribution_specs(&self, base: &ParameterVector) -> Result<DistributionSpecs, ModelError> {
        let mut specs = self.model().uncertainty_profile(base)?;
        specs.extend(
            self.distributions
                .iter()
                .map(|(name, spec)| (name.clone(), spec.clone())),
        );
        Ok(specs)
    }
}

/// One entry of a record export, or why it could not be decoded
pub type RecordEntry = std::result::Result<RawChangeRecord, ParseErrorKind>;

/// Read exported review records from a JSON array.
///
/// Only an unreadable file or a document that is not an array fails. Each
/// element is decoded on its own so a badly typed record becomes a
/// [`ParseErrorKind::Malformed`] entry in place.
pub fn load_records(path: &Path) -> Result<Vec<RecordEntry>> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read records {}", path.display()))?;
    let values: Vec<serde_json::Value> = serde_json::from_str(&content)
        .wrap_err_with(|| format!("Failed to parse records {}", path.display()))?;

    let entries: Vec<RecordEntry> = values
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).map_err(|err| ParseErrorKind::Malformed {
                detail: err.to_string(),
            })
        })
        .collect();
    tracing::debug!(
        count = entries.len(),
        malformed = entries.iter().filter(|e| e.is_err()).count(),
        "loaded records"
    );
    Ok(entries)
}
