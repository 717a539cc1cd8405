//! Monte Carlo batches and the statistics derived from them.
//!
//! A batch keeps every successful draw, so summaries and histograms for any
//! output or input can be recomputed at any time without re-sampling.

use serde::{Deserialize, Serialize};

use crate::model::EfficiencyResult;
use crate::params::ParameterVector;

use super::DistributionSpecs;

/// One draw: the full input vector and what the model made of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloSample {
    pub parameters: ParameterVector,
    pub result: EfficiencyResult,
}

/// Quantity to summarise across a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BatchMetric {
    Efficiency,
    CostScore,
    QualityScore,
    /// Cost per unit of quality (reciprocal efficiency)
    CostPerQuality,
    /// A sampled or fixed input parameter
    Parameter(String),
}

impl BatchMetric {
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            BatchMetric::Efficiency => "Efficiency".to_string(),
            BatchMetric::CostScore => "Cost".to_string(),
            BatchMetric::QualityScore => "Quality".to_string(),
            BatchMetric::CostPerQuality => "Cost per quality".to_string(),
            BatchMetric::Parameter(name) => name.clone(),
        }
    }

    fn extract(&self, sample: &MonteCarloSample) -> Option<f64> {
        match self {
            BatchMetric::Efficiency => Some(sample.result.efficiency),
            BatchMetric::CostScore => Some(sample.result.cost_score),
            BatchMetric::QualityScore => Some(sample.result.quality_score),
            BatchMetric::CostPerQuality => sample.result.cost_per_quality(),
            BatchMetric::Parameter(name) => sample.parameters.get(name),
        }
    }
}

/// Descriptive statistics of one metric over a batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub p5: f64,
    pub p95: f64,
}

impl SummaryStats {
    /// Summarise a set of values, `None` when there are none.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            count: sorted.len(),
            mean,
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            median: percentile_sorted(&sorted, 0.5)?,
            p5: percentile_sorted(&sorted, 0.05)?,
            p95: percentile_sorted(&sorted, 0.95)?,
        })
    }
}

/// One equal-width histogram bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Linear-interpolated percentile of already sorted values.
///
/// `p` is a fraction in `[0, 1]`.
#[must_use]
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let weight = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * weight)
}

/// Bin values into `bins` equal-width buckets spanning their range.
///
/// The last bin is closed on the right. A constant input yields one bin.
#[must_use]
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max <= min {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: if i == bins - 1 {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

/// All successful draws of one simulation run plus how they were produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloBatch {
    pub(crate) seed: u64,
    pub(crate) requested: usize,
    pub(crate) specs: DistributionSpecs,
    pub(crate) samples: Vec<MonteCarloSample>,
    pub(crate) excluded: usize,
}

impl MonteCarloBatch {
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of draws attempted
    #[must_use]
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Draws dropped because the model rejected them
    #[must_use]
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    #[must_use]
    pub fn specs(&self) -> &DistributionSpecs {
        &self.specs
    }

    #[must_use]
    pub fn samples(&self) -> &[MonteCarloSample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Metric values in draw order
    #[must_use]
    pub fn values(&self, metric: &BatchMetric) -> Vec<f64> {
        self.samples.iter().filter_map(|s| metric.extract(s)).collect()
    }

    #[must_use]
    pub fn summary(&self, metric: &BatchMetric) -> Option<SummaryStats> {
        SummaryStats::from_values(&self.values(metric))
    }

    /// Percentile of a metric, `p` as a fraction
    #[must_use]
    pub fn percentile(&self, metric: &BatchMetric, p: f64) -> Option<f64> {
        let mut values = self.values(metric);
        values.sort_by(f64::total_cmp);
        percentile_sorted(&values, p)
    }

    #[must_use]
    pub fn histogram(&self, metric: &BatchMetric, bins: usize) -> Vec<HistogramBin> {
        histogram(&self.values(metric), bins)
    }

    /// Standard deviation of a sampled input as it actually came out of the draws
    #[must_use]
    pub fn empirical_std_dev(&self, parameter: &str) -> Option<f64> {
        self.summary(&BatchMetric::Parameter(parameter.to_string()))
            .map(|s| s.std_dev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile_sorted(&sorted, 0.0), Some(1.0));
        assert_eq!(percentile_sorted(&sorted, 1.0), Some(4.0));
        assert_eq!(percentile_sorted(&sorted, 0.5), Some(2.5));
        assert_eq!(percentile_sorted(&sorted, 1.5), None);
        assert_eq!(percentile_sorted(&[], 0.5), None);
    }

    #[test]
    fn test_summary_stats() {
        let stats = SummaryStats::from_values(&[4.0, 2.0, 6.0, 8.0]).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.std_dev, 5.0f64.sqrt());
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 8.0);
        assert_eq!(stats.median, 5.0);
        assert!(SummaryStats::from_values(&[]).is_none());
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let bins = histogram(&values, 10);
        assert_eq!(bins.len(), 10);
        assert!(bins.iter().all(|b| b.count == 10));
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[9].upper, 99.0);
    }

    #[test]
    fn test_histogram_constant_values() {
        let bins = histogram(&[3.0, 3.0, 3.0], 5);
        assert_eq!(
            bins,
            vec![HistogramBin {
                lower: 3.0,
                upper: 3.0,
                count: 3
            }]
        );
        assert!(histogram(&[], 5).is_empty());
    }
}
