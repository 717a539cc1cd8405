//! Input distributions for Monte Carlo propagation.

use std::collections::BTreeMap;

use rand::Rng;
use rand::distr::Uniform;
use rand_distr::{Distribution as _, LogNormal, Normal, Triangular};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::params::Domain;

/// Per-parameter distribution specs, keyed by parameter name
pub type DistributionSpecs = BTreeMap<String, DistributionSpec>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Distribution {
    Fixed {
        value: f64,
    },
    Normal {
        mean: f64,
        std_dev: f64,
    },
    Uniform {
        low: f64,
        high: f64,
    },
    Triangular {
        low: f64,
        mode: f64,
        high: f64,
    },
    /// `mu` and `sigma` describe the underlying normal of `ln(x)`
    LogNormal {
        mu: f64,
        sigma: f64,
    },
}

impl Distribution {
    #[must_use]
    pub fn family(&self) -> &'static str {
        match self {
            Distribution::Fixed { .. } => "fixed",
            Distribution::Normal { .. } => "normal",
            Distribution::Uniform { .. } => "uniform",
            Distribution::Triangular { .. } => "triangular",
            Distribution::LogNormal { .. } => "log-normal",
        }
    }

    /// Analytic standard deviation of the (unclipped) distribution
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        match *self {
            Distribution::Fixed { .. } => 0.0,
            Distribution::Normal { std_dev, .. } => std_dev,
            Distribution::Uniform { low, high } => (high - low) / 12f64.sqrt(),
            Distribution::Triangular { low, mode, high } => {
                let variance = (low * low + mode * mode + high * high
                    - low * mode
                    - low * high
                    - mode * high)
                    / 18.0;
                variance.sqrt()
            }
            Distribution::LogNormal { mu, sigma } => {
                let s2 = sigma * sigma;
                ((s2.exp() - 1.0) * (2.0 * mu + s2).exp()).sqrt()
            }
        }
    }

    fn sampler(&self, parameter: &str) -> Result<Sampler, ConfigError> {
        let invalid = |reason: &'static str| ConfigError::InvalidDistribution {
            parameter: parameter.to_string(),
            family: self.family(),
            reason,
        };

        match *self {
            Distribution::Fixed { value } => {
                if !value.is_finite() {
                    return Err(invalid("value must be finite"));
                }
                Ok(Sampler::Fixed(value))
            }
            Distribution::Normal { mean, std_dev } => {
                if !mean.is_finite() {
                    return Err(invalid("mean must be finite"));
                }
                if !(std_dev >= 0.0) {
                    return Err(invalid("std_dev must be finite and non-negative"));
                }
                Normal::new(mean, std_dev)
                    .map(Sampler::Normal)
                    .map_err(|_| invalid("std_dev must be finite and non-negative"))
            }
            Distribution::Uniform { low, high } => {
                if !(low < high) {
                    return Err(invalid("low must be below high"));
                }
                Uniform::new(low, high)
                    .map(Sampler::Uniform)
                    .map_err(|_| invalid("bounds must be finite"))
            }
            Distribution::Triangular { low, mode, high } => {
                if !(low < high) || !(low..=high).contains(&mode) {
                    return Err(invalid("requires low <= mode <= high and low < high"));
                }
                Triangular::new(low, high, mode)
                    .map(Sampler::Triangular)
                    .map_err(|_| invalid("bounds must be finite"))
            }
            Distribution::LogNormal { mu, sigma } => {
                if !mu.is_finite() {
                    return Err(invalid("mu must be finite"));
                }
                if !(sigma >= 0.0) {
                    return Err(invalid("sigma must be finite and non-negative"));
                }
                LogNormal::new(mu, sigma)
                    .map(Sampler::LogNormal)
                    .map_err(|_| invalid("sigma must be finite and non-negative"))
            }
        }
    }
}

/// A distribution with an optional range the draws are clipped into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSpec {
    pub distribution: Distribution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<Domain>,
}

impl DistributionSpec {
    #[must_use]
    pub fn new(distribution: Distribution) -> Self {
        Self {
            distribution,
            clip: None,
        }
    }

    #[must_use]
    pub fn clipped(distribution: Distribution, clip: Domain) -> Self {
        Self {
            distribution,
            clip: Some(clip),
        }
    }

    /// Validate the spec and build a reusable sampler for `parameter`.
    pub(crate) fn sampler(&self, parameter: &str) -> Result<ClippedSampler, ConfigError> {
        if self.clip.is_some_and(|clip| !(clip.min <= clip.max)) {
            return Err(ConfigError::InvalidDistribution {
                parameter: parameter.to_string(),
                family: self.distribution.family(),
                reason: "clip range is empty",
            });
        }
        Ok(ClippedSampler {
            inner: self.distribution.sampler(parameter)?,
            clip: self.clip,
        })
    }
}

impl From<Distribution> for DistributionSpec {
    fn from(distribution: Distribution) -> Self {
        Self::new(distribution)
    }
}

#[derive(Debug, Clone)]
enum Sampler {
    Fixed(f64),
    Normal(Normal<f64>),
    Uniform(Uniform<f64>),
    Triangular(Triangular<f64>),
    LogNormal(LogNormal<f64>),
}

impl Sampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Fixed(value) => *value,
            Sampler::Normal(d) => d.sample(rng),
            Sampler::Uniform(d) => d.sample(rng),
            Sampler::Triangular(d) => d.sample(rng),
            Sampler::LogNormal(d) => d.sample(rng),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ClippedSampler {
    inner: Sampler,
    clip: Option<Domain>,
}

impl ClippedSampler {
    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let value = self.inner.sample(rng);
        match self.clip {
            Some(clip) => clip.clamp(value),
            None => value,
        }
    }
}
