//! Named model inputs and their valid ranges.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, DomainError, ModelError};

/// Closed interval a parameter value must lie in.
///
/// Infinite bounds are left out when serialized and restored when absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "DomainBounds", into = "DomainBounds")]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

/// Wire form of a [`Domain`]; `None` stands for an infinite bound
#[derive(Serialize, Deserialize)]
struct DomainBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
}

impl From<DomainBounds> for Domain {
    fn from(bounds: DomainBounds) -> Self {
        Self {
            min: bounds.min.unwrap_or(f64::NEG_INFINITY),
            max: bounds.max.unwrap_or(f64::INFINITY),
        }
    }
}

impl From<Domain> for DomainBounds {
    fn from(domain: Domain) -> Self {
        Self {
            min: domain.min.is_finite().then_some(domain.min),
            max: domain.max.is_finite().then_some(domain.max),
        }
    }
}

impl Domain {
    pub const UNBOUNDED: Domain = Domain {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };
    pub const UNIT: Domain = Domain { min: 0.0, max: 1.0 };
    pub const NON_NEGATIVE: Domain = Domain {
        min: 0.0,
        max: f64::INFINITY,
    };

    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/// A model's declaration of one input
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDef {
    pub name: Cow<'static, str>,
    pub domain: Domain,
}

impl ParameterDef {
    #[must_use]
    pub const fn fixed(name: &'static str, domain: Domain) -> Self {
        Self {
            name: Cow::Borrowed(name),
            domain,
        }
    }

    pub fn new(name: impl Into<Cow<'static, str>>, domain: Domain) -> Self {
        Self {
            name: name.into(),
            domain,
        }
    }

    /// A parameter accepting any finite value
    pub fn unbounded(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, Domain::UNBOUNDED)
    }
}

/// Mapping from parameter name to value.
///
/// Iteration is in name order so anything derived from a vector is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterVector {
    values: BTreeMap<String, f64>,
}

impl ParameterVector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Look up a parameter the caller cannot proceed without
    pub fn require(&self, name: &str) -> Result<f64, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::MissingParameter(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Copy of this vector with one value replaced
    #[must_use]
    pub fn with(&self, name: &str, value: f64) -> Self {
        let mut next = self.clone();
        next.insert(name, value);
        next
    }

    /// Values of `self` layered on top of `base`
    #[must_use]
    pub fn merged_over(&self, base: &ParameterVector) -> Self {
        let mut merged = base.clone();
        for (name, value) in self.iter() {
            merged.insert(name, value);
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ParameterVector {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Check that every declared parameter is present, finite and in its domain.
pub fn check_parameters(defs: &[ParameterDef], params: &ParameterVector) -> Result<(), ModelError> {
    for def in defs {
        let value = params.require(&def.name)?;
        if !value.is_finite() || !def.domain.contains(value) {
            return Err(DomainError::OutOfDomain {
                parameter: def.name.to_string(),
                value,
                min: def.domain.min,
                max: def.domain.max,
            }
            .into());
        }
    }
    Ok(())
}
