use std::fmt;

/// Why a raw review record could not be turned into durations
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// The record did not have the expected shape at all
    Malformed { detail: String },
    MissingProjectId,
    MissingTimestamp { field: &'static str },
    InvalidTimestamp { field: &'static str, value: String },
    NoReviewAction,
    NoCompletion,
    InvertedTimestamps { detail: &'static str },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::Malformed { detail } => write!(f, "malformed record: {detail}"),
            ParseErrorKind::MissingProjectId => write!(f, "missing project id"),
            ParseErrorKind::MissingTimestamp { field } => write!(f, "missing {field}"),
            ParseErrorKind::InvalidTimestamp { field, value } => {
                write!(f, "invalid {field} timestamp {value:?}")
            }
            ParseErrorKind::NoReviewAction => write!(f, "no review action recorded"),
            ParseErrorKind::NoCompletion => write!(f, "no approval or merge recorded"),
            ParseErrorKind::InvertedTimestamps { detail } => {
                write!(f, "inverted timestamps: {detail}")
            }
        }
    }
}

/// A malformed input record. Recovered locally by skipping the record.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Position of the record in the input sequence
    pub index: usize,
    pub project_id: Option<String>,
    pub kind: ParseErrorKind,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.project_id {
            Some(project) => write!(f, "record {} ({project}): {}", self.index, self.kind),
            None => write!(f, "record {}: {}", self.index, self.kind),
        }
    }
}

impl std::error::Error for ParseError {}

/// An undefined operation hit while evaluating a model
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    OutOfDomain {
        parameter: String,
        value: f64,
        min: f64,
        max: f64,
    },
    ZeroDenominator {
        term: &'static str,
    },
    NonFinite {
        term: &'static str,
    },
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::OutOfDomain {
                parameter,
                value,
                min,
                max,
            } => write!(f, "{parameter}={value} outside [{min}, {max}]"),
            DomainError::ZeroDenominator { term } => {
                write!(f, "{term} is zero or negative and cannot be divided by")
            }
            DomainError::NonFinite { term } => write!(f, "{term} is not finite"),
        }
    }
}

impl std::error::Error for DomainError {}

/// Incomplete or inconsistent configuration supplied by the caller
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    MissingParameter(String),
    UnknownParameter(String),
    InvalidDistribution {
        parameter: String,
        family: &'static str,
        reason: &'static str,
    },
    InvalidSampleCount,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingParameter(name) => write!(f, "parameter {name:?} is required"),
            ConfigError::UnknownParameter(name) => {
                write!(f, "parameter {name:?} is not used by the model")
            }
            ConfigError::InvalidDistribution {
                parameter,
                family,
                reason,
            } => write!(f, "invalid {family} distribution for {parameter:?}: {reason}"),
            ConfigError::InvalidSampleCount => write!(f, "sample count must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors returned by a single model evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    Domain(DomainError),
    Config(ConfigError),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Domain(e) => write!(f, "domain error: {e}"),
            ModelError::Config(e) => write!(f, "configuration error: {e}"),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Domain(e) => Some(e),
            ModelError::Config(e) => Some(e),
        }
    }
}

impl From<DomainError> for ModelError {
    fn from(err: DomainError) -> Self {
        ModelError::Domain(err)
    }
}

impl From<ConfigError> for ModelError {
    fn from(err: ConfigError) -> Self {
        ModelError::Config(err)
    }
}

/// Errors that abort a whole Monte Carlo run
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Config(ConfigError),
    /// Every draw was outside the model's domain
    AllSamplesFailed {
        attempted: usize,
        last_error: DomainError,
    },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "configuration error: {e}"),
            SimulationError::AllSamplesFailed {
                attempted,
                last_error,
            } => write!(
                f,
                "all {attempted} samples failed to evaluate (last: {last_error})"
            ),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
            SimulationError::AllSamplesFailed { last_error, .. } => Some(last_error),
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(err: ConfigError) -> Self {
        SimulationError::Config(err)
    }
}
