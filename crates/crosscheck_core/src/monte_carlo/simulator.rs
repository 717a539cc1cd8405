//! Seeded Monte Carlo propagation of input uncertainty through a model.
//!
//! Draws are produced in fixed-size chunks. Each chunk gets its own
//! `SmallRng` seeded from a master stream, so the batch depends only on the
//! seed and sample count whether chunks run sequentially or on the rayon
//! pool.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::{ConfigError, DomainError, ModelError, SimulationError};
use crate::model::EfficiencyModel;
use crate::params::ParameterVector;

use super::distribution::ClippedSampler;
use super::{DistributionSpecs, MonteCarloBatch, MonteCarloSample};

/// Draws per independently seeded chunk
pub const CHUNK_SIZE: usize = 1024;

struct ChunkOutcome {
    samples: Vec<MonteCarloSample>,
    excluded: usize,
    last_error: Option<DomainError>,
}

/// Run `n_samples` randomized evaluations of `model` around `base`.
///
/// Parameters with a spec in `specs` are re-drawn for every sample; all
/// others stay at their base value. Draws the model rejects with a domain
/// error are dropped and counted. The run only fails if the configuration
/// is unusable or every draw is rejected.
pub fn simulate<M: EfficiencyModel + ?Sized>(
    model: &M,
    base: &ParameterVector,
    specs: &DistributionSpecs,
    n_samples: usize,
    seed: u64,
) -> Result<MonteCarloBatch, SimulationError> {
    if n_samples == 0 {
        return Err(ConfigError::InvalidSampleCount.into());
    }

    let mut samplers = Vec::with_capacity(specs.len());
    for (name, spec) in specs {
        if model.parameter(name).is_none() {
            return Err(ConfigError::UnknownParameter(name.clone()).into());
        }
        samplers.push((name.as_str(), spec.sampler(name)?));
    }
    for def in model.parameters() {
        if !specs.contains_key(&*def.name) {
            base.require(&def.name)?;
        }
    }

    let num_chunks = n_samples.div_ceil(CHUNK_SIZE);
    let mut master = SmallRng::seed_from_u64(seed);
    let chunk_seeds: Vec<u64> = (0..num_chunks).map(|_| master.next_u64()).collect();

    let chunk_len = |i: usize| {
        if i == num_chunks - 1 {
            n_samples - i * CHUNK_SIZE
        } else {
            CHUNK_SIZE
        }
    };

    #[cfg(feature = "parallel")]
    let outcomes: Vec<Result<ChunkOutcome, ConfigError>> = (0..num_chunks)
        .into_par_iter()
        .map(|i| run_chunk(model, base, &samplers, chunk_len(i), chunk_seeds[i]))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<Result<ChunkOutcome, ConfigError>> = (0..num_chunks)
        .map(|i| run_chunk(model, base, &samplers, chunk_len(i), chunk_seeds[i]))
        .collect();

    let mut samples = Vec::with_capacity(n_samples);
    let mut excluded = 0;
    let mut last_error = None;
    for outcome in outcomes {
        let outcome = outcome?;
        samples.extend(outcome.samples);
        excluded += outcome.excluded;
        if outcome.last_error.is_some() {
            last_error = outcome.last_error;
        }
    }

    if samples.is_empty() {
        return Err(SimulationError::AllSamplesFailed {
            attempted: n_samples,
            last_error: last_error.unwrap_or(DomainError::NonFinite {
                term: "efficiency",
            }),
        });
    }

    if excluded > 0 {
        tracing::warn!(
            excluded,
            attempted = n_samples,
            "Monte Carlo draws excluded by domain errors"
        );
    }
    tracing::debug!(seed, kept = samples.len(), "Monte Carlo run finished");

    Ok(MonteCarloBatch {
        seed,
        requested: n_samples,
        specs: specs.clone(),
        samples,
        excluded,
    })
}

fn run_chunk<M: EfficiencyModel + ?Sized>(
    model: &M,
    base: &ParameterVector,
    samplers: &[(&str, ClippedSampler)],
    len: usize,
    seed: u64,
) -> Result<ChunkOutcome, ConfigError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut outcome = ChunkOutcome {
        samples: Vec::with_capacity(len),
        excluded: 0,
        last_error: None,
    };

    for _ in 0..len {
        let mut parameters = base.clone();
        for (name, sampler) in samplers {
            parameters.insert(*name, sampler.sample(&mut rng));
        }

        match model.evaluate(&parameters) {
            Ok(result) => outcome.samples.push(MonteCarloSample { parameters, result }),
            Err(ModelError::Domain(err)) => {
                tracing::trace!(%err, "excluding draw");
                outcome.excluded += 1;
                outcome.last_error = Some(err);
            }
            Err(ModelError::Config(err)) => return Err(err),
        }
    }

    Ok(outcome)
}
