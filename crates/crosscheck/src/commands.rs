//! One function per subcommand, each returning the text to print

use color_eyre::eyre::Result;
use crosscheck_core::model::{CrossCheckBreakdown, EfficiencyModel, EfficiencyResult};
use crosscheck_core::monte_carlo::{
    BatchMetric, HistogramBin, MonteCarloBatch, SummaryStats, simulate,
};
use crosscheck_core::params::ParameterVector;
use crosscheck_core::records::{PooledRatios, ProjectRecord, RecordExtractor};
use crosscheck_core::sensitivity::{SensitivityAnalyzer, SlopeSensitivity};
use serde::Serialize;

use crate::config::{RecordEntry, ScenarioConfig};
use crate::render::{self, Labels};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[derive(Debug, Serialize)]
struct ExtractOutput<'a> {
    projects: &'a [ProjectRecord],
    pooled: Option<PooledRatios>,
    pooled_subset: Option<PooledRatios>,
    skipped: Vec<String>,
    excluded_projects: &'a [String],
}

/// Per-project `a_hat`/`b_dir` table from exported review records
pub fn extract(
    records: Vec<RecordEntry>,
    config: &ScenarioConfig,
    format: OutputFormat,
) -> Result<String> {
    let report = RecordExtractor::new(config.ratio_formula).extract_entries(records);
    let subset: Vec<&str> = config.pooled_exclude.iter().map(String::as_str).collect();

    tracing::info!(
        projects = report.projects.len(),
        skipped = report.parse_errors.len(),
        "extracted project ratios"
    );

    match format {
        OutputFormat::Table => Ok(render::extraction_table(
            &report,
            &subset,
            &Labels::default(),
        )),
        OutputFormat::Json => to_json(&ExtractOutput {
            projects: &report.projects,
            pooled: report.pooled(),
            pooled_subset: (!subset.is_empty())
                .then(|| report.pooled_excluding(&subset))
                .flatten(),
            skipped: report.parse_errors.iter().map(ToString::to_string).collect(),
            excluded_projects: &report.excluded_projects,
        }),
    }
}

#[derive(Debug, Serialize)]
struct EvaluateOutput {
    parameters: ParameterVector,
    breakdown: CrossCheckBreakdown,
    result: EfficiencyResult,
    slopes: SlopeSensitivity,
}

/// Headline figures for the scenario's base point
pub fn evaluate(config: &ScenarioConfig, format: OutputFormat) -> Result<String> {
    let model = config.model();
    let parameters = config.base_parameters();
    let breakdown = model.breakdown(&parameters)?;
    let result = model.evaluate(&parameters)?;
    let slopes = SlopeSensitivity::from_breakdown(&breakdown);

    match format {
        OutputFormat::Table => Ok(render::breakdown_table(&breakdown, &result, &slopes)),
        OutputFormat::Json => to_json(&EvaluateOutput {
            parameters,
            breakdown,
            result,
            slopes,
        }),
    }
}

/// ±20% tornado sweep and elasticities, no Monte Carlo reference
pub fn tornado(config: &ScenarioConfig, format: OutputFormat) -> Result<String> {
    let model = config.model();
    let base = config.base_parameters();
    let report = SensitivityAnalyzer::default().analyze(&model, &base, None)?;

    match format {
        OutputFormat::Table => Ok(render::sensitivity_table(&report, &Labels::default())),
        OutputFormat::Json => to_json(&report),
    }
}

fn run_batch(config: &ScenarioConfig) -> Result<MonteCarloBatch> {
    let model = config.model();
    let base = config.base_parameters();
    let specs = config.distribution_specs(&base)?;

    tracing::info!(
        samples = config.samples,
        seed = config.seed,
        "running Monte Carlo"
    );
    Ok(simulate(&model, &base, &specs, config.samples, config.seed)?)
}

/// Tornado plus standardized sensitivities against a Monte Carlo reference
pub fn sensitivity(config: &ScenarioConfig, format: OutputFormat) -> Result<String> {
    let batch = run_batch(config)?;
    let model = config.model();
    let base = config.base_parameters();
    let report = SensitivityAnalyzer::default().analyze(&model, &base, Some(&batch))?;

    match format {
        OutputFormat::Table => Ok(render::sensitivity_table(&report, &Labels::default())),
        OutputFormat::Json => to_json(&report),
    }
}

#[derive(Debug, Serialize)]
struct MonteCarloOutput {
    seed: u64,
    requested: usize,
    kept: usize,
    excluded: usize,
    summaries: Vec<(String, SummaryStats)>,
    histogram: Vec<HistogramBin>,
}

/// Distribution of cost per success, success rate and efficiency
pub fn monte_carlo(config: &ScenarioConfig, format: OutputFormat) -> Result<String> {
    let batch = run_batch(config)?;

    let metrics = [
        BatchMetric::CostPerQuality,
        BatchMetric::QualityScore,
        BatchMetric::Efficiency,
    ];
    let summaries: Vec<(String, SummaryStats)> = metrics
        .iter()
        .filter_map(|metric| Some((metric.label(), batch.summary(metric)?)))
        .collect();
    let histogram = batch.histogram(&BatchMetric::CostPerQuality, config.histogram_bins);

    match format {
        OutputFormat::Table => Ok(render::monte_carlo_table(
            &summaries,
            &histogram,
            batch.excluded(),
        )),
        OutputFormat::Json => to_json(&MonteCarloOutput {
            seed: batch.seed(),
            requested: batch.requested(),
            kept: batch.len(),
            excluded: batch.excluded(),
            summaries,
            histogram,
        }),
    }
}

/// The scenario's inputs under all four grade × schedule combinations
pub fn scenarios(config: &ScenarioConfig, format: OutputFormat) -> Result<String> {
    let outcomes = config.model().scenario_matrix(&config.base_parameters())?;

    match format {
        OutputFormat::Table => Ok(render::scenario_table(&outcomes)),
        OutputFormat::Json => to_json(&outcomes),
    }
}
