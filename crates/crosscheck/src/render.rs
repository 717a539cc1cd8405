//! Fixed-precision text tables for the terminal

use std::fmt::Write;

use crosscheck_core::model::{CrossCheckBreakdown, EfficiencyResult, ScenarioOutcome};
use crosscheck_core::monte_carlo::{HistogramBin, SummaryStats};
use crosscheck_core::records::ExtractionReport;
use crosscheck_core::sensitivity::{SensitivityReport, SlopeSensitivity};

/// Width of the widest histogram bar
const BAR_WIDTH: usize = 40;

/// Headings used by the tables, passed in rather than looked up globally
#[derive(Debug, Clone)]
pub struct Labels {
    pub project: &'static str,
    pub pooled_all: &'static str,
    pub pooled_subset: &'static str,
    pub parameter: &'static str,
    pub undefined: &'static str,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            project: "Project",
            pooled_all: "Weighted avg (all)",
            pooled_subset: "Weighted avg (legacy)",
            parameter: "Parameter",
            undefined: "n/a",
        }
    }
}

fn opt(value: Option<f64>, labels: &Labels) -> String {
    value.map_or_else(|| labels.undefined.to_string(), |v| format!("{v:.3}"))
}

/// Per-project table followed by the pooled rows.
///
/// `subset_excluded` names the projects left out of the second pooled row;
/// the row is omitted when it is empty.
pub fn extraction_table(
    report: &ExtractionReport,
    subset_excluded: &[&str],
    labels: &Labels,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:25} {:>6}   {:>6}   {:>6}",
        labels.project, "N", "a_hat", "b_dir"
    );
    for p in &report.projects {
        let _ = writeln!(
            out,
            "{:25} {:6}   {:6.3}   {:6.3}",
            p.project_id, p.changes, p.a_hat, p.b_dir
        );
    }

    if let Some(all) = report.pooled() {
        let _ = writeln!(
            out,
            "\n{:25} {:6}   {:.3}   {:.3}",
            labels.pooled_all, all.changes, all.a_hat, all.b_dir
        );
    }
    let subset = (!subset_excluded.is_empty())
        .then(|| report.pooled_excluding(subset_excluded))
        .flatten();
    if let Some(subset) = subset {
        let _ = writeln!(
            out,
            "{:25} {:6}   {:.3}   {:.3}",
            labels.pooled_subset, subset.changes, subset.a_hat, subset.b_dir
        );
    }

    if !report.parse_errors.is_empty() {
        let _ = writeln!(out, "\nSkipped {} record(s):", report.parse_errors.len());
        for err in &report.parse_errors {
            let _ = writeln!(out, "  {err}");
        }
    }
    if !report.excluded_projects.is_empty() {
        let _ = writeln!(
            out,
            "\nExcluded (no positive denominator): {}",
            report.excluded_projects.join(", ")
        );
    }
    out
}

pub fn breakdown_table(
    breakdown: &CrossCheckBreakdown,
    result: &EfficiencyResult,
    slopes: &SlopeSensitivity,
) -> String {
    let mut out = String::new();
    let rows = [
        ("Worker success a_total", breakdown.a_total),
        ("Checker detection b_eff", breakdown.b_eff),
        ("Success rate S", breakdown.success),
        ("Labor hours", breakdown.labor_hours),
        ("Labor cost C", breakdown.cost),
        ("Total cost C_total", breakdown.total_cost),
        ("E_base = C/S", breakdown.base_cost_per_success),
        ("E_total = C_total/S", breakdown.cost_per_success),
        ("Efficiency S/C_total", result.efficiency),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "{label:26} {value:12.3}");
    }

    let _ = writeln!(out, "\nSlope of E_total");
    for (label, value) in slopes.bars() {
        let _ = writeln!(out, "  {label:24} {value:12.3}");
    }
    out
}

/// Sensitivity entries in tornado order
pub fn sensitivity_table(report: &SensitivityReport, labels: &Labels) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:12} {:>10} {:>10} {:>12} {:>10} {:>10} {:>10}",
        labels.parameter, "base", "elastic", "standardized", "E(-)", "E(+)", "swing"
    );
    for e in &report.entries {
        let _ = writeln!(
            out,
            "{:12} {:>10.3} {:>10} {:>12} {:>10} {:>10} {:>10}",
            e.name,
            e.base_value,
            opt(e.relative_sensitivity, labels),
            opt(e.standardized_sensitivity, labels),
            opt(e.low_efficiency, labels),
            opt(e.high_efficiency, labels),
            opt(e.swing(), labels),
        );
    }
    let _ = writeln!(
        out,
        "\nBase efficiency {:.6} (σE {})",
        report.base.efficiency,
        opt(report.efficiency_std_dev, labels)
    );
    out
}

/// One summary row per metric, then a text histogram of the first one
pub fn monte_carlo_table(
    summaries: &[(String, SummaryStats)],
    histogram: &[HistogramBin],
    excluded: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:18} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Metric", "N", "mean", "std", "p5", "median", "p95"
    );
    for (label, s) in summaries {
        let _ = writeln!(
            out,
            "{:18} {:>8} {:>12.3} {:>12.3} {:>12.3} {:>12.3} {:>12.3}",
            label, s.count, s.mean, s.std_dev, s.p5, s.median, s.p95
        );
    }
    if excluded > 0 {
        let _ = writeln!(out, "\n{excluded} draw(s) excluded by domain errors");
    }

    let peak = histogram.iter().map(|b| b.count).max().unwrap_or(0);
    if peak > 0 {
        out.push('\n');
        for bin in histogram {
            let bar = "#".repeat(bin.count * BAR_WIDTH / peak);
            let _ = writeln!(
                out,
                "{:>10.3} - {:<10.3} {:>7} {bar}",
                bin.lower, bin.upper, bin.count
            );
        }
    }
    out
}

/// The 2×2 grade × schedule comparison
pub fn scenario_table(outcomes: &[ScenarioOutcome]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:10} {:>10} {:>12}", "Scenario", "S", "E_total");
    for o in outcomes {
        let _ = writeln!(
            out,
            "{:10} {:>10.3} {:>12.3}",
            o.label, o.success, o.cost_per_success
        );
    }
    out
}
