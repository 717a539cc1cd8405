//! Formulas turning per-project aggregates into the `(a_hat, b_dir)` pair.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::raw::RawReviewEvent;

/// Whole-word reviewer remarks that point at a defect
static DEFECT_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(nit|fix|typo|minor)\b").unwrap());

/// How `a_hat` and `b_dir` are derived for a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatioFormula {
    /// `a_hat = mean(work) / mean(review)`,
    /// `b_dir = mean(review) / mean(work + review)`
    #[default]
    Durations,
    /// `a_hat` = share of changes without a defect signal,
    /// `b_dir` = share with at least one
    DefectSignals,
}

impl RatioFormula {
    /// Whether records need a complete review timeline to count
    #[must_use]
    pub fn needs_timing(self) -> bool {
        matches!(self, RatioFormula::Durations)
    }
}

/// Whether a review message reports a defect: a negative Code-Review or
/// Verified vote, or a nit/fix/typo/minor remark.
#[must_use]
pub fn is_defect_signal(message: &str) -> bool {
    let negative_review =
        message.contains("Code-Review") && (message.contains("-1") || message.contains("-2"));
    let failed_verification = message.contains("Verified") && message.contains("-1");
    negative_review || failed_verification || DEFECT_WORDS.is_match(message)
}

/// Whether any event on a change carries a defect signal
#[must_use]
pub fn has_defect_signal(events: &[RawReviewEvent]) -> bool {
    events
        .iter()
        .filter_map(|e| e.message.as_deref())
        .any(is_defect_signal)
}

/// Running totals for one project
#[derive(Debug, Clone, Default)]
pub(crate) struct ProjectTotals {
    pub changes: usize,
    pub work_hours: f64,
    pub review_hours: f64,
    pub defect_hits: usize,
}

impl ProjectTotals {
    /// `(a_hat, b_dir)`, `None` when a denominator is not strictly positive
    pub(crate) fn ratios(&self, formula: RatioFormula) -> Option<(f64, f64)> {
        if self.changes == 0 {
            return None;
        }
        match formula {
            RatioFormula::Durations => {
                let n = self.changes as f64;
                let mean_work = self.work_hours / n;
                let mean_review = self.review_hours / n;
                let mean_total = mean_work + mean_review;
                if mean_review <= 0.0 || mean_total <= 0.0 {
                    return None;
                }
                Some((mean_work / mean_review, mean_review / mean_total))
            }
            RatioFormula::DefectSignals => {
                let n = self.changes as f64;
                let b_dir = self.defect_hits as f64 / n;
                Some((1.0 - b_dir, b_dir))
            }
        }
    }
}
