//! Per-project ratio extraction from exported review records.

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseErrorKind};
use crate::params::ParameterVector;

use super::raw::{RawChangeRecord, ReviewAction, parse_timestamp};
use super::ratios::{ProjectTotals, RatioFormula, has_defect_signal};

/// Ratio pair derived for one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub project_id: String,
    /// Records that contributed to the ratios
    pub changes: usize,
    pub a_hat: f64,
    pub b_dir: f64,
}

impl ProjectRecord {
    /// The ratio pair as model inputs named `a_hat` and `b_dir`
    #[must_use]
    pub fn to_parameters(&self) -> ParameterVector {
        [("a_hat", self.a_hat), ("b_dir", self.b_dir)]
            .into_iter()
            .collect()
    }
}

/// Change-weighted average over several projects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PooledRatios {
    pub changes: usize,
    pub a_hat: f64,
    pub b_dir: f64,
}

/// Work and review hours of one accepted change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeTiming {
    pub work_hours: f64,
    pub review_hours: f64,
}

/// Everything one extraction run produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionReport {
    /// Sorted by project id
    pub projects: Vec<ProjectRecord>,
    /// Records skipped as malformed
    pub parse_errors: Vec<ParseError>,
    /// Projects dropped because a ratio denominator was not positive
    pub excluded_projects: Vec<String>,
}

impl ExtractionReport {
    #[must_use]
    pub fn project(&self, project_id: &str) -> Option<&ProjectRecord> {
        self.projects.iter().find(|p| p.project_id == project_id)
    }

    /// Weighted average across every emitted project
    #[must_use]
    pub fn pooled(&self) -> Option<PooledRatios> {
        pool(self.projects.iter())
    }

    /// Weighted average leaving out the named projects
    #[must_use]
    pub fn pooled_excluding(&self, excluded: &[&str]) -> Option<PooledRatios> {
        pool(
            self.projects
                .iter()
                .filter(|p| !excluded.contains(&p.project_id.as_str())),
        )
    }
}

fn pool<'a>(projects: impl Iterator<Item = &'a ProjectRecord>) -> Option<PooledRatios> {
    let mut changes = 0;
    let mut a_sum = 0.0;
    let mut b_sum = 0.0;
    for p in projects {
        changes += p.changes;
        a_sum += p.a_hat * p.changes as f64;
        b_sum += p.b_dir * p.changes as f64;
    }
    (changes > 0).then(|| PooledRatios {
        changes,
        a_hat: a_sum / changes as f64,
        b_dir: b_sum / changes as f64,
    })
}

/// Turns raw review records into one [`ProjectRecord`] per project
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordExtractor {
    formula: RatioFormula,
}

impl RecordExtractor {
    #[must_use]
    pub fn new(formula: RatioFormula) -> Self {
        Self { formula }
    }

    #[must_use]
    pub fn formula(&self) -> RatioFormula {
        self.formula
    }

    /// Consume `records` and derive per-project ratios.
    ///
    /// Malformed records are skipped and reported; they never fail the batch.
    pub fn extract(&self, records: impl IntoIterator<Item = RawChangeRecord>) -> ExtractionReport {
        self.extract_entries(records.into_iter().map(Ok))
    }

    /// Like [`extract`](Self::extract), for inputs where some entries could
    /// not even be decoded into a [`RawChangeRecord`].
    ///
    /// An `Err` entry is reported at its position and skipped.
    pub fn extract_entries(
        &self,
        entries: impl IntoIterator<Item = Result<RawChangeRecord, ParseErrorKind>>,
    ) -> ExtractionReport {
        let mut totals: FxHashMap<String, ProjectTotals> = FxHashMap::default();
        let mut parse_errors = Vec::new();

        for (index, entry) in entries.into_iter().enumerate() {
            let record = match entry {
                Ok(record) => record,
                Err(kind) => {
                    tracing::warn!(index, %kind, "skipping record");
                    parse_errors.push(ParseError {
                        index,
                        project_id: None,
                        kind,
                    });
                    continue;
                }
            };
            let Some(project_id) = record.project_id.clone().filter(|id| !id.trim().is_empty())
            else {
                tracing::warn!(index, "skipping record without project id");
                parse_errors.push(ParseError {
                    index,
                    project_id: None,
                    kind: ParseErrorKind::MissingProjectId,
                });
                continue;
            };

            let timing = if self.formula.needs_timing() {
                match change_timing(&record) {
                    Ok(timing) => Some(timing),
                    Err(kind) => {
                        tracing::warn!(index, project = %project_id, %kind, "skipping record");
                        parse_errors.push(ParseError {
                            index,
                            project_id: Some(project_id),
                            kind,
                        });
                        continue;
                    }
                }
            } else {
                None
            };

            let entry = totals.entry(project_id).or_default();
            entry.changes += 1;
            if let Some(timing) = timing {
                entry.work_hours += timing.work_hours;
                entry.review_hours += timing.review_hours;
            }
            if has_defect_signal(&record.review_events) {
                entry.defect_hits += 1;
            }
        }

        let mut sorted: Vec<_> = totals.into_iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        let mut projects = Vec::with_capacity(sorted.len());
        let mut excluded_projects = Vec::new();
        for (project_id, t) in sorted {
            match t.ratios(self.formula) {
                Some((a_hat, b_dir)) => projects.push(ProjectRecord {
                    project_id,
                    changes: t.changes,
                    a_hat,
                    b_dir,
                }),
                None => {
                    tracing::warn!(project = %project_id, "no positive ratio denominator, excluding project");
                    excluded_projects.push(project_id);
                }
            }
        }

        tracing::debug!(
            projects = projects.len(),
            skipped = parse_errors.len(),
            excluded = excluded_projects.len(),
            "extraction finished"
        );

        ExtractionReport {
            projects,
            parse_errors,
            excluded_projects,
        }
    }
}

fn parse_field(raw: Option<&str>, field: &'static str) -> Result<Timestamp, ParseErrorKind> {
    let raw = raw.ok_or(ParseErrorKind::MissingTimestamp { field })?;
    parse_timestamp(raw).map_err(|_| ParseErrorKind::InvalidTimestamp {
        field,
        value: raw.to_string(),
    })
}

fn hours_between(start: Timestamp, end: Timestamp) -> f64 {
    end.duration_since(start).as_secs_f64() / 3600.0
}

/// Work time (creation to first review) and review time (first review to
/// final approval or merge) of a single change.
pub fn change_timing(record: &RawChangeRecord) -> Result<ChangeTiming, ParseErrorKind> {
    let created = parse_field(record.created_at.as_deref(), "created_at")?;

    let mut first_review: Option<Timestamp> = None;
    let mut completed: Option<Timestamp> = None;
    for event in &record.review_events {
        let action = ReviewAction::from_tag(&event.action);
        if action == ReviewAction::Other {
            continue;
        }
        let at = parse_field(event.timestamp.as_deref(), "review event")?;
        if action.starts_review() {
            first_review = Some(first_review.map_or(at, |t| t.min(at)));
        }
        if action.completes() {
            completed = Some(completed.map_or(at, |t| t.max(at)));
        }
    }

    let first_review = first_review.ok_or(ParseErrorKind::NoReviewAction)?;
    let completed = completed.ok_or(ParseErrorKind::NoCompletion)?;

    if first_review < created {
        return Err(ParseErrorKind::InvertedTimestamps {
            detail: "first review precedes creation",
        });
    }
    if completed < first_review {
        return Err(ParseErrorKind::InvertedTimestamps {
            detail: "completion precedes first review",
        });
    }

    Ok(ChangeTiming {
        work_hours: hours_between(created, first_review),
        review_hours: hours_between(first_review, completed),
    })
}
