//! Integration tests for the cross-check analysis engine
//!
//! Tests are organized by topic:
//! - `extraction` - Review records to per-project ratios
//! - `sensitivity` - Elasticities, standardized sensitivity, tornado ordering
//! - `simulation` - Monte Carlo reproducibility and the default profile
//! - `end_to_end` - Records through model, analyzer and simulator together

mod end_to_end;
mod simulation;

use jiff::{SignedDuration, Timestamp};

use crate::records::{RawChangeRecord, RawReviewEvent};

/// A change created at `start` that is first reviewed `work_hours` later and
/// merged `review_hours` after that.
pub(crate) fn timed_change(
    project: &str,
    start: &str,
    work_hours: i64,
    review_hours: i64,
) -> RawChangeRecord {
    let created: Timestamp = start.parse().unwrap();
    let reviewed = created + SignedDuration::from_hours(work_hours);
    let merged = reviewed + SignedDuration::from_hours(review_hours);

    RawChangeRecord {
        project_id: Some(project.to_string()),
        created_at: Some(created.to_string()),
        review_events: vec![
            RawReviewEvent {
                timestamp: Some(reviewed.to_string()),
                action: "first-review".to_string(),
                message: None,
            },
            RawReviewEvent {
                timestamp: Some(merged.to_string()),
                action: "merge".to_string(),
                message: None,
            },
        ],
    }
}
