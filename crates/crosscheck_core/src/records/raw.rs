//! Exported review-system records as they arrive, before validation.

use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};

/// One change as exported from the review system.
///
/// Every field is optional so a single malformed record can be reported and
/// skipped instead of failing the whole export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawChangeRecord {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub review_events: Vec<RawReviewEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReviewEvent {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub action: String,
    /// Free-text review message, used by defect-signal ratios
    #[serde(default)]
    pub message: Option<String>,
}

/// What a review event means for the change's timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    /// Any reviewer activity short of approval
    Review,
    Approval,
    Merge,
    Other,
}

impl ReviewAction {
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "first-review" | "first_review" | "review" | "comment" | "vote" => Self::Review,
            "approval" | "approve" | "approved" => Self::Approval,
            "merge" | "merged" | "submit" | "submitted" => Self::Merge,
            _ => Self::Other,
        }
    }

    /// Counts as the reviewer's first touch on the change
    #[must_use]
    pub fn starts_review(self) -> bool {
        matches!(self, Self::Review | Self::Approval)
    }

    /// Counts as the change being done
    #[must_use]
    pub fn completes(self) -> bool {
        matches!(self, Self::Approval | Self::Merge)
    }
}

/// Parse an RFC 3339 instant or a Gerrit-style civil time in UTC
/// (`2023-01-05 10:11:12.000000000`).
pub fn parse_timestamp(raw: &str) -> Result<Timestamp, jiff::Error> {
    let raw = raw.trim();
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Ok(ts);
    }
    let civil: DateTime = raw.parse()?;
    Ok(civil.to_zoned(TimeZone::UTC)?.timestamp())
}
