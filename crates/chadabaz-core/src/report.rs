//! Reports and their moderation status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::subject::{NewSubject, Subject};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Moderation status of a report.
///
/// Reports start as `Pending`. Admins may move a report to `Approved` or
/// `Rejected` and may re-apply or reverse that decision at any time; the last
/// write wins and no history is kept.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
}

/// A moderation decision: the statuses an admin can move a report into.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Verdict {
  Approved,
  Rejected,
}

impl From<Verdict> for ReportStatus {
  fn from(v: Verdict) -> Self {
    match v {
      Verdict::Approved => Self::Approved,
      Verdict::Rejected => Self::Rejected,
    }
  }
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// One incident submitted against a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
  pub report_id:  Uuid,
  pub subject_id: Uuid,
  pub body:       String,
  /// Public media references, in submission order.
  pub media:      Vec<String>,
  pub status:     ReportStatus,
  /// Absent for anonymous submissions.
  pub submitter:  Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A report joined with the subject it is filed against, for moderation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminReport {
  #[serde(flatten)]
  pub report:  Report,
  pub subject: Subject,
}

// ─── Intake ──────────────────────────────────────────────────────────────────

/// Everything the store needs to record one submission atomically.
///
/// Party and subject are resolved with insert-or-get semantics; the report is
/// always inserted as [`ReportStatus::Pending`].
#[derive(Debug, Clone)]
pub struct NewSubmission {
  pub party:     String,
  pub subject:   NewSubject,
  pub body:      String,
  pub media:     Vec<String>,
  pub submitter: Option<String>,
}

/// What [`crate::store::ReportStore::record_submission`] produced.
#[derive(Debug, Clone)]
pub struct RecordedSubmission {
  pub subject:         Subject,
  pub report:          Report,
  pub subject_created: bool,
  pub party_created:   bool,
}

// ─── Moderation summary ──────────────────────────────────────────────────────

/// Report counts per status, as shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationCounts {
  pub total:    usize,
  pub pending:  usize,
  pub approved: usize,
  pub rejected: usize,
}

impl ModerationCounts {
  pub fn tally<'a>(statuses: impl IntoIterator<Item = &'a ReportStatus>) -> Self {
    statuses.into_iter().fold(Self::default(), |mut acc, status| {
      acc.total += 1;
      match status {
        ReportStatus::Pending => acc.pending += 1,
        ReportStatus::Approved => acc.approved += 1,
        ReportStatus::Rejected => acc.rejected += 1,
      }
      acc
    })
  }
}
