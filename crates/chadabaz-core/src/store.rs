//! The `ReportStore` trait and the row shape it feeds the aggregation engine.
//!
//! The trait is implemented by storage backends (e.g.
//! `chadabaz-store-sqlite`). The service layer depends on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  party::Party,
  report::{AdminReport, NewSubmission, RecordedSubmission, Report, ReportStatus},
  subject::Subject,
};

/// One row of the subject ⋈ approved-report join: the subject repeated once per
/// approved report.
#[derive(Debug, Clone)]
pub struct ApprovedRow {
  pub report_id: Uuid,
  pub subject:   Subject,
}

/// Abstraction over the relational store.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ReportStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Intake ────────────────────────────────────────────────────────────

  /// Look up a subject by its intake identity.
  fn find_subject<'a>(
    &'a self,
    name: &'a str,
    area: &'a str,
  ) -> impl Future<Output = Result<Option<Subject>, Self::Error>> + Send + 'a;

  /// Resolve the party by name and the subject by `(name, area)` with
  /// insert-or-get semantics, then insert a pending report — all in one
  /// transaction. An existing subject's attributes are left untouched.
  fn record_submission(
    &self,
    input: NewSubmission,
  ) -> impl Future<Output = Result<RecordedSubmission, Self::Error>> + Send + '_;

  // ── Subjects and parties ──────────────────────────────────────────────

  /// Retrieve a subject by id regardless of its `visible` flag.
  fn get_subject(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Subject>, Self::Error>> + Send + '_;

  /// All parties, ordered by name.
  fn list_parties(
    &self,
  ) -> impl Future<Output = Result<Vec<Party>, Self::Error>> + Send + '_;

  // ── Reports ───────────────────────────────────────────────────────────

  /// Every (subject, approved report) pair.
  fn approved_rows(
    &self,
  ) -> impl Future<Output = Result<Vec<ApprovedRow>, Self::Error>> + Send + '_;

  /// A subject's approved reports, newest first.
  fn approved_reports(
    &self,
    subject_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Report>, Self::Error>> + Send + '_;

  /// Overwrite a report's status. Returns `None` if the report does not exist.
  ///
  /// Setting [`ReportStatus::Approved`] also sets the subject's `visible` flag
  /// in the same transaction. Nothing clears the flag.
  fn set_report_status(
    &self,
    id: Uuid,
    status: ReportStatus,
  ) -> impl Future<Output = Result<Option<Report>, Self::Error>> + Send + '_;

  /// Hard-delete a report and return it. Returns `None` if it did not exist.
  fn delete_report(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Report>, Self::Error>> + Send + '_;

  /// Reports joined with their subjects, newest first, optionally restricted to
  /// one status.
  fn list_reports(
    &self,
    status: Option<ReportStatus>,
  ) -> impl Future<Output = Result<Vec<AdminReport>, Self::Error>> + Send + '_;
}
