//! Write-side operations: intake and the report moderation state machine.
//!
//! ```text
//! pending ──approve──▶ approved
//!    │                  ▲    │
//!    │ reject    approve│    │ reject
//!    ▼                  │    ▼
//! rejected ─────────────┘  rejected
//! ```
//!
//! Approving a report sets its subject's `visible` flag. Nothing clears it:
//! rejecting or deleting the subject's last approved report leaves the subject
//! flagged.

use futures::future::join_all;
use uuid::Uuid;

use crate::{
  Error, Result,
  invalidate::Invalidation,
  media::{MediaNamespace, MediaStore, MediaUpload},
  platform::Platform,
  report::{
    AdminReport, ModerationCounts, NewSubmission, RecordedSubmission, Report,
    ReportStatus, Verdict,
  },
  store::ReportStore,
  subject::{NewSubject, SocialLinks},
};

// ─── Submission ──────────────────────────────────────────────────────────────

/// A report as submitted by a user, before validation.
#[derive(Debug, Clone, Default)]
pub struct Submission {
  pub name:          String,
  pub area:          String,
  /// Party name, free text.
  pub party:         String,
  pub body:          String,
  pub description:   Option<String>,
  pub social:        SocialLinks,
  pub submitter:     Option<String>,
  pub profile_image: Option<MediaUpload>,
  /// Evidence, in the order it should be displayed.
  pub media:         Vec<MediaUpload>,
}

impl Submission {
  /// Trim every text field and reject blank required ones.
  pub fn validated(self) -> Result<Self> {
    fn trimmed(s: String) -> String { s.trim().to_owned() }
    fn optional(s: Option<String>) -> Option<String> {
      s.map(trimmed).filter(|s| !s.is_empty())
    }

    let out = Self {
      name:          trimmed(self.name),
      area:          trimmed(self.area),
      party:         trimmed(self.party),
      body:          trimmed(self.body),
      description:   optional(self.description),
      social:        self.social.normalized(),
      submitter:     optional(self.submitter),
      profile_image: self.profile_image.filter(|m| !m.is_empty()),
      media:         self.media.into_iter().filter(|m| !m.is_empty()).collect(),
    };

    if out.body.is_empty() {
      return Err(Error::Validation("Report description is required.".into()));
    }
    if out.name.is_empty() || out.area.is_empty() || out.party.is_empty() {
      return Err(Error::Validation("Name, area and party are required.".into()));
    }
    Ok(out)
  }
}

// ─── Operations ──────────────────────────────────────────────────────────────

impl<S, M> Platform<S, M>
where
  S: ReportStore,
  M: MediaStore,
{
  /// Validate, upload media, then record party, subject and pending report.
  ///
  /// Validation happens before anything is resolved or uploaded, so a rejected
  /// submission leaves no rows behind. Individual upload failures are logged
  /// and skipped.
  pub async fn submit_report(&self, submission: Submission) -> Result<RecordedSubmission> {
    let store = self.store()?;
    let submission = submission.validated()?;

    let existing = store
      .find_subject(&submission.name, &submission.area)
      .await
      .map_err(Error::store)?;

    // The profile image only matters when this submission creates the subject.
    let image_url = match (&existing, &submission.profile_image) {
      (None, Some(image)) => self.upload_one(MediaNamespace::Profiles, image).await,
      _ => None,
    };
    let media = self.upload_all(MediaNamespace::Reports, &submission.media).await;

    let recorded = store
      .record_submission(NewSubmission {
        party: submission.party,
        subject: NewSubject {
          name: submission.name,
          area: submission.area,
          image_url,
          description: submission.description,
          social: submission.social,
        },
        body: submission.body,
        media,
        submitter: submission.submitter,
      })
      .await
      .map_err(Error::store)?;

    tracing::info!(
      report_id = %recorded.report.report_id,
      subject_id = %recorded.subject.subject_id,
      subject_created = recorded.subject_created,
      party_created = recorded.party_created,
      media = recorded.report.media.len(),
      "report submitted"
    );
    self.invalidate(Invalidation::submission(recorded.subject.subject_id));
    Ok(recorded)
  }

  /// Move a report to `verdict`. Approving also marks its subject visible.
  ///
  /// Re-applying the current status, or flipping between approved and
  /// rejected, is allowed and succeeds.
  pub async fn transition_report_status(
    &self,
    report_id: Uuid,
    verdict: Verdict,
  ) -> Result<Report> {
    let store = self.store()?;
    let report = store
      .set_report_status(report_id, verdict.into())
      .await
      .map_err(Error::store)?
      .ok_or(Error::ReportNotFound(report_id))?;

    tracing::info!(%report_id, subject_id = %report.subject_id, %verdict, "report moderated");
    self.invalidate(Invalidation::moderation(report.subject_id));
    Ok(report)
  }

  /// Hard-delete a report. The subject, including its `visible` flag, is left
  /// as it is.
  pub async fn delete_report(&self, report_id: Uuid) -> Result<Report> {
    let report = self
      .store()?
      .delete_report(report_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ReportNotFound(report_id))?;

    tracing::info!(%report_id, subject_id = %report.subject_id, "report deleted");
    self.invalidate(Invalidation::moderation(report.subject_id));
    Ok(report)
  }

  /// Every report with its subject, newest first.
  pub async fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<AdminReport>> {
    self.store()?.list_reports(status).await.map_err(Error::store)
  }

  pub async fn moderation_summary(&self) -> Result<ModerationCounts> {
    let reports = self.list_reports(None).await?;
    Ok(ModerationCounts::tally(reports.iter().map(|r| &r.report.status)))
  }

  // ── Media ─────────────────────────────────────────────────────────────

  async fn upload_one(&self, namespace: MediaNamespace, upload: &MediaUpload) -> Option<String> {
    match self.media().upload(namespace, upload).await {
      Ok(url) => Some(url),
      Err(e) => {
        tracing::warn!(
          file_name = %upload.file_name,
          %namespace,
          error = %e,
          "media upload failed; skipping"
        );
        None
      }
    }
  }

  /// Upload concurrently; the result keeps input order and omits failures.
  async fn upload_all(&self, namespace: MediaNamespace, uploads: &[MediaUpload]) -> Vec<String> {
    join_all(uploads.iter().map(|u| self.upload_one(namespace, u)))
      .await
      .into_iter()
      .flatten()
      .collect()
  }
}
