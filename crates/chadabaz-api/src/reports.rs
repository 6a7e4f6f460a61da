//! Handler for `POST /reports` — public, anonymous report intake.
//!
//! The body is `multipart/form-data`:
//!
//! | Field | Kind | Notes |
//! |-------|------|-------|
//! | `name`, `area`, `party`, `body` | text | required; `location` is accepted for `area` |
//! | `subject_description`, `submitter` | text | optional |
//! | `facebook_url` … `tiktok_url` | text | optional social links |
//! | `profile_image` | file | used only when the subject is new |
//! | `media`, `media_<n>` | file | evidence, kept in form order |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Multipart, State,
    multipart::{Field, MultipartError},
  },
  http::StatusCode,
};
use chadabaz_core::{
  Error, Platform,
  media::{MediaStore, MediaUpload},
  moderation::Submission,
  outcome::{Operation, Outcome},
  store::ReportStore,
};

use crate::error::ApiError;

/// `POST /reports` — returns 201 + `{ success, message }`.
pub async fn submit<S, M>(
  State(platform): State<Arc<Platform<S, M>>>,
  multipart: Multipart,
) -> Result<(StatusCode, Json<Outcome>), ApiError>
where
  S: ReportStore,
  M: MediaStore,
{
  let submission = read_submission(multipart)
    .await
    .map_err(ApiError::during(Operation::SubmitReport))?;

  let recorded = platform
    .submit_report(submission)
    .await
    .map_err(ApiError::during(Operation::SubmitReport))?;
  tracing::debug!(report_id = %recorded.report.report_id, "intake accepted");

  Ok((StatusCode::CREATED, Json(Outcome::succeeded(Operation::SubmitReport))))
}

// ─── Form parsing ────────────────────────────────────────────────────────────

async fn read_submission(mut multipart: Multipart) -> Result<Submission, Error> {
  let mut submission = Submission::default();

  while let Some(field) = multipart.next_field().await.map_err(malformed)? {
    let Some(name) = field.name().map(str::to_owned) else {
      continue;
    };

    if name == "profile_image" {
      submission.profile_image = Some(read_file(field).await?);
    } else if is_media_field(&name) {
      submission.media.push(read_file(field).await?);
    } else {
      let value = field.text().await.map_err(malformed)?;
      apply_text(&mut submission, &name, value);
    }
  }

  Ok(submission)
}

fn is_media_field(name: &str) -> bool {
  name == "media" || name.strip_prefix("media_").is_some_and(|n| !n.is_empty())
}

fn apply_text(submission: &mut Submission, name: &str, value: String) {
  match name {
    "name" => submission.name = value,
    "area" | "location" => submission.area = value,
    "party" => submission.party = value,
    "body" => submission.body = value,
    "subject_description" => submission.description = Some(value),
    "submitter" => submission.submitter = Some(value),
    other => {
      let known = other
        .strip_suffix("_url")
        .is_some_and(|platform| submission.social.set(platform, &value));
      if !known {
        tracing::debug!(field = other, "ignoring unknown form field");
      }
    }
  }
}

async fn read_file(field: Field<'_>) -> Result<MediaUpload, Error> {
  let file_name = field.file_name().unwrap_or_default().to_owned();
  let content_type = field.content_type().map(str::to_owned);
  let bytes = field.bytes().await.map_err(malformed)?;
  Ok(MediaUpload { file_name, content_type, bytes })
}

fn malformed(e: MultipartError) -> Error {
  tracing::debug!(error = %e, status = %e.status(), "unreadable multipart body");
  Error::Validation("The submitted form could not be read.".into())
}
