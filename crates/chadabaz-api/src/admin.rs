//! Handlers for `/admin` endpoints. Authentication is applied by the caller
//! as a route layer; nothing here checks credentials.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/admin/reports` | `?status=pending\|approved\|rejected`; newest first |
//! | `GET`    | `/admin/summary` | Counts per status |
//! | `POST`   | `/admin/reports/{id}/approve` | Also marks the subject visible |
//! | `POST`   | `/admin/reports/{id}/reject` | |
//! | `DELETE` | `/admin/reports/{id}` | Hard delete |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::PathRejection},
};
use chadabaz_core::{
  Platform,
  media::MediaStore,
  outcome::{Envelope, Operation, Outcome},
  report::{AdminReport, ModerationCounts, ReportStatus, Verdict},
  store::ReportStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, path_id};

// ─── Reads ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub status: Option<ReportStatus>,
}

/// `GET /admin/reports[?status=...]`
pub async fn list_reports<S, M>(
  State(platform): State<Arc<Platform<S, M>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Envelope<Vec<AdminReport>>>, ApiError>
where
  S: ReportStore,
  M: MediaStore,
{
  let reports = platform
    .list_reports(params.status)
    .await
    .map_err(ApiError::during(Operation::ListReports))?;
  Ok(Json(Envelope::data(reports)))
}

/// `GET /admin/summary`
pub async fn summary<S, M>(
  State(platform): State<Arc<Platform<S, M>>>,
) -> Result<Json<Envelope<ModerationCounts>>, ApiError>
where
  S: ReportStore,
  M: MediaStore,
{
  let counts = platform
    .moderation_summary()
    .await
    .map_err(ApiError::during(Operation::ModerationSummary))?;
  Ok(Json(Envelope::data(counts)))
}

// ─── Moderation ──────────────────────────────────────────────────────────────

async fn transition<S, M>(
  platform: &Platform<S, M>,
  id: Result<Path<Uuid>, PathRejection>,
  verdict: Verdict,
) -> Result<Json<Outcome>, ApiError>
where
  S: ReportStore,
  M: MediaStore,
{
  let op = match verdict {
    Verdict::Approved => Operation::ApproveReport,
    Verdict::Rejected => Operation::RejectReport,
  };
  let id = path_id(op, id)?;
  platform
    .transition_report_status(id, verdict)
    .await
    .map_err(ApiError::during(op))?;
  Ok(Json(Outcome::succeeded(op)))
}

/// `POST /admin/reports/{id}/approve`
pub async fn approve<S, M>(
  State(platform): State<Arc<Platform<S, M>>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Outcome>, ApiError>
where
  S: ReportStore,
  M: MediaStore,
{
  transition(&platform, id, Verdict::Approved).await
}

/// `POST /admin/reports/{id}/reject`
pub async fn reject<S, M>(
  State(platform): State<Arc<Platform<S, M>>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Outcome>, ApiError>
where
  S: ReportStore,
  M: MediaStore,
{
  transition(&platform, id, Verdict::Rejected).await
}

/// `DELETE /admin/reports/{id}`
pub async fn delete<S, M>(
  State(platform): State<Arc<Platform<S, M>>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Outcome>, ApiError>
where
  S: ReportStore,
  M: MediaStore,
{
  let id = path_id(Operation::DeleteReport, id)?;
  platform
    .delete_report(id)
    .await
    .map_err(ApiError::during(Operation::DeleteReport))?;
  Ok(Json(Outcome::succeeded(Operation::DeleteReport)))
}
