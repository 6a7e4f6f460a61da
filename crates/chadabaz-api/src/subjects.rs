//! Handlers for `/subjects` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/subjects` | Visible subjects ranked by approved-report count |
//! | `GET`  | `/subjects/search` | `?q` free text, `?party` exact name or `all` |
//! | `GET`  | `/subjects/{id}` | Subject plus approved reports, newest first |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::PathRejection},
};
use chadabaz_core::{
  Platform,
  aggregate::SubjectFilter,
  media::MediaStore,
  outcome::{Envelope, Operation},
  store::ReportStore,
  subject::{SubjectProfile, SubjectSummary},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, path_id};

/// `GET /subjects`
pub async fn list<S, M>(
  State(platform): State<Arc<Platform<S, M>>>,
) -> Result<Json<Envelope<Vec<SubjectSummary>>>, ApiError>
where
  S: ReportStore,
  M: MediaStore,
{
  let subjects = platform
    .list_visible_subjects()
    .await
    .map_err(ApiError::during(Operation::ListSubjects))?;
  Ok(Json(Envelope::data(subjects)))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
  /// Case-insensitive substring of name or area.
  #[serde(default)]
  pub q:     String,
  pub party: Option<String>,
}

/// `GET /subjects/search[?q=...][&party=...]`
pub async fn search<S, M>(
  State(platform): State<Arc<Platform<S, M>>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Envelope<Vec<SubjectSummary>>>, ApiError>
where
  S: ReportStore,
  M: MediaStore,
{
  let filter = SubjectFilter::new(&params.q, params.party.as_deref());
  let subjects = platform
    .search_subjects(&filter)
    .await
    .map_err(ApiError::during(Operation::SearchSubjects))?;
  Ok(Json(Envelope::data(subjects)))
}

/// `GET /subjects/{id}`
pub async fn get_one<S, M>(
  State(platform): State<Arc<Platform<S, M>>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Envelope<SubjectProfile>>, ApiError>
where
  S: ReportStore,
  M: MediaStore,
{
  let id = path_id(Operation::SubjectProfile, id)?;
  let profile = platform
    .get_subject_profile(id)
    .await
    .map_err(ApiError::during(Operation::SubjectProfile))?;
  Ok(Json(Envelope::data(profile)))
}
