//! Handlers for `/parties` endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use chadabaz_core::{
  Platform,
  media::MediaStore,
  outcome::{Envelope, Operation},
  party::{Party, PartyStatistics},
  store::ReportStore,
};

use crate::error::ApiError;

/// `GET /parties` — every known party, for the search filter.
pub async fn list<S, M>(
  State(platform): State<Arc<Platform<S, M>>>,
) -> Result<Json<Envelope<Vec<Party>>>, ApiError>
where
  S: ReportStore,
  M: MediaStore,
{
  let parties = platform
    .list_parties()
    .await
    .map_err(ApiError::during(Operation::ListParties))?;
  Ok(Json(Envelope::data(parties)))
}

/// `GET /parties/statistics` — approved-report rollup, busiest party first.
pub async fn statistics<S, M>(
  State(platform): State<Arc<Platform<S, M>>>,
) -> Result<Json<Envelope<Vec<PartyStatistics>>>, ApiError>
where
  S: ReportStore,
  M: MediaStore,
{
  let stats = platform
    .compute_party_statistics()
    .await
    .map_err(ApiError::during(Operation::PartyStatistics))?;
  Ok(Json(Envelope::data(stats)))
}
