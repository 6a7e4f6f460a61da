//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure is rendered in the same shape as the operation's success
//! body: `{ success: false, message }` for mutations and
//! `{ data: null, message }` for reads.

use axum::{
  Json,
  extract::{Path, rejection::PathRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use chadabaz_core::{
  Error, ErrorKind,
  outcome::{Envelope, Operation, Outcome},
};
use thiserror::Error;
use uuid::Uuid;

/// An error returned by an API handler, tagged with the operation it failed.
#[derive(Debug, Error)]
#[error("{op:?} failed: {source}")]
pub struct ApiError {
  pub op:     Operation,
  #[source]
  pub source: Error,
}

impl ApiError {
  pub fn new(op: Operation, source: Error) -> Self { Self { op, source } }

  /// Partially applied constructor for `map_err`.
  pub fn during(op: Operation) -> impl FnOnce(Error) -> Self {
    move |source| Self::new(op, source)
  }

  pub fn status(&self) -> StatusCode {
    match self.source.kind() {
      ErrorKind::Validation => StatusCode::BAD_REQUEST,
      ErrorKind::NotFound => StatusCode::NOT_FOUND,
      ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
      ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

/// Unwrap a `{id}` path segment. A value that is not a UUID is answered like
/// an id that matches nothing.
pub fn path_id(
  op: Operation,
  path: Result<Path<Uuid>, PathRejection>,
) -> Result<Uuid, ApiError> {
  match path {
    Ok(Path(id)) => Ok(id),
    Err(rejection) => Err(ApiError::new(op, Error::MalformedId(rejection.body_text()))),
  }
}

/// Operations answered with an [`Outcome`] rather than an [`Envelope`].
fn is_mutation(op: Operation) -> bool {
  matches!(
    op,
    Operation::SubmitReport
      | Operation::ApproveReport
      | Operation::RejectReport
      | Operation::DeleteReport
  )
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if is_mutation(self.op) {
      (status, Json(Outcome::failed(self.op, &self.source))).into_response()
    } else {
      let body: Envelope<()> = Envelope::failed(self.op, &self.source);
      (status, Json(body)).into_response()
    }
  }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;

  async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn mutation_failure_is_an_outcome() {
    let err = ApiError::new(Operation::ApproveReport, Error::ReportNotFound(Uuid::nil()));
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Could not update the report status. Please try again.");
  }

  #[tokio::test]
  async fn read_failure_is_an_empty_envelope() {
    let resp = ApiError::new(Operation::ListSubjects, Error::Unavailable).into_response();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(resp).await;
    assert!(body["data"].is_null());
    assert_eq!(body["message"], "No database connection. Please try again later.");
  }

  #[tokio::test]
  async fn malformed_id_reads_as_not_found() {
    let err = Error::MalformedId("not-a-uuid".into());
    let resp = ApiError::new(Operation::SubjectProfile, err).into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = body_json(resp).await;
    assert!(body["data"].is_null());
    assert_eq!(body["message"], "Profile not found.");
  }

  #[tokio::test]
  async fn validation_message_passes_through() {
    let err = Error::Validation("Report description is required.".into());
    let resp = ApiError::new(Operation::SubmitReport, err).into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["message"], "Report description is required.");
  }
}
