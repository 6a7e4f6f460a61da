//! Error types for `chadabaz-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// No backing store is configured or reachable.
  #[error("no database connection")]
  Unavailable,

  /// Input rejected before any write; the message is safe to show to users.
  #[error("{0}")]
  Validation(String),

  #[error("subject not found: {0}")]
  SubjectNotFound(Uuid),

  #[error("report not found: {0}")]
  ReportNotFound(Uuid),

  /// An id that could not be parsed; treated like an unknown one.
  #[error("malformed id: {0}")]
  MalformedId(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Coarse classification used at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Validation,
  Unavailable,
  NotFound,
  Internal,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Validation(_) => ErrorKind::Validation,
      Self::Unavailable => ErrorKind::Unavailable,
      Self::SubjectNotFound(_) | Self::ReportNotFound(_) | Self::MalformedId(_) => {
        ErrorKind::NotFound
      }
      Self::Store(_) => ErrorKind::Internal,
    }
  }

  /// Wrap a backend error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
