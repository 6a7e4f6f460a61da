//! Uniform result shapes returned across the public boundary.
//!
//! Mutations report `{ success, message }`; reads report `{ data }` with
//! `data = null` on failure. Unexpected backend errors are logged here with
//! the operation name and replaced by a generic message.

use serde::{Deserialize, Serialize};
use strum::AsRefStr;

use crate::error::{Error, ErrorKind};

/// Every public operation, named for logging and user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
  ListSubjects,
  SearchSubjects,
  SubjectProfile,
  PartyStatistics,
  ListParties,
  SubmitReport,
  ApproveReport,
  RejectReport,
  DeleteReport,
  ListReports,
  ModerationSummary,
}

impl Operation {
  pub fn success_message(self) -> &'static str {
    match self {
      Self::SubmitReport => {
        "Report submitted successfully. It will be published after review."
      }
      Self::ApproveReport => "Report approved.",
      Self::RejectReport => "Report rejected.",
      Self::DeleteReport => "Report deleted.",
      _ => "OK",
    }
  }

  pub fn failure_message(self) -> &'static str {
    match self {
      Self::SubmitReport => "Could not submit the report. Please try again.",
      Self::ApproveReport | Self::RejectReport => {
        "Could not update the report status. Please try again."
      }
      Self::DeleteReport => "Could not delete the report. Please try again.",
      Self::SubjectProfile => "Could not load the profile. Please try again.",
      _ => "Could not load data. Please try again.",
    }
  }

  fn not_found_message(self) -> &'static str {
    match self {
      Self::SubjectProfile => "Profile not found.",
      other => other.failure_message(),
    }
  }
}

impl Error {
  /// The message shown to end users for this error. Logs internal errors.
  pub fn user_message(&self, op: Operation) -> String {
    match self.kind() {
      ErrorKind::Validation => self.to_string(),
      ErrorKind::Unavailable => {
        "No database connection. Please try again later.".to_owned()
      }
      ErrorKind::NotFound => {
        tracing::debug!(operation = op.as_ref(), error = %self, "not found");
        op.not_found_message().to_owned()
      }
      ErrorKind::Internal => {
        tracing::error!(operation = op.as_ref(), error = %self, "operation failed");
        op.failure_message().to_owned()
      }
    }
  }
}

// ─── Mutations ───────────────────────────────────────────────────────────────

/// `{ success, message }` — the result of a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
  pub success: bool,
  pub message: String,
}

impl Outcome {
  pub fn succeeded(op: Operation) -> Self {
    Self { success: true, message: op.success_message().to_owned() }
  }

  pub fn failed(op: Operation, err: &Error) -> Self {
    Self { success: false, message: err.user_message(op) }
  }
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// `{ data }` — the result of a read. `data` is `null` on failure and
/// `message` explains why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
  pub data:    Option<T>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

impl<T> Envelope<T> {
  pub fn data(data: T) -> Self { Self { data: Some(data), message: None } }

  pub fn failed(op: Operation, err: &Error) -> Self {
    Self { data: None, message: Some(err.user_message(op)) }
  }
}
