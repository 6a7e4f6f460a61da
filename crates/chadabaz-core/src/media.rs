//! The `MediaStore` trait — object storage for report evidence and profile
//! images.

use std::future::Future;

use bytes::Bytes;
use strum::{AsRefStr, Display};

/// Top-level folder an upload is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum MediaNamespace {
  Reports,
  Profiles,
}

/// One uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct MediaUpload {
  /// Client-supplied file name; only its extension is kept.
  pub file_name:    String,
  pub content_type: Option<String>,
  pub bytes:        Bytes,
}

impl MediaUpload {
  pub fn is_empty(&self) -> bool { self.bytes.is_empty() }

  /// Lower-cased extension of `file_name`, if it has a usable one.
  pub fn extension(&self) -> Option<String> {
    let (_, ext) = self.file_name.rsplit_once('.')?;
    (!ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
      .then(|| ext.to_ascii_lowercase())
  }
}

/// Abstraction over an object store that returns publicly resolvable
/// references.
///
/// Callers upload items independently; a failed upload must not affect the
/// others.
pub trait MediaStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Store `upload` under `namespace` and return its public reference.
  fn upload<'a>(
    &'a self,
    namespace: MediaNamespace,
    upload: &'a MediaUpload,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}
