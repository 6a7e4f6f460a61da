//! Local-filesystem backend for chadabaz media.
//!
//! Files are content-addressed: each upload is stored at
//! `<root>/<namespace>/<sha256>.<ext>` and published as
//! `<public_base_url>/<namespace>/<sha256>.<ext>`. Uploading the same bytes
//! twice yields the same reference and writes nothing the second time.

pub mod error;

use std::path::{Path, PathBuf};

use chadabaz_core::media::{MediaNamespace, MediaStore, MediaUpload};
use sha2::{Digest, Sha256};
use tokio::fs;

pub use error::{Error, Result};

/// Object key for `upload`: `<namespace>/<sha256 hex>[.<ext>]`.
///
/// The extension comes from the file name, or from the declared content type
/// when the name has none.
pub fn object_key(namespace: MediaNamespace, upload: &MediaUpload) -> String {
  let digest = hex::encode(Sha256::digest(&upload.bytes));
  let ext = upload
    .extension()
    .or_else(|| upload.content_type.as_deref().and_then(extension_for));
  match ext {
    Some(ext) => format!("{namespace}/{digest}.{ext}"),
    None => format!("{namespace}/{digest}"),
  }
}

/// Preferred extension for a MIME type such as `image/jpeg; charset=binary`.
fn extension_for(content_type: &str) -> Option<String> {
  let essence = content_type.split(';').next()?.trim().to_ascii_lowercase();
  let (_, subtype) = essence.split_once('/')?;
  let known = mime_guess::get_mime_extensions_str(&essence)?;
  let ext = known
    .iter()
    .find(|e| **e == subtype)
    .or_else(|| known.first())?;
  Some((*ext).to_owned())
}

/// A [`MediaStore`] writing into a directory served elsewhere under
/// `public_base_url`.
#[derive(Debug, Clone)]
pub struct FsMediaStore {
  root:            PathBuf,
  public_base_url: String,
}

impl FsMediaStore {
  /// Create the store, creating `root` if it does not exist yet.
  pub async fn open(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Result<Self> {
    let root = root.into();
    fs::create_dir_all(&root).await?;
    if !fs::metadata(&root).await?.is_dir() {
      return Err(Error::NotADirectory(root));
    }

    let public_base_url = public_base_url.into().trim_end_matches('/').to_owned();
    tracing::debug!(root = %root.display(), %public_base_url, "media store ready");
    Ok(Self { root, public_base_url })
  }

  pub fn root(&self) -> &Path { &self.root }

  fn public_url(&self, key: &str) -> String { format!("{}/{key}", self.public_base_url) }
}

impl MediaStore for FsMediaStore {
  type Error = Error;

  async fn upload(&self, namespace: MediaNamespace, upload: &MediaUpload) -> Result<String> {
    let key = object_key(namespace, upload);
    let path = self.root.join(&key);

    if fs::try_exists(&path).await? {
      tracing::debug!(%key, "media already stored");
      return Ok(self.public_url(&key));
    }

    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).await?;
    }
    fs::write(&path, &upload.bytes)
      .await
      .map_err(|source| Error::Write { path: path.clone(), source })?;

    tracing::debug!(%key, bytes = upload.bytes.len(), "media stored");
    Ok(self.public_url(&key))
  }
}

#[cfg(test)]
mod tests {
  use bytes::Bytes;

  use super::*;

  fn upload(name: &str, bytes: &'static [u8]) -> MediaUpload {
    MediaUpload {
      file_name:    name.into(),
      content_type: None,
      bytes:        Bytes::from_static(bytes),
    }
  }

  #[test]
  fn key_is_namespaced_digest_with_extension() {
    let key = object_key(MediaNamespace::Reports, &upload("Clip.MP4", b"abc"));
    assert_eq!(
      key,
      "reports/ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad.mp4"
    );

    let bare = object_key(MediaNamespace::Profiles, &upload("face", b"abc"));
    assert!(bare.starts_with("profiles/ba7816bf"));
    assert!(!bare.contains('.'));
  }

  #[test]
  fn content_type_supplies_missing_extension() {
    let mut up = upload("face", b"abc");
    up.content_type = Some("image/png".into());
    assert!(object_key(MediaNamespace::Profiles, &up).ends_with(".png"));

    up.content_type = Some("image/jpeg; charset=binary".into());
    assert!(object_key(MediaNamespace::Profiles, &up).ends_with(".jpeg"));

    // The file name wins when it has an extension.
    let mut named = upload("clip.mp4", b"abc");
    named.content_type = Some("image/png".into());
    assert!(object_key(MediaNamespace::Reports, &named).ends_with(".mp4"));

    up.content_type = Some("application/x-not-a-real-type".into());
    assert!(!object_key(MediaNamespace::Profiles, &up).contains('.'));
  }

  #[tokio::test]
  async fn upload_writes_file_and_returns_public_url() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsMediaStore::open(dir.path(), "https://example.org/media/")
      .await
      .unwrap();

    let up = upload("photo.jpg", b"jpeg bytes");
    let url = store.upload(MediaNamespace::Reports, &up).await.unwrap();
    let key = object_key(MediaNamespace::Reports, &up);

    assert_eq!(url, format!("https://example.org/media/{key}"));
    let written = std::fs::read(dir.path().join(&key)).unwrap();
    assert_eq!(written, b"jpeg bytes");
  }

  #[tokio::test]
  async fn identical_bytes_share_a_reference() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsMediaStore::open(dir.path(), "/media").await.unwrap();

    let a = store
      .upload(MediaNamespace::Reports, &upload("a.png", b"same"))
      .await
      .unwrap();
    let b = store
      .upload(MediaNamespace::Reports, &upload("b.png", b"same"))
      .await
      .unwrap();
    assert_eq!(a, b);
    assert!(a.starts_with("/media/reports/"));
  }

  #[tokio::test]
  async fn open_creates_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested").join("media");
    let store = FsMediaStore::open(&root, "/media").await.unwrap();
    assert!(store.root().is_dir());
  }

  #[tokio::test]
  async fn open_rejects_a_file_root() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("not-a-dir");
    std::fs::write(&file, b"x").unwrap();

    let err = FsMediaStore::open(&file, "/media").await.unwrap_err();
    // create_dir_all fails on an existing file before the explicit check.
    assert!(matches!(err, Error::Io(_) | Error::NotADirectory(_)));
  }
}
