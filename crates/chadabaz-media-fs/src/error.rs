//! Error type for `chadabaz-media-fs`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("media root {0} is not a directory")]
  NotADirectory(PathBuf),

  #[error("could not write {path}: {source}")]
  Write {
    path:   PathBuf,
    source: std::io::Error,
  },

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
