//! chadabaz server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) plus
//! `CHADABAZ_*` environment overrides, opens the SQLite store and the media
//! directory, and serves the API over HTTP.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for `admin_password_hash`:
//!
//! ```text
//! cargo run -p chadabaz-server -- --hash-password
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use chadabaz_core::Platform;
use chadabaz_media_fs::FsMediaStore;
use chadabaz_server::ServerConfig;
use chadabaz_store_sqlite::SqliteStore;
use clap::Parser;
use rand_core::OsRng;
use tokio::{net::TcpListener, sync::broadcast::error::RecvError};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "chadabaz report server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("CHADABAZ"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  if server_cfg.admin_password_hash.is_empty() {
    tracing::warn!("admin_password_hash is unset; admin routes will reject every request");
  }

  let media_dir = expand_tilde(&server_cfg.media_dir);
  let media = FsMediaStore::open(&media_dir, &server_cfg.media_base_url)
    .await
    .with_context(|| format!("failed to open media directory {media_dir:?}"))?;

  let platform = match &server_cfg.store_path {
    Some(path) => {
      let store_path = expand_tilde(path);
      let store = SqliteStore::open(&store_path)
        .await
        .with_context(|| format!("failed to open store at {store_path:?}"))?;
      tracing::info!(path = %store_path.display(), "store opened");
      Platform::new(store, media)
    }
    None => {
      tracing::warn!("store_path is unset; serving without a database");
      Platform::without_store(media)
    }
  };
  let platform = Arc::new(platform);

  spawn_invalidation_log(&platform);

  let app = chadabaz_server::router(platform, &server_cfg);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

/// Log every view invalidation the platform publishes.
fn spawn_invalidation_log<S, M>(platform: &Platform<S, M>)
where
  S: chadabaz_core::store::ReportStore,
  M: chadabaz_core::media::MediaStore,
{
  let mut events = platform.subscribe();
  tokio::spawn(async move {
    loop {
      match events.recv().await {
        Ok(event) => tracing::info!(views = ?event.views, "views invalidated"),
        Err(RecvError::Lagged(missed)) => {
          tracing::warn!(missed, "invalidation log fell behind");
        }
        Err(RecvError::Closed) => break,
      }
    }
  });
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
