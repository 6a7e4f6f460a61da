//! HTTP server assembly for chadabaz.
//!
//! Mounts the JSON API under `/api`, guards the admin routes with HTTP Basic
//! auth, and serves stored media from disk under `/media`.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Json, Router,
  extract::DefaultBodyLimit,
  http::StatusCode,
  middleware,
  response::{IntoResponse, Response},
};
use chadabaz_core::{Platform, media::MediaStore, store::ReportStore};
use serde::{Deserialize, Serialize};
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use auth::{AuthConfig, require_admin};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CHADABAZ_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  /// SQLite database file. When unset the server starts without a store and
  /// answers every data request with 503.
  pub store_path:           Option<PathBuf>,
  pub media_dir:            PathBuf,
  /// Prefix that media references are published under.
  pub media_base_url:       String,
  pub admin_username:       String,
  pub admin_password_hash:  String,
  pub request_timeout_secs: u64,
  pub max_upload_bytes:     usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "127.0.0.1".to_string(),
      port:                 8080,
      store_path:           None,
      media_dir:            PathBuf::from("media"),
      media_base_url:       "/media".to_string(),
      admin_username:       "admin".to_string(),
      admin_password_hash:  String::new(),
      request_timeout_secs: 30,
      max_upload_bytes:     50 * 1024 * 1024,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S, M>(platform: Arc<Platform<S, M>>, config: &ServerConfig) -> Router
where
  S: ReportStore + 'static,
  M: MediaStore + 'static,
{
  let auth = Arc::new(AuthConfig::from(config));

  let admin = chadabaz_api::admin_router(platform.clone())
    .route_layer(middleware::from_fn_with_state(auth, require_admin));
  let api = chadabaz_api::public_router(platform).merge(admin);

  let app = Router::new()
    .nest("/api", api)
    .nest_service("/media", ServeDir::new(&config.media_dir))
    .layer(DefaultBodyLimit::max(config.max_upload_bytes));

  with_timeout(app, Duration::from_secs(config.request_timeout_secs))
    .layer(TraceLayer::new_for_http())
}

/// Body sent when a request outlives the timeout. It reads as a failed
/// mutation and as an empty read alike.
#[derive(Serialize)]
struct TimedOut {
  success: bool,
  data:    Option<()>,
  message: &'static str,
}

/// Bound every request to `timeout`; late requests get a 408 with a message.
fn with_timeout(app: Router, timeout: Duration) -> Router {
  app
    .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
    .layer(middleware::map_response(timed_out_body))
}

async fn timed_out_body(resp: Response) -> Response {
  if resp.status() != StatusCode::REQUEST_TIMEOUT {
    return resp;
  }
  tracing::warn!("request timed out");
  let body = TimedOut {
    success: false,
    data:    None,
    message: "The request took too long. Please try again.",
  };
  (StatusCode::REQUEST_TIMEOUT, Json(body)).into_response()
}

// ─── Tests ────────────────────────────────────────────────────────────────────
