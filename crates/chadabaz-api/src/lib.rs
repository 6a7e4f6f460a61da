//! JSON REST API for chadabaz.
//!
//! Exposes two axum routers backed by any [`Platform`]: the public surface
//! (listings, profiles, intake) and the admin surface (moderation). The admin
//! router carries no authentication of its own; auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let api = chadabaz_api::public_router(platform.clone())
//!   .merge(chadabaz_api::admin_router(platform).route_layer(auth));
//! Router::new().nest("/api", api)
//! ```

pub mod admin;
pub mod error;
pub mod parties;
pub mod reports;
pub mod subjects;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use chadabaz_core::{Platform, media::MediaStore, store::ReportStore};

pub use error::ApiError;

/// Routes anyone may call.
pub fn public_router<S, M>(platform: Arc<Platform<S, M>>) -> Router<()>
where
  S: ReportStore + 'static,
  M: MediaStore + 'static,
{
  Router::new()
    // Subjects
    .route("/subjects", get(subjects::list::<S, M>))
    .route("/subjects/search", get(subjects::search::<S, M>))
    .route("/subjects/{id}", get(subjects::get_one::<S, M>))
    // Parties
    .route("/parties", get(parties::list::<S, M>))
    .route("/parties/statistics", get(parties::statistics::<S, M>))
    // Intake
    .route("/reports", post(reports::submit::<S, M>))
    .with_state(platform)
}

/// Moderation routes. Wrap with an authentication layer before serving.
pub fn admin_router<S, M>(platform: Arc<Platform<S, M>>) -> Router<()>
where
  S: ReportStore + 'static,
  M: MediaStore + 'static,
{
  Router::new()
    .route("/admin/reports", get(admin::list_reports::<S, M>))
    .route("/admin/summary", get(admin::summary::<S, M>))
    .route("/admin/reports/{id}/approve", post(admin::approve::<S, M>))
    .route("/admin/reports/{id}/reject", post(admin::reject::<S, M>))
    .route("/admin/reports/{id}", delete(admin::delete::<S, M>))
    .with_state(platform)
}
