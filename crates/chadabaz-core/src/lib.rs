//! Core types, trait definitions, and services for the chadabaz reporting
//! platform.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! storage backends implement [`store::ReportStore`] and [`media::MediaStore`];
//! everything above them goes through [`platform::Platform`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod aggregate;
pub mod error;
pub mod invalidate;
pub mod media;
pub mod moderation;
pub mod outcome;
pub mod party;
pub mod platform;
pub mod report;
pub mod store;
pub mod subject;
mod views;

pub use error::{Error, ErrorKind, Result};
pub use platform::Platform;
