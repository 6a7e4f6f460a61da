//! Async HTTP client wrapping the chadabaz JSON API.

use std::{path::Path, time::Duration};

use anyhow::{Context, Result, anyhow};
use chadabaz_core::{
  outcome::{Envelope, Outcome},
  party::{Party, PartyStatistics},
  report::{AdminReport, ModerationCounts, ReportStatus},
  subject::{SubjectProfile, SubjectSummary},
};
use reqwest::{Client, Method, RequestBuilder, Response, multipart};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Connection settings for the chadabaz API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Fields of a report submitted from the command line.
#[derive(Debug, Clone, Default)]
pub struct ReportForm {
  pub name:        String,
  pub area:        String,
  pub party:       String,
  pub body:        String,
  pub description: Option<String>,
  pub submitter:   Option<String>,
  pub media:       Vec<std::path::PathBuf>,
}

/// Async HTTP client for the chadabaz JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    let req = self.client.request(method, self.url(path));
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Send a read request and unwrap its `{ data }` envelope.
  async fn read<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T> {
    let resp = req.send().await.with_context(|| format!("{what} failed"))?;
    let resp = check(resp, what).await?;
    let envelope: Envelope<T> = resp
      .json()
      .await
      .with_context(|| format!("deserialising {what}"))?;
    envelope
      .data
      .ok_or_else(|| anyhow!("{what}: {}", envelope.message.unwrap_or_default()))
  }

  /// Send a mutation and return its `{ success, message }` outcome.
  async fn mutate(&self, req: RequestBuilder, what: &str) -> Result<Outcome> {
    let resp = req.send().await.with_context(|| format!("{what} failed"))?;
    let resp = check(resp, what).await?;
    resp.json().await.with_context(|| format!("deserialising {what}"))
  }

  // ── Public ────────────────────────────────────────────────────────────────

  /// `GET /api/subjects`
  pub async fn list_subjects(&self) -> Result<Vec<SubjectSummary>> {
    self
      .read(self.request(Method::GET, "/subjects"), "GET /subjects")
      .await
  }

  /// `GET /api/subjects/search?q=<q>[&party=<party>]`
  pub async fn search_subjects(
    &self,
    query: &str,
    party: Option<&str>,
  ) -> Result<Vec<SubjectSummary>> {
    let mut params = vec![("q", query)];
    if let Some(party) = party {
      params.push(("party", party));
    }
    let req = self.request(Method::GET, "/subjects/search").query(&params);
    self.read(req, "GET /subjects/search").await
  }

  /// `GET /api/subjects/{id}`
  pub async fn subject_profile(&self, id: Uuid) -> Result<SubjectProfile> {
    let path = format!("/subjects/{id}");
    self
      .read(self.request(Method::GET, &path), &format!("GET {path}"))
      .await
  }

  /// `GET /api/parties`
  pub async fn list_parties(&self) -> Result<Vec<Party>> {
    self
      .read(self.request(Method::GET, "/parties"), "GET /parties")
      .await
  }

  /// `GET /api/parties/statistics`
  pub async fn party_statistics(&self) -> Result<Vec<PartyStatistics>> {
    self
      .read(self.request(Method::GET, "/parties/statistics"), "GET /parties/statistics")
      .await
  }

  /// `POST /api/reports` as `multipart/form-data`.
  pub async fn submit_report(&self, form: ReportForm) -> Result<Outcome> {
    let mut parts = multipart::Form::new()
      .text("name", form.name)
      .text("area", form.area)
      .text("party", form.party)
      .text("body", form.body);
    if let Some(description) = form.description {
      parts = parts.text("subject_description", description);
    }
    if let Some(submitter) = form.submitter {
      parts = parts.text("submitter", submitter);
    }
    for (i, path) in form.media.iter().enumerate() {
      parts = parts.part(format!("media_{i}"), file_part(path).await?);
    }

    let req = self.request(Method::POST, "/reports").multipart(parts);
    self.mutate(req, "POST /reports").await
  }

  // ── Admin ─────────────────────────────────────────────────────────────────

  /// `GET /api/admin/reports[?status=<status>]`
  pub async fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<AdminReport>> {
    let mut req = self.request(Method::GET, "/admin/reports");
    if let Some(status) = status {
      req = req.query(&[("status", status.as_ref())]);
    }
    self.read(req, "GET /admin/reports").await
  }

  /// `GET /api/admin/summary`
  pub async fn moderation_summary(&self) -> Result<ModerationCounts> {
    self
      .read(self.request(Method::GET, "/admin/summary"), "GET /admin/summary")
      .await
  }

  /// `POST /api/admin/reports/{id}/approve`
  pub async fn approve(&self, id: Uuid) -> Result<Outcome> {
    let path = format!("/admin/reports/{id}/approve");
    self
      .mutate(self.request(Method::POST, &path), &format!("POST {path}"))
      .await
  }

  /// `POST /api/admin/reports/{id}/reject`
  pub async fn reject(&self, id: Uuid) -> Result<Outcome> {
    let path = format!("/admin/reports/{id}/reject");
    self
      .mutate(self.request(Method::POST, &path), &format!("POST {path}"))
      .await
  }

  /// `DELETE /api/admin/reports/{id}`
  pub async fn delete(&self, id: Uuid) -> Result<Outcome> {
    let path = format!("/admin/reports/{id}");
    self
      .mutate(self.request(Method::DELETE, &path), &format!("DELETE {path}"))
      .await
  }
}

/// Turn an error status into an error carrying the server's message.
async fn check(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let message = resp
    .json::<serde_json::Value>()
    .await
    .ok()
    .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned));
  match message {
    Some(m) => Err(anyhow!("{what} → {status}: {m}")),
    None => Err(anyhow!("{what} → {status}")),
  }
}

async fn file_part(path: &Path) -> Result<multipart::Part> {
  let bytes = tokio::fs::read(path)
    .await
    .with_context(|| format!("reading {}", path.display()))?;
  let file_name = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| "upload".to_string());
  Ok(multipart::Part::bytes(bytes).file_name(file_name))
}
