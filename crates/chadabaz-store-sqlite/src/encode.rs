//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are fixed-width RFC 3339 strings (microseconds, `Z` suffix) so
//! that lexical order matches chronological order. UUIDs are hyphenated
//! lowercase strings. Social links and media lists are compact JSON.

use std::str::FromStr;

use chadabaz_core::{
  party::Party,
  report::{Report, ReportStatus},
  subject::{SocialLinks, Subject},
};
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

pub fn encode_status(status: ReportStatus) -> &'static str {
  match status {
    ReportStatus::Pending => "pending",
    ReportStatus::Approved => "approved",
    ReportStatus::Rejected => "rejected",
  }
}

pub fn decode_status(s: &str) -> Result<ReportStatus> {
  ReportStatus::from_str(s).map_err(|_| Error::Decode(format!("unknown report status: {s:?}")))
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_social(links: &SocialLinks) -> Result<String> {
  Ok(serde_json::to_string(links)?)
}

pub fn decode_social(s: &str) -> Result<SocialLinks> { Ok(serde_json::from_str(s)?) }

pub fn encode_media(urls: &[String]) -> Result<String> {
  Ok(serde_json::to_string(urls)?)
}

pub fn decode_media(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawSubject::from_row`]; expects `subjects s` joined
/// with `parties p`.
pub const SUBJECT_COLUMNS: &str = "s.subject_id, s.name, s.area, s.party_id, p.name, \
   s.image_url, s.description, s.social_json, s.visible, s.created_at, s.updated_at";

/// Number of columns in [`SUBJECT_COLUMNS`].
pub const SUBJECT_WIDTH: usize = 11;

/// Raw strings read directly from a `subjects ⋈ parties` row.
pub struct RawSubject {
  pub subject_id:  String,
  pub name:        String,
  pub area:        String,
  pub party_id:    String,
  pub party:       String,
  pub image_url:   Option<String>,
  pub description: Option<String>,
  pub social_json: String,
  pub visible:     bool,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawSubject {
  /// Read [`SUBJECT_COLUMNS`] starting at column `at`.
  pub fn from_row(row: &rusqlite::Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      subject_id:  row.get(at)?,
      name:        row.get(at + 1)?,
      area:        row.get(at + 2)?,
      party_id:    row.get(at + 3)?,
      party:       row.get(at + 4)?,
      image_url:   row.get(at + 5)?,
      description: row.get(at + 6)?,
      social_json: row.get(at + 7)?,
      visible:     row.get(at + 8)?,
      created_at:  row.get(at + 9)?,
      updated_at:  row.get(at + 10)?,
    })
  }

  pub fn into_subject(self) -> Result<Subject> {
    Ok(Subject {
      subject_id:  decode_uuid(&self.subject_id)?,
      name:        self.name,
      area:        self.area,
      party_id:    decode_uuid(&self.party_id)?,
      party:       self.party,
      image_url:   self.image_url,
      description: self.description,
      social:      decode_social(&self.social_json)?,
      visible:     self.visible,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// Column list matching [`RawReport::from_row`]; expects `reports r`.
pub const REPORT_COLUMNS: &str = "r.report_id, r.subject_id, r.body, r.media_json, \
   r.status, r.submitter, r.created_at, r.updated_at";

/// Raw strings read directly from a `reports` row.
pub struct RawReport {
  pub report_id:  String,
  pub subject_id: String,
  pub body:       String,
  pub media_json: String,
  pub status:     String,
  pub submitter:  Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

impl RawReport {
  /// Read [`REPORT_COLUMNS`] starting at column `at`.
  pub fn from_row(row: &rusqlite::Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      report_id:  row.get(at)?,
      subject_id: row.get(at + 1)?,
      body:       row.get(at + 2)?,
      media_json: row.get(at + 3)?,
      status:     row.get(at + 4)?,
      submitter:  row.get(at + 5)?,
      created_at: row.get(at + 6)?,
      updated_at: row.get(at + 7)?,
    })
  }

  pub fn into_report(self) -> Result<Report> {
    Ok(Report {
      report_id:  decode_uuid(&self.report_id)?,
      subject_id: decode_uuid(&self.subject_id)?,
      body:       self.body,
      media:      decode_media(&self.media_json)?,
      status:     decode_status(&self.status)?,
      submitter:  self.submitter,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `parties` row.
pub struct RawParty {
  pub party_id:      String,
  pub name:          String,
  pub total_reports: i64,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawParty {
  pub fn into_party(self) -> Result<Party> {
    Ok(Party {
      party_id:      decode_uuid(&self.party_id)?,
      name:          self.name,
      total_reports: u64::try_from(self.total_reports)
        .map_err(|_| Error::Decode(format!("negative total_reports: {}", self.total_reports)))?,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}
