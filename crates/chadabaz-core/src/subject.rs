//! Subject — the person a report is filed against.
//!
//! A subject is identified at intake by its `(name, area)` pair. Its attributes
//! are fixed by the first submission that creates it; later reports never
//! overwrite them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::report::Report;

// ─── Social links ────────────────────────────────────────────────────────────

/// Social-media profile URLs. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
  pub facebook:  Option<String>,
  pub twitter:   Option<String>,
  pub instagram: Option<String>,
  pub linkedin:  Option<String>,
  pub youtube:   Option<String>,
  pub tiktok:    Option<String>,
}

impl SocialLinks {
  pub fn is_empty(&self) -> bool { self.iter().next().is_none() }

  /// `(platform, url)` pairs for the links that are present.
  pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
    [
      ("facebook", &self.facebook),
      ("twitter", &self.twitter),
      ("instagram", &self.instagram),
      ("linkedin", &self.linkedin),
      ("youtube", &self.youtube),
      ("tiktok", &self.tiktok),
    ]
    .into_iter()
    .filter_map(|(platform, url)| url.as_deref().map(|u| (platform, u)))
  }

  /// Set a link by platform name. Blank URLs clear the slot; unknown platforms
  /// are ignored and reported as `false`.
  pub fn set(&mut self, platform: &str, url: &str) -> bool {
    let slot = match platform {
      "facebook" => &mut self.facebook,
      "twitter" => &mut self.twitter,
      "instagram" => &mut self.instagram,
      "linkedin" => &mut self.linkedin,
      "youtube" => &mut self.youtube,
      "tiktok" => &mut self.tiktok,
      _ => return false,
    };
    let url = url.trim();
    *slot = (!url.is_empty()).then(|| url.to_owned());
    true
  }

  /// Drop blank entries and trim the rest.
  pub fn normalized(self) -> Self {
    fn clean(v: Option<String>) -> Option<String> {
      v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
    }
    Self {
      facebook:  clean(self.facebook),
      twitter:   clean(self.twitter),
      instagram: clean(self.instagram),
      linkedin:  clean(self.linkedin),
      youtube:   clean(self.youtube),
      tiktok:    clean(self.tiktok),
    }
  }
}

// ─── Subject ─────────────────────────────────────────────────────────────────

/// A reported person, joined with the name of its party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
  pub subject_id:  Uuid,
  pub name:        String,
  pub area:        String,
  pub party_id:    Uuid,
  pub party:       String,
  pub image_url:   Option<String>,
  pub description: Option<String>,
  #[serde(default)]
  pub social:      SocialLinks,
  /// True once any of the subject's reports has been approved. Never reset by
  /// rejection or deletion.
  pub visible:     bool,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

/// Input for creating a subject during intake.
#[derive(Debug, Clone)]
pub struct NewSubject {
  pub name:        String,
  pub area:        String,
  pub image_url:   Option<String>,
  pub description: Option<String>,
  pub social:      SocialLinks,
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// A subject on the public listing, annotated with its approved-report count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
  #[serde(flatten)]
  pub subject:      Subject,
  pub report_count: usize,
}

/// A subject's public profile: the subject plus its approved reports, newest
/// first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectProfile {
  #[serde(flatten)]
  pub subject: Subject,
  pub reports: Vec<Report>,
}
