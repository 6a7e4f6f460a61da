//! Parties and per-party rollups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named affiliation. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
  pub party_id:      Uuid,
  pub name:          String,
  /// Denormalised count of submissions recorded against this party. Not used
  /// for statistics, which are always recomputed from approved reports.
  pub total_reports: u64,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// Approved-report rollup for one party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyStatistics {
  pub party:           String,
  pub total_reports:   usize,
  /// Distinct subjects of this party with at least one approved report.
  pub member_count:    usize,
  /// `total_reports / member_count`, or `None` when there are no members.
  pub average_reports: Option<f64>,
}

impl PartyStatistics {
  pub fn new(party: String, total_reports: usize, member_count: usize) -> Self {
    let average_reports =
      (member_count > 0).then(|| total_reports as f64 / member_count as f64);
    Self { party, total_reports, member_count, average_reports }
  }

  /// The average formatted to one decimal place, or `"—"` when undefined.
  pub fn average_display(&self) -> String {
    match self.average_reports {
      Some(avg) => format!("{avg:.1}"),
      None => "—".to_owned(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn average_handles_zero_members() {
    let stats = PartyStatistics::new("Empty".into(), 0, 0);
    assert_eq!(stats.average_reports, None);
    assert_eq!(stats.average_display(), "—");
  }

  #[test]
  fn average_is_reports_per_member() {
    let stats = PartyStatistics::new("A".into(), 5, 2);
    assert_eq!(stats.average_reports, Some(2.5));
    assert_eq!(stats.average_display(), "2.5");
  }
}
