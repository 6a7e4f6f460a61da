//! The aggregation engine: pure transformations from approved-report rows to
//! the public read models.
//!
//! Counts are always derived from the rows handed in; nothing here trusts a
//! stored counter.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::{
  party::PartyStatistics,
  store::ApprovedRow,
  subject::{Subject, SubjectSummary},
};

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Search predicate over subjects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectFilter {
  /// Case-insensitive substring matched against name or area. Empty matches
  /// everything.
  query: String,
  /// Exact party name; `None` matches every party.
  party: Option<String>,
}

impl SubjectFilter {
  /// Build a filter. A blank party or the literal `"all"` means no party
  /// restriction.
  pub fn new(query: &str, party: Option<&str>) -> Self {
    let party = party
      .map(str::trim)
      .filter(|p| !p.is_empty() && *p != "all")
      .map(str::to_owned);
    Self { query: query.trim().to_lowercase(), party }
  }

  pub fn matches(&self, subject: &Subject) -> bool {
    let party_ok = self.party.as_deref().is_none_or(|p| p == subject.party);
    let text_ok = self.query.is_empty()
      || subject.name.to_lowercase().contains(&self.query)
      || subject.area.to_lowercase().contains(&self.query);
    party_ok && text_ok
  }
}

// ─── Subjects ────────────────────────────────────────────────────────────────

/// Collapse rows into one entry per subject, count approved reports, and rank.
///
/// Ordering is by `report_count` descending, then by subject `created_at`
/// descending.
pub fn rank_subjects(
  rows: impl IntoIterator<Item = ApprovedRow>,
  filter: &SubjectFilter,
) -> Vec<SubjectSummary> {
  let mut index: HashMap<Uuid, usize> = HashMap::new();
  let mut out: Vec<SubjectSummary> = Vec::new();

  for row in rows.into_iter().filter(|r| filter.matches(&r.subject)) {
    match index.get(&row.subject.subject_id) {
      Some(&i) => {
        let entry = &mut out[i];
        entry.report_count += 1;
        if row.subject.updated_at > entry.subject.updated_at {
          entry.subject = row.subject;
        }
      }
      None => {
        index.insert(row.subject.subject_id, out.len());
        out.push(SubjectSummary { subject: row.subject, report_count: 1 });
      }
    }
  }

  out.sort_by(|a, b| {
    b.report_count
      .cmp(&a.report_count)
      .then_with(|| b.subject.created_at.cmp(&a.subject.created_at))
  });
  out
}

// ─── Parties ─────────────────────────────────────────────────────────────────

/// Roll rows up per party: approved reports and distinct subjects. Sorted by
/// total descending; equal totals keep first-seen order.
pub fn party_statistics(
  rows: impl IntoIterator<Item = ApprovedRow>,
) -> Vec<PartyStatistics> {
  let mut index: HashMap<String, usize> = HashMap::new();
  let mut groups: Vec<(String, usize, HashSet<Uuid>)> = Vec::new();

  for row in rows {
    let i = *index.entry(row.subject.party.clone()).or_insert_with(|| {
      groups.push((row.subject.party.clone(), 0, HashSet::new()));
      groups.len() - 1
    });
    let (_, total, members) = &mut groups[i];
    *total += 1;
    members.insert(row.subject.subject_id);
  }

  let mut stats: Vec<PartyStatistics> = groups
    .into_iter()
    .map(|(party, total, members)| PartyStatistics::new(party, total, members.len()))
    .collect();
  stats.sort_by(|a, b| b.total_reports.cmp(&a.total_reports));
  stats
}
