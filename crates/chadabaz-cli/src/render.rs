//! Plain-text rendering of API results for the terminal.

use std::fmt::Write as _;

use chadabaz_core::{
  outcome::Outcome,
  party::{Party, PartyStatistics},
  report::{AdminReport, ModerationCounts},
  subject::{SubjectProfile, SubjectSummary},
};

const DATE: &str = "%Y-%m-%d";

pub fn subjects(rows: &[SubjectSummary]) -> String {
  if rows.is_empty() {
    return "No subjects found.\n".to_owned();
  }
  let mut out = String::new();
  for row in rows {
    let s = &row.subject;
    let _ = writeln!(
      out,
      "{:>4}  {}  ({}, {})  {}",
      row.report_count, s.name, s.area, s.party, s.subject_id
    );
  }
  out
}

pub fn profile(p: &SubjectProfile) -> String {
  let s = &p.subject;
  let mut out = String::new();
  let _ = writeln!(out, "{}", s.name);
  let _ = writeln!(out, "  area:  {}", s.area);
  let _ = writeln!(out, "  party: {}", s.party);
  if let Some(description) = &s.description {
    let _ = writeln!(out, "  about: {description}");
  }
  if let Some(image) = &s.image_url {
    let _ = writeln!(out, "  image: {image}");
  }
  for (platform, url) in s.social.iter() {
    let _ = writeln!(out, "  {platform}: {url}");
  }

  let _ = writeln!(out, "\n{} approved report(s)", p.reports.len());
  for r in &p.reports {
    let _ = writeln!(out, "\n[{}] {}", r.created_at.format(DATE), r.body);
    for url in &r.media {
      let _ = writeln!(out, "  - {url}");
    }
  }
  out
}

pub fn parties(rows: &[Party]) -> String {
  let mut out = String::new();
  for p in rows {
    let _ = writeln!(out, "{:>5}  {}", p.total_reports, p.name);
  }
  out
}

pub fn statistics(rows: &[PartyStatistics]) -> String {
  let mut out = format!("{:>7} {:>7} {:>7}  party\n", "reports", "members", "avg");
  for s in rows {
    let _ = writeln!(
      out,
      "{:>7} {:>7} {:>7}  {}",
      s.total_reports,
      s.member_count,
      s.average_display(),
      s.party
    );
  }
  out
}

pub fn reports(rows: &[AdminReport]) -> String {
  if rows.is_empty() {
    return "No reports.\n".to_owned();
  }
  let mut out = String::new();
  for r in rows {
    let _ = writeln!(
      out,
      "{}  {:<8}  {}  {} ({})",
      r.report.report_id,
      r.report.status.as_ref(),
      r.report.created_at.format(DATE),
      r.subject.name,
      r.subject.area,
    );
    let _ = writeln!(out, "    {}", r.report.body);
  }
  out
}

pub fn summary(c: &ModerationCounts) -> String {
  format!(
    "total {}  pending {}  approved {}  rejected {}\n",
    c.total, c.pending, c.approved, c.rejected
  )
}

pub fn outcome(o: &Outcome) -> String {
  let mark = if o.success { "ok" } else { "failed" };
  format!("{mark}: {}\n", o.message)
}
