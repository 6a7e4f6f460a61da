//! Integration tests for `SqliteStore`, driven through `Platform` against an
//! in-memory database.

use std::time::Duration;

use bytes::Bytes;
use chadabaz_core::{
  Error, ErrorKind, Platform,
  aggregate::SubjectFilter,
  invalidate::View,
  media::{MediaNamespace, MediaStore, MediaUpload},
  moderation::Submission,
  report::{NewSubmission, ReportStatus, Verdict},
  store::ReportStore,
  subject::{NewSubject, SocialLinks},
};
use uuid::Uuid;

use crate::SqliteStore;

// ─── Fixtures ────────────────────────────────────────────────────────────────

/// Returns `mem://<namespace>/<file_name>`; fails for names starting `bad`.
struct FakeMedia;

impl MediaStore for FakeMedia {
  type Error = std::io::Error;

  async fn upload(
    &self,
    namespace: MediaNamespace,
    upload: &MediaUpload,
  ) -> Result<String, Self::Error> {
    if upload.file_name.starts_with("bad") {
      return Err(std::io::Error::other("refused"));
    }
    Ok(format!("mem://{namespace}/{}", upload.file_name))
  }
}

async fn platform() -> Platform<SqliteStore, FakeMedia> {
  let store = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  Platform::new(store, FakeMedia)
}

fn file(name: &str) -> MediaUpload {
  MediaUpload {
    file_name:    name.into(),
    content_type: Some("image/jpeg".into()),
    bytes:        Bytes::from_static(b"\xff\xd8\xff"),
  }
}

fn submission(name: &str, area: &str, party: &str) -> Submission {
  Submission {
    name: name.into(),
    area: area.into(),
    party: party.into(),
    body: format!("incident involving {name}"),
    ..Default::default()
  }
}

/// Submit and immediately approve; returns the subject id.
async fn approved(
  p: &Platform<SqliteStore, FakeMedia>,
  name: &str,
  area: &str,
  party: &str,
) -> Uuid {
  let rec = p.submit_report(submission(name, area, party)).await.unwrap();
  p.transition_report_status(rec.report.report_id, Verdict::Approved)
    .await
    .unwrap();
  rec.subject.subject_id
}

/// Keeps `created_at` strictly increasing between writes.
async fn tick() { tokio::time::sleep(Duration::from_millis(2)).await; }

// ─── Intake ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn submission_creates_pending_report_and_hidden_subject() {
  let p = platform().await;
  let rec = p.submit_report(submission("Karim", "Dhaka-10", "Party A")).await.unwrap();

  assert!(rec.subject_created);
  assert!(rec.party_created);
  assert_eq!(rec.report.status, ReportStatus::Pending);
  assert!(!rec.subject.visible);
  assert_eq!(rec.subject.party, "Party A");

  // Pending reports are invisible to every public view.
  assert!(p.list_visible_subjects().await.unwrap().is_empty());
  assert!(p.compute_party_statistics().await.unwrap().is_empty());
}

#[tokio::test]
async fn same_name_and_area_resolve_to_one_subject() {
  let p = platform().await;
  let first = p.submit_report(submission("Karim", "Dhaka-10", "Party A")).await.unwrap();
  let second = p.submit_report(submission("Karim", "Dhaka-10", "Party A")).await.unwrap();

  assert_eq!(first.subject.subject_id, second.subject.subject_id);
  assert!(!second.subject_created);
  assert!(!second.party_created);
  assert_ne!(first.report.report_id, second.report.report_id);

  let parties = p.list_parties().await.unwrap();
  assert_eq!(parties.len(), 1);
  assert_eq!(parties[0].total_reports, 2);
}

#[tokio::test]
async fn different_area_is_a_different_subject() {
  let p = platform().await;
  let a = p.submit_report(submission("Karim", "Dhaka-10", "Party A")).await.unwrap();
  let b = p.submit_report(submission("Karim", "Khulna-2", "Party A")).await.unwrap();
  assert_ne!(a.subject.subject_id, b.subject.subject_id);
}

#[tokio::test]
async fn whitespace_is_trimmed_before_resolution() {
  let p = platform().await;
  let a = p.submit_report(submission("Karim", "Dhaka-10", "Party A")).await.unwrap();
  let b = p
    .submit_report(submission("  Karim ", " Dhaka-10", "Party A  "))
    .await
    .unwrap();
  assert_eq!(a.subject.subject_id, b.subject.subject_id);
}

#[tokio::test]
async fn existing_subject_attributes_are_not_overwritten() {
  let p = platform().await;

  let mut first = submission("Karim", "Dhaka-10", "Party A");
  first.description = Some("original".into());
  first.profile_image = Some(file("face.jpg"));
  let first = p.submit_report(first).await.unwrap();
  assert_eq!(first.subject.image_url.as_deref(), Some("mem://profiles/face.jpg"));

  let mut second = submission("Karim", "Dhaka-10", "Party B");
  second.description = Some("replacement".into());
  second.profile_image = Some(file("other.jpg"));
  let second = p.submit_report(second).await.unwrap();

  assert_eq!(second.subject.description.as_deref(), Some("original"));
  assert_eq!(second.subject.image_url.as_deref(), Some("mem://profiles/face.jpg"));
  assert_eq!(second.subject.party, "Party A");
  // The new party is still registered.
  assert!(second.party_created);
  assert_eq!(p.list_parties().await.unwrap().len(), 2);
}

#[tokio::test]
async fn blank_body_creates_nothing() {
  let p = platform().await;
  let mut sub = submission("Karim", "Dhaka-10", "Party A");
  sub.body = "   ".into();

  let err = p.submit_report(sub).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);
  assert_eq!(err.to_string(), "Report description is required.");

  assert!(p.list_parties().await.unwrap().is_empty());
  assert!(p.list_reports(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_identity_fields_are_rejected() {
  let p = platform().await;
  let err = p
    .submit_report(submission("Karim", "", "Party A"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
  assert!(p.list_parties().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_uploads_are_skipped_in_order() {
  let p = platform().await;
  let mut sub = submission("Karim", "Dhaka-10", "Party A");
  sub.media = vec![file("one.jpg"), file("bad.jpg"), file("three.mp4")];

  let rec = p.submit_report(sub).await.unwrap();
  assert_eq!(rec.report.media, vec![
    "mem://reports/one.jpg".to_owned(),
    "mem://reports/three.mp4".to_owned(),
  ]);
}

#[tokio::test]
async fn social_links_round_trip() {
  let p = platform().await;
  let mut social = SocialLinks::default();
  social.set("facebook", "https://facebook.com/karim");
  social.set("tiktok", "https://tiktok.com/@karim");
  let mut sub = submission("Karim", "Dhaka-10", "Party A");
  sub.social = social.clone();
  sub.submitter = Some("witness".into());

  let rec = p.submit_report(sub).await.unwrap();
  let profile = p.get_subject_profile(rec.subject.subject_id).await.unwrap();
  assert_eq!(profile.subject.social, social);
  assert_eq!(rec.report.submitter.as_deref(), Some("witness"));
}

// ─── Moderation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn approval_makes_subject_visible() {
  let p = platform().await;
  let id = approved(&p, "Karim", "Dhaka-10", "Party A").await;

  let listed = p.list_visible_subjects().await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].subject.subject_id, id);
  assert_eq!(listed[0].report_count, 1);
  assert!(listed[0].subject.visible);
}

#[tokio::test]
async fn approving_twice_is_idempotent() {
  let p = platform().await;
  let rec = p.submit_report(submission("Karim", "Dhaka-10", "Party A")).await.unwrap();
  let id = rec.report.report_id;

  p.transition_report_status(id, Verdict::Approved).await.unwrap();
  let again = p.transition_report_status(id, Verdict::Approved).await.unwrap();
  assert_eq!(again.status, ReportStatus::Approved);

  let listed = p.list_visible_subjects().await.unwrap();
  assert_eq!(listed[0].report_count, 1);
}

#[tokio::test]
async fn rejecting_an_approved_report_keeps_subject_flagged() {
  let p = platform().await;
  let rec = p.submit_report(submission("Karim", "Dhaka-10", "Party A")).await.unwrap();
  let report_id = rec.report.report_id;
  let subject_id = rec.subject.subject_id;

  p.transition_report_status(report_id, Verdict::Approved).await.unwrap();
  p.transition_report_status(report_id, Verdict::Rejected).await.unwrap();

  // Drops out of the listing, but the flag sticks.
  assert!(p.list_visible_subjects().await.unwrap().is_empty());
  let profile = p.get_subject_profile(subject_id).await.unwrap();
  assert!(profile.subject.visible);
  assert!(profile.reports.is_empty());
}

#[tokio::test]
async fn deleting_an_approved_report_keeps_subject_flagged() {
  let p = platform().await;
  let rec = p.submit_report(submission("Karim", "Dhaka-10", "Party A")).await.unwrap();
  p.transition_report_status(rec.report.report_id, Verdict::Approved)
    .await
    .unwrap();

  let deleted = p.delete_report(rec.report.report_id).await.unwrap();
  assert_eq!(deleted.report_id, rec.report.report_id);

  assert!(p.list_reports(None).await.unwrap().is_empty());
  let profile = p.get_subject_profile(rec.subject.subject_id).await.unwrap();
  assert!(profile.subject.visible);
}

#[tokio::test]
async fn approving_sets_visibility_in_the_same_write() {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let rec = store
    .record_submission(NewSubmission {
      party:     "Party A".into(),
      subject:   NewSubject {
        name:        "Karim".into(),
        area:        "Dhaka-10".into(),
        image_url:   None,
        description: None,
        social:      SocialLinks::default(),
      },
      body:      "seen at the rally".into(),
      media:     vec![],
      submitter: None,
    })
    .await
    .unwrap();
  let subject_id = rec.subject.subject_id;

  store
    .set_report_status(rec.report.report_id, ReportStatus::Rejected)
    .await
    .unwrap();
  assert!(!store.get_subject(subject_id).await.unwrap().unwrap().visible);

  let report = store
    .set_report_status(rec.report.report_id, ReportStatus::Approved)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(report.status, ReportStatus::Approved);
  assert!(store.get_subject(subject_id).await.unwrap().unwrap().visible);
}

#[tokio::test]
async fn unknown_report_is_not_found() {
  let p = platform().await;
  let missing = Uuid::new_v4();

  let err = p
    .transition_report_status(missing, Verdict::Approved)
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);

  let err = p.delete_report(missing).await.unwrap_err();
  assert!(matches!(err, Error::ReportNotFound(id) if id == missing));
}

#[tokio::test]
async fn list_reports_filters_by_status_newest_first() {
  let p = platform().await;
  let a = p.submit_report(submission("A", "X", "P")).await.unwrap();
  tick().await;
  let b = p.submit_report(submission("B", "X", "P")).await.unwrap();
  tick().await;
  let c = p.submit_report(submission("C", "X", "P")).await.unwrap();
  p.transition_report_status(b.report.report_id, Verdict::Rejected)
    .await
    .unwrap();

  let all = p.list_reports(None).await.unwrap();
  let ids: Vec<_> = all.iter().map(|r| r.report.report_id).collect();
  assert_eq!(ids, vec![c.report.report_id, b.report.report_id, a.report.report_id]);
  assert_eq!(all[0].subject.name, "C");

  let pending = p.list_reports(Some(ReportStatus::Pending)).await.unwrap();
  assert_eq!(pending.len(), 2);
  assert!(pending.iter().all(|r| r.report.status == ReportStatus::Pending));

  let summary = p.moderation_summary().await.unwrap();
  assert_eq!((summary.total, summary.pending, summary.rejected), (3, 2, 1));
}

// ─── Read views ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_lists_only_approved_reports_newest_first() {
  let p = platform().await;
  let first = p.submit_report(submission("Karim", "Dhaka-10", "Party A")).await.unwrap();
  tick().await;
  let second = p.submit_report(submission("Karim", "Dhaka-10", "Party A")).await.unwrap();
  tick().await;
  p.submit_report(submission("Karim", "Dhaka-10", "Party A")).await.unwrap();

  p.transition_report_status(first.report.report_id, Verdict::Approved)
    .await
    .unwrap();
  p.transition_report_status(second.report.report_id, Verdict::Approved)
    .await
    .unwrap();

  let profile = p.get_subject_profile(first.subject.subject_id).await.unwrap();
  let ids: Vec<_> = profile.reports.iter().map(|r| r.report_id).collect();
  assert_eq!(ids, vec![second.report.report_id, first.report.report_id]);
}

#[tokio::test]
async fn profile_of_hidden_subject_is_empty_not_missing() {
  let p = platform().await;
  let rec = p.submit_report(submission("Karim", "Dhaka-10", "Party A")).await.unwrap();

  let profile = p.get_subject_profile(rec.subject.subject_id).await.unwrap();
  assert!(!profile.subject.visible);
  assert!(profile.reports.is_empty());

  let err = p.get_subject_profile(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::SubjectNotFound(_)));
}

#[tokio::test]
async fn party_statistics_count_approved_reports_and_members() {
  let p = platform().await;
  approved(&p, "A1", "X", "Party A").await;
  approved(&p, "A1", "X", "Party A").await;
  approved(&p, "A2", "Y", "Party A").await;
  approved(&p, "B1", "Z", "Party B").await;
  // Pending; never counted.
  p.submit_report(submission("B2", "Z", "Party B")).await.unwrap();

  let stats = p.compute_party_statistics().await.unwrap();
  assert_eq!(stats.len(), 2);
  assert_eq!(stats[0].party, "Party A");
  assert_eq!((stats[0].total_reports, stats[0].member_count), (3, 2));
  assert_eq!(stats[0].average_reports, Some(1.5));
  assert_eq!((stats[1].total_reports, stats[1].member_count), (1, 1));

  // The denormalised counter includes pending reports.
  let parties = p.list_parties().await.unwrap();
  let b = parties.iter().find(|x| x.name == "Party B").unwrap();
  assert_eq!(b.total_reports, 2);
}

#[tokio::test]
async fn search_filters_by_text_and_party() {
  let p = platform().await;
  approved(&p, "Karim Uddin", "Dhaka-10", "Party A").await;
  approved(&p, "Rahim", "Khulna-2", "Party B").await;

  let hits = p.search_subjects(&SubjectFilter::new("KARIM", None)).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].subject.name, "Karim Uddin");

  let by_area = p.search_subjects(&SubjectFilter::new("khulna", None)).await.unwrap();
  assert_eq!(by_area[0].subject.name, "Rahim");

  let by_party = p
    .search_subjects(&SubjectFilter::new("", Some("Party A")))
    .await
    .unwrap();
  assert_eq!(by_party.len(), 1);

  let all = p.search_subjects(&SubjectFilter::new("", Some("all"))).await.unwrap();
  assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn listing_ranks_by_approved_count() {
  let p = platform().await;
  approved(&p, "Low", "X", "P").await;
  tick().await;
  let high = approved(&p, "High", "Y", "P").await;
  approved(&p, "High", "Y", "P").await;

  let listed = p.list_visible_subjects().await.unwrap();
  assert_eq!(listed[0].subject.subject_id, high);
  assert_eq!(listed[0].report_count, 2);
  assert_eq!(listed[1].report_count, 1);
}

// ─── Platform plumbing ───────────────────────────────────────────────────────

#[tokio::test]
async fn unconfigured_platform_is_unavailable() {
  let p: Platform<SqliteStore, FakeMedia> = Platform::without_store(FakeMedia);
  assert!(!p.is_configured());

  let err = p.list_visible_subjects().await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Unavailable);
  let err = p
    .submit_report(submission("Karim", "Dhaka-10", "Party A"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Unavailable));
}

#[tokio::test]
async fn mutations_publish_invalidations() {
  let p = platform().await;
  let mut rx = p.subscribe();

  let rec = p.submit_report(submission("Karim", "Dhaka-10", "Party A")).await.unwrap();
  let event = rx.recv().await.unwrap();
  assert!(event.touches(View::Home));
  assert!(event.touches(View::Profile(rec.subject.subject_id)));
  assert!(!event.touches(View::PartyStatistics));

  p.transition_report_status(rec.report.report_id, Verdict::Approved)
    .await
    .unwrap();
  let event = rx.recv().await.unwrap();
  assert!(event.touches(View::PartyStatistics));
  assert!(event.touches(View::Dashboard));
}

#[tokio::test]
async fn file_backed_store_persists_across_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("chadabaz.db");

  let subject_id = {
    let p = Platform::new(SqliteStore::open(&path).await.unwrap(), FakeMedia);
    approved(&p, "Karim", "Dhaka-10", "Party A").await
  };

  let p = Platform::new(SqliteStore::open(&path).await.unwrap(), FakeMedia);
  let listed = p.list_visible_subjects().await.unwrap();
  assert_eq!(listed[0].subject.subject_id, subject_id);
}
