//! [`SqliteStore`] — the SQLite implementation of [`ReportStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use chadabaz_core::{
  party::Party,
  report::{AdminReport, NewSubmission, RecordedSubmission, Report, ReportStatus},
  store::{ApprovedRow, ReportStore},
  subject::Subject,
};

use crate::{
  Result,
  encode::{
    REPORT_COLUMNS, RawParty, RawReport, RawSubject, SUBJECT_COLUMNS, SUBJECT_WIDTH,
    decode_uuid, encode_dt, encode_media, encode_social, encode_status, encode_uuid,
  },
  schema::SCHEMA,
};

/// `SELECT` over `subjects s ⋈ parties p` followed by `tail`.
fn subject_select(tail: &str) -> String {
  format!(
    "SELECT {SUBJECT_COLUMNS}
     FROM subjects s
     JOIN parties p ON p.party_id = s.party_id
     {tail}"
  )
}

/// `SELECT` over `reports r` followed by `tail`.
fn report_select(tail: &str) -> String {
  format!("SELECT {REPORT_COLUMNS} FROM reports r {tail}")
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A report store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "opening sqlite store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single-subject query with one text parameter list.
  async fn query_subject(
    &self,
    tail: &'static str,
    params: Vec<String>,
  ) -> Result<Option<Subject>> {
    let sql = subject_select(tail);
    let raw: Option<RawSubject> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(params), |row| {
              RawSubject::from_row(row, 0)
            })
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSubject::into_subject).transpose()
  }
}

// ─── ReportStore impl ────────────────────────────────────────────────────────

impl ReportStore for SqliteStore {
  type Error = crate::Error;

  // ── Intake ────────────────────────────────────────────────────────────────

  async fn find_subject(&self, name: &str, area: &str) -> Result<Option<Subject>> {
    self
      .query_subject("WHERE s.name = ?1 AND s.area = ?2", vec![
        name.to_owned(),
        area.to_owned(),
      ])
      .await
  }

  async fn record_submission(&self, input: NewSubmission) -> Result<RecordedSubmission> {
    let now            = encode_dt(Utc::now());
    let new_party_id   = encode_uuid(Uuid::new_v4());
    let new_subject_id = encode_uuid(Uuid::new_v4());
    let report_id      = encode_uuid(Uuid::new_v4());
    let social_json    = encode_social(&input.subject.social)?;
    let media_json     = encode_media(&input.media)?;
    let pending        = encode_status(ReportStatus::Pending);
    let subject_sql    = subject_select("WHERE s.name = ?1 AND s.area = ?2");
    let report_sql     = report_select("WHERE r.report_id = ?1");

    let NewSubmission { party, subject, body, submitter, .. } = input;

    let (raw_subject, raw_report, subject_created, party_created) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let party_created = tx.execute(
          "INSERT INTO parties (party_id, name, total_reports, created_at, updated_at)
           VALUES (?1, ?2, 0, ?3, ?3)
           ON CONFLICT (name) DO NOTHING",
          rusqlite::params![new_party_id, party, now],
        )? == 1;

        let party_id: String = tx.query_row(
          "SELECT party_id FROM parties WHERE name = ?1",
          rusqlite::params![party],
          |r| r.get(0),
        )?;

        // Existing subjects keep their original attributes and party.
        let subject_created = tx.execute(
          "INSERT INTO subjects (
             subject_id, name, area, party_id, image_url, description,
             social_json, visible, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?8)
           ON CONFLICT (name, area) DO NOTHING",
          rusqlite::params![
            new_subject_id,
            subject.name,
            subject.area,
            party_id,
            subject.image_url,
            subject.description,
            social_json,
            now,
          ],
        )? == 1;

        let raw_subject = tx.query_row(
          &subject_sql,
          rusqlite::params![subject.name, subject.area],
          |row| RawSubject::from_row(row, 0),
        )?;

        tx.execute(
          "INSERT INTO reports (
             report_id, subject_id, body, media_json, status, submitter,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
          rusqlite::params![
            report_id,
            raw_subject.subject_id,
            body,
            media_json,
            pending,
            submitter,
            now,
          ],
        )?;

        tx.execute(
          "UPDATE parties
           SET total_reports = total_reports + 1, updated_at = ?2
           WHERE party_id = ?1",
          rusqlite::params![raw_subject.party_id, now],
        )?;

        let raw_report = tx.query_row(
          &report_sql,
          rusqlite::params![report_id],
          |row| RawReport::from_row(row, 0),
        )?;

        tx.commit()?;
        Ok((raw_subject, raw_report, subject_created, party_created))
      })
      .await?;

    Ok(RecordedSubmission {
      subject: raw_subject.into_subject()?,
      report: raw_report.into_report()?,
      subject_created,
      party_created,
    })
  }

  // ── Subjects and parties ──────────────────────────────────────────────────

  async fn get_subject(&self, id: Uuid) -> Result<Option<Subject>> {
    self
      .query_subject("WHERE s.subject_id = ?1", vec![encode_uuid(id)])
      .await
  }

  async fn list_parties(&self) -> Result<Vec<Party>> {
    let raws: Vec<RawParty> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT party_id, name, total_reports, created_at, updated_at
           FROM parties ORDER BY name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawParty {
              party_id:      row.get(0)?,
              name:          row.get(1)?,
              total_reports: row.get(2)?,
              created_at:    row.get(3)?,
              updated_at:    row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawParty::into_party).collect()
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  async fn approved_rows(&self) -> Result<Vec<ApprovedRow>> {
    let approved = encode_status(ReportStatus::Approved);
    let sql = format!(
      "SELECT r.report_id, {SUBJECT_COLUMNS}
       FROM reports r
       JOIN subjects s ON s.subject_id = r.subject_id
       JOIN parties  p ON p.party_id   = s.party_id
       WHERE r.status = ?1
       ORDER BY r.created_at"
    );

    let raws: Vec<(String, RawSubject)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![approved], |row| {
            Ok((row.get(0)?, RawSubject::from_row(row, 1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(report_id, raw)| {
        Ok(ApprovedRow {
          report_id: decode_uuid(&report_id)?,
          subject:   raw.into_subject()?,
        })
      })
      .collect()
  }

  async fn approved_reports(&self, subject_id: Uuid) -> Result<Vec<Report>> {
    let id_str   = encode_uuid(subject_id);
    let approved = encode_status(ReportStatus::Approved);
    let sql      = report_select(
      "WHERE r.subject_id = ?1 AND r.status = ?2 ORDER BY r.created_at DESC",
    );

    let raws: Vec<RawReport> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![id_str, approved], |row| {
            RawReport::from_row(row, 0)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReport::into_report).collect()
  }

  async fn set_report_status(
    &self,
    id:     Uuid,
    status: ReportStatus,
  ) -> Result<Option<Report>> {
    let id_str     = encode_uuid(id);
    let status_str = encode_status(status);
    let approving  = status == ReportStatus::Approved;
    let now        = encode_dt(Utc::now());
    let sql        = report_select("WHERE r.report_id = ?1");

    let raw: Option<RawReport> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE reports SET status = ?2, updated_at = ?3 WHERE report_id = ?1",
          rusqlite::params![id_str, status_str, now],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let raw = tx.query_row(&sql, rusqlite::params![id_str], |row| {
          RawReport::from_row(row, 0)
        })?;
        if approving {
          tx.execute(
            "UPDATE subjects SET visible = 1, updated_at = ?2
             WHERE subject_id = ?1 AND visible = 0",
            rusqlite::params![raw.subject_id, now],
          )?;
        }
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawReport::into_report).transpose()
  }

  async fn delete_report(&self, id: Uuid) -> Result<Option<Report>> {
    let id_str = encode_uuid(id);
    let sql    = report_select("WHERE r.report_id = ?1");

    let raw: Option<RawReport> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = tx
          .query_row(&sql, rusqlite::params![id_str], |row| {
            RawReport::from_row(row, 0)
          })
          .optional()?;
        if raw.is_some() {
          tx.execute(
            "DELETE FROM reports WHERE report_id = ?1",
            rusqlite::params![id_str],
          )?;
        }
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawReport::into_report).transpose()
  }

  async fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<AdminReport>> {
    let status_str = status.map(encode_status);
    let sql = format!(
      "SELECT {SUBJECT_COLUMNS}, {REPORT_COLUMNS}
       FROM reports r
       JOIN subjects s ON s.subject_id = r.subject_id
       JOIN parties  p ON p.party_id   = s.party_id
       WHERE (?1 IS NULL OR r.status = ?1)
       ORDER BY r.created_at DESC"
    );

    let raws: Vec<(RawSubject, RawReport)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![status_str], |row| {
            Ok((
              RawSubject::from_row(row, 0)?,
              RawReport::from_row(row, SUBJECT_WIDTH)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(subject, report)| {
        Ok(AdminReport {
          report:  report.into_report()?,
          subject: subject.into_subject()?,
        })
      })
      .collect()
  }
}
