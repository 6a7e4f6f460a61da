//! Read-side operations: the public listing, search, party rollups, and
//! profiles. None of these write to the store.

use uuid::Uuid;

use crate::{
  Error, Result,
  aggregate::{self, SubjectFilter},
  media::MediaStore,
  party::{Party, PartyStatistics},
  platform::Platform,
  store::ReportStore,
  subject::{SubjectProfile, SubjectSummary},
};

impl<S, M> Platform<S, M>
where
  S: ReportStore,
  M: MediaStore,
{
  /// Subjects with at least one approved report, ranked by approved-report
  /// count and then by newest creation.
  pub async fn list_visible_subjects(&self) -> Result<Vec<SubjectSummary>> {
    self.search_subjects(&SubjectFilter::default()).await
  }

  /// Same contract as [`Self::list_visible_subjects`], restricted to subjects
  /// matching `filter`.
  pub async fn search_subjects(
    &self,
    filter: &SubjectFilter,
  ) -> Result<Vec<SubjectSummary>> {
    let rows = self.store()?.approved_rows().await.map_err(Error::store)?;
    Ok(aggregate::rank_subjects(rows, filter))
  }

  /// Approved-report totals and distinct-subject counts per party.
  pub async fn compute_party_statistics(&self) -> Result<Vec<PartyStatistics>> {
    let rows = self.store()?.approved_rows().await.map_err(Error::store)?;
    Ok(aggregate::party_statistics(rows))
  }

  /// A subject and its approved reports, newest first.
  ///
  /// Works for subjects that are not yet visible; their report list is empty.
  pub async fn get_subject_profile(&self, subject_id: Uuid) -> Result<SubjectProfile> {
    let store = self.store()?;
    let subject = store
      .get_subject(subject_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::SubjectNotFound(subject_id))?;
    let reports = store
      .approved_reports(subject_id)
      .await
      .map_err(Error::store)?;
    Ok(SubjectProfile { subject, reports })
  }

  /// Every known party, for the search filter.
  pub async fn list_parties(&self) -> Result<Vec<Party>> {
    self.store()?.list_parties().await.map_err(Error::store)
  }
}
