//! [`Platform`] — the service that every public operation runs through.
//!
//! Read operations live in [`crate::views`]; write operations in
//! [`crate::moderation`].

use tokio::sync::broadcast;

use crate::{
  Error, Result,
  invalidate::Invalidation,
  media::MediaStore,
  store::ReportStore,
};

const INVALIDATION_CAPACITY: usize = 64;

/// Binds a [`ReportStore`] and a [`MediaStore`] together.
///
/// The store is optional: a platform built with [`Platform::without_store`]
/// answers every operation with [`Error::Unavailable`].
pub struct Platform<S, M> {
  store:         Option<S>,
  media:         M,
  invalidations: broadcast::Sender<Invalidation>,
}

impl<S, M> Platform<S, M>
where
  S: ReportStore,
  M: MediaStore,
{
  pub fn new(store: S, media: M) -> Self { Self::build(Some(store), media) }

  /// A platform with no backing store configured.
  pub fn without_store(media: M) -> Self { Self::build(None, media) }

  fn build(store: Option<S>, media: M) -> Self {
    let (invalidations, _) = broadcast::channel(INVALIDATION_CAPACITY);
    Self { store, media, invalidations }
  }

  pub fn is_configured(&self) -> bool { self.store.is_some() }

  /// Receive an [`Invalidation`] after every successful mutation.
  pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
    self.invalidations.subscribe()
  }

  pub(crate) fn store(&self) -> Result<&S> {
    self.store.as_ref().ok_or(Error::Unavailable)
  }

  pub(crate) fn media(&self) -> &M { &self.media }

  pub(crate) fn invalidate(&self, event: Invalidation) {
    tracing::debug!(views = ?event.views, "invalidating views");
    // No subscribers is not an error.
    let _ = self.invalidations.send(event);
  }
}
