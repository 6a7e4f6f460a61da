//! View-invalidation events published after every mutation.
//!
//! Nothing is cached yet; subscribers get explicit keys instead of a blanket
//! "refresh everything" signal.

use uuid::Uuid;

/// A read model whose contents may have changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
  /// The ranked subject listing.
  Home,
  Search,
  PartyStatistics,
  /// Admin report listing and moderation summary.
  Dashboard,
  Profile(Uuid),
}

/// The set of views made stale by one mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalidation {
  pub views: Vec<View>,
}

impl Invalidation {
  /// Views refreshed after a new submission. The report is pending, so party
  /// statistics cannot change.
  pub fn submission(subject_id: Uuid) -> Self {
    Self {
      views: vec![View::Home, View::Search, View::Dashboard, View::Profile(subject_id)],
    }
  }

  /// A status change or deletion: every public listing plus the dashboard.
  pub fn moderation(subject_id: Uuid) -> Self {
    Self {
      views: vec![
        View::Home,
        View::Search,
        View::PartyStatistics,
        View::Dashboard,
        View::Profile(subject_id),
      ],
    }
  }

  pub fn touches(&self, view: View) -> bool { self.views.contains(&view) }
}
