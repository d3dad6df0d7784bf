//! Filter drawer session
//!
//! Ties the engine to persistence and to the list view that consumes
//! applied filters:
//!
//! 1. `mount` loads the last snapshot of the session and replays it
//! 2. the caller mutates state through `engine_mut`
//! 3. `apply` resolves, persists and hands a copy to the `on_apply` callback
//! 4. `clear_all` resets the engine and deletes the saved snapshot
//!
//! ```
//! use leadfilter::drawer::FilterDrawer;
//! use leadfilter::engine::Selection;
//! use leadfilter::facets::{FacetRegistry, keys};
//! use leadfilter::persistence::{FilterPersistence, MemorySessionStore};
//! use leadfilter::resolver::SystemClock;
//!
//! let registry = FacetRegistry::default();
//! let persistence = FilterPersistence::new(MemorySessionStore::new());
//! let mut drawer = FilterDrawer::mount(&registry, persistence, SystemClock);
//!
//! drawer.engine_mut().select(keys::LEAD_TYPE, Selection::Option("visitor".into()));
//! let applied = drawer.apply();
//! assert_eq!(applied.lead_type, vec!["visitor"]);
//! ```

use crate::engine::FilterEngine;
use crate::facets::FacetRegistry;
use crate::persistence::{FilterPersistence, SessionStore};
use crate::resolver::{Clock, SystemClock};
use crate::snapshot::{self, FilterSnapshot};
use tracing::{info, warn};

/// Callback receiving each applied payload
pub type ApplyCallback<'r> = Box<dyn FnMut(FilterSnapshot) + 'r>;

/// One rendering of the filter drawer
pub struct FilterDrawer<'r, S: SessionStore, C: Clock = SystemClock> {
    engine: FilterEngine<'r>,
    persistence: FilterPersistence<S>,
    clock: C,
    on_apply: Option<ApplyCallback<'r>>,
}

impl<'r, S: SessionStore, C: Clock> FilterDrawer<'r, S, C> {
    /// Mount the drawer, restoring the session's last applied filters
    ///
    /// A missing or malformed snapshot mounts an empty drawer.
    #[must_use]
    pub fn mount(registry: &'r FacetRegistry, persistence: FilterPersistence<S>, clock: C) -> Self {
        let engine = persistence.load().map_or_else(
            || FilterEngine::new(registry),
            |saved| snapshot::restore(&saved, registry),
        );

        Self {
            engine,
            persistence,
            clock,
            on_apply: None,
        }
    }

    /// Register the consumer of applied filters
    #[must_use]
    pub fn on_apply(mut self, callback: impl FnMut(FilterSnapshot) + 'r) -> Self {
        self.on_apply = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub const fn engine(&self) -> &FilterEngine<'r> {
        &self.engine
    }

    pub const fn engine_mut(&mut self) -> &mut FilterEngine<'r> {
        &mut self.engine
    }

    #[must_use]
    pub const fn persistence(&self) -> &FilterPersistence<S> {
        &self.persistence
    }

    /// Payload for the current state, resolved against the drawer's clock
    #[must_use]
    pub fn snapshot(&self) -> FilterSnapshot {
        snapshot::build(&self.engine, &self.clock.now())
    }

    /// Apply the current filters
    ///
    /// Builds the payload, saves it for the session and passes a copy to the
    /// `on_apply` callback. A failed save is logged; the filters still apply.
    pub fn apply(&mut self) -> FilterSnapshot {
        let snapshot = self.snapshot();

        if let Err(e) = self.persistence.save(&snapshot) {
            warn!(error = %e, "could not save applied filters");
        }
        info!(chips = self.engine.all_tags().len(), "filters applied");

        if let Some(callback) = self.on_apply.as_mut() {
            callback(snapshot.clone());
        }
        snapshot
    }

    /// Reset every facet and delete the saved snapshot
    pub fn clear_all(&mut self) {
        self.engine.clear_all();
        if let Err(e) = self.persistence.clear() {
            warn!(error = %e, "could not delete saved filters");
        }
        info!("filters cleared");
    }

    /// Tear the drawer down, returning its persistence
    pub fn into_persistence(self) -> FilterPersistence<S> {
        self.persistence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Selection;
    use crate::facets::keys;
    use crate::persistence::MemorySessionStore;
    use crate::testing::{TempSession, fixed_clock};
    use std::cell::RefCell;

    fn memory() -> FilterPersistence<MemorySessionStore> {
        FilterPersistence::new(MemorySessionStore::new())
    }

    #[test]
    fn test_apply_invokes_callback_with_copy() {
        let registry = FacetRegistry::default();
        let received = RefCell::new(Vec::new());

        let mut drawer = FilterDrawer::mount(&registry, memory(), fixed_clock())
            .on_apply(|snapshot| received.borrow_mut().push(snapshot));
        drawer.engine_mut().select(keys::VISITED_DATE, Selection::Preset("last7Days".into()));

        let applied = drawer.apply();
        drawer.apply();
        drop(drawer);

        let received = received.into_inner();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0], applied);
        assert_eq!(applied.from_date, Some(1_709_856_000));
    }

    #[test]
    fn test_mount_restores_previous_apply() {
        let registry = FacetRegistry::default();
        let mut drawer = FilterDrawer::mount(&registry, memory(), fixed_clock());
        drawer.engine_mut().select(keys::TIME_SPENT, Selection::Option("over_1_min".into()));
        drawer.engine_mut().select(keys::REGION, Selection::Tag("Berlin".into()));
        drawer.apply();
        let expected_tags = drawer.engine().all_tags().into_iter().cloned().collect::<Vec<_>>();

        let persistence = drawer.into_persistence();
        let remounted = FilterDrawer::mount(&registry, persistence, fixed_clock());
        let tags = remounted.engine().all_tags().into_iter().cloned().collect::<Vec<_>>();
        assert_eq!(tags, expected_tags);
    }

    #[test]
    fn test_unapplied_changes_are_not_persisted() {
        let registry = FacetRegistry::default();
        let mut drawer = FilterDrawer::mount(&registry, memory(), fixed_clock());
        drawer.engine_mut().select(keys::LEAD_TYPE, Selection::Option("visitor".into()));

        let remounted = FilterDrawer::mount(&registry, drawer.into_persistence(), fixed_clock());
        assert!(remounted.engine().is_empty());
    }

    #[test]
    fn test_clear_all_removes_saved_state() {
        let registry = FacetRegistry::default();
        let mut drawer = FilterDrawer::mount(&registry, memory(), fixed_clock());
        drawer.engine_mut().select(keys::SEARCH_QUERY, Selection::Text("acme".into()));
        drawer.apply();

        drawer.clear_all();
        assert!(drawer.engine().is_empty());
        assert!(drawer.persistence().load().is_none());

        drawer.clear_all();
        assert!(drawer.engine().is_empty());
    }

    #[test]
    fn test_mount_with_malformed_state_is_empty() {
        let registry = FacetRegistry::default();
        let mut store = MemorySessionStore::new();
        store
            .set(crate::persistence::DEFAULT_STORAGE_KEY, "{not json")
            .unwrap();

        let drawer = FilterDrawer::mount(&registry, FilterPersistence::new(store), fixed_clock());
        assert!(drawer.engine().is_empty());
    }

    #[test]
    fn test_file_session_survives_remount() {
        let session = TempSession::new("drawer");
        let registry = FacetRegistry::new(["acme.com"]);

        let mut drawer = FilterDrawer::mount(&registry, session.persistence(), fixed_clock());
        drawer.engine_mut().select(keys::DOMAIN, Selection::Option("acme.com".into()));
        drawer.engine_mut().select(keys::VISITED_TIME, Selection::Preset("morning".into()));
        let applied = drawer.apply();

        let remounted = FilterDrawer::mount(&registry, session.persistence(), fixed_clock());
        assert_eq!(remounted.snapshot(), applied);
        assert!(session.root().join("drawer").join("lead_filter_state.json").exists());
    }
}
