//! The gallery controller: owned state, wired end to end.
//!
//! `Gallery` holds the record store, search index, debounce controller,
//! visibility scheduler and render coordinator as explicitly owned state --
//! constructed once at startup, no ambient globals. It implements the
//! interaction protocol:
//!
//! 1. Search-box input -> debounce controller (300 ms quiet period)
//! 2. On fire: empty text -> show all cells with a full re-flow; otherwise
//!    query the index and toggle cells to the matching set
//! 3. Viewport notifications -> visibility scheduler -> one-shot source
//!    assignment on the triggered cells
//! 4. Cell activation -> detail view with the full record
//!
//! Everything runs on one logical thread; "concurrency" is the
//! interleaving of input events, viewport notifications and the debounce
//! timer, so no locking is needed anywhere.

use crate::debounce::Debouncer;
use crate::index::SearchIndex;
use crate::render::{CellFactory, DetailView, LayoutEngine, RenderCoordinator};
use crate::store::RecordStore;
use crate::types::ImageId;
use crate::visibility::{Rect, VisibilityScheduler};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// One page-load's worth of gallery state.
pub struct Gallery {
    store: RecordStore,
    index: SearchIndex,
    debouncer: Debouncer<String>,
    scheduler: VisibilityScheduler,
    coordinator: RenderCoordinator,
    detail: Box<dyn DetailView>,

    /// Text of the last filter pass that ran, `None` when no query is
    /// active.
    active_query: Option<String>,
}

impl Gallery {
    /// Construct the gallery from a loaded store.
    ///
    /// The index is built here, before any input can arrive, so it is never
    /// queried before the store's load completed.
    pub fn new(
        store: RecordStore,
        layout: Box<dyn LayoutEngine>,
        detail: Box<dyn DetailView>,
    ) -> Self {
        let index = SearchIndex::build(&store);

        info!(records = store.len(), "Gallery constructed");

        Gallery {
            store,
            index,
            debouncer: Debouncer::new(),
            scheduler: VisibilityScheduler::new(),
            coordinator: RenderCoordinator::new(layout),
            detail,
            active_query: None,
        }
    }

    /// Override the debounce quiet period (configuration hook).
    pub fn set_quiet_period(&mut self, quiet: Duration) {
        self.debouncer = Debouncer::with_quiet_period(quiet);
    }

    /// Override the visibility thresholds (configuration hook).
    pub fn set_visibility_thresholds(&mut self, margin: f32, min_ratio: f32) {
        self.scheduler = VisibilityScheduler::with_thresholds(margin, min_ratio);
    }

    /// Materialize one cell per record and run the initial layout.
    pub fn render_all(&mut self, factory: &mut dyn CellFactory) {
        self.coordinator
            .render_all(&self.store, factory, &mut self.scheduler);
    }

    /// A search-box input event carrying the full current text.
    ///
    /// Nothing filters yet; the debouncer arms (or re-arms) its timer with
    /// this latest value.
    pub fn on_input(&mut self, text: &str, now: Instant) {
        self.debouncer.submit(text.to_string(), now);
    }

    /// Drive the debounce timer. Returns true if a filter pass ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(text) = self.debouncer.poll(now) else {
            return false;
        };

        if text.is_empty() {
            // empty query is owned here, never passed to the index
            debug!("Query cleared, showing all cells");
            self.coordinator.apply_filter(None);
            self.active_query = None;
        } else {
            let matches = self.index.query(&text);
            debug!(query = %text, matches = matches.len(), "Debounced filter fired");
            self.coordinator.apply_filter(Some(&matches));
            self.active_query = Some(text);
        }
        true
    }

    /// Deliver a viewport notification batch.
    ///
    /// Placements come from the layout engine, so only in-flow cells are
    /// considered. Returns the number of placeholders that fired.
    pub fn observe_viewport(&mut self, viewport: &Rect) -> usize {
        let placements = self.coordinator.placements();
        let triggers = self.scheduler.observe(viewport, &placements);

        for trigger in &triggers {
            // assignment precedes the load it causes
            self.coordinator.assign_source(trigger);
        }

        triggers.len()
    }

    /// A cell was activated (clicked): open the detail view with its full
    /// record.
    pub fn activate(&mut self, id: ImageId) {
        if let Some(record) = self.store.get(id) {
            self.detail.open(record);
        }
    }

    /// The currently active query text, if any.
    pub fn active_query(&self) -> Option<&str> {
        self.active_query.as_deref()
    }

    /// Whether a debounced filter is still waiting to fire.
    pub fn filter_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn coordinator(&self) -> &RenderCoordinator {
        &self.coordinator
    }
}
