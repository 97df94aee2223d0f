//! Render coordination: records to cells, filters to visibility toggles.
//!
//! This module defines the abstract interfaces the gallery renders through.
//! The core pipeline interacts only with these traits, so the same logic
//! drives a terminal grid, a test double, or any other surface.
//!
//! ## Implementing a New Surface
//!
//! 1. Implement `Cell` for your rendered grid cell and `CellFactory` to
//!    mint one per record
//! 2. Implement `LayoutEngine` over your layout system; `layout` is the
//!    full pass, `relayout` the lighter pass over the current item set
//! 3. Implement `DetailView` for whatever opens when a cell is activated

use crate::store::RecordStore;
use crate::types::{ImageId, ImageRecord};
use crate::visibility::{Placement, Trigger, VisibilityScheduler};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// One rendered grid cell.
///
/// Cells are created once per record and toggled by filter passes; they are
/// never destroyed and recreated. A hidden cell leaves visual flow but
/// keeps its state, including an already-assigned source.
pub trait Cell {
    /// Show or hide the cell (hidden cells leave layout flow).
    fn set_visible(&mut self, visible: bool);

    /// Whether the cell is currently shown.
    fn is_visible(&self) -> bool;

    /// Assign the real resource locator, which starts the load.
    fn assign_source(&mut self, source: &str);

    /// The assigned resource locator, `None` while still a placeholder.
    fn source(&self) -> Option<&str>;
}

/// Mints a cell for a record. Implemented once per surface, instantiated
/// per record.
pub trait CellFactory {
    fn create_cell(&mut self, record: &ImageRecord) -> Box<dyn Cell>;
}

/// Sizing hints handed to the layout engine for one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutItem {
    pub id: ImageId,
    pub width: u32,
    pub height: u32,
}

/// The external layout engine boundary.
///
/// Both operations are fire-and-forget from the coordinator's perspective;
/// `placements` exposes the resulting geometry for visibility observation
/// and drawing.
pub trait LayoutEngine {
    /// Full layout pass over the complete item set. Used after a fresh
    /// render and after clearing a filter, since previously-hidden cells
    /// re-enter flow.
    fn layout(&mut self, items: &[LayoutItem]);

    /// Lighter re-flow of the current item set restricted to the visible
    /// ids, without rebuilding internal bookkeeping.
    fn relayout(&mut self, visible: &[ImageId]);

    /// Geometry of the items currently in flow.
    fn placements(&self) -> Vec<Placement>;
}

/// The detail-view boundary: receives one full record when a cell is
/// activated.
pub trait DetailView {
    fn open(&mut self, record: &ImageRecord);
}

/// Owns the record-to-cell mapping and orchestrates full re-render versus
/// incremental filter toggles.
pub struct RenderCoordinator {
    /// Cell creation order equals input record order; filtering never
    /// reorders, it only toggles.
    order: Vec<ImageId>,

    /// Sizing hints in the same order, kept for full layout passes.
    items: Vec<LayoutItem>,

    cells: HashMap<ImageId, Box<dyn Cell>>,

    layout: Box<dyn LayoutEngine>,
}

impl RenderCoordinator {
    pub fn new(layout: Box<dyn LayoutEngine>) -> Self {
        RenderCoordinator {
            order: Vec::new(),
            items: Vec::new(),
            cells: HashMap::new(),
            layout,
        }
    }

    /// Number of rendered cells.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether anything has been rendered yet.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Clear any previous rendering, create one cell per record in input
    /// order, register each placeholder with the visibility scheduler, and
    /// run a full layout pass.
    pub fn render_all(
        &mut self,
        store: &RecordStore,
        factory: &mut dyn CellFactory,
        scheduler: &mut VisibilityScheduler,
    ) {
        self.order.clear();
        self.items.clear();
        self.cells.clear();
        scheduler.clear();

        for record in store.iter() {
            let cell = factory.create_cell(record);
            scheduler.watch(record.id, record.path.clone());

            self.order.push(record.id);
            self.items.push(LayoutItem {
                id: record.id,
                width: record.width,
                height: record.height,
            });
            self.cells.insert(record.id, cell);
        }

        self.layout.layout(&self.items);

        info!(cells = self.order.len(), "Gallery rendered");
    }

    /// Apply a filter pass.
    ///
    /// `None` means "no active query": every cell is shown and the layout
    /// engine does a full re-flow, since hidden cells re-enter flow.
    /// `Some(ids)` shows exactly the matching cells and hides the rest,
    /// then asks for a lighter re-layout of the current item set.
    pub fn apply_filter(&mut self, matching: Option<&HashSet<ImageId>>) {
        match matching {
            None => {
                for cell in self.cells.values_mut() {
                    cell.set_visible(true);
                }
                self.layout.layout(&self.items);
                debug!(cells = self.order.len(), "Filter cleared, full re-flow");
            }
            Some(ids) => {
                for (id, cell) in self.cells.iter_mut() {
                    cell.set_visible(ids.contains(id));
                }
                let visible = self.visible_ids();
                debug!(visible = visible.len(), "Filter applied");
                self.layout.relayout(&visible);
            }
        }
    }

    /// IDs of currently visible cells, in render order.
    pub fn visible_ids(&self) -> Vec<ImageId> {
        self.order
            .iter()
            .filter(|id| {
                self.cells
                    .get(id)
                    .map(|cell| cell.is_visible())
                    .unwrap_or(false)
            })
            .copied()
            .collect()
    }

    /// Borrow a cell by record ID.
    pub fn cell(&self, id: ImageId) -> Option<&dyn Cell> {
        self.cells.get(&id).map(|boxed| boxed.as_ref())
    }

    /// Hand a fired visibility trigger to its cell: the source assignment
    /// is what starts the load.
    pub fn assign_source(&mut self, trigger: &Trigger) {
        if let Some(cell) = self.cells.get_mut(&trigger.id) {
            cell.assign_source(&trigger.source);
        }
    }

    /// Current geometry from the layout engine.
    pub fn placements(&self) -> Vec<Placement> {
        self.layout.placements()
    }
}

impl std::fmt::Debug for RenderCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderCoordinator")
            .field("cells", &self.order.len())
            .field("visible", &self.visible_ids().len())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared test doubles for the rendering seam.

    use super::*;
    use crate::visibility::Rect;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    pub struct ProbeCell {
        pub visible: bool,
        pub source: Option<String>,
    }

    /// Cell double sharing its state with the test via `Rc`.
    pub struct SharedCell {
        pub probe: Rc<RefCell<ProbeCell>>,
        source: Option<String>,
    }

    impl SharedCell {
        pub fn new(probe: Rc<RefCell<ProbeCell>>) -> Self {
            SharedCell {
                probe,
                source: None,
            }
        }
    }

    impl Cell for SharedCell {
        fn set_visible(&mut self, visible: bool) {
            self.probe.borrow_mut().visible = visible;
        }

        fn is_visible(&self) -> bool {
            self.probe.borrow().visible
        }

        fn assign_source(&mut self, source: &str) {
            self.source = Some(source.to_string());
            self.probe.borrow_mut().source = Some(source.to_string());
        }

        fn source(&self) -> Option<&str> {
            self.source.as_deref()
        }
    }

    #[derive(Default)]
    pub struct ProbeFactory {
        pub created: Vec<(ImageId, Rc<RefCell<ProbeCell>>)>,
    }

    impl ProbeFactory {
        pub fn state(&self, id: ImageId) -> Rc<RefCell<ProbeCell>> {
            self.created
                .iter()
                .find(|(cid, _)| *cid == id)
                .map(|(_, state)| Rc::clone(state))
                .expect("cell was created")
        }
    }

    impl CellFactory for ProbeFactory {
        fn create_cell(&mut self, record: &ImageRecord) -> Box<dyn Cell> {
            let state = Rc::new(RefCell::new(ProbeCell {
                visible: true,
                source: None,
            }));
            self.created.push((record.id, Rc::clone(&state)));
            Box::new(SharedCell::new(state))
        }
    }

    /// Layout double recording full versus light passes.
    #[derive(Debug, Default)]
    pub struct RecordingLayout {
        pub full_passes: usize,
        pub light_passes: usize,
        pub items: Vec<LayoutItem>,
        pub in_flow: Vec<ImageId>,
    }

    impl LayoutEngine for RecordingLayout {
        fn layout(&mut self, items: &[LayoutItem]) {
            self.full_passes += 1;
            self.items = items.to_vec();
            self.in_flow = items.iter().map(|item| item.id).collect();
        }

        fn relayout(&mut self, visible: &[ImageId]) {
            self.light_passes += 1;
            self.in_flow = visible.to_vec();
        }

        fn placements(&self) -> Vec<Placement> {
            // single column, one 100 px row per in-flow item
            self.in_flow
                .iter()
                .enumerate()
                .map(|(row, &id)| Placement {
                    id,
                    bounds: Rect::new(0.0, row as f32 * 100.0, 100.0, 100.0),
                })
                .collect()
        }
    }
}
