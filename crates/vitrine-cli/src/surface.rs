//! Terminal implementations of the gallery's rendering boundaries.
//!
//! The core pipeline only talks to traits; this module provides the
//! terminal-side collaborators: a cell that "loads" its image by statting
//! the file, a shortest-column masonry layout in terminal rows, and a
//! detail panel that captures the activated record for the TUI to draw.

use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;
use vitrine_core::{
    Cell, CellFactory, DetailView, ImageId, ImageRecord, LayoutEngine, LayoutItem, Placement,
    Rect,
};

/// Minimum and maximum cell heights in terminal rows.
const MIN_CELL_ROWS: f32 = 3.0;
const MAX_CELL_ROWS: f32 = 9.0;

/// Vertical gap between stacked cells, in rows.
const CELL_GAP: f32 = 1.0;

/// A rendered grid cell in the terminal.
///
/// The placeholder state carries no active resource; assigning the source
/// is the load. For a local gallery the "fetch" is a metadata read, enough
/// to prove the resource was touched exactly once.
#[derive(Debug)]
pub struct TermCell {
    visible: bool,
    source: Option<String>,
    loaded_bytes: Option<u64>,
}

impl TermCell {
    fn new() -> Self {
        TermCell {
            visible: true,
            source: None,
            loaded_bytes: None,
        }
    }

    /// Byte size of the loaded resource, if the file was readable.
    pub fn loaded_bytes(&self) -> Option<u64> {
        self.loaded_bytes
    }
}

impl Cell for TermCell {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn assign_source(&mut self, source: &str) {
        self.loaded_bytes = std::fs::metadata(source).map(|meta| meta.len()).ok();
        debug!(source, bytes = ?self.loaded_bytes, "Cell source assigned");
        self.source = Some(source.to_string());
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

/// Mints `TermCell`s, one per record.
#[derive(Debug, Default)]
pub struct TermCellFactory;

impl CellFactory for TermCellFactory {
    fn create_cell(&mut self, _record: &ImageRecord) -> Box<dyn Cell> {
        Box::new(TermCell::new())
    }
}

/// Shortest-column masonry layout over a fixed column count.
///
/// Cell heights follow the image's aspect ratio, clamped to a readable
/// range of terminal rows. `layout` rebuilds the flow from the full item
/// set; `relayout` re-flows the retained items restricted to the visible
/// ids, keeping the sizing bookkeeping.
#[derive(Debug)]
pub struct ColumnLayout {
    columns: u16,
    column_width: f32,

    /// Full item set from the last `layout` call
    items: Vec<LayoutItem>,

    placements: Vec<Placement>,
}

impl ColumnLayout {
    pub fn new(columns: u16, column_width: f32) -> Self {
        ColumnLayout {
            columns: columns.max(1),
            column_width,
            items: Vec::new(),
            placements: Vec::new(),
        }
    }

    /// Total height of the laid-out grid in rows.
    pub fn content_height(&self) -> f32 {
        self.placements
            .iter()
            .map(|p| p.bounds.bottom())
            .fold(0.0, f32::max)
    }

    fn flow<'a>(
        columns: u16,
        column_width: f32,
        items: impl Iterator<Item = &'a LayoutItem>,
    ) -> Vec<Placement> {
        let mut column_heights = vec![0.0f32; columns as usize];
        let mut placements = Vec::new();

        for item in items {
            // drop into the currently shortest column
            let (col, _) = column_heights
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.total_cmp(b.1))
                .expect("at least one column");

            let aspect = if item.width == 0 {
                1.0
            } else {
                item.height as f32 / item.width as f32
            };
            let rows = (column_width * aspect * 0.5).clamp(MIN_CELL_ROWS, MAX_CELL_ROWS);

            placements.push(Placement {
                id: item.id,
                bounds: Rect::new(
                    col as f32 * column_width,
                    column_heights[col],
                    column_width,
                    rows,
                ),
            });
            column_heights[col] += rows + CELL_GAP;
        }

        placements
    }
}

impl LayoutEngine for ColumnLayout {
    fn layout(&mut self, items: &[LayoutItem]) {
        self.items = items.to_vec();
        self.placements = Self::flow(self.columns, self.column_width, self.items.iter());
    }

    fn relayout(&mut self, visible: &[ImageId]) {
        self.placements = Self::flow(
            self.columns,
            self.column_width,
            self.items.iter().filter(|item| visible.contains(&item.id)),
        );
    }

    fn placements(&self) -> Vec<Placement> {
        self.placements.clone()
    }
}

/// Detail-view boundary for the TUI: captures the activated record into a
/// shared slot the draw loop renders as a modal.
pub struct PanelDetail {
    slot: Rc<RefCell<Option<ImageRecord>>>,
}

impl PanelDetail {
    pub fn new(slot: Rc<RefCell<Option<ImageRecord>>>) -> Self {
        PanelDetail { slot }
    }
}

impl DetailView for PanelDetail {
    fn open(&mut self, record: &ImageRecord) {
        *self.slot.borrow_mut() = Some(record.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, width: u32, height: u32) -> LayoutItem {
        LayoutItem {
            id: ImageId::new(id),
            width,
            height,
        }
    }

    #[test]
    fn test_term_cell_lifecycle() {
        let mut cell = TermCell::new();
        assert!(cell.is_visible());
        assert!(cell.source().is_none());

        cell.assign_source("/nonexistent/cat.png");
        assert_eq!(cell.source(), Some("/nonexistent/cat.png"));
        // unreadable file still counts as loaded; only the size is unknown
        assert!(cell.loaded_bytes().is_none());

        cell.set_visible(false);
        assert!(!cell.is_visible());
        assert_eq!(cell.source(), Some("/nonexistent/cat.png"));
    }

    #[test]
    fn test_layout_fills_columns_left_to_right() {
        let mut layout = ColumnLayout::new(3, 20.0);
        layout.layout(&[item(1, 100, 100), item(2, 100, 100), item(3, 100, 100)]);

        let placements = layout.placements();
        assert_eq!(placements.len(), 3);
        assert_eq!(placements[0].bounds.x, 0.0);
        assert_eq!(placements[1].bounds.x, 20.0);
        assert_eq!(placements[2].bounds.x, 40.0);
        // first row starts at the top
        assert!(placements.iter().all(|p| p.bounds.y == 0.0));
    }

    #[test]
    fn test_layout_stacks_into_shortest_column() {
        let mut layout = ColumnLayout::new(2, 6.0);
        // a tall portrait first, then squares: the squares stack in the
        // second column before anything lands under the portrait
        layout.layout(&[
            item(1, 100, 400),
            item(2, 100, 100),
            item(3, 100, 100),
        ]);

        let placements = layout.placements();
        assert_eq!(placements[1].bounds.x, 6.0);
        assert_eq!(placements[2].bounds.x, 6.0);
        assert!(placements[2].bounds.y > placements[1].bounds.y);
    }

    #[test]
    fn test_relayout_keeps_item_set() {
        let mut layout = ColumnLayout::new(2, 20.0);
        layout.layout(&[item(1, 100, 100), item(2, 100, 100), item(3, 100, 100)]);

        layout.relayout(&[ImageId::new(1), ImageId::new(3)]);
        let flowed: Vec<u64> = layout
            .placements()
            .iter()
            .map(|p| p.id.as_u64())
            .collect();
        assert_eq!(flowed, vec![1, 3]);

        // a later full pass re-flows everything from the retained set
        layout.relayout(&[ImageId::new(1), ImageId::new(2), ImageId::new(3)]);
        assert_eq!(layout.placements().len(), 3);
    }

    #[test]
    fn test_content_height_grows_with_items() {
        let mut layout = ColumnLayout::new(1, 20.0);
        layout.layout(&[item(1, 100, 100)]);
        let one = layout.content_height();

        layout.layout(&[item(1, 100, 100), item(2, 100, 100)]);
        assert!(layout.content_height() > one);
    }

    #[test]
    fn test_panel_detail_captures_record() {
        use chrono::{TimeZone, Utc};

        let slot = Rc::new(RefCell::new(None));
        let mut detail = PanelDetail::new(Rc::clone(&slot));

        let record = ImageRecord::new(
            ImageId::new(1),
            "cat.png",
            "/images/cat.png",
            640,
            480,
            Utc.timestamp_opt(1_600_000_000, 0).unwrap(),
        );
        detail.open(&record);

        assert_eq!(slot.borrow().as_ref().unwrap().name, "cat.png");
    }
}
