//! Viewport visibility scheduling for deferred image loads.
//!
//! Each rendered cell starts as a placeholder carrying a deferred resource
//! locator. The scheduler watches placeholders and, when one approaches the
//! viewport, hands back a one-shot trigger carrying the locator and drops
//! the subscription -- a placeholder can never trigger twice, and one that
//! never approaches the viewport is never loaded (bandwidth conservation,
//! not a defect).
//!
//! The trigger predicate mirrors the platform observer configuration the
//! gallery historically used: a 20 px margin around the viewport, or an
//! intersection ratio of at least 0.1.

use crate::types::ImageId;
use std::collections::HashMap;
use tracing::debug;

/// Margin in pixels around the viewport within which a cell counts as
/// approaching.
pub const VIEWPORT_MARGIN: f32 = 20.0;

/// Minimum fraction of a cell's area inside the viewport that triggers a
/// load on its own.
pub const MIN_INTERSECTION_RATIO: f32 = 0.1;

/// Axis-aligned rectangle in layout units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Grow the rectangle outward by `margin` on every side.
    pub fn expand(&self, margin: f32) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }

    /// Overlapping region of two rectangles, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right > x && bottom > y {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }
}

/// A cell's position in the laid-out grid, as reported by the layout
/// engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub id: ImageId,
    pub bounds: Rect,
}

/// A fired visibility subscription: assign `source` to the cell for `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub id: ImageId,
    pub source: String,
}

/// Decide whether a cell is close enough to the viewport to load.
///
/// Either condition alone is sufficient: any overlap with the
/// margin-expanded viewport, or at least `min_ratio` of the cell's area
/// inside the viewport proper.
pub fn approaching(cell: &Rect, viewport: &Rect, margin: f32, min_ratio: f32) -> bool {
    if viewport.expand(margin).intersects(cell) {
        return true;
    }

    match viewport.intersection(cell) {
        Some(overlap) if cell.area() > 0.0 => overlap.area() / cell.area() >= min_ratio,
        _ => false,
    }
}

/// Watches placeholders and fires each at most once.
#[derive(Debug)]
pub struct VisibilityScheduler {
    margin: f32,
    min_ratio: f32,

    /// Deferred resource locator per watched placeholder. Removal on
    /// trigger is what enforces the one-shot guarantee.
    watched: HashMap<ImageId, String>,
}

impl VisibilityScheduler {
    /// Scheduler with the standard 20 px margin and 0.1 ratio.
    pub fn new() -> Self {
        Self::with_thresholds(VIEWPORT_MARGIN, MIN_INTERSECTION_RATIO)
    }

    /// Scheduler with custom thresholds.
    pub fn with_thresholds(margin: f32, min_ratio: f32) -> Self {
        VisibilityScheduler {
            margin,
            min_ratio,
            watched: HashMap::new(),
        }
    }

    /// Register a placeholder for visibility tracking.
    pub fn watch(&mut self, id: ImageId, deferred_source: impl Into<String>) {
        self.watched.insert(id, deferred_source.into());
    }

    /// Whether a placeholder is still being tracked.
    pub fn is_watching(&self, id: ImageId) -> bool {
        self.watched.contains_key(&id)
    }

    /// Number of placeholders still awaiting their first trigger.
    pub fn watched_count(&self) -> usize {
        self.watched.len()
    }

    /// Drop all subscriptions, e.g. before a full re-render.
    pub fn clear(&mut self) {
        self.watched.clear();
    }

    /// Evaluate a batch of placements against the viewport.
    ///
    /// Every watched placeholder that is approaching fires exactly once and
    /// stops being tracked. Triggers within a batch are independent and
    /// callers must treat their order as unspecified.
    pub fn observe(&mut self, viewport: &Rect, placements: &[Placement]) -> Vec<Trigger> {
        let mut triggers = Vec::new();

        for placement in placements {
            if !self.watched.contains_key(&placement.id) {
                continue;
            }
            if approaching(&placement.bounds, viewport, self.margin, self.min_ratio) {
                // unsubscribe-on-trigger: this id can never fire again
                if let Some(source) = self.watched.remove(&placement.id) {
                    debug!(id = %placement.id, "Placeholder triggered, loading deferred source");
                    triggers.push(Trigger {
                        id: placement.id,
                        source,
                    });
                }
            }
        }

        triggers
    }
}

impl Default for VisibilityScheduler {
    fn default() -> Self {
        Self::new()
    }
}
