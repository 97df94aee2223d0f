//! Core data types for Vitrine.
//!
//! This module defines the fundamental data structures used throughout the
//! gallery pipeline. These types are designed to be:
//!
//! - **Serializable**: The manifest wire format is JSON, matching what the
//!   backend serves
//! - **Read-only**: Records are created once per session and never mutated
//! - **Efficient**: Lowercase names are pre-computed so filtering never
//!   re-lowercases per keystroke

use chrono::serde::ts_seconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an image record.
///
/// Assigned by the backend when the image is uploaded, stable for the
/// lifetime of the session. It keys the search index, the rendered cells,
/// and the visibility subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub u64);

impl ImageId {
    /// Create a new image ID
    pub fn new(id: u64) -> Self {
        ImageId(id)
    }

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One image's metadata as served by the gallery backend.
///
/// ## Design Notes
///
/// - `name` is the sole indexed field; `name_lower` is pre-computed for
///   fast case-insensitive matching
/// - `path` locates the full-resolution resource and is not fetched until
///   the cell's placeholder approaches the viewport
/// - `width`/`height` are natural pixel dimensions, used as layout sizing
///   hints only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Unique identifier, primary key for indexing and rendering
    pub id: ImageId,

    /// Human-readable display name (e.g., "cat.png")
    pub name: String,

    /// Pre-computed lowercase name for fast case-insensitive search
    #[serde(skip)]
    pub name_lower: String,

    /// Resource locator for the full-resolution image
    pub path: String,

    /// Natural width in pixels
    pub width: u32,

    /// Natural height in pixels
    pub height: u32,

    /// Upload time, epoch seconds on the wire
    #[serde(with = "ts_seconds")]
    pub time: DateTime<Utc>,
}

impl ImageRecord {
    /// Create a new record with the given parameters.
    ///
    /// The `name_lower` field is automatically computed from `name`.
    pub fn new(
        id: ImageId,
        name: impl Into<String>,
        path: impl Into<String>,
        width: u32,
        height: u32,
        time: DateTime<Utc>,
    ) -> Self {
        let name = name.into();
        let name_lower = name.to_lowercase();
        ImageRecord {
            id,
            name,
            name_lower,
            path: path.into(),
            width,
            height,
            time,
        }
    }

    /// Initialize the lowercase name cache after deserialization.
    ///
    /// The cache is skipped by serde, so sources must call this before the
    /// record enters the store.
    pub fn init_cache(&mut self) {
        if self.name_lower.is_empty() {
            self.name_lower = self.name.to_lowercase();
        }
    }

    /// Aspect ratio (height / width) used by layout engines for sizing.
    ///
    /// Returns 1.0 for degenerate zero-width records so layout math stays
    /// finite.
    pub fn aspect(&self) -> f32 {
        if self.width == 0 {
            1.0
        } else {
            self.height as f32 / self.width as f32
        }
    }
}

impl PartialEq for ImageRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ImageRecord {}
