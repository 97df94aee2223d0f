//! # Vitrine Core Library
//!
//! This crate provides the core pipeline for the Vitrine image gallery:
//! a substring search index over image names, a debounced filter, a
//! viewport-visibility scheduler for deferred image loads, and a render
//! coordinator that toggles grid cells. It is surface-agnostic: all
//! rendering and layout goes through traits, so the same pipeline drives a
//! terminal grid or a test double.
//!
//! ## Architecture
//!
//! - **Types** (`types`): image records and IDs
//! - **Store** (`store`): the validated, immutable record store
//! - **Index** (`index`): case-insensitive substring index over names
//! - **Debounce** (`debounce`): quiet-period collapsing of input bursts
//! - **Visibility** (`visibility`): one-shot near-viewport load triggers
//! - **Render** (`render`): cell/layout/detail boundary traits and the
//!   coordinator
//! - **Gallery** (`gallery`): owned top-level state wiring it all together
//! - **Source** (`source`): the record-fetch boundary
//! - **Config** (`config`): configuration management
//!
//! ## Example
//!
//! ```rust,ignore
//! use vitrine_core::{Gallery, ManifestSource, RecordSource, RecordStore};
//!
//! let records = ManifestSource::new("gallery.json").fetch()?;
//! let store = RecordStore::from_records(records)?;
//! let mut gallery = Gallery::new(store, layout, detail);
//! gallery.render_all(&mut factory);
//! ```

pub mod config;
pub mod debounce;
pub mod error;
pub mod gallery;
pub mod index;
pub mod render;
pub mod source;
pub mod store;
pub mod types;
pub mod visibility;

// Re-export commonly used types
pub use config::Config;
pub use debounce::Debouncer;
pub use error::{Result, VitrineError};
pub use gallery::Gallery;
pub use index::SearchIndex;
pub use render::{Cell, CellFactory, DetailView, LayoutEngine, LayoutItem, RenderCoordinator};
pub use source::{ManifestSource, RecordSource};
pub use store::RecordStore;
pub use types::{ImageId, ImageRecord};
pub use visibility::{Placement, Rect, Trigger, VisibilityScheduler};
