//! Application state management.

use anyhow::{bail, Context};
use std::path::PathBuf;
use tracing::info;
use vitrine_core::{Config, ManifestSource, RecordSource, RecordStore, SearchIndex};

/// Shared application state for the one-shot commands.
pub struct App {
    /// Configuration
    pub config: Config,

    /// The validated record store
    pub store: RecordStore,

    /// Substring index over image names
    pub index: SearchIndex,
}

impl App {
    /// Load the gallery behind `manifest` (or the configured manifest) and
    /// build the index.
    pub fn new(config: Config, manifest: Option<PathBuf>) -> anyhow::Result<Self> {
        let path = resolve_manifest(&config, manifest)?;
        let source = ManifestSource::new(&path);

        let records = source
            .fetch()
            .with_context(|| format!("failed to load gallery from {}", path.display()))?;
        let store = RecordStore::from_records(records)?;
        let index = SearchIndex::build(&store);

        info!(
            manifest = %path.display(),
            records = store.len(),
            "Application initialized"
        );

        Ok(App {
            config,
            store,
            index,
        })
    }
}

/// Pick the manifest path: command-line override first, configured path
/// second.
pub fn resolve_manifest(config: &Config, manifest: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match manifest.or_else(|| config.gallery.manifest.clone()) {
        Some(path) => Ok(path),
        None => bail!(
            "no gallery manifest: pass --manifest or set [gallery] manifest in vitrine.toml"
        ),
    }
}
