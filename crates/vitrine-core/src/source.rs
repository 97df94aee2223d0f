//! The record-fetch boundary.
//!
//! The gallery consumes a sequence of `ImageRecord` from an external
//! source. The contract is "resolves once with the full list, or fails":
//! a failed fetch is fatal to the gallery feature and there is no partial
//! rendering.
//!
//! `ManifestSource` is the bundled implementation, reading the same JSON
//! array the backend serves from a local manifest file.

use crate::error::{Result, VitrineError};
use crate::types::ImageRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// An external source of gallery records.
pub trait RecordSource {
    /// Fetch the full record list. Resolves once or fails; callers never
    /// retry.
    fn fetch(&self) -> Result<Vec<ImageRecord>>;
}

/// Reads records from a JSON manifest on disk.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ManifestSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for ManifestSource {
    fn fetch(&self) -> Result<Vec<ImageRecord>> {
        let data = fs::read_to_string(&self.path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                VitrineError::ManifestNotFound {
                    path: self.path.clone(),
                }
            } else {
                VitrineError::Io(err)
            }
        })?;

        let mut records: Vec<ImageRecord> =
            serde_json::from_str(&data).map_err(|err| VitrineError::ManifestInvalid {
                reason: err.to_string(),
            })?;

        for record in &mut records {
            record.init_cache();
        }

        info!(
            manifest = %self.path.display(),
            records = records.len(),
            "Manifest fetched"
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MANIFEST: &str = r#"[
        {"id": 1, "name": "cat.png", "path": "/images/cat.png",
         "width": 640, "height": 480, "time": 1600000000},
        {"id": 2, "name": "Dog.PNG", "path": "/images/dog.png",
         "width": 800, "height": 600, "time": 1600000100}
    ]"#;

    #[test]
    fn test_fetch_manifest() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(MANIFEST.as_bytes()).unwrap();

        let source = ManifestSource::new(file.path());
        let records = source.fetch().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "cat.png");
        // cache initialized on the way in
        assert_eq!(records[1].name_lower, "dog.png");
    }

    #[test]
    fn test_missing_manifest_is_fatal() {
        let source = ManifestSource::new("/nonexistent/gallery.json");
        let err = source.fetch().unwrap_err();
        assert!(matches!(err, VitrineError::ManifestNotFound { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_invalid_manifest_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json ]").unwrap();

        let source = ManifestSource::new(file.path());
        let err = source.fetch().unwrap_err();
        assert!(matches!(err, VitrineError::ManifestInvalid { .. }));
        assert!(err.is_fatal());
    }
}
