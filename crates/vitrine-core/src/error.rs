//! Error types for Vitrine core operations.
//!
//! This module defines well-structured error types using `thiserror` for
//! library-level errors, while higher-level code can use `anyhow` for
//! convenient error handling.

use crate::types::ImageId;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using VitrineError
pub type Result<T> = std::result::Result<T, VitrineError>;

/// Core error types for Vitrine operations.
///
/// Malformed-record errors reject the whole batch: the store never loads
/// partially, so the search index always reflects exactly the store
/// contents.
#[derive(Error, Debug)]
pub enum VitrineError {
    // === Record Source Errors ===
    /// The gallery manifest is missing or could not be found
    #[error("manifest not found at {path}")]
    ManifestNotFound { path: PathBuf },

    /// The manifest exists but could not be parsed
    #[error("manifest is invalid: {reason}")]
    ManifestInvalid { reason: String },

    // === Record Store Errors ===
    /// Two records in the batch share an ID
    #[error("duplicate record id {id} in gallery batch")]
    DuplicateId { id: ImageId },

    /// A record arrived without a display name
    #[error("record {id} has no display name")]
    MissingName { id: ImageId },

    // === Configuration Errors ===
    /// Configuration file parsing failed
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    // === I/O Errors ===
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VitrineError {
    /// Returns true if this error is fatal to the gallery feature.
    ///
    /// Load and validation failures leave nothing to render; there is no
    /// partial-gallery recovery path.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            VitrineError::ManifestNotFound { .. }
                | VitrineError::ManifestInvalid { .. }
                | VitrineError::DuplicateId { .. }
                | VitrineError::MissingName { .. }
        )
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        VitrineError::ConfigError {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_fatal() {
        let err = VitrineError::ManifestNotFound {
            path: PathBuf::from("/gallery.json"),
        };
        assert!(err.is_fatal());

        let err = VitrineError::DuplicateId {
            id: ImageId::new(3),
        };
        assert!(err.is_fatal());

        let err = VitrineError::config("bad toml");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_display() {
        let err = VitrineError::MissingName {
            id: ImageId::new(9),
        };
        assert_eq!(format!("{}", err), "record 9 has no display name");
    }
}
