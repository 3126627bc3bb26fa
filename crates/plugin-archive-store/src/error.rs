//! Error types for plugin store operations.

use plugin_archive_core::Error as CoreError;
use std::path::PathBuf;

/// Result type for plugin store operations.
pub type Result<T> = std::result::Result<T, PluginStoreError>;

/// Errors that can occur during plugin store operations.
///
/// A missing plugin is not an error: lookups return `None` and deletes of
/// missing plugins succeed.
#[derive(thiserror::Error, Debug)]
pub enum PluginStoreError {
    /// Stored archive bytes do not match the recorded checksum.
    ///
    /// Indicates on-disk corruption or modification outside the store.
    #[error("Checksum mismatch for plugin {name}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Plugin whose archive failed verification
        name: String,
        /// Checksum recorded in metadata
        expected: String,
        /// Checksum calculated from the stored bytes
        actual: String,
    },

    /// Plugin metadata is invalid or malformed.
    ///
    /// Raised when `plugin.json` cannot be parsed, has an unsupported format
    /// version, or names a different plugin than its directory.
    #[error("Invalid metadata for plugin {name}: {reason}")]
    InvalidMetadata {
        /// Plugin directory name
        name: String,
        /// Description of why the metadata is invalid
        reason: String,
    },

    /// A plugin directory lacks one of its files.
    #[error("Missing file in plugin {name}: {path}")]
    MissingFile {
        /// Plugin directory name
        name: String,
        /// Path of the missing file, relative to the plugin directory
        path: PathBuf,
    },

    /// Another thread panicked while holding the store lock.
    #[error("Plugin store lock poisoned")]
    LockPoisoned,

    /// I/O error occurred during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PluginStoreError {
    /// Returns `true` if stored data failed an integrity check.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_archive_store::PluginStoreError;
    ///
    /// let error = PluginStoreError::ChecksumMismatch {
    ///     name: "demo".to_string(),
    ///     expected: "blake3:00".to_string(),
    ///     actual: "blake3:11".to_string(),
    /// };
    /// assert!(error.is_integrity_error());
    /// ```
    #[must_use]
    pub const fn is_integrity_error(&self) -> bool {
        matches!(
            self,
            Self::ChecksumMismatch { .. } | Self::InvalidMetadata { .. } | Self::MissingFile { .. }
        )
    }
}

impl From<PluginStoreError> for CoreError {
    fn from(error: PluginStoreError) -> Self {
        Self::StoreError {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }
}
