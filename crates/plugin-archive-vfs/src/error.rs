//! Errors raised while naming, describing or decoding archive entries.
//!
//! # Examples
//!
//! ```
//! use plugin_archive_vfs::ArchiveError;
//!
//! let error = ArchiveError::MissingManifest;
//! assert!(error.is_validation());
//!
//! let core: plugin_archive_core::Error = error.into();
//! assert!(core.is_validation_error());
//! ```

use plugin_archive_core::Error as CoreError;
use thiserror::Error;

/// Errors that can occur while working with archive contents.
///
/// Variants split into caller faults ([`is_validation`](Self::is_validation))
/// and container faults ([`is_decode`](Self::is_decode)).
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Entry name is malformed
    #[error("Invalid entry name '{name}': {reason}")]
    InvalidEntryName {
        /// The rejected name
        name: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Entry metadata field holds an impossible value
    #[error("Invalid value for {field}: {reason}")]
    InvalidField {
        /// Field name as serialized
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// Container could not be decoded as ZIP/JAR
    #[error("Failed to decode archive: {context}")]
    Zip {
        /// What was being decoded
        context: String,
        /// Underlying decoder error
        #[source]
        source: zip::result::ZipError,
    },

    /// Entry data could not be read
    #[error("Failed to read entry {entry}")]
    Io {
        /// Entry being read
        entry: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Archive has no `/META-INF/MANIFEST.MF`
    #[error("Archive is missing /META-INF/MANIFEST.MF")]
    MissingManifest,

    /// Manifest is not valid UTF-8 or has malformed lines
    #[error("Invalid manifest: {reason}")]
    InvalidManifest {
        /// What is wrong with the manifest
        reason: String,
    },

    /// Manifest main section lacks a required attribute
    #[error("Manifest is missing attribute '{attribute}'")]
    MissingAttribute {
        /// The required attribute
        attribute: String,
    },
}

impl ArchiveError {
    /// Returns `true` if the error stems from caller-supplied data.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidEntryName { .. }
                | Self::InvalidField { .. }
                | Self::MissingManifest
                | Self::InvalidManifest { .. }
                | Self::MissingAttribute { .. }
        )
    }

    /// Returns `true` if the container itself could not be decoded.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Zip { .. } | Self::Io { .. })
    }

    pub(crate) fn zip(context: impl Into<String>, source: zip::result::ZipError) -> Self {
        Self::Zip {
            context: context.into(),
            source,
        }
    }

    const fn field_name(&self) -> &'static str {
        match self {
            Self::InvalidEntryName { .. } => "entry name",
            Self::InvalidField { field, .. } => *field,
            Self::MissingManifest | Self::InvalidManifest { .. } => "manifest",
            Self::MissingAttribute { .. } => "manifest attribute",
            Self::Zip { .. } | Self::Io { .. } => "archive",
        }
    }
}

impl From<ArchiveError> for CoreError {
    fn from(error: ArchiveError) -> Self {
        if error.is_validation() {
            Self::ValidationError {
                field: error.field_name().to_string(),
                reason: error.to_string(),
            }
        } else {
            Self::DecodeError {
                message: error.to_string(),
                source: Some(Box::new(error)),
            }
        }
    }
}

/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        let error = ArchiveError::InvalidEntryName {
            name: "relative".to_string(),
            reason: "must start with '/'",
        };
        assert!(error.is_validation());
        assert!(!error.is_decode());
        assert_eq!(
            error.to_string(),
            "Invalid entry name 'relative': must start with '/'"
        );
    }

    #[test]
    fn test_decode_classification() {
        let error = ArchiveError::zip(
            "central directory",
            zip::result::ZipError::InvalidArchive("bad".into()),
        );
        assert!(error.is_decode());
        assert!(!error.is_validation());
    }

    #[test]
    fn test_into_core_validation() {
        let core: CoreError = ArchiveError::MissingAttribute {
            attribute: "Plugin-Name".to_string(),
        }
        .into();

        assert!(core.is_validation_error());
        assert!(core.to_string().contains("Plugin-Name"));
    }

    #[test]
    fn test_into_core_decode_keeps_source() {
        use std::error::Error as _;

        let core: CoreError = ArchiveError::Io {
            entry: "/a.txt".to_string(),
            source: std::io::Error::other("truncated"),
        }
        .into();

        assert!(core.is_decode_error());
        assert!(core.source().is_some());
    }
}
