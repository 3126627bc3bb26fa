//! Strong domain types for the plugin archive service.
//!
//! This module implements the newtype pattern for the identifiers that cross
//! the store boundary, and the [`Plugin`] record the store holds.
//!
//! # Examples
//!
//! ```
//! use plugin_archive_core::{PluginName, UserId};
//!
//! let name = PluginName::new("spreadsheet-formatters").unwrap();
//! let user = UserId::new("user@example.com");
//!
//! assert_eq!(name.as_str(), "spreadsheet-formatters");
//! assert_eq!(user.to_string(), "user@example.com");
//! ```

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a plugin identifier in characters.
pub const MAX_PLUGIN_NAME_LEN: usize = 255;

/// Plugin identifier (validated newtype over String).
///
/// The identifier is read from the archive manifest on upload and addresses
/// the plugin in every request path, so it must be usable as a single path
/// segment and as a directory name.
///
/// # Examples
///
/// ```
/// use plugin_archive_core::PluginName;
///
/// assert!(PluginName::new("formatters").is_ok());
/// assert!(PluginName::new("").is_err());
/// assert!(PluginName::new("../escape").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PluginName(String);

impl PluginName {
    /// Creates a validated plugin name.
    ///
    /// Rejects names that:
    /// - Are empty or longer than [`MAX_PLUGIN_NAME_LEN`] characters
    /// - Are `.` or `..`
    /// - Contain path separators (`/` or `\`)
    /// - Contain whitespace at either end or control characters
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] describing the first violated rule.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_plugin_name(&name)?;
        Ok(Self(name))
    }

    /// Returns the plugin name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PluginName` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn validate_plugin_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "Plugin name cannot be empty"
    } else if name.chars().count() > MAX_PLUGIN_NAME_LEN {
        "Plugin name exceeds 255 characters"
    } else if name == "." || name == ".." {
        "Plugin name cannot be '.' or '..'"
    } else if name.contains('/') || name.contains('\\') {
        "Plugin name cannot contain path separators"
    } else if name.chars().any(char::is_control) {
        "Plugin name cannot contain control characters"
    } else if name.trim() != name {
        "Plugin name cannot start or end with whitespace"
    } else {
        return Ok(());
    };

    Err(Error::ValidationError {
        field: "plugin name".to_string(),
        reason: format!("{reason}: '{}'", name.escape_debug()),
    })
}

impl fmt::Display for PluginName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PluginName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for PluginName {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PluginName> for String {
    fn from(name: PluginName) -> Self {
        name.0
    }
}

/// Identifier of the user who uploaded a plugin (newtype over String).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new user identifier.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the user ID as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A stored plugin: the uploaded archive plus its provenance.
///
/// The archive bytes are kept verbatim; nothing in this workspace ever
/// rewrites them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugin {
    /// Identifier read from the archive manifest
    pub name: PluginName,
    /// Filename supplied by the uploading client
    pub filename: String,
    /// Raw archive bytes
    pub archive: Vec<u8>,
    /// User who uploaded the archive
    pub user: UserId,
    /// Time of upload
    pub timestamp: DateTime<Utc>,
}

impl Plugin {
    /// Returns a summary without the archive bytes.
    #[must_use]
    pub fn summary(&self) -> PluginSummary {
        PluginSummary {
            name: self.name.clone(),
            filename: self.filename.clone(),
            size: self.archive.len() as u64,
            user: self.user.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// Brief information about a stored plugin, used for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSummary {
    /// Plugin identifier
    pub name: PluginName,
    /// Filename supplied on upload
    pub filename: String,
    /// Archive size in bytes
    pub size: u64,
    /// User who uploaded the archive
    pub user: UserId,
    /// Time of upload
    pub timestamp: DateTime<Utc>,
}
