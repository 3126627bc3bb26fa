//! Configuration types for the plugin archive service.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration.
//!
//! # Examples
//!
//! ```
//! use plugin_archive_core::ServiceConfig;
//!
//! // Use default configuration
//! let config = ServiceConfig::default();
//! assert_eq!(config.route_prefix, "/api/plugin");
//! assert_eq!(config.name_segment_index(), 2);
//!
//! // Create custom configuration
//! let custom = ServiceConfig::builder()
//!     .route_prefix("/plugins")
//!     .manifest_name_attribute("Implementation-Title")
//!     .build();
//! assert_eq!(custom.name_segment_index(), 1);
//! ```

use crate::{Error, MediaType, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default route prefix the plugin resources are mounted under.
pub const DEFAULT_ROUTE_PREFIX: &str = "/api/plugin";

/// Default manifest attribute holding the plugin identifier.
pub const DEFAULT_MANIFEST_NAME_ATTRIBUTE: &str = "Plugin-Name";

/// Default maximum entry name length in characters.
pub const DEFAULT_MAX_ENTRY_NAME_LEN: usize = 255;

/// Default upload limit: 64 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 64 * 1024 * 1024;

/// Service configuration.
///
/// # Examples
///
/// ```
/// use plugin_archive_core::ServiceConfig;
///
/// let config = ServiceConfig::from_toml_str(r#"
///     route_prefix = "/v2/plugin"
///     max_upload_bytes = 1048576
/// "#).unwrap();
///
/// assert_eq!(config.route_prefix, "/v2/plugin");
/// assert_eq!(config.max_upload_bytes, 1_048_576);
/// assert_eq!(config.manifest_name_attribute, "Plugin-Name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Path prefix of the plugin collection, e.g. `/api/plugin`.
    ///
    /// The plugin name is the path segment directly after the prefix.
    /// Default: `/api/plugin`
    pub route_prefix: String,

    /// Content type produced by the entry listing resource.
    ///
    /// Default: `application/json`
    pub listing_media_type: String,

    /// Manifest main attribute the plugin identifier is read from.
    ///
    /// Default: `Plugin-Name`
    pub manifest_name_attribute: String,

    /// Maximum length of an in-archive path addressed by a request.
    ///
    /// Default: 255
    pub max_entry_name_len: usize,

    /// Maximum accepted upload size in bytes.
    ///
    /// Default: 64 MiB
    pub max_upload_bytes: u64,

    /// Directory of the on-disk plugin store.
    ///
    /// If `None`, the platform data directory is used.
    /// Default: None
    pub store_dir: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            listing_media_type: MediaType::APPLICATION_JSON.to_string(),
            manifest_name_attribute: DEFAULT_MANIFEST_NAME_ATTRIBUTE.to_string(),
            max_entry_name_len: DEFAULT_MAX_ENTRY_NAME_LEN,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            store_dir: None,
        }
    }
}

impl ServiceConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::new()
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the document is malformed or fails
    /// [`validate`](Self::validate).
    pub fn from_toml_str(document: &str) -> Result<Self> {
        let config: Self = toml::from_str(document).map_err(|e| Error::ConfigError {
            message: format!("Failed to parse TOML: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = fs::read_to_string(path).map_err(|e| Error::ConfigError {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&document)
    }

    /// Loads `path` when given, else the default config file if it exists,
    /// else the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if an existing file cannot be parsed.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Returns `<config dir>/plugin-archive/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("plugin-archive").join("config.toml"))
    }

    /// Returns the configured store directory or `<data dir>/plugin-archive/plugins`.
    #[must_use]
    pub fn resolved_store_dir(&self) -> PathBuf {
        self.store_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("plugin-archive")
                .join("plugins")
        })
    }

    /// Returns the parsed listing media type.
    ///
    /// # Errors
    ///
    /// Returns an error if `listing_media_type` is not a `type/subtype` pair.
    pub fn listing_media_type(&self) -> Result<MediaType> {
        MediaType::parse(&self.listing_media_type)
    }

    /// Returns the non-empty segments of the route prefix.
    #[must_use]
    pub fn prefix_segments(&self) -> Vec<&str> {
        self.route_prefix
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    /// Returns the index of the plugin name among the request path segments.
    #[must_use]
    pub fn name_segment_index(&self) -> usize {
        self.prefix_segments().len()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if:
    /// - The route prefix does not start with `/`
    /// - The listing media type is malformed
    /// - The manifest attribute name is empty
    /// - The entry name limit or upload limit is zero
    pub fn validate(&self) -> Result<()> {
        let fail = |message: &str| {
            Err(Error::ConfigError {
                message: message.to_string(),
            })
        };

        if !self.route_prefix.starts_with('/') {
            return fail("route_prefix must start with '/'");
        }
        if self.listing_media_type().is_err() {
            return fail("listing_media_type must be a type/subtype pair");
        }
        if self.manifest_name_attribute.trim().is_empty() {
            return fail("manifest_name_attribute cannot be empty");
        }
        if self.max_entry_name_len == 0 {
            return fail("max_entry_name_len must be greater than zero");
        }
        if self.max_upload_bytes == 0 {
            return fail("max_upload_bytes must be greater than zero");
        }
        if let Some(dir) = &self.store_dir
            && dir.as_os_str().is_empty()
        {
            return fail("store_dir cannot be empty");
        }

        Ok(())
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ServiceConfig::default(),
        }
    }

    /// Sets the route prefix.
    #[must_use]
    pub fn route_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.route_prefix = prefix.into();
        self
    }

    /// Sets the listing media type.
    #[must_use]
    pub fn listing_media_type(mut self, media_type: &MediaType) -> Self {
        self.config.listing_media_type = media_type.to_string();
        self
    }

    /// Sets the manifest identifier attribute.
    #[must_use]
    pub fn manifest_name_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.config.manifest_name_attribute = attribute.into();
        self
    }

    /// Sets the maximum entry name length.
    #[must_use]
    pub const fn max_entry_name_len(mut self, len: usize) -> Self {
        self.config.max_entry_name_len = len;
        self
    }

    /// Sets the upload limit.
    #[must_use]
    pub const fn max_upload_bytes(mut self, bytes: u64) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    /// Sets the store directory.
    #[must_use]
    pub fn store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.store_dir = Some(dir.into());
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ServiceConfig {
        self.config
    }
}

impl Default for ServiceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();

        assert_eq!(config.route_prefix, "/api/plugin");
        assert_eq!(config.listing_media_type, "application/json");
        assert_eq!(config.manifest_name_attribute, "Plugin-Name");
        assert_eq!(config.max_entry_name_len, 255);
        assert_eq!(config.max_upload_bytes, 64 * 1024 * 1024);
        assert!(config.store_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let invalid = ServiceConfig {
            route_prefix: "api/plugin".to_string(),
            ..Default::default()
        };
        assert!(invalid.validate().is_err());

        let invalid = ServiceConfig {
            listing_media_type: "json".to_string(),
            ..Default::default()
        };
        assert!(invalid.validate().is_err());

        let invalid = ServiceConfig {
            manifest_name_attribute: "  ".to_string(),
            ..Default::default()
        };
        assert!(invalid.validate().is_err());

        let invalid = ServiceConfig {
            max_upload_bytes: 0,
            ..Default::default()
        };
        assert!(invalid.validate().unwrap_err().is_config_error());

        let invalid = ServiceConfig {
            store_dir: Some(PathBuf::new()),
            ..Default::default()
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_name_segment_index_follows_prefix() {
        let root = ServiceConfig::builder().route_prefix("/").build();
        assert_eq!(root.name_segment_index(), 0);

        let nested = ServiceConfig::builder().route_prefix("/a/b/plugin/").build();
        assert_eq!(nested.prefix_segments(), ["a", "b", "plugin"]);
        assert_eq!(nested.name_segment_index(), 3);
    }

    #[test]
    fn test_from_toml_str_partial_document() {
        let config = ServiceConfig::from_toml_str(
            r#"
            manifest_name_attribute = "Bundle-SymbolicName"
            store_dir = "/var/lib/plugins"
            "#,
        )
        .unwrap();

        assert_eq!(config.manifest_name_attribute, "Bundle-SymbolicName");
        assert_eq!(config.store_dir, Some(PathBuf::from("/var/lib/plugins")));
        assert_eq!(config.route_prefix, DEFAULT_ROUTE_PREFIX);
    }

    #[test]
    fn test_from_toml_str_rejects_invalid() {
        assert!(ServiceConfig::from_toml_str("route_prefix = 42").is_err());
        assert!(ServiceConfig::from_toml_str("max_entry_name_len = 0").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "route_prefix = \"/plugins\"\n").unwrap();

        let config = ServiceConfig::load(&path).unwrap();
        assert_eq!(config.route_prefix, "/plugins");

        let missing = ServiceConfig::load(temp.path().join("missing.toml"));
        assert!(missing.unwrap_err().is_config_error());
    }

    #[test]
    fn test_load_or_default_prefers_explicit_path() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("custom.toml");
        fs::write(&path, "max_upload_bytes = 10\n").unwrap();

        let config = ServiceConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.max_upload_bytes, 10);
    }

    #[test]
    fn test_builder_fluent_interface() {
        let config = ServiceConfig::builder()
            .route_prefix("/plugins")
            .listing_media_type(&MediaType::from_static("application/vnd.entries+json"))
            .max_entry_name_len(128)
            .max_upload_bytes(1024)
            .store_dir("/tmp/plugins")
            .build();

        assert_eq!(config.route_prefix, "/plugins");
        assert_eq!(
            config.listing_media_type().unwrap().essence(),
            "application/vnd.entries+json"
        );
        assert_eq!(config.max_entry_name_len, 128);
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.resolved_store_dir(), PathBuf::from("/tmp/plugins"));
    }
}
