//! Error types for the plugin archive service.
//!
//! This module provides the error hierarchy shared by every crate in the
//! workspace. Errors fall into three classes that the host framework maps onto
//! HTTP responses:
//!
//! - client-side validation failures (malformed names, missing manifest,
//!   missing upload part, content negotiation mismatches)
//! - server-side failures (archive decoding, store I/O, serialization)
//! - unsupported operations (a verb the addressed resource does not handle)
//!
//! "Not found" outcomes are deliberately absent: an unknown plugin or an
//! unknown in-archive path is reported as an empty success, never as an error.
//!
//! # Examples
//!
//! ```
//! use plugin_archive_core::{Error, HttpStatus, Result};
//!
//! fn require_filename(name: &str) -> Result<()> {
//!     if name.is_empty() {
//!         return Err(Error::ValidationError {
//!             field: "filename".to_string(),
//!             reason: "File missing".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = require_filename("").unwrap_err();
//! assert!(err.is_validation_error());
//! assert_eq!(err.status(), HttpStatus::BadRequest);
//! ```

use crate::http::{HttpMethod, HttpStatus};
use thiserror::Error;

/// Main error type for the plugin archive service.
#[derive(Error, Debug)]
pub enum Error {
    /// Validation error for request input or domain types.
    ///
    /// Raised when creating domain types like `PluginName` or `EntryName`
    /// from malformed input, or when an uploaded archive fails validation
    /// (no manifest, no identifier attribute, no file part).
    #[error("Validation error in {field}: {reason}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Detailed reason for the validation failure
        reason: String,
    },

    /// The caller does not accept the content type the resource produces.
    #[error("Not acceptable: {accept} (requires {required})")]
    NotAcceptable {
        /// Raw `Accept` header sent by the caller
        accept: String,
        /// Content type produced by the resource
        required: String,
    },

    /// The request body has a content type the resource cannot consume.
    #[error("Unsupported media type: {found} (expected {expected})")]
    UnsupportedMediaType {
        /// Content type sent by the caller
        found: String,
        /// Content type the resource consumes
        expected: String,
    },

    /// The request body exceeds the configured size limit.
    #[error("Payload too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge {
        /// Size of the rejected payload in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// No resource is mapped to the requested path.
    #[error("No route for {method} {path}")]
    RouteNotFound {
        /// Request method
        method: HttpMethod,
        /// Request path
        path: String,
    },

    /// The addressed resource does not support the requested verb.
    #[error("{method} not implemented for {resource}")]
    NotImplemented {
        /// Request method
        method: HttpMethod,
        /// Name of the resource handler
        resource: String,
    },

    /// A stored binary could not be decoded as a ZIP/JAR container.
    ///
    /// Binaries are validated on upload, so this indicates corruption and is
    /// treated as a server-side failure.
    #[error("Archive decode failed: {message}")]
    DecodeError {
        /// Description of the decoding failure
        message: String,
        /// Underlying decoder error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The plugin store failed to load, save, list or delete a record.
    #[error("Plugin store error: {message}")]
    StoreError {
        /// Description of the store failure
        message: String,
        /// Underlying store error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization error.
    ///
    /// Raised when JSON or TOML conversion fails.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Configuration error.
    ///
    /// Raised when configuration is invalid, missing required fields,
    /// or contains contradictory settings.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Invalid argument error.
    ///
    /// Raised when CLI arguments or function parameters are invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Creates a validation error for `field`.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_archive_core::Error;
    ///
    /// let err = Error::validation("name", "must not be empty");
    /// assert_eq!(err.to_string(), "Validation error in name: must not be empty");
    /// ```
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if this error was caused by the caller's input.
    ///
    /// Validation errors never leave side effects in the plugin store.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_archive_core::Error;
    ///
    /// let err = Error::PayloadTooLarge { size: 10, limit: 5 };
    /// assert!(err.is_validation_error());
    /// ```
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::ValidationError { .. }
                | Self::NotAcceptable { .. }
                | Self::UnsupportedMediaType { .. }
                | Self::PayloadTooLarge { .. }
                | Self::InvalidArgument(_)
        )
    }

    /// Returns `true` if this is an archive decoding error.
    #[must_use]
    pub const fn is_decode_error(&self) -> bool {
        matches!(self, Self::DecodeError { .. })
    }

    /// Returns `true` if this is a plugin store error.
    #[must_use]
    pub const fn is_store_error(&self) -> bool {
        matches!(self, Self::StoreError { .. })
    }

    /// Returns `true` if the requested verb is not supported by the resource.
    #[must_use]
    pub const fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented { .. })
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Maps the error onto the HTTP status the host should answer with.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_archive_core::{Error, HttpStatus};
    ///
    /// let err = Error::DecodeError {
    ///     message: "truncated central directory".to_string(),
    ///     source: None,
    /// };
    /// assert_eq!(err.status(), HttpStatus::InternalServerError);
    /// ```
    #[must_use]
    pub const fn status(&self) -> HttpStatus {
        match self {
            Self::ValidationError { .. } | Self::InvalidArgument(_) => HttpStatus::BadRequest,
            Self::NotAcceptable { .. } => HttpStatus::NotAcceptable,
            Self::UnsupportedMediaType { .. } => HttpStatus::UnsupportedMediaType,
            Self::PayloadTooLarge { .. } => HttpStatus::PayloadTooLarge,
            Self::RouteNotFound { .. } => HttpStatus::NotFound,
            Self::NotImplemented { .. } => HttpStatus::NotImplemented,
            Self::DecodeError { .. }
            | Self::StoreError { .. }
            | Self::SerializationError { .. }
            | Self::ConfigError { .. } => HttpStatus::InternalServerError,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::SerializationError {
            message: source.to_string(),
            source: Some(source),
        }
    }
}

/// Result type alias for plugin archive operations.
///
/// # Examples
///
/// ```
/// use plugin_archive_core::{Result, Error};
///
/// fn checked_len(value: i64) -> Result<u64> {
///     u64::try_from(value).map_err(|_| Error::validation("size", "must be non-negative"))
/// }
///
/// assert!(checked_len(5).is_ok());
/// assert!(checked_len(-1).is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;
