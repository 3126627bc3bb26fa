//! Core types, traits, and errors for the plugin archive service.
//!
//! This crate provides the foundational types shared by every other crate in
//! the workspace.
//!
//! # Architecture
//!
//! The core consists of:
//! - Strong domain types (`PluginName`, `UserId`, `Plugin`)
//! - Error hierarchy with HTTP status mapping
//! - HTTP boundary types supplied to handlers by the host framework
//! - Collaborator traits for storage, content type detection, time and users
//! - Service configuration

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;
mod types;

pub mod cli;
pub mod http;
pub mod traits;

pub use config::{
    DEFAULT_MANIFEST_NAME_ATTRIBUTE, DEFAULT_MAX_ENTRY_NAME_LEN, DEFAULT_MAX_UPLOAD_BYTES,
    DEFAULT_ROUTE_PREFIX, ServiceConfig, ServiceConfigBuilder,
};
pub use error::{Error, Result};
pub use http::{
    ContentDisposition, DispositionType, HttpBody, HttpEntity, HttpHeaders, HttpMethod,
    HttpRequest, HttpResponse, HttpStatus, MediaType, MultipartPart,
};
pub use types::{MAX_PLUGIN_NAME_LEN, Plugin, PluginName, PluginSummary, UserId};
