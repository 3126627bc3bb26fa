//! HTTP handlers for stored plugin archives.
//!
//! Uploaded plugins are kept as opaque archive bytes. These handlers expose a
//! read-through view of their contents without ever unpacking them to disk:
//!
//! 1. **[`UploadHandler`]** - accepts a multipart JAR, reads its identifier
//!    from the manifest and stores it
//! 2. **[`DownloadHandler`]** - returns the whole archive or one file inside it
//! 3. **[`ListHandler`]** - returns the JSON entry list of an archive
//!
//! [`PluginRouter`] maps request paths onto the handlers. Every handler is a
//! synchronous function of the request and the current store contents; the
//! archive is decoded again on every request.
//!
//! # Examples
//!
//! ```
//! use plugin_archive_core::{
//!     ContentDisposition, HttpBody, HttpEntity, HttpMethod, HttpRequest, HttpStatus,
//!     ServiceConfig,
//! };
//! use plugin_archive_server::{PluginContext, PluginRouter, StaticUserProvider};
//! use plugin_archive_store::MemoryPluginStore;
//! use std::io::{Cursor, Write};
//! use std::sync::Arc;
//!
//! let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
//! writer.start_file("META-INF/MANIFEST.MF", zip::write::SimpleFileOptions::default()).unwrap();
//! writer.write_all(b"Manifest-Version: 1.0\r\nPlugin-Name: formatters\r\n").unwrap();
//! let jar = writer.finish().unwrap().into_inner();
//!
//! let context = PluginContext::new(ServiceConfig::default(), Arc::new(MemoryPluginStore::new()))
//!     .with_users(Arc::new(StaticUserProvider::new("admin")));
//! let router = PluginRouter::new(context);
//!
//! let part = HttpEntity::empty()
//!     .with_content_disposition(&ContentDisposition::form_data("file", Some("formatters.jar".into())))
//!     .with_body(jar.clone());
//! let upload = HttpRequest::new(HttpMethod::Post, "/api/plugin")
//!     .with_header("Content-Type", "multipart/form-data; boundary=x")
//!     .with_body(HttpBody::Multipart(vec![part]));
//! assert_eq!(router.handle(&upload).unwrap().status(), HttpStatus::Ok);
//!
//! let download = HttpRequest::new(HttpMethod::Get, "/api/plugin/formatters/download");
//! assert_eq!(router.handle(&download).unwrap().entity().body(), jar.as_slice());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod context;
mod detector;
mod download;
mod handler;
mod list;
mod providers;
mod router;
mod upload;

pub use context::PluginContext;
pub use detector::DefaultContentTypeDetector;
pub use download::DownloadHandler;
pub use handler::ResourceHandler;
pub use list::ListHandler;
pub use providers::{
    DEFAULT_USER_VARS, EnvUserProvider, FixedClock, StaticUserProvider, SystemClock,
};
pub use router::PluginRouter;
pub use upload::UploadHandler;
