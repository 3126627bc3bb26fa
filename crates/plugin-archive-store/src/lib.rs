//! Plugin persistence for the plugin archive service.
//!
//! Two [`PluginStore`](plugin_archive_core::traits::PluginStore)
//! implementations are provided:
//!
//! - [`FsPluginStore`] keeps each plugin in its own directory, with a
//!   Blake3 checksum verified on every load
//! - [`MemoryPluginStore`] keeps everything in a map, for tests and embedding
//!
//! Both are last-writer-wins: saving under an existing name replaces the
//! previous record.
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use plugin_archive_core::traits::PluginStore;
//! use plugin_archive_core::{Plugin, PluginName, UserId};
//! use plugin_archive_store::FsPluginStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::tempdir()?;
//! let store = FsPluginStore::new(dir.path())?;
//!
//! let name = PluginName::new("formatters")?;
//! store.save(Plugin {
//!     name: name.clone(),
//!     filename: "formatters.jar".to_string(),
//!     archive: vec![0x50, 0x4b, 0x05, 0x06],
//!     user: UserId::new("admin"),
//!     timestamp: Utc::now(),
//! })?;
//!
//! for summary in store.list()? {
//!     println!("{} ({} bytes)", summary.name, summary.size);
//! }
//!
//! store.delete(&name)?;
//! assert!(store.load(&name)?.is_none());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod checksum;
mod error;
mod memory;
mod store;

pub use checksum::Checksum;
pub use error::{PluginStoreError, Result};
pub use memory::MemoryPluginStore;
pub use store::{ARCHIVE_EXTENSION, FORMAT_VERSION, FsPluginStore, METADATA_FILE, PluginMetadata};
