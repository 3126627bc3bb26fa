//! Read-through virtual filesystem over ZIP/JAR archives.
//!
//! Archives are kept as opaque bytes. Every operation decodes them again on
//! demand; no unpacked copy or index of their contents is ever stored.
//!
//! # Components
//!
//! - [`EntryName`] - validated entry path with manifest-first ordering
//! - [`EntryInfo`] / [`EntryList`] - entry metadata in physical archive order
//! - [`ArchiveReader`] - listing and raw entry access
//! - [`FileExtractor`] - single-file extraction into a response entity
//! - [`Manifest`] - JAR manifest main-section attributes
//!
//! # Examples
//!
//! ```
//! use plugin_archive_vfs::{list_entries, Manifest};
//! use std::io::{Cursor, Write};
//!
//! let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
//! let options = zip::write::SimpleFileOptions::default();
//! writer.start_file("META-INF/MANIFEST.MF", options).unwrap();
//! writer.write_all(b"Manifest-Version: 1.0\nPlugin-Name: demo\n").unwrap();
//! writer.start_file("demo/Main.class", options).unwrap();
//! writer.write_all(&[0xCA, 0xFE, 0xBA, 0xBE]).unwrap();
//! let jar = writer.finish().unwrap().into_inner();
//!
//! let entries = list_entries(&jar).unwrap();
//! assert_eq!(entries.len(), 2);
//!
//! let manifest = Manifest::from_archive(&jar).unwrap();
//! assert_eq!(manifest.require("Plugin-Name").unwrap(), "demo");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod entry_info;
mod entry_list;
mod error;
mod extractor;
mod manifest;
mod reader;

pub mod entry_name;

pub use entry_info::EntryInfo;
pub use entry_list::EntryList;
pub use entry_name::{EntryName, MANIFEST_PATH, MAX_ENTRY_NAME_LEN};
pub use error::{ArchiveError, Result};
pub use extractor::{ExtractedFile, FileExtractor};
pub use manifest::Manifest;
pub use reader::{ArchiveReader, list_entries};
