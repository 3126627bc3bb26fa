//! Command implementations for the plugin archive CLI.
//!
//! `list` and `extract` read archive files directly. The remaining commands
//! open a [`common::Session`] and go through the plugin handlers.

pub mod common;
pub mod download;
pub mod extract;
pub mod list;
pub mod plugins;
pub mod remove;
pub mod upload;
