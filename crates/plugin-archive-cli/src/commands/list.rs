//! `list` command: entries of a local archive.

use anyhow::{Context, Result};
use plugin_archive_core::cli::{ExitCode, OutputFormat};
use plugin_archive_vfs::list_entries;
use std::path::Path;
use tracing::info;

use crate::commands::common::print_report;
use crate::formatters::EntryReport;

/// Lists the entries of `archive`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a ZIP/JAR archive.
pub fn run(archive: &Path, sorted: bool, output_format: OutputFormat) -> Result<ExitCode> {
    let bytes =
        std::fs::read(archive).with_context(|| format!("failed to read {}", archive.display()))?;

    let mut entries = list_entries(&bytes)
        .map_err(plugin_archive_core::Error::from)
        .with_context(|| format!("failed to list {}", archive.display()))?;
    if sorted {
        entries = entries.sorted();
    }

    info!("Listed {} entries of {}", entries.len(), archive.display());
    print_report(&EntryReport(entries), output_format)?;
    Ok(ExitCode::SUCCESS)
}
