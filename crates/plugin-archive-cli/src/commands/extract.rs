//! `extract` command: one file out of a local archive.

use anyhow::{Context, Result};
use plugin_archive_core::cli::{ExitCode, OutputFormat};
use plugin_archive_server::DefaultContentTypeDetector;
use plugin_archive_vfs::FileExtractor;
use std::path::Path;
use tracing::{info, warn};

use crate::commands::common::{print_report, write_bytes};
use crate::formatters::WrittenReport;

/// Extracts `path` from `archive` into `output`, or to stdout.
///
/// A report is printed only when writing to a file. Exits with
/// [`ExitCode::NOT_FOUND`] when the archive has no such entry.
///
/// # Errors
///
/// Returns an error if the archive cannot be read or decoded, or the output
/// cannot be written.
pub fn run(
    archive: &Path,
    path: &str,
    output: Option<&Path>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let bytes =
        std::fs::read(archive).with_context(|| format!("failed to read {}", archive.display()))?;
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    let detector = DefaultContentTypeDetector;
    let extracted = FileExtractor::new(&detector)
        .extract(&bytes, &path)
        .map_err(plugin_archive_core::Error::from)
        .with_context(|| format!("failed to read {}", archive.display()))?;

    let Some(file) = extracted else {
        warn!("No entry {} in {}", path, archive.display());
        return Ok(ExitCode::NOT_FOUND);
    };

    if let Some(written) = write_bytes(file.bytes(), output)? {
        info!("Extracted {} to {}", path, written.display());
        print_report(
            &WrittenReport {
                source: path,
                output: written.display().to_string(),
                media_type: file.media_type().to_string(),
                size: file.bytes().len(),
            },
            output_format,
        )?;
    }

    Ok(ExitCode::SUCCESS)
}
