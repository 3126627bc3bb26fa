//! `download` command: a stored archive, or one file inside it.

use anyhow::{Context, Result};
use plugin_archive_core::cli::{ExitCode, OutputFormat};
use plugin_archive_core::{HttpMethod, HttpRequest, HttpStatus, MediaType};
use plugin_archive_server::StaticUserProvider;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::commands::common::{Session, print_report, write_bytes};
use crate::formatters::WrittenReport;

/// Downloads plugin `name`, or the file at `path` inside it.
///
/// Exits with [`ExitCode::NOT_FOUND`] when the service answers `204`.
///
/// # Errors
///
/// Returns an error if the request is rejected or the output cannot be
/// written.
pub fn run(
    session: &Session,
    name: &str,
    path: Option<&str>,
    output: Option<&Path>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let mut segments = vec![name, "download"];
    if let Some(path) = path {
        segments.extend(path.split('/').filter(|segment| !segment.is_empty()));
    }
    let mut target = session.request_path(segments);
    if path.is_some_and(|path| path.ends_with('/')) {
        target.push('/');
    }
    let request = HttpRequest::new(HttpMethod::Get, target);

    let response = session
        .send(Arc::new(StaticUserProvider::anonymous()), &request)
        .with_context(|| format!("failed to download {name}"))?;

    if response.status() == HttpStatus::NoContent {
        warn!("Nothing to download at {}", request.path());
        return Ok(ExitCode::NOT_FOUND);
    }

    let entity = response.entity();
    if let Some(written) = write_bytes(entity.body(), output)? {
        info!("Downloaded {} to {}", request.path(), written.display());
        print_report(
            &WrittenReport {
                source: request.path().to_string(),
                output: written.display().to_string(),
                media_type: entity
                    .content_type()
                    .unwrap_or(MediaType::APPLICATION_OCTET_STREAM)
                    .to_string(),
                size: entity.body().len(),
            },
            output_format,
        )?;
    }

    Ok(ExitCode::SUCCESS)
}
