//! `upload` command: store a local archive.

use anyhow::{Context, Result};
use plugin_archive_core::cli::{ExitCode, OutputFormat};
use plugin_archive_core::http::header;
use plugin_archive_core::traits::UserProvider;
use plugin_archive_core::{ContentDisposition, HttpBody, HttpEntity, HttpMethod, HttpRequest, MediaType};
use plugin_archive_server::{EnvUserProvider, StaticUserProvider};
use plugin_archive_vfs::Manifest;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::commands::common::{Session, print_report};
use crate::formatters::StoreReport;

/// Uploads `archive` as if it were posted to the service.
///
/// The plugin name comes from the archive manifest; an existing plugin with
/// that name is replaced.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the upload is rejected.
pub fn run(
    session: &Session,
    archive: &Path,
    user: Option<String>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let bytes =
        std::fs::read(archive).with_context(|| format!("failed to read {}", archive.display()))?;
    let filename = archive
        .file_name()
        .map_or_else(|| archive.display().to_string(), |n| n.to_string_lossy().into_owned());

    let users: Arc<dyn UserProvider> = match user {
        Some(user) => Arc::new(StaticUserProvider::new(user)),
        None => Arc::new(EnvUserProvider::default()),
    };

    let part = HttpEntity::empty()
        .with_content_disposition(&ContentDisposition::form_data("file", Some(filename.clone())))
        .with_content_type(&MediaType::APPLICATION_JAVA_ARCHIVE)
        .with_body(bytes);
    let request = HttpRequest::new(HttpMethod::Post, session.request_path(std::iter::empty()))
        .with_header(header::CONTENT_TYPE, MediaType::MULTIPART_FORM_DATA.as_str())
        .with_body(HttpBody::Multipart(vec![part]));

    let response = session
        .send(users, &request)
        .with_context(|| format!("failed to upload {filename}"))?;

    let stored = response.entity().body();
    let attribute = &session.config().manifest_name_attribute;
    let name = Manifest::from_archive(stored)
        .ok()
        .and_then(|manifest| manifest.require(attribute).ok().map(String::from))
        .unwrap_or_else(|| filename.clone());

    info!("Uploaded {} as plugin {}", filename, name);
    print_report(
        &StoreReport {
            action: "uploaded",
            name,
            size: Some(stored.len()),
        },
        output_format,
    )?;
    Ok(ExitCode::SUCCESS)
}
