//! Multipart plugin upload.

use crate::context::PluginContext;
use crate::handler::ResourceHandler;
use plugin_archive_core::{
    Error, HttpBody, HttpEntity, HttpRequest, HttpResponse, MediaType, MultipartPart, Plugin,
    PluginName, Result,
};
use plugin_archive_vfs::{ArchiveError, Manifest};

/// Serves `POST {prefix}` with a `multipart/form-data` body.
///
/// The first part carrying a filename is taken as the archive. Its manifest
/// names the plugin; the archive is stored under that name, replacing any
/// earlier upload. Every check completes before the store is touched.
#[derive(Debug, Clone)]
pub struct UploadHandler {
    context: PluginContext,
}

impl UploadHandler {
    /// Creates a handler over `context`.
    #[must_use]
    pub const fn new(context: PluginContext) -> Self {
        Self { context }
    }

    /// Handles an upload request.
    ///
    /// Answers `200` with the stored bytes as `application/octet-stream`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedMediaType`] if the body is not `multipart/form-data`
    /// - [`Error::PayloadTooLarge`] if the file exceeds the configured limit
    /// - Validation error if no part has a filename, the file is not a JAR,
    ///   the manifest or its identifier attribute is missing, or there is no
    ///   current user
    /// - Store error if the plugin cannot be saved
    pub fn upload(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let content_type = request.content_type();
        if !content_type
            .as_ref()
            .is_some_and(|found| found.same_essence(&MediaType::MULTIPART_FORM_DATA))
        {
            return Err(Error::UnsupportedMediaType {
                found: content_type.as_ref().map_or_else(|| "none".to_string(), ToString::to_string),
                expected: MediaType::MULTIPART_FORM_DATA.to_string(),
            });
        }

        let (filename, part) = file_part(request.body())?;
        let archive = part.body();

        let limit = self.context.config().max_upload_bytes;
        let size = archive.len() as u64;
        if size > limit {
            return Err(Error::PayloadTooLarge { size, limit });
        }

        let name = self.plugin_name(archive)?;
        let user = self
            .context
            .users()
            .current_user()
            .ok_or_else(|| Error::validation("user", "no current user"))?;

        let plugin = Plugin {
            name,
            filename,
            archive: archive.to_vec(),
            user,
            timestamp: self.context.clock().now(),
        };
        let stored = self.context.store().save(plugin)?;
        tracing::info!(
            plugin = %stored.name,
            filename = %stored.filename,
            user = %stored.user,
            bytes = stored.archive.len(),
            "Stored uploaded plugin"
        );

        Ok(HttpResponse::ok(
            HttpEntity::empty()
                .with_content_type(&MediaType::APPLICATION_OCTET_STREAM)
                .with_body(stored.archive),
        ))
    }

    /// Reads the plugin identifier from the archive manifest.
    fn plugin_name(&self, archive: &[u8]) -> Result<PluginName> {
        let manifest = Manifest::from_archive(archive).map_err(rejected_archive)?;
        let attribute = &self.context.config().manifest_name_attribute;
        let value = manifest.require(attribute).map_err(rejected_archive)?;
        PluginName::new(value)
    }
}

impl ResourceHandler for UploadHandler {
    fn resource(&self) -> &'static str {
        "plugin upload"
    }

    fn post(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.upload(request)
    }
}

/// Returns the first part whose disposition carries a filename.
fn file_part(body: &HttpBody) -> Result<(String, &MultipartPart)> {
    let HttpBody::Multipart(parts) = body else {
        return Err(file_missing());
    };
    parts
        .iter()
        .find_map(|part| {
            let filename = part.content_disposition()?.filename()?.to_string();
            Some((filename, part))
        })
        .ok_or_else(file_missing)
}

fn file_missing() -> Error {
    Error::validation("file", "File missing")
}

/// Decode failures of uploaded bytes are validation errors.
fn rejected_archive(error: ArchiveError) -> Error {
    if error.is_decode() {
        Error::validation("file", format!("not a JAR archive: {error}"))
    } else {
        error.into()
    }
}
