//! Whole-archive and single-file downloads.

use crate::context::PluginContext;
use crate::handler::ResourceHandler;
use plugin_archive_core::{
    ContentDisposition, Error, HttpEntity, HttpRequest, HttpResponse, Plugin, Result,
};
use plugin_archive_vfs::{EntryName, FileExtractor};

/// Serves `GET {prefix}/{name}/download[/{path...}]`.
///
/// Without a trailing path the stored archive is returned verbatim as an
/// attachment named after the uploaded file. With a trailing path the
/// matching entry is extracted; a trailing `/` addresses a directory entry.
/// Unknown plugins and unknown entries both answer `204 No Content`.
#[derive(Debug, Clone)]
pub struct DownloadHandler {
    context: PluginContext,
}

impl DownloadHandler {
    /// Path segment that follows the plugin name.
    pub const ACTION: &'static str = "download";

    /// Creates a handler over `context`.
    #[must_use]
    pub const fn new(context: PluginContext) -> Self {
        Self { context }
    }

    /// Handles a download request.
    ///
    /// # Errors
    ///
    /// - Validation error if the plugin name or entry path is malformed, or a
    ///   path segment is not UTF-8
    /// - Store error if the plugin cannot be loaded
    /// - Decode error if the stored archive is corrupt
    pub fn download(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let segments = request.path_segments()?;
        let (name, rest) = self.context.plugin_segments(&segments, Self::ACTION)?;

        let Some(plugin) = self.context.store().load(&name)? else {
            tracing::debug!(plugin = %name, "Plugin not stored");
            return Ok(HttpResponse::no_content());
        };

        if rest.is_empty() {
            return Ok(self.whole_archive(plugin));
        }

        let mut path = format!("/{}", rest.join("/"));
        if request.has_trailing_separator() {
            path.push('/');
        }
        EntryName::with_max_len(path.as_str(), self.context.config().max_entry_name_len)?;
        self.single_file(&plugin, &path)
    }

    fn whole_archive(&self, plugin: Plugin) -> HttpResponse {
        let media_type = self
            .context
            .detector()
            .detect(&plugin.filename, &plugin.archive);
        tracing::debug!(
            plugin = %plugin.name,
            bytes = plugin.archive.len(),
            "Serving whole archive"
        );

        HttpResponse::ok(
            HttpEntity::empty()
                .with_content_type(&media_type)
                .with_content_disposition(&ContentDisposition::attachment(plugin.filename))
                .with_body(plugin.archive),
        )
    }

    fn single_file(&self, plugin: &Plugin, path: &str) -> Result<HttpResponse> {
        let extractor = FileExtractor::new(self.context.detector());
        let extracted = extractor.extract(&plugin.archive, path).map_err(|e| {
            tracing::warn!(plugin = %plugin.name, error = %e, "Stored archive failed to decode");
            Error::from(e)
        })?;

        Ok(extracted.map_or_else(HttpResponse::no_content, |file| {
            tracing::debug!(plugin = %plugin.name, entry = %file.name(), "Serving archive entry");
            HttpResponse::ok(file.into_entity())
        }))
    }
}

impl ResourceHandler for DownloadHandler {
    fn resource(&self) -> &'static str {
        "plugin download"
    }

    fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.download(request)
    }
}
