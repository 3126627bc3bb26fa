//! Content-negotiated entry listing.

use crate::context::PluginContext;
use crate::handler::ResourceHandler;
use plugin_archive_core::http::parse_accept;
use plugin_archive_core::{Error, HttpEntity, HttpRequest, HttpResponse, MediaType, Result};
use plugin_archive_vfs::list_entries;

/// Serves `GET {prefix}/{name}/list`.
///
/// Answers with the JSON entry list of the stored archive, in physical
/// order, typed with the configured listing media type.
#[derive(Debug, Clone)]
pub struct ListHandler {
    context: PluginContext,
}

impl ListHandler {
    /// Path segment that follows the plugin name.
    pub const ACTION: &'static str = "list";

    /// Creates a handler over `context`.
    #[must_use]
    pub const fn new(context: PluginContext) -> Self {
        Self { context }
    }

    /// Handles a listing request.
    ///
    /// # Errors
    ///
    /// - [`Error::NotAcceptable`] if the caller does not accept the listing type
    /// - Validation error if the plugin name is malformed
    /// - Decode error if the stored archive is corrupt
    pub fn list(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let produced = self.context.config().listing_media_type()?;
        negotiate(request.accept(), &produced)?;

        let segments = request.path_segments()?;
        let (name, _) = self.context.plugin_segments(&segments, Self::ACTION)?;

        let Some(plugin) = self.context.store().load(&name)? else {
            tracing::debug!(plugin = %name, "Plugin not stored");
            return Ok(HttpResponse::no_content());
        };

        let entries = list_entries(&plugin.archive)?;
        tracing::debug!(plugin = %name, entries = entries.len(), "Listed archive entries");

        let body = serde_json::to_vec(&entries)?;
        Ok(HttpResponse::ok(
            HttpEntity::empty()
                .with_content_type(&produced)
                .with_body(body),
        ))
    }
}

impl ResourceHandler for ListHandler {
    fn resource(&self) -> &'static str {
        "plugin listing"
    }

    fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.list(request)
    }
}

/// Accepts an absent or blank header, or one with a range admitting `produced`.
fn negotiate(accept: Option<&str>, produced: &MediaType) -> Result<()> {
    let Some(header) = accept.filter(|value| !value.trim().is_empty()) else {
        return Ok(());
    };
    if parse_accept(header)
        .iter()
        .any(|range| range.accepts(produced))
    {
        return Ok(());
    }
    Err(Error::NotAcceptable {
        accept: header.to_string(),
        required: produced.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiate_accepts_wildcards_and_absence() {
        let json = MediaType::APPLICATION_JSON;
        for accept in [
            None,
            Some(""),
            Some("*/*"),
            Some("application/*"),
            Some("application/json"),
            Some("text/html, application/json;q=0.5"),
            Some("Application/JSON"),
        ] {
            assert!(negotiate(accept, &json).is_ok(), "{accept:?}");
        }
    }

    #[test]
    fn test_negotiate_rejects_other_types() {
        let json = MediaType::APPLICATION_JSON;
        for accept in ["text/html", "text/*", "application/json;q=0", "garbage"] {
            let err = negotiate(Some(accept), &json).unwrap_err();
            assert!(err.is_validation_error(), "{accept}");
            assert!(matches!(err, Error::NotAcceptable { .. }));
        }
    }
}
