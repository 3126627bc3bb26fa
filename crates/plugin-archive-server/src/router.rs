//! Maps request paths onto the plugin handlers.

use crate::context::PluginContext;
use crate::download::DownloadHandler;
use crate::handler::ResourceHandler;
use crate::list::ListHandler;
use crate::upload::UploadHandler;
use plugin_archive_core::{Error, HttpRequest, HttpResponse, Result};

/// Routes requests under the configured prefix:
///
/// | path | handler |
/// |------|---------|
/// | `{prefix}` | [`UploadHandler`] |
/// | `{prefix}/{name}/download[/{path...}]` | [`DownloadHandler`] |
/// | `{prefix}/{name}/list` | [`ListHandler`] |
///
/// The verb is dispatched by the resolved handler, so an unsupported verb on
/// a known path fails with [`Error::NotImplemented`] while an unknown path
/// fails with [`Error::RouteNotFound`].
///
/// # Examples
///
/// ```
/// use plugin_archive_core::{HttpMethod, HttpRequest, HttpStatus, ServiceConfig};
/// use plugin_archive_server::{PluginContext, PluginRouter};
/// use plugin_archive_store::MemoryPluginStore;
/// use std::sync::Arc;
///
/// let router = PluginRouter::new(PluginContext::new(
///     ServiceConfig::default(),
///     Arc::new(MemoryPluginStore::new()),
/// ));
///
/// let request = HttpRequest::new(HttpMethod::Get, "/api/plugin/unknown/download");
/// assert_eq!(router.handle(&request).unwrap().status(), HttpStatus::NoContent);
///
/// let request = HttpRequest::new(HttpMethod::Get, "/api/other");
/// assert_eq!(router.handle(&request).unwrap_err().status(), HttpStatus::NotFound);
/// ```
#[derive(Debug, Clone)]
pub struct PluginRouter {
    context: PluginContext,
    download: DownloadHandler,
    upload: UploadHandler,
    list: ListHandler,
}

impl PluginRouter {
    /// Creates a router whose handlers share `context`.
    #[must_use]
    pub fn new(context: PluginContext) -> Self {
        Self {
            download: DownloadHandler::new(context.clone()),
            upload: UploadHandler::new(context.clone()),
            list: ListHandler::new(context.clone()),
            context,
        }
    }

    /// Resolves the handler for the request path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RouteNotFound`] if no handler serves the path, or a
    /// validation error if a path segment is not UTF-8.
    pub fn route(&self, request: &HttpRequest) -> Result<&dyn ResourceHandler> {
        let segments = request.path_segments()?;
        let prefix = self.context.config().prefix_segments();

        let matches_prefix = segments.len() >= prefix.len()
            && segments.iter().zip(&prefix).all(|(segment, expected)| segment == expected);
        if !matches_prefix {
            return Err(route_not_found(request));
        }

        let rest: Vec<&str> = segments[prefix.len()..].iter().map(String::as_str).collect();
        match rest.as_slice() {
            [] => Ok(&self.upload),
            [_, DownloadHandler::ACTION, ..] => Ok(&self.download),
            [_, ListHandler::ACTION] => Ok(&self.list),
            _ => Err(route_not_found(request)),
        }
    }

    /// Routes and handles a request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RouteNotFound`] for unknown paths, otherwise whatever
    /// the handler returns.
    pub fn handle(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let handler = self.route(request)?;
        tracing::debug!(
            method = %request.method(),
            path = request.path(),
            resource = handler.resource(),
            "Routing request"
        );
        handler.handle(request)
    }
}

fn route_not_found(request: &HttpRequest) -> Error {
    Error::RouteNotFound {
        method: request.method(),
        path: request.path().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugin_archive_core::{HttpMethod, ServiceConfig};
    use plugin_archive_store::MemoryPluginStore;
    use std::sync::Arc;

    fn router(prefix: &str) -> PluginRouter {
        let config = ServiceConfig::builder().route_prefix(prefix).build();
        PluginRouter::new(PluginContext::new(config, Arc::new(MemoryPluginStore::new())))
    }

    fn resource(router: &PluginRouter, path: &str) -> Result<&'static str> {
        router
            .route(&HttpRequest::new(HttpMethod::Get, path))
            .map(|handler| handler.resource())
    }

    #[test]
    fn test_routes_under_default_prefix() {
        let router = router("/api/plugin");
        assert_eq!(resource(&router, "/api/plugin").unwrap(), "plugin upload");
        assert_eq!(resource(&router, "/api/plugin/").unwrap(), "plugin upload");
        assert_eq!(resource(&router, "/api/plugin/x/download").unwrap(), "plugin download");
        assert_eq!(
            resource(&router, "/api/plugin/x/download/a/b/c.txt").unwrap(),
            "plugin download"
        );
        assert_eq!(resource(&router, "/api/plugin/x/list").unwrap(), "plugin listing");
        assert_eq!(resource(&router, "/api/plugin/x/list?pretty").unwrap(), "plugin listing");
    }

    #[test]
    fn test_unknown_routes() {
        let router = router("/api/plugin");
        for path in [
            "/",
            "/api",
            "/api/plugins/x/list",
            "/api/plugin/x",
            "/api/plugin/x/list/extra",
            "/api/plugin/x/delete",
        ] {
            let err = resource(&router, path).unwrap_err();
            assert!(matches!(err, Error::RouteNotFound { .. }), "{path}");
        }
    }

    #[test]
    fn test_custom_prefix() {
        let router = router("/plugins");
        assert_eq!(resource(&router, "/plugins/x/list").unwrap(), "plugin listing");
        assert!(resource(&router, "/api/plugin/x/list").is_err());
    }

    #[test]
    fn test_known_route_with_unsupported_verb() {
        let router = router("/api/plugin");
        let err = router
            .handle(&HttpRequest::new(HttpMethod::Delete, "/api/plugin/x/list"))
            .unwrap_err();
        assert!(err.is_not_implemented());
    }
}
