//! Verb dispatch shared by every resource handler.

use plugin_archive_core::{Error, HttpMethod, HttpRequest, HttpResponse, Result};

/// A resource answering some subset of HTTP verbs.
///
/// Every verb has a default that fails with [`Error::NotImplemented`], so a
/// handler only overrides what it supports and unsupported verbs fail the
/// same way everywhere.
///
/// # Examples
///
/// ```
/// use plugin_archive_core::{HttpEntity, HttpMethod, HttpRequest, HttpResponse, Result};
/// use plugin_archive_server::ResourceHandler;
///
/// struct Ping;
///
/// impl ResourceHandler for Ping {
///     fn resource(&self) -> &'static str {
///         "ping"
///     }
///
///     fn get(&self, _request: &HttpRequest) -> Result<HttpResponse> {
///         Ok(HttpResponse::ok(HttpEntity::empty().with_body(b"pong".to_vec())))
///     }
/// }
///
/// let get = HttpRequest::new(HttpMethod::Get, "/ping");
/// assert!(Ping.handle(&get).is_ok());
///
/// let delete = HttpRequest::new(HttpMethod::Delete, "/ping");
/// assert!(Ping.handle(&delete).unwrap_err().is_not_implemented());
/// ```
pub trait ResourceHandler: Send + Sync {
    /// Name used in error messages.
    fn resource(&self) -> &'static str;

    /// Handles `GET`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotImplemented`] unless overridden.
    fn get(&self, _request: &HttpRequest) -> Result<HttpResponse> {
        Err(not_implemented(HttpMethod::Get, self.resource()))
    }

    /// Handles `HEAD`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotImplemented`] unless overridden.
    fn head(&self, _request: &HttpRequest) -> Result<HttpResponse> {
        Err(not_implemented(HttpMethod::Head, self.resource()))
    }

    /// Handles `POST`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotImplemented`] unless overridden.
    fn post(&self, _request: &HttpRequest) -> Result<HttpResponse> {
        Err(not_implemented(HttpMethod::Post, self.resource()))
    }

    /// Handles `PUT`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotImplemented`] unless overridden.
    fn put(&self, _request: &HttpRequest) -> Result<HttpResponse> {
        Err(not_implemented(HttpMethod::Put, self.resource()))
    }

    /// Handles `PATCH`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotImplemented`] unless overridden.
    fn patch(&self, _request: &HttpRequest) -> Result<HttpResponse> {
        Err(not_implemented(HttpMethod::Patch, self.resource()))
    }

    /// Handles `DELETE`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotImplemented`] unless overridden.
    fn delete(&self, _request: &HttpRequest) -> Result<HttpResponse> {
        Err(not_implemented(HttpMethod::Delete, self.resource()))
    }

    /// Dispatches on the request method.
    ///
    /// # Errors
    ///
    /// Propagates the error of the verb method.
    fn handle(&self, request: &HttpRequest) -> Result<HttpResponse> {
        match request.method() {
            HttpMethod::Get => self.get(request),
            HttpMethod::Head => self.head(request),
            HttpMethod::Post => self.post(request),
            HttpMethod::Put => self.put(request),
            HttpMethod::Patch => self.patch(request),
            HttpMethod::Delete => self.delete(request),
        }
    }
}

fn not_implemented(method: HttpMethod, resource: &str) -> Error {
    Error::NotImplemented {
        method,
        resource: resource.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugin_archive_core::HttpStatus;

    struct Nothing;

    impl ResourceHandler for Nothing {
        fn resource(&self) -> &'static str {
            "nothing"
        }
    }

    #[test]
    fn test_every_default_verb_is_not_implemented() {
        for method in [
            HttpMethod::Get,
            HttpMethod::Head,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Patch,
            HttpMethod::Delete,
        ] {
            let err = Nothing.handle(&HttpRequest::new(method, "/x")).unwrap_err();
            assert!(err.is_not_implemented());
            assert_eq!(err.status(), HttpStatus::NotImplemented);
            assert!(err.to_string().contains(method.as_str()));
            assert!(err.to_string().contains("nothing"));
        }
    }
}
