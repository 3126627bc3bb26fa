//! HTTP boundary types.
//!
//! The service never owns a socket. The hosting framework translates its own
//! request representation into an [`HttpRequest`], invokes a handler and writes
//! the returned [`HttpResponse`] back to the client. Multipart bodies arrive
//! already decomposed into [`MultipartPart`]s.
//!
//! # Examples
//!
//! ```
//! use plugin_archive_core::{ContentDisposition, HttpEntity, HttpResponse, MediaType};
//!
//! let entity = HttpEntity::empty()
//!     .with_content_type(&MediaType::APPLICATION_OCTET_STREAM)
//!     .with_content_disposition(&ContentDisposition::attachment("plugin.jar"))
//!     .with_body(vec![0x50, 0x4b, 0x03, 0x04]);
//!
//! let response = HttpResponse::ok(entity);
//! assert_eq!(response.status().code(), 200);
//! assert_eq!(
//!     response.entity().header("content-disposition"),
//!     Some("attachment; filename=\"plugin.jar\"")
//! );
//! ```

use crate::{Error, Result};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `HEAD`
    Head,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Returns the canonical upper-case method token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(Error::InvalidArgument(format!("unknown HTTP method: '{s}'"))),
        }
    }
}

/// Response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpStatus {
    /// 200
    Ok,
    /// 204
    NoContent,
    /// 400
    BadRequest,
    /// 404
    NotFound,
    /// 406
    NotAcceptable,
    /// 413
    PayloadTooLarge,
    /// 415
    UnsupportedMediaType,
    /// 500
    InternalServerError,
    /// 501
    NotImplemented,
}

impl HttpStatus {
    /// Returns the numeric status code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NoContent => 204,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::NotAcceptable => 406,
            Self::PayloadTooLarge => 413,
            Self::UnsupportedMediaType => 415,
            Self::InternalServerError => 500,
            Self::NotImplemented => 501,
        }
    }

    /// Returns `true` for 2xx codes.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Ok | Self::NoContent)
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A media type such as `application/json` or `multipart/form-data; boundary=x`.
///
/// The raw value is kept as given; comparisons use the lower-cased
/// `type/subtype` essence and ignore parameters.
///
/// # Examples
///
/// ```
/// use plugin_archive_core::MediaType;
///
/// let produced = MediaType::APPLICATION_JSON;
/// let range: MediaType = "application/*;q=0.8".parse().unwrap();
///
/// assert!(range.accepts(&produced));
/// assert!(!MediaType::TEXT_PLAIN.accepts(&produced));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType(Cow<'static, str>);

impl MediaType {
    /// `application/octet-stream`
    pub const APPLICATION_OCTET_STREAM: Self = Self(Cow::Borrowed("application/octet-stream"));
    /// `application/json`
    pub const APPLICATION_JSON: Self = Self(Cow::Borrowed("application/json"));
    /// `application/java-archive`
    pub const APPLICATION_JAVA_ARCHIVE: Self = Self(Cow::Borrowed("application/java-archive"));
    /// `application/zip`
    pub const APPLICATION_ZIP: Self = Self(Cow::Borrowed("application/zip"));
    /// `text/plain`
    pub const TEXT_PLAIN: Self = Self(Cow::Borrowed("text/plain"));
    /// `multipart/form-data`
    pub const MULTIPART_FORM_DATA: Self = Self(Cow::Borrowed("multipart/form-data"));
    /// `*/*`
    pub const ANY: Self = Self(Cow::Borrowed("*/*"));

    /// Creates a media type from a `'static` string without validation.
    #[must_use]
    pub const fn from_static(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    /// Parses a media type, requiring a `type/subtype` essence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] if the essence is missing either half.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let essence = trimmed.split(';').next().unwrap_or_default().trim();
        match essence.split_once('/') {
            Some((kind, subtype)) if !kind.is_empty() && !subtype.is_empty() => {
                Ok(Self(Cow::Owned(trimmed.to_string())))
            }
            _ => Err(Error::validation(
                "media type",
                format!("'{value}' is not a type/subtype pair"),
            )),
        }
    }

    /// Returns the raw value including parameters.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the lower-cased `type/subtype` without parameters.
    #[must_use]
    pub fn essence(&self) -> String {
        self.0
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }

    /// Returns the value of a parameter such as `boundary` or `charset`.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.0.split(';').skip(1).find_map(|param| {
            let (key, value) = param.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().trim_matches('"'))
        })
    }

    /// Returns `true` if `self`, read as an `Accept` range, admits `produced`.
    ///
    /// A range with `q=0` admits nothing.
    #[must_use]
    pub fn accepts(&self, produced: &Self) -> bool {
        if self
            .parameter("q")
            .and_then(|q| q.parse::<f32>().ok())
            .is_some_and(|q| q <= 0.0)
        {
            return false;
        }

        let range = self.essence();
        let target = produced.essence();
        match range.split_once('/') {
            Some(("*", "*")) => true,
            Some((kind, "*")) => target.split('/').next() == Some(kind),
            _ => range == target,
        }
    }

    /// Returns `true` if both types share the same essence.
    #[must_use]
    pub fn same_essence(&self, other: &Self) -> bool {
        self.essence() == other.essence()
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Parses an `Accept` header into its media ranges, skipping malformed ones.
///
/// # Examples
///
/// ```
/// use plugin_archive_core::http::parse_accept;
///
/// let ranges = parse_accept("text/html, application/json;q=0.9, bogus");
/// assert_eq!(ranges.len(), 2);
/// ```
#[must_use]
pub fn parse_accept(header: &str) -> Vec<MediaType> {
    header
        .split(',')
        .filter(|range| !range.trim().is_empty())
        .filter_map(|range| MediaType::parse(range).ok())
        .collect()
}

/// Header names used by the service.
pub mod header {
    /// `Accept`
    pub const ACCEPT: &str = "Accept";
    /// `Content-Type`
    pub const CONTENT_TYPE: &str = "Content-Type";
    /// `Content-Disposition`
    pub const CONTENT_DISPOSITION: &str = "Content-Disposition";
    /// `Content-Length`
    pub const CONTENT_LENGTH: &str = "Content-Length";
}

/// An ordered header list with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders(Vec<(String, String)>);

impl HttpHeaders {
    /// Creates an empty header list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns the first value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Sets `name`, replacing any existing values.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.0.retain(|(key, _)| !key.eq_ignore_ascii_case(&name));
        self.0.push((name, value.into()));
    }

    /// Returns `true` if `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The disposition type of a `Content-Disposition` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispositionType {
    /// `inline`
    Inline,
    /// `attachment`
    Attachment,
    /// `form-data`
    FormData,
}

impl DispositionType {
    /// Returns the header token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Attachment => "attachment",
            Self::FormData => "form-data",
        }
    }
}

/// A parsed or constructed `Content-Disposition` header.
///
/// # Examples
///
/// ```
/// use plugin_archive_core::{ContentDisposition, DispositionType};
///
/// let parsed = ContentDisposition::parse(
///     "form-data; name=\"file\"; filename=\"plugin.jar\"",
/// ).unwrap();
///
/// assert_eq!(parsed.disposition(), DispositionType::FormData);
/// assert_eq!(parsed.name(), Some("file"));
/// assert_eq!(parsed.filename(), Some("plugin.jar"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDisposition {
    disposition: DispositionType,
    name: Option<String>,
    filename: Option<String>,
}

impl ContentDisposition {
    /// Creates an `attachment` disposition suggesting `filename`.
    #[must_use]
    pub fn attachment(filename: impl Into<String>) -> Self {
        Self {
            disposition: DispositionType::Attachment,
            name: None,
            filename: Some(filename.into()),
        }
    }

    /// Creates a `form-data` disposition for a multipart part.
    #[must_use]
    pub fn form_data(name: impl Into<String>, filename: Option<String>) -> Self {
        Self {
            disposition: DispositionType::FormData,
            name: Some(name.into()),
            filename,
        }
    }

    /// Parses a raw header value.
    ///
    /// Supports quoted and token parameter values and the RFC 5987
    /// `filename*=UTF-8''...` form, which takes precedence over `filename`.
    /// Returns `None` for an unknown disposition type.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let mut params = split_params(value).into_iter();
        let disposition = match params.next()?.trim().to_ascii_lowercase().as_str() {
            "inline" => DispositionType::Inline,
            "attachment" => DispositionType::Attachment,
            "form-data" => DispositionType::FormData,
            _ => return None,
        };

        let mut name = None;
        let mut filename = None;
        let mut extended_filename = None;

        for param in params {
            let Some((key, raw)) = param.trim().split_once('=') else {
                continue;
            };
            let raw = raw.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "name" => name = Some(unquote(raw)),
                "filename" => filename = Some(unquote(raw)),
                "filename*" => {
                    extended_filename = raw
                        .strip_prefix("UTF-8''")
                        .or_else(|| raw.strip_prefix("utf-8''"))
                        .and_then(|encoded| urlencoding::decode(encoded).ok())
                        .map(Cow::into_owned);
                }
                _ => {}
            }
        }

        Some(Self {
            disposition,
            name,
            filename: extended_filename.or(filename).filter(|f| !f.is_empty()),
        })
    }

    /// Returns the disposition type.
    #[must_use]
    pub const fn disposition(&self) -> DispositionType {
        self.disposition
    }

    /// Returns the `name` parameter.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the suggested filename.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Renders the header value.
    ///
    /// Quoted values never contain control characters; each is replaced by
    /// `_`. Filenames that are not plain printable ASCII additionally carry an
    /// RFC 5987 `filename*` parameter holding the exact name.
    #[must_use]
    pub fn header_value(&self) -> String {
        let mut value = self.disposition.as_str().to_string();
        if let Some(name) = &self.name {
            value.push_str("; name=\"");
            value.push_str(&escape_quoted(name));
            value.push('"');
        }
        if let Some(filename) = &self.filename {
            value.push_str("; filename=\"");
            value.push_str(&escape_quoted(filename));
            value.push('"');
            if filename.chars().any(|c| !c.is_ascii() || c.is_ascii_control()) {
                value.push_str("; filename*=UTF-8''");
                value.push_str(&urlencoding::encode(filename));
            }
        }
        value
    }
}

impl fmt::Display for ContentDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header_value())
    }
}

/// Splits a header value on `;` outside quoted strings.
fn split_params(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;
    for (index, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                params.push(&value[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    params.push(&value[start..]);
    params
}

fn unquote(raw: &str) -> String {
    let Some(inner) = raw.strip_prefix('"').and_then(|inner| inner.strip_suffix('"')) else {
        return raw.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.extend(chars.next());
        } else {
            out.push(c);
        }
    }
    out
}

fn escape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '"' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push('_'),
            c => out.push(c),
        }
    }
    out
}

/// Headers plus body bytes: a request part or a response payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpEntity {
    headers: HttpHeaders,
    body: Vec<u8>,
}

/// One part of a decomposed `multipart/form-data` body.
pub type MultipartPart = HttpEntity;

impl HttpEntity {
    /// Creates an entity with no headers and no body.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            headers: HttpHeaders::new(),
            body: Vec::new(),
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets `Content-Type`.
    #[must_use]
    pub fn with_content_type(self, media_type: &MediaType) -> Self {
        self.with_header(header::CONTENT_TYPE, media_type.as_str())
    }

    /// Sets `Content-Disposition`.
    #[must_use]
    pub fn with_content_disposition(self, disposition: &ContentDisposition) -> Self {
        self.with_header(header::CONTENT_DISPOSITION, disposition.header_value())
    }

    /// Sets the body and its `Content-Length`.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.headers
            .insert(header::CONTENT_LENGTH, body.len().to_string());
        self.body = body;
        self
    }

    /// Returns the header list.
    #[must_use]
    pub const fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    /// Returns the first value of header `name`.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Returns the parsed `Content-Type`, if present and well formed.
    #[must_use]
    pub fn content_type(&self) -> Option<MediaType> {
        self.header(header::CONTENT_TYPE)
            .and_then(|value| MediaType::parse(value).ok())
    }

    /// Returns the parsed `Content-Disposition`, if present and well formed.
    #[must_use]
    pub fn content_disposition(&self) -> Option<ContentDisposition> {
        self.header(header::CONTENT_DISPOSITION)
            .and_then(ContentDisposition::parse)
    }

    /// Returns the body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consumes the entity, returning the body bytes.
    #[must_use]
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Returns `true` if there are no headers and no body.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.body.is_empty()
    }
}

/// A request body as handed over by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HttpBody {
    /// No body.
    #[default]
    Empty,
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// A multipart body already split into parts.
    Multipart(Vec<MultipartPart>),
}

/// An incoming request.
///
/// # Examples
///
/// ```
/// use plugin_archive_core::{HttpMethod, HttpRequest};
///
/// let request = HttpRequest::new(HttpMethod::Get, "/api/plugin/demo/download/META-INF/MANIFEST.MF")
///     .with_header("Accept", "*/*");
///
/// assert_eq!(
///     request.path_segments().unwrap(),
///     ["api", "plugin", "demo", "download", "META-INF", "MANIFEST.MF"]
/// );
/// assert_eq!(request.accept(), Some("*/*"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    method: HttpMethod,
    path: String,
    headers: HttpHeaders,
    body: HttpBody,
}

impl HttpRequest {
    /// Creates a request without headers or body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HttpHeaders::new(),
            body: HttpBody::Empty,
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: HttpBody) -> Self {
        self.body = body;
        self
    }

    /// Returns the method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the raw path, possibly including a query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the percent-decoded, non-empty path segments, query excluded.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a segment does not decode to UTF-8.
    pub fn path_segments(&self) -> Result<Vec<String>> {
        self.route_path()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                urlencoding::decode(segment)
                    .map(Cow::into_owned)
                    .map_err(|e| {
                        Error::validation("path", format!("'{segment}' is not UTF-8: {e}"))
                    })
            })
            .collect()
    }

    /// Returns `true` if the path, query excluded, ends with `/`.
    #[must_use]
    pub fn has_trailing_separator(&self) -> bool {
        self.route_path().ends_with('/')
    }

    fn route_path(&self) -> &str {
        self.path.split(['?', '#']).next().unwrap_or_default()
    }

    /// Returns the header list.
    #[must_use]
    pub const fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    /// Returns the raw `Accept` header.
    #[must_use]
    pub fn accept(&self) -> Option<&str> {
        self.headers.get(header::ACCEPT)
    }

    /// Returns the parsed `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<MediaType> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| MediaType::parse(value).ok())
    }

    /// Returns the body.
    #[must_use]
    pub const fn body(&self) -> &HttpBody {
        &self.body
    }
}

/// An outgoing response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: HttpStatus,
    entity: HttpEntity,
}

impl HttpResponse {
    /// Creates a response with an explicit status.
    #[must_use]
    pub const fn new(status: HttpStatus, entity: HttpEntity) -> Self {
        Self { status, entity }
    }

    /// `200 OK` carrying `entity`.
    #[must_use]
    pub const fn ok(entity: HttpEntity) -> Self {
        Self::new(HttpStatus::Ok, entity)
    }

    /// `204 No Content` with an empty entity.
    #[must_use]
    pub const fn no_content() -> Self {
        Self::new(HttpStatus::NoContent, HttpEntity::empty())
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> HttpStatus {
        self.status
    }

    /// Returns the entity.
    #[must_use]
    pub const fn entity(&self) -> &HttpEntity {
        &self.entity
    }

    /// Consumes the response, returning the entity.
    #[must_use]
    pub fn into_entity(self) -> HttpEntity {
        self.entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_round_trip() {
        for method in [
            HttpMethod::Get,
            HttpMethod::Head,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Patch,
            HttpMethod::Delete,
        ] {
            assert_eq!(method.as_str().parse::<HttpMethod>().unwrap(), method);
        }
        assert!("BREW".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_media_type_parse_rejects_missing_subtype() {
        assert!(MediaType::parse("application").is_err());
        assert!(MediaType::parse("application/").is_err());
        assert!(MediaType::parse("/json").is_err());
    }

    #[test]
    fn test_media_type_essence_ignores_parameters_and_case() {
        let media_type = MediaType::parse("Multipart/Form-Data; boundary=abc").unwrap();
        assert_eq!(media_type.essence(), "multipart/form-data");
        assert_eq!(media_type.parameter("boundary"), Some("abc"));
        assert!(media_type.same_essence(&MediaType::MULTIPART_FORM_DATA));
    }

    #[test]
    fn test_accept_ranges() {
        let json = MediaType::APPLICATION_JSON;
        assert!(MediaType::ANY.accepts(&json));
        assert!(MediaType::parse("application/*").unwrap().accepts(&json));
        assert!(MediaType::parse("application/json; charset=utf-8").unwrap().accepts(&json));
        assert!(!MediaType::parse("text/*").unwrap().accepts(&json));
        assert!(!MediaType::parse("application/json;q=0").unwrap().accepts(&json));
    }

    #[test]
    fn test_parse_accept_skips_malformed() {
        let ranges = parse_accept("text/html, , nonsense, */*;q=0.1");
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[1].essence(), "*/*");
    }

    #[test]
    fn test_headers_case_insensitive_replace() {
        let mut headers = HttpHeaders::new();
        headers.insert("Content-Type", "text/plain");
        headers.insert("content-type", "application/json");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn test_content_disposition_attachment_rendering() {
        let disposition = ContentDisposition::attachment("/META-INF/MANIFEST.MF");
        assert_eq!(
            disposition.header_value(),
            "attachment; filename=\"/META-INF/MANIFEST.MF\""
        );
    }

    #[test]
    fn test_content_disposition_escapes_quotes() {
        let disposition = ContentDisposition::attachment("odd\"name.txt");
        let rendered = disposition.header_value();
        assert_eq!(rendered, "attachment; filename=\"odd\\\"name.txt\"");

        let parsed = ContentDisposition::parse(&rendered).unwrap();
        assert_eq!(parsed.filename(), Some("odd\"name.txt"));
    }

    #[test]
    fn test_content_disposition_non_ascii_round_trip() {
        let disposition = ContentDisposition::attachment("café.txt");
        let rendered = disposition.header_value();
        assert!(rendered.contains("filename*=UTF-8''caf%C3%A9.txt"));

        let parsed = ContentDisposition::parse(&rendered).unwrap();
        assert_eq!(parsed.filename(), Some("café.txt"));
    }

    #[test]
    fn test_content_disposition_without_filename() {
        let parsed = ContentDisposition::parse("form-data; name=\"comment\"").unwrap();
        assert_eq!(parsed.name(), Some("comment"));
        assert_eq!(parsed.filename(), None);
        assert!(ContentDisposition::parse("bogus; filename=x").is_none());
    }

    #[test]
    fn test_path_segments_reject_invalid_utf8() {
        let request = HttpRequest::new(HttpMethod::Get, "/api/plugin/p/download/a%FF");
        let err = request.path_segments().unwrap_err();
        assert!(err.is_validation_error());

        let request = HttpRequest::new(HttpMethod::Get, "/api/plugin/p/download/caf%C3%A9");
        assert_eq!(request.path_segments().unwrap()[4], "café");
    }

    #[test]
    fn test_trailing_separator_ignores_query() {
        assert!(HttpRequest::new(HttpMethod::Get, "/a/META-INF/?x=1").has_trailing_separator());
        assert!(!HttpRequest::new(HttpMethod::Get, "/a/META-INF?x=/").has_trailing_separator());
    }

    #[test]
    fn test_content_disposition_semicolon_in_quoted_filename() {
        let parsed = ContentDisposition::parse(
            "form-data; name=\"file\"; filename=\"my;plugin.jar\"",
        )
        .unwrap();
        assert_eq!(parsed.name(), Some("file"));
        assert_eq!(parsed.filename(), Some("my;plugin.jar"));

        let parsed = ContentDisposition::parse(r#"attachment; filename="a\";b.jar""#).unwrap();
        assert_eq!(parsed.filename(), Some("a\";b.jar"));
    }

    #[test]
    fn test_content_disposition_never_renders_control_characters() {
        let disposition = ContentDisposition::attachment("/a\r\nSet-Cookie: x");
        let rendered = disposition.header_value();
        assert!(!rendered.contains('\r'));
        assert!(!rendered.contains('\n'));
        assert!(rendered.contains("filename=\"/a__Set-Cookie: x\""));
        assert!(rendered.contains("filename*=UTF-8''%2Fa%0D%0ASet-Cookie%3A%20x"));

        let parsed = ContentDisposition::parse(&rendered).unwrap();
        assert_eq!(parsed.filename(), Some("/a\r\nSet-Cookie: x"));
    }

    #[test]
    fn test_entity_with_body_sets_length() {
        let entity = HttpEntity::empty().with_body(vec![1, 2, 3]);
        assert_eq!(entity.header("content-length"), Some("3"));
        assert_eq!(entity.body(), &[1, 2, 3]);
    }

    #[test]
    fn test_request_path_segments_strip_query_and_decode() {
        let request = HttpRequest::new(HttpMethod::Get, "/api//plugin/my%20plugin/list?x=1");
        assert_eq!(request.path_segments().unwrap(), ["api", "plugin", "my plugin", "list"]);
    }

    #[test]
    fn test_no_content_response() {
        let response = HttpResponse::no_content();
        assert_eq!(response.status(), HttpStatus::NoContent);
        assert!(response.status().is_success());
        assert!(response.entity().is_empty());
    }
}
