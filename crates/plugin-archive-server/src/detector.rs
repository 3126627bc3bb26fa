//! Default content type detection.

use content_inspector::ContentType;
use plugin_archive_core::MediaType;
use plugin_archive_core::traits::ContentTypeDetector;

/// Extension to media type table. Keys are lower case, without the dot.
const EXTENSIONS: &[(&str, &str)] = &[
    ("class", "application/java-vm"),
    ("jar", "application/java-archive"),
    ("war", "application/java-archive"),
    ("zip", "application/zip"),
    ("txt", "text/plain"),
    ("mf", "text/plain"),
    ("properties", "text/plain"),
    ("java", "text/x-java-source"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "text/javascript"),
    ("csv", "text/csv"),
    ("md", "text/markdown"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("pdf", "application/pdf"),
];

/// Detects media types from the file extension, sniffing the bytes when the
/// extension is unknown.
///
/// Sniffed text is `text/plain`; anything else is
/// `application/octet-stream`.
///
/// # Examples
///
/// ```
/// use plugin_archive_core::MediaType;
/// use plugin_archive_core::traits::ContentTypeDetector;
/// use plugin_archive_server::DefaultContentTypeDetector;
///
/// let detector = DefaultContentTypeDetector;
/// assert_eq!(detector.detect("/com/example/Main.class", b"\xca\xfe\xba\xbe").as_str(), "application/java-vm");
/// assert_eq!(detector.detect("LICENSE", b"MIT License"), MediaType::TEXT_PLAIN);
/// assert_eq!(detector.detect("blob", b"\x00\x01\x02"), MediaType::APPLICATION_OCTET_STREAM);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultContentTypeDetector;

impl DefaultContentTypeDetector {
    /// Looks up the media type for the extension of `filename`, if known.
    #[must_use]
    pub fn by_extension(filename: &str) -> Option<MediaType> {
        let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
        let (stem, extension) = base.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        EXTENSIONS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(extension))
            .map(|&(_, media_type)| MediaType::from_static(media_type))
    }

    /// Classifies raw bytes as text or binary.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> MediaType {
        match content_inspector::inspect(bytes) {
            ContentType::BINARY => MediaType::APPLICATION_OCTET_STREAM,
            _ => MediaType::TEXT_PLAIN,
        }
    }
}

impl ContentTypeDetector for DefaultContentTypeDetector {
    fn detect(&self, filename: &str, bytes: &[u8]) -> MediaType {
        let media_type = Self::by_extension(filename).unwrap_or_else(|| Self::sniff(bytes));
        tracing::debug!(filename, media_type = %media_type, "Detected content type");
        media_type
    }
}
