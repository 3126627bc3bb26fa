//! Content type detection trait.

use crate::MediaType;

/// Maps a filename and its bytes to the media type of a response body.
///
/// Any `Fn(&str, &[u8]) -> MediaType` closure is a detector.
///
/// # Examples
///
/// ```
/// use plugin_archive_core::traits::ContentTypeDetector;
/// use plugin_archive_core::MediaType;
///
/// let detector = |_name: &str, _bytes: &[u8]| MediaType::APPLICATION_OCTET_STREAM;
/// assert_eq!(
///     detector.detect("Main.class", &[0xCA, 0xFE]),
///     MediaType::APPLICATION_OCTET_STREAM
/// );
/// ```
pub trait ContentTypeDetector: Send + Sync {
    /// Returns the media type for `filename` with contents `bytes`.
    fn detect(&self, filename: &str, bytes: &[u8]) -> MediaType;
}

impl<F> ContentTypeDetector for F
where
    F: Fn(&str, &[u8]) -> MediaType + Send + Sync,
{
    fn detect(&self, filename: &str, bytes: &[u8]) -> MediaType {
        self(filename, bytes)
    }
}
