//! Single-file extraction with a ready-to-send response entity.

use crate::{ArchiveReader, EntryName, Result};
use plugin_archive_core::traits::ContentTypeDetector;
use plugin_archive_core::{ContentDisposition, HttpEntity, MediaType};
use std::fmt;

/// One file pulled out of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    name: EntryName,
    media_type: MediaType,
    entity: HttpEntity,
}

impl ExtractedFile {
    /// Name of the matched entry.
    #[must_use]
    pub const fn name(&self) -> &EntryName {
        &self.name
    }

    /// Media type assigned by the detector.
    #[must_use]
    pub const fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    /// Decompressed entry contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.entity.body()
    }

    /// Response entity: detected type, attachment disposition, raw bytes.
    #[must_use]
    pub const fn entity(&self) -> &HttpEntity {
        &self.entity
    }

    /// Consumes the file, returning the response entity.
    #[must_use]
    pub fn into_entity(self) -> HttpEntity {
        self.entity
    }
}

/// Extracts single entries from archive bytes.
///
/// # Examples
///
/// ```
/// use plugin_archive_core::MediaType;
/// use plugin_archive_vfs::FileExtractor;
/// use std::io::{Cursor, Write};
///
/// let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
/// writer.start_file("notes/todo.txt", zip::write::SimpleFileOptions::default()).unwrap();
/// writer.write_all(b"ship it").unwrap();
/// let bytes = writer.finish().unwrap().into_inner();
///
/// let detector = |_: &str, _: &[u8]| MediaType::TEXT_PLAIN;
/// let extractor = FileExtractor::new(&detector);
///
/// let file = extractor.extract(&bytes, "/notes/todo.txt").unwrap().unwrap();
/// assert_eq!(file.bytes(), b"ship it");
/// assert_eq!(file.media_type(), &MediaType::TEXT_PLAIN);
///
/// assert!(extractor.extract(&bytes, "/notes/missing.txt").unwrap().is_none());
/// ```
pub struct FileExtractor<'d> {
    detector: &'d dyn ContentTypeDetector,
}

impl<'d> FileExtractor<'d> {
    /// Creates an extractor that types bodies with `detector`.
    #[must_use]
    pub const fn new(detector: &'d dyn ContentTypeDetector) -> Self {
        Self { detector }
    }

    /// Extracts the first entry whose path equals `path`.
    ///
    /// Comparison is exact and case-sensitive on the path without its leading
    /// `/`. The suggested download filename is `path` as requested. Returns
    /// `Ok(None)` if no entry matches.
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is not a well-formed container or the
    /// matching entry cannot be decompressed.
    pub fn extract(&self, bytes: &[u8], path: &str) -> Result<Option<ExtractedFile>> {
        let Some((name, contents)) = ArchiveReader::open(bytes)?.read_entry(path)? else {
            tracing::debug!(path, "No archive entry matches");
            return Ok(None);
        };

        let media_type = self.detector.detect(path, &contents);
        let entity = HttpEntity::empty()
            .with_content_type(&media_type)
            .with_content_disposition(&ContentDisposition::attachment(path))
            .with_body(contents);

        Ok(Some(ExtractedFile {
            name,
            media_type,
            entity,
        }))
    }
}

impl fmt::Debug for FileExtractor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileExtractor").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugin_archive_core::DispositionType;
    use std::io::{Cursor, Write};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use zip::write::SimpleFileOptions;

    fn archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn by_extension(name: &str, _: &[u8]) -> MediaType {
        if name.ends_with(".json") {
            MediaType::APPLICATION_JSON
        } else {
            MediaType::APPLICATION_OCTET_STREAM
        }
    }

    #[test]
    fn test_extract_builds_attachment_entity() {
        let bytes = archive(&[("conf/app.json", br#"{"a":1}"#), ("other.bin", b"\x00\x01\x02")]);
        let extractor = FileExtractor::new(&by_extension);

        let file = extractor.extract(&bytes, "/conf/app.json").unwrap().unwrap();
        assert_eq!(file.name().as_str(), "/conf/app.json");
        assert_eq!(file.bytes(), br#"{"a":1}"#);

        let entity = file.entity();
        assert_eq!(entity.content_type(), Some(MediaType::APPLICATION_JSON));
        let disposition = entity.content_disposition().unwrap();
        assert_eq!(disposition.disposition(), DispositionType::Attachment);
        assert_eq!(disposition.filename(), Some("/conf/app.json"));
    }

    #[test]
    fn test_missing_entry_is_none_and_detector_not_called() {
        let calls = AtomicUsize::new(0);
        let counting = |name: &str, bytes: &[u8]| {
            calls.fetch_add(1, Ordering::SeqCst);
            by_extension(name, bytes)
        };
        let bytes = archive(&[("a.txt", b"a")]);

        let result = FileExtractor::new(&counting).extract(&bytes, "/b.txt").unwrap();
        assert!(result.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let bytes = archive(&[("Readme.TXT", b"x")]);
        let extractor = FileExtractor::new(&by_extension);

        assert!(extractor.extract(&bytes, "/readme.txt").unwrap().is_none());
        assert!(extractor.extract(&bytes, "/Readme.TXT").unwrap().is_some());
    }

    #[test]
    fn test_corrupt_archive_is_decode_error() {
        let extractor = FileExtractor::new(&by_extension);
        let err = extractor.extract(b"PK\x03\x04 truncated", "/a").unwrap_err();
        assert!(err.is_decode());
    }
}
