//! Integration tests for listing and extracting real archives.

use plugin_archive_core::MediaType;
use plugin_archive_vfs::{
    ArchiveReader, EntryList, EntryName, FileExtractor, Manifest, list_entries,
};
use std::io::{Cursor, Write};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

const MANIFEST: &[u8] = b"Manifest-Version: 1.0\r\nPlugin-Name: spreadsheet-tools\r\n\r\n";

/// Builds a JAR with two files, then a directory, then the manifest.
fn manifest_last_jar() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    writer.start_file("tools/Format.class", deflated).unwrap();
    writer.write_all(&[0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 52]).unwrap();
    writer.start_file("README.txt", stored).unwrap();
    writer.write_all(b"Spreadsheet tools").unwrap();
    writer.add_directory("META-INF/", stored).unwrap();
    writer.start_file("META-INF/MANIFEST.MF", deflated).unwrap();
    writer.write_all(MANIFEST).unwrap();

    writer.finish().unwrap().into_inner()
}

fn names(list: &EntryList) -> Vec<&str> {
    list.iter().map(|entry| entry.name().as_str()).collect()
}

#[test]
fn test_list_preserves_physical_order() {
    let list = list_entries(&manifest_last_jar()).unwrap();

    assert_eq!(
        names(&list),
        [
            "/tools/Format.class",
            "/README.txt",
            "/META-INF/",
            "/META-INF/MANIFEST.MF"
        ]
    );
    assert!(list[2].is_directory());
    assert!(list[3].name().is_manifest());
    assert_eq!(list.directory_count(), 1);
}

#[test]
fn test_sorted_listing_differs_from_physical_order() {
    let list = list_entries(&manifest_last_jar()).unwrap();
    let sorted = list.sorted();

    assert_eq!(
        names(&sorted),
        [
            "/META-INF/MANIFEST.MF",
            "/META-INF/",
            "/README.txt",
            "/tools/Format.class"
        ]
    );
}

#[test]
fn test_listing_json_round_trip() {
    let list = list_entries(&manifest_last_jar()).unwrap();
    let json = serde_json::to_string(&list).unwrap();

    assert!(json.starts_with('['));
    assert!(!json.contains("null"));
    assert!(!json.contains("isDirectory"));

    let back: EntryList = serde_json::from_str(&json).unwrap();
    assert_eq!(back, list);
}

#[test]
fn test_extract_is_byte_for_byte() {
    let jar = manifest_last_jar();
    let detector = |name: &str, _: &[u8]| {
        if name.ends_with(".txt") {
            MediaType::TEXT_PLAIN
        } else {
            MediaType::APPLICATION_OCTET_STREAM
        }
    };
    let extractor = FileExtractor::new(&detector);

    let readme = extractor.extract(&jar, "/README.txt").unwrap().unwrap();
    assert_eq!(readme.bytes(), b"Spreadsheet tools");
    assert_eq!(readme.media_type(), &MediaType::TEXT_PLAIN);
    assert_eq!(
        readme.entity().header("Content-Disposition"),
        Some("attachment; filename=\"/README.txt\"")
    );

    let class = extractor.extract(&jar, "/tools/Format.class").unwrap().unwrap();
    assert_eq!(class.bytes(), [0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 52]);

    assert!(extractor.extract(&jar, "/tools/Missing.class").unwrap().is_none());
}

#[test]
fn test_manifest_found_regardless_of_position() {
    let jar = manifest_last_jar();

    let mut reader = ArchiveReader::open(&jar).unwrap();
    assert!(reader.has_manifest().unwrap());
    assert_eq!(reader.read_manifest().unwrap().unwrap(), MANIFEST);

    let manifest = Manifest::from_archive(&jar).unwrap();
    assert_eq!(manifest.require("plugin-name").unwrap(), "spreadsheet-tools");
}

#[test]
fn test_archive_without_manifest() {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("only.txt", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"x").unwrap();
    let jar = writer.finish().unwrap().into_inner();

    let err = Manifest::from_archive(&jar).unwrap_err();
    assert!(err.is_validation());
    assert!(!ArchiveReader::open(&jar).unwrap().has_manifest().unwrap());
}

#[test]
fn test_listing_names_match_entry_name_rules() {
    let list = list_entries(&manifest_last_jar()).unwrap();
    for entry in &list {
        let reparsed = EntryName::new(entry.name().as_str()).unwrap();
        assert_eq!(&reparsed, entry.name());
    }
}
