//! Integration tests for the CLI commands against a temporary store.

use plugin_archive_cli::commands::common::Session;
use plugin_archive_cli::commands::{download, extract, list, plugins, remove, upload};
use plugin_archive_cli::runner::exit_code_for;
use plugin_archive_core::PluginName;
use plugin_archive_core::cli::{ExitCode, OutputFormat};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

const MANIFEST: &[u8] = b"Manifest-Version: 1.0\r\nPlugin-Name: formatters\r\n\r\n";

fn jar(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

struct Workspace {
    dir: TempDir,
    session: Session,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "").unwrap();
        let session = Session::open(Some(&config), Some(&dir.path().join("store"))).unwrap();
        Self { dir, session }
    }

    fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn out(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn upload(&self, archive: &Path) -> anyhow::Result<ExitCode> {
        upload::run(
            &self.session,
            archive,
            Some("alice".to_string()),
            OutputFormat::Json,
        )
    }
}

#[test]
fn test_list_and_extract_local_archive() {
    let ws = Workspace::new();
    let archive = ws.write(
        "formatters.jar",
        &jar(&[("META-INF/MANIFEST.MF", MANIFEST), ("docs/readme.txt", b"read me")]),
    );

    assert_eq!(list::run(&archive, false, OutputFormat::Text).unwrap(), ExitCode::SUCCESS);
    assert_eq!(list::run(&archive, true, OutputFormat::Json).unwrap(), ExitCode::SUCCESS);

    let output = ws.out("readme.txt");
    let code = extract::run(&archive, "docs/readme.txt", Some(&output), OutputFormat::Json).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
    assert_eq!(std::fs::read(&output).unwrap(), b"read me");

    let code = extract::run(&archive, "/missing.txt", Some(&output), OutputFormat::Json).unwrap();
    assert_eq!(code, ExitCode::NOT_FOUND);
}

#[test]
fn test_list_rejects_non_archive() {
    let ws = Workspace::new();
    let archive = ws.write("broken.jar", b"not a zip at all");

    let err = list::run(&archive, false, OutputFormat::Json).unwrap_err();
    assert_ne!(exit_code_for(&err), ExitCode::SUCCESS);
}

#[test]
fn test_upload_download_remove_cycle() {
    let ws = Workspace::new();
    let bytes = jar(&[("META-INF/MANIFEST.MF", MANIFEST), ("docs/readme.txt", b"read me")]);
    let archive = ws.write("formatters-1.0.jar", &bytes);

    assert_eq!(ws.upload(&archive).unwrap(), ExitCode::SUCCESS);
    let name = PluginName::new("formatters").unwrap();
    let stored = ws.session.store().load_plugin(&name).unwrap().unwrap();
    assert_eq!(stored.filename, "formatters-1.0.jar");
    assert_eq!(stored.user.as_str(), "alice");
    assert_eq!(stored.archive, bytes);

    assert_eq!(plugins::run(&ws.session, OutputFormat::Text).unwrap(), ExitCode::SUCCESS);

    let whole = ws.out("whole.jar");
    let code = download::run(&ws.session, "formatters", None, Some(&whole), OutputFormat::Json).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
    assert_eq!(std::fs::read(&whole).unwrap(), bytes);

    let single = ws.out("readme.txt");
    let code = download::run(
        &ws.session,
        "formatters",
        Some("docs/readme.txt"),
        Some(&single),
        OutputFormat::Json,
    )
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
    assert_eq!(std::fs::read(&single).unwrap(), b"read me");

    let code = download::run(
        &ws.session,
        "formatters",
        Some("docs/missing.txt"),
        Some(&single),
        OutputFormat::Json,
    )
    .unwrap();
    assert_eq!(code, ExitCode::NOT_FOUND);

    assert_eq!(remove::run(&ws.session, "formatters", OutputFormat::Json).unwrap(), ExitCode::SUCCESS);
    assert!(ws.session.store().load_plugin(&name).unwrap().is_none());
    assert_eq!(remove::run(&ws.session, "formatters", OutputFormat::Json).unwrap(), ExitCode::NOT_FOUND);
}

#[test]
fn test_download_unknown_plugin_is_not_found() {
    let ws = Workspace::new();
    let out = ws.out("nothing.jar");

    let code = download::run(&ws.session, "unknown", None, Some(&out), OutputFormat::Json).unwrap();
    assert_eq!(code, ExitCode::NOT_FOUND);
    assert!(!out.exists());
}

#[test]
fn test_upload_without_manifest_is_invalid_input() {
    let ws = Workspace::new();
    let archive = ws.write("plain.zip", &jar(&[("a.txt", b"a")]));

    let err = ws.upload(&archive).unwrap_err();
    assert_eq!(exit_code_for(&err), ExitCode::INVALID_INPUT);
    assert!(ws.session.store().list_plugins().unwrap().is_empty());
}

#[test]
fn test_remove_rejects_invalid_name() {
    let ws = Workspace::new();

    let err = remove::run(&ws.session, "../escape", OutputFormat::Json).unwrap_err();
    assert_eq!(exit_code_for(&err), ExitCode::INVALID_INPUT);
}
