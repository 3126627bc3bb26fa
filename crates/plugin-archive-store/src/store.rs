//! Filesystem plugin store.
//!
//! Each plugin occupies one directory under the store root:
//!
//! ```text
//! base_dir/
//! ├── formatters/
//! │   ├── plugin.json   # Metadata + checksum
//! │   └── <blake3>.bin  # Archive bytes, verbatim
//! └── exporters/
//!     ├── plugin.json
//!     └── <blake3>.bin
//! ```
//!
//! Archives are named after their digest and `plugin.json` names the one it
//! describes. Replacing `plugin.json` is the only step that switches a record
//! from the old archive to the new one.

use crate::checksum::Checksum;
use crate::error::{PluginStoreError, Result};
use chrono::{DateTime, Utc};
use plugin_archive_core::traits::PluginStore;
use plugin_archive_core::{Plugin, PluginName, PluginSummary, UserId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Current on-disk metadata format version.
pub const FORMAT_VERSION: &str = "2";

/// Metadata file name inside a plugin directory.
pub const METADATA_FILE: &str = "plugin.json";

/// Extension of archive files inside a plugin directory.
pub const ARCHIVE_EXTENSION: &str = "bin";

const TMP_SUFFIX: &str = ".tmp";

/// Contents of `plugin.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// On-disk format version
    pub format_version: String,
    /// Plugin identifier
    pub name: PluginName,
    /// Filename supplied on upload
    pub filename: String,
    /// Uploading user
    pub user: UserId,
    /// Upload time
    pub uploaded_at: DateTime<Utc>,
    /// Archive size in bytes
    pub size: u64,
    /// Blake3 checksum of the archive file
    pub checksum: Checksum,
    /// Archive file inside the plugin directory
    pub archive_file: String,
}

impl PluginMetadata {
    fn describe(plugin: &Plugin) -> Self {
        let checksum = Checksum::of(&plugin.archive);
        Self {
            archive_file: archive_file_name(&checksum),
            format_version: FORMAT_VERSION.to_string(),
            name: plugin.name.clone(),
            filename: plugin.filename.clone(),
            user: plugin.user.clone(),
            uploaded_at: plugin.timestamp,
            size: plugin.archive.len() as u64,
            checksum,
        }
    }

    fn summary(self) -> PluginSummary {
        PluginSummary {
            name: self.name,
            filename: self.filename,
            size: self.size,
            user: self.user,
            timestamp: self.uploaded_at,
        }
    }
}

/// Removes a plugin directory on drop unless committed.
///
/// Only armed when the save created the directory. An overwrite that fails
/// leaves the previous `plugin.json` and the archive it names in place.
struct PluginDirGuard {
    path: PathBuf,
    cleanup: bool,
}

impl PluginDirGuard {
    const fn new(path: PathBuf, cleanup: bool) -> Self {
        Self { path, cleanup }
    }

    fn commit(mut self) {
        self.cleanup = false;
    }
}

impl Drop for PluginDirGuard {
    fn drop(&mut self) {
        if !self.cleanup {
            return;
        }
        if let Err(e) = fs::remove_dir_all(&self.path) {
            tracing::warn!(
                "Failed to cleanup plugin directory {}: {}",
                self.path.display(),
                e
            );
        } else {
            tracing::debug!(
                "Cleaned up incomplete plugin directory: {}",
                self.path.display()
            );
        }
    }
}

/// Plugin store persisting records as files.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// reader never observes a half-written file. Each archive version gets its
/// own file, so the record only changes when `plugin.json` is replaced. An internal lock serializes
/// writers within one process; the last save wins.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use plugin_archive_core::traits::PluginStore;
/// use plugin_archive_core::{Plugin, PluginName, UserId};
/// use plugin_archive_store::FsPluginStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// let store = FsPluginStore::new(dir.path())?;
/// let name = PluginName::new("formatters")?;
///
/// store.save(Plugin {
///     name: name.clone(),
///     filename: "formatters.jar".to_string(),
///     archive: b"PK\x05\x06".to_vec(),
///     user: UserId::new("admin"),
///     timestamp: Utc::now(),
/// })?;
///
/// let loaded = store.load(&name)?.expect("stored");
/// assert_eq!(loaded.filename, "formatters.jar");
/// let archive = store.archive_path(&name)?.expect("stored");
/// assert!(archive.starts_with(dir.path().join("formatters")));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FsPluginStore {
    base_dir: PathBuf,
    lock: RwLock<()>,
}

impl FsPluginStore {
    /// Opens a store rooted at `base_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        if !base_dir.exists() {
            fs::create_dir_all(&base_dir)?;
            tracing::debug!("Created plugin store directory: {}", base_dir.display());
        }

        Ok(Self {
            base_dir,
            lock: RwLock::new(()),
        })
    }

    /// Root directory of the store.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding the plugin `name`. Does not check existence.
    #[must_use]
    pub fn plugin_path(&self, name: &PluginName) -> PathBuf {
        self.base_dir.join(name.as_str())
    }

    /// Archive file referenced by the stored metadata of `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata is missing or invalid.
    pub fn archive_path(&self, name: &PluginName) -> Result<Option<PathBuf>> {
        let _guard = self.read_lock()?;

        let plugin_dir = self.plugin_path(name);
        if !plugin_dir.is_dir() {
            return Ok(None);
        }
        let metadata = read_metadata(&plugin_dir, name)?;
        Ok(Some(plugin_dir.join(metadata.archive_file)))
    }

    /// Loads and verifies a plugin.
    ///
    /// # Errors
    ///
    /// * [`PluginStoreError::MissingFile`] - directory exists but a file is gone
    /// * [`PluginStoreError::InvalidMetadata`] - unreadable or foreign metadata
    /// * [`PluginStoreError::ChecksumMismatch`] - archive was modified on disk
    pub fn load_plugin(&self, name: &PluginName) -> Result<Option<Plugin>> {
        let _guard = self.read_lock()?;

        let plugin_dir = self.plugin_path(name);
        if !plugin_dir.is_dir() {
            return Ok(None);
        }

        let metadata = read_metadata(&plugin_dir, name)?;
        let archive_path = plugin_dir.join(&metadata.archive_file);
        if !archive_path.exists() {
            return Err(PluginStoreError::MissingFile {
                name: name.to_string(),
                path: PathBuf::from(&metadata.archive_file),
            });
        }

        let archive = fs::read(&archive_path)?;
        if !metadata.checksum.matches(&archive) {
            return Err(PluginStoreError::ChecksumMismatch {
                name: name.to_string(),
                expected: metadata.checksum.to_string(),
                actual: Checksum::of(&archive).to_string(),
            });
        }

        tracing::debug!("Loaded and verified plugin {}: {} bytes", name, archive.len());

        Ok(Some(Plugin {
            name: metadata.name,
            filename: metadata.filename,
            archive,
            user: metadata.user,
            timestamp: metadata.uploaded_at,
        }))
    }

    /// Writes a plugin, replacing any previous record with the same name.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be written. A directory created by
    /// the failed call is removed again; on an overwrite the previous record
    /// stays loadable.
    pub fn save_plugin(&self, plugin: &Plugin) -> Result<()> {
        let _guard = self.write_lock()?;

        let metadata = PluginMetadata::describe(plugin);
        let encoded = serde_json::to_vec_pretty(&metadata)?;

        let plugin_dir = self.plugin_path(&plugin.name);
        let created = !plugin_dir.exists();
        if created {
            fs::create_dir_all(&plugin_dir)?;
            tracing::debug!("Created plugin directory: {}", plugin_dir.display());
        }
        let dir_guard = PluginDirGuard::new(plugin_dir.clone(), created);

        let archive_path = plugin_dir.join(&metadata.archive_file);
        let archive_existed = archive_path.exists();
        write_atomically(&archive_path, &plugin.archive)?;

        if let Err(e) = write_atomically(&plugin_dir.join(METADATA_FILE), &encoded) {
            if !created
                && !archive_existed
                && let Err(cleanup) = fs::remove_file(&archive_path)
            {
                tracing::warn!(
                    "Failed to remove unreferenced archive {}: {}",
                    archive_path.display(),
                    cleanup
                );
            }
            return Err(e);
        }

        dir_guard.commit();
        remove_stale_archives(&plugin_dir, &metadata.archive_file);
        tracing::info!(
            "Saved plugin {} ({} bytes, uploaded by {})",
            plugin.name,
            plugin.archive.len(),
            plugin.user
        );
        Ok(())
    }

    /// Removes a plugin directory. Removing a missing plugin succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing directory cannot be deleted.
    pub fn remove_plugin(&self, name: &PluginName) -> Result<()> {
        let _guard = self.write_lock()?;

        let plugin_dir = self.plugin_path(name);
        if !plugin_dir.exists() {
            tracing::debug!("Plugin {} not stored, nothing to remove", name);
            return Ok(());
        }

        fs::remove_dir_all(&plugin_dir)?;
        tracing::info!("Removed plugin: {}", name);
        Ok(())
    }

    /// Lists stored plugins sorted by name.
    ///
    /// Directories without readable metadata are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the store root cannot be read.
    pub fn list_plugins(&self) -> Result<Vec<PluginSummary>> {
        let _guard = self.read_lock()?;

        let mut plugins = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }

            let Some(name) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| PluginName::new(n).ok())
            else {
                tracing::warn!("Skipping directory with invalid plugin name: {}", path.display());
                continue;
            };

            if !path.join(METADATA_FILE).exists() {
                tracing::warn!("Skipping directory without metadata: {}", path.display());
                continue;
            }

            match read_metadata(&path, &name) {
                Ok(metadata) => plugins.push(metadata.summary()),
                Err(e) => {
                    tracing::warn!("Failed to read metadata from {}: {}", path.display(), e);
                }
            }
        }

        plugins.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(plugins)
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<'_, ()>> {
        self.lock.read().map_err(|_| PluginStoreError::LockPoisoned)
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<'_, ()>> {
        self.lock.write().map_err(|_| PluginStoreError::LockPoisoned)
    }
}

impl PluginStore for FsPluginStore {
    fn load(&self, name: &PluginName) -> plugin_archive_core::Result<Option<Plugin>> {
        Ok(self.load_plugin(name)?)
    }

    fn save(&self, plugin: Plugin) -> plugin_archive_core::Result<Plugin> {
        self.save_plugin(&plugin)?;
        Ok(plugin)
    }

    fn delete(&self, name: &PluginName) -> plugin_archive_core::Result<()> {
        Ok(self.remove_plugin(name)?)
    }

    fn list(&self) -> plugin_archive_core::Result<Vec<PluginSummary>> {
        Ok(self.list_plugins()?)
    }
}

/// Reads `plugin.json` and checks it belongs to `name`.
fn read_metadata(plugin_dir: &Path, name: &PluginName) -> Result<PluginMetadata> {
    let invalid = |reason: String| PluginStoreError::InvalidMetadata {
        name: name.to_string(),
        reason,
    };

    let metadata_path = plugin_dir.join(METADATA_FILE);
    if !metadata_path.exists() {
        return Err(PluginStoreError::MissingFile {
            name: name.to_string(),
            path: PathBuf::from(METADATA_FILE),
        });
    }

    let content = fs::read_to_string(&metadata_path)?;
    let metadata: PluginMetadata = serde_json::from_str(&content)
        .map_err(|e| invalid(format!("Failed to parse JSON: {e}")))?;

    if metadata.format_version != FORMAT_VERSION {
        return Err(invalid(format!(
            "Unsupported format version: {} (expected {})",
            metadata.format_version, FORMAT_VERSION
        )));
    }
    if &metadata.name != name {
        return Err(invalid(format!(
            "Metadata names plugin '{}'",
            metadata.name
        )));
    }
    if !metadata.checksum.is_well_formed() {
        return Err(invalid(format!("Malformed checksum: {}", metadata.checksum)));
    }
    if metadata.archive_file != archive_file_name(&metadata.checksum) {
        return Err(invalid(format!(
            "Archive file '{}' does not match checksum",
            metadata.archive_file
        )));
    }

    Ok(metadata)
}

/// `<hex digest>.bin`
fn archive_file_name(checksum: &Checksum) -> String {
    format!("{}.{ARCHIVE_EXTENSION}", checksum.digest())
}

/// Deletes archives no longer named by `plugin.json`. Failures are logged.
fn remove_stale_archives(plugin_dir: &Path, current: &str) {
    let entries = match fs::read_dir(plugin_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(
                "Failed to scan {} for stale archives: {}",
                plugin_dir.display(),
                e
            );
            return;
        }
    };

    for path in entries.filter_map(|entry| entry.ok().map(|e| e.path())) {
        let stale = path.extension().is_some_and(|ext| ext == ARCHIVE_EXTENSION)
            && path.file_name().is_some_and(|n| n != current);
        if !stale {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => tracing::debug!("Removed stale archive: {}", path.display()),
            Err(e) => tracing::warn!("Failed to remove stale archive {}: {}", path.display(), e),
        }
    }
}

/// Writes `data` to a sibling temp file, then renames it over `path`.
fn write_atomically(path: &Path, data: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(TMP_SUFFIX);
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, data)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn plugin(name: &str, archive: &[u8]) -> Plugin {
        Plugin {
            name: PluginName::new(name).unwrap(),
            filename: format!("{name}-1.0.jar"),
            archive: archive.to_vec(),
            user: UserId::new("admin@example.com"),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn archive_files(plugin_dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(plugin_dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().is_some_and(|ext| ext == ARCHIVE_EXTENSION))
            .collect()
    }

    fn store() -> (TempDir, FsPluginStore) {
        let dir = TempDir::new().unwrap();
        let store = FsPluginStore::new(dir.path().join("plugins")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_new_creates_directory() {
        let (_dir, store) = store();
        assert!(store.base_dir().is_dir());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let (_dir, store) = store();
        let original = plugin("formatters", b"PK archive bytes");

        store.save_plugin(&original).unwrap();
        let loaded = store.load_plugin(&original.name).unwrap().unwrap();

        assert_eq!(loaded, original);
    }

    #[test]
    fn test_save_writes_expected_layout() {
        let (_dir, store) = store();
        let original = plugin("formatters", b"bytes");
        store.save_plugin(&original).unwrap();

        let plugin_dir = store.plugin_path(&original.name);
        let metadata: PluginMetadata =
            serde_json::from_slice(&fs::read(plugin_dir.join(METADATA_FILE)).unwrap()).unwrap();
        assert_eq!(metadata.format_version, FORMAT_VERSION);
        assert_eq!(metadata.size, 5);
        assert_eq!(metadata.checksum, Checksum::of(b"bytes"));
        assert_eq!(
            metadata.archive_file,
            format!("{}.bin", Checksum::of(b"bytes").digest())
        );
        assert_eq!(fs::read(plugin_dir.join(&metadata.archive_file)).unwrap(), b"bytes");

        let leftovers: Vec<_> = fs::read_dir(&plugin_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(TMP_SUFFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_load_missing_is_none() {
        let (_dir, store) = store();
        assert!(store.load_plugin(&PluginName::new("ghost").unwrap()).unwrap().is_none());
    }

    #[test]
    fn test_overwrite_replaces_archive() {
        let (_dir, store) = store();
        store.save_plugin(&plugin("demo", b"old")).unwrap();
        store.save_plugin(&plugin("demo", b"new and longer")).unwrap();

        let name = PluginName::new("demo").unwrap();
        let loaded = store.load_plugin(&name).unwrap().unwrap();
        assert_eq!(loaded.archive, b"new and longer");
        assert_eq!(store.list_plugins().unwrap().len(), 1);
        assert_eq!(archive_files(&store.plugin_path(&name)).len(), 1);
    }

    #[test]
    fn test_failed_overwrite_keeps_previous_record() {
        let (_dir, store) = store();
        let original = plugin("demo", b"first version");
        store.save_plugin(&original).unwrap();

        let plugin_dir = store.plugin_path(&original.name);
        let blocker = plugin_dir.join(format!("{METADATA_FILE}{TMP_SUFFIX}"));
        fs::create_dir(&blocker).unwrap();

        let result = store.save_plugin(&plugin("demo", b"second version"));
        assert!(result.is_err());

        fs::remove_dir(&blocker).unwrap();
        let loaded = store.load_plugin(&original.name).unwrap().unwrap();
        assert_eq!(loaded, original);
        assert_eq!(archive_files(&plugin_dir).len(), 1);
    }

    #[test]
    fn test_resaving_same_archive_keeps_file() {
        let (_dir, store) = store();
        let original = plugin("demo", b"same bytes");
        store.save_plugin(&original).unwrap();
        store.save_plugin(&original).unwrap();

        assert_eq!(store.load_plugin(&original.name).unwrap().unwrap(), original);
        assert_eq!(archive_files(&store.plugin_path(&original.name)).len(), 1);
    }

    #[test]
    fn test_load_checksum_mismatch() {
        let (_dir, store) = store();
        let original = plugin("demo", b"original");
        store.save_plugin(&original).unwrap();

        let archive = store.archive_path(&original.name).unwrap().unwrap();
        fs::write(archive, b"tampered").unwrap();

        let err = store.load_plugin(&original.name).unwrap_err();
        assert!(matches!(err, PluginStoreError::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_load_missing_archive_file() {
        let (_dir, store) = store();
        let original = plugin("demo", b"x");
        store.save_plugin(&original).unwrap();
        fs::remove_file(store.archive_path(&original.name).unwrap().unwrap()).unwrap();

        let err = store.load_plugin(&original.name).unwrap_err();
        assert!(matches!(err, PluginStoreError::MissingFile { .. }));
    }

    #[test]
    fn test_load_rejects_unknown_format_version() {
        let (_dir, store) = store();
        let original = plugin("demo", b"x");
        store.save_plugin(&original).unwrap();

        let path = store.plugin_path(&original.name).join(METADATA_FILE);
        let content = fs::read_to_string(&path).unwrap();
        let current = format!("\"format_version\": \"{FORMAT_VERSION}\"");
        fs::write(&path, content.replace(&current, "\"format_version\": \"9\"")).unwrap();

        let err = store.load_plugin(&original.name).unwrap_err();
        assert!(err.to_string().contains("Unsupported format version"));
    }

    #[test]
    fn test_load_rejects_archive_file_outside_digest() {
        let (_dir, store) = store();
        let original = plugin("demo", b"x");
        store.save_plugin(&original).unwrap();

        let path = store.plugin_path(&original.name).join(METADATA_FILE);
        let mut metadata: PluginMetadata =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        metadata.archive_file = "../other/x.bin".to_string();
        fs::write(&path, serde_json::to_vec(&metadata).unwrap()).unwrap();

        let err = store.load_plugin(&original.name).unwrap_err();
        assert!(matches!(err, PluginStoreError::InvalidMetadata { .. }));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_dir, store) = store();
        let original = plugin("demo", b"x");
        store.save_plugin(&original).unwrap();

        store.remove_plugin(&original.name).unwrap();
        store.remove_plugin(&original.name).unwrap();
        assert!(!store.plugin_path(&original.name).exists());
    }

    #[test]
    fn test_list_sorted_and_skips_foreign_dirs() {
        let (_dir, store) = store();
        store.save_plugin(&plugin("zeta", b"z")).unwrap();
        store.save_plugin(&plugin("alpha", b"a")).unwrap();
        fs::create_dir(store.base_dir().join("stray")).unwrap();
        fs::write(store.base_dir().join("loose-file.txt"), b"ignored").unwrap();

        let names: Vec<String> = store
            .list_plugins()
            .unwrap()
            .into_iter()
            .map(|s| s.name.into_inner())
            .collect();
        assert_eq!(names, ["alpha", "zeta"]);
    }

    #[test]
    fn test_plugin_dir_guard_cleanup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial");
        fs::create_dir(&path).unwrap();

        drop(PluginDirGuard::new(path.clone(), true));
        assert!(!path.exists());
    }

    #[test]
    fn test_plugin_dir_guard_commit_and_disarmed() {
        let dir = TempDir::new().unwrap();
        let committed = dir.path().join("committed");
        let existing = dir.path().join("existing");
        fs::create_dir(&committed).unwrap();
        fs::create_dir(&existing).unwrap();

        PluginDirGuard::new(committed.clone(), true).commit();
        drop(PluginDirGuard::new(existing.clone(), false));

        assert!(committed.exists());
        assert!(existing.exists());
    }
}
