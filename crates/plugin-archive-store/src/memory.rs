//! In-memory plugin store.

use crate::error::{PluginStoreError, Result};
use plugin_archive_core::traits::PluginStore;
use plugin_archive_core::{Plugin, PluginName, PluginSummary};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Plugin store holding every record in a map.
///
/// Contents are lost when the store is dropped. Used by tests and by
/// embedders that supply their own persistence.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use plugin_archive_core::traits::PluginStore;
/// use plugin_archive_core::{Plugin, PluginName, UserId};
/// use plugin_archive_store::MemoryPluginStore;
///
/// let store = MemoryPluginStore::new();
/// let name = PluginName::new("formatters").unwrap();
///
/// store
///     .save(Plugin {
///         name: name.clone(),
///         filename: "formatters.jar".to_string(),
///         archive: vec![1, 2, 3],
///         user: UserId::new("admin"),
///         timestamp: Utc::now(),
///     })
///     .unwrap();
///
/// assert_eq!(store.load(&name).unwrap().unwrap().archive, [1, 2, 3]);
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryPluginStore {
    plugins: RwLock<BTreeMap<PluginName, Plugin>>,
}

impl MemoryPluginStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored plugins. A poisoned lock counts as empty.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.read().map_or(0, |plugins| plugins.len())
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load_record(&self, name: &PluginName) -> Result<Option<Plugin>> {
        let plugins = self
            .plugins
            .read()
            .map_err(|_| PluginStoreError::LockPoisoned)?;
        Ok(plugins.get(name).cloned())
    }

    fn save_record(&self, plugin: Plugin) -> Result<Plugin> {
        let mut plugins = self
            .plugins
            .write()
            .map_err(|_| PluginStoreError::LockPoisoned)?;
        plugins.insert(plugin.name.clone(), plugin.clone());
        Ok(plugin)
    }

    fn delete_record(&self, name: &PluginName) -> Result<()> {
        let mut plugins = self
            .plugins
            .write()
            .map_err(|_| PluginStoreError::LockPoisoned)?;
        plugins.remove(name);
        Ok(())
    }

    fn summaries(&self) -> Result<Vec<PluginSummary>> {
        let plugins = self
            .plugins
            .read()
            .map_err(|_| PluginStoreError::LockPoisoned)?;
        Ok(plugins.values().map(Plugin::summary).collect())
    }
}

impl PluginStore for MemoryPluginStore {
    fn load(&self, name: &PluginName) -> plugin_archive_core::Result<Option<Plugin>> {
        Ok(self.load_record(name)?)
    }

    fn save(&self, plugin: Plugin) -> plugin_archive_core::Result<Plugin> {
        tracing::debug!(plugin = %plugin.name, bytes = plugin.archive.len(), "Saving plugin in memory");
        Ok(self.save_record(plugin)?)
    }

    fn delete(&self, name: &PluginName) -> plugin_archive_core::Result<()> {
        Ok(self.delete_record(name)?)
    }

    fn list(&self) -> plugin_archive_core::Result<Vec<PluginSummary>> {
        Ok(self.summaries()?)
    }
}
