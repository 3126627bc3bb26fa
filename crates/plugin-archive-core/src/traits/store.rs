//! Plugin store trait.

use crate::{Plugin, PluginName, PluginSummary, Result};

/// Persistent key-value store holding [`Plugin`] records.
///
/// Writes are last-writer-wins: saving a plugin whose name already exists
/// replaces the previous record wholesale. Implementations impose no locking
/// discipline beyond what is needed to keep a single record consistent.
///
/// # Examples
///
/// ```
/// use plugin_archive_core::traits::PluginStore;
/// use plugin_archive_core::{Plugin, PluginName, PluginSummary, Result};
/// use std::collections::BTreeMap;
/// use std::sync::Mutex;
///
/// #[derive(Debug, Default)]
/// struct MapStore(Mutex<BTreeMap<PluginName, Plugin>>);
///
/// impl PluginStore for MapStore {
///     fn load(&self, name: &PluginName) -> Result<Option<Plugin>> {
///         Ok(self.0.lock().unwrap().get(name).cloned())
///     }
///
///     fn save(&self, plugin: Plugin) -> Result<Plugin> {
///         self.0.lock().unwrap().insert(plugin.name.clone(), plugin.clone());
///         Ok(plugin)
///     }
///
///     fn delete(&self, name: &PluginName) -> Result<()> {
///         self.0.lock().unwrap().remove(name);
///         Ok(())
///     }
///
///     fn list(&self) -> Result<Vec<PluginSummary>> {
///         Ok(self.0.lock().unwrap().values().map(Plugin::summary).collect())
///     }
/// }
///
/// let store = MapStore::default();
/// let name = PluginName::new("demo").unwrap();
/// assert!(store.load(&name).unwrap().is_none());
/// assert!(!store.contains(&name).unwrap());
/// ```
pub trait PluginStore: Send + Sync {
    /// Loads a plugin by name, returning `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read.
    fn load(&self, name: &PluginName) -> Result<Option<Plugin>>;

    /// Inserts or replaces the plugin keyed by its name.
    ///
    /// Returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save(&self, plugin: Plugin) -> Result<Plugin>;

    /// Deletes a plugin. Deleting a missing plugin is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing record cannot be removed.
    fn delete(&self, name: &PluginName) -> Result<()>;

    /// Lists summaries of all stored plugins, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be enumerated.
    fn list(&self) -> Result<Vec<PluginSummary>>;

    /// Returns `true` if a plugin with this name is stored.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`load`](Self::load).
    fn contains(&self, name: &PluginName) -> Result<bool> {
        Ok(self.load(name)?.is_some())
    }
}
