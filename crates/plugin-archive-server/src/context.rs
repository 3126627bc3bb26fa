//! Collaborators shared by the handlers.

use crate::detector::DefaultContentTypeDetector;
use crate::providers::{EnvUserProvider, SystemClock};
use plugin_archive_core::traits::{Clock, ContentTypeDetector, PluginStore, UserProvider};
use plugin_archive_core::{Error, PluginName, Result, ServiceConfig};
use std::fmt;
use std::sync::Arc;

/// Configuration plus the external collaborators a handler needs.
///
/// Cloning is cheap; every collaborator is reference counted.
///
/// # Examples
///
/// ```
/// use plugin_archive_core::ServiceConfig;
/// use plugin_archive_server::{PluginContext, StaticUserProvider};
/// use plugin_archive_store::MemoryPluginStore;
/// use std::sync::Arc;
///
/// let context = PluginContext::new(ServiceConfig::default(), Arc::new(MemoryPluginStore::new()))
///     .with_users(Arc::new(StaticUserProvider::new("admin")));
///
/// assert_eq!(context.config().route_prefix, "/api/plugin");
/// ```
#[derive(Clone)]
pub struct PluginContext {
    config: Arc<ServiceConfig>,
    store: Arc<dyn PluginStore>,
    detector: Arc<dyn ContentTypeDetector>,
    clock: Arc<dyn Clock>,
    users: Arc<dyn UserProvider>,
}

impl PluginContext {
    /// Creates a context with the default detector, the system clock and
    /// users read from the environment.
    #[must_use]
    pub fn new(config: ServiceConfig, store: Arc<dyn PluginStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            detector: Arc::new(DefaultContentTypeDetector),
            clock: Arc::new(SystemClock),
            users: Arc::new(EnvUserProvider::default()),
        }
    }

    /// Replaces the content type detector.
    #[must_use]
    pub fn with_detector(mut self, detector: Arc<dyn ContentTypeDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the user provider.
    #[must_use]
    pub fn with_users(mut self, users: Arc<dyn UserProvider>) -> Self {
        self.users = users;
        self
    }

    /// Service configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Plugin store.
    #[must_use]
    pub fn store(&self) -> &dyn PluginStore {
        self.store.as_ref()
    }

    /// Content type detector.
    #[must_use]
    pub fn detector(&self) -> &dyn ContentTypeDetector {
        self.detector.as_ref()
    }

    /// Clock.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// User provider.
    #[must_use]
    pub fn users(&self) -> &dyn UserProvider {
        self.users.as_ref()
    }

    /// Reads the plugin name from its fixed position among `segments` and
    /// checks the segment after it is `action`.
    ///
    /// Returns the validated name and the segments following `action`.
    pub(crate) fn plugin_segments<'s>(
        &self,
        segments: &'s [String],
        action: &str,
    ) -> Result<(PluginName, &'s [String])> {
        let index = self.config.name_segment_index();
        let Some(raw_name) = segments.get(index) else {
            return Err(Error::validation("name", "plugin name missing from path"));
        };
        if segments.get(index + 1).map(String::as_str) != Some(action) {
            return Err(Error::validation(
                "path",
                format!("expected '{action}' after the plugin name"),
            ));
        }
        let name = PluginName::new(raw_name.as_str())?;
        Ok((name, &segments[index + 2..]))
    }
}

impl fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
