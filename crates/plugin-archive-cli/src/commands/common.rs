//! Shared helpers for command implementations.

use anyhow::{Context, Result};
use plugin_archive_core::cli::OutputFormat;
use plugin_archive_core::traits::UserProvider;
use plugin_archive_core::{HttpRequest, HttpResponse, ServiceConfig};
use plugin_archive_server::{PluginContext, PluginRouter};
use plugin_archive_store::FsPluginStore;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::formatters::{Report, format_output};

/// Configuration and store shared by the store commands.
#[derive(Debug)]
pub struct Session {
    config: ServiceConfig,
    store: Arc<FsPluginStore>,
}

impl Session {
    /// Loads the configuration and opens the plugin store.
    ///
    /// `store_dir` overrides the directory named by the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the store
    /// directory cannot be created.
    pub fn open(config_path: Option<&Path>, store_dir: Option<&Path>) -> Result<Self> {
        let config = ServiceConfig::load_or_default(config_path)?;
        let store_dir = store_dir.map_or_else(|| config.resolved_store_dir(), Path::to_path_buf);
        tracing::debug!("Using plugin store at {}", store_dir.display());

        let store = FsPluginStore::new(&store_dir)
            .with_context(|| format!("failed to open plugin store at {}", store_dir.display()))?;

        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Plugin store.
    #[must_use]
    pub fn store(&self) -> &FsPluginStore {
        &self.store
    }

    /// Builds a router over the store, attributing uploads to `users`.
    #[must_use]
    pub fn router(&self, users: Arc<dyn UserProvider>) -> PluginRouter {
        let context = PluginContext::new(self.config.clone(), self.store.clone()).with_users(users);
        PluginRouter::new(context)
    }

    /// Builds a request path under the configured prefix, encoding each segment.
    #[must_use]
    pub fn request_path<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> String {
        let mut path = self.config.route_prefix.trim_end_matches('/').to_string();
        for segment in segments {
            path.push('/');
            path.push_str(&urlencoding::encode(segment));
        }
        path
    }

    /// Routes `request` and returns the response.
    ///
    /// # Errors
    ///
    /// Returns the handler error unchanged so callers can map it to an exit code.
    pub fn send(
        &self,
        users: Arc<dyn UserProvider>,
        request: &HttpRequest,
    ) -> plugin_archive_core::Result<HttpResponse> {
        self.router(users).handle(request)
    }
}

/// Prints `report` to stdout in the requested format.
///
/// # Errors
///
/// Returns an error if formatting fails.
pub fn print_report<T: Report>(report: &T, format: OutputFormat) -> Result<()> {
    let formatted = format_output(report, format)?;
    println!("{formatted}");
    Ok(())
}

/// Writes `bytes` to `output`, or to stdout when no file is given.
///
/// Returns the file written, if any.
///
/// # Errors
///
/// Returns an error if the file or stdout cannot be written.
pub fn write_bytes(bytes: &[u8], output: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = output {
        std::fs::write(path, bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        return Ok(Some(path.to_path_buf()));
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(bytes).context("failed to write to stdout")?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_store_dir() {
        let dir = TempDir::new().unwrap();
        let store_dir = dir.path().join("plugins");
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "route_prefix = \"/plugins\"\n").unwrap();

        let session = Session::open(Some(&config), Some(&store_dir)).unwrap();
        assert!(store_dir.is_dir());
        assert_eq!(session.config().route_prefix, "/plugins");
        assert_eq!(session.store().base_dir(), store_dir);
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "route_prefix = \"no-leading-slash\"\n").unwrap();

        assert!(Session::open(Some(&config), Some(dir.path())).is_err());
    }

    #[test]
    fn test_request_path_encodes_segments() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "").unwrap();
        let session = Session::open(Some(&config), Some(dir.path())).unwrap();

        assert_eq!(
            session.request_path(["formatters", "download", "docs", "read me.txt"]),
            "/api/plugin/formatters/download/docs/read%20me.txt"
        );
    }

    #[test]
    fn test_write_bytes_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.bin");

        let written = write_bytes(b"payload", Some(&path)).unwrap();
        assert_eq!(written, Some(path.clone()));
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
    }
}
