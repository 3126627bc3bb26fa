//! `plugins` command: stored plugins.

use anyhow::Result;
use plugin_archive_core::cli::{ExitCode, OutputFormat};

use crate::commands::common::{Session, print_report};
use crate::formatters::PluginsReport;

/// Lists stored plugins by name.
///
/// # Errors
///
/// Returns an error if the store directory cannot be read.
pub fn run(session: &Session, output_format: OutputFormat) -> Result<ExitCode> {
    let plugins = session.store().list_plugins()?;
    tracing::debug!("Found {} stored plugins", plugins.len());
    print_report(&PluginsReport(plugins), output_format)?;
    Ok(ExitCode::SUCCESS)
}
