//! `remove` command: delete a stored plugin.

use anyhow::Result;
use plugin_archive_core::PluginName;
use plugin_archive_core::cli::{ExitCode, OutputFormat};
use tracing::info;

use crate::commands::common::{Session, print_report};
use crate::formatters::StoreReport;

/// Removes plugin `name`.
///
/// Removing a plugin that is not stored exits with
/// [`ExitCode::NOT_FOUND`].
///
/// # Errors
///
/// Returns an error if the name is invalid or the store cannot be updated.
pub fn run(session: &Session, name: &str, output_format: OutputFormat) -> Result<ExitCode> {
    let name = PluginName::new(name)?;
    let store = session.store();

    if store.load_plugin(&name)?.is_none() {
        tracing::warn!("Plugin {} is not stored", name);
        return Ok(ExitCode::NOT_FOUND);
    }

    store.remove_plugin(&name)?;
    info!("Removed plugin {}", name);
    print_report(
        &StoreReport {
            action: "removed",
            name: name.into_inner(),
            size: None,
        },
        output_format,
    )?;
    Ok(ExitCode::SUCCESS)
}
