//! Command execution and runtime logic.
//!
//! Contains the command dispatch, logging initialization, and the mapping
//! from failures to process exit codes.

use anyhow::Result;
use plugin_archive_core::cli::{ExitCode, OutputFormat};
use plugin_archive_store::PluginStoreError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::commands;
use crate::commands::common::Session;

/// Initializes logging infrastructure.
///
/// Logs go to stderr so command output on stdout stays clean. `verbose`
/// forces the debug level; otherwise `RUST_LOG` applies, defaulting to
/// `info`. `json` switches to one JSON object per line.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}

/// Executes the parsed command line.
///
/// Archive commands run without touching the store; store commands open a
/// [`Session`] first.
///
/// # Errors
///
/// Returns an error if the output format is unknown or the command fails.
pub fn execute_command(cli: Cli) -> Result<ExitCode> {
    let output_format = cli
        .format
        .parse::<OutputFormat>()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let session = || Session::open(cli.config.as_deref(), cli.store_dir.as_deref());

    match cli.command {
        Commands::List { archive, sorted } => commands::list::run(&archive, sorted, output_format),
        Commands::Extract {
            archive,
            path,
            output,
        } => commands::extract::run(&archive, &path, output.as_deref(), output_format),
        Commands::Upload { archive, user } => {
            commands::upload::run(&session()?, &archive, user, output_format)
        }
        Commands::Download { name, path, output } => commands::download::run(
            &session()?,
            &name,
            path.as_deref(),
            output.as_deref(),
            output_format,
        ),
        Commands::Plugins => commands::plugins::run(&session()?, output_format),
        Commands::Remove { name } => commands::remove::run(&session()?, &name, output_format),
    }
}

/// Picks the exit code for a failed command.
///
/// Domain errors keep their classification through any added context;
/// everything else exits with [`ExitCode::ERROR`].
#[must_use]
pub fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    if let Some(error) = error.downcast_ref::<plugin_archive_core::Error>() {
        ExitCode::from_error(error)
    } else if error.downcast_ref::<PluginStoreError>().is_some() {
        ExitCode::STORE_ERROR
    } else {
        ExitCode::ERROR
    }
}
