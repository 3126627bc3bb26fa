//! Plugin archive command-line tool.
//!
//! # Examples
//!
//! ```bash
//! # Inspect an archive
//! plugin-archive list formatters.jar --sorted
//!
//! # Store it and fetch one file back
//! plugin-archive upload formatters.jar
//! plugin-archive download formatters META-INF/MANIFEST.MF
//! ```

use clap::Parser;
use plugin_archive_cli::cli::Cli;
use plugin_archive_cli::runner::{execute_command, exit_code_for, init_logging};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json)?;

    let exit_code = match execute_command(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            exit_code_for(&err)
        }
    };

    std::process::exit(exit_code.as_i32());
}
