//! CLI argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect JAR/ZIP plugin archives and manage a local plugin store.
///
/// Archive commands (`list`, `extract`) work on files directly. Store
/// commands (`upload`, `download`, `plugins`, `remove`) go through the same
/// handlers the HTTP service uses, against a directory-backed store.
#[derive(Parser, Debug)]
#[command(name = "plugin-archive")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    pub format: String,

    /// Configuration file (default: <config dir>/plugin-archive/config.toml)
    #[arg(long, global = true, env = "PLUGIN_ARCHIVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Plugin store directory, overriding the configuration
    #[arg(long, global = true, env = "PLUGIN_ARCHIVE_STORE")]
    pub store_dir: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the entries of an archive file.
    ///
    /// Entries are shown in the order they are stored unless `--sorted` is
    /// given, which puts the manifest first and the rest in name order.
    List {
        /// Archive to inspect
        archive: PathBuf,

        /// Sort by entry name instead of storage order
        #[arg(long)]
        sorted: bool,
    },

    /// Extract one file from an archive file.
    ///
    /// # Examples
    ///
    /// ```bash
    /// plugin-archive extract formatters.jar /META-INF/MANIFEST.MF
    /// plugin-archive extract formatters.jar com/example/Format.class -o Format.class
    /// ```
    Extract {
        /// Archive to read
        archive: PathBuf,

        /// Path of the entry inside the archive
        path: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Upload an archive into the plugin store.
    ///
    /// The plugin name is read from the archive manifest.
    Upload {
        /// Archive to upload
        archive: PathBuf,

        /// Uploading user (default: $PLUGIN_ARCHIVE_USER, then $USER)
        #[arg(long)]
        user: Option<String>,
    },

    /// Download a stored plugin, or one file inside it.
    Download {
        /// Plugin name
        name: String,

        /// Path of an entry inside the archive
        path: Option<String>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List stored plugins.
    Plugins,

    /// Remove a stored plugin.
    Remove {
        /// Plugin name
        name: String,
    },
}
