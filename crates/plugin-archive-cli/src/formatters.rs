//! Output formatters for CLI commands.
//!
//! Every command result implements [`Report`]: JSON output is the serde form,
//! text output is one tab-separated line per record, and pretty output is the
//! same lines aligned and colored for a terminal.

use anyhow::Result;
use colored::Colorize;
use plugin_archive_core::PluginSummary;
use plugin_archive_core::cli::OutputFormat;
use plugin_archive_vfs::{EntryInfo, EntryList};
use serde::Serialize;

/// A command result that can be rendered in every output format.
pub trait Report: Serialize {
    /// Heading shown above pretty output.
    fn title(&self) -> String;

    /// One row of cells per record.
    fn rows(&self) -> Vec<Vec<String>>;
}

/// Formats `report` according to `format`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use plugin_archive_cli::formatters::{Report, format_output};
/// use plugin_archive_core::cli::OutputFormat;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Removed {
///     name: String,
/// }
///
/// impl Report for Removed {
///     fn title(&self) -> String {
///         "Removed".to_string()
///     }
///
///     fn rows(&self) -> Vec<Vec<String>> {
///         vec![vec![self.name.clone()]]
///     }
/// }
///
/// let removed = Removed { name: "formatters".to_string() };
/// assert_eq!(format_output(&removed, OutputFormat::Json)?, "{\n  \"name\": \"formatters\"\n}");
/// assert_eq!(format_output(&removed, OutputFormat::Text)?, "formatters");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Report>(report: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(text(&report.rows())),
        OutputFormat::Pretty => Ok(pretty(&report.title(), &report.rows())),
    }
}

fn text(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|row| row.join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn pretty(title: &str, rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = vec![title.bold().to_string()];
    if rows.is_empty() {
        lines.push("  (none)".dimmed().to_string());
    }
    for row in rows {
        let mut line = String::from(" ");
        for (i, cell) in row.iter().enumerate() {
            let last = i + 1 == row.len();
            let padded = if last {
                cell.clone()
            } else {
                format!("{cell:<width$}", width = widths[i])
            };
            line.push(' ');
            if last {
                line.push_str(&padded.green().to_string());
            } else {
                line.push_str(&padded.cyan().to_string());
            }
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// Entry listing of one archive.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct EntryReport(pub EntryList);

impl Report for EntryReport {
    fn title(&self) -> String {
        format!(
            "{} entries, {} bytes uncompressed",
            self.0.len(),
            self.0.total_size()
        )
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.0.iter().map(entry_row).collect()
    }
}

fn entry_row(entry: &EntryInfo) -> Vec<String> {
    let optional = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
    vec![
        optional(entry.size().map(|size| size.to_string())),
        optional(entry.compressed_size().map(|size| size.to_string())),
        optional(entry.method().map(method_name)),
        optional(entry.crc().map(|crc| format!("{crc:08x}"))),
        optional(
            entry
                .last_modified()
                .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string()),
        ),
        entry.name().to_string(),
    ]
}

fn method_name(method: u16) -> String {
    match method {
        0 => "stored".to_string(),
        8 => "deflated".to_string(),
        other => other.to_string(),
    }
}

/// Stored plugin listing.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct PluginsReport(pub Vec<PluginSummary>);

impl Report for PluginsReport {
    fn title(&self) -> String {
        format!("{} stored plugin(s)", self.0.len())
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.0
            .iter()
            .map(|plugin| {
                vec![
                    plugin.size.to_string(),
                    plugin.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    plugin.user.to_string(),
                    plugin.filename.clone(),
                    plugin.name.to_string(),
                ]
            })
            .collect()
    }
}

/// Outcome of writing bytes to a file.
#[derive(Debug, Serialize)]
pub struct WrittenReport {
    /// What was written
    pub source: String,
    /// Destination file
    pub output: String,
    /// Media type of the bytes
    pub media_type: String,
    /// Number of bytes written
    pub size: usize,
}

impl Report for WrittenReport {
    fn title(&self) -> String {
        format!("Wrote {}", self.source)
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.size.to_string(),
            self.media_type.clone(),
            self.output.clone(),
        ]]
    }
}

/// Outcome of a store mutation.
#[derive(Debug, Serialize)]
pub struct StoreReport {
    /// Action performed (`uploaded`, `removed`)
    pub action: &'static str,
    /// Plugin name
    pub name: String,
    /// Archive size, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

impl Report for StoreReport {
    fn title(&self) -> String {
        format!("Plugin {}", self.action)
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let mut row = vec![self.action.to_string()];
        if let Some(size) = self.size {
            row.push(size.to_string());
        }
        row.push(self.name.clone());
        vec![row]
    }
}
