//! JAR manifest parsing.
//!
//! Only the main section is read. Attribute lines have the form
//! `Name: value`; a line starting with a single space continues the previous
//! value. The main section ends at the first blank line.
//!
//! # Examples
//!
//! ```
//! use plugin_archive_vfs::Manifest;
//!
//! let manifest = Manifest::parse(
//!     b"Manifest-Version: 1.0\r\nPlugin-Name: formatters-for-spread\r\n sheets\r\n\r\nName: x\r\n",
//! ).unwrap();
//!
//! assert_eq!(manifest.get("plugin-name"), Some("formatters-for-spreadsheets"));
//! assert_eq!(manifest.get("Name"), None);
//! ```

use crate::{ArchiveError, ArchiveReader, Result};

/// Main-section attributes of a JAR manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    attributes: Vec<(String, String)>,
}

impl Manifest {
    /// Parses manifest bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidManifest`] if the bytes are not UTF-8,
    /// a line lacks the `: ` separator, or a continuation line has nothing to
    /// continue.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| ArchiveError::InvalidManifest {
            reason: format!("not UTF-8: {e}"),
        })?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut attributes: Vec<(String, String)> = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                break;
            }

            if let Some(continuation) = line.strip_prefix(' ') {
                let Some((_, value)) = attributes.last_mut() else {
                    return Err(invalid_line(number, "continuation without attribute"));
                };
                value.push_str(continuation);
                continue;
            }

            let Some((name, value)) = line.split_once(':') else {
                return Err(invalid_line(number, "missing ':'"));
            };
            if name.is_empty() || name.contains(' ') {
                return Err(invalid_line(number, "malformed attribute name"));
            }
            let value = value.strip_prefix(' ').unwrap_or(value);
            attributes.push((name.to_string(), value.to_string()));
        }

        Ok(Self { attributes })
    }

    /// Reads the manifest of a JAR held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::MissingManifest`] if the archive has no
    /// `/META-INF/MANIFEST.MF`, or a decode/parse error.
    pub fn from_archive(bytes: &[u8]) -> Result<Self> {
        let mut reader = ArchiveReader::open(bytes)?;
        match reader.read_manifest()? {
            Some(contents) => Self::parse(&contents),
            None => Err(ArchiveError::MissingManifest),
        }
    }

    /// Returns the value of attribute `name`, compared case-insensitively.
    ///
    /// The last occurrence wins when an attribute is repeated.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the trimmed, non-empty value of a required attribute.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::MissingAttribute`] if the attribute is absent
    /// or blank.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ArchiveError::MissingAttribute {
                attribute: name.to_string(),
            })
    }

    /// Iterates over attributes in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Number of main-section attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if the main section is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

fn invalid_line(number: usize, reason: &str) -> ArchiveError {
    ArchiveError::InvalidManifest {
        reason: format!("line {}: {reason}", number + 1),
    }
}
