//! Metadata record for one archive entry.

use crate::{ArchiveError, EntryName, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable metadata of one archive entry.
///
/// Every numeric field and timestamp is independently optional; `None` means
/// the archive did not record the value, which is distinct from zero. Absent
/// fields are omitted from the serialized form.
///
/// # Examples
///
/// ```
/// use plugin_archive_vfs::{EntryInfo, EntryName};
///
/// let info = EntryInfo::new(EntryName::new("/docs/readme.txt").unwrap())
///     .with_size(120)
///     .with_method(8);
///
/// assert_eq!(info.size(), Some(120));
/// assert_eq!(info.crc(), None);
/// assert!(!info.is_directory());
///
/// let json = serde_json::to_string(&info).unwrap();
/// assert_eq!(json, r#"{"name":"/docs/readme.txt","size":120,"method":8}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawEntryInfo")]
pub struct EntryInfo {
    name: EntryName,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    compressed_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    crc: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    create: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_modified: Option<DateTime<Utc>>,
}

impl EntryInfo {
    /// Creates a record with only a name.
    #[must_use]
    pub const fn new(name: EntryName) -> Self {
        Self {
            name,
            size: None,
            compressed_size: None,
            method: None,
            crc: None,
            create: None,
            last_modified: None,
        }
    }

    /// Sets the uncompressed size.
    #[must_use]
    pub const fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the compressed size.
    #[must_use]
    pub const fn with_compressed_size(mut self, compressed_size: u64) -> Self {
        self.compressed_size = Some(compressed_size);
        self
    }

    /// Sets the compression method (0 stored, 8 deflated).
    #[must_use]
    pub const fn with_method(mut self, method: u16) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the CRC-32 checksum.
    #[must_use]
    pub const fn with_crc(mut self, crc: u32) -> Self {
        self.crc = Some(crc);
        self
    }

    /// Sets the creation time.
    #[must_use]
    pub const fn with_create(mut self, create: DateTime<Utc>) -> Self {
        self.create = Some(create);
        self
    }

    /// Sets the last modification time.
    #[must_use]
    pub const fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// Entry name.
    #[must_use]
    pub const fn name(&self) -> &EntryName {
        &self.name
    }

    /// Uncompressed size in bytes.
    #[must_use]
    pub const fn size(&self) -> Option<u64> {
        self.size
    }

    /// Compressed size in bytes.
    #[must_use]
    pub const fn compressed_size(&self) -> Option<u64> {
        self.compressed_size
    }

    /// Compression method code.
    #[must_use]
    pub const fn method(&self) -> Option<u16> {
        self.method
    }

    /// CRC-32 of the uncompressed data.
    #[must_use]
    pub const fn crc(&self) -> Option<u32> {
        self.crc
    }

    /// Creation time, if recorded.
    #[must_use]
    pub const fn create(&self) -> Option<DateTime<Utc>> {
        self.create
    }

    /// Last modification time, if recorded.
    #[must_use]
    pub const fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }

    /// Returns `true` if the entry is a directory.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.name.is_directory()
    }
}

/// Integer as a JSON number or a decimal string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Integer {
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

impl Integer {
    fn into_unsigned(self, field: &'static str) -> Result<u64> {
        let invalid = |reason: String| ArchiveError::InvalidField { field, reason };
        match self {
            Self::Unsigned(value) => Ok(value),
            Self::Signed(value) => Err(invalid(format!("{value} is negative"))),
            Self::Text(text) => {
                let trimmed = text.trim();
                if trimmed.starts_with('-') {
                    return Err(invalid(format!("{trimmed} is negative")));
                }
                trimmed
                    .parse()
                    .map_err(|_| invalid(format!("'{text}' is not an integer")))
            }
        }
    }
}

fn narrow<T: TryFrom<u64>>(field: &'static str, value: u64) -> Result<T> {
    T::try_from(value).map_err(|_| ArchiveError::InvalidField {
        field,
        reason: format!("{value} is out of range"),
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntryInfo {
    name: EntryName,
    #[serde(default)]
    size: Option<Integer>,
    #[serde(default)]
    compressed_size: Option<Integer>,
    #[serde(default)]
    method: Option<Integer>,
    #[serde(default)]
    crc: Option<Integer>,
    #[serde(default)]
    create: Option<DateTime<Utc>>,
    #[serde(default)]
    last_modified: Option<DateTime<Utc>>,
}

impl TryFrom<RawEntryInfo> for EntryInfo {
    type Error = ArchiveError;

    fn try_from(raw: RawEntryInfo) -> Result<Self> {
        let size = raw.size.map(|v| v.into_unsigned("size")).transpose()?;
        let compressed_size = raw
            .compressed_size
            .map(|v| v.into_unsigned("compressedSize"))
            .transpose()?;
        let method = raw
            .method
            .map(|v| v.into_unsigned("method").and_then(|m| narrow("method", m)))
            .transpose()?;
        let crc = raw
            .crc
            .map(|v| v.into_unsigned("crc").and_then(|c| narrow("crc", c)))
            .transpose()?;

        Ok(Self {
            name: raw.name,
            size,
            compressed_size,
            method,
            crc,
            create: raw.create,
            last_modified: raw.last_modified,
        })
    }
}
