//! Decoding of ZIP/JAR containers held in memory.
//!
//! Entries are visited in physical order, i.e. by the offset of their local
//! header, which is the order a streaming decoder would emit them.

use crate::{ArchiveError, EntryInfo, EntryList, EntryName, Result};
use chrono::{DateTime, TimeZone, Utc};
use std::fmt;
use std::io::{Cursor, Read};
use zip::extra_fields::ExtraField;
use zip::{CompressionMethod, ZipArchive};

/// Read-only view over the entries of an in-memory archive.
///
/// Nothing is cached between calls; every [`list`](Self::list) or
/// [`read_entry`](Self::read_entry) re-reads the entry headers.
///
/// # Examples
///
/// ```
/// use plugin_archive_vfs::ArchiveReader;
/// use std::io::{Cursor, Write};
///
/// let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
/// writer.start_file("hello.txt", zip::write::SimpleFileOptions::default()).unwrap();
/// writer.write_all(b"hi").unwrap();
/// let bytes = writer.finish().unwrap().into_inner();
///
/// let list = ArchiveReader::open(&bytes).unwrap().list().unwrap();
/// assert_eq!(list.len(), 1);
/// assert_eq!(list[0].name().as_str(), "/hello.txt");
/// assert_eq!(list[0].size(), Some(2));
/// ```
pub struct ArchiveReader<'a> {
    bytes: &'a [u8],
    archive: ZipArchive<Cursor<&'a [u8]>>,
    physical_order: Vec<usize>,
}

impl<'a> ArchiveReader<'a> {
    /// Opens `bytes` as a ZIP/JAR container.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Zip`] if the central directory cannot be read
    /// or an entry header is malformed.
    pub fn open(bytes: &'a [u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ArchiveError::zip("central directory", e))?;

        let mut offsets = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let entry = archive
                .by_index_raw(index)
                .map_err(|e| ArchiveError::zip(format!("entry #{index}"), e))?;
            offsets.push((entry.header_start(), index));
        }
        offsets.sort_unstable();

        Ok(Self {
            bytes,
            archive,
            physical_order: offsets.into_iter().map(|(_, index)| index).collect(),
        })
    }

    /// Number of entries in the archive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.physical_order.len()
    }

    /// Returns `true` if the archive has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.physical_order.is_empty()
    }

    /// Lists every entry in physical order.
    ///
    /// Timestamps come from the Extended Timestamp extra field. The central
    /// directory copy often carries only the modification time, so missing
    /// times are looked up in the local header before falling back to the
    /// DOS timestamp.
    ///
    /// # Errors
    ///
    /// Any malformed entry aborts the listing; no partial list is returned.
    pub fn list(&mut self) -> Result<EntryList> {
        let mut entries = Vec::with_capacity(self.physical_order.len());
        for &index in &self.physical_order {
            let entry = self
                .archive
                .by_index_raw(index)
                .map_err(|e| ArchiveError::zip(format!("entry #{index}"), e))?;

            let name = EntryName::from_relative(entry.name())?;
            let mut info = EntryInfo::new(name)
                .with_size(entry.size())
                .with_compressed_size(entry.compressed_size())
                .with_crc(entry.crc32());

            if let Some(method) = method_code(entry.compression()) {
                info = info.with_method(method);
            }

            let mut times = ExtendedTimes::default();
            for field in entry.extra_data_fields() {
                if let ExtraField::ExtendedTimestamp(timestamp) = field {
                    times.modified = timestamp.mod_time();
                    times.created = timestamp.cr_time();
                }
            }
            if times.created.is_none() || times.modified.is_none() {
                let local = local_extended_times(self.bytes, entry.header_start());
                times.modified = times.modified.or(local.modified);
                times.created = times.created.or(local.created);
            }

            if let Some(created) = times.created.and_then(unix_time) {
                info = info.with_create(created);
            }
            let modified = times
                .modified
                .and_then(unix_time)
                .or_else(|| entry.last_modified().and_then(dos_time));
            if let Some(modified) = modified {
                info = info.with_last_modified(modified);
            }

            tracing::debug!(entry = %info.name(), size = ?info.size(), "Decoded entry header");
            entries.push(info);
        }

        Ok(EntryList::new(entries))
    }

    /// Returns the decompressed bytes of the first entry, in physical order,
    /// whose relative name equals `path` with any leading `/` stripped.
    ///
    /// Returns `Ok(None)` when no entry matches.
    ///
    /// # Errors
    ///
    /// Returns an error if a header is malformed or the entry data cannot be
    /// decompressed.
    pub fn read_entry(&mut self, path: &str) -> Result<Option<(EntryName, Vec<u8>)>> {
        let wanted = strip_separator(path);

        for &index in &self.physical_order {
            let mut entry = self
                .archive
                .by_index(index)
                .map_err(|e| ArchiveError::zip(format!("entry #{index}"), e))?;

            if strip_separator(entry.name()) != wanted {
                continue;
            }

            let name = EntryName::from_relative(entry.name())?;
            let capacity = usize::try_from(entry.size()).unwrap_or_default();
            let mut bytes = Vec::with_capacity(capacity);
            entry.read_to_end(&mut bytes).map_err(|source| ArchiveError::Io {
                entry: name.to_string(),
                source,
            })?;

            tracing::debug!(entry = %name, bytes = bytes.len(), "Extracted entry");
            return Ok(Some((name, bytes)));
        }

        Ok(None)
    }

    /// Returns the stored name of the manifest entry, whatever its case.
    ///
    /// # Errors
    ///
    /// Returns an error if a header is malformed.
    pub fn manifest_entry_name(&mut self) -> Result<Option<String>> {
        for &index in &self.physical_order {
            let entry = self
                .archive
                .by_index_raw(index)
                .map_err(|e| ArchiveError::zip(format!("entry #{index}"), e))?;
            if EntryName::from_relative(entry.name()).is_ok_and(|name| name.is_manifest()) {
                return Ok(Some(entry.name().to_string()));
            }
        }
        Ok(None)
    }

    /// Returns `true` if the archive contains a manifest entry.
    ///
    /// # Errors
    ///
    /// Returns an error if a header is malformed.
    pub fn has_manifest(&mut self) -> Result<bool> {
        Ok(self.manifest_entry_name()?.is_some())
    }

    /// Returns the decompressed manifest, if the archive has one.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be decoded.
    pub fn read_manifest(&mut self) -> Result<Option<Vec<u8>>> {
        let Some(stored_name) = self.manifest_entry_name()? else {
            return Ok(None);
        };
        Ok(self.read_entry(&stored_name)?.map(|(_, bytes)| bytes))
    }
}

impl fmt::Debug for ArchiveReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveReader")
            .field("entries", &self.physical_order.len())
            .finish_non_exhaustive()
    }
}

/// Lists the entries of `bytes` in physical order.
///
/// # Errors
///
/// Returns an error if `bytes` is not a well-formed ZIP/JAR container.
pub fn list_entries(bytes: &[u8]) -> Result<EntryList> {
    ArchiveReader::open(bytes)?.list()
}

const LOCAL_HEADER_SIGNATURE: u32 = 0x0403_4b50;
const LOCAL_HEADER_LEN: usize = 30;
const EXTENDED_TIMESTAMP_ID: u16 = 0x5455;

/// Unix times from an Extended Timestamp extra field.
#[derive(Debug, Default, Clone, Copy)]
struct ExtendedTimes {
    modified: Option<u32>,
    created: Option<u32>,
}

/// Reads the Extended Timestamp field from the local header at `offset`.
///
/// Anything malformed yields no times; the central directory stays the
/// authority for whether the archive decodes.
fn local_extended_times(bytes: &[u8], offset: u64) -> ExtendedTimes {
    let Ok(offset) = usize::try_from(offset) else {
        return ExtendedTimes::default();
    };
    if read_u32(bytes, offset) != Some(LOCAL_HEADER_SIGNATURE) {
        return ExtendedTimes::default();
    }
    let (Some(name_len), Some(extra_len)) =
        (read_u16(bytes, offset + 26), read_u16(bytes, offset + 28))
    else {
        return ExtendedTimes::default();
    };

    let start = offset + LOCAL_HEADER_LEN + usize::from(name_len);
    let Some(mut extra) = bytes.get(start..start + usize::from(extra_len)) else {
        return ExtendedTimes::default();
    };

    while let (Some(id), Some(len)) = (read_u16(extra, 0), read_u16(extra, 2)) {
        let Some(data) = extra.get(4..4 + usize::from(len)) else {
            break;
        };
        if id == EXTENDED_TIMESTAMP_ID {
            return parse_extended_times(data);
        }
        extra = &extra[4 + usize::from(len)..];
    }
    ExtendedTimes::default()
}

/// Times appear in flag order: modification, access, creation.
fn parse_extended_times(data: &[u8]) -> ExtendedTimes {
    let Some((&flags, mut rest)) = data.split_first() else {
        return ExtendedTimes::default();
    };
    let mut take = |bit: u8| {
        if flags & bit == 0 {
            return None;
        }
        let value = read_u32(rest, 0);
        rest = rest.get(4..).unwrap_or_default();
        value
    };

    let modified = take(0b001);
    take(0b010); // access time
    let created = take(0b100);
    ExtendedTimes { modified, created }
}

fn read_u16(bytes: &[u8], at: usize) -> Option<u16> {
    bytes
        .get(at..at + 2)
        .and_then(|b| b.try_into().ok())
        .map(u16::from_le_bytes)
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    bytes
        .get(at..at + 4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
}

fn strip_separator(path: &str) -> &str {
    path.strip_prefix(crate::entry_name::SEPARATOR).unwrap_or(path)
}

const fn method_code(method: CompressionMethod) -> Option<u16> {
    match method {
        CompressionMethod::Stored => Some(0),
        CompressionMethod::Deflated => Some(8),
        _ => None,
    }
}

fn unix_time(seconds: u32) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(i64::from(seconds), 0)
}

fn dos_time(stamp: zip::DateTime) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(
        i32::from(stamp.year()),
        u32::from(stamp.month()),
        u32::from(stamp.day()),
        u32::from(stamp.hour()),
        u32::from(stamp.minute()),
        u32::from(stamp.second()),
    )
    .single()
}
