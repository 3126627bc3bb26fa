//! Ordered collection of entry metadata.

use crate::{EntryInfo, EntryName};
use serde::{Deserialize, Serialize};

/// Ordered, immutable list of [`EntryInfo`] records.
///
/// Order is whatever the builder supplied; a list produced by
/// [`ArchiveReader`](crate::ArchiveReader) keeps the physical order of entries
/// in the archive. Serializes as a plain JSON array.
///
/// # Examples
///
/// ```
/// use plugin_archive_vfs::{EntryInfo, EntryList, EntryName};
///
/// let list: EntryList = ["/b.txt", "/META-INF/MANIFEST.MF"]
///     .into_iter()
///     .map(|n| EntryInfo::new(EntryName::new(n).unwrap()))
///     .collect();
///
/// assert_eq!(list.len(), 2);
/// assert_eq!(list[0].name().as_str(), "/b.txt");
/// assert_eq!(list.sorted()[0].name().as_str(), "/META-INF/MANIFEST.MF");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryList(Vec<EntryInfo>);

impl EntryList {
    /// Creates a list from records in the given order.
    #[must_use]
    pub const fn new(entries: Vec<EntryInfo>) -> Self {
        Self(entries)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over entries in list order.
    pub fn iter(&self) -> std::slice::Iter<'_, EntryInfo> {
        self.0.iter()
    }

    /// Returns the entry with this name, if any.
    #[must_use]
    pub fn get(&self, name: &EntryName) -> Option<&EntryInfo> {
        self.0.iter().find(|entry| entry.name() == name)
    }

    /// Returns a copy ordered by [`EntryName`] ordering (manifest first).
    #[must_use]
    pub fn sorted(&self) -> Self {
        let mut entries = self.0.clone();
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        Self(entries)
    }

    /// Number of directory entries.
    #[must_use]
    pub fn directory_count(&self) -> usize {
        self.0.iter().filter(|entry| entry.is_directory()).count()
    }

    /// Sum of known uncompressed sizes.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.0.iter().filter_map(EntryInfo::size).sum()
    }

    /// Returns the records as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[EntryInfo] {
        &self.0
    }

    /// Consumes the list, returning the records.
    #[must_use]
    pub fn into_inner(self) -> Vec<EntryInfo> {
        self.0
    }
}

impl std::ops::Index<usize> for EntryList {
    type Output = EntryInfo;

    fn index(&self, index: usize) -> &EntryInfo {
        &self.0[index]
    }
}

impl FromIterator<EntryInfo> for EntryList {
    fn from_iter<I: IntoIterator<Item = EntryInfo>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for EntryList {
    type Item = EntryInfo;
    type IntoIter = std::vec::IntoIter<EntryInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a EntryList {
    type Item = &'a EntryInfo;
    type IntoIter = std::slice::Iter<'a, EntryInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str) -> EntryInfo {
        EntryInfo::new(EntryName::new(name).unwrap())
    }

    #[test]
    fn test_preserves_insertion_order() {
        let list = EntryList::new(vec![info("/z"), info("/META-INF/MANIFEST.MF"), info("/a")]);
        let names: Vec<&str> = list.iter().map(|e| e.name().as_str()).collect();
        assert_eq!(names, ["/z", "/META-INF/MANIFEST.MF", "/a"]);
    }

    #[test]
    fn test_sorted_is_a_copy() {
        let list = EntryList::new(vec![info("/z"), info("/meta-inf/manifest.mf"), info("/a")]);
        let sorted = list.sorted();
        let names: Vec<&str> = sorted.iter().map(|e| e.name().as_str()).collect();
        assert_eq!(names, ["/META-INF/MANIFEST.MF", "/a", "/z"]);
        assert_eq!(list[0].name().as_str(), "/z");
    }

    #[test]
    fn test_aggregates() {
        let list = EntryList::new(vec![
            info("/dir/"),
            info("/dir/a").with_size(10),
            info("/dir/b"),
            info("/c").with_size(5),
        ]);
        assert_eq!(list.directory_count(), 1);
        assert_eq!(list.total_size(), 15);
        assert!(list.get(&EntryName::new("/dir/b").unwrap()).is_some());
        assert!(list.get(&EntryName::new("/missing").unwrap()).is_none());
    }

    #[test]
    fn test_serde_array_round_trip() {
        let list = EntryList::new(vec![info("/META-INF/").with_size(0), info("/x.txt").with_crc(1)]);
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"[{"name":"/META-INF/","size":0},{"name":"/x.txt","crc":1}]"#);

        let back: EntryList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn test_empty_list_serializes_as_empty_array() {
        let list = EntryList::default();
        assert!(list.is_empty());
        assert_eq!(serde_json::to_string(&list).unwrap(), "[]");
    }
}
