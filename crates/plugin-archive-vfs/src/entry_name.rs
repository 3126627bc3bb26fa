//! Path-like names of archive entries.
//!
//! Every name starts with `/`. The manifest path `/META-INF/MANIFEST.MF` is
//! special: any letter-case variant of it canonicalizes to one shared value,
//! and that value sorts before every other name.
//!
//! # Examples
//!
//! ```
//! use plugin_archive_vfs::EntryName;
//!
//! let manifest = EntryName::new("/meta-inf/manifest.mf").unwrap();
//! let class = EntryName::new("/com/example/Main.class").unwrap();
//!
//! assert!(manifest.is_manifest());
//! assert_eq!(&manifest, EntryName::manifest());
//! assert!(manifest < class);
//! ```

use crate::{ArchiveError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Separator between path components inside an archive.
pub const SEPARATOR: char = '/';

/// Canonical path of the JAR manifest.
pub const MANIFEST_PATH: &str = "/META-INF/MANIFEST.MF";

/// Maximum entry name length accepted from request paths.
pub const MAX_ENTRY_NAME_LEN: usize = 255;

static MANIFEST: EntryName = EntryName(Cow::Borrowed(MANIFEST_PATH));

/// Validated name of one archive entry.
///
/// Equality and hashing are case-sensitive on the raw text. Because manifest
/// variants are canonicalized on construction, `/META-INF/MANIFEST.MF` and
/// `/meta-inf/Manifest.mf` still compare equal.
///
/// # Examples
///
/// ```
/// use plugin_archive_vfs::EntryName;
///
/// assert!(EntryName::new("/a").unwrap() != EntryName::new("/A").unwrap());
/// assert!(EntryName::new("relative.txt").is_err());
/// assert!(EntryName::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryName(Cow<'static, str>);

impl EntryName {
    /// Creates an entry name.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidEntryName`] if `name` is empty or does
    /// not start with `/`.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(invalid(name, "must not be empty"));
        }
        if !name.starts_with(SEPARATOR) {
            return Err(invalid(name, "must start with '/'"));
        }
        if name.eq_ignore_ascii_case(MANIFEST_PATH) {
            return Ok(MANIFEST.clone());
        }
        Ok(Self(Cow::Owned(name)))
    }

    /// Creates an entry name no longer than `max_len` characters.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidEntryName`] on the same conditions as
    /// [`new`](Self::new), or when the name is too long.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_archive_vfs::EntryName;
    ///
    /// assert!(EntryName::with_max_len("/short", 255).is_ok());
    /// assert!(EntryName::with_max_len(format!("/{}", "x".repeat(255)), 255).is_err());
    /// ```
    pub fn with_max_len(name: impl Into<String>, max_len: usize) -> Result<Self> {
        let name = name.into();
        if name.chars().count() > max_len {
            return Err(invalid(name, "exceeds maximum length"));
        }
        Self::new(name)
    }

    /// Creates an entry name from a path relative to the archive root,
    /// prefixing `/` when missing.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidEntryName`] if `relative` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_archive_vfs::EntryName;
    ///
    /// let name = EntryName::from_relative("docs/readme.txt").unwrap();
    /// assert_eq!(name.as_str(), "/docs/readme.txt");
    /// ```
    pub fn from_relative(relative: &str) -> Result<Self> {
        if relative.is_empty() {
            return Err(invalid(String::new(), "must not be empty"));
        }
        if relative.starts_with(SEPARATOR) {
            Self::new(relative)
        } else {
            Self::new(format!("{SEPARATOR}{relative}"))
        }
    }

    /// Returns the shared manifest name.
    #[must_use]
    pub fn manifest() -> &'static Self {
        &MANIFEST
    }

    /// Returns the name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name without its leading `/`.
    #[must_use]
    pub fn relative(&self) -> &str {
        self.0.strip_prefix(SEPARATOR).unwrap_or(&self.0)
    }

    /// Returns the last non-empty path component.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_archive_vfs::EntryName;
    ///
    /// let name = EntryName::new("/com/example/").unwrap();
    /// assert_eq!(name.file_name(), Some("example"));
    /// assert_eq!(EntryName::new("/").unwrap().file_name(), None);
    /// ```
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.0.split(SEPARATOR).rfind(|part| !part.is_empty())
    }

    /// Returns `true` for the canonical manifest name.
    #[must_use]
    pub fn is_manifest(&self) -> bool {
        self.0 == MANIFEST_PATH
    }

    /// Returns `true` if the name denotes a directory (trailing `/`).
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.0.ends_with(SEPARATOR)
    }
}

fn invalid(name: String, reason: &'static str) -> ArchiveError {
    ArchiveError::InvalidEntryName { name, reason }
}

impl Ord for EntryName {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_manifest(), other.is_manifest()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for EntryName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntryName {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for EntryName {
    type Error = ArchiveError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<EntryName> for String {
    fn from(name: EntryName) -> Self {
        name.0.into_owned()
    }
}

impl AsRef<str> for EntryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn name(s: &str) -> EntryName {
        EntryName::new(s).unwrap()
    }

    #[test]
    fn test_manifest_variants_canonicalize() {
        for variant in [
            "/META-INF/MANIFEST.MF",
            "/meta-inf/manifest.mf",
            "/Meta-Inf/Manifest.MF",
        ] {
            let parsed = name(variant);
            assert!(parsed.is_manifest());
            assert_eq!(parsed.as_str(), MANIFEST_PATH);
            assert_eq!(&parsed, EntryName::manifest());
            assert!(matches!(parsed.0, Cow::Borrowed(_)));
        }
    }

    #[test]
    fn test_manifest_sorts_first_both_directions() {
        let manifest = name("/meta-inf/MANIFEST.mf");
        for other in ["/", "/A", "/META-INF/", "/META-INF/LICENSE", "/zzz"] {
            let other = name(other);
            assert_eq!(manifest.cmp(&other), Ordering::Less);
            assert_eq!(other.cmp(&manifest), Ordering::Greater);
        }
        assert_eq!(manifest.cmp(&name("/META-INF/MANIFEST.MF")), Ordering::Equal);
    }

    #[test]
    fn test_non_manifest_is_case_sensitive() {
        assert_ne!(name("/a"), name("/A"));
        assert_eq!(name("/A").cmp(&name("/a")), Ordering::Less);
        assert_eq!(name("/b").cmp(&name("/a")), Ordering::Greater);
        assert_eq!(name("/same").cmp(&name("/same")), Ordering::Equal);
    }

    #[test]
    fn test_ordering_consistent_with_equality() {
        let names = ["/x", "/X", "/meta-inf/manifest.mf", "/META-INF/MANIFEST.MF"];
        for a in names {
            for b in names {
                let (a, b) = (name(a), name(b));
                assert_eq!(a == b, a.cmp(&b) == Ordering::Equal, "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_hash_matches_equality() {
        let set: HashSet<EntryName> = ["/META-INF/MANIFEST.MF", "/meta-inf/manifest.mf", "/a", "/A"]
            .into_iter()
            .map(name)
            .collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_sorting_puts_manifest_first() {
        let mut names = vec![name("/B"), name("/a"), name("/META-INF/manifest.MF"), name("/A")];
        names.sort();
        let sorted: Vec<&str> = names.iter().map(EntryName::as_str).collect();
        assert_eq!(sorted, ["/META-INF/MANIFEST.MF", "/A", "/B", "/a"]);
    }

    #[test]
    fn test_validation() {
        assert!(EntryName::new("").is_err());
        assert!(EntryName::new("no-slash").is_err());
        assert!(EntryName::new("/").is_ok());

        let max = format!("/{}", "x".repeat(MAX_ENTRY_NAME_LEN - 1));
        assert!(EntryName::with_max_len(max.clone(), MAX_ENTRY_NAME_LEN).is_ok());
        let too_long = format!("{max}x");
        let err = EntryName::with_max_len(too_long, MAX_ENTRY_NAME_LEN).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_relative_and_directory() {
        let dir = EntryName::from_relative("com/example/").unwrap();
        assert_eq!(dir.as_str(), "/com/example/");
        assert_eq!(dir.relative(), "com/example/");
        assert!(dir.is_directory());

        let file = EntryName::from_relative("/already/rooted.txt").unwrap();
        assert_eq!(file.as_str(), "/already/rooted.txt");
        assert!(!file.is_directory());
        assert_eq!(file.file_name(), Some("rooted.txt"));

        assert!(EntryName::from_relative("").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&name("/docs/a.txt")).unwrap();
        assert_eq!(json, "\"/docs/a.txt\"");

        let parsed: EntryName = serde_json::from_str("\"/meta-inf/manifest.mf\"").unwrap();
        assert!(parsed.is_manifest());
        assert!(serde_json::from_str::<EntryName>("\"relative\"").is_err());
    }
}
