//! Blake3 checksums for stored archives.
//!
//! Checksums are rendered as `"blake3:<hex>"` so the algorithm can change
//! without ambiguity.

use serde::{Deserialize, Serialize};
use std::fmt;

const PREFIX: &str = "blake3:";
const HEX_LEN: usize = 64;

/// Blake3 digest of an archive in `blake3:<hex>` form.
///
/// # Examples
///
/// ```
/// use plugin_archive_store::checksum::Checksum;
///
/// let checksum = Checksum::of(b"PK\x05\x06");
/// assert!(checksum.as_str().starts_with("blake3:"));
/// assert!(checksum.matches(b"PK\x05\x06"));
/// assert!(!checksum.matches(b"other"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checksum(String);

impl Checksum {
    /// Calculates the checksum of `data`.
    #[must_use]
    pub fn of(data: &[u8]) -> Self {
        Self(format!("{PREFIX}{}", blake3::hash(data).to_hex()))
    }

    /// Returns `true` if `data` hashes to this checksum.
    ///
    /// The comparison takes the same time wherever the first difference is.
    #[must_use]
    pub fn matches(&self, data: &[u8]) -> bool {
        constant_time_eq(Self::of(data).as_str(), &self.0)
    }

    /// Returns `true` if the value is `blake3:` followed by 64 lowercase hex digits.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.0.strip_prefix(PREFIX).is_some_and(|hex| {
            hex.len() == HEX_LEN
                && hex
                    .bytes()
                    .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        })
    }

    /// Returns the checksum as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex digest without the algorithm prefix.
    #[must_use]
    pub fn digest(&self) -> &str {
        self.0.strip_prefix(PREFIX).unwrap_or(&self.0)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compares two strings without short-circuiting on the first difference.
///
/// # Examples
///
/// ```
/// use plugin_archive_store::checksum::constant_time_eq;
///
/// assert!(constant_time_eq("blake3:ab", "blake3:ab"));
/// assert!(!constant_time_eq("blake3:ab", "blake3:ac"));
/// assert!(!constant_time_eq("blake3:ab", "blake3:abc"));
/// ```
#[must_use]
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let diff = (0..a.len().max(b.len())).fold(0u8, |acc, i| {
        acc | (a.get(i).copied().unwrap_or(0) ^ b.get(i).copied().unwrap_or(0))
    });
    a.len() == b.len() && diff == 0
}
