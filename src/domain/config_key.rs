// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration key newtype with case-insensitive identity.
//!
//! This module provides the `ConfigKey` type, a newtype wrapper around `String`
//! whose equality and hashing ignore case, and the ordering used when
//! enumerating child segments.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::domain::config_path::KEY_DELIMITER;

/// A case-insensitive configuration key.
///
/// `ConfigKey` keeps the casing it was created with (so enumerations report keys
/// the way a source declared them) but compares and hashes without regard to
/// case. Two keys that differ only in casing address the same entry.
///
/// # Examples
///
/// ```
/// use layercfg::domain::config_key::ConfigKey;
///
/// let key = ConfigKey::from("Database:Host");
/// assert_eq!(key, ConfigKey::from("DATABASE:host"));
/// assert_eq!(key.as_str(), "Database:Host");
/// ```
#[derive(Clone, Debug)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Creates a new `ConfigKey` from a `String`.
    ///
    /// # Examples
    ///
    /// ```
    /// use layercfg::domain::config_key::ConfigKey;
    ///
    /// let key = ConfigKey::new("App:Name".to_string());
    /// assert_eq!(key.as_str(), "App:Name");
    /// ```
    pub fn new(key: String) -> Self {
        ConfigKey(key)
    }

    /// Returns the key as a string slice, in its original casing.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `ConfigKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns the part of this key after `prefix`, matched case-insensitively.
    pub(crate) fn strip_prefix_ignore_case(&self, prefix: &str) -> Option<&str> {
        strip_prefix_ignore_case(&self.0, prefix)
    }
}

/// Case-insensitive equality of two key strings.
pub fn keys_equal(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

pub(crate) fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let mut value_chars = value.char_indices();
    for p in prefix.chars() {
        let (_, v) = value_chars.next()?;
        if !v.to_lowercase().eq(p.to_lowercase()) {
            return None;
        }
    }
    let offset = value_chars.next().map_or(value.len(), |(index, _)| index);
    Some(&value[offset..])
}

fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Parses a segment that consists only of ASCII digits.
fn numeric_segment(segment: &str) -> Option<u64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Compares two key segments.
///
/// Purely numeric segments sort before every other segment and among
/// themselves by value; everything else sorts case-insensitively by text.
/// Numeric ties fall back to text so the order stays total.
pub fn compare_segments(a: &str, b: &str) -> Ordering {
    match (numeric_segment(a), numeric_segment(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| compare_ignore_case(a, b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_ignore_case(a, b),
    }
}

/// Compares two full keys segment by segment using [`compare_segments`].
///
/// A key that is a prefix of another sorts first.
///
/// # Examples
///
/// ```
/// use layercfg::domain::config_key::compare_keys;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_keys("a:10", "a:9"), Ordering::Greater);
/// assert_eq!(compare_keys("a:2", "a:bob"), Ordering::Less);
/// ```
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    let mut left = a.split(KEY_DELIMITER);
    let mut right = b.split(KEY_DELIMITER);
    loop {
        match (left.next(), right.next()) {
            (Some(x), Some(y)) => match compare_segments(x, y) {
                Ordering::Equal => continue,
                other => return other,
            },
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (None, None) => return Ordering::Equal,
        }
    }
}

impl PartialEq for ConfigKey {
    fn eq(&self, other: &Self) -> bool {
        keys_equal(&self.0, &other.0)
    }
}

impl Eq for ConfigKey {}

impl Hash for ConfigKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.0.chars().flat_map(char::to_lowercase) {
            c.hash(state);
        }
    }
}

impl PartialOrd for ConfigKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ConfigKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_keys(&self.0, &other.0)
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey(s.to_string())
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
