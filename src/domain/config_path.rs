// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpers for building and splitting hierarchical configuration keys.

/// The delimiter between key segments.
pub const KEY_DELIMITER: char = ':';

/// Joins path segments with [`KEY_DELIMITER`].
///
/// Empty segments still contribute a delimiter, so positions are preserved.
///
/// # Examples
///
/// ```
/// use layercfg::domain::config_path;
///
/// assert_eq!(config_path::combine(["Parent", "Child"]), "Parent:Child");
/// assert_eq!(config_path::combine(["parent", ""]), "parent:");
/// ```
pub fn combine<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut path = String::new();
    for (i, segment) in segments.into_iter().enumerate() {
        if i > 0 {
            path.push(KEY_DELIMITER);
        }
        path.push_str(segment.as_ref());
    }
    path
}

/// Returns the text after the last delimiter, or the whole key without one.
///
/// # Examples
///
/// ```
/// use layercfg::domain::config_path;
///
/// assert_eq!(config_path::last_segment("a:b:c"), "c");
/// assert_eq!(config_path::last_segment("abc"), "abc");
/// assert_eq!(config_path::last_segment("a:"), "");
/// ```
pub fn last_segment(path: &str) -> &str {
    match path.rfind(KEY_DELIMITER) {
        Some(index) => &path[index + KEY_DELIMITER.len_utf8()..],
        None => path,
    }
}

/// Returns the key without its last segment, or `None` for a top-level key.
///
/// # Examples
///
/// ```
/// use layercfg::domain::config_path;
///
/// assert_eq!(config_path::parent_path("a:b:c"), Some("a:b"));
/// assert_eq!(config_path::parent_path("abc"), None);
/// ```
pub fn parent_path(path: &str) -> Option<&str> {
    path.rfind(KEY_DELIMITER).map(|index| &path[..index])
}
